// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Lifecycle events for mutating git operations.
//!
//! ```text
//! EventBus (clone = same bus)
//!   subscribe() --> Subscription { flume::Receiver }   drop = unsubscribe
//!   publish(event) --> every live subscriber, non-blocking
//!
//! OperationScope::begin  --> Started
//!   .succeed()           --> Succeeded
//!   .fail(msg)           --> Failed
//!   dropped unsettled    --> Failed
//! ```
//!
//! Each subscriber sees one publisher's events in publish order. Events from
//! different operations may interleave. There is no replay: a subscription
//! only receives events published after it was created.

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tracing::trace;

use crate::error::EngineResult;

/// Mutating operations that report start and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Commit,
    Push,
    Pull,
    Fetch,
    Merge,
}

impl Operation {
    const fn label(self) -> &'static str {
        match self {
            Self::Commit => "Commit",
            Self::Push => "Push",
            Self::Pull => "Pull",
            Self::Fetch => "Fetch",
            Self::Merge => "Merge",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EngineEvent {
    Started {
        op: Operation,
        repo: PathBuf,
    },
    Succeeded {
        op: Operation,
        repo: PathBuf,
    },
    Failed {
        op: Operation,
        repo: PathBuf,
        message: String,
    },
    /// HEAD now points at `branch`.
    BranchChanged {
        repo: PathBuf,
        branch: String,
    },
    /// A project was removed and should be dropped from any view of it.
    ProjectDeleted {
        path: PathBuf,
    },
}

impl EngineEvent {
    /// Wire name, e.g. `gitCommitStart` or `gitBranchChanged`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Started { op, .. } => format!("git{}Start", op.label()),
            Self::Succeeded { op, .. } => format!("git{}Success", op.label()),
            Self::Failed { op, .. } => format!("git{}Failed", op.label()),
            Self::BranchChanged { .. } => "gitBranchChanged".to_string(),
            Self::ProjectDeleted { .. } => "gitProjectDeleted".to_string(),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Started { op, .. } | Self::Succeeded { op, .. } | Self::Failed { op, .. } => {
                Some(*op)
            }
            Self::BranchChanged { .. } | Self::ProjectDeleted { .. } => None,
        }
    }

    /// Whether this event ends a tracked operation.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { repo, .. } | Self::Succeeded { repo, .. } => {
                write!(f, "{} ({})", self.name(), repo.display())
            }
            Self::Failed { repo, message, .. } => {
                write!(f, "{} ({}): {message}", self.name(), repo.display())
            }
            Self::BranchChanged { repo, branch } => {
                write!(f, "{} ({}): {branch}", self.name(), repo.display())
            }
            Self::ProjectDeleted { path } => write!(f, "{} ({})", self.name(), path.display()),
        }
    }
}

#[derive(Debug, Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(u64, flume::Sender<EngineEvent>)>>,
}

/// Multi-subscriber event bus. Clones share the same subscribers.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Dropping the returned value unregisters it.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = flume::unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, tx));
        Subscription {
            id,
            rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers `event` to every live subscriber without blocking.
    pub fn publish(&self, event: EngineEvent) {
        trace!(event = %event.name(), "publish");
        let mut subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Publishes `Started` for `op` and returns the scope that ends it.
    pub fn begin(&self, op: Operation, repo: &Path) -> OperationScope {
        OperationScope::begin(self.clone(), op, repo)
    }
}

/// Receiving end of an [`EventBus`] subscription.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: flume::Receiver<EngineEvent>,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Waits for the next event. `None` once the bus is gone and drained.
    pub async fn recv(&self) -> Option<EngineEvent> {
        self.rx.recv_async().await.ok()
    }

    #[must_use]
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.rx.try_recv().ok()
    }

    /// Blocking receive with a deadline, for threads outside the runtime.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Takes every event already queued.
    #[must_use]
    pub fn drain(&self) -> Vec<EngineEvent> {
        self.rx.drain().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// Guard for one tracked operation.
///
/// Publishes `Started` on creation and exactly one terminal event: the one
/// chosen by [`succeed`](Self::succeed), [`fail`](Self::fail) or
/// [`settle`](Self::settle), or `Failed` if the guard is dropped first.
#[must_use = "dropping the scope reports the operation as failed"]
#[derive(Debug)]
pub struct OperationScope {
    bus: EventBus,
    op: Operation,
    repo: PathBuf,
    settled: bool,
}

impl OperationScope {
    fn begin(bus: EventBus, op: Operation, repo: &Path) -> Self {
        let repo = repo.to_path_buf();
        bus.publish(EngineEvent::Started {
            op,
            repo: repo.clone(),
        });
        Self {
            bus,
            op,
            repo,
            settled: false,
        }
    }

    pub fn succeed(mut self) {
        self.settled = true;
        self.bus.publish(EngineEvent::Succeeded {
            op: self.op,
            repo: self.repo.clone(),
        });
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.settled = true;
        self.bus.publish(EngineEvent::Failed {
            op: self.op,
            repo: self.repo.clone(),
            message: message.into(),
        });
    }

    /// Ends the scope according to `result`.
    pub fn settle<T>(self, result: &EngineResult<T>) {
        match result {
            Ok(_) => self.succeed(),
            Err(e) => self.fail(e.to_string()),
        }
    }
}

impl Drop for OperationScope {
    fn drop(&mut self) {
        if !self.settled {
            self.bus.publish(EngineEvent::Failed {
                op: self.op,
                repo: self.repo.clone(),
                message: format!("{} abandoned before completion", self.op),
            });
        }
    }
}
