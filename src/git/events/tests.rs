// gitops-engine: Git Operations Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::error::EngineError;

fn names(events: &[EngineEvent]) -> Vec<String> {
    events.iter().map(EngineEvent::name).collect()
}

#[test]
fn test_event_names() {
    let repo = PathBuf::from("/repo");
    let events = [
        EngineEvent::Started {
            op: Operation::Commit,
            repo: repo.clone(),
        },
        EngineEvent::Succeeded {
            op: Operation::Push,
            repo: repo.clone(),
        },
        EngineEvent::Failed {
            op: Operation::Pull,
            repo: repo.clone(),
            message: "boom".to_string(),
        },
        EngineEvent::BranchChanged {
            repo,
            branch: "main".to_string(),
        },
        EngineEvent::ProjectDeleted {
            path: PathBuf::from("/old"),
        },
    ];
    assert_eq!(
        names(&events),
        [
            "gitCommitStart",
            "gitPushSuccess",
            "gitPullFailed",
            "gitBranchChanged",
            "gitProjectDeleted"
        ]
    );
}

#[test]
fn test_event_display() {
    let event = EngineEvent::Failed {
        op: Operation::Push,
        repo: PathBuf::from("/repo"),
        message: "rejected".to_string(),
    };
    insta::assert_snapshot!(event.to_string(), @"gitPushFailed (/repo): rejected");
}

#[test]
fn test_event_serializes_with_tag() {
    let event = EngineEvent::BranchChanged {
        repo: PathBuf::from("/repo"),
        branch: "dev".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    insta::assert_snapshot!(json, @r#"{"event":"branchChanged","repo":"/repo","branch":"dev"}"#);
}

#[test]
fn test_every_subscriber_receives_in_order() {
    let bus = EventBus::new();
    let first = bus.subscribe();
    let second = bus.subscribe();

    let scope = bus.begin(Operation::Commit, Path::new("/repo"));
    scope.succeed();

    for subscription in [&first, &second] {
        assert_eq!(
            names(&subscription.drain()),
            ["gitCommitStart", "gitCommitSuccess"]
        );
    }
}

#[test]
fn test_no_replay_for_late_subscribers() {
    let bus = EventBus::new();
    bus.publish(EngineEvent::ProjectDeleted {
        path: PathBuf::from("/gone"),
    });
    let late = bus.subscribe();
    assert!(late.try_recv().is_none());
}

#[test]
fn test_dropping_subscription_unregisters() {
    let bus = EventBus::new();
    let subscription = bus.subscribe();
    let clone = bus.clone();
    assert_eq!(clone.subscriber_count(), 1);
    drop(subscription);
    assert_eq!(bus.subscriber_count(), 0);
    bus.publish(EngineEvent::ProjectDeleted {
        path: PathBuf::from("/gone"),
    });
}

#[test]
fn test_scope_fail_publishes_single_terminal_event() {
    let bus = EventBus::new();
    let subscription = bus.subscribe();

    bus.begin(Operation::Push, Path::new("/repo")).fail("remote rejected");

    let events = subscription.drain();
    assert_eq!(names(&events), ["gitPushStart", "gitPushFailed"]);
    assert!(matches!(
        &events[1],
        EngineEvent::Failed { message, .. } if message == "remote rejected"
    ));
}

#[test]
fn test_scope_settle_follows_result() {
    let bus = EventBus::new();
    let subscription = bus.subscribe();

    let ok: EngineResult<()> = Ok(());
    bus.begin(Operation::Fetch, Path::new("/repo")).settle(&ok);
    let err: EngineResult<()> = Err(EngineError::other("offline"));
    bus.begin(Operation::Fetch, Path::new("/repo")).settle(&err);

    assert_eq!(
        names(&subscription.drain()),
        [
            "gitFetchStart",
            "gitFetchSuccess",
            "gitFetchStart",
            "gitFetchFailed"
        ]
    );
}

#[test]
fn test_abandoned_scope_reports_failure() {
    let bus = EventBus::new();
    let subscription = bus.subscribe();

    {
        let _scope = bus.begin(Operation::Pull, Path::new("/repo"));
    }

    let events = subscription.drain();
    assert_eq!(names(&events), ["gitPullStart", "gitPullFailed"]);
    assert!(events[1].is_terminal());
    assert_eq!(events[1].operation(), Some(Operation::Pull));
}

#[tokio::test]
async fn test_async_receive_across_tasks() {
    let bus = EventBus::new();
    let subscription = bus.subscribe();

    let publisher = bus.clone();
    tokio::spawn(async move {
        publisher.begin(Operation::Merge, Path::new("/repo")).succeed();
    });

    let first = subscription.recv().await.unwrap();
    let second = subscription.recv().await.unwrap();
    assert_eq!(first.name(), "gitMergeStart");
    assert_eq!(second.name(), "gitMergeSuccess");
}

#[test]
fn test_recv_returns_none_after_bus_dropped() {
    let bus = EventBus::new();
    let subscription = bus.subscribe();
    drop(bus);
    assert!(
        subscription
            .recv_timeout(Duration::from_millis(10))
            .is_none()
    );
}
