// ABOUTME: Integration tests for trigger synchronization.
// ABOUTME: Verifies exact create/update/delete calls and the empty-list no-op.

mod support;

use lamsync::config::TriggerSpec;
use lamsync::deploy::{DeployErrorKind, RetryPolicy, TriggerSummary, TriggerSync};
use lamsync::remote::{MappingSettings, RemoteError};
use lamsync::types::{FunctionName, QueueArn};
use std::num::NonZeroU32;
use support::{Call, FakeRemote, init_tracing};

const QUEUE_A: &str = "arn:aws:sqs:us-east-1:1:a";
const QUEUE_B: &str = "arn:aws:sqs:us-east-1:1:b";
const QUEUE_C: &str = "arn:aws:sqs:us-east-1:1:c";

fn function() -> FunctionName {
    FunctionName::new("orders").unwrap()
}

fn trigger(queue: &str) -> TriggerSpec {
    TriggerSpec::new(QueueArn::new(queue))
}

fn defaults() -> MappingSettings {
    MappingSettings {
        batch_size: 10,
        batching_window: 0,
        enabled: true,
    }
}

#[tokio::test]
async fn converges_ab_against_ac() {
    init_tracing();
    let remote = FakeRemote::existing()
        .with_mapping("uuid-a", QUEUE_A, 5)
        .with_mapping("uuid-c", QUEUE_C, 10);

    let summary = TriggerSync::new(&remote, RetryPolicy::default())
        .sync(&function(), &[trigger(QUEUE_A), trigger(QUEUE_B)])
        .await
        .unwrap();

    assert_eq!(
        summary,
        TriggerSummary {
            created: 1,
            updated: 1,
            deleted: 1
        }
    );
    assert_eq!(
        remote.calls(),
        vec![
            Call::ListMappings,
            Call::UpdateMapping {
                id: "uuid-a".into(),
                settings: defaults(),
            },
            Call::CreateMapping {
                queue: QUEUE_B.into(),
                settings: defaults(),
            },
            Call::DeleteMapping("uuid-c".into()),
        ]
    );

    let mut queues: Vec<String> = remote
        .mappings()
        .iter()
        .map(|m| m.queue.to_string())
        .collect();
    queues.sort();
    assert_eq!(queues, [QUEUE_A, QUEUE_B]);
}

#[tokio::test]
async fn empty_trigger_list_issues_no_calls() {
    let remote = FakeRemote::existing()
        .with_mapping("uuid-a", QUEUE_A, 5)
        .with_mapping("uuid-c", QUEUE_C, 10);

    let summary = TriggerSync::new(&remote, RetryPolicy::default())
        .sync(&function(), &[])
        .await
        .unwrap();

    assert_eq!(summary.total(), 0);
    assert!(remote.calls().is_empty());
    assert_eq!(remote.mappings().len(), 2);
}

#[tokio::test]
async fn configured_settings_are_pushed() {
    let remote = FakeRemote::existing().with_mapping("uuid-a", QUEUE_A, 10);
    let mut spec = trigger(QUEUE_A);
    spec.batch_size = NonZeroU32::new(25);
    spec.batching_window = Some(5);
    spec.enabled = Some(false);

    TriggerSync::new(&remote, RetryPolicy::default())
        .sync(&function(), &[spec])
        .await
        .unwrap();

    let mapping = &remote.mappings()[0];
    assert_eq!(mapping.settings.batch_size, 25);
    assert_eq!(mapping.settings.batching_window, 5);
    assert!(!mapping.settings.enabled);
}

#[tokio::test(start_paused = true)]
async fn mapping_conflicts_are_retried() {
    let remote = FakeRemote::existing().with_mapping_conflicts(2);

    TriggerSync::new(&remote, RetryPolicy::default())
        .sync(&function(), &[trigger(QUEUE_B)])
        .await
        .unwrap();

    assert_eq!(
        remote.count(|c| matches!(c, Call::CreateMapping { .. })),
        3
    );
    assert_eq!(remote.mappings().len(), 1);
}

#[tokio::test]
async fn list_failure_stops_before_any_mutation() {
    let remote = FakeRemote::existing()
        .failing_list(RemoteError::Other("ThrottlingException".into()));

    let err = TriggerSync::new(&remote, RetryPolicy::default())
        .sync(&function(), &[trigger(QUEUE_A)])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Remote);
    assert!(remote.mutations().is_empty());
}
