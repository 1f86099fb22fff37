use std::{num::NonZeroUsize, sync::Arc, thread};

use coordinator::{CoordErr, RoundCoordinator, config::CoordinatorConfig};
use protocol::{ModelShape, TrainingMetadata, UploadRequest};

const CODE: &str = "ABC123";

/// Config with a 3-element flat vector: [beta (2), beta_0 (1)].
fn small_config(quorum: usize) -> CoordinatorConfig {
    CoordinatorConfig {
        model: ModelShape::logistic_regression(NonZeroUsize::new(2).unwrap()),
        quorum: NonZeroUsize::new(quorum).unwrap(),
        seed: Some(7),
        ..CoordinatorConfig::default()
    }
}

fn upload(client: &str, round_id: u64, update: Vec<f32>) -> UploadRequest {
    UploadRequest {
        client_id: client.to_string(),
        round_id,
        model_update: update,
        training_metadata: TrainingMetadata {
            accuracy: 0.8,
            training_time_secs: 0.2,
            epochs: 10,
        },
    }
}

#[test]
fn first_join_initializes_round_one() {
    let coordinator = RoundCoordinator::new(small_config(2));

    let contract = coordinator.join(CODE, "client-a").unwrap();
    assert_eq!(contract.round_id, 1);
    assert_eq!(contract.global_vector.len(), 3);

    // Bias group (beta_0, last element) starts at exactly zero.
    assert_eq!(contract.global_vector[2], 0.0);
}

#[test]
fn second_join_observes_the_same_round_and_vector() {
    let coordinator = RoundCoordinator::new(small_config(2));

    let a = coordinator.join(CODE, "client-a").unwrap();
    let b = coordinator.join("DEF456", "client-b").unwrap();

    assert_eq!(b.round_id, a.round_id);
    assert_eq!(b.global_vector, a.global_vector);
}

#[test]
fn join_rejects_unknown_code() {
    let coordinator = RoundCoordinator::new(small_config(2));

    let err = coordinator.join("NOPE", "client-a").unwrap_err();
    assert_eq!(err, CoordErr::InvalidJoinCode);
}

#[test]
fn sync_before_any_join_is_round_not_started() {
    let coordinator = RoundCoordinator::new(small_config(2));

    let err = coordinator.sync(CODE).unwrap_err();
    assert_eq!(err, CoordErr::RoundNotStarted);
}

#[test]
fn sync_is_read_only() {
    let coordinator = RoundCoordinator::new(small_config(2));
    coordinator.join(CODE, "client-a").unwrap();

    coordinator
        .upload(upload("client-a", 1, vec![1.0, 1.0, 1.0]))
        .unwrap();

    let first = coordinator.sync(CODE).unwrap();
    let second = coordinator.sync(CODE).unwrap();

    assert_eq!(first.round_id, 1);
    assert_eq!(second, first);

    // The pending contribution recorded before the syncs still counts:
    // one more upload reaches quorum.
    let ack = coordinator
        .upload(upload("client-b", 1, vec![3.0, 3.0, 3.0]))
        .unwrap();
    assert_eq!(ack.current_round, 2);
}

#[test]
fn upload_before_any_join_is_round_not_started() {
    let coordinator = RoundCoordinator::new(small_config(2));

    let err = coordinator
        .upload(upload("client-a", 1, vec![0.0, 0.0, 0.0]))
        .unwrap_err();
    assert_eq!(err, CoordErr::RoundNotStarted);
}

#[test]
fn wrong_length_upload_is_rejected_without_mutation() {
    let coordinator = RoundCoordinator::new(small_config(2));
    coordinator.join(CODE, "client-a").unwrap();

    let err = coordinator
        .upload(upload("client-a", 1, vec![0.0, 0.0]))
        .unwrap_err();
    assert_eq!(err, CoordErr::LengthMismatch { got: 2, expected: 3 });

    // The rejected upload left nothing pending: quorum still needs two.
    coordinator
        .upload(upload("client-b", 1, vec![1.0, 1.0, 1.0]))
        .unwrap();
    let contract = coordinator.sync(CODE).unwrap();
    assert_eq!(contract.round_id, 1);
}

#[test]
fn quorum_aggregates_and_advances_the_round() {
    let coordinator = RoundCoordinator::new(small_config(2));
    coordinator.join(CODE, "client-a").unwrap();
    coordinator.join(CODE, "client-b").unwrap();

    let ack_a = coordinator
        .upload(upload("client-a", 1, vec![1.0, 1.0, 1.0]))
        .unwrap();
    assert_eq!(ack_a.status, "received");
    assert_eq!(ack_a.current_round, 1);

    let ack_b = coordinator
        .upload(upload("client-b", 1, vec![3.0, 3.0, 3.0]))
        .unwrap();
    assert_eq!(ack_b.current_round, 2);

    let contract = coordinator.sync(CODE).unwrap();
    assert_eq!(contract.round_id, 2);
    assert_eq!(contract.global_vector, [2.0, 2.0, 2.0]);
}

#[test]
fn duplicate_upload_replaces_instead_of_double_counting() {
    let coordinator = RoundCoordinator::new(small_config(2));
    coordinator.join(CODE, "client-a").unwrap();

    coordinator
        .upload(upload("client-a", 1, vec![1.0, 1.0, 1.0]))
        .unwrap();
    let ack = coordinator
        .upload(upload("client-a", 1, vec![3.0, 3.0, 3.0]))
        .unwrap();

    // Same client twice: still one pending contribution, no aggregation.
    assert_eq!(ack.current_round, 1);

    coordinator
        .upload(upload("client-b", 1, vec![3.0, 3.0, 3.0]))
        .unwrap();

    // Mean of the replacement and b's update, not of three vectors.
    let contract = coordinator.sync(CODE).unwrap();
    assert_eq!(contract.global_vector, [3.0, 3.0, 3.0]);
}

#[test]
fn contribution_from_before_aggregation_is_not_carried_over() {
    let coordinator = RoundCoordinator::new(small_config(3));
    coordinator.join(CODE, "client-a").unwrap();

    for (client, v) in [("client-a", 1.0), ("client-b", 2.0), ("client-c", 6.0)] {
        coordinator.upload(upload(client, 1, vec![v, v, v])).unwrap();
    }

    let contract = coordinator.sync(CODE).unwrap();
    assert_eq!(contract.round_id, 2);
    assert_eq!(contract.global_vector, [3.0, 3.0, 3.0]);

    // Round 2 starts from an empty pending set: one more upload from
    // client-a must not tip quorum with leftovers from round 1.
    let ack = coordinator
        .upload(upload("client-a", 2, vec![9.0, 9.0, 9.0]))
        .unwrap();
    assert_eq!(ack.current_round, 2);
}

#[test]
fn stale_round_upload_is_accepted_into_the_current_round() {
    let coordinator = RoundCoordinator::new(small_config(2));
    coordinator.join(CODE, "client-a").unwrap();

    coordinator
        .upload(upload("client-a", 1, vec![1.0, 1.0, 1.0]))
        .unwrap();
    coordinator
        .upload(upload("client-b", 1, vec![3.0, 3.0, 3.0]))
        .unwrap();

    // client-c still believes round 1 is current; its update counts toward
    // round 2 anyway.
    let ack = coordinator
        .upload(upload("client-c", 1, vec![5.0, 5.0, 5.0]))
        .unwrap();
    assert_eq!(ack.current_round, 2);

    coordinator
        .upload(upload("client-d", 2, vec![7.0, 7.0, 7.0]))
        .unwrap();
    let contract = coordinator.sync(CODE).unwrap();
    assert_eq!(contract.round_id, 3);
    assert_eq!(contract.global_vector, [6.0, 6.0, 6.0]);
}

#[test]
fn concurrent_uploads_trigger_exactly_one_aggregation() {
    const CLIENTS: usize = 4;

    let coordinator = Arc::new(RoundCoordinator::new(small_config(CLIENTS)));
    coordinator.join(CODE, "client-0").unwrap();

    thread::scope(|scope| {
        for i in 0..CLIENTS {
            let coordinator = Arc::clone(&coordinator);
            scope.spawn(move || {
                let v = i as f32;
                coordinator
                    .upload(upload(&format!("client-{i}"), 1, vec![v, v, v]))
                    .unwrap();
            });
        }
    });

    // N distinct clients with N == quorum: one aggregation, not zero, not
    // two, regardless of arrival interleaving.
    let contract = coordinator.sync(CODE).unwrap();
    assert_eq!(contract.round_id, 2);
    assert_eq!(contract.global_vector, [1.5, 1.5, 1.5]);
}
