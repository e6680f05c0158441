//! Body-state recording tests.

mod common;

use common::{file_names, scratch_env, CallLog, TextBody};
use sphio_core::{BodyStatesRecording, CheckpointError};

#[test]
fn time_token_is_microsecond_index() {
    let (_dir, env) = scratch_env();
    let a = TextBody::new("A", &[1.0]);
    let recording = BodyStatesRecording::single(env.clone(), &a);

    let paths = recording.write_to_file(&[&a], 0.25).unwrap();

    assert_eq!(paths, vec![env.state_recording_folder.join("A_250000.vtp")]);
}

#[test]
fn step_token_is_padded_step() {
    let (_dir, env) = scratch_env();
    let log = CallLog::default();
    let a = TextBody::new("A", &[1.0]).with_log(&log);
    let b = TextBody::new("B", &[2.0]).with_log(&log);
    let recording = BodyStatesRecording::new(env.clone(), &[&a, &b]);

    recording.write_to_file_at(&[&a, &b], 42).unwrap();

    assert_eq!(
        file_names(&env.state_recording_folder),
        vec!["A_000042.vtp", "B_000042.vtp"]
    );
    assert_eq!(*log.borrow(), vec!["record:A", "record:B"]);
}

#[test]
fn history_accumulates_and_same_token_is_replaced() {
    let (_dir, env) = scratch_env();
    let a = TextBody::new("A", &[1.0]);
    let recording = BodyStatesRecording::single(env.clone(), &a);

    recording.write_to_file_at(&[&a], 1).unwrap();
    recording.write_to_file_at(&[&a], 2).unwrap();
    let changed = TextBody::new("A", &[5.0]);
    recording.write_to_file_at(&[&changed], 2).unwrap();

    let folder = &env.state_recording_folder;
    assert_eq!(file_names(folder), vec!["A_000001.vtp", "A_000002.vtp"]);
    let latest = std::fs::read_to_string(folder.join("A_000002.vtp")).unwrap();
    assert_eq!(latest.trim().parse::<f64>().unwrap(), 5.0);
}

#[test]
fn negative_time_has_no_token() {
    let (_dir, env) = scratch_env();
    let a = TextBody::new("A", &[1.0]);
    let recording = BodyStatesRecording::single(env.clone(), &a);

    let err = recording.write_to_file(&[&a], -1.0).unwrap_err();
    assert!(matches!(err, CheckpointError::InvalidTime { .. }));
    assert!(file_names(&env.state_recording_folder).is_empty());
}
