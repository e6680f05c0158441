//! Particle-reload tests: unindexed files and cross-name reuse.

mod common;

use common::{file_names, scratch_env, CallLog, TextBody};
use sphio_core::{CheckpointError, ReloadParticleIo};

#[test]
fn layout_written_under_override_name_seeds_a_fresh_body() {
    let (_dir, env) = scratch_env();
    let relaxed = TextBody::new("A", &[0.5, 1.5, 2.5]);
    let writer = ReloadParticleIo::with_name(env.clone(), &relaxed, "Ashape");
    writer.write_to_file(&[&relaxed], 0).unwrap();

    assert_eq!(file_names(&env.reload_folder), vec!["Ashape_rld.xml"]);

    let mut fresh = TextBody::new("A", &[]);
    let reader = ReloadParticleIo::with_name(env, &fresh, "Ashape");
    reader.read_from_file(&mut [&mut fresh], 0).unwrap();
    assert_eq!(fresh.state, vec![0.5, 1.5, 2.5]);
}

#[test]
fn iteration_step_does_not_enter_the_file_name() {
    let (_dir, env) = scratch_env();
    let a = TextBody::new("A", &[1.0]);
    let b = TextBody::new("B", &[2.0]);
    let reload = ReloadParticleIo::new(env.clone(), &[&a, &b]);

    reload.write_to_file(&[&a, &b], 10).unwrap();
    let a = TextBody::new("A", &[3.0]);
    reload.write_to_file(&[&a, &b], 20).unwrap();

    assert_eq!(file_names(&env.reload_folder), vec!["A_rld.xml", "B_rld.xml"]);

    let mut a2 = TextBody::new("A", &[]);
    let mut b2 = TextBody::new("B", &[]);
    reload.read_from_file(&mut [&mut a2, &mut b2], 12345).unwrap();
    assert_eq!(a2.state, vec![3.0]);
    assert_eq!(b2.state, vec![2.0]);
}

#[test]
fn single_uses_own_name() {
    let (_dir, env) = scratch_env();
    let body = TextBody::new("Tank", &[1.0]);
    let reload = ReloadParticleIo::single(env.clone(), &body);
    let paths: Vec<_> = reload.file_paths().map(|p| p.to_path_buf()).collect();
    assert_eq!(paths, vec![env.reload_folder.join("Tank_rld.xml")]);
}

#[test]
fn missing_layout_is_reported_before_any_body_changes() {
    let (_dir, env) = scratch_env();
    let log = CallLog::default();
    let a = TextBody::new("A", &[1.0]).with_log(&log);
    let b = TextBody::new("B", &[2.0]).with_log(&log);
    let only_a = ReloadParticleIo::new(env.clone(), &[&a]);
    only_a.write_to_file(&[&a], 0).unwrap();

    let both = ReloadParticleIo::new(env.clone(), &[&a, &b]);
    let mut a2 = TextBody::new("A", &[9.0]).with_log(&log);
    let mut b2 = TextBody::new("B", &[9.0]).with_log(&log);
    let err = both.read_from_file(&mut [&mut a2, &mut b2], 0).unwrap_err();

    match err {
        CheckpointError::MissingSnapshot { path } => {
            assert_eq!(path, env.reload_folder.join("B_rld.xml"));
        }
        other => panic!("expected MissingSnapshot, got {other:?}"),
    }
    assert_eq!(a2.state, vec![9.0]);
    assert!(!log.borrow().iter().any(|c| c.starts_with("read_reload")));
}

#[test]
fn reading_into_a_differently_named_body_is_rejected() {
    let (_dir, env) = scratch_env();
    let a = TextBody::new("A", &[1.0]);
    let reload = ReloadParticleIo::single(env, &a);
    reload.write_to_file(&[&a], 0).unwrap();

    let mut other = TextBody::new("Other", &[]);
    let err = reload.read_from_file(&mut [&mut other], 0).unwrap_err();
    assert!(matches!(err, CheckpointError::BodyNameMismatch { .. }));
}
