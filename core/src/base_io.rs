//! Shared context for every writer and reader: the I/O environment and
//! the token rules derived from it. Performs no I/O itself.

use crate::{
    body::ParticleBody,
    config::IoEnvironment,
    error::{CheckpointError, CheckpointResult},
    naming::NamingScheme,
    types::{IterationStep, PhysicalTime},
};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct BaseIo {
    env:    IoEnvironment,
    naming: NamingScheme,
}

impl BaseIo {
    pub fn new(env: IoEnvironment) -> Self {
        let naming = env.naming();
        Self { env, naming }
    }

    pub fn env(&self) -> &IoEnvironment {
        &self.env
    }

    pub fn naming(&self) -> NamingScheme {
        self.naming
    }

    pub fn time_token(&self, time: PhysicalTime) -> CheckpointResult<String> {
        self.naming.time_token(time)
    }

    pub fn step_token(&self, step: IterationStep) -> String {
        self.naming.step_token(step)
    }
}

/// Verify that the bodies passed to a call are the ones bound at
/// construction, in the same order. Names must be unique: two bodies with
/// one name would share every file path.
pub(crate) fn check_bound<'a>(
    bound: &[String],
    actual: impl ExactSizeIterator<Item = &'a str>,
) -> CheckpointResult<()> {
    if bound.len() != actual.len() {
        return Err(CheckpointError::BodyCountMismatch {
            expected: bound.len(),
            actual:   actual.len(),
        });
    }
    for (expected, actual) in bound.iter().zip(actual) {
        if expected != actual {
            return Err(CheckpointError::BodyNameMismatch {
                expected: expected.clone(),
                actual:   actual.to_string(),
            });
        }
    }
    let mut seen = HashSet::with_capacity(bound.len());
    if let Some(dup) = bound.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(CheckpointError::DuplicateBody { name: dup.clone() });
    }
    Ok(())
}

pub(crate) fn names_of(bodies: &[&dyn ParticleBody]) -> Vec<String> {
    bodies.iter().map(|b| b.name().to_string()).collect()
}

/// Wrap a body capability failure with the body and path it concerned.
pub(crate) fn body_error(body: &str, path: &std::path::Path, source: anyhow::Error) -> CheckpointError {
    CheckpointError::Body {
        body:   body.to_string(),
        path:   path.to_path_buf(),
        source,
    }
}
