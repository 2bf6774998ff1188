//! Error types for the job engine and its data loaders.

use std::path::PathBuf;

use thiserror::Error;

use crate::job::ObjectiveKind;

/// Errors raised while building, assigning or running jobs.
///
/// Objective evaluation failures (out of range, wrong vehicle state, not enough
/// progress) are not errors; they surface as `false` from the check path.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("objective kind {0:?} is not supported yet")]
    UnsupportedObjectiveKind(ObjectiveKind),

    #[error("unknown skill '{skill}'")]
    UnknownSkill { skill: String },

    #[error("word dictionary is empty")]
    EmptyDictionary,

    #[error("player {player_id} already has job '{job}'")]
    JobAlreadyAssigned { player_id: String, job: String },

    #[error("job template '{0}' not found")]
    UnknownTemplate(String),

    #[error("job '{0}' has no objectives")]
    EmptyJob(String),

    #[error("invalid objective {index} in job '{job}': {reason}")]
    InvalidObjective {
        job: String,
        index: usize,
        reason: String,
    },
}

/// Errors raised while loading configuration and data files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Job(#[from] JobError),
}
