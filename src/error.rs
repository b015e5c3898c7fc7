use std::path::PathBuf;

use thiserror::Error;

use crate::nav::tree::NodeId;

/// Failures reported by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed records in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {kind} record with id {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

/// Failures that end a game session early.
#[derive(Debug, Error)]
pub enum GameError {
    /// The catalog has nothing playable for a level (no level record, no
    /// category, no question, or a question without a correct answer).
    #[error("missing game content: {0}")]
    MissingContent(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("console failure: {0}")]
    Console(#[from] std::io::Error),
}

/// Stage of a navigation step in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BuildView,
    RunView,
    Process,
    Confirm,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::BuildView => "building view",
            Stage::RunView => "running view",
            Stage::Process => "processing result",
            Stage::Confirm => "confirming close",
        };
        f.write_str(name)
    }
}

/// A navigation step failed; the walk is abandoned and this is handed back
/// to whoever started it.
#[derive(Debug, Error)]
#[error("navigation failed at node {node} while {stage}: {cause:#}")]
pub struct NavError {
    pub node: NodeId,
    pub stage: Stage,
    pub cause: anyhow::Error,
}
