/// Convenience result type used across cyclecast.
pub type CycleResult<T> = Result<T, CycleError>;

/// Top-level error taxonomy.
///
/// The two stage failures ([`CycleError::BuildFailure`] and [`CycleError::CarryMismatch`]) are
/// fatal to a presentation run: the player stops at the failing stage and reports its name.
#[derive(thiserror::Error, Debug)]
pub enum CycleError {
    /// A stage could not construct its declared plan.
    #[error("stage '{stage}' build failed: {message}")]
    BuildFailure {
        /// Name of the failing stage.
        stage: String,
        /// What went wrong.
        message: String,
    },

    /// A stage referenced a carried entity that no earlier stage handed off to it.
    #[error("stage '{stage}' requires carried entity '{name}', which no prior stage carried")]
    CarryMismatch {
        /// Name of the failing stage.
        stage: String,
        /// Missing carried entity name.
        name: String,
    },

    /// Invalid user-provided configuration or descriptor data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while evaluating, rendering or encoding frames.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse failure classification, as surfaced to callers of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum FailureKind {
    /// See [`CycleError::BuildFailure`].
    BuildFailure,
    /// See [`CycleError::CarryMismatch`].
    CarryMismatch,
    /// See [`CycleError::Validation`].
    Validation,
    /// See [`CycleError::Evaluation`].
    Evaluation,
    /// See [`CycleError::Serde`].
    Serde,
    /// See [`CycleError::Other`].
    Other,
}

impl CycleError {
    /// Build a [`CycleError::BuildFailure`] value.
    pub fn build_failure(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BuildFailure {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Build a [`CycleError::CarryMismatch`] value.
    pub fn carry_mismatch(stage: impl Into<String>, name: impl Into<String>) -> Self {
        Self::CarryMismatch {
            stage: stage.into(),
            name: name.into(),
        }
    }

    /// Build a [`CycleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CycleError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`CycleError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Failure classification of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::BuildFailure { .. } => FailureKind::BuildFailure,
            Self::CarryMismatch { .. } => FailureKind::CarryMismatch,
            Self::Validation(_) => FailureKind::Validation,
            Self::Evaluation(_) => FailureKind::Evaluation,
            Self::Serde(_) => FailureKind::Serde,
            Self::Other(_) => FailureKind::Other,
        }
    }

    /// Name of the stage that failed, for stage failures.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::BuildFailure { stage, .. } | Self::CarryMismatch { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Attribute an error raised inside a stage's build step to that stage.
    ///
    /// Stage failures keep their kind (re-labelled with `stage` when they carry an empty name);
    /// anything else becomes a [`CycleError::BuildFailure`].
    pub(crate) fn into_build_failure(self, stage: &str) -> Self {
        match self {
            Self::CarryMismatch { stage: s, name } if s.is_empty() => {
                Self::carry_mismatch(stage, name)
            }
            Self::BuildFailure { stage: s, message } if s.is_empty() => {
                Self::build_failure(stage, message)
            }
            e @ (Self::CarryMismatch { .. } | Self::BuildFailure { .. }) => e,
            other => Self::build_failure(stage, other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
