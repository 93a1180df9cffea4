//! Error taxonomy for harness runs
//!
//! Degenerate text (empty strings) is never an error: the metrics define
//! numeric results for it. Only collaborator and I/O failures surface here.

use thiserror::Error;

/// Which collaborator a generator error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorRole {
    /// Model A, produces S_t from the carried state
    A,
    /// Model B, resurfaces and corrects
    B,
}

impl std::fmt::Display for GeneratorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorRole::A => write!(f, "model A"),
            GeneratorRole::B => write!(f, "model B"),
        }
    }
}

/// Root error type for harness failures
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A generator collaborator failed; the run is aborted
    #[error("generator error ({role}): {message}")]
    Generator { role: GeneratorRole, message: String },

    /// Invalid configuration or unreadable config source
    #[error("config error: {0}")]
    Config(String),

    /// Writing an event to the sink failed
    #[error("emit error: {0}")]
    Emit(#[from] std::io::Error),

    /// Encoding an event failed
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HarnessError {
    /// Build a generator failure without a known role yet
    ///
    /// The loop re-tags it with the role of the collaborator that raised it.
    pub fn generator(message: impl Into<String>) -> Self {
        HarnessError::Generator {
            role: GeneratorRole::A,
            message: message.into(),
        }
    }

    pub(crate) fn with_role(self, role: GeneratorRole) -> Self {
        match self {
            HarnessError::Generator { message, .. } => HarnessError::Generator { role, message },
            other => other,
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;

// =============================================================================
// TESTS
// =============================================================================
