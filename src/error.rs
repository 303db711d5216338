//! Error types.
//!
//! | Error | Raised by | Recovery |
//! |-------|-----------|----------|
//! | `InvalidConfiguration` | any entry point, before random work | fix inputs |
//! | `GenerationFailed` | one generation attempt | orchestrator retries |
//! | `ExhaustedTrials` | orchestrator | terminal, no schedule |
//! | `SelectionExhausted` | selector | non-fatal, partial selection |

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias for rota operations.
pub type Result<T> = std::result::Result<T, RotaError>;

/// Errors produced while building, checking, or exporting a rota.
#[derive(Debug, Error)]
pub enum RotaError {
    /// Inputs that can never produce a valid rota.
    #[error("invalid configuration: {}", join_messages(.0))]
    InvalidConfiguration(Vec<ValidationError>),

    /// One generation attempt failed.
    #[error("generation failed: {0}")]
    GenerationFailed(#[from] GenerationFailure),

    /// Every trial failed.
    #[error("no valid schedule found after {trials} trials")]
    ExhaustedTrials { trials: usize },

    /// A finished rota failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Why a single generation attempt failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationFailure {
    /// The block resampling budget ran out before the pools drained.
    #[error("exceeded {max_iter} iterations with {remaining} posts unassigned")]
    IterationsExhausted { max_iter: usize, remaining: usize },

    /// The drained schedule did not pass validation.
    #[error("schedule rejected: {0}")]
    Rejected(ValidationError),
}

/// Queue/beyond selection ran out of iterations.
///
/// Non-fatal: the selection keeps every block committed before the
/// budget ran out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "queue/beyond selection stopped after {iterations} iterations \
     ({completed_blocks} of {eligible_blocks} full blocks selected); \
     try lowering num_queue/num_beyond or raising num_writes"
)]
pub struct SelectionExhausted {
    /// Iterations spent.
    pub iterations: usize,
    /// Full blocks that received a selection.
    pub completed_blocks: usize,
    /// Full blocks in the schedule.
    pub eligible_blocks: usize,
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
