use thiserror::Error;

use crate::source::SourceError;
use crate::ConditionError;

/// Unified error type covering loading, compilation and I/O.
///
/// Returned by [`host::run`](crate::host::run).
#[derive(Debug, Error)]
pub enum CondmatrixError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Condition(#[from] ConditionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
