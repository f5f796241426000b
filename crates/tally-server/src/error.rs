use thiserror::Error;

use tally_backends::BackendError;
use tally_core::CoreError;

/// Terminal outcomes of a usage invocation.
///
/// Cache-layer failures never appear here: a persistent-store read failure
/// is downgraded to a miss and a write failure is logged and swallowed.
/// Only backend fetches are allowed to fail an invocation, since no stale
/// value is known to exist at that point.
#[derive(Debug, Error)]
pub enum UsageError {
    /// A paginated backend fetch failed.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),

    /// Snapshot assembly failed.
    #[error("internal error: {0}")]
    Internal(#[from] CoreError),
}
