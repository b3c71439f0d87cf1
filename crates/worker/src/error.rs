use fitslot_core::error::CoreError;
use fitslot_db::StoreError;

/// Failure of a schedule service call.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// Domain rule violation or missing entity.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed or rejected a write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type WorkerResult<T> = Result<T, WorkerError>;
