use folha_core::CoreError;
use folha_sheets::SheetError;
use folha_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),
}
