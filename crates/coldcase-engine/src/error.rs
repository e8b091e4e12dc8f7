use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("extraction error: {0}")]
    Extract(#[from] coldcase_core::ExtractError),
    #[error("store error: {0}")]
    Store(#[from] coldcase_store::Error),
}
