pub type RendererResult<T> = Result<T, RendererError>;

#[derive(thiserror::Error, Debug)]
pub enum RendererError {
    #[error("mount target not found: {0}")]
    TargetNotFound(String),

    #[error("element does not belong to this document")]
    UnknownElement,

    #[error("unknown percentage mode: {0}")]
    InvalidPercentage(String),

    #[error("status serialization error: {0}")]
    Status(#[from] serde_json::Error),
}
