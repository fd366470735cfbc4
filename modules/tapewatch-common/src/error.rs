use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("State persistence error: {0}")]
    Persist(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
