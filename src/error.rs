use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The OS refused to create the worker thread.
    #[error("failed to spawn scheduler worker: {0}")]
    SpawnWorker(#[from] io::Error),
}
