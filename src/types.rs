use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),

    #[error("fixture error: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("malformed token entry: {0}")]
    Token(String),
}

pub type Result<T> = std::result::Result<T, Error>;
