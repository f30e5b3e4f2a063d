use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollgateError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
