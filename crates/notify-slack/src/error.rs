use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::slack::ClientError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a notification run can fail. All of them end the process.
#[derive(Debug, Error)]
pub enum Error {
    // configuration
    #[error("missing required env.var: '{0}'")]
    MissingEnv(&'static str),

    #[error("missing Slack channel")]
    MissingChannel,

    #[error("missing Slack token")]
    MissingToken,

    #[error("error parsing env.var 'FAIL': invalid boolean '{0}'")]
    InvalidFail(String),

    #[error("error creating timestamp file directory '{}': {source}", path.display())]
    TimestampDir { path: PathBuf, source: io::Error },

    #[error("error reading timestamp file '{}': {source}", path.display())]
    ReadTimestamp { path: PathBuf, source: io::Error },

    #[error("error writing timestamp file '{}': {source}", path.display())]
    WriteTimestamp { path: PathBuf, source: io::Error },

    #[error("error writing output file '{}': {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error("error creating Slack client: {0}")]
    Client(#[source] ClientError),

    // input
    #[error("error reading file '{}': {source}", path.display())]
    ReadAttachments { path: PathBuf, source: io::Error },

    #[error("invalid JSON file '{}': {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    // transport
    #[error("error sending message: {0}")]
    Send(#[source] ClientError),

    #[error("error updating message: {0}")]
    Update(#[source] ClientError),
}
