use std::io;

use crate::types::KeyringStage;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("command execution failed: {0}")]
    Command(#[from] io::Error),

    #[error("failed to create keyring directory: {0}")]
    TempDir(#[source] io::Error),

    #[error("failed to {stage} keys (status {status}): {output}")]
    KeyringCreation {
        stage: KeyringStage,
        status: i32,
        output: String,
    },

    #[error("failed to verify (status {status}): {output}")]
    Verification { status: i32, output: String },

    #[error("invalid key ID '{keyid}': {reason}")]
    InvalidKeyId { keyid: String, reason: String },

    #[error("invalid keyserver '{keyserver}': {reason}")]
    InvalidKeyserver { keyserver: String, reason: String },
}

impl Error {
    /// Returns true if gpg ran and did not accept the signature.
    ///
    /// A rejected signature and a gpg failure after startup are reported
    /// identically; gpg's diagnostic output is the only distinction.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::Verification { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
