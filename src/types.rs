use std::path::{Path, PathBuf};

/// The gpg invocation that populates or exports an ephemeral keyring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum KeyringStage {
    /// `--recv-keys` from a keyserver.
    Receive,
    /// `--import` of local key files.
    Import,
    /// `--export` into the consolidated keyring file.
    Export,
}

impl std::fmt::Display for KeyringStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Self::Receive => "receive",
            Self::Import => "import",
            Self::Export => "export",
        };
        f.write_str(verb)
    }
}

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code for error reporting; `-1` when killed by a signal.
    #[must_use]
    pub fn status(&self) -> i32 {
        self.code.unwrap_or(-1)
    }

    /// Stdout and stderr joined into one trimmed, lossily-decoded string.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let stdout = String::from_utf8_lossy(&self.stdout);
        let stderr = String::from_utf8_lossy(&self.stderr);
        match (stdout.trim(), stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Where the keys of an ephemeral keyring come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySource {
    /// Key IDs or fingerprints to receive from the keyserver.
    pub key_ids: Vec<String>,
    /// Keyserver to receive from. `None` uses gpg's configured default.
    pub keyserver: Option<String>,
    /// Local public key files to import.
    pub key_files: Vec<PathBuf>,
}

impl KeySource {
    /// A source receiving `key_ids` from gpg's default keyserver.
    pub fn from_key_ids<I, S>(key_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_ids: key_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the keyserver. An empty string clears it.
    #[must_use]
    pub fn with_keyserver(mut self, keyserver: impl Into<String>) -> Self {
        let keyserver = keyserver.into();
        self.keyserver = (!keyserver.is_empty()).then_some(keyserver);
        self
    }

    #[must_use]
    pub fn with_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_files.push(path.into());
        self
    }
}

/// How gpg is asked to verify the signed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMode<'a> {
    /// The signature lives in a separate file.
    Detached(&'a Path),
    /// The signature is embedded in the signed file.
    Inline,
}

/// A file to verify and the keys to trust for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub signed_file: PathBuf,
    /// Detached signature. `None` or an empty path means inline.
    pub signature_file: Option<PathBuf>,
    pub keys: KeySource,
}

impl VerificationRequest {
    pub fn new(signed_file: impl Into<PathBuf>, keys: KeySource) -> Self {
        Self {
            signed_file: signed_file.into(),
            signature_file: None,
            keys,
        }
    }

    #[must_use]
    pub fn with_signature(mut self, signature_file: impl Into<PathBuf>) -> Self {
        self.signature_file = Some(signature_file.into());
        self
    }

    pub fn mode(&self) -> SignatureMode<'_> {
        match self.signature_file.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => SignatureMode::Detached(path),
            _ => SignatureMode::Inline,
        }
    }
}
