use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_GPG_PROGRAM: &str = "gpg";
const DEFAULT_DIR_PREFIX: &str = "keyring-verify.";
const DEFAULT_ARTIFACT_NAME: &str = "keyring.gpg";
const DEFAULT_PATH: &str = "/sbin:/bin:/usr/sbin:/usr/bin:/usr/local/sbin:/usr/local/bin";

/// Settings shared by every keyring and verification a [`Verifier`] runs.
///
/// Subprocesses never inherit the caller's environment: they start from an
/// empty one populated only with [`Config::env`].
///
/// [`Verifier`]: crate::Verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program invoked for receive, import, export and verify.
    pub gpg_program: PathBuf,
    /// Directory under which ephemeral keyrings are created.
    pub temp_root: PathBuf,
    /// Name prefix of each ephemeral keyring directory.
    pub dir_prefix: String,
    /// File name of the exported keyring inside the directory.
    pub artifact_name: String,
    /// Complete environment of every subprocess.
    pub env: Vec<(OsString, OsString)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gpg_program: PathBuf::from(DEFAULT_GPG_PROGRAM),
            temp_root: std::env::temp_dir(),
            dir_prefix: DEFAULT_DIR_PREFIX.to_string(),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            env: default_env(),
        }
    }
}

impl Config {
    /// Sets a subprocess environment variable, replacing any previous value.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        let key = key.into();
        self.env.retain(|(k, _)| *k != key);
        self.env.push((key, value.into()));
        self
    }
}

fn default_env() -> Vec<(OsString, OsString)> {
    [
        ("PATH", DEFAULT_PATH),
        ("SHELL", "/bin/sh"),
        ("TERM", "xterm"),
        ("LC_ALL", "C"),
    ]
    .into_iter()
    .map(|(k, v)| (OsString::from(k), OsString::from(v)))
    .collect()
}
