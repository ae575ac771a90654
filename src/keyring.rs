use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::runner::GpgRunner;
use crate::types::{KeySource, KeyringStage};
use crate::validation::{validate_keyids, validate_keyserver};

/// A throwaway GPG home directory holding an exported keyring.
///
/// The directory is created with owner-only permissions under
/// [`Config::temp_root`] and gets a random name, so concurrent keyrings never
/// share a path. It is removed recursively when the value is dropped or
/// [`closed`](EphemeralKeyring::close); the caller's default keyring is never
/// read or written.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> keyring_verify::Result<()> {
/// use keyring_verify::{Config, EphemeralKeyring, GpgCommand, KeySource};
///
/// let config = Config::default();
/// let source = KeySource::from_key_ids(["ABAF11C65A2970B130ABE3C479BE3E4300411886"])
///     .with_keyserver("hkps://keyserver.ubuntu.com");
///
/// let keyring = EphemeralKeyring::create(&GpgCommand::new(&config), &config, &source).await?;
/// println!("exported to {}", keyring.artifact().display());
/// keyring.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EphemeralKeyring {
    dir: TempDir,
    artifact: PathBuf,
}

impl EphemeralKeyring {
    /// Creates a keyring directory, fills it from `source` and exports it.
    ///
    /// Keys are received from the keyserver first, then local key files are
    /// imported, then everything is exported to a single keyring file that
    /// both gpg 1.x and 2.x can read. Any failing step removes the directory
    /// before the error is returned.
    ///
    /// Keys are always received unless only key files were given, so an
    /// empty source reaches gpg and fails as a [`KeyringStage::Receive`]
    /// error carrying gpg's own diagnostic.
    pub async fn create<R: GpgRunner>(
        runner: &R,
        config: &Config,
        source: &KeySource,
    ) -> Result<Self> {
        let keyids = validate_keyids(&source.key_ids)?;
        let keyserver = source
            .keyserver
            .as_deref()
            .map(validate_keyserver)
            .transpose()?;

        let dir = create_private_dir(config).map_err(Error::TempDir)?;
        let keyring = Self {
            artifact: dir.path().join(&config.artifact_name),
            dir,
        };

        if !keyids.is_empty() || source.key_files.is_empty() {
            let mut args = keyring.homedir_args();
            if let Some(keyserver) = keyserver {
                args.push("--keyserver".into());
                args.push(keyserver.into());
            }
            args.push("--recv-keys".into());
            args.extend(keyids.into_iter().map(OsString::from));
            keyring.run_stage(runner, KeyringStage::Receive, args).await?;
        }

        if !source.key_files.is_empty() {
            let mut args = keyring.homedir_args();
            args.push("--import".into());
            args.extend(source.key_files.iter().map(OsString::from));
            keyring.run_stage(runner, KeyringStage::Import, args).await?;
        }

        let mut args = keyring.homedir_args();
        args.push("--export".into());
        args.push("--output".into());
        args.push(keyring.artifact.clone().into());
        keyring.run_stage(runner, KeyringStage::Export, args).await?;

        // gpg exits 0 with "nothing exported" when no requested key was found.
        if !is_non_empty_file(&keyring.artifact) {
            return Err(Error::KeyringCreation {
                stage: KeyringStage::Export,
                status: 0,
                output: format!("no keys exported to {}", keyring.artifact.display()),
            });
        }

        debug!(path = %keyring.path().display(), "created ephemeral keyring");
        Ok(keyring)
    }

    /// The GPG home directory backing this keyring.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The exported keyring file, to be passed as `--keyring`.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Removes the keyring directory, reporting any I/O error.
    ///
    /// Dropping the keyring also removes it but ignores errors.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }

    pub(crate) fn homedir_args(&self) -> Vec<OsString> {
        vec!["--homedir".into(), self.path().into()]
    }

    async fn run_stage<R: GpgRunner>(
        &self,
        runner: &R,
        stage: KeyringStage,
        args: Vec<OsString>,
    ) -> Result<()> {
        debug!(%stage, path = %self.path().display(), "running gpg");

        let output = runner.run(args).await?;
        if !output.success() {
            return Err(Error::KeyringCreation {
                stage,
                status: output.status(),
                output: output.diagnostic(),
            });
        }

        Ok(())
    }
}

fn create_private_dir(config: &Config) -> io::Result<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix(&config.dir_prefix)
        .tempdir_in(&config.temp_root)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(dir)
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}
