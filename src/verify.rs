use std::ffi::OsString;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::keyring::EphemeralKeyring;
use crate::runner::{GpgCommand, GpgRunner};
use crate::types::{KeySource, SignatureMode, VerificationRequest};

/// Verifies signatures against a keyring built fresh for every call.
///
/// # Example
///
/// ```no_run
/// use keyring_verify::{KeySource, VerificationRequest, Verifier};
///
/// # async fn example() -> keyring_verify::Result<()> {
/// let verifier = Verifier::new();
/// let request = VerificationRequest::new(
///     "SHA256SUMS",
///     KeySource::from_key_ids(["ABAF11C65A2970B130ABE3C479BE3E4300411886"])
///         .with_keyserver("hkps://keyserver.ubuntu.com"),
/// )
/// .with_signature("SHA256SUMS.sig");
///
/// assert!(verifier.verify(&request).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Verifier<R = GpgCommand> {
    config: Config,
    runner: R,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier {
    /// Creates a verifier that runs `gpg` with the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let runner = GpgCommand::new(&config);
        Self { config, runner }
    }
}

impl<R: GpgRunner> Verifier<R> {
    /// Creates a verifier that invokes gpg through `runner`.
    #[must_use]
    pub fn with_runner(config: Config, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds an ephemeral keyring with this verifier's runner and config.
    pub async fn create_keyring(&self, source: &KeySource) -> Result<EphemeralKeyring> {
        EphemeralKeyring::create(&self.runner, &self.config, source).await
    }

    /// Verifies `request.signed_file` against the keys in `request.keys`.
    ///
    /// Returns `Ok(true)` when gpg accepts the signature. A non-zero gpg exit
    /// is [`Error::Verification`] carrying gpg's output, whether the signature
    /// was bad or gpg failed for another reason. Keyring errors are returned
    /// unchanged and no verification is attempted.
    ///
    /// The keyring directory is removed before this returns, on every path.
    pub async fn verify(&self, request: &VerificationRequest) -> Result<bool> {
        let keyring = self.create_keyring(&request.keys).await?;

        let result = self.run_verify(&keyring, request).await;

        let path = keyring.path().to_path_buf();
        if let Err(err) = keyring.close() {
            warn!(path = %path.display(), error = %err, "failed to remove ephemeral keyring");
        }

        result
    }

    /// Verifies `signed_file` given the request as flat arguments.
    ///
    /// An empty `signature_file` selects inline verification; an empty
    /// `keyserver` leaves gpg's default keyserver in place.
    pub async fn verify_file<S: AsRef<str>>(
        &self,
        signed_file: impl AsRef<Path>,
        signature_file: impl AsRef<Path>,
        keyids: &[S],
        keyserver: &str,
    ) -> Result<bool> {
        let keys = KeySource::from_key_ids(keyids.iter().map(|k| k.as_ref()))
            .with_keyserver(keyserver);
        let request = VerificationRequest::new(signed_file.as_ref(), keys)
            .with_signature(signature_file.as_ref());
        self.verify(&request).await
    }

    async fn run_verify(
        &self,
        keyring: &EphemeralKeyring,
        request: &VerificationRequest,
    ) -> Result<bool> {
        let mode = request.mode();
        let args = verify_args(keyring, mode, &request.signed_file);

        debug!(
            detached = matches!(mode, SignatureMode::Detached(_)),
            file = %request.signed_file.display(),
            "verifying signature"
        );

        let output = self.runner.run(args).await?;
        if !output.success() {
            return Err(Error::Verification {
                status: output.status(),
                output: output.diagnostic(),
            });
        }

        Ok(true)
    }
}

fn verify_args(
    keyring: &EphemeralKeyring,
    mode: SignatureMode<'_>,
    signed_file: &Path,
) -> Vec<OsString> {
    let mut args = keyring.homedir_args();
    args.push("--keyring".into());
    args.push(keyring.artifact().into());
    args.push("--verify".into());
    if let SignatureMode::Detached(signature) = mode {
        args.push(signature.into());
    }
    args.push(signed_file.into());
    args
}
