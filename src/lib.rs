//! Verify GPG signatures against an ephemeral, per-call keyring.
//!
//! Every verification receives the trusted keys into a freshly created,
//! owner-only GPG home directory, exports them to a single keyring file and
//! runs `gpg --verify` against it. The directory is removed when the call
//! returns, so the user's default keyring is never read or modified.
//!
//! # Example
//!
//! ```no_run
//! use keyring_verify::Verifier;
//!
//! #[tokio::main]
//! async fn main() -> keyring_verify::Result<()> {
//!     let verifier = Verifier::new();
//!
//!     let valid = verifier
//!         .verify_file(
//!             "rootfs.tar.xz",
//!             "rootfs.tar.xz.asc",
//!             &["ABAF11C65A2970B130ABE3C479BE3E4300411886"],
//!             "hkps://keyserver.ubuntu.com",
//!         )
//!         .await?;
//!     println!("signature valid: {valid}");
//!
//!     Ok(())
//! }
//! ```
//!
//! An empty signature path verifies an inline-signed (clearsigned) file.
//!
//! # Requirements
//!
//! - `gpg` (1.x or 2.x) available on the configured `PATH`
//! - Network access to the keyserver when receiving keys by ID

mod config;
mod error;
mod expiry;
mod keyring;
mod runner;
#[cfg(test)]
mod testing;
mod types;
mod validation;
mod verify;

pub use config::Config;
pub use error::{Error, Result};
pub use expiry::{DurationTokens, DurationUnit, compute_expiry, duration_tokens, parse_duration};
pub use keyring::EphemeralKeyring;
pub use runner::{GpgCommand, GpgRunner};
pub use types::{CommandOutput, KeySource, KeyringStage, SignatureMode, VerificationRequest};
pub use validation::{validate_keyid, validate_keyids, validate_keyserver};
pub use verify::Verifier;
