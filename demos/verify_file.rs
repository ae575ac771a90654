//! Example: Verify a signed file against keys fetched into a throwaway keyring
//!
//! Run with:
//! cargo run --example verify_file -- <signed-file> <key-id>... \
//!     [--signature <file>] [--keyserver <addr>]

use keyring_verify::{KeySource, VerificationRequest, Verifier, compute_expiry};

const USAGE: &str =
    "usage: verify_file <signed-file> <key-id>... [--signature <file>] [--keyserver <addr>]";

/// Removes `--flag <value>` from `args`, returning the value.
fn take_flag(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    if pos + 1 >= args.len() {
        eprintln!("{flag} needs a value\n{USAGE}");
        std::process::exit(2);
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

#[tokio::main]
async fn main() -> keyring_verify::Result<()> {
    let mut args = std::env::args().skip(1).collect::<Vec<_>>();

    let signature_file = take_flag(&mut args, "--signature");
    let keyserver = take_flag(&mut args, "--keyserver").unwrap_or_default();

    let Some((signed_file, keyids)) = args.split_first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let keys = KeySource::from_key_ids(keyids.iter().cloned()).with_keyserver(keyserver);
    let mut request = VerificationRequest::new(signed_file, keys);
    if let Some(signature_file) = signature_file {
        request = request.with_signature(signature_file);
    }

    let verifier = Verifier::new();
    match verifier.verify(&request).await {
        Ok(_) => {
            let recheck = compute_expiry(chrono::Utc::now(), "1w");
            println!("{signed_file}: signature valid (recheck after {recheck})");
            Ok(())
        }
        Err(err) if err.is_rejected() => {
            println!("{signed_file}: NOT verified\n{err}");
            std::process::exit(1);
        }
        Err(err) => Err(err),
    }
}
