use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::Config;
use crate::error::Result;
use crate::types::CommandOutput;

/// Runs gpg with a prepared argument list.
///
/// [`GpgCommand`] spawns the real program. Tests substitute an
/// implementation that records arguments and returns scripted output.
///
/// An `Err` means the program could not be run at all; a program that ran
/// and failed is an `Ok` output with a non-zero code.
pub trait GpgRunner: Send + Sync {
    fn run(&self, args: Vec<OsString>) -> impl Future<Output = Result<CommandOutput>> + Send;
}

impl<R: GpgRunner> GpgRunner for &R {
    fn run(&self, args: Vec<OsString>) -> impl Future<Output = Result<CommandOutput>> + Send {
        (**self).run(args)
    }
}

/// Spawns the configured gpg binary with a fixed environment.
#[derive(Debug, Clone)]
pub struct GpgCommand {
    program: PathBuf,
    env: Vec<(OsString, OsString)>,
}

impl GpgCommand {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            program: config.gpg_program.clone(),
            env: config.env.clone(),
        }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.env_clear()
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for GpgCommand {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl GpgRunner for GpgCommand {
    async fn run(&self, args: Vec<OsString>) -> Result<CommandOutput> {
        let output = self.command(&args).output().await?;
        Ok(output.into())
    }
}
