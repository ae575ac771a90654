//! Scripted [`GpgRunner`] for unit tests.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::sync::Mutex;

use crate::error::Result;
use crate::runner::GpgRunner;
use crate::types::CommandOutput;

pub(crate) enum Step {
    Exit(CommandOutput),
    /// Writes a keyring file to the `--output` argument, then exits 0.
    Export,
    /// The program cannot be started.
    Missing,
}

pub(crate) fn ok() -> Step {
    Step::Exit(CommandOutput {
        code: Some(0),
        ..CommandOutput::default()
    })
}

pub(crate) fn exported() -> Step {
    Step::Export
}

pub(crate) fn failed(code: i32, stderr: &str) -> Step {
    Step::Exit(CommandOutput {
        code: Some(code),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    })
}

pub(crate) fn missing() -> Step {
    Step::Missing
}

/// Replays one [`Step`] per call and records every argument list.
pub(crate) struct ScriptedRunner {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub(crate) fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl GpgRunner for ScriptedRunner {
    async fn run(&self, args: Vec<OsString>) -> Result<CommandOutput> {
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.calls.lock().unwrap().push(args.clone());

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected gpg call: {args:?}"));

        match step {
            Step::Exit(output) => Ok(output),
            Step::Export => {
                let pos = args.iter().position(|a| a == "--output").unwrap();
                std::fs::write(&args[pos + 1], b"exported keyring").unwrap();
                Ok(CommandOutput {
                    code: Some(0),
                    ..CommandOutput::default()
                })
            }
            Step::Missing => Err(io::Error::from(io::ErrorKind::NotFound).into()),
        }
    }
}
