//! Extractor backed by an external command
//!
//! The command receives the chunk on stdin and the intent slug in the
//! `CONNEXA_INTENT` environment variable, and prints the model answer on
//! stdout. Prompts and API keys stay with the command.

use std::io::{self, ErrorKind, Write};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

use tracing::debug;

use crate::types::Intent;

use super::{ExtractionError, Extractor};

/// Environment variable carrying the intent slug to the command
pub const INTENT_ENV: &str = "CONNEXA_INTENT";

/// Runs a configured program once per chunk
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
    intent: Intent,
}

impl CommandExtractor {
    pub fn new(program: impl Into<String>, args: Vec<String>, intent: Intent) -> Self {
        Self {
            program: program.into(),
            args,
            intent,
        }
    }

    /// Build from a whitespace-separated command line
    pub fn from_command_line(command_line: &str, intent: Intent) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect(), intent))
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }
}

impl Extractor for CommandExtractor {
    fn extract(&self, chunk: &str) -> Result<String, ExtractionError> {
        debug!(program = %self.program, intent = %self.intent, bytes = chunk.len(), "running extractor");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(INTENT_ENV, self.intent.slug())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is fed from its own thread while stdout is drained; the
        // child may exit without reading all of it
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || feed_stdin(stdin, chunk));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::new(ErrorKind::Other, "stdin writer panicked")));
            (output, written)
        });

        let output = output?;
        match written {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(program = %self.program, "extractor closed stdin early");
            }
            Err(e) => return Err(e.into()),
            Ok(()) => {}
        }

        if !output.status.success() {
            return Err(ExtractionError::NonZeroExit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| ExtractionError::InvalidOutput)?;
        Ok(text.trim().to_string())
    }
}

/// Write the whole chunk and close the pipe
fn feed_stdin(stdin: Option<ChildStdin>, chunk: &str) -> io::Result<()> {
    match stdin {
        Some(mut stdin) => stdin.write_all(chunk.as_bytes()),
        None => Ok(()),
    }
}
