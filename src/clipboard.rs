//! Clipboard backed by the platform's copy command

use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

use feedbackkit_core::{Clipboard, FeedbackError};

/// Copy commands tried in order, with their arguments
const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// Pipes text into the first copy command that succeeds
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    candidates: Vec<(String, Vec<String>)>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            candidates: CANDIDATES
                .iter()
                .map(|(program, args)| {
                    (
                        (*program).to_string(),
                        args.iter().map(|a| (*a).to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Use a specific command list instead of the platform defaults
    #[must_use]
    pub fn with_commands(candidates: Vec<(String, Vec<String>)>) -> Self {
        Self { candidates }
    }

    fn try_command(program: &str, args: &[String], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        Ok(child.wait()?.success())
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), FeedbackError> {
        for (program, args) in &self.candidates {
            match Self::try_command(program, args, text) {
                Ok(true) => {
                    debug!(program = %program, "Copied to clipboard");
                    return Ok(());
                }
                Ok(false) => debug!(program = %program, "Clipboard command exited with failure"),
                Err(err) => debug!(program = %program, error = %err, "Clipboard command unavailable"),
            }
        }

        let tried: Vec<&str> = self.candidates.iter().map(|(p, _)| p.as_str()).collect();
        Err(FeedbackError::Clipboard(format!(
            "no clipboard command succeeded (tried {})",
            tried.join(", ")
        )))
    }
}
