//! Generator collaborators
//!
//! A generator maps one prompt to one text, synchronously. Any error it
//! returns aborts the run.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::types::{HarnessError, HarnessResult};
use crate::RESURFACE_PREFIX;

/// A text-generation function
pub trait Generator {
    fn generate(&mut self, prompt: &str) -> HarnessResult<String>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&mut self, prompt: &str) -> HarnessResult<String> {
        (**self).generate(prompt)
    }
}

impl<G: Generator + ?Sized> Generator for &mut G {
    fn generate(&mut self, prompt: &str) -> HarnessResult<String> {
        (**self).generate(prompt)
    }
}

/// Returns the prompt unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoGenerator;

impl Generator for EchoGenerator {
    fn generate(&mut self, prompt: &str) -> HarnessResult<String> {
        Ok(prompt.to_string())
    }
}

/// A perfect resurfacer: answers `Repeat exactly:\n<text>` with `<text>`
///
/// Prompts without the resurfacing prefix are echoed, so it also serves as
/// a correction model that returns the prompt verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct RepeatGenerator;

impl Generator for RepeatGenerator {
    fn generate(&mut self, prompt: &str) -> HarnessResult<String> {
        Ok(prompt
            .strip_prefix(RESURFACE_PREFIX)
            .unwrap_or(prompt)
            .to_string())
    }
}

/// Closure-backed generator, see [`from_fn`]
pub struct FnGenerator<F> {
    f: F,
}

impl<F> Generator for FnGenerator<F>
where
    F: FnMut(&str) -> HarnessResult<String>,
{
    fn generate(&mut self, prompt: &str) -> HarnessResult<String> {
        (self.f)(prompt)
    }
}

/// Wrap a closure as a generator
pub fn from_fn<F>(f: F) -> FnGenerator<F>
where
    F: FnMut(&str) -> HarnessResult<String>,
{
    FnGenerator { f }
}

/// Runs a shell command per call: prompt on stdin, output from stdout
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
    shell: String,
}

impl CommandGenerator {
    /// Run `command` through `sh -c`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            shell: "sh".to_string(),
        }
    }

    /// Use a different shell binary (must accept `-c`)
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Generator for CommandGenerator {
    fn generate(&mut self, prompt: &str) -> HarnessResult<String> {
        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| HarnessError::generator(format!("failed to spawn `{}`: {e}", self.command)))?;

        // Feed stdin from a separate thread so a chatty child cannot block us
        let writer = child.stdin.take().map(|mut stdin| {
            let input = prompt.to_owned();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| HarnessError::generator(format!("failed to run `{}`: {e}", self.command)))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // A child that exits without reading its input is not a failure
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(HarnessError::generator(format!(
                        "failed to write prompt to `{}`: {e}",
                        self.command
                    )))
                }
                Err(_) => {
                    return Err(HarnessError::generator(format!(
                        "prompt writer for `{}` panicked",
                        self.command
                    )))
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::generator(format!(
                "`{}` exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout).map_err(|e| {
            HarnessError::generator(format!("`{}` produced non-UTF-8 output: {e}", self.command))
        })?;
        debug!(command = %self.command, bytes = text.len(), "generator command finished");
        Ok(text)
    }
}

// =============================================================================
// TESTS
// =============================================================================
