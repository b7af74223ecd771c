//! System clipboard sink
//!
//! The clipboard is a process-external shared resource: the last writer wins
//! and nothing is read back.
//!
//! On Linux (X11 and Wayland) clipboard content is served by the process that
//! owns it and vanishes when that process exits. The CLI therefore hands the
//! text to a detached copy of itself running the hidden `hold-clipboard`
//! subcommand, which keeps serving it until another application takes over.

#[cfg(target_os = "linux")]
use std::io::Write;
#[cfg(target_os = "linux")]
use std::path::Path;
#[cfg(target_os = "linux")]
use std::process::{Command, Stdio};
use thiserror::Error;

/// Name of the hidden subcommand that keeps serving clipboard text
pub const HOLD_SUBCOMMAND: &str = "hold-clipboard";

/// Clipboard failure
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write clipboard: {0}")]
    Write(String),
}

/// Destination for the formatted references
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

fn open() -> Result<arboard::Clipboard, ClipboardError> {
    arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
}

fn write_error(error: impl std::fmt::Display) -> ClipboardError {
    ClipboardError::Write(error.to_string())
}

/// Clipboard of the current desktop session, via arboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = open()?;
        clipboard.set_text(text.to_string()).map_err(write_error)?;

        #[cfg(target_os = "linux")]
        spawn_holder(text)?;

        Ok(())
    }
}

/// Serve `text` as clipboard content until another application replaces it.
///
/// Blocks on Linux; returns right after writing elsewhere.
pub fn hold(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = open()?;
    serve(&mut clipboard, text)
}

#[cfg(target_os = "linux")]
fn serve(clipboard: &mut arboard::Clipboard, text: &str) -> Result<(), ClipboardError> {
    use arboard::SetExtLinux;
    clipboard.set().wait().text(text.to_string()).map_err(write_error)
}

#[cfg(not(target_os = "linux"))]
fn serve(clipboard: &mut arboard::Clipboard, text: &str) -> Result<(), ClipboardError> {
    clipboard.set_text(text.to_string()).map_err(write_error)
}

/// Detached invocation of `exe` that reads the text to hold from stdin
#[cfg(target_os = "linux")]
fn holder_command(exe: &Path) -> Command {
    use std::os::unix::process::CommandExt;

    let mut cmd = Command::new(exe);
    cmd.arg(HOLD_SUBCOMMAND)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    // detach from the caller's process group
    cmd.process_group(0);
    cmd
}

#[cfg(target_os = "linux")]
fn spawn_holder(text: &str) -> Result<(), ClipboardError> {
    let exe = std::env::current_exe().map_err(write_error)?;
    let mut child = holder_command(&exe).spawn().map_err(write_error)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).map_err(write_error)?;
    }
    Ok(())
}

/// Sink that collects writes in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub writes: Vec<String>,
}

#[cfg(test)]
impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.push(text.to_string());
        Ok(())
    }
}
