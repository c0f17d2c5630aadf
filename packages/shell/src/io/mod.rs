//! I/O abstraction for the REPL.
//!
//! The REPL core interacts with its environment only through the `IoHost`
//! trait, so the same loop drives the terminal and the in-memory test host.

pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_host;

pub use types::*;

#[cfg(any(test, feature = "test-utils"))]
pub use test_host::TestHost;

/// Error type for I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

/// Host interface for REPL I/O operations.
pub trait IoHost {
    /// Wait for input to become available.
    ///
    /// After this returns, `read_input()` should return `Some(InputLine)` if
    /// input is ready, or `read_signal()` should return `Some(Signal)` if a
    /// signal was received.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// Read the next input line, if available.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// Read any pending signal (Ctrl+C, Ctrl+D).
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    /// Write output to the user.
    ///
    /// `OutputStyle::Clear` asks the host to wipe what it has displayed.
    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Update the prompt configuration.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    /// Replace the line being edited, e.g. with a recalled command.
    fn set_input(&mut self, text: &str) -> Result<(), IoError>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
