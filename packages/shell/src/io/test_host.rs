//! In-memory `IoHost` for driving the REPL loop in tests.

use std::collections::VecDeque;

use super::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

#[derive(Debug)]
enum Queued {
    Line(String),
    Signal(Signal),
    Submit,
}

/// Test host with in-memory I/O buffers.
///
/// Lines, signals and submits are queued together and consumed one per
/// `wait_for_input`, in the order they were queued. A queued line is typed
/// and submitted in one go; `queue_submit` submits whatever the core last
/// put on the input line with `set_input`.
#[derive(Debug, Default)]
pub struct TestHost {
    queue: VecDeque<Queued>,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    buffer: String,
    recalled: Vec<String>,
    output_buffer: Vec<Output>,
    prompts: Vec<PromptConfig>,
    flush_count: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an input line to be returned by `read_input()`.
    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.queue.push_back(Queued::Line(line.into()));
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        for line in lines {
            self.queue_input(line);
        }
    }

    pub fn queue_signal(&mut self, signal: Signal) {
        self.queue.push_back(Queued::Signal(signal));
    }

    /// Queue an Enter press on the current input line.
    pub fn queue_submit(&mut self) {
        self.queue.push_back(Queued::Submit);
    }

    /// Get all output that was written.
    pub fn output(&self) -> &[Output] {
        &self.output_buffer
    }

    /// Output texts in order, excluding the banner.
    pub fn lines(&self) -> Vec<&str> {
        self.output_buffer
            .iter()
            .filter(|o| o.style != OutputStyle::Banner)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn output_with_style(&self, style: OutputStyle) -> Vec<&str> {
        self.output_buffer
            .iter()
            .filter(|o| o.style == style)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Error)
    }

    /// Every text the core put on the input line, oldest first.
    pub fn recalled(&self) -> &[String] {
        &self.recalled
    }

    /// Every prompt the core asked for, oldest first.
    pub fn prompts(&self) -> &[PromptConfig] {
        &self.prompts
    }

    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.prompts.last()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        match self.queue.pop_front() {
            Some(Queued::Line(line)) => {
                self.buffer.clear();
                self.pending_input = Some(InputLine { line });
            }
            Some(Queued::Submit) => {
                let line = std::mem::take(&mut self.buffer);
                self.pending_input = Some(InputLine { line });
            }
            Some(Queued::Signal(signal)) => self.pending_signal = Some(signal),
            // Nothing left to feed the loop; behave like a closed stdin.
            None => self.pending_signal = Some(Signal::Eof),
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.output_buffer.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.prompts.push(config);
        Ok(())
    }

    fn set_input(&mut self, text: &str) -> Result<(), IoError> {
        self.buffer = text.to_string();
        self.recalled.push(self.buffer.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flush_count += 1;
        Ok(())
    }
}
