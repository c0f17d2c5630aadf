//! Platform-independent REPL core.
//!
//! The loop talks to the user only through an `IoHost` and awaits each
//! command before reading the next line.

use std::sync::Arc;

use webos_http::{HttpExecutor, ReqwestExecutor};
use webos_vfs::{Backend, FileSystem, JsonDiskBackend, MemoryBackend};

use crate::config::ShellConfig;
use crate::error::Result;
use crate::host::TerminalHost;
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal};
use crate::shell::Shell;

pub struct ReplCore {
    shell: Shell,
}

impl ReplCore {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    /// Run the REPL loop, reading/writing through the provided I/O host.
    pub async fn run(&mut self, io: &mut impl IoHost) -> std::result::Result<ExitReason, IoError> {
        io.write_output(Output::banner(BANNER))?;

        loop {
            self.update_prompt(io)?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.write_output(Output::info("Goodbye!"))?;
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        self.shell.history_mut().reset_cursor();
                        io.write_output(Output::info("^C (use 'exit' to quit)"))?;
                        continue;
                    }
                    Signal::RecallPrevious => {
                        // At the oldest command the line is left as it is.
                        if let Some(command) = self.shell.history_mut().previous() {
                            io.set_input(command)?;
                        }
                        continue;
                    }
                    Signal::RecallNext => {
                        let command = self.shell.history_mut().next().unwrap_or("");
                        io.set_input(command)?;
                        continue;
                    }
                }
            }

            let input = match io.read_input()? {
                Some(input) => input,
                None => continue,
            };

            let outcome = self.shell.execute(&input.line).await;
            for output in outcome.outputs {
                io.write_output(output)?;
            }

            if outcome.exit {
                io.write_output(Output::info("Goodbye!"))?;
                io.flush()?;
                return Ok(ExitReason::UserExit);
            }

            io.flush()?;
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    fn update_prompt(&self, io: &mut impl IoHost) -> std::result::Result<(), IoError> {
        io.write_prompt(PromptConfig {
            current_path: self.shell.session().current_directory().to_string(),
        })
    }
}

const BANNER: &str = "Welcome to webos!\nType 'help' for a list of commands.";

/// Open the configured store and run an interactive terminal session.
pub async fn run(config: ShellConfig) -> Result<ExitReason> {
    let backend: Arc<dyn Backend> = match &config.data_dir {
        Some(dir) => {
            log::info!("Using store at {}", dir.display());
            Arc::new(JsonDiskBackend::create(dir.clone())?)
        }
        None => {
            log::info!("Using an in-memory store");
            Arc::new(MemoryBackend::new())
        }
    };

    let fs = FileSystem::open(backend).await?;
    for problem in fs.check().await? {
        log::warn!("Store inconsistency: {}", problem);
    }

    let executor: Arc<dyn HttpExecutor> = Arc::new(ReqwestExecutor::new(config.timeout)?);
    let shell = Shell::open(fs, executor, &config.github_api).await?;

    let mut host = TerminalHost::new(&config)?;
    let mut core = ReplCore::new(shell);
    Ok(core.run(&mut host).await?)
}
