//! Line dispatch.
//!
//! `Shell::execute` is the single place where command errors are caught:
//! they are printed as `Error: <message>` and the shell keeps going.

use std::sync::Arc;

use webos_http::{GitHubClient, HttpExecutor};
use webos_vfs::{FileSystem, HistoryLog};

use crate::commands::{self, Flow};
use crate::error::{Result, ShellError};
use crate::io::Output;
use crate::session::Session;

/// Collaborators shared by every command.
pub struct Services {
    pub fs: FileSystem,
    pub executor: Arc<dyn HttpExecutor>,
    pub github: GitHubClient,
}

/// What one submitted line produced.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Lines printed while the command ran, in order.
    pub outputs: Vec<Output>,
    pub exit: bool,
}

pub struct Shell {
    services: Services,
    session: Session,
}

impl Shell {
    /// Build a shell whose history is persisted next to the file system.
    pub async fn open(
        fs: FileSystem,
        executor: Arc<dyn HttpExecutor>,
        github_api: &str,
    ) -> Result<Shell> {
        let history = HistoryLog::load(fs.backend().clone()).await?;
        Self::with_history(fs, executor, github_api, history)
    }

    pub fn with_history(
        fs: FileSystem,
        executor: Arc<dyn HttpExecutor>,
        github_api: &str,
        history: HistoryLog,
    ) -> Result<Shell> {
        let github = GitHubClient::new(executor.clone(), github_api)?;
        Ok(Shell {
            services: Services {
                fs,
                executor,
                github,
            },
            session: Session::new(history),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn file_system(&self) -> &FileSystem {
        &self.services.fs
    }

    /// The history log whose cursor drives arrow-key recall.
    pub fn history_mut(&mut self) -> &mut HistoryLog {
        self.session.history_mut()
    }

    /// Run one input line.
    ///
    /// Blank lines only reset the recall cursor. Every other line is
    /// recorded in the history whether or not the command succeeded.
    pub async fn execute(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            self.session.history_mut().reset_cursor();
            return Outcome::default();
        }

        let exit = match self.dispatch(line).await {
            Ok(flow) => flow == Flow::Exit,
            Err(e) => {
                match &e {
                    ShellError::Http(http) if http.is_network() => {
                        log::warn!("Network request failed: {}", http)
                    }
                    _ => log::debug!("Command '{}' failed: {:?}", line, e),
                }
                self.session.print_error(&e);
                false
            }
        };

        if let Err(e) = self.session.history_mut().record(line).await {
            log::warn!("Could not record history: {}", e);
        }

        Outcome {
            outputs: self.session.take_printed(),
            exit,
        }
    }

    async fn dispatch(&mut self, line: &str) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = words.collect();

        let Some(spec) = commands::lookup(name) else {
            self.session.print(format!("Unknown command: {}", name));
            return Ok(Flow::Continue);
        };
        if !spec.accepts(args.len()) {
            return Err(ShellError::Usage { usage: spec.usage });
        }

        commands::run(spec.command, &self.services, &mut self.session, &args).await
    }
}
