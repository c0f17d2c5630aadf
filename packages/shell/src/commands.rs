//! Shell commands.
//!
//! Commands:
//! - `help` - Show the command reference
//! - `mkdir <name>` / `touch <name>` - Create a directory / empty file
//! - `add <file> <content...>` - Append a line to a file
//! - `ls` - List the current directory
//! - `cat <name>` - Show a file, rendering `.md` files
//! - `rm <name>` - Delete a file or empty directory
//! - `clear` / `cls` - Clear the screen
//! - `cd <dir>` / `pwd` - Change / print the current directory
//! - `history` - List submitted commands
//! - `wget <url> <filename>` - Save a URL into a new file
//! - `clone <repo-url> [dir-name]` - Copy a GitHub repository
//! - `exit` / `quit` - Leave the REPL

use webos_http::{fetch_text, RepoUrl, TreeEntryKind};
use webos_vfs::EntryType;

use crate::error::{Result, ShellError};
use crate::markdown;
use crate::session::Session;
use crate::shell::Services;

/// What the REPL does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Mkdir,
    Touch,
    Add,
    Ls,
    Cat,
    Rm,
    Clear,
    Cd,
    Pwd,
    History,
    Wget,
    Clone,
    Exit,
}

/// A registry entry.
#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub command: Command,
    /// Required arguments; words past the ones a command reads are ignored.
    pub min_args: usize,
    pub usage: &'static str,
    pub summary: &'static str,
}

impl CommandSpec {
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args
    }
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        command: Command::Help,
        min_args: 0,
        usage: "help",
        summary: "Displays this list of commands.",
    },
    CommandSpec {
        name: "mkdir",
        command: Command::Mkdir,
        min_args: 1,
        usage: "mkdir <name>",
        summary: "Creates a new directory named <em>name</em>.",
    },
    CommandSpec {
        name: "touch",
        command: Command::Touch,
        min_args: 1,
        usage: "touch <name>",
        summary: "Creates a new empty file named <em>name</em>.",
    },
    CommandSpec {
        name: "add",
        command: Command::Add,
        min_args: 2,
        usage: "add <file> <content>",
        summary: "Appends <em>content</em> to <em>file</em> on a new line.",
    },
    CommandSpec {
        name: "ls",
        command: Command::Ls,
        min_args: 0,
        usage: "ls",
        summary: "Lists the contents of the current directory.",
    },
    CommandSpec {
        name: "cat",
        command: Command::Cat,
        min_args: 1,
        usage: "cat <name>",
        summary: "Displays a file. Markdown (<em>.md</em>) files are rendered.",
    },
    CommandSpec {
        name: "rm",
        command: Command::Rm,
        min_args: 1,
        usage: "rm <name>",
        summary: "Deletes a file or an empty directory.",
    },
    CommandSpec {
        name: "clear",
        command: Command::Clear,
        min_args: 0,
        usage: "clear",
        summary: "Clears the terminal screen (alias: cls).",
    },
    CommandSpec {
        name: "cls",
        command: Command::Clear,
        min_args: 0,
        usage: "cls",
        summary: "Clears the terminal screen.",
    },
    CommandSpec {
        name: "cd",
        command: Command::Cd,
        min_args: 1,
        usage: "cd <dir>",
        summary: "Changes the current directory; <em>cd ..</em> moves up.",
    },
    CommandSpec {
        name: "pwd",
        command: Command::Pwd,
        min_args: 0,
        usage: "pwd",
        summary: "Prints the current directory.",
    },
    CommandSpec {
        name: "history",
        command: Command::History,
        min_args: 0,
        usage: "history",
        summary: "Lists previously entered commands.",
    },
    CommandSpec {
        name: "wget",
        command: Command::Wget,
        min_args: 2,
        usage: "wget <url> <filename>",
        summary: "Saves the content of <em>url</em> to a new file <em>filename</em>.",
    },
    CommandSpec {
        name: "clone",
        command: Command::Clone,
        min_args: 1,
        usage: "clone <repo-url> [dir-name]",
        summary: "Copies a GitHub repository into a new directory.",
    },
    CommandSpec {
        name: "exit",
        command: Command::Exit,
        min_args: 0,
        usage: "exit",
        summary: "Leaves the shell (alias: quit).",
    },
    CommandSpec {
        name: "quit",
        command: Command::Exit,
        min_args: 0,
        usage: "quit",
        summary: "Leaves the shell.",
    },
];

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// The command reference printed by `help`.
pub fn format_help() -> String {
    let mut help = String::from("<strong>Available Commands:</strong><ul>");
    for spec in COMMANDS {
        // Aliases are mentioned in the summary of the primary name.
        if matches!(spec.name, "cls" | "quit") {
            continue;
        }
        help.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>",
            escape(spec.usage),
            spec.summary
        ));
    }
    help.push_str("</ul>");
    help
}

fn escape(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Run a command whose required arguments have already been checked.
pub async fn run(
    command: Command,
    services: &Services,
    session: &mut Session,
    args: &[&str],
) -> Result<Flow> {
    match command {
        Command::Help => session.print(format_help()),
        Command::Mkdir => mkdir(services, session, args[0]).await?,
        Command::Touch => touch(services, session, args[0]).await?,
        Command::Add => add(services, session, args[0], &args[1..]).await?,
        Command::Ls => ls(services, session).await?,
        Command::Cat => cat(services, session, args[0]).await?,
        Command::Rm => rm(services, session, args[0]).await?,
        Command::Clear => session.clear(),
        Command::Cd => cd(services, session, args[0]).await?,
        Command::Pwd => {
            let cwd = session.current_directory().to_string();
            session.print(cwd);
        }
        Command::History => history(session),
        Command::Wget => wget(services, session, args[0], args[1]).await?,
        Command::Clone => clone(services, session, args[0], args.get(1).copied()).await?,
        Command::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

async fn mkdir(services: &Services, session: &mut Session, name: &str) -> Result<()> {
    let path = session.resolve(name)?;
    if services.fs.exists(&path).await? {
        return Err(ShellError::PathExists);
    }
    services.fs.create_directory(&path).await?;
    session.print(format!("Directory '{}' created.", name));
    Ok(())
}

async fn touch(services: &Services, session: &mut Session, name: &str) -> Result<()> {
    let path = session.resolve(name)?;
    if services.fs.exists(&path).await? {
        return Err(ShellError::PathExists);
    }
    services.fs.create_file(&path, "").await?;
    session.print(format!("File '{}' created.", name));
    Ok(())
}

async fn add(services: &Services, session: &mut Session, file: &str, words: &[&str]) -> Result<()> {
    let path = session.resolve(file)?;
    if !services.fs.exists(&path).await? {
        return Err(ShellError::FileMissing);
    }
    let mut content = services.fs.read_file(&path).await?;
    content.push('\n');
    content.push_str(&words.join(" "));
    services.fs.write_file(&path, &content).await?;
    session.print(format!("Content added to '{}'", file));
    Ok(())
}

async fn ls(services: &Services, session: &mut Session) -> Result<()> {
    let children = services
        .fs
        .list_directory(session.current_directory())
        .await?;
    if children.is_empty() {
        session.print("Directory is empty.");
    } else {
        let names: Vec<&str> = children.iter().map(|p| p.name()).collect();
        session.print(names.join("\n"));
    }
    Ok(())
}

async fn cat(services: &Services, session: &mut Session, name: &str) -> Result<()> {
    let path = session.resolve(name)?;
    if !services.fs.exists(&path).await? {
        return Err(ShellError::FileMissing);
    }
    let data = services.fs.read_file(&path).await?;
    if name.ends_with(".md") {
        session.print(markdown::render(&data));
    } else {
        session.print(markdown::line_breaks(&data));
    }
    Ok(())
}

async fn rm(services: &Services, session: &mut Session, name: &str) -> Result<()> {
    let path = session.resolve(name)?;
    services.fs.delete_entry(&path).await?;
    session.print(format!("'{}' deleted.", name));
    Ok(())
}

async fn cd(services: &Services, session: &mut Session, target: &str) -> Result<()> {
    if target == ".." {
        let current = session.current_directory();
        if current.is_root() {
            return Err(ShellError::AtRoot);
        }
        let parent = current.parent();
        session.print(format!("Changed directory to '{}'", parent));
        session.set_current_directory(parent);
        return Ok(());
    }

    let path = session.resolve(target)?;
    match services.fs.entry_type(&path).await? {
        None => Err(ShellError::DirectoryNotFound),
        Some(EntryType::File) => Err(ShellError::NotADirectory(path.to_string())),
        Some(EntryType::Directory) => {
            session.set_current_directory(path);
            session.print(format!("Changed directory to '{}'", target));
            Ok(())
        }
    }
}

fn history(session: &mut Session) {
    let listing: Vec<String> = session
        .history()
        .entries()
        .iter()
        .enumerate()
        .map(|(i, command)| format!("{:>4}  {}", i + 1, command))
        .collect();
    if !listing.is_empty() {
        session.print(listing.join("\n"));
    }
}

async fn wget(services: &Services, session: &mut Session, url: &str, filename: &str) -> Result<()> {
    let path = session.resolve(filename)?;
    if services.fs.exists(&path).await? {
        return Err(ShellError::TargetExists(filename.to_string()));
    }

    session.print(format!("Fetching content from '{}'...", url));
    let content = fetch_text(services.executor.as_ref(), url).await?;
    services.fs.create_file(&path, &content).await?;
    session.print(format!("Content from '{}' saved to '{}'.", url, filename));
    Ok(())
}

async fn clone(
    services: &Services,
    session: &mut Session,
    raw_url: &str,
    dir_name: Option<&str>,
) -> Result<()> {
    let repo = RepoUrl::parse(raw_url)?;
    let name = dir_name
        .map(str::to_string)
        .unwrap_or_else(|| repo.default_dir_name());
    let target = session.resolve(&name)?;

    session.print(format!("Cloning repository '{}'...", repo.url));
    let branch = services.github.default_branch(&repo).await?;
    log::info!("Cloning {}/{} at {}", repo.owner, repo.repo, branch);
    let tree = services.github.tree(&repo, &branch).await?;

    services.fs.create_directory(&target).await?;
    for item in &tree {
        let item_path = target.join_str(&item.path)?;
        match item.kind {
            TreeEntryKind::Tree => {
                services.fs.create_directory(&item_path).await?;
                session.print(format!("Created directory: {}", item.path));
            }
            TreeEntryKind::Blob => {
                let content = services.github.blob(item).await?;
                services.fs.create_file(&item_path, &content).await?;
                session.print(format!("Fetched file: {}", item.path));
            }
            TreeEntryKind::Commit | TreeEntryKind::Other => {
                log::debug!("Skipping {} ({:?})", item.path, item.kind);
            }
        }
    }

    session.print(format!("Repository '{}' cloned into '{}'.", repo.url, name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique() {
        let mut names: Vec<_> = COMMANDS.iter().map(|spec| spec.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn aliases_share_a_command() {
        assert_eq!(lookup("clear").unwrap().command, Command::Clear);
        assert_eq!(lookup("cls").unwrap().command, Command::Clear);
        assert_eq!(lookup("quit").unwrap().command, Command::Exit);
        assert!(lookup("zzz").is_none());
        assert!(lookup("LS").is_none());
    }

    #[test]
    fn argument_counts() {
        let add = lookup("add").unwrap();
        assert!(!add.accepts(1));
        assert!(add.accepts(2));
        assert!(add.accepts(12));

        let clone = lookup("clone").unwrap();
        assert!(!clone.accepts(0));
        assert!(clone.accepts(1));
        assert!(clone.accepts(3));

        assert!(lookup("ls").unwrap().accepts(0));
        assert!(lookup("ls").unwrap().accepts(1));
        assert!(!lookup("mkdir").unwrap().accepts(0));
        assert!(lookup("mkdir").unwrap().accepts(2));
    }

    #[test]
    fn help_lists_every_primary_command() {
        let help = format_help();
        assert!(help.starts_with("<strong>Available Commands:</strong>"));
        for name in ["help", "mkdir", "add", "cd", "wget", "clone", "history"] {
            assert!(help.contains(&format!("<li><strong>{}", name)), "{}", name);
        }
        assert!(help.contains("mkdir &lt;name&gt;"));
        assert!(!help.contains("<strong>cls</strong>"));
    }
}
