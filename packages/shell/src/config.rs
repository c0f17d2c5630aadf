//! Command-line arguments and the environment, merged into a `ShellConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use webos_http::DEFAULT_API_BASE;

use crate::error::{Result, ShellError};

/// webos - a persistent file system behind a small command shell
#[derive(Parser, Debug)]
#[command(name = "webos")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the stored entries and command history
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, conflicts_with = "data_dir")]
    pub memory: bool,

    /// Base URL of the GitHub REST API used by `clone`
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE)]
    pub github_api: String,

    /// Network timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Force vi editing mode
    #[arg(long, conflicts_with = "emacs")]
    pub vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    pub emacs: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingMode {
    Vi,
    Emacs,
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// `None` for an in-memory session.
    pub data_dir: Option<PathBuf>,
    pub github_api: String,
    pub timeout: Option<Duration>,
    pub editing_mode: EditingMode,
}

impl ShellConfig {
    pub fn from_args(args: &Args) -> Result<ShellConfig> {
        let data_dir = if args.memory {
            None
        } else {
            Some(
                args.data_dir
                    .clone()
                    .or_else(default_data_dir)
                    .ok_or(ShellError::NoDataDir)?,
            )
        };

        let editing_mode = if args.vi {
            EditingMode::Vi
        } else if args.emacs {
            EditingMode::Emacs
        } else if should_use_vi_mode() {
            EditingMode::Vi
        } else {
            EditingMode::Emacs
        };

        Ok(ShellConfig {
            data_dir,
            github_api: args.github_api.clone(),
            timeout: args.timeout.map(Duration::from_secs),
            editing_mode,
        })
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("webos"))
}

fn is_vi(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("vim") || name == "vi"
}

/// Check if vi mode should be used based on environment configuration.
fn should_use_vi_mode() -> bool {
    // Explicit override wins over editor detection.
    if let Ok(mode) = std::env::var("WEBOS_EDIT_MODE") {
        return is_vi(&mode);
    }

    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = std::env::var(var) {
            if is_vi(&editor) {
                return true;
            }
        }
    }

    check_inputrc_vi_mode()
}

/// Check .inputrc for `set editing-mode vi`.
fn check_inputrc_vi_mode() -> bool {
    let inputrc_paths = [
        std::env::var("INPUTRC").ok().map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".inputrc")),
        Some(PathBuf::from("/etc/inputrc")),
    ];

    inputrc_paths
        .into_iter()
        .flatten()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .any(|content| content.lines().any(inputrc_sets_vi))
}

fn inputrc_sets_vi(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    words.as_slice() == ["set", "editing-mode", "vi"]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("webos").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn memory_session_has_no_data_dir() {
        let config = ShellConfig::from_args(&args(&["--memory", "--vi"])).unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.editing_mode, EditingMode::Vi);
        assert_eq!(config.github_api, DEFAULT_API_BASE);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn explicit_options() {
        let config = ShellConfig::from_args(&args(&[
            "--data-dir",
            "/tmp/webos-test",
            "--timeout",
            "5",
            "--github-api",
            "http://localhost:9000",
            "--emacs",
        ]))
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/webos-test")));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.github_api, "http://localhost:9000");
        assert_eq!(config.editing_mode, EditingMode::Emacs);
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        let argv = ["webos", "--memory", "--data-dir", "/tmp/x"];
        assert!(Args::try_parse_from(argv).is_err());
        assert!(Args::try_parse_from(["webos", "--vi", "--emacs"]).is_err());
    }

    #[test]
    fn editor_names() {
        assert!(is_vi("nvim"));
        assert!(is_vi("/usr/bin/vim"));
        assert!(is_vi("VI"));
        assert!(!is_vi("emacs"));
        assert!(!is_vi("nano"));
    }

    #[test]
    fn inputrc_lines() {
        assert!(inputrc_sets_vi("set editing-mode vi"));
        assert!(inputrc_sets_vi("  set   editing-mode   vi  "));
        assert!(!inputrc_sets_vi("set editing-mode emacs"));
        assert!(!inputrc_sets_vi("# set editing-mode vi"));
    }
}
