use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::commands::{self, Command};

/// Colors the command name by whether it exists, and its arguments by
/// what they name.
#[derive(Default)]
pub struct ShellHighlighter;

impl ShellHighlighter {
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for ShellHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let spec = commands::lookup(command);
        let cmd_style = match spec {
            Some(_) => Style::new().bold().fg(Color::Cyan),
            None => Style::new().fg(Color::Red),
        };
        styled.push((cmd_style, command.to_string()));

        if rest.is_empty() {
            return styled;
        }

        match spec.map(|s| s.command) {
            Some(Command::Wget | Command::Clone) => {
                // URL first, then the target name.
                let trimmed = rest.trim_start();
                let lead = &rest[..rest.len() - trimmed.len()];
                let (url, tail) = match trimmed.find(char::is_whitespace) {
                    Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
                    None => (trimmed, ""),
                };
                styled.push((Style::new(), lead.to_string()));
                styled.push((Style::new().fg(Color::Green), url.to_string()));
                if !tail.is_empty() {
                    styled.push((Style::new().fg(Color::Yellow), tail.to_string()));
                }
            }
            Some(
                Command::Mkdir | Command::Touch | Command::Cat | Command::Rm | Command::Cd,
            ) => {
                styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
            }
            Some(Command::Add) => {
                let trimmed = rest.trim_start();
                let lead = &rest[..rest.len() - trimmed.len()];
                let (file, content) = match trimmed.find(char::is_whitespace) {
                    Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
                    None => (trimmed, ""),
                };
                styled.push((Style::new(), lead.to_string()));
                styled.push((Style::new().fg(Color::Yellow), file.to_string()));
                if !content.is_empty() {
                    styled.push((Style::new(), content.to_string()));
                }
            }
            _ => {
                styled.push((Style::new(), rest.to_string()));
            }
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fg(styled: &StyledText, i: usize) -> Option<Color> {
        styled.buffer[i].0.foreground
    }

    #[test]
    fn highlight_empty_returns_empty() {
        let styled = ShellHighlighter::new().highlight("", 0);
        assert!(styled.buffer.is_empty());
    }

    #[test]
    fn highlight_known_command() {
        let styled = ShellHighlighter::new().highlight("help", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(fg(&styled, 0), Some(Color::Cyan));
        assert!(styled.buffer[0].0.is_bold);
    }

    #[test]
    fn highlight_unknown_command() {
        let styled = ShellHighlighter::new().highlight("zzz arg", 0);
        assert_eq!(fg(&styled, 0), Some(Color::Red));
        assert_eq!(styled.buffer[1].1, " arg");
        assert_eq!(fg(&styled, 1), None);
    }

    #[test]
    fn commands_are_case_sensitive() {
        let styled = ShellHighlighter::new().highlight("LS", 0);
        assert_eq!(fg(&styled, 0), Some(Color::Red));
    }

    #[test]
    fn highlight_path_argument() {
        let styled = ShellHighlighter::new().highlight("cd docs/a", 0);
        assert_eq!(styled.buffer[1].1, " docs/a");
        assert_eq!(fg(&styled, 1), Some(Color::Yellow));
    }

    #[test]
    fn highlight_wget_url_and_target() {
        let styled = ShellHighlighter::new().highlight("wget https://x.test/a a.txt", 0);
        assert_eq!(styled.buffer[2].1, "https://x.test/a");
        assert_eq!(fg(&styled, 2), Some(Color::Green));
        assert_eq!(styled.buffer[3].1, " a.txt");
        assert_eq!(fg(&styled, 3), Some(Color::Yellow));
    }

    #[test]
    fn highlight_add_file_then_content() {
        let styled = ShellHighlighter::new().highlight("add notes.md hello world", 0);
        assert_eq!(styled.buffer[2].1, "notes.md");
        assert_eq!(fg(&styled, 2), Some(Color::Yellow));
        assert_eq!(styled.buffer[3].1, " hello world");
        assert_eq!(fg(&styled, 3), None);
    }

    #[test]
    fn styled_text_reassembles_line() {
        let line = "clone  https://github.com/o/r  dir";
        let styled = ShellHighlighter::new().highlight(line, 0);
        let joined: String = styled.buffer.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(joined, line);
    }
}
