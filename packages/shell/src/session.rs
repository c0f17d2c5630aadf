//! Per-user shell state.

use webos_vfs::{HistoryLog, Path, PathError, ROOT};

use crate::io::Output;

/// The lines printed so far.
///
/// Append-only until `clear`. Lines printed by the command currently
/// running are also queued for the host; `take_printed` hands them over.
#[derive(Debug, Default)]
pub struct Scrollback {
    lines: Vec<Output>,
    printed: Vec<Output>,
}

impl Scrollback {
    pub fn push(&mut self, output: Output) {
        self.lines.push(output.clone());
        self.printed.push(output);
    }

    /// Empty the scrollback and tell the host to clear the screen.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.printed.push(Output::clear());
    }

    pub fn lines(&self) -> &[Output] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn take_printed(&mut self) -> Vec<Output> {
        std::mem::take(&mut self.printed)
    }
}

/// Mutable state handed to every command.
pub struct Session {
    current_directory: Path,
    history: HistoryLog,
    scrollback: Scrollback,
}

impl Session {
    pub fn new(history: HistoryLog) -> Self {
        Self {
            current_directory: Path::root(),
            history,
            scrollback: Scrollback::default(),
        }
    }

    pub fn current_directory(&self) -> &Path {
        &self.current_directory
    }

    pub(crate) fn set_current_directory(&mut self, path: Path) {
        self.current_directory = path;
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn print(&mut self, text: impl Into<String>) {
        self.scrollback.push(Output::normal(text));
    }

    pub fn print_error(&mut self, message: impl std::fmt::Display) {
        self.scrollback.push(Output::error(message));
    }

    pub fn clear(&mut self) {
        self.scrollback.clear();
    }

    pub(crate) fn take_printed(&mut self) -> Vec<Output> {
        self.scrollback.take_printed()
    }

    /// Resolve a command argument to a store path.
    ///
    /// A leading `/` makes the argument absolute: it is rooted under `root`
    /// unless its first component already is `root`. Anything else is
    /// relative to the current directory. `.` is dropped and `..` pops a
    /// component, stopping at the root.
    pub fn resolve(&self, arg: &str) -> Result<Path, PathError> {
        let (mut components, rest) = match arg.strip_prefix('/') {
            Some(rest) => {
                let first = rest.split('/').find(|c| !c.is_empty());
                if first == Some(ROOT) {
                    (Vec::new(), rest)
                } else {
                    (vec![ROOT.to_string()], rest)
                }
            }
            None => (self.current_directory.components.clone(), arg),
        };

        for component in rest.split('/').filter(|c| !c.is_empty()) {
            match component {
                "." => {}
                ".." => {
                    if components.len() > 1 {
                        components.pop();
                    }
                }
                name => components.push(name.to_string()),
            }
        }

        Path::try_from_components(components)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(HistoryLog::in_memory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::OutputStyle;
    use webos_vfs::path;

    fn session_in(dir: Path) -> Session {
        let mut session = Session::default();
        session.set_current_directory(dir);
        session
    }

    #[test]
    fn relative_paths_join_current_directory() {
        let session = session_in(path!("root/docs"));
        assert_eq!(session.resolve("a.md").unwrap(), path!("root/docs/a.md"));
        assert_eq!(session.resolve("x/y").unwrap(), path!("root/docs/x/y"));
        assert_eq!(session.resolve("./a").unwrap(), path!("root/docs/a"));
        assert_eq!(session.resolve("../a").unwrap(), path!("root/a"));
    }

    #[test]
    fn absolute_paths_are_rooted() {
        let session = session_in(path!("root/docs"));
        assert_eq!(session.resolve("/notes").unwrap(), path!("root/notes"));
        assert_eq!(session.resolve("/root/notes").unwrap(), path!("root/notes"));
        assert_eq!(session.resolve("/").unwrap(), Path::root());
        assert_eq!(session.resolve("/docs/..").unwrap(), Path::root());
    }

    #[test]
    fn dot_dot_stops_at_root() {
        let session = Session::default();
        assert_eq!(session.resolve("../../a").unwrap(), path!("root/a"));
        assert_eq!(session.resolve("/root/..").unwrap(), Path::root());
    }

    #[test]
    fn control_characters_are_rejected() {
        let session = Session::default();
        assert!(session.resolve("bad\u{7}name").is_err());
    }

    #[test]
    fn clear_empties_scrollback_and_queues_clear() {
        let mut session = Session::default();
        session.print("one");
        session.print_error("two");
        assert_eq!(session.scrollback().len(), 2);
        assert_eq!(session.scrollback().lines()[1].text, "Error: two");

        session.clear();
        assert!(session.scrollback().is_empty());

        let printed = session.take_printed();
        assert_eq!(printed.len(), 3);
        assert_eq!(printed[2].style, OutputStyle::Clear);
        assert!(session.take_printed().is_empty());
    }
}
