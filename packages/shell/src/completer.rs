use reedline::{Completer, Span, Suggestion};

use crate::commands::COMMANDS;

/// Completes command names from the registry.
#[derive(Default)]
pub struct ShellCompleter;

impl ShellCompleter {
    pub fn new() -> Self {
        Self
    }
}

impl Completer for ShellCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line_to_pos = &line[..pos];
        let words: Vec<&str> = line_to_pos.split_whitespace().collect();

        // Only the command itself is completed.
        if !(words.is_empty() || (words.len() == 1 && !line_to_pos.ends_with(' '))) {
            return Vec::new();
        }

        let prefix = words.first().copied().unwrap_or("");
        let start = pos - prefix.len();

        COMMANDS
            .iter()
            .filter(|spec| spec.name.starts_with(prefix))
            .map(|spec| Suggestion {
                value: spec.name.to_string(),
                description: Some(spec.usage.to_string()),
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: true,
                match_indices: None,
            })
            .collect()
    }
}
