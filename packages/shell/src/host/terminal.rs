//! Terminal host implementation using Reedline.
//!
//! This host provides interactive terminal I/O with:
//! - Readline-style line editing (Vi and Emacs modes)
//! - Tab completion of command names
//! - Syntax highlighting
//! - Arrow-key recall driven by the shell's history log

use std::borrow::Cow;
use std::io::{self, Write};

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditCommand, EditMode, Emacs, KeyCode, KeyModifiers,
    Keybindings, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, ReedlineEvent, ReedlineMenu, Signal as ReedlineSignal,
    Vi,
};

use super::render::html_to_ansi;
use crate::completer::ShellCompleter;
use crate::config::{EditingMode, ShellConfig};
use crate::highlighter::ShellHighlighter;
use crate::io::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

// Host commands reedline hands back from `read_line` when Up or Down is
// pressed outside the completion menu. The NUL prefix keeps them apart from
// anything a user can submit.
const RECALL_PREVIOUS: &str = "\0recall-previous";
const RECALL_NEXT: &str = "\0recall-next";

/// Terminal host using Reedline for interactive I/O.
///
/// Reedline's own history only feeds hints and reverse search for the
/// current session. Up and Down are routed to the REPL core, which walks
/// the shell's history log and hands the command back via `set_input`.
pub struct TerminalHost {
    line_editor: Reedline,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    current_prompt: PromptConfig,
}

impl TerminalHost {
    pub fn new(config: &ShellConfig) -> io::Result<Self> {
        let completer = Box::new(ShellCompleter::new());
        let highlighter = Box::new(ShellHighlighter::new());
        let hinter = Box::new(
            DefaultHinter::default().with_style(Style::new().fg(Color::LightGray).dimmed()),
        );

        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name("completion_menu")
                .with_text_style(Style::new().fg(Color::Cyan))
                .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold()),
        );

        let complete = ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]);

        let edit_mode: Box<dyn EditMode> = match config.editing_mode {
            EditingMode::Vi => {
                let mut insert_keybindings = default_vi_insert_keybindings();
                insert_keybindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, complete);
                bind_recall(&mut insert_keybindings);
                let mut normal_keybindings = default_vi_normal_keybindings();
                bind_recall(&mut normal_keybindings);
                Box::new(Vi::new(insert_keybindings, normal_keybindings))
            }
            EditingMode::Emacs => {
                let mut keybindings = default_emacs_keybindings();
                keybindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, complete);
                keybindings.add_binding(
                    KeyModifiers::CONTROL,
                    KeyCode::Char('d'),
                    ReedlineEvent::Edit(vec![EditCommand::Clear]),
                );
                bind_recall(&mut keybindings);
                keybindings.add_binding(
                    KeyModifiers::CONTROL,
                    KeyCode::Char('p'),
                    recall_previous(),
                );
                keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('n'), recall_next());
                Box::new(Emacs::new(keybindings))
            }
        };

        let line_editor = Reedline::create()
            .with_completer(completer)
            .with_highlighter(highlighter)
            .with_hinter(hinter)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(edit_mode);

        Ok(Self {
            line_editor,
            pending_input: None,
            pending_signal: None,
            current_prompt: PromptConfig::default(),
        })
    }
}

fn recall_previous() -> ReedlineEvent {
    ReedlineEvent::UntilFound(vec![
        ReedlineEvent::MenuUp,
        ReedlineEvent::ExecuteHostCommand(RECALL_PREVIOUS.to_string()),
    ])
}

fn recall_next() -> ReedlineEvent {
    ReedlineEvent::UntilFound(vec![
        ReedlineEvent::MenuDown,
        ReedlineEvent::ExecuteHostCommand(RECALL_NEXT.to_string()),
    ])
}

fn bind_recall(keybindings: &mut Keybindings) {
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, recall_previous());
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, recall_next());
}

impl IoHost for TerminalHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        let prompt = TerminalPrompt::from_config(&self.current_prompt);

        match self.line_editor.read_line(&prompt) {
            Ok(ReedlineSignal::Success(line)) => {
                if line == RECALL_PREVIOUS {
                    self.pending_signal = Some(Signal::RecallPrevious);
                } else if line == RECALL_NEXT {
                    self.pending_signal = Some(Signal::RecallNext);
                } else {
                    self.pending_input = Some(InputLine { line });
                }
            }
            Ok(ReedlineSignal::CtrlC) => {
                self.pending_signal = Some(Signal::Interrupt);
            }
            Ok(ReedlineSignal::CtrlD) => {
                self.pending_signal = Some(Signal::Eof);
            }
            Err(e) => {
                return Err(IoError::Io(format!("Reedline error: {}", e)));
            }
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
        let styled = match output.style {
            OutputStyle::Normal => html_to_ansi(&output.text),
            OutputStyle::Error => Color::Red.paint(html_to_ansi(&output.text)).to_string(),
            OutputStyle::Info | OutputStyle::Banner => {
                Color::Cyan.paint(&output.text).to_string()
            }
            OutputStyle::Clear => {
                return self
                    .line_editor
                    .clear_screen()
                    .map_err(|e| IoError::Io(e.to_string()));
            }
        };
        println!("{}", styled);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.current_prompt = config;
        Ok(())
    }

    fn set_input(&mut self, text: &str) -> Result<(), IoError> {
        self.line_editor.run_edit_commands(&[
            EditCommand::Clear,
            EditCommand::InsertString(text.to_string()),
        ]);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush().map_err(|e| IoError::Io(e.to_string()))
    }
}

struct TerminalPrompt {
    path: String,
}

impl TerminalPrompt {
    fn from_config(config: &PromptConfig) -> Self {
        Self {
            path: config.current_path.clone(),
        }
    }
}

impl Prompt for TerminalPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(Color::Yellow.paint(&self.path).to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => {
                Cow::Owned(format!(" {} ", Color::Green.bold().paint(">")))
            }
            PromptEditMode::Vi(vi_mode) => {
                let indicator = match vi_mode {
                    reedline::PromptViMode::Normal => Color::Blue.bold().paint("[N]>"),
                    reedline::PromptViMode::Insert => Color::Green.bold().paint("[I]>"),
                };
                Cow::Owned(format!(" {} ", indicator))
            }
            PromptEditMode::Custom(s) => Cow::Owned(format!(" ({})> ", s)),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}
