//! Interactive console.
//!
//! Lines are accumulated until their loop markers balance, then the program
//! runs against a tape that persists for the whole session. After each run
//! the cell under the cursor is echoed.

use std::env;
use std::io::{self, BufRead, IsTerminal, Write};

use reedline::{
    DefaultPrompt, DefaultPromptSegment, FileBackedHistory, HistoryItem, Reedline, Signal,
};

use crate::cli_util;
use crate::environment::Environment;
use crate::error::{BrainfuckError, Result};
use crate::highlight::OpcodeHighlighter;
use crate::input::TokenInput;
use crate::output::{FormattingSink, OutputSink, Radix};

/// Cells shown by `:tape`.
const TAPE_WINDOW: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    /// Plain line reads, no prompts. Used for pipes.
    Bare,
    /// Line editor with history and highlighting.
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

/// Pick the session mode: flags -> `BF_REPL_MODE` -> TTY auto-detect.
pub fn select_mode(flag: ModeFlagOverride) -> Result<ReplMode> {
    let stdin_is_tty = io::stdin().is_terminal();
    select_mode_with(flag, env::var("BF_REPL_MODE").ok().as_deref(), stdin_is_tty)
}

fn select_mode_with(flag: ModeFlagOverride, env_mode: Option<&str>, stdin_is_tty: bool) -> Result<ReplMode> {
    let editor = || if stdin_is_tty { Ok(ReplMode::Editor) } else { Err(BrainfuckError::EditorUnavailable) };

    match flag {
        ModeFlagOverride::Bare => return Ok(ReplMode::Bare),
        ModeFlagOverride::Editor => return editor(),
        ModeFlagOverride::None => {}
    }

    if let Some(val) = env_mode {
        return match val.trim().to_ascii_lowercase().as_str() {
            "bare" => Ok(ReplMode::Bare),
            "editor" => editor(),
            _ => Err(BrainfuckError::InvalidConfig { key: "BF_REPL_MODE", value: val.to_string() }),
        };
    }

    if stdin_is_tty { Ok(ReplMode::Editor) } else { Ok(ReplMode::Bare) }
}

/// What the session should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading.
    Continue,
    /// End the session.
    Exit,
}

/// One read from the input channel.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Text(String),
    /// Ctrl+C at the editor prompt.
    Interrupt,
    Eof,
}

type ErrorReporter = Box<dyn FnMut(&BrainfuckError, &str)>;

/// A read-load-run loop over one shared input channel.
///
/// `input` feeds both program lines and `,` tokens.
pub struct Session<R: BufRead, W: Write> {
    env: Environment,
    balance: isize,
    pending: String,
    input: R,
    sink: FormattingSink<W>,
    editor: Option<Reedline>,
    trace: bool,
    reporter: ErrorReporter,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(env: Environment, input: R, output: W, radix: Radix) -> Self {
        Self {
            env,
            balance: 0,
            pending: String::new(),
            input,
            sink: FormattingSink::new(output, radix),
            editor: None,
            trace: false,
            reporter: Box::new(|err: &BrainfuckError, source: &str| cli_util::print_error(None, source, err)),
        }
    }

    /// Read lines through a line editor instead of the raw input.
    pub fn with_editor(mut self) -> Result<Self> {
        self.editor = Some(init_line_editor()?);
        Ok(self)
    }

    /// Write a step table to stderr for every run.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Replace the default stderr reporter for rejected submissions.
    pub fn set_error_reporter<F>(&mut self, reporter: F)
    where
        F: FnMut(&BrainfuckError, &str) + 'static,
    {
        self.reporter = Box::new(reporter);
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn balance(&self) -> isize {
        self.balance
    }

    pub fn output(&self) -> &W {
        self.sink.get_ref()
    }

    pub fn into_output(self) -> W {
        self.sink.into_inner()
    }

    /// Run until end of input, Ctrl+C or `:exit`.
    ///
    /// End of input is clean unless a program is still open. Ctrl+C always
    /// ends cleanly and drops the pending program. A failing input channel
    /// ends the session with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let line = match self.next_line()? {
                Line::Text(line) => line,
                Line::Interrupt => return self.close(true),
                Line::Eof => return self.close(false),
            };
            if self.handle_line(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn close(&mut self, interrupted: bool) -> Result<()> {
        let open = self.balance;
        self.discard_pending();
        if open > 0 && !interrupted {
            return Err(BrainfuckError::UnclosedLoop { open: open as usize });
        }
        Ok(())
    }

    /// Feed one line to the session.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if self.balance == 0 {
            match line.trim() {
                ":exit" | ":quit" => return Ok(Flow::Exit),
                ":reset" => {
                    self.env.reset_tape();
                    self.env.wipe_instruction_buffer();
                    return Ok(Flow::Continue);
                }
                ":tape" => {
                    self.dump_tape()?;
                    return Ok(Flow::Continue);
                }
                _ => {}
            }
        }

        self.pending.push_str(line);
        let scan = self.env.load_str(line, self.balance);
        self.balance = scan.balance;

        if scan.balance > 0 {
            self.pending.push('\n');
            return Ok(Flow::Continue);
        }

        if scan.balance < 0 {
            // Offset relative to the whole pending submission.
            let offset = self.pending.len() - line.len() + scan.consumed - 1;
            let err = BrainfuckError::StrayLoopEnd { offset };
            (self.reporter)(&err, &self.pending);
            self.discard_pending();
            return Ok(Flow::Continue);
        }

        self.pending.clear();
        self.execute()?;
        Ok(Flow::Continue)
    }

    fn execute(&mut self) -> Result<()> {
        let mut input = TokenInput::new(&mut self.input);
        if self.trace {
            let stderr = io::stderr();
            let mut trace = stderr.lock();
            self.env.run_traced(&mut self.sink, &mut input, &mut trace)?;
        } else {
            self.env.run(&mut self.sink, &mut input)?;
        }

        // Echo the cell under the cursor after every run.
        self.sink
            .emit(self.env.tape.get())
            .and_then(|_| writeln!(self.sink.get_mut()))
            .and_then(|_| self.sink.flush())
            .map_err(|e| BrainfuckError::BrokenOutput { source: e })
    }

    fn dump_tape(&mut self) -> Result<()> {
        let (base, window) = self.env.tape.window(TAPE_WINDOW);
        let cursor = self.env.tape.cursor();
        let mut line = String::new();
        for (i, cell) in window.iter().enumerate() {
            if base + i == cursor {
                line.push_str(&format!("[{cell}] "));
            } else {
                line.push_str(&format!("{cell} "));
            }
        }
        writeln!(self.sink.get_mut(), "{base:>5}: {}", line.trim_end())
            .and_then(|_| self.sink.flush())
            .map_err(|e| BrainfuckError::BrokenOutput { source: e })
    }

    fn discard_pending(&mut self) {
        self.pending.clear();
        self.balance = 0;
        self.env.wipe_instruction_buffer();
    }

    fn next_line(&mut self) -> Result<Line> {
        if let Some(editor) = self.editor.as_mut() {
            return read_line_interactive(editor, self.balance > 0);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Ok(Line::Eof),
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Ok(Line::Text(line))
            }
            Err(e) => Err(BrainfuckError::BrokenInput { source: e }),
        }
    }
}

fn init_line_editor() -> Result<Reedline> {
    use reedline::{default_emacs_keybindings, Emacs, KeyCode, KeyModifiers, ReedlineEvent};

    // Default emacs bindings; Alt/Ctrl+Up/Down walk history explicitly.
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Down, ReedlineEvent::NextHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Down, ReedlineEvent::NextHistory);

    let history = FileBackedHistory::new(1_000).map_err(|e| BrainfuckError::BrokenInput {
        source: io::Error::other(e.to_string()),
    })?;

    Ok(Reedline::create()
        .with_highlighter(Box::new(OpcodeHighlighter::new_catppuccin_mocha()))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings))))
}

fn read_line_interactive(editor: &mut Reedline, continuing: bool) -> Result<Line> {
    let left = if continuing { "..." } else { "bf" };
    let prompt = DefaultPrompt::new(DefaultPromptSegment::Basic(left.to_string()), DefaultPromptSegment::Empty);

    let line = editor
        .read_line(&prompt)
        .map(line_from_signal)
        .map_err(|e| BrainfuckError::BrokenInput { source: e })?;
    if let Line::Text(buffer) = &line {
        if !buffer.trim().is_empty() {
            let _ = editor.history_mut().save(HistoryItem::from_command_line(buffer.clone()));
        }
    }
    Ok(line)
}

fn line_from_signal(signal: Signal) -> Line {
    match signal {
        Signal::Success(buffer) => Line::Text(buffer),
        Signal::CtrlC => Line::Interrupt,
        Signal::CtrlD => Line::Eof,
        #[allow(unreachable_patterns)]
        _ => Line::Eof,
    }
}
