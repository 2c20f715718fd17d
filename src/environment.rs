use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::error::{BrainfuckError, Result};
use crate::executor::Executor;
use crate::input::InputSource;
use crate::loader::{self, Scan};
use crate::output::OutputSink;
use crate::program::{InstructionBuffer, Op};
use crate::tape::Tape;

/// Extension a program file must carry.
pub const SOURCE_EXTENSION: &str = "bf";

/// One execution context: a tape that outlives individual programs and the
/// instruction buffer of the program currently loaded.
///
/// The outcome of the last load is kept so an unbalanced buffer never
/// reaches the executor.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub tape: Tape,
    pub program: InstructionBuffer,
    loaded: Scan,
}

impl Environment {
    pub fn new(tape_size: usize) -> Self {
        Self {
            tape: Tape::new(tape_size),
            program: InstructionBuffer::new(),
            loaded: Scan::default(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Self::new(config.tape_size)
    }

    /// Load a segment of source text, continuing from `balance`.
    ///
    /// A zero `balance` starts a fresh program and wipes the buffer; a positive
    /// one appends to the pending program.
    pub fn load_str(&mut self, source: &str, balance: isize) -> Scan {
        self.load_bytes(source.as_bytes(), balance)
    }

    pub fn load_bytes(&mut self, source: &[u8], balance: isize) -> Scan {
        if balance == 0 {
            self.program.clear();
        }
        self.loaded = loader::scan_bytes(&mut self.program, source, balance);
        self.loaded
    }

    /// Load from an open stream, continuing from `balance`.
    pub fn load_reader<R: BufRead>(&mut self, source: R, balance: isize) -> Result<Scan> {
        if balance == 0 {
            self.program.clear();
        }
        match loader::scan_reader(&mut self.program, source, balance) {
            Ok(scan) => {
                self.loaded = scan;
                Ok(scan)
            }
            Err(err) => {
                // A half-read buffer is never runnable.
                self.wipe_instruction_buffer();
                Err(err)
            }
        }
    }

    /// Load a complete program. Anything but a balanced result is a structural error.
    pub fn load_program(&mut self, source: &[u8]) -> Result<()> {
        self.load_bytes(source, 0);
        check_balanced(&self.loaded, &self.program)
    }

    /// Like [`load_program`](Self::load_program) but reading from a stream.
    pub fn load_program_reader<R: BufRead>(&mut self, source: R) -> Result<()> {
        self.load_reader(source, 0)?;
        check_balanced(&self.loaded, &self.program)
    }

    /// Run the loaded program. A buffer whose last load left loop markers
    /// unbalanced is refused with a structural error.
    pub fn run(&mut self, sink: &mut dyn OutputSink, input: &mut dyn InputSource) -> Result<()> {
        check_balanced(&self.loaded, &self.program)?;
        Executor::new(&mut self.tape, &self.program).run(sink, input)
    }

    pub fn run_traced(
        &mut self,
        sink: &mut dyn OutputSink,
        input: &mut dyn InputSource,
        trace: &mut dyn Write,
    ) -> Result<()> {
        check_balanced(&self.loaded, &self.program)?;
        Executor::new(&mut self.tape, &self.program).run_traced(sink, input, trace)
    }

    /// Drop the loaded program.
    pub fn wipe_instruction_buffer(&mut self) {
        self.program.clear();
        self.loaded = Scan::default();
    }

    pub fn reset_tape(&mut self) {
        self.tape.reset();
    }
}

/// True when `path` ends in `.bf`.
pub fn check_program_file_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

fn check_balanced(scan: &Scan, program: &InstructionBuffer) -> Result<()> {
    if let Some(offset) = scan.stray_offset() {
        return Err(BrainfuckError::StrayLoopEnd { offset });
    }
    if scan.balance > 0 {
        return Err(BrainfuckError::UnclosedLoop {
            open: scan.balance as usize,
        });
    }
    debug_assert!(program.is_empty() || program.get(program.len() - 1) == Some(Op::Terminator));
    Ok(())
}
