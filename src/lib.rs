//! A small Brainfuck console interpreter.
//!
//! Programs run on a byte tape (30,000 cells by default) with one cursor.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cells wrap on overflow and underflow.
//! - Clamped cursor: moving left from cell 0 or right from the last cell does nothing.
//! - Characters outside `><+-.,[]` are comments and are skipped while loading.
//! - Loop markers are balanced at load time; a stray `]` or an unclosed `[`
//!   is rejected before anything runs.
//! - Loops are resolved at runtime by scanning for the matching marker.
//! - `.` writes printable cells as characters and anything else as a number
//!   (decimal by default, `0x` hex optionally).
//! - `,` reads one whitespace-delimited token; numbers are stored modulo 256,
//!   other tokens store their first byte, EOF stores 0.
//!
//! Quick start:
//!
//! ```no_run
//! use bf_console::{Environment, FormattingSink, Radix, TokenInput};
//!
//! let mut env = Environment::new(30_000);
//! env.load_program(b"++++++++[>+++++++++<-]>.").expect("balanced program");
//!
//! let mut sink = FormattingSink::new(std::io::stdout(), Radix::Decimal);
//! let mut input = TokenInput::new(std::io::stdin().lock());
//! env.run(&mut sink, &mut input).expect("program should run");
//! println!();
//! ```

pub mod cli_util;
pub mod config;
pub mod environment;
pub mod error;
pub mod executor;
pub mod highlight;
pub mod input;
pub mod loader;
pub mod output;
pub mod program;
pub mod session;
pub mod tape;

pub use config::{Config, Overrides};
pub use environment::{check_program_file_extension, Environment};
pub use error::{BrainfuckError, ErrorKind};
pub use executor::Executor;
pub use input::{InputSource, TokenInput};
pub use loader::Scan;
pub use output::{format_cell, FormattingSink, OutputSink, Radix};
pub use program::{InstructionBuffer, Op};
pub use session::Session;
pub use tape::{Tape, DEFAULT_TAPE_SIZE};
