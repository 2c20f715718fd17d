mod commands;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use bf_console::cli_util::print_error;
use bf_console::session::ModeFlagOverride;
use bf_console::{Config, Overrides, Radix};
use clap::Parser;

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS]              # Start the interactive console
  {0} [OPTIONS] <FILE.bf>    # Run a Brainfuck source file
  {0} [OPTIONS] -e "<code>"  # Run Brainfuck code given inline

Options:
  --eval,  -e <CODE>     Run CODE instead of a file
  --tape-size <N>        Number of tape cells (fallback BF_TAPE_SIZE; default 30000)
  --radix <dec|hex>      How non-printable cells are printed (fallback BF_RADIX; default dec)
  --debug, -d            Write a step-by-step table of operations to stderr
  --bare                 Console: plain line reads, no prompts
  --editor               Console: line editor (errors if stdin is not a TTY)
  --help,  -h            Show this help

Notes:
- Characters outside ><+-.,[] are comments.
- `.` prints printable cells as characters, anything else as a number.
- `,` reads one whitespace-delimited token from stdin: numbers are stored
  modulo 256, other tokens store their first byte, EOF stores 0.
- Source files must end in .bf and must have balanced brackets.
- In the console, lines accumulate until their brackets balance; the tape
  persists between runs and the current cell is echoed after each run.
- Settings may also live in $XDG_CONFIG_HOME/bf.toml under [interpreter]
  (tape_size, radix).
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Source file ending in .bf; without one the console starts
    #[arg(value_name = "FILE", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run CODE instead of a file
    #[arg(short = 'e', long = "eval", value_name = "CODE")]
    eval: Option<String>,

    /// Number of tape cells
    #[arg(long = "tape-size", value_name = "N")]
    tape_size: Option<usize>,

    /// Radix for non-printable cells
    #[arg(long = "radix", value_name = "dec|hex")]
    radix: Option<Radix>,

    /// Write a step-by-step table of operations to stderr
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Force the bare console
    #[arg(long = "bare", conflicts_with = "editor")]
    bare: bool,

    /// Force the line-editor console
    #[arg(long = "editor", conflicts_with = "bare")]
    editor: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn main() {
    // Program name keeps diagnostics consistent with how we were invoked
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    let cli = Cli::parse();
    if cli.help {
        usage_and_exit(&program, 0);
    }

    let overrides = Overrides {
        tape_size: cli.tape_size,
        radix: cli.radix,
    };
    let config = match Config::resolve(overrides) {
        Ok(c) => c,
        Err(err) => {
            print_error(Some(&program), "", &err);
            std::process::exit(1);
        }
    };

    let code = if let Some(code) = cli.eval {
        commands::run::run_source(&program, code.as_bytes(), &config, cli.debug)
    } else if let Some(path) = cli.file {
        commands::run::run_file(&program, &path, &config, cli.debug)
    } else {
        let mode_flag = if cli.bare {
            ModeFlagOverride::Bare
        } else if cli.editor {
            ModeFlagOverride::Editor
        } else {
            ModeFlagOverride::None
        };
        commands::repl::run(&program, mode_flag, &config, cli.debug)
    };

    std::process::exit(code);
}
