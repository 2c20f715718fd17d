use std::fs;
use std::io::{self, Write};
use std::path::Path;

use bf_console::cli_util::print_error;
use bf_console::error::Result;
use bf_console::{
    check_program_file_extension, BrainfuckError, Config, Environment, FormattingSink, TokenInput,
};

/// Run a program file to completion. Returns the process exit code.
pub fn run_file(program: &str, path: &Path, config: &Config, debug: bool) -> i32 {
    match read_source(path) {
        Ok(source) => run_source(program, &source, config, debug),
        Err(err) => {
            print_error(Some(program), "", &err);
            1
        }
    }
}

/// Check the extension, then read the whole file.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    if !check_program_file_extension(path) {
        return Err(BrainfuckError::InvalidExtension { path: path.to_path_buf() });
    }
    fs::read(path).map_err(|e| BrainfuckError::SourceNotFound {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load `source` strictly and run it against stdin/stdout.
pub fn run_source(program: &str, source: &[u8], config: &Config, debug: bool) -> i32 {
    let mut env = Environment::with_config(config);
    if let Err(err) = env.load_program(source) {
        // Offsets are raw bytes; only show a caret window over valid text.
        let text = std::str::from_utf8(source).unwrap_or("");
        print_error(Some(program), text, &err);
        return 1;
    }

    let stdout = io::stdout();
    let stdin = io::stdin();
    let mut sink = FormattingSink::new(stdout.lock(), config.radix);
    let mut input = TokenInput::new(stdin.lock());

    let result = if debug {
        let stderr = io::stderr();
        let mut trace = stderr.lock();
        env.run_traced(&mut sink, &mut input, &mut trace)
    } else {
        env.run(&mut sink, &mut input)
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ = sink.get_mut().flush();
            print_error(Some(program), "", &err);
            1
        }
    }
}
