use std::io::{self, IsTerminal, Write};

use bf_console::cli_util::print_error;
use bf_console::session::{select_mode, ModeFlagOverride, ReplMode};
use bf_console::{Config, Environment, Session};

/// Start an interactive session. Returns the process exit code.
pub fn run(program: &str, mode_flag: ModeFlagOverride, config: &Config, debug: bool) -> i32 {
    // Determine mode: flags -> env -> auto-detect via is_terminal()
    let mode = match select_mode(mode_flag) {
        Ok(m) => m,
        Err(err) => {
            print_error(Some(program), "", &err);
            return 1;
        }
    };

    // Install SIGINT (ctrl+c) handler to flush and exit(0) immediately
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let env = Environment::with_config(config);
    let mut session = Session::new(env, io::stdin().lock(), io::stdout().lock(), config.radix);
    session.set_trace(debug);

    if mode == ReplMode::Editor {
        // Banners only when stderr is a TTY
        if io::stderr().is_terminal() {
            eprintln!("The Brainfuck Interactive Console Interpreter");
            eprintln!("Enter runs a line once its loops balance. :tape shows cells, :reset clears, :exit or ctrl+c quits.");
            let _ = io::stderr().flush();
        }
        session = match session.with_editor() {
            Ok(s) => s,
            Err(err) => {
                print_error(Some(program), "", &err);
                return 1;
            }
        };
    }

    match session.run() {
        Ok(()) => 0,
        Err(err) => {
            print_error(Some(program), "", &err);
            1
        }
    }
}
