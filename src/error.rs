use std::fmt;
use std::path::PathBuf;

/// Errors surfaced at the interpreter boundary.
///
/// The dispatch loop never produces structural errors; those are caught by
/// the loader before anything runs.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// A `]` appeared with no open `[` before it.
    #[error("could not match brackets: stray ']' at offset {offset}")]
    StrayLoopEnd { offset: usize },

    /// The source ended with loops still open.
    #[error("could not match brackets: {open} unclosed '['")]
    UnclosedLoop { open: usize },

    /// The source path does not carry the `.bf` extension.
    #[error("source file must carry a valid .bf extension: {}", path.display())]
    InvalidExtension { path: PathBuf },

    /// The source file could not be opened or read.
    #[error("source could not be located: {}: {source}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The line editor was requested but stdin is not a terminal.
    #[error("cannot start editor: stdin is not a TTY (use --bare or BF_REPL_MODE=bare)")]
    EditorUnavailable,

    /// A configuration value could not be parsed.
    #[error("invalid value for {key}: '{value}'")]
    InvalidConfig { key: &'static str, value: String },

    /// The shared input channel failed.
    #[error("broken input stream: {source}")]
    BrokenInput {
        #[source]
        source: std::io::Error,
    },

    /// Writing program output failed.
    #[error("broken output stream: {source}")]
    BrokenOutput {
        #[source]
        source: std::io::Error,
    },
}

/// The three families of fatal conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Loop markers do not balance.
    Structural,
    /// The program source or session could not be selected.
    Selection,
    /// An I/O channel broke mid-run.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::Selection => write!(f, "selection"),
            ErrorKind::Io => write!(f, "i/o"),
        }
    }
}

impl BrainfuckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrainfuckError::StrayLoopEnd { .. } | BrainfuckError::UnclosedLoop { .. } => {
                ErrorKind::Structural
            }
            BrainfuckError::InvalidExtension { .. }
            | BrainfuckError::SourceNotFound { .. }
            | BrainfuckError::EditorUnavailable
            | BrainfuckError::InvalidConfig { .. } => ErrorKind::Selection,
            BrainfuckError::BrokenInput { .. } | BrainfuckError::BrokenOutput { .. } => {
                ErrorKind::Io
            }
        }
    }
}

pub type Result<T, E = BrainfuckError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(BrainfuckError::StrayLoopEnd { offset: 0 }.kind(), ErrorKind::Structural);
        assert_eq!(BrainfuckError::UnclosedLoop { open: 2 }.kind(), ErrorKind::Structural);
        assert_eq!(
            BrainfuckError::InvalidExtension { path: "a.txt".into() }.kind(),
            ErrorKind::Selection
        );
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert_eq!(BrainfuckError::BrokenInput { source: io }.kind(), ErrorKind::Io);
    }

    #[test]
    fn messages_name_the_problem() {
        let err = BrainfuckError::UnclosedLoop { open: 1 };
        assert_eq!(err.to_string(), "could not match brackets: 1 unclosed '['");
    }
}
