use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Radix used for cells that have no printable representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Radix {
    /// `10`
    #[default]
    Decimal,
    /// `0x0a`
    Hex,
}

impl FromStr for Radix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dec" | "decimal" | "10" => Ok(Radix::Decimal),
            "hex" | "hexadecimal" | "16" => Ok(Radix::Hex),
            other => Err(format!("unknown radix '{other}', expected 'dec' or 'hex'")),
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Radix::Decimal => write!(f, "dec"),
            Radix::Hex => write!(f, "hex"),
        }
    }
}

/// Receives one cell value per `.` instruction.
pub trait OutputSink {
    fn emit(&mut self, value: u8) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Printable ASCII (space through tilde) is written as itself; anything else as a number.
pub fn format_cell(value: u8, radix: Radix) -> String {
    if is_printable(value) {
        return (value as char).to_string();
    }
    match radix {
        Radix::Decimal => value.to_string(),
        Radix::Hex => format!("{value:#04x}"),
    }
}

/// Same classification as C's `isprint` in the default locale.
pub fn is_printable(value: u8) -> bool {
    matches!(value, 0x20..=0x7e)
}

/// Sink that formats cells onto any writer.
pub struct FormattingSink<W: Write> {
    writer: W,
    radix: Radix,
}

impl<W: Write> FormattingSink<W> {
    pub fn new(writer: W, radix: Radix) -> Self {
        Self { writer, radix }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for FormattingSink<W> {
    fn emit(&mut self, value: u8) -> io::Result<()> {
        write!(self.writer, "{}", format_cell(value, self.radix))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Collects raw cell values; handy for embedding and tests.
impl OutputSink for Vec<u8> {
    fn emit(&mut self, value: u8) -> io::Result<()> {
        self.push(value);
        Ok(())
    }
}
