//! Source scanner.
//!
//! Filters raw characters down to the eight-symbol alphabet, appends them to
//! an [`InstructionBuffer`] and keeps a running balance of loop markers.
//! Everything outside the alphabet is treated as a comment.

use std::io::{self, BufRead};

use crate::error::{BrainfuckError, Result};
use crate::program::{InstructionBuffer, Op};

/// Outcome of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scan {
    /// Net loop depth after the scan; negative means a stray `]` was seen.
    pub balance: isize,
    /// Bytes consumed from the source by this scan.
    pub consumed: usize,
}

impl Scan {
    pub fn is_balanced(&self) -> bool {
        self.balance == 0
    }

    /// Offset of the stray `]` that stopped the scan, if any.
    pub fn stray_offset(&self) -> Option<usize> {
        (self.balance < 0).then(|| self.consumed - 1)
    }
}

/// Scan an in-memory text buffer.
pub fn scan_str(buffer: &mut InstructionBuffer, source: &str, balance: isize) -> Scan {
    scan_bytes(buffer, source.as_bytes(), balance)
}

pub fn scan_bytes(buffer: &mut InstructionBuffer, source: &[u8], balance: isize) -> Scan {
    let mut balance = balance;
    let mut consumed = 0;

    if balance == 0 {
        buffer.push(Op::Terminator);
    }

    for &byte in source {
        consumed += 1;
        if !push_byte(buffer, byte, &mut balance) {
            return Scan { balance, consumed };
        }
    }

    if balance == 0 {
        buffer.push(Op::Terminator);
    }
    Scan { balance, consumed }
}

/// Scan an open stream until it is exhausted.
///
/// Read failures are reported as a broken input channel.
pub fn scan_reader<R: BufRead>(
    buffer: &mut InstructionBuffer,
    mut source: R,
    balance: isize,
) -> Result<Scan> {
    let mut balance = balance;
    let mut consumed = 0;

    if balance == 0 {
        buffer.push(Op::Terminator);
    }

    loop {
        let chunk = match source.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(BrainfuckError::BrokenInput { source: e }),
        };
        if chunk.is_empty() {
            break;
        }

        let mut used = 0;
        let mut stray = false;
        for &byte in chunk {
            used += 1;
            if !push_byte(buffer, byte, &mut balance) {
                stray = true;
                break;
            }
        }
        source.consume(used);
        consumed += used;

        if stray {
            return Ok(Scan { balance, consumed });
        }
    }

    if balance == 0 {
        buffer.push(Op::Terminator);
    }
    Ok(Scan { balance, consumed })
}

/// Append one byte if it is an opcode. Returns false once the balance goes negative.
fn push_byte(buffer: &mut InstructionBuffer, byte: u8, balance: &mut isize) -> bool {
    let Some(op) = Op::from_byte(byte) else {
        return true;
    };
    match op {
        Op::LoopBegin => *balance += 1,
        Op::LoopEnd => *balance -= 1,
        _ => {}
    }
    buffer.push(op);
    *balance >= 0
}
