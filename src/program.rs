use std::fmt;

/// One instruction of the tape language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `>` move the cursor toward higher addresses (clamped).
    MoveRight,
    /// `<` move the cursor toward lower addresses (clamped).
    MoveLeft,
    /// `+` increment the current cell.
    Increment,
    /// `-` decrement the current cell.
    Decrement,
    /// `.` emit the current cell.
    Output,
    /// `,` overwrite the current cell from input.
    Input,
    /// `[` loop begin.
    LoopBegin,
    /// `]` loop end.
    LoopEnd,
    /// No-op marker bracketing a balanced program segment.
    Terminator,
}

impl Op {
    /// Map a source byte to its opcode. Anything outside `><+-.,[]` is `None`.
    pub fn from_byte(byte: u8) -> Option<Op> {
        match byte {
            b'>' => Some(Op::MoveRight),
            b'<' => Some(Op::MoveLeft),
            b'+' => Some(Op::Increment),
            b'-' => Some(Op::Decrement),
            b'.' => Some(Op::Output),
            b',' => Some(Op::Input),
            b'[' => Some(Op::LoopBegin),
            b']' => Some(Op::LoopEnd),
            _ => None,
        }
    }

    pub fn from_char(ch: char) -> Option<Op> {
        if ch.is_ascii() { Op::from_byte(ch as u8) } else { None }
    }

    /// Source symbol of the opcode; the terminator has none.
    pub fn symbol(self) -> Option<char> {
        match self {
            Op::MoveRight => Some('>'),
            Op::MoveLeft => Some('<'),
            Op::Increment => Some('+'),
            Op::Decrement => Some('-'),
            Op::Output => Some('.'),
            Op::Input => Some(','),
            Op::LoopBegin => Some('['),
            Op::LoopEnd => Some(']'),
            Op::Terminator => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(ch) => write!(f, "{ch}"),
            None => write!(f, "∅"),
        }
    }
}

/// The flattened sequence of opcodes produced by the loader.
///
/// Built once per load and read-only while the executor walks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionBuffer {
    ops: Vec<Op>,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn get(&self, index: usize) -> Option<Op> {
        self.ops.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Op> + '_ {
        self.ops.iter().copied()
    }

    pub fn as_slice(&self) -> &[Op] {
        &self.ops
    }

    /// Number of real instructions, terminators excluded.
    pub fn opcode_count(&self) -> usize {
        self.ops.iter().filter(|&&op| op != Op::Terminator).count()
    }
}

impl fmt::Display for InstructionBuffer {
    /// Renders the program back as source text, without terminators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.ops.iter().filter_map(|op| op.symbol()) {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}
