//! The dispatch loop.
//!
//! Loops are resolved at runtime by scanning the instruction buffer for the
//! matching marker; nothing is precomputed. The buffer must be balanced on
//! entry; `Environment` refuses to run anything else.

use std::io::Write;

use crate::error::{BrainfuckError, Result};
use crate::input::InputSource;
use crate::output::OutputSink;
use crate::program::{InstructionBuffer, Op};
use crate::tape::Tape;

/// Walks a balanced [`InstructionBuffer`] once against a [`Tape`].
pub struct Executor<'a> {
    tape: &'a mut Tape,
    program: &'a InstructionBuffer,
}

impl<'a> Executor<'a> {
    pub fn new(tape: &'a mut Tape, program: &'a InstructionBuffer) -> Self {
        Self { tape, program }
    }

    /// Run the program to completion.
    pub fn run(&mut self, sink: &mut dyn OutputSink, input: &mut dyn InputSource) -> Result<()> {
        self.execute(sink, input, None)
    }

    /// Run the program while writing a step-by-step table of what each
    /// instruction did to `trace`. Tape effects and I/O are identical to [`run`](Self::run).
    pub fn run_traced(
        &mut self,
        sink: &mut dyn OutputSink,
        input: &mut dyn InputSource,
        trace: &mut dyn Write,
    ) -> Result<()> {
        self.execute(sink, input, Some(trace))
    }

    fn execute(
        &mut self,
        sink: &mut dyn OutputSink,
        input: &mut dyn InputSource,
        mut trace: Option<&mut dyn Write>,
    ) -> Result<()> {
        let program = self.program;
        let ops = program.as_slice();
        let mut ip = 0;
        let mut step: usize = 0;

        if let Some(t) = trace.as_deref_mut() {
            write_trace(t, "STEP | IP  | PTR | CELL | INSTR | ACTION")?;
            write_trace(t, "-----+-----+-----+------+-------+------------------------------------------------")?;
        }

        while ip < ops.len() {
            let op = ops[ip];
            let (ip_before, ptr_before, cell_before) = (ip, self.tape.cursor(), self.tape.get());
            let mut action: Option<String> = trace.is_some().then(String::new);

            match op {
                Op::MoveRight => {
                    self.tape.move_right();
                    ip += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.tape.cursor()); }
                }
                Op::MoveLeft => {
                    self.tape.move_left();
                    ip += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.tape.cursor()); }
                }
                Op::Increment => {
                    self.tape.increment();
                    ip += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Increment cell[{}] from {} to {}", ptr_before, cell_before, self.tape.get()); }
                }
                Op::Decrement => {
                    self.tape.decrement();
                    ip += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{}] from {} to {}", ptr_before, cell_before, self.tape.get()); }
                }
                Op::Output => {
                    sink.emit(self.tape.get())
                        .map_err(|e| BrainfuckError::BrokenOutput { source: e })?;
                    ip += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Output cell[{}] = {}", ptr_before, cell_before); }
                }
                Op::Input => {
                    // Flush first so a prompt printed by the program is visible before blocking.
                    sink.flush().map_err(|e| BrainfuckError::BrokenOutput { source: e })?;
                    let value = input
                        .read_cell()
                        .map_err(|e| BrainfuckError::BrokenInput { source: e })?;
                    // EOF leaves a zero in the cell
                    self.tape.set(value.unwrap_or(0));
                    ip += 1;
                    if let Some(a) = action.as_mut() {
                        *a = match value {
                            Some(v) => format!("Read {} into cell[{}]", v, ptr_before),
                            None => format!("Read EOF; cell[{}] set to 0", ptr_before),
                        };
                    }
                }
                Op::LoopBegin => {
                    if self.tape.get() == 0 {
                        let end = find_loop_end(ops, ip);
                        if let Some(a) = action.as_mut() { *a = format!("Cell is 0; skip past matching ']' at IP {}", end); }
                        ip = end + 1;
                    } else {
                        if let Some(a) = action.as_mut() { *a = "Enter loop (cell != 0)".to_string(); }
                        ip += 1;
                    }
                }
                Op::LoopEnd => {
                    // Land on the matching '[' and let it re-test the cell.
                    let begin = find_loop_begin(ops, ip);
                    if let Some(a) = action.as_mut() { *a = format!("Jump back to matching '[' at IP {}", begin); }
                    ip = begin;
                }
                Op::Terminator => {
                    ip += 1;
                    if let Some(a) = action.as_mut() { *a = "No-op".to_string(); }
                }
            }

            if let Some(t) = trace.as_deref_mut() {
                let row = format!(
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    step,
                    ip_before,
                    ptr_before,
                    cell_before,
                    op,
                    action.unwrap_or_default()
                );
                write_trace(t, &row)?;
            }
            step += 1;
        }

        sink.flush().map_err(|e| BrainfuckError::BrokenOutput { source: e })
    }
}

/// Index of the `]` matching the `[` at `open`.
pub fn find_loop_end(ops: &[Op], open: usize) -> usize {
    let mut ip = open;
    let mut depth = 1usize;
    while depth != 0 {
        ip += 1;
        match ops[ip] {
            Op::LoopBegin => depth += 1,
            Op::LoopEnd => depth -= 1,
            _ => {}
        }
    }
    ip
}

/// Index of the `[` matching the `]` at `close`.
pub fn find_loop_begin(ops: &[Op], close: usize) -> usize {
    let mut ip = close;
    let mut depth = 0isize;
    loop {
        match ops[ip] {
            Op::LoopEnd => depth += 1,
            Op::LoopBegin => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return ip;
        }
        ip -= 1;
    }
}

fn write_trace(trace: &mut dyn Write, line: &str) -> Result<()> {
    writeln!(trace, "{line}").map_err(|e| BrainfuckError::BrokenOutput { source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::scan_str;
    use std::collections::VecDeque;

    fn run_on(tape: &mut Tape, code: &str, input: &[u8]) -> Vec<u8> {
        let mut program = InstructionBuffer::new();
        let scan = scan_str(&mut program, code, 0);
        assert!(scan.is_balanced(), "test program must be balanced");
        let mut out: Vec<u8> = Vec::new();
        let mut input: VecDeque<u8> = input.iter().copied().collect();
        Executor::new(tape, &program).run(&mut out, &mut input).unwrap();
        out
    }

    #[test]
    fn multiplication_loop_moves_value_right() {
        let mut tape = Tape::new(10);
        run_on(&mut tape, "++[>++<-]", &[]);
        assert_eq!(tape.cells()[0], 0);
        assert_eq!(tape.cells()[1], 4);
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn nested_loops_run_to_completion() {
        let mut tape = Tape::new(10);
        // 3 * 4 * 2 into cell 2
        run_on(&mut tape, "+++[>++++[>++<-]<-]", &[]);
        assert_eq!(tape.cells()[..3], [0, 0, 24]);
    }

    #[test]
    fn clear_loop_zeroes_nonzero_cell() {
        let mut tape = Tape::new(4);
        tape.set(9);
        run_on(&mut tape, "[-]", &[]);
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn loop_on_zero_cell_is_skipped() {
        let mut tape = Tape::new(4);
        let out = run_on(&mut tape, "[.+]+", &[]);
        assert!(out.is_empty());
        assert_eq!(tape.get(), 1);
    }

    #[test]
    fn skipped_loop_with_nested_loop_inside() {
        let mut tape = Tape::new(4);
        run_on(&mut tape, "[[-]+[+]]>+", &[]);
        assert_eq!(tape.cells()[..2], [0, 1]);
    }

    #[test]
    fn output_and_input_follow_program_order() {
        let mut tape = Tape::new(4);
        let out = run_on(&mut tape, "++.,.,.", &[42]);
        assert_eq!(out, vec![2, 42, 0]);
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn empty_program_produces_nothing() {
        let mut tape = Tape::new(4);
        let out = run_on(&mut tape, "", &[]);
        assert!(out.is_empty());
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn moves_are_clamped_at_both_ends() {
        let mut tape = Tape::new(3);
        run_on(&mut tape, "<<<+>>>>>+", &[]);
        assert_eq!(tape.cells(), &[1, 0, 1]);
        assert_eq!(tape.cursor(), 2);
    }

    #[test]
    fn jump_helpers_find_matching_markers() {
        let ops: Vec<Op> = "[[][]]"
            .chars()
            .filter_map(Op::from_char)
            .collect();
        assert_eq!(find_loop_end(&ops, 0), 5);
        assert_eq!(find_loop_end(&ops, 1), 2);
        assert_eq!(find_loop_begin(&ops, 5), 0);
        assert_eq!(find_loop_begin(&ops, 4), 3);
    }

    #[test]
    fn trace_writes_a_row_per_step() {
        let mut tape = Tape::new(4);
        let mut program = InstructionBuffer::new();
        scan_str(&mut program, ">+", 0);
        let mut out: Vec<u8> = Vec::new();
        let mut trace: Vec<u8> = Vec::new();
        let mut input: VecDeque<u8> = VecDeque::new();
        Executor::new(&mut tape, &program)
            .run_traced(&mut out, &mut input, &mut trace)
            .unwrap();
        let text = String::from_utf8(trace).unwrap();
        assert!(text.starts_with("STEP | IP"));
        assert!(text.contains("Moved pointer head to index 1"));
        assert!(text.contains("Increment cell[1] from 0 to 1"));
        // header, separator, two terminators, two instructions
        assert_eq!(text.lines().count(), 6);
    }
}
