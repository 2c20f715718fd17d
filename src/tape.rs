/// Default number of cells on a freshly created tape.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// A fixed-length byte tape with a single cursor.
///
/// Cells wrap on overflow and underflow. The cursor is clamped at both ends:
/// moving past the first or the last cell leaves it where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
}

#[allow(clippy::len_without_is_empty)]
impl Tape {
    /// Create a zeroed tape of `capacity` cells. A zero capacity is bumped to one cell.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity.max(1)],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Value of the cell under the cursor.
    pub fn get(&self) -> u8 {
        self.cells[self.cursor]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    pub fn increment(&mut self) {
        self.cells[self.cursor] = self.cells[self.cursor].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.cells[self.cursor] = self.cells[self.cursor].wrapping_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.cursor.saturating_add(1).min(self.cells.len() - 1);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Page-aligned window of `size` cells containing the cursor.
    /// Returns the start index of the window and the slice itself.
    pub fn window(&self, size: usize) -> (usize, &[u8]) {
        let size = size.max(1);
        let base = self.cursor - self.cursor % size;
        let end = (base + size).min(self.cells.len());
        (base, &self.cells[base..end])
    }

    /// Zero every cell and return the cursor to the first cell.
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.cursor = 0;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_SIZE)
    }
}
