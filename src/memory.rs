use crate::numeral::clamp_index;

/// Capacity of the plain RAM configuration.
pub const SMALL_MEMORY: usize = 256;
/// Capacity of the configuration that carries a video region.
pub const VIDEO_MEMORY: usize = 768;

/// Flat, fixed-length byte memory with clamped indexing.
///
/// Reads and writes never fail: any index is folded into `[0, size - 1]`
/// by [`clamp_index`], so an address past the end touches the last cell
/// and a negative address touches the cell at its absolute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<u8>,
}

impl Memory {
    /// Create a zero-filled memory. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0u8; capacity.max(1)],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn read(&self, index: i64) -> u8 {
        self.cells[clamp_index(index, self.cells.len())]
    }

    pub fn write(&mut self, index: i64, value: u8) {
        let idx = clamp_index(index, self.cells.len());
        self.cells[idx] = value;
    }

    /// Read-only view of `[start, end)`, both ends clamped like indices
    /// except that `end` may equal `size`. Empty when `start >= end`.
    pub fn region(&self, start: usize, end: usize) -> &[u8] {
        let len = self.cells.len();
        let end = end.min(len);
        let start = start.min(end);
        &self.cells[start..end]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Render the whole memory as a bracketed list for debugging.
    pub fn dump(&self) -> String {
        format!("{:?}", self.cells)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(VIDEO_MEMORY)
    }
}
