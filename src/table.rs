/// Flat transition storage shared by every automaton in the crate.
///
/// Row `r` occupies cells `r * arity .. (r + 1) * arity`. A cell holds the
/// target node index, with 0 meaning "no transition" (node 0 is the root
/// and is never the target of an edge).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
    arity: usize,
    cells: Vec<u32>,
}

impl TransitionTable {
    /// Creates a table holding a single empty row.
    pub fn new(arity: usize) -> Self {
        Self {
            arity,
            cells: vec![0; arity],
        }
    }

    /// Number of cells per row.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        if self.arity == 0 {
            0
        } else {
            self.cells.len() / self.arity
        }
    }

    /// Reserves room for `additional` more rows.
    pub fn reserve_rows(&mut self, additional: usize) {
        self.cells.reserve(additional * self.arity);
    }

    /// Appends an empty row and returns its index.
    #[inline]
    pub fn push_row(&mut self) -> u32 {
        let row = self.rows() as u32;
        self.cells.resize(self.cells.len() + self.arity, 0);
        row
    }

    /// Appends a copy of row `src` and returns the index of the copy.
    #[inline]
    pub fn copy_row(&mut self, src: u32) -> u32 {
        let row = self.rows() as u32;
        let start = src as usize * self.arity;
        self.cells.extend_from_within(start..start + self.arity);
        row
    }

    /// Returns the target of `row` at `key` (0 if absent).
    #[inline]
    pub fn get(&self, row: u32, key: usize) -> u32 {
        debug_assert!(key < self.arity, "key {key} out of bounds (arity {})", self.arity);
        self.cells[row as usize * self.arity + key]
    }

    /// Sets the target of `row` at `key`.
    #[inline]
    pub fn set(&mut self, row: u32, key: usize, target: u32) {
        debug_assert!(key < self.arity, "key {key} out of bounds (arity {})", self.arity);
        self.cells[row as usize * self.arity + key] = target;
    }

    /// Returns all cells of `row`.
    #[inline]
    pub fn row(&self, row: u32) -> &[u32] {
        let start = row as usize * self.arity;
        &self.cells[start..start + self.arity]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: u32) -> &mut [u32] {
        let start = row as usize * self.arity;
        &mut self.cells[start..start + self.arity]
    }

    /// Drops every row except a zeroed root row. Capacity is kept.
    pub fn reset(&mut self) {
        self.cells.truncate(self.arity);
        self.cells.fill(0);
    }
}
