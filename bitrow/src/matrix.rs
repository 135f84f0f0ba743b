use crate::bitvec::BitVec;
use crate::block::{Block, BLOCK_BITS};
use rand::Rng;
use std::fmt;
use std::ops::Index;

const TRUE: bool = true;
const FALSE: bool = false;

/// A GF(2) matrix narrow enough that every row fits in one [`Block`].
///
/// `BitMatrix` stores `row_count` rows of `column_count` bits with
/// `column_count <= 64`; bit `j` of a row is column `j`, and bits above
/// `column_count` stay zero. Row access is a single word read, which is what
/// makes the word-at-a-time column swaps and row XORs of the solver cheap.
///
/// # Construction
///
/// ```
/// use bitrow::BitMatrix;
///
/// let zeros = BitMatrix::zeros(4, 3);
/// let id = BitMatrix::identity(3);
/// assert_eq!(id.get((1, 1)), true);
/// assert_eq!(id.get((1, 2)), false);
/// ```
///
/// # Column operations
///
/// ```
/// use bitrow::BitMatrix;
///
/// let mut m = BitMatrix::identity(3);
/// m.swap_columns(0, 2);
/// assert_eq!(m.get((0, 2)), true);
///
/// let column = m.column(2);
/// assert_eq!(column.support().collect::<Vec<_>>(), vec![0]);
/// ```
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BitMatrix {
    column_count: usize,
    rows: Vec<Block>,
}

impl BitMatrix {
    /// Creates a zero matrix.
    ///
    /// # Panics
    ///
    /// Panics if `column_count` exceeds the block width.
    pub fn zeros(row_count: usize, column_count: usize) -> Self {
        assert!(column_count <= BLOCK_BITS, "row does not fit a block");
        Self {
            column_count,
            rows: vec![Block::ZERO; row_count],
        }
    }

    /// # Panics
    ///
    /// Panics if `dimension` exceeds the block width.
    pub fn identity(dimension: usize) -> Self {
        let mut matrix = Self::zeros(dimension, dimension);
        for index in 0..dimension {
            matrix.rows[index] = Block(1 << index);
        }
        matrix
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.column_count)
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn row(&self, index: usize) -> Block {
        self.rows[index]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = Block> + '_ {
        self.rows.iter().copied()
    }

    /// Overwrites a row; bits above the column count are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn assign_row(&mut self, index: usize, value: Block) {
        self.rows[index] = value & self.column_mask();
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    pub fn get(&self, index: (usize, usize)) -> bool {
        assert!(index.1 < self.column_count);
        self.rows[index.0].index(index.1)
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, index: (usize, usize), to: bool) {
        assert!(index.1 < self.column_count);
        self.rows[index.0].assign_index(index.1, to);
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(|row| row.is_zero())
    }

    /// Extracts column `index` as a vector over the rows.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn column(&self, index: usize) -> BitVec {
        assert!(index < self.column_count);
        let mut column = BitVec::zeros(self.rows.len());
        for (row_index, row) in self.rows.iter().enumerate() {
            if row.index(index) {
                column.assign_index(row_index, true);
            }
        }
        column
    }

    /// XORs a column vector into column `index`, one bit per row.
    ///
    /// # Panics
    ///
    /// Panics if the vector length differs from the row count or `index` is
    /// out of bounds.
    pub fn add_column(&mut self, column: &BitVec, index: usize) {
        assert_eq!(column.len(), self.rows.len());
        assert!(index < self.column_count);
        for row_index in column.support() {
            self.rows[row_index].negate_index(index);
        }
    }

    /// XORs a constant bit into column `index` of every row.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn add_constant(&mut self, value: bool, index: usize) {
        assert!(index < self.column_count);
        if value {
            for row in &mut self.rows {
                row.negate_index(index);
            }
        }
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap_columns(&mut self, left: usize, right: usize) {
        assert!(left < self.column_count && right < self.column_count);
        if left == right {
            return;
        }
        for row in &mut self.rows {
            let left_bit = row.index(left);
            let right_bit = row.index(right);
            row.assign_index(left, right_bit);
            row.assign_index(right, left_bit);
        }
    }

    /// The mask of rows containing at least one set bit.
    #[must_use]
    pub fn active_rows(&self) -> BitVec {
        let mut active = BitVec::zeros(self.rows.len());
        for (row_index, row) in self.rows.iter().enumerate() {
            if !row.is_zero() {
                active.assign_index(row_index, true);
            }
        }
        active
    }

    /// Keeps only the rows whose mask bit is set, renumbering the rest.
    ///
    /// # Panics
    ///
    /// Panics if the mask length differs from the row count.
    pub fn keep_rows(&mut self, mask: &BitVec) {
        assert_eq!(mask.len(), self.rows.len());
        let mut kept = 0;
        for row_index in 0..self.rows.len() {
            if mask.index(row_index) {
                self.rows[kept] = self.rows[row_index];
                kept += 1;
            }
        }
        self.rows.truncate(kept);
    }

    #[must_use]
    pub fn contains_row(&self, value: Block) -> bool {
        self.rows.contains(&value)
    }

    /// Makes sure `value` appears among the rows, overwriting a uniformly
    /// chosen row if it does not. A matrix with no rows is left untouched.
    pub fn ensure_row<R: Rng>(&mut self, value: Block, rng: &mut R) {
        debug_assert!((value & self.column_mask()) == value);
        if self.rows.is_empty() || self.contains_row(value) {
            return;
        }
        let victim = rng.gen_range(0..self.rows.len());
        self.rows[victim] = value;
    }

    /// The vector-matrix product `x * self` over GF(2).
    ///
    /// # Panics
    ///
    /// Panics if the vector length differs from the row count.
    pub fn product(&self, x: &BitVec) -> Block {
        assert_eq!(x.len(), self.rows.len());
        x.support().fold(Block::ZERO, |acc, row_index| acc ^ self.rows[row_index])
    }

    /// Draws every bit independently uniform.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        let mask = self.column_mask();
        for row in &mut self.rows {
            *row = Block(rng.gen::<u64>()) & mask;
        }
    }

    /// Draws uniform rows, redrawing any duplicate until all rows are
    /// pairwise distinct.
    ///
    /// # Panics
    ///
    /// Panics if more distinct rows are requested than the width can offer.
    pub fn randomize_unique<R: Rng>(&mut self, rng: &mut R) {
        assert!(
            self.column_count >= usize::BITS as usize || self.rows.len() <= 1usize << self.column_count,
            "cannot draw {} distinct rows of width {}",
            self.rows.len(),
            self.column_count
        );
        let mask = self.column_mask();
        for index in 0..self.rows.len() {
            loop {
                let candidate = Block(rng.gen::<u64>()) & mask;
                if !self.rows[..index].contains(&candidate) {
                    self.rows[index] = candidate;
                    break;
                }
            }
        }
    }

    /// Clears the matrix and puts exactly one 1 in each column, at an
    /// independently chosen uniform row.
    pub fn randomize_sparse_columns<R: Rng>(&mut self, rng: &mut R) {
        self.rows.fill(Block::ZERO);
        if self.rows.is_empty() {
            return;
        }
        for column in 0..self.column_count {
            let row = rng.gen_range(0..self.rows.len());
            self.rows[row].assign_index(column, true);
        }
    }

    /// Fills an AND gate shape: columns 0 and 1 are dense uniform patterns
    /// over the rows below `output_row`, column 2 is the unit vector at
    /// `output_row`. A matrix that is not 3 columns wide, or an out-of-range
    /// output row, leaves the matrix untouched.
    pub fn randomize_and_columns<R: Rng>(&mut self, rng: &mut R, output_row: usize) {
        if self.column_count != 3 || output_row >= self.rows.len() {
            return;
        }
        self.rows.fill(Block::ZERO);
        for row in 0..output_row {
            self.rows[row].assign_index(0, rng.gen());
            self.rows[row].assign_index(1, rng.gen());
        }
        self.rows[output_row].assign_index(2, true);
    }

    /// Sparse variant of [`randomize_and_columns`](Self::randomize_and_columns):
    /// each input column gets a single 1 at a uniform row below `output_row`,
    /// then `density` extra 1s are sprinkled over the input columns.
    pub fn randomize_sparse_and_columns<R: Rng>(&mut self, rng: &mut R, output_row: usize, density: usize) {
        if self.column_count != 3 || output_row >= self.rows.len() {
            return;
        }
        self.rows.fill(Block::ZERO);
        if output_row > 0 {
            for column in 0..2 {
                let row = rng.gen_range(0..output_row);
                self.rows[row].assign_index(column, true);
            }
            for _ in 0..density {
                let row = rng.gen_range(0..output_row);
                let column = rng.gen_range(0..2);
                self.rows[row].assign_index(column, true);
            }
        }
        self.rows[output_row].assign_index(2, true);
    }

    /// Writes the truth table of `z = x AND y` over columns (x, y, z).
    /// A matrix not shaped 4 by 3 is left untouched.
    pub fn fill_and_rows(&mut self) {
        if self.shape() != (4, 3) {
            return;
        }
        let inputs = [(false, false), (false, true), (true, false), (true, true)];
        for (row, (x, y)) in inputs.into_iter().enumerate() {
            self.rows[row] = Block::ZERO;
            self.rows[row].assign_index(0, x);
            self.rows[row].assign_index(1, y);
            self.rows[row].assign_index(2, x && y);
        }
    }

    fn column_mask(&self) -> Block {
        Block::low_mask(self.column_count)
    }
}

impl Index<(usize, usize)> for BitMatrix {
    type Output = bool;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        if self.get(index) {
            &TRUE
        } else {
            &FALSE
        }
    }
}

impl fmt::Display for BitMatrix {
    /// Rows as bit strings, most significant column first.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for column in (0..self.column_count).rev() {
                write!(formatter, "{}", u8::from(row.index(column)))?;
            }
            writeln!(formatter)?;
        }
        Ok(())
    }
}
