use bitrow::{BitMatrix, BitVec};
use rand::Rng;

/// One block equation `x * lhs ∈ rows(rhs)`.
///
/// The two sides share their column count: `lhs` is `n` by `l`, `rhs` is `k`
/// by `l` with each row one permitted right-hand side vector.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EquationBlock {
    pub lhs: BitMatrix,
    pub rhs: BitMatrix,
}

impl EquationBlock {
    pub fn zeros(row_count: usize, width: usize, rhs_count: usize) -> Self {
        Self {
            lhs: BitMatrix::zeros(row_count, width),
            rhs: BitMatrix::zeros(rhs_count, width),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.lhs.column_count()
    }

    #[must_use]
    pub fn rhs_count(&self) -> usize {
        self.rhs.row_count()
    }

    /// Whether the block accepts `x`, that is `x * lhs` is a permitted
    /// right-hand side.
    pub fn accepts(&self, x: &BitVec) -> bool {
        self.rhs.contains_row(self.lhs.product(x))
    }
}

/// An MRHS equation system: parallel block equations over a shared set of
/// `row_count` GF(2) variables.
///
/// The row count is stored explicitly so that a system with zero blocks
/// still knows its variable count.
///
/// # Example
///
/// ```
/// use mrhs::MrhsSystem;
///
/// let system = MrhsSystem::uniform(6, 2, 3, 4);
/// assert_eq!(system.row_count(), 6);
/// assert_eq!(system.block_count(), 2);
/// assert_eq!(system.blocks[0].width(), 3);
/// assert_eq!(system.blocks[1].rhs_count(), 4);
/// ```
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MrhsSystem {
    pub(crate) row_count: usize,
    pub blocks: Vec<EquationBlock>,
}

impl MrhsSystem {
    /// A zero system of `block_count` blocks sharing one width and one
    /// right-hand side count.
    pub fn uniform(row_count: usize, block_count: usize, width: usize, rhs_count: usize) -> Self {
        let shapes = vec![(width, rhs_count); block_count];
        Self::variable(row_count, &shapes)
    }

    /// A zero system with per-block `(width, rhs_count)` shapes.
    ///
    /// # Panics
    ///
    /// Panics if any width exceeds the block size.
    pub fn variable(row_count: usize, shapes: &[(usize, usize)]) -> Self {
        let blocks = shapes
            .iter()
            .map(|&(width, rhs_count)| EquationBlock::zeros(row_count, width, rhs_count))
            .collect();
        Self { row_count, blocks }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn shapes(&self) -> Vec<(usize, usize)> {
        self.blocks.iter().map(|block| (block.width(), block.rhs_count())).collect()
    }

    /// Whether `x` satisfies every block equation.
    ///
    /// # Panics
    ///
    /// Panics if the vector length differs from the row count.
    pub fn is_solution(&self, x: &BitVec) -> bool {
        assert_eq!(x.len(), self.row_count);
        self.blocks.iter().all(|block| block.accepts(x))
    }

    /// Fills every block with a dense uniform left side and distinct uniform
    /// right-hand sides.
    pub fn fill_random<R: Rng>(&mut self, rng: &mut R) {
        for block in &mut self.blocks {
            block.lhs.randomize(rng);
            block.rhs.randomize_unique(rng);
        }
    }

    /// Like [`fill_random`](Self::fill_random) with sparse left sides: one 1
    /// per column.
    pub fn fill_random_sparse<R: Rng>(&mut self, rng: &mut R) {
        for block in &mut self.blocks {
            block.lhs.randomize_sparse_columns(rng);
            block.rhs.randomize_unique(rng);
        }
    }

    /// Sparse fill plus `density` extra 1s sprinkled over random blocks.
    pub fn fill_random_sparse_extra<R: Rng>(&mut self, rng: &mut R, density: usize) {
        self.fill_random_sparse(rng);
        if self.row_count == 0 || self.blocks.is_empty() {
            return;
        }
        for _ in 0..density {
            let block = rng.gen_range(0..self.blocks.len());
            let lhs = &mut self.blocks[block].lhs;
            let row = rng.gen_range(0..lhs.row_count());
            let column = rng.gen_range(0..lhs.column_count());
            lhs.set((row, column), true);
        }
    }

    /// Fills an AND gate circuit: the first `m - filter_count` blocks are AND
    /// gates whose output variables come after the `key_bits` key variables,
    /// the rest are dense filter blocks. All right-hand sides are the AND
    /// truth table.
    ///
    /// The fill is refused (no mutation) unless every block is shaped 3 wide
    /// with 4 right-hand sides, `filter_count <= block_count` and
    /// `row_count == key_bits + block_count - filter_count`.
    pub fn fill_and<R: Rng>(&mut self, rng: &mut R, key_bits: usize, filter_count: usize) {
        if !self.and_shape_holds(key_bits, filter_count) {
            return;
        }
        let gate_count = self.blocks.len() - filter_count;
        for (index, block) in self.blocks.iter_mut().enumerate() {
            if index < gate_count {
                block.lhs.randomize_and_columns(rng, key_bits + index);
            } else {
                block.lhs.randomize(rng);
            }
            block.rhs.fill_and_rows();
        }
    }

    /// Sparse variant of [`fill_and`](Self::fill_and): every block is a
    /// sparse AND gate with `density` extra input taps.
    pub fn fill_and_sparse<R: Rng>(&mut self, rng: &mut R, key_bits: usize, filter_count: usize, density: usize) {
        if !self.and_shape_holds(key_bits, filter_count) {
            return;
        }
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.lhs.randomize_sparse_and_columns(rng, key_bits + index, density);
            block.rhs.fill_and_rows();
        }
    }

    /// Picks a uniform assignment and patches every right-hand side set so
    /// that the assignment solves the system. Returns the planted solution.
    pub fn ensure_random_solution<R: Rng>(&mut self, rng: &mut R) -> BitVec {
        let mut solution = BitVec::zeros(self.row_count);
        solution.randomize(rng);
        for block in &mut self.blocks {
            let image = block.lhs.product(&solution);
            block.rhs.ensure_row(image, rng);
        }
        solution
    }

    fn and_shape_holds(&self, key_bits: usize, filter_count: usize) -> bool {
        filter_count <= self.blocks.len()
            && key_bits + self.blocks.len() - filter_count == self.row_count
            && self.blocks.iter().all(|block| block.width() == 3 && block.rhs_count() == 4)
    }
}
