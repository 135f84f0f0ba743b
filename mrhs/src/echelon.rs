//! Joint Gaussian elimination over the blocks of an MRHS system.
//!
//! The left sides of all blocks are stacked side by side and reduced as one
//! matrix. Pivot columns are swapped to the most significant end of their
//! block, so the low end of every block stays available as a lookup index
//! for the search; the identical column swaps are applied to the block's
//! right-hand side set, and the row operations are recorded in a
//! transformation matrix for solution reconstruction.

use crate::system::MrhsSystem;
use bitrow::{BitMatrix, BitVec, Block, BlockMatrix};

/// An MRHS system reduced to joint echelon form.
///
/// After reduction the pivot columns of all blocks, taken in pivot order,
/// form an identity on the first [`pivot_count`](Self::pivot_count) rows, and
/// every row below that is zero. Each block's pivots sit in its high columns
/// (the first pivot in the topmost column), and the permutation applied to
/// its columns is recorded so solutions and right-hand sides can be mapped
/// back to the original column order.
#[must_use]
#[derive(Clone, Debug)]
pub struct EchelonForm {
    matrix: BlockMatrix,
    rhs: Vec<BitMatrix>,
    pivot_counts: Vec<usize>,
    pivot_offsets: Vec<usize>,
    transform: BlockMatrix,
    column_permutations: Vec<Vec<usize>>,
    row_count: usize,
}

impl EchelonForm {
    /// Reduces the system, consuming it.
    pub fn new(system: MrhsSystem) -> Self {
        let row_count = system.row_count();
        let block_count = system.block_count();
        let mut rhs: Vec<BitMatrix> = Vec::with_capacity(block_count);
        let mut lhs: Vec<BitMatrix> = Vec::with_capacity(block_count);
        for block in system.blocks {
            lhs.push(block.lhs);
            rhs.push(block.rhs);
        }
        let mut matrix = if block_count == 0 {
            BlockMatrix::with_shape(row_count, Vec::new())
        } else {
            BlockMatrix::from_matrices(&lhs)
        };
        let mut transform = BlockMatrix::identity(row_count);
        let mut column_permutations: Vec<Vec<usize>> =
            lhs.iter().map(|matrix| (0..matrix.column_count()).collect()).collect();
        let mut pivot_counts = vec![0usize; block_count];

        let mut pivot_row = 0;
        for block in 0..block_count {
            let width = matrix.width(block);
            let mut top = width;
            let mut col = 0;
            while col < top && pivot_row < row_count {
                let Some(found) = (pivot_row..row_count).find(|&row| matrix.bit(row, block, col)) else {
                    col += 1;
                    continue;
                };
                top -= 1;
                matrix.swap_columns_in_block(block, col, top);
                rhs[block].swap_columns(col, top);
                column_permutations[block].swap(col, top);
                matrix.swap_rows(pivot_row, found);
                transform.swap_rows(pivot_row, found);
                for row in 0..row_count {
                    if row != pivot_row && matrix.bit(row, block, top) {
                        matrix.add_into_row(row, pivot_row);
                        transform.add_into_row(row, pivot_row);
                    }
                }
                pivot_counts[block] += 1;
                pivot_row += 1;
                // the column swapped down into position `col` is unscanned
            }
        }

        let mut pivot_offsets = Vec::with_capacity(block_count);
        let mut offset = 0;
        for &pivots in &pivot_counts {
            pivot_offsets.push(offset);
            offset += pivots;
        }

        Self {
            matrix,
            rhs,
            pivot_counts,
            pivot_offsets,
            transform,
            column_permutations,
            row_count,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.rhs.len()
    }

    /// Column count of one block.
    #[must_use]
    pub fn width(&self, block: usize) -> usize {
        self.matrix.width(block)
    }

    /// The echelonized joint coefficient matrix.
    #[must_use]
    pub fn matrix(&self) -> &BlockMatrix {
        &self.matrix
    }

    /// The permuted right-hand side sets, parallel to the blocks.
    #[must_use]
    pub fn rhs_sets(&self) -> &[BitMatrix] {
        &self.rhs
    }

    /// The recorded row-operation matrix `A` with `A * M = M'`, where `M` is
    /// the column-permuted input and `M'` the echelonized matrix.
    #[must_use]
    pub fn transform(&self) -> &BlockMatrix {
        &self.transform
    }

    #[must_use]
    pub fn pivot_counts(&self) -> &[usize] {
        &self.pivot_counts
    }

    /// Index of the first pivot row belonging to `block`.
    #[must_use]
    pub fn pivot_offset(&self, block: usize) -> usize {
        self.pivot_offsets[block]
    }

    /// Total number of pivots across all blocks.
    #[must_use]
    pub fn pivot_count(&self) -> usize {
        self.pivot_counts.iter().sum()
    }

    /// Number of free directions left after reduction.
    #[must_use]
    pub fn free_rank(&self) -> usize {
        self.row_count - self.pivot_count()
    }

    /// The permutation taking echelonized column positions of `block` to the
    /// original ones.
    #[must_use]
    pub fn column_permutation(&self, block: usize) -> &[usize] {
        &self.column_permutations[block]
    }

    /// Reconstructs the canonical assignment for one full choice of
    /// right-hand sides (one permuted value per block), leaving all free
    /// directions at zero. The solutions sharing this choice are the
    /// canonical one plus any combination of [`kernel_basis`](Self::kernel_basis).
    ///
    /// # Panics
    ///
    /// Panics if the number of choices differs from the block count.
    pub fn solution_from_choices(&self, choices: &[Block]) -> BitVec {
        assert_eq!(choices.len(), self.block_count());
        let selected = (0..self.block_count()).flat_map(|block| {
            let width = self.matrix.width(block);
            let offset = self.pivot_offsets[block];
            (0..self.pivot_counts[block])
                .filter(move |&pivot| choices[block].index(width - 1 - pivot))
                .map(move |pivot| offset + pivot)
        });
        let combined = self.transform.combine_rows(selected);
        self.blocks_to_bits(&combined)
    }

    /// The free directions of the variable space: adding any combination of
    /// these to a solution yields another solution of the same choice.
    #[must_use]
    pub fn kernel_basis(&self) -> Vec<BitVec> {
        (self.pivot_count()..self.row_count)
            .map(|row| self.blocks_to_bits(self.transform.row(row)))
            .collect()
    }

    fn blocks_to_bits(&self, blocks: &[Block]) -> BitVec {
        let words: Vec<u64> = blocks.iter().map(|&block| block.0).collect();
        BitVec::from_words(self.row_count, &words)
    }
}
