//! Per-block lookup tables for the exhaustive search.
//!
//! For every block the permitted right-hand sides are bucket-sorted by the
//! low (non-pivot) bits the search will have accumulated by the time it
//! reaches the block. Each entry carries an update row: the XOR of the pivot
//! rows its pivot bits select, which is the entry's whole contribution to
//! the running sum of deeper blocks. Update rows are owned here, so the
//! tables stay valid independently of the echelon form they were built from.

use crate::echelon::EchelonForm;
use bitrow::Block;
use std::collections::HashSet;

/// One permitted right-hand side, pre-hashed into its lookup bucket.
#[derive(Clone, Debug)]
pub(crate) struct TableEntry {
    value: Block,
    row: u32,
    first: u32,
}

impl TableEntry {
    pub(crate) fn value(&self) -> Block {
        self.value
    }

    /// First block index past the owner that the update row can change.
    pub(crate) fn first(&self) -> usize {
        self.first as usize
    }
}

/// Search state and lookup table for one block.
#[derive(Clone, Debug)]
pub(crate) struct ActiveList {
    mask: Block,
    entries: Vec<TableEntry>,
    bucket_bounds: Vec<u32>,
    rows: Vec<Block>,
    stride: usize,
}

impl ActiveList {
    pub(crate) fn mask(&self) -> Block {
        self.mask
    }

    /// The contiguous run of entries bucketed under `key`.
    pub(crate) fn bucket(&self, key: Block) -> (u32, u32) {
        let index = key.0 as usize;
        (self.bucket_bounds[index], self.bucket_bounds[index + 1])
    }

    pub(crate) fn entry(&self, index: usize) -> &TableEntry {
        &self.entries[index]
    }

    /// The update row of an entry, one block per block position.
    pub(crate) fn update_row(&self, entry: &TableEntry) -> &[Block] {
        let start = entry.row as usize * self.stride;
        &self.rows[start..start + self.stride]
    }
}

/// The complete lookup table set, one active list per block.
///
/// Building the tables deduplicates exact right-hand side repeats, so a
/// caller-provided set with duplicate rows yields each solution once.
#[must_use]
#[derive(Clone, Debug)]
pub struct SolverTables {
    blocks: Vec<ActiveList>,
}

impl SolverTables {
    /// Prepares the tables for an echelonized system.
    ///
    /// # Panics
    ///
    /// Panics if some block has more free bits than an index can address,
    /// which would demand an impossible allocation.
    pub fn new(form: &EchelonForm) -> Self {
        let block_count = form.block_count();
        let blocks = (0..block_count)
            .map(|block| Self::prepare_block(form, block, block_count))
            .collect();
        Self { blocks }
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn block(&self, index: usize) -> &ActiveList {
        &self.blocks[index]
    }

    fn prepare_block(form: &EchelonForm, block: usize, block_count: usize) -> ActiveList {
        let width = form.width(block);
        let pivots = form.pivot_counts()[block];
        let offset = form.pivot_offset(block);
        let free = width - pivots;
        assert!(free < usize::BITS as usize, "free bits of block {block} overflow the table index");
        let mask = Block::low_mask(free);

        // defensive deduplication of caller-provided right-hand sides
        let mut seen = HashSet::new();
        let values: Vec<Block> = form.rhs_sets()[block]
            .rows()
            .filter(|value| seen.insert(value.0))
            .collect();

        let mut rows = vec![Block::ZERO; values.len() * block_count];
        let mut keys = Vec::with_capacity(values.len());
        let mut firsts = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            let update = &mut rows[index * block_count..(index + 1) * block_count];
            for pivot in 0..pivots {
                if value.index(width - 1 - pivot) {
                    for (accumulator, &contribution) in update.iter_mut().zip(form.matrix().row(offset + pivot)) {
                        *accumulator ^= contribution;
                    }
                }
            }
            // the entry's own pivot rows may feed its own low columns; the
            // bucket key folds that contribution in so the lookup is exact
            keys.push((value ^ update[block]) & mask);
            let first = (block + 1..block_count).find(|&next| !update[next].is_zero());
            firsts.push(first.unwrap_or(block_count) as u32);
        }

        let bucket_count = 1usize << free;
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by_key(|&index| keys[index].0);
        let mut bucket_bounds = vec![0u32; bucket_count + 1];
        for &key in &keys {
            bucket_bounds[key.0 as usize + 1] += 1;
        }
        for index in 0..bucket_count {
            bucket_bounds[index + 1] += bucket_bounds[index];
        }
        let entries = order
            .into_iter()
            .map(|index| TableEntry {
                value: values[index],
                row: index as u32,
                first: firsts[index],
            })
            .collect();

        ActiveList {
            mask,
            entries,
            bucket_bounds,
            rows,
            stride: block_count,
        }
    }
}
