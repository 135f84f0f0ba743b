//! The exhaustive search over right-hand side choices.
//!
//! A non-recursive backtracking walk visits the blocks in order. At each
//! depth the low bits of the running XOR sum key into the block's lookup
//! table, enumerating exactly the right-hand sides consistent with every
//! choice made so far; a full assignment determines a solution class, which
//! is handed to the caller's report closure.

use crate::echelon::EchelonForm;
use crate::tables::SolverTables;
use bitrow::{BitVec, Block};
use std::ops::ControlFlow;

/// Work counters accumulated by one [`solve`] invocation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SolverStats {
    /// Table entries visited across all depths.
    pub candidates: u64,
    /// Block XOR operations applied to the running sum.
    pub xors: u64,
    /// Full assignments reported.
    pub solutions: u64,
}

/// Walks the search, invoking `report` for every full assignment.
///
/// `report` receives the monotonically increasing candidate counter and the
/// chosen right-hand side value per block (in echelonized column order); use
/// [`EchelonForm::solution_from_choices`] to turn the choices into a variable
/// assignment. Returning [`ControlFlow::Break`] stops the walk.
///
/// The tables are only read, so concurrent invocations over the same tables
/// are fine; each gets its own counters and cursor state.
pub fn solve<F>(tables: &SolverTables, mut report: F) -> SolverStats
where
    F: FnMut(u64, &[Block]) -> ControlFlow<()>,
{
    let block_count = tables.block_count();
    let mut stats = SolverStats::default();
    if block_count == 0 {
        return stats;
    }

    // level d of the running-sum stack holds the XOR of the update rows of
    // every choice above it; saving a level per depth makes backtracking O(1)
    let mut sums = vec![Block::ZERO; (block_count + 1) * block_count];
    let mut cursors = vec![(0u32, 0u32); block_count];
    let mut choices = vec![Block::ZERO; block_count];

    let mut depth = 0usize;
    cursors[0] = tables.block(0).bucket(sums[0] & tables.block(0).mask());
    loop {
        let (position, end) = cursors[depth];
        if position == end {
            if depth == 0 {
                break;
            }
            depth -= 1;
            continue;
        }
        cursors[depth].0 += 1;

        let list = tables.block(depth);
        let entry = list.entry(position as usize);
        choices[depth] = entry.value();
        stats.candidates += 1;

        if depth + 1 == block_count {
            stats.solutions += 1;
            if report(stats.candidates, &choices).is_break() {
                break;
            }
            continue;
        }

        let update = list.update_row(entry);
        let start = if cfg!(feature = "first-skip") { entry.first() } else { depth + 1 };
        let (source, target) = (depth * block_count, (depth + 1) * block_count);
        for block in depth + 1..block_count {
            sums[target + block] = sums[source + block];
        }
        for block in start..block_count {
            sums[target + block] ^= update[block];
            stats.xors += 1;
        }

        depth += 1;
        let list = tables.block(depth);
        cursors[depth] = list.bucket(sums[target + depth] & list.mask());
    }
    stats
}

/// Convenience wrapper collecting the canonical solution of every reported
/// assignment. Each comes with [`EchelonForm::free_rank`] free directions on
/// top (see [`EchelonForm::kernel_basis`]).
pub fn enumerate_solutions(tables: &SolverTables, form: &EchelonForm) -> (Vec<BitVec>, SolverStats) {
    let mut solutions = Vec::new();
    let stats = solve(tables, |_, choices| {
        solutions.push(form.solution_from_choices(choices));
        ControlFlow::Continue(())
    });
    (solutions, stats)
}
