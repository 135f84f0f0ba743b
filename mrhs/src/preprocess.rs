//! In-place linear simplification passes run before echelonization.
//!
//! Blocks with a single permitted right-hand side are plain linear equations
//! and can be substituted back into the whole system; blocks whose left side
//! went all-zero carry no constraint on the remaining variables and are
//! dropped, together with the variables no surviving block touches.

use crate::system::MrhsSystem;
use bitrow::BitVec;

/// Substitutes one linear equation `<column, x> = rhs` into every block.
///
/// The pivot is the first set entry of `column`; every left-side column with
/// a 1 in the pivot row gets `column` XORed in, and the matching right-hand
/// side column absorbs the constant. Returns the number of columns touched;
/// a zero column is a no-op.
pub fn linear_substitution(system: &mut MrhsSystem, column: &BitVec, rhs: bool) -> usize {
    let Some(pivot) = column.first_set_at_or_after(0) else {
        return 0;
    };
    let mut count = 0;
    for block in &mut system.blocks {
        for col in 0..block.width() {
            if block.lhs.get((pivot, col)) {
                block.lhs.add_column(column, col);
                block.rhs.add_constant(rhs, col);
                count += 1;
            }
        }
    }
    count
}

/// Extracts every block with exactly one permitted right-hand side as plain
/// linear equations and substitutes them through the system.
///
/// The extracted block's own columns collapse to zero in the process; the
/// block itself is left in place for [`remove_empty`] to collect. Returns the
/// total number of substituted columns.
pub fn remove_linear(system: &mut MrhsSystem) -> usize {
    let mut count = 0;
    for index in 0..system.blocks.len() {
        if system.blocks[index].rhs_count() != 1 {
            continue;
        }
        for col in 0..system.blocks[index].width() {
            let column = system.blocks[index].lhs.column(col);
            let rhs = system.blocks[index].rhs.get((0, col));
            count += linear_substitution(system, &column, rhs);
        }
    }
    count
}

/// Drops blocks whose left side is all-zero and compacts the variable space.
///
/// Every surviving block keeps only the rows some block still touches; the
/// system's row count shrinks to the weight of that mask. Returns the mask
/// of kept rows (indexed in the old variable numbering) so callers can map
/// solutions back.
pub fn remove_empty(system: &mut MrhsSystem) -> BitVec {
    let mut active = BitVec::zeros(system.row_count);
    system.blocks.retain(|block| {
        let block_active = block.lhs.active_rows();
        if block_active.is_zero() {
            false
        } else {
            active |= &block_active;
            true
        }
    });
    for block in &mut system.blocks {
        block.lhs.keep_rows(&active);
    }
    system.row_count = active.weight();
    active
}
