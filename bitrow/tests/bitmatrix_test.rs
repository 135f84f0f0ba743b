use bitrow::{BitMatrix, BitVec, Block};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

proptest! {
    #[test]
    fn shape(row_count in 0..60usize, column_count in 0..=64usize) {
        let matrix = BitMatrix::zeros(row_count, column_count);
        assert_eq!(matrix.row_count(), row_count);
        assert_eq!(matrix.column_count(), column_count);
        assert_eq!(matrix.shape(), (row_count, column_count));
        assert!(matrix.is_zero());
    }

    #[test]
    fn get_set_roundtrip(matrix in nonempty_bitmatrix(40), seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut matrix = matrix;
        let index = (rng.gen_range(0..matrix.row_count()), rng.gen_range(0..matrix.column_count()));
        matrix.set(index, true);
        assert!(matrix.get(index));
        assert!(matrix[index]);
        matrix.set(index, false);
        assert!(!matrix.get(index));
    }

    #[test]
    fn swap_columns_moves_bits(matrix in nonempty_bitmatrix(40), raw in (0..64usize, 0..64usize)) {
        let columns = (raw.0 % matrix.column_count(), raw.1 % matrix.column_count());
        let mut swapped = matrix.clone();
        swapped.swap_columns(columns.0, columns.1);
        for row in 0..matrix.row_count() {
            assert_eq!(matrix.get((row, columns.0)), swapped.get((row, columns.1)));
            assert_eq!(matrix.get((row, columns.1)), swapped.get((row, columns.0)));
        }
    }

    #[test]
    fn column_extraction_matches_get(matrix in nonempty_bitmatrix(40), raw_column in 0..64usize) {
        let column_index = raw_column % matrix.column_count();
        let column = matrix.column(column_index);
        assert_eq!(column.len(), matrix.row_count());
        for row in 0..matrix.row_count() {
            assert_eq!(column.index(row), matrix.get((row, column_index)));
        }
    }

    #[test]
    fn add_column_is_columnwise_xor(matrix in nonempty_bitmatrix(40), raw_column in 0..64usize, seed in any::<u64>()) {
        let column_index = raw_column % matrix.column_count();
        let mut vector = BitVec::zeros(matrix.row_count());
        vector.randomize(&mut SmallRng::seed_from_u64(seed));
        let mut updated = matrix.clone();
        updated.add_column(&vector, column_index);
        for row in 0..matrix.row_count() {
            assert_eq!(updated.get((row, column_index)), matrix.get((row, column_index)) ^ vector.index(row));
        }
    }

    #[test]
    fn add_constant_flips_whole_column(matrix in nonempty_bitmatrix(40), raw_column in 0..64usize) {
        let column_index = raw_column % matrix.column_count();
        let mut updated = matrix.clone();
        updated.add_constant(true, column_index);
        for row in 0..matrix.row_count() {
            assert_eq!(updated.get((row, column_index)), !matrix.get((row, column_index)));
        }
        updated.add_constant(false, column_index);
        assert_eq!(updated.column(column_index).weight(), matrix.row_count() - matrix.column(column_index).weight());
    }

    #[test]
    fn active_rows_flag_nonzero_rows(matrix in arbitrary_bitmatrix(40)) {
        let active = matrix.active_rows();
        for row in 0..matrix.row_count() {
            assert_eq!(active.index(row), !matrix.row(row).is_zero());
        }
    }

    #[test]
    fn keep_rows_compacts_in_order(matrix in nonempty_bitmatrix(40), seed in any::<u64>()) {
        let mut mask = BitVec::zeros(matrix.row_count());
        mask.randomize(&mut SmallRng::seed_from_u64(seed));
        let mut compacted = matrix.clone();
        compacted.keep_rows(&mask);
        assert_eq!(compacted.row_count(), mask.weight());
        for (new_row, old_row) in mask.support().enumerate() {
            assert_eq!(compacted.row(new_row), matrix.row(old_row));
        }
    }

    #[test]
    fn randomize_unique_rows_are_distinct(row_count in 1..16usize, column_count in 4..=64usize, seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut matrix = BitMatrix::zeros(row_count, column_count);
        matrix.randomize_unique(&mut rng);
        let distinct: HashSet<u64> = matrix.rows().map(Block::into).collect();
        assert_eq!(distinct.len(), row_count);
    }

    #[test]
    fn sparse_columns_have_single_ones(row_count in 1..40usize, column_count in 1..=64usize, seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut matrix = BitMatrix::zeros(row_count, column_count);
        matrix.randomize_sparse_columns(&mut rng);
        for column in 0..column_count {
            assert_eq!(matrix.column(column).weight(), 1);
        }
    }

    #[test]
    fn product_matches_row_accumulation(matrix in nonempty_bitmatrix(40), seed in any::<u64>()) {
        let mut x = BitVec::zeros(matrix.row_count());
        x.randomize(&mut SmallRng::seed_from_u64(seed));
        let product = matrix.product(&x);
        let mut expected = Block::ZERO;
        for row in 0..matrix.row_count() {
            if x.index(row) {
                expected ^= matrix.row(row);
            }
        }
        assert_eq!(product, expected);
    }
}

prop_compose! {
    fn arbitrary_bitmatrix(max_rows: usize)(row_count in 0..max_rows, column_count in 0..=64usize, seed in any::<u64>()) -> BitMatrix {
        let mut matrix = BitMatrix::zeros(row_count, column_count);
        matrix.randomize(&mut SmallRng::seed_from_u64(seed));
        matrix
    }
}

prop_compose! {
    fn nonempty_bitmatrix(max_rows: usize)(row_count in 1..max_rows, column_count in 1..=64usize, seed in any::<u64>()) -> BitMatrix {
        let mut matrix = BitMatrix::zeros(row_count, column_count);
        matrix.randomize(&mut SmallRng::seed_from_u64(seed));
        matrix
    }
}

#[test]
fn identity_has_unit_rows() {
    let id = BitMatrix::identity(8);
    for row in 0..8 {
        assert_eq!(id.row(row), Block(1 << row));
        assert_eq!(id.column(row).support().collect::<Vec<_>>(), vec![row]);
    }
}

#[test]
fn and_gate_columns_stay_below_output() {
    let mut rng = SmallRng::seed_from_u64(31);
    for output_row in 0..6 {
        let mut matrix = BitMatrix::zeros(6, 3);
        matrix.randomize_and_columns(&mut rng, output_row);
        assert_eq!(matrix.column(2).support().collect::<Vec<_>>(), vec![output_row]);
        for column in 0..2 {
            assert!(matrix.column(column).support().all(|row| row < output_row));
        }
    }
}

#[test]
fn sparse_and_gate_has_tap_inputs() {
    let mut rng = SmallRng::seed_from_u64(32);
    let mut matrix = BitMatrix::zeros(6, 3);
    matrix.randomize_sparse_and_columns(&mut rng, 4, 0);
    assert_eq!(matrix.column(0).weight(), 1);
    assert_eq!(matrix.column(1).weight(), 1);
    assert_eq!(matrix.column(2).support().collect::<Vec<_>>(), vec![4]);
}
