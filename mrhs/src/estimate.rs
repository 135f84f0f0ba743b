//! Analytic cost predictions for the search.
//!
//! With blocks of width `l_i`, `p_i` pivots and `|S_i|` permitted right-hand
//! sides, the expected number of partial assignments alive when the walk
//! enters block `i` is the running product of `|S_j| * 2^(p_j - l_j)` over
//! the earlier blocks. Summing those products, with the appropriate weights,
//! gives the candidate and XOR counts of the underlying article. Everything
//! is floating point: the products overflow machine words long before they
//! overflow an f64 exponent.

use crate::echelon::EchelonForm;
use itertools::izip;

/// Predicted total number of partial candidates visited past the first
/// block (the article's `Ntotal`).
#[must_use]
pub fn expected_candidates(form: &EchelonForm) -> f64 {
    weighted_sum(form, |_, _| 1.0)
}

/// Upper bound on block XOR operations, charging every candidate a full
/// remaining-row update (the article's `Nxor`).
#[must_use]
pub fn xor_upper_bound(form: &EchelonForm) -> f64 {
    let block_count = form.block_count() as f64;
    weighted_sum(form, |index, _| block_count - index as f64)
}

/// Expected block XOR operations when all-zero pivot selections skip their
/// update (the article's `Nxored`).
#[must_use]
pub fn xor_expected(form: &EchelonForm) -> f64 {
    let block_count = form.block_count() as f64;
    weighted_sum(form, |index, previous_pivots| {
        (1.0 - (-(previous_pivots as f64)).exp2()) * (block_count - index as f64)
    })
}

/// Sums `weight(i, p_{i-1}) * prod_{j < i} |S_j| * 2^(p_j - l_j)` over the
/// blocks after the first.
fn weighted_sum(form: &EchelonForm, weight: impl Fn(usize, usize) -> f64) -> f64 {
    let widths = (0..form.block_count()).map(|block| form.width(block));
    let mut product = 1.0;
    let mut total = 0.0;
    let mut previous_pivots = 0;
    for (index, width, &pivots, rhs) in izip!(0.., widths, form.pivot_counts(), form.rhs_sets()) {
        if index > 0 {
            total += weight(index, previous_pivots) * product;
        }
        product *= rhs.row_count() as f64 * ((pivots as f64) - (width as f64)).exp2();
        previous_pivots = pivots;
    }
    total
}
