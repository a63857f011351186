//! Best-fit lookup over a size-ascending group.

use super::item::PoolItem;

/// Decimal places kept for sums and gaps.
pub const SUM_PRECISION: i32 = 6;

/// Half a unit in the last decimal place kept by [`SUM_PRECISION`].
///
/// Budget comparisons allow this much float summation noise, so a sum that
/// rounds to the target still fits it.
pub const FIT_TOLERANCE: f64 = 5e-7;

/// True when `size` fits within `budget` up to [`FIT_TOLERANCE`].
#[must_use]
pub fn fits(size: f64, budget: f64) -> bool {
    size <= budget + FIT_TOLERANCE
}

/// Index of the first item whose size exceeds `residual`.
///
/// `group` must be sorted ascending by size.
#[must_use]
pub fn upper_bound(group: &[PoolItem<'_>], residual: f64) -> usize {
    group.partition_point(|item| fits(item.size, residual))
}

/// The largest item with `size <= residual`, if any.
///
/// An item exactly equal to the residual fits. A negative residual or an
/// empty group yields `None`.
#[must_use]
pub fn best_fit<'g, 'a>(group: &'g [PoolItem<'a>], residual: f64) -> Option<&'g PoolItem<'a>> {
    if residual < -FIT_TOLERANCE {
        return None;
    }
    match upper_bound(group, residual) {
        0 => None,
        idx => group.get(idx - 1),
    }
}
