//! Batch distribution for parallel simulation.
//!
//! Trials are cut into fixed-size batches rather than one range per worker, so the
//! batch layout (and therefore each batch's random stream) does not depend on how
//! many threads end up running them.

/// Split `total` trials into consecutive ranges `[start, end)` of at most `batch_size`.
/// Only the last batch may be shorter.
///
/// # Example
/// ```
/// # use echo_solver::parallel::batch_ranges;
/// let ranges = batch_ranges(10, 4);
/// assert_eq!(ranges, vec![(0, 4), (4, 8), (8, 10)]);
/// ```
pub fn batch_ranges(total: u64, batch_size: u64) -> Vec<(u64, u64)> {
    if total == 0 || batch_size == 0 {
        return Vec::new();
    }
    let count = total.div_ceil(batch_size);
    let mut ranges = Vec::with_capacity(count as usize);
    let mut start = 0;
    while start < total {
        let end = (start + batch_size).min(total);
        ranges.push((start, end));
        start = end;
    }
    ranges
}
