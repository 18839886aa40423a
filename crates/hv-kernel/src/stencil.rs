//! Block-parallel sparse stencil traversal over the one-ring graph
//! . `rayon` partitions the owned, non-constrained node
//! range into `simd_width`-sized blocks; a shared `dispatch_check` gives
//! the step controller a cooperative cancellation point at each block
//! boundary.

use std::sync::atomic::{AtomicBool, Ordering};

use hv_core::Real;
use hv_offline::{NodePartition, SparsityPattern};
use rayon::prelude::*;

/// Per-node work item, e.g. a precompute cycle.
pub type NodeTask<'a> = dyn Fn(usize) + Sync + 'a;

/// Per-edge work item walking only `i < j` of the strict upper triangle,
/// e.g. the Riemann solve feeding `d_ij`.
pub type UpperEdgeTask<'a> = dyn Fn(usize, usize) + Sync + 'a;

/// Full one-ring work item (both `j < i` and `j > i`), e.g. the low-order
/// update or the limiter's per-edge correction.
pub type FullRowTask<'a> = dyn Fn(usize) + Sync + 'a;

/// Owned node indices with `row_length > 1`, in ascending order, ready to
/// be chunked into SIMD-width blocks. Constrained rows (Dirichlet, hanging)
/// are filtered out up front rather than being skipped block-by-block.
pub fn active_nodes(sparsity: &SparsityPattern, partition: &NodePartition) -> Vec<usize> {
    partition
        .owned_range()
        .filter(|&i| sparsity.row_length(i) > 1)
        .collect()
}

/// Runs `task` over `active_nodes` in blocks of `block_size`, in parallel,
/// checking `dispatch_check(first_index_of_block)` before each block and
/// stopping (not panicking) the remaining blocks once it returns `false`.
///
/// `dispatch_check` and `task` never allocate — the hot-path no-allocation
/// requirement applies to both.
pub fn par_for_each_row_block(
    active_nodes: &[usize],
    block_size: usize,
    dispatch_check: &(dyn Fn(usize) -> bool + Sync),
    task: &(dyn Fn(&[usize]) + Sync),
) {
    let block_size = block_size.max(1);
    let cancelled = AtomicBool::new(false);
    active_nodes.par_chunks(block_size).for_each(|block| {
        if cancelled.load(Ordering::Relaxed) {
            return;
        }
        let Some(&first) = block.first() else { return };
        if !dispatch_check(first) {
            cancelled.store(true, Ordering::Relaxed);
            return;
        }
        task(block);
    });
}

/// Mirrors a strict-upper-triangle edge quantity (`values[pos(i,j)]` set
/// only for `i < j`) into the lower triangle: an explicit symmetry-fill
/// pass done as a second sweep instead of mutating both directions from
/// one thread, avoiding fine-grained locks.
pub fn symmetrize(sparsity: &SparsityPattern, values: &mut [Real]) {
    let n = sparsity.num_nodes();
    for i in 0..n {
        let row_i = sparsity.row(i);
        for (col_pos, &j) in row_i.columns.iter().enumerate() {
            let j = j.index();
            if j <= i {
                continue;
            }
            let pos_ij = sparsity.self_column(i) + col_pos;
            let row_j = sparsity.row(j);
            if let Some(col_pos_ji) = row_j.columns.iter().position(|c| c.index() == i) {
                let pos_ji = sparsity.self_column(j) + col_pos_ji;
                values[pos_ji] = values[pos_ij];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::NodeIndex;
    use std::sync::atomic::AtomicUsize;

    fn chain_pattern() -> (SparsityPattern, NodePartition) {
        let rows = vec![
            vec![
                (NodeIndex::from_index(0), [0.0, 0.0, 0.0]),
                (NodeIndex::from_index(1), [1.0, 0.0, 0.0]),
            ],
            vec![
                (NodeIndex::from_index(0), [-1.0, 0.0, 0.0]),
                (NodeIndex::from_index(1), [0.0, 0.0, 0.0]),
                (NodeIndex::from_index(2), [1.0, 0.0, 0.0]),
            ],
            vec![
                (NodeIndex::from_index(1), [-1.0, 0.0, 0.0]),
                (NodeIndex::from_index(2), [0.0, 0.0, 0.0]),
            ],
        ];
        let partition = NodePartition {
            simd_width: 1,
            simd_end: 3,
            scalar_end: 3,
            total: 3,
        };
        (SparsityPattern::from_rows(partition, rows), partition)
    }

    #[test]
    fn all_rows_are_active_when_none_constrained() {
        let (sparsity, partition) = chain_pattern();
        let active = active_nodes(&sparsity, &partition);
        assert_eq!(active, vec![0, 1, 2]);
    }

    #[test]
    fn par_for_each_row_block_visits_every_active_node_once() {
        let (sparsity, partition) = chain_pattern();
        let active = active_nodes(&sparsity, &partition);
        let visits = AtomicUsize::new(0);
        par_for_each_row_block(&active, 2, &|_| true, &|block| {
            visits.fetch_add(block.len(), Ordering::Relaxed);
        });
        assert_eq!(visits.load(Ordering::Relaxed), active.len());
    }

    #[test]
    fn dispatch_check_false_stops_processing() {
        let (sparsity, partition) = chain_pattern();
        let active = active_nodes(&sparsity, &partition);
        let visits = AtomicUsize::new(0);
        par_for_each_row_block(&active, 1, &|_| false, &|block| {
            visits.fetch_add(block.len(), Ordering::Relaxed);
        });
        assert_eq!(visits.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn symmetrize_mirrors_upper_triangle() {
        let (sparsity, _) = chain_pattern();
        let nnz = sparsity.row_length(0) + sparsity.row_length(1) + sparsity.row_length(2);
        let mut values = vec![0.0; nnz];
        // set d_01 (row 0, column position 1) to 5.0
        values[sparsity.self_column(0) + 1] = 5.0;
        symmetrize(&sparsity, &mut values);
        // row 1's column position of node 0 is 0
        assert_eq!(values[sparsity.self_column(1)], 5.0);
    }
}
