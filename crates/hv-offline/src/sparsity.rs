//! The sparse stencil: row offsets, columns, and precomputed geometric
//! vectors `c_ij`/`n_ij` . Owned by `OfflineData`, borrowed
//! read-only by every sweep.

use hv_core::{NodeIndex, SparseRowView};

/// Node partition within the owned range: `[0, simd_end)` is SIMD-packable
/// (contiguous, aligned, length divisible by `simd_width`), `[simd_end,
/// scalar_end)` is the scalar-interior remainder, `[scalar_end, total)` is
/// ghost.
#[derive(Clone, Copy, Debug)]
pub struct NodePartition {
    pub simd_width: usize,
    pub simd_end: usize,
    pub scalar_end: usize,
    pub total: usize,
}

impl NodePartition {
    pub fn simd_interior_range(&self) -> std::ops::Range<usize> {
        0..self.simd_end
    }

    pub fn scalar_interior_range(&self) -> std::ops::Range<usize> {
        self.simd_end..self.scalar_end
    }

    pub fn owned_range(&self) -> std::ops::Range<usize> {
        0..self.scalar_end
    }

    pub fn ghost_range(&self) -> std::ops::Range<usize> {
        self.scalar_end..self.total
    }
}

/// CSR-like flat adjacency: row `i`'s columns live in
/// `columns[row_offsets[i]..row_offsets[i+1]]`, with `c_ij`/`norm_cij`
/// indexed the same way. `columns[row_offsets[i]]` is always `i` itself.
#[derive(Clone, Debug)]
pub struct SparsityPattern {
    partition: NodePartition,
    row_offsets: Vec<usize>,
    columns: Vec<NodeIndex>,
    c_ij: Vec<[f64; 3]>,
    norm_cij: Vec<f64>,
}

impl SparsityPattern {
    /// Build from a row-major adjacency list. `rows[i]` must have `i`
    /// itself as its first entry. `sum_j c_ij(i,j) == 0` is a caller
    /// invariant (provided by the mesh/FE assembly, checked only in
    /// debug builds by `debug_assert_divergence_free`).
    pub fn from_rows(partition: NodePartition, rows: Vec<Vec<(NodeIndex, [f64; 3])>>) -> Self {
        assert_eq!(rows.len(), partition.total);
        let mut row_offsets = Vec::with_capacity(rows.len() + 1);
        let mut columns = Vec::new();
        let mut c_ij = Vec::new();
        let mut norm_cij = Vec::new();
        row_offsets.push(0);
        for row in &rows {
            for (j, c) in row {
                columns.push(*j);
                c_ij.push(*c);
                norm_cij.push((c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt());
            }
            row_offsets.push(columns.len());
        }
        Self {
            partition,
            row_offsets,
            columns,
            c_ij,
            norm_cij,
        }
    }

    pub fn partition(&self) -> NodePartition {
        self.partition
    }

    pub fn num_nodes(&self) -> usize {
        self.partition.total
    }

    pub fn row_length(&self, i: usize) -> usize {
        self.row_offsets[i + 1] - self.row_offsets[i]
    }

    pub fn row(&self, i: usize) -> SparseRowView<'_> {
        let start = self.row_offsets[i];
        let end = self.row_offsets[i + 1];
        SparseRowView {
            columns: &self.columns[start..end],
            c_ij: &self.c_ij[start..end],
            norm_cij: &self.norm_cij[start..end],
        }
    }

    /// Column position of `i` within its own row (always 0 by construction,
    /// exposed for symmetry bookkeeping in the kernel).
    pub fn self_column(&self, i: usize) -> usize {
        self.row_offsets[i]
    }

    /// Debug-only check of the discrete-divergence invariant
    /// `sum_j c_ij = 0`.
    pub fn debug_assert_divergence_free(&self, tol: f64) {
        if !cfg!(debug_assertions) {
            return;
        }
        for i in 0..self.num_nodes() {
            let row = self.row(i);
            let mut sum = [0.0_f64; 3];
            for c in row.c_ij {
                sum[0] += c[0];
                sum[1] += c[1];
                sum[2] += c[2];
            }
            let norm = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
            debug_assert!(
                norm <= tol,
                "row {i} violates sum_j c_ij = 0 (residual norm {norm})"
);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_pattern() -> SparsityPattern {
        // 3-node chain 0-1-2, c_ij antisymmetric along x.
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
        SparsityPattern::from_rows(partition, rows)
    }

    #[test]
    fn row_length_and_self_column() {
        let sp = tiny_pattern();
        assert_eq!(sp.row_length(1), 3);
        assert_eq!(sp.self_column(1), 2);
    }

    #[test]
    fn row_first_column_is_self() {
        let sp = tiny_pattern();
        for i in 0..sp.num_nodes() {
            assert_eq!(sp.row(i).self_index().index(), i);
        }
    }
}
