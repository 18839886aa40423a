//! Structure-of-arrays storage for the conserved state and the per-node
//! precomputed-value vector.

use crate::numeric::Real;
use crate::NodeIndex;

/// Upper bound on conserved components across every shipped equation
/// (`2+d` for Euler with `d<=3`, `1+d` for shallow water): avoids a heap
/// allocation on every per-node/per-edge access in the hot loop.
pub const MAX_COMPONENTS: usize = 5;

/// A small fixed-size state tuple. Only the first `NUM_COMPONENTS` entries
/// (an `Equation`/`HyperbolicSystemView` associated constant) are meaningful;
/// the remainder is zero-padded.
pub type StateArray = [Real; MAX_COMPONENTS];

/// Structure-of-arrays conserved state vector: one contiguous `Vec<Real>`
/// per component, laid out component-major so a whole component can be
/// gathered/scattered without touching the others, rather than an
/// array-of-structs layout.
#[derive(Clone, Debug)]
pub struct StateVector {
    num_components: usize,
    len: usize,
    data: Vec<Real>,
}

impl StateVector {
    pub fn zeros(num_components: usize, len: usize) -> Self {
        assert!(num_components <= MAX_COMPONENTS, "too many components");
        Self {
            num_components,
            len,
            data: vec![0.0; num_components * len],
        }
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn component(&self, c: usize) -> &[Real] {
        let start = c * self.len;
        &self.data[start..start + self.len]
    }

    #[inline]
    pub fn component_mut(&mut self, c: usize) -> &mut [Real] {
        let start = c * self.len;
        &mut self.data[start..start + self.len]
    }

    /// Gather node `i`'s state into a fixed-size array.
    #[inline]
    pub fn get(&self, i: NodeIndex, out: &mut StateArray) {
        let idx = i.index();
        for c in 0..self.num_components {
            out[c] = self.data[c * self.len + idx];
        }
        for c in self.num_components..MAX_COMPONENTS {
            out[c] = 0.0;
        }
    }

    /// Scatter a fixed-size array into node `i`'s state.
    #[inline]
    pub fn set(&mut self, i: NodeIndex, u: &StateArray) {
        let idx = i.index();
        for c in 0..self.num_components {
            self.data[c * self.len + idx] = u[c];
        }
    }

    /// Copy another state vector's values into `self` (same shape required).
    pub fn copy_from(&mut self, other: &StateVector) {
        assert_eq!(self.num_components, other.num_components);
        assert_eq!(self.len, other.len);
        self.data.copy_from_slice(&other.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let mut sv = StateVector::zeros(3, 4);
        let mut u = [0.0; MAX_COMPONENTS];
        u[0] = 1.0;
        u[1] = 2.0;
        u[2] = 3.0;
        sv.set(NodeIndex::from_index(2), &u);

        let mut out = [0.0; MAX_COMPONENTS];
        sv.get(NodeIndex::from_index(2), &mut out);
        assert_eq!(&out[..3], &u[..3]);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn components_are_contiguous() {
        let mut sv = StateVector::zeros(2, 3);
        sv.component_mut(1).copy_from_slice(&[10.0, 20.0, 30.0]);
        assert_eq!(sv.component(1), &[10.0, 20.0, 30.0]);
        assert_eq!(sv.component(0), &[0.0, 0.0, 0.0]);
    }
}
