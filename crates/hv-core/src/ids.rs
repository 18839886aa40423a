use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable node identifier used across the sparse graph.
///
/// `NonZero` makes `Option<NodeIndex>` pointer-sized. Construction always
/// goes through `from_index`/`index` so the off-by-one is centralized.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(NonZeroU32);

impl NodeIndex {
    pub fn from_index(index: usize) -> Self {
        let idx_u32 = u32::try_from(index).expect("node index fits in u32");
        Self(NonZeroU32::new(idx_u32 + 1).expect("index+1 is nonzero"))
    }

    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.index())
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_index() {
        for i in [0_usize, 1, 2, 42, 10_000] {
            let id = NodeIndex::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_node_index_is_small() {
        assert_eq!(
            core::mem::size_of::<NodeIndex>(),
            core::mem::size_of::<Option<NodeIndex>>()
        );
    }
}
