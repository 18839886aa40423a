//! hv-limiter: the indicator and convex-limiter capability providers.

pub mod indicator;
pub mod limiter;
pub mod root;

pub use indicator::{EntropyViscosityCommutator, FieldSelector, OneIndicator, SmoothnessIndicator, ZeroIndicator};
pub use limiter::ConvexLimiter;
pub use root::{largest_feasible_l, LineSearchConfig};
