//! hv-equations: concrete `HyperbolicSystemView` implementations plus the
//! equation-of-state family they're parameterized over.

pub mod boundary;
pub mod catalog;
pub mod eos;
pub mod error;
pub mod euler_aeos;
pub mod euler_polytropic;
pub mod shallow_water;
pub mod skeleton;

pub use catalog::{
    EulerAeosEquation, NavierStokesPlaceholderEquation, PolytropicEulerEquation,
    ShallowWaterEquation, SkeletonEquation,
};
pub use eos::{
    harten_entropy_surrogate, specific_entropy_surrogate, surrogate_gamma, surrogate_pressure,
    surrogate_sound_speed, EquationOfState, NobleAbelStiffenedGasEos, PolytropicGasEos,
    TabulatedEos, VanDerWaalsEos,
};
pub use error::{EquationError, EquationResult};
pub use euler_aeos::EulerAeos;
pub use euler_polytropic::PolytropicEuler;
pub use shallow_water::ShallowWater;
pub use skeleton::ScalarAdvection;
