//! Planar linkage analysis: mobility checks, solve ordering, position
//! stepping and closed-form kinematics for pin and slider mechanisms.

pub mod core {
    pub mod geometry;
    pub mod math;
    pub mod solve;
    pub mod state;
}

pub mod investigation {
    pub mod analysis;
    pub mod probe;
}

pub mod config;
pub mod control;
pub mod error;
pub mod simulation;

pub use config::SimulationConfig;
pub use crate::core::state::{
    BodyId, Joint, JointId, JointKind, Link, Mechanism, MechanismDescription, Topology,
};
pub use error::{ConfigError, TopologyError};
pub use simulation::{Simulation, SimulationResult, SubAssemblyRun};
