pub mod linear;

pub use linear::{LinkVector, four_bar_angular_velocities, solve_2x2};
