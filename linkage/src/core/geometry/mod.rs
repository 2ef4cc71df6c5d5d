pub mod intersect;
pub mod lines;

pub use intersect::{circle_circle, circle_line, nearest};
pub use lines::intersect_lines;
