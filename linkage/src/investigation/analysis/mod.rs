//! Velocity, acceleration and rigid-body kinematics derived from simulated frames.

pub mod joint;
pub mod link;

pub use joint::{JointAnalysis, joint_kinematics};
pub use link::{LinkAnalysis, link_kinematics};

use crate::config::SimulationConfig;
use crate::core::solve::{AnimationFrames, SolveOrder};
use crate::core::state::{BodyId, JointId, SubAssembly, Topology};

/// Joint and link kinematics for one sub-assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KinematicReport {
    pub joints: Vec<JointAnalysis>,
    pub links: Vec<LinkAnalysis>,
}

impl KinematicReport {
    pub fn joint(&self, id: JointId) -> Option<&JointAnalysis> {
        self.joints.iter().find(|analysis| analysis.joint == id)
    }

    pub fn link(&self, id: BodyId) -> Option<&LinkAnalysis> {
        self.links.iter().find(|analysis| analysis.link == id)
    }
}

pub fn analyze(
    topology: &Topology,
    sub: &SubAssembly,
    order: &SolveOrder,
    frames: &AnimationFrames,
    config: &SimulationConfig,
) -> KinematicReport {
    let joints = joint_kinematics(topology, order, frames, config);
    let links = link_kinematics(topology, sub, order, frames, &joints);
    KinematicReport { joints, links }
}
