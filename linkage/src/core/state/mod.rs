use std::collections::{HashMap, HashSet};
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::TopologyError;

pub mod mechanism;
pub mod subassembly;

pub use mechanism::{Mechanism, MechanismDescription};
pub use subassembly::SubAssembly;

/// External identity of a joint, stable across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointId(pub u32);

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}", self.0)
    }
}

/// External identity of a rigid body (link).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JointKind {
    #[default]
    Revolute,
    Prismatic,
}

/// A pin or slider joint as the editing layer describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub id: JointId,
    pub position: DVec2,
    #[serde(default)]
    pub kind: JointKind,
    #[serde(default)]
    pub grounded: bool,
    #[serde(default)]
    pub input: bool,
    /// Drive rate of an input joint in degrees per second (signed).
    #[serde(default)]
    pub input_speed: f64,
    /// Slide direction of a prismatic joint, in degrees from +x.
    #[serde(default)]
    pub angle: f64,
}

impl Joint {
    pub fn revolute(id: u32, x: f64, y: f64) -> Self {
        Self {
            id: JointId(id),
            position: DVec2::new(x, y),
            kind: JointKind::Revolute,
            grounded: false,
            input: false,
            input_speed: 0.0,
            angle: 0.0,
        }
    }

    pub fn prismatic(id: u32, x: f64, y: f64, angle: f64) -> Self {
        Self {
            kind: JointKind::Prismatic,
            angle,
            ..Self::revolute(id, x, y)
        }
    }

    pub fn grounded(mut self) -> Self {
        self.grounded = true;
        self
    }

    /// Marks the joint as the grounded driver of its sub-assembly.
    pub fn driven(mut self, input_speed: f64) -> Self {
        self.grounded = true;
        self.input = true;
        self.input_speed = input_speed;
        self
    }

    pub fn is_prismatic(&self) -> bool {
        self.kind == JointKind::Prismatic
    }

    /// Unit vector along the slide direction.
    pub fn slide_direction(&self) -> DVec2 {
        DVec2::from_angle(self.angle.to_radians())
    }
}

/// A rigid link joining two or more joints, as the editing layer describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: BodyId,
    pub joints: Vec<JointId>,
}

impl Link {
    pub fn new(id: u32, joints: impl IntoIterator<Item = u32>) -> Self {
        Self {
            id: BodyId(id),
            joints: joints.into_iter().map(JointId).collect(),
        }
    }
}

/// Arena entry for a link: member joints as indices into [`Topology::joints`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigidBody {
    pub id: BodyId,
    pub joints: Vec<usize>,
}

/// Read-only snapshot of the mechanism.
///
/// Joints and bodies live in two arenas; the bipartite joint/body graph is kept
/// as index lists in both directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    version: u64,
    joints: Vec<Joint>,
    bodies: Vec<RigidBody>,
    incidence: Vec<Vec<usize>>,
}

impl Topology {
    /// Builds a snapshot, rejecting duplicate ids and dangling references.
    pub fn new(version: u64, joints: Vec<Joint>, links: &[Link]) -> Result<Self, TopologyError> {
        let mut seen = HashSet::new();
        for joint in &joints {
            if !seen.insert(joint.id) {
                return Err(TopologyError::DuplicateJoint(joint.id));
            }
        }

        let mut seen_links = HashSet::new();
        for link in links {
            if !seen_links.insert(link.id) {
                return Err(TopologyError::DuplicateLink(link.id));
            }
            validate_link(link, &seen)?;
        }

        Ok(Self::assemble(version, joints, links))
    }

    /// Builds a snapshot from data whose references are already known to be valid.
    pub(crate) fn assemble(version: u64, joints: Vec<Joint>, links: &[Link]) -> Self {
        let index: HashMap<JointId, usize> = joints
            .iter()
            .enumerate()
            .map(|(i, joint)| (joint.id, i))
            .collect();

        let mut incidence = vec![Vec::new(); joints.len()];
        let mut bodies = Vec::with_capacity(links.len());
        for link in links {
            let body = bodies.len();
            let members: Vec<usize> = link
                .joints
                .iter()
                .filter_map(|id| index.get(id).copied())
                .collect();
            for &joint in &members {
                incidence[joint].push(body);
            }
            bodies.push(RigidBody {
                id: link.id,
                joints: members,
            });
        }

        Self {
            version,
            joints,
            bodies,
            incidence,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> &Joint {
        &self.joints[index]
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> &RigidBody {
        &self.bodies[index]
    }

    /// Bodies incident on a joint, in link enumeration order.
    pub fn incident_bodies(&self, joint: usize) -> &[usize] {
        &self.incidence[joint]
    }

    pub fn joint_index(&self, id: JointId) -> Option<usize> {
        self.joints.iter().position(|joint| joint.id == id)
    }

    pub fn body_index(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|body| body.id == id)
    }

    /// Joints sharing a body with `joint`, without repeats, in body-then-member order.
    pub fn neighbors(&self, joint: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for &body in &self.incidence[joint] {
            for &other in &self.bodies[body].joints {
                if other != joint && !out.contains(&other) {
                    out.push(other);
                }
            }
        }
        out
    }

    /// Fixed distance between two joints, measured on this snapshot.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.joints[a].position.distance(self.joints[b].position)
    }

    /// First body that contains both joints.
    pub fn shared_body(&self, a: usize, b: usize) -> Option<usize> {
        self.incidence[a]
            .iter()
            .copied()
            .find(|&body| self.bodies[body].joints.contains(&b))
    }
}

pub(crate) fn validate_link(link: &Link, joints: &HashSet<JointId>) -> Result<(), TopologyError> {
    if link.joints.is_empty() {
        return Err(TopologyError::EmptyLink(link.id));
    }
    let mut members = HashSet::new();
    for &joint in &link.joints {
        if !joints.contains(&joint) {
            return Err(TopologyError::UnknownJoint(joint));
        }
        if !members.insert(joint) {
            return Err(TopologyError::RepeatedJoint {
                link: link.id,
                joint,
            });
        }
    }
    Ok(())
}
