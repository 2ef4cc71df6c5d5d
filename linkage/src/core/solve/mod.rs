use crate::core::state::{JointId, Topology};

pub mod mobility;
pub mod order;
pub mod stepper;

pub use mobility::{InvalidReason, LoopDistance, Verdict, classify};
pub use order::build_solve_order;
pub use stepper::{AnimationFrames, Direction, HaltReason, Stepper};

/// An already-solved joint and its fixed distance to the joint being solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownJoint {
    /// Index into the topology's joint arena.
    pub joint: usize,
    /// Position of that joint in the [`SolveOrder`]; always earlier than the dependent joint.
    pub slot: usize,
    pub distance: f64,
}

/// The geometric constraint that fixes one joint's position each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prerequisite {
    /// Fixed to the frame.
    Ground,
    /// Rotated about the revolute input joint at a fixed radius.
    RevoluteInput { center: KnownJoint },
    /// The prismatic input joint itself, translated along its slide angle.
    PrismaticInput,
    /// On two circles about two solved joints.
    CircleCircle { first: KnownJoint, second: KnownJoint },
    /// On a circle about one solved joint and on the joint's own slide line.
    CircleLine { known: KnownJoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveType {
    Ground,
    RevoluteInput,
    PrismaticInput,
    CircleCircle,
    CircleLine,
}

impl Prerequisite {
    pub fn solve_type(&self) -> SolveType {
        match self {
            Self::Ground => SolveType::Ground,
            Self::RevoluteInput { .. } => SolveType::RevoluteInput,
            Self::PrismaticInput => SolveType::PrismaticInput,
            Self::CircleCircle { .. } => SolveType::CircleCircle,
            Self::CircleLine { .. } => SolveType::CircleLine,
        }
    }

    pub fn known_joints(&self) -> Vec<KnownJoint> {
        match *self {
            Self::Ground | Self::PrismaticInput => Vec::new(),
            Self::RevoluteInput { center } => vec![center],
            Self::CircleCircle { first, second } => vec![first, second],
            Self::CircleLine { known } => vec![known],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveStep {
    pub joint: usize,
    pub prerequisite: Prerequisite,
}

/// Joints of one sub-assembly in an order where every prerequisite refers
/// only to earlier entries. The input joint is always first.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOrder {
    steps: Vec<SolveStep>,
}

impl SolveOrder {
    pub(crate) fn new(steps: Vec<SolveStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[SolveStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Topology index of the driving joint.
    pub fn input(&self) -> usize {
        self.steps[0].joint
    }

    pub fn slot_of(&self, joint: usize) -> Option<usize> {
        self.steps.iter().position(|step| step.joint == joint)
    }

    pub fn joint_ids(&self, topology: &Topology) -> Vec<JointId> {
        self.steps
            .iter()
            .map(|step| topology.joint(step.joint).id)
            .collect()
    }
}
