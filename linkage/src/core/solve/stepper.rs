use glam::DVec2;

use super::{Prerequisite, SolveOrder};
use crate::config::SimulationConfig;
use crate::core::geometry::{circle_circle, circle_line, nearest};
use crate::core::state::{JointId, Topology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Why stepping stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// Moving forward, the newest frame matched the seed frame.
    Closed,
    /// Too many failed steps; the mechanism locks in both directions.
    Stuck,
    /// Step budget exhausted.
    Budget,
}

/// Time-ordered joint positions for one sub-assembly.
///
/// Every frame is parallel to `joint_ids`, which follows the solve order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationFrames {
    joint_ids: Vec<JointId>,
    frames: Vec<Vec<DVec2>>,
    directions: Vec<Direction>,
}

impl AnimationFrames {
    pub fn seeded(joint_ids: Vec<JointId>, seed: Vec<DVec2>) -> Self {
        Self {
            joint_ids,
            frames: vec![seed],
            directions: vec![Direction::Forward],
        }
    }

    pub fn joint_ids(&self) -> &[JointId] {
        &self.joint_ids
    }

    pub fn frames(&self) -> &[Vec<DVec2>] {
        &self.frames
    }

    pub fn frame(&self, step: usize) -> Option<&[DVec2]> {
        self.frames.get(step).map(Vec::as_slice)
    }

    /// Direction of the step that produced `step`; the seed counts as forward.
    pub fn direction(&self, step: usize) -> Direction {
        self.directions.get(step).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Successful steps after the seed frame.
    pub fn steps(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub fn slot_of(&self, joint: JointId) -> Option<usize> {
        self.joint_ids.iter().position(|&id| id == joint)
    }

    /// Position series of one joint.
    pub fn trace(&self, joint: JointId) -> Option<Vec<DVec2>> {
        let slot = self.slot_of(joint)?;
        Some(self.frames.iter().map(|frame| frame[slot]).collect())
    }

    /// Largest coordinate difference between the newest frame and the seed.
    pub fn closure_error(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => first
                .iter()
                .zip(last)
                .map(|(a, b)| (*a - *b).abs().max_element())
                .fold(0.0, f64::max),
            _ => 0.0,
        }
    }

    fn closes(&self, tolerance: f64) -> bool {
        self.steps() > 0 && self.closure_error() <= tolerance
    }

    fn push(&mut self, frame: Vec<DVec2>, direction: Direction) {
        self.frames.push(frame);
        self.directions.push(direction);
    }
}

/// Drives one sub-assembly through its input cycle.
///
/// Each step rotates (or slides) the input by a fixed increment and solves
/// every other joint from its prerequisite. A step that has no real solution
/// is thrown away and the drive direction reverses.
pub struct Stepper<'a> {
    topology: &'a Topology,
    order: &'a SolveOrder,
    config: &'a SimulationConfig,
}

impl<'a> Stepper<'a> {
    pub fn new(
        topology: &'a Topology,
        order: &'a SolveOrder,
        config: &'a SimulationConfig,
    ) -> Self {
        Self {
            topology,
            order,
            config,
        }
    }

    pub fn run(&self) -> (AnimationFrames, HaltReason) {
        let seed = self
            .order
            .steps()
            .iter()
            .map(|step| self.topology.joint(step.joint).position)
            .collect();
        let mut frames = AnimationFrames::seeded(self.order.joint_ids(self.topology), seed);
        let mut direction = Direction::Forward;
        let mut stuck = 0u32;

        let halt = loop {
            if frames.steps() >= self.config.max_steps {
                break HaltReason::Budget;
            }
            let previous = &frames.frames[frames.frames.len() - 1];
            match self.advance(previous, direction) {
                Some(next) => {
                    frames.push(next, direction);
                    let forward = direction == Direction::Forward;
                    if forward && frames.closes(self.config.closure_tolerance) {
                        break HaltReason::Closed;
                    }
                }
                None => {
                    stuck += 1;
                    tracing::debug!(
                        step = frames.steps(),
                        stuck,
                        ?direction,
                        "step failed, reversing"
                    );
                    if stuck >= self.config.stuck_limit {
                        break HaltReason::Stuck;
                    }
                    direction = direction.flipped();
                }
            }
        };

        tracing::debug!(steps = frames.steps(), ?halt, "stepping finished");
        (frames, halt)
    }

    /// Next frame from `previous`, or `None` if any joint has no solution.
    pub fn advance(&self, previous: &[DVec2], direction: Direction) -> Option<Vec<DVec2>> {
        let mut next: Vec<DVec2> = Vec::with_capacity(previous.len());
        for (slot, step) in self.order.steps().iter().enumerate() {
            let before = previous[slot];
            let joint = self.topology.joint(step.joint);
            let position = match step.prerequisite {
                Prerequisite::Ground => before,
                Prerequisite::RevoluteInput { center } => {
                    let speed = self.topology.joint(center.joint).input_speed;
                    let sign = (speed * direction.sign()).signum();
                    let turn =
                        DVec2::from_angle((sign * self.config.revolute_step_deg).to_radians());
                    let pivot = next[center.slot];
                    pivot + turn.rotate(before - pivot)
                }
                Prerequisite::PrismaticInput => {
                    let sign = (joint.input_speed * direction.sign()).signum();
                    before + joint.slide_direction() * (sign * self.config.prismatic_step)
                }
                Prerequisite::CircleCircle { first, second } => {
                    let candidates = circle_circle(
                        next[first.slot],
                        first.distance,
                        next[second.slot],
                        second.distance,
                    )?;
                    nearest(candidates, before)
                }
                Prerequisite::CircleLine { known } => {
                    let candidates = circle_line(
                        next[known.slot],
                        known.distance,
                        before,
                        joint.angle.to_radians(),
                        self.config.vertical_slope_limit,
                    )?;
                    nearest(candidates, before)
                }
            };
            next.push(position);
        }
        Some(next)
    }
}
