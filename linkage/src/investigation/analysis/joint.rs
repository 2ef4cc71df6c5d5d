use glam::DVec2;

use crate::config::SimulationConfig;
use crate::core::geometry::intersect_lines;
use crate::core::solve::{AnimationFrames, KnownJoint, Prerequisite, SolveOrder};
use crate::core::state::{JointId, Topology};

/// Position, velocity and acceleration series of one joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointAnalysis {
    pub joint: JointId,
    /// Seconds between consecutive frames.
    pub time_step: f64,
    pub position: Vec<DVec2>,
    pub velocity: Vec<DVec2>,
    pub acceleration: Vec<DVec2>,
}

impl JointAnalysis {
    pub fn speed(&self) -> Vec<f64> {
        self.velocity.iter().map(|v| v.length()).collect()
    }
}

/// Closed-form joint kinematics for every joint in solve order.
///
/// Each joint is differentiated with the same prerequisite that positioned it,
/// so velocities of known joints are always available first. Singular
/// configurations (parallel constraint lines) produce NaN at that step.
pub fn joint_kinematics(
    topology: &Topology,
    order: &SolveOrder,
    frames: &AnimationFrames,
    config: &SimulationConfig,
) -> Vec<JointAnalysis> {
    let input = topology.joint(order.input());
    let time_step = config.time_step(input.input_speed);
    let mut out: Vec<JointAnalysis> = order
        .steps()
        .iter()
        .map(|step| JointAnalysis {
            joint: topology.joint(step.joint).id,
            time_step,
            position: Vec::with_capacity(frames.len()),
            velocity: Vec::with_capacity(frames.len()),
            acceleration: Vec::with_capacity(frames.len()),
        })
        .collect();

    for (index, frame) in frames.frames().iter().enumerate() {
        let sign = frames.direction(index).sign();
        let mut velocity = Vec::with_capacity(frame.len());
        let mut acceleration = Vec::with_capacity(frame.len());

        for (slot, step) in order.steps().iter().enumerate() {
            let p = frame[slot];
            let joint = topology.joint(step.joint);
            let (v, a) = match step.prerequisite {
                Prerequisite::Ground => (DVec2::ZERO, DVec2::ZERO),
                Prerequisite::RevoluteInput { center } => {
                    let omega = topology.joint(center.joint).input_speed.to_radians() * sign;
                    let r = p - frame[center.slot];
                    (r.perp() * omega, -r * (omega * omega))
                }
                Prerequisite::PrismaticInput => {
                    let speed = joint.input_speed * config.slide_ratio() * sign;
                    (joint.slide_direction() * speed, DVec2::ZERO)
                }
                Prerequisite::CircleCircle { first, second } => {
                    let c1 = ConstraintLine::rigid(p, first, frame, &velocity, &acceleration);
                    let c2 = ConstraintLine::rigid(p, second, frame, &velocity, &acceleration);
                    solve_pair(c1, c2)
                }
                Prerequisite::CircleLine { known } => {
                    let c1 = ConstraintLine::rigid(p, known, frame, &velocity, &acceleration);
                    solve_pair(c1, ConstraintLine::fixed(joint.slide_direction()))
                }
            };
            velocity.push(v);
            acceleration.push(a);
            out[slot].position.push(p);
        }

        for (analysis, (v, a)) in out.iter_mut().zip(velocity.into_iter().zip(acceleration)) {
            analysis.velocity.push(v);
            analysis.acceleration.push(a);
        }
    }

    out
}

/// The velocity-space and acceleration-space lines one constraint confines a joint to.
struct ConstraintLine {
    velocity_base: DVec2,
    acceleration_base: DVec2,
    direction: DVec2,
    anchor: Option<Anchor>,
}

/// Known joint on the other end of a rigid link.
struct Anchor {
    arm: DVec2,
    velocity: DVec2,
}

impl ConstraintLine {
    /// A slide line fixed to ground.
    fn fixed(direction: DVec2) -> Self {
        Self {
            velocity_base: DVec2::ZERO,
            acceleration_base: DVec2::ZERO,
            direction,
            anchor: None,
        }
    }

    /// Rigid link to an already analysed joint. The joint moves perpendicular
    /// to the arm relative to the known end.
    fn rigid(
        p: DVec2,
        known: KnownJoint,
        frame: &[DVec2],
        velocity: &[DVec2],
        acceleration: &[DVec2],
    ) -> Self {
        let arm = p - frame[known.slot];
        Self {
            velocity_base: velocity[known.slot],
            acceleration_base: acceleration[known.slot],
            direction: arm.perp(),
            anchor: Some(Anchor {
                arm,
                velocity: velocity[known.slot],
            }),
        }
    }

    fn acceleration_base(&self, velocity: DVec2) -> DVec2 {
        match &self.anchor {
            // (a - a_k) . e = -|v - v_k|^2 / L with e = arm / L
            Some(anchor) => {
                let relative = velocity - anchor.velocity;
                let scale = relative.length_squared() / anchor.arm.length_squared();
                self.acceleration_base - anchor.arm * scale
            }
            None => self.acceleration_base,
        }
    }
}

fn solve_pair(first: ConstraintLine, second: ConstraintLine) -> (DVec2, DVec2) {
    let velocity = intersect_lines(
        first.velocity_base,
        first.direction,
        second.velocity_base,
        second.direction,
    );
    let Some(v) = velocity else {
        return (DVec2::NAN, DVec2::NAN);
    };
    let a = intersect_lines(
        first.acceleration_base(v),
        first.direction,
        second.acceleration_base(v),
        second.direction,
    )
    .unwrap_or(DVec2::NAN);
    (v, a)
}
