use glam::DVec2;

use super::joint::JointAnalysis;
use crate::core::math::{LinkVector, four_bar_angular_velocities};
use crate::core::solve::{AnimationFrames, Prerequisite, SolveOrder};
use crate::core::state::{BodyId, JointId, SubAssembly, Topology};

/// Centre-of-mass and angular series of one rigid body.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnalysis {
    pub link: BodyId,
    pub joints: Vec<JointId>,
    pub com_position: Vec<DVec2>,
    pub com_velocity: Vec<DVec2>,
    pub com_acceleration: Vec<DVec2>,
    /// Radians, measured along the body's first two distinct joints.
    pub angle: Vec<f64>,
    /// Radians per second, counter-clockwise positive.
    pub angular_velocity: Vec<f64>,
    /// Not derived. Always `None` until a formula is agreed on.
    pub angular_acceleration: Option<Vec<f64>>,
}

/// Slots and bodies of the single four-bar loop, if the solve order has one.
#[derive(Debug, Clone, Copy)]
struct FourBarLoop {
    input: usize,
    tip: usize,
    pin: usize,
    pivot: usize,
    crank: usize,
    coupler: usize,
    rocker: usize,
}

impl FourBarLoop {
    /// Finds a joint solved from a crank tip and a ground pivot.
    fn detect(topology: &Topology, order: &SolveOrder) -> Option<Self> {
        let steps = order.steps();
        for (pin, step) in steps.iter().enumerate() {
            let Prerequisite::CircleCircle { first, second } = step.prerequisite else {
                continue;
            };
            for (tip, pivot) in [(first, second), (second, first)] {
                let Prerequisite::RevoluteInput { center } = steps[tip.slot].prerequisite else {
                    continue;
                };
                if steps[pivot.slot].prerequisite != Prerequisite::Ground {
                    continue;
                }
                let bodies = (
                    topology.shared_body(center.joint, tip.joint),
                    topology.shared_body(tip.joint, step.joint),
                    topology.shared_body(step.joint, pivot.joint),
                );
                if let (Some(crank), Some(coupler), Some(rocker)) = bodies {
                    return Some(Self {
                        input: center.slot,
                        tip: tip.slot,
                        pin,
                        pivot: pivot.slot,
                        crank,
                        coupler,
                        rocker,
                    });
                }
            }
        }
        None
    }

    /// Crank, coupler and rocker angular velocities at one frame.
    fn omegas(&self, frame: &[DVec2], crank_omega: f64) -> [f64; 3] {
        let crank = LinkVector::between(frame[self.input], frame[self.tip]);
        let coupler = LinkVector::between(frame[self.pin], frame[self.tip]);
        let rocker = LinkVector::between(frame[self.pivot], frame[self.pin]);
        match four_bar_angular_velocities(crank, coupler, rocker, crank_omega) {
            Some((w3, w4)) => [crank_omega, w3, w4],
            None => [crank_omega, f64::NAN, f64::NAN],
        }
    }
}

/// Rigid-body kinematics for every body of a simulated sub-assembly.
///
/// `joints` must be the output of [`super::joint_kinematics`] for the same
/// order and frames.
pub fn link_kinematics(
    topology: &Topology,
    sub: &SubAssembly,
    order: &SolveOrder,
    frames: &AnimationFrames,
    joints: &[JointAnalysis],
) -> Vec<LinkAnalysis> {
    let input = topology.joint(order.input());
    let four_bar = if input.is_prismatic() {
        None
    } else {
        FourBarLoop::detect(topology, order)
    };

    sub.bodies()
        .iter()
        .map(|&index| {
            let body = topology.body(index);
            let slots: Vec<usize> = body
                .joints
                .iter()
                .filter_map(|&j| order.slot_of(j))
                .collect();
            let axis = axis_pair(&slots, frames);
            let role = four_bar.and_then(|fb| {
                [fb.crank, fb.coupler, fb.rocker]
                    .iter()
                    .position(|&b| b == index)
                    .map(|role| (fb, role))
            });

            let mut analysis = LinkAnalysis {
                link: body.id,
                joints: slots.iter().map(|&s| joints[s].joint).collect(),
                com_position: Vec::with_capacity(frames.len()),
                com_velocity: Vec::with_capacity(frames.len()),
                com_acceleration: Vec::with_capacity(frames.len()),
                angle: Vec::with_capacity(frames.len()),
                angular_velocity: Vec::with_capacity(frames.len()),
                angular_acceleration: None,
            };

            for (step, frame) in frames.frames().iter().enumerate() {
                analysis.com_position.push(mean(slots.iter().map(|&s| joints[s].position[step])));
                analysis.com_velocity.push(mean(slots.iter().map(|&s| joints[s].velocity[step])));
                analysis
                    .com_acceleration
                    .push(mean(slots.iter().map(|&s| joints[s].acceleration[step])));

                let Some((from, to)) = axis else {
                    analysis.angle.push(0.0);
                    analysis.angular_velocity.push(0.0);
                    continue;
                };
                let r = frame[to] - frame[from];
                analysis.angle.push(r.y.atan2(r.x));

                let omega = match role {
                    Some((fb, role)) => {
                        let crank_omega =
                            input.input_speed.to_radians() * frames.direction(step).sign();
                        fb.omegas(frame, crank_omega)[role]
                    }
                    None => {
                        let relative = joints[to].velocity[step] - joints[from].velocity[step];
                        r.perp_dot(relative) / r.length_squared()
                    }
                };
                analysis.angular_velocity.push(omega);
            }
            analysis
        })
        .collect()
}

/// First joint of the body and the first other joint not coincident with it.
fn axis_pair(slots: &[usize], frames: &AnimationFrames) -> Option<(usize, usize)> {
    let seed = frames.frame(0)?;
    let (&from, rest) = slots.split_first()?;
    rest.iter()
        .copied()
        .find(|&to| seed[to].distance_squared(seed[from]) > 0.0)
        .map(|to| (from, to))
}

fn mean(values: impl Iterator<Item = DVec2>) -> DVec2 {
    let (sum, count) = values.fold((DVec2::ZERO, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 { DVec2::ZERO } else { sum / count as f64 }
}
