use std::fmt;

use crate::core::state::{SubAssembly, Topology};

/// Loop length from the input joint back to ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDistance {
    Finite(u32),
    /// No grounded joint other than the input is reachable: an open chain.
    Open,
}

impl fmt::Display for LoopDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(d) => write!(f, "{d}"),
            Self::Open => write!(f, "open"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NoInput,
    MultipleInputs(usize),
    UngroundedInput,
    DegreesOfFreedom(i32),
    LoopDistance(u32),
    /// Passed every mobility check but no solve order could be built.
    Unsolvable,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInput => write!(f, "no input joint"),
            Self::MultipleInputs(n) => write!(f, "{n} input joints"),
            Self::UngroundedInput => write!(f, "input joint is not grounded"),
            Self::DegreesOfFreedom(dof) => write!(f, "{dof} degrees of freedom"),
            Self::LoopDistance(d) => write!(f, "loop of length {d} cannot be closed"),
            Self::Unsolvable => write!(f, "joint positions cannot be ordered"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid { input: usize, distance: LoopDistance },
    Invalid(InvalidReason),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Decides whether a sub-assembly is a drivable one-degree-of-freedom mechanism.
pub fn classify(topology: &Topology, sub: &SubAssembly) -> Verdict {
    let inputs: Vec<usize> = sub
        .joints()
        .iter()
        .copied()
        .filter(|&j| topology.joint(j).input)
        .collect();

    let input = match inputs.as_slice() {
        [] => return Verdict::Invalid(InvalidReason::NoInput),
        [input] => *input,
        many => return Verdict::Invalid(InvalidReason::MultipleInputs(many.len())),
    };
    if !topology.joint(input).grounded {
        return Verdict::Invalid(InvalidReason::UngroundedInput);
    }

    let dof = degrees_of_freedom(topology, sub);
    if dof != 1 {
        return Verdict::Invalid(InvalidReason::DegreesOfFreedom(dof));
    }

    match loop_distance(topology, sub, input) {
        LoopDistance::Finite(d) if d != 4 => Verdict::Invalid(InvalidReason::LoopDistance(d)),
        distance => Verdict::Valid { input, distance },
    }
}

/// Kutzbach/Grubler mobility `3(N - 1) - 2J`.
///
/// Ground counts as one extra body when any joint is grounded. A revolute
/// joint on `k` bodies removes `k - 1` pairs, plus one when grounded. A
/// prismatic joint carries its own slider body and removes `k + 1` pairs.
pub fn degrees_of_freedom(topology: &Topology, sub: &SubAssembly) -> i32 {
    let mut bodies = sub.bodies().len() as i32;
    let mut pairs = 0i32;
    let mut grounded = false;

    for &j in sub.joints() {
        let joint = topology.joint(j);
        let k = topology.incident_bodies(j).len() as i32;
        grounded |= joint.grounded;
        if joint.is_prismatic() {
            bodies += 1;
            pairs += k + 1;
        } else {
            pairs += k - 1 + i32::from(joint.grounded);
        }
    }
    if grounded {
        bodies += 1;
    }

    3 * (bodies - 1) - 2 * pairs
}

/// Shortest loop from the input joint through the links back to ground.
///
/// Every simple path from the input to a grounded non-input joint is scored
/// as its hop count, plus one per prismatic joint on the path (each slider is
/// an extra body), plus one for the ground link that closes the loop. A plain
/// four-bar and a slider-crank both score 4.
pub fn loop_distance(topology: &Topology, sub: &SubAssembly, input: usize) -> LoopDistance {
    debug_assert!(sub.contains(input));
    let mut on_path = vec![false; topology.joints().len()];
    let mut best = None;
    let start = u32::from(topology.joint(input).is_prismatic());
    search(topology, input, input, 0, start, &mut on_path, &mut best);
    best.map_or(LoopDistance::Open, LoopDistance::Finite)
}

fn search(
    topology: &Topology,
    input: usize,
    joint: usize,
    hops: u32,
    sliders: u32,
    on_path: &mut [bool],
    best: &mut Option<u32>,
) {
    let current = topology.joint(joint);
    if joint != input && current.grounded && !current.input {
        let closed = hops + sliders + 1;
        if best.is_none_or(|b| closed < b) {
            *best = Some(closed);
        }
        return;
    }
    if best.is_some_and(|b| hops + sliders + 1 >= b) {
        return;
    }

    on_path[joint] = true;
    for next in topology.neighbors(joint) {
        if on_path[next] {
            continue;
        }
        let extra = u32::from(topology.joint(next).is_prismatic());
        search(topology, input, next, hops + 1, sliders + extra, on_path, best);
    }
    on_path[joint] = false;
}
