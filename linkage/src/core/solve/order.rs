use std::collections::{HashMap, VecDeque};

use super::{KnownJoint, Prerequisite, SolveOrder, SolveStep};
use crate::core::state::{SubAssembly, Topology};

/// Orders the joints of a valid sub-assembly by solvability.
///
/// The input joint goes first, then every other grounded pin. The rest are
/// taken from a work queue: a joint whose solved neighbours are insufficient
/// goes back to the end of the queue. A full pass over the queue without
/// progress means the topology cannot be ordered and `None` is returned.
pub fn build_solve_order(
    topology: &Topology,
    sub: &SubAssembly,
    input: usize,
) -> Option<SolveOrder> {
    let mut steps = Vec::with_capacity(sub.len());
    let mut solved: HashMap<usize, usize> = HashMap::new();

    let driver = if topology.joint(input).is_prismatic() {
        Prerequisite::PrismaticInput
    } else {
        Prerequisite::Ground
    };
    solved.insert(input, steps.len());
    steps.push(SolveStep {
        joint: input,
        prerequisite: driver,
    });

    let mut queue = VecDeque::new();
    for &j in sub.joints() {
        if j == input {
            continue;
        }
        let joint = topology.joint(j);
        // A grounded slider rides a track fixed to ground; it still moves along it.
        if joint.grounded && !joint.is_prismatic() {
            solved.insert(j, steps.len());
            steps.push(SolveStep {
                joint: j,
                prerequisite: Prerequisite::Ground,
            });
        } else {
            queue.push_back(j);
        }
    }

    let mut stalled = 0;
    while let Some(joint) = queue.pop_front() {
        match resolve(topology, joint, input, &solved) {
            Some(prerequisite) => {
                solved.insert(joint, steps.len());
                steps.push(SolveStep {
                    joint,
                    prerequisite,
                });
                stalled = 0;
            }
            None => {
                queue.push_back(joint);
                stalled += 1;
                if stalled >= queue.len() {
                    tracing::warn!(
                        unsolved = queue.len(),
                        solved = steps.len(),
                        "solve order made no progress over a full pass"
                    );
                    return None;
                }
            }
        }
    }

    Some(SolveOrder::new(steps))
}

fn resolve(
    topology: &Topology,
    joint: usize,
    input: usize,
    solved: &HashMap<usize, usize>,
) -> Option<Prerequisite> {
    let known = |other: usize| {
        solved.get(&other).map(|&slot| KnownJoint {
            joint: other,
            slot,
            distance: topology.distance(joint, other),
        })
    };
    let neighbors = topology.neighbors(joint);
    let revolute_input = !topology.joint(input).is_prismatic();

    // A crank tip: one circle plus the known drive angle pins it down.
    if revolute_input && neighbors.contains(&input) {
        return known(input).map(|center| Prerequisite::RevoluteInput { center });
    }

    let mut first: Option<KnownJoint> = None;
    for other in neighbors {
        if revolute_input && other == input {
            continue;
        }
        let Some(candidate) = known(other) else {
            continue;
        };
        match first {
            None if topology.joint(joint).is_prismatic() => {
                return Some(Prerequisite::CircleLine { known: candidate });
            }
            None => first = Some(candidate),
            Some(first) => {
                return Some(Prerequisite::CircleCircle {
                    first,
                    second: candidate,
                });
            }
        }
    }
    None
}
