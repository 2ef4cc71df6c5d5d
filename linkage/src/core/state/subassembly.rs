use std::collections::VecDeque;

use super::Topology;

/// One connected component of the joint/body graph.
///
/// Holds arena indices only; the incident bodies of each joint are read from
/// the owning [`Topology`]. Every joint listed here has at least one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAssembly {
    joints: Vec<usize>,
    bodies: Vec<usize>,
}

impl SubAssembly {
    /// Joint indices in enumeration order.
    pub fn joints(&self) -> &[usize] {
        &self.joints
    }

    /// Body indices in enumeration order.
    pub fn bodies(&self) -> &[usize] {
        &self.bodies
    }

    pub fn contains(&self, joint: usize) -> bool {
        self.joints.binary_search(&joint).is_ok()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

impl Topology {
    /// Splits the mechanism into connected components.
    ///
    /// Components are seeded in joint enumeration order, so the result is
    /// deterministic for a given snapshot. Joints that belong to no link are
    /// left out.
    pub fn sub_assemblies(&self) -> Vec<SubAssembly> {
        let mut visited = vec![false; self.joints().len()];
        let mut components = Vec::new();

        for seed in 0..self.joints().len() {
            if visited[seed] || self.incident_bodies(seed).is_empty() {
                continue;
            }

            let mut joints = Vec::new();
            let mut bodies = Vec::new();
            let mut queue = VecDeque::from([seed]);
            visited[seed] = true;

            while let Some(joint) = queue.pop_front() {
                joints.push(joint);
                for &body in self.incident_bodies(joint) {
                    if !bodies.contains(&body) {
                        bodies.push(body);
                    }
                    for &other in &self.body(body).joints {
                        if !visited[other] {
                            visited[other] = true;
                            queue.push_back(other);
                        }
                    }
                }
            }

            joints.sort_unstable();
            bodies.sort_unstable();
            components.push(SubAssembly { joints, bodies });
        }

        components
    }
}
