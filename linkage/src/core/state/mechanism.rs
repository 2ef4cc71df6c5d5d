use std::collections::HashSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{BodyId, Joint, JointId, Link, Topology, validate_link};
use crate::config::SimulationConfig;
use crate::control::EditCommand;
use crate::error::{ConfigError, TopologyError};
use crate::simulation::SimulationResult;

/// On-disk form of a mechanism: joints, links and optional stepping overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MechanismDescription {
    #[serde(default)]
    pub config: Option<SimulationConfig>,
    pub joints: Vec<Joint>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl MechanismDescription {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(source)?)
    }
}

/// The authoritative, editable joint/link model.
///
/// Every successful edit bumps `version`; analysis results carry the version of
/// the snapshot they were computed from so stale results can be discarded.
#[derive(Debug, Clone, Default)]
pub struct Mechanism {
    joints: Vec<Joint>,
    links: Vec<Link>,
    version: u64,
}

impl Mechanism {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: MechanismDescription) -> Result<Self, TopologyError> {
        // Validation only; the snapshot itself is rebuilt on demand.
        Topology::new(0, description.joints.clone(), &description.links)?;
        Ok(Self {
            joints: description.joints,
            links: description.links,
            version: 0,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.iter().find(|joint| joint.id == id)
    }

    pub fn snapshot(&self) -> Topology {
        Topology::assemble(self.version, self.joints.clone(), &self.links)
    }

    pub fn add_joint(&mut self, joint: Joint) -> Result<(), TopologyError> {
        if self.joint(joint.id).is_some() {
            return Err(TopologyError::DuplicateJoint(joint.id));
        }
        tracing::debug!(joint = %joint.id, "adding joint");
        self.joints.push(joint);
        self.bump();
        Ok(())
    }

    /// Removes a joint and detaches it from every link. Links left without
    /// joints are removed as well.
    pub fn remove_joint(&mut self, id: JointId) -> Result<(), TopologyError> {
        let index = self.index_of(id)?;
        self.joints.remove(index);
        for link in &mut self.links {
            link.joints.retain(|&joint| joint != id);
        }
        self.links.retain(|link| !link.joints.is_empty());
        tracing::debug!(joint = %id, "removed joint");
        self.bump();
        Ok(())
    }

    pub fn move_joint(&mut self, id: JointId, position: DVec2) -> Result<(), TopologyError> {
        self.edit_joint(id, |joint| joint.position = position)
    }

    pub fn set_grounded(&mut self, id: JointId, grounded: bool) -> Result<(), TopologyError> {
        self.edit_joint(id, |joint| joint.grounded = grounded)
    }

    pub fn set_input(&mut self, id: JointId, input: bool) -> Result<(), TopologyError> {
        self.edit_joint(id, |joint| joint.input = input)
    }

    pub fn set_input_speed(&mut self, id: JointId, speed: f64) -> Result<(), TopologyError> {
        self.edit_joint(id, |joint| joint.input_speed = speed)
    }

    pub fn set_slide_angle(&mut self, id: JointId, angle: f64) -> Result<(), TopologyError> {
        self.edit_joint(id, |joint| joint.angle = angle)
    }

    pub fn add_link(&mut self, link: Link) -> Result<(), TopologyError> {
        if self.links.iter().any(|existing| existing.id == link.id) {
            return Err(TopologyError::DuplicateLink(link.id));
        }
        let known: HashSet<JointId> = self.joints.iter().map(|joint| joint.id).collect();
        validate_link(&link, &known)?;
        tracing::debug!(link = %link.id, joints = link.joints.len(), "adding link");
        self.links.push(link);
        self.bump();
        Ok(())
    }

    pub fn remove_link(&mut self, id: BodyId) -> Result<(), TopologyError> {
        let index = self
            .links
            .iter()
            .position(|link| link.id == id)
            .ok_or(TopologyError::UnknownLink(id))?;
        self.links.remove(index);
        self.bump();
        Ok(())
    }

    pub fn apply(&mut self, command: EditCommand) -> Result<(), TopologyError> {
        match command {
            EditCommand::AddJoint(joint) => self.add_joint(joint),
            EditCommand::RemoveJoint(id) => self.remove_joint(id),
            EditCommand::MoveJoint(id, position) => self.move_joint(id, position),
            EditCommand::SetGrounded(id, grounded) => self.set_grounded(id, grounded),
            EditCommand::SetInput(id, input) => self.set_input(id, input),
            EditCommand::SetInputSpeed(id, speed) => self.set_input_speed(id, speed),
            EditCommand::SetSlideAngle(id, angle) => self.set_slide_angle(id, angle),
            EditCommand::AddLink(link) => self.add_link(link),
            EditCommand::RemoveLink(id) => self.remove_link(id),
        }
    }

    /// Writes one simulated frame back into the authoritative joint positions.
    pub fn commit_frame(
        &mut self,
        result: &SimulationResult,
        sub_assembly: usize,
        step: usize,
    ) -> Result<(), TopologyError> {
        if result.version() != self.version {
            return Err(TopologyError::StaleResult {
                result: result.version(),
                current: self.version,
            });
        }
        let missing = TopologyError::MissingFrame { sub_assembly, step };
        let run = result.runs().get(sub_assembly).ok_or(missing.clone())?;
        let frame = run.frames.frame(step).ok_or(missing)?;

        for (&id, &position) in run.frames.joint_ids().iter().zip(frame) {
            let index = self.index_of(id)?;
            self.joints[index].position = position;
        }
        tracing::debug!(sub_assembly, step, "committed frame");
        self.bump();
        Ok(())
    }

    fn edit_joint(
        &mut self,
        id: JointId,
        edit: impl FnOnce(&mut Joint),
    ) -> Result<(), TopologyError> {
        let index = self.index_of(id)?;
        edit(&mut self.joints[index]);
        self.bump();
        Ok(())
    }

    fn index_of(&self, id: JointId) -> Result<usize, TopologyError> {
        self.joints
            .iter()
            .position(|joint| joint.id == id)
            .ok_or(TopologyError::UnknownJoint(id))
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}
