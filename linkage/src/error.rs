use thiserror::Error;

use crate::core::state::{BodyId, JointId};

/// Rejected edits to the joint/link topology.
///
/// Analysis never fails with these: an invalid mechanism is a verdict, not an error.
/// They only come from building or mutating a [`crate::core::state::Mechanism`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("joint {0} already exists")]
    DuplicateJoint(JointId),
    #[error("link {0} already exists")]
    DuplicateLink(BodyId),
    #[error("joint {0} does not exist")]
    UnknownJoint(JointId),
    #[error("link {0} does not exist")]
    UnknownLink(BodyId),
    #[error("link {0} connects no joints")]
    EmptyLink(BodyId),
    #[error("link {link} lists joint {joint} more than once")]
    RepeatedJoint { link: BodyId, joint: JointId },
    #[error("result was computed for version {result} but the mechanism is at version {current}")]
    StaleResult { result: u64, current: u64 },
    #[error("sub-assembly {sub_assembly} has no frame {step}")]
    MissingFrame { sub_assembly: usize, step: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse RON document: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
