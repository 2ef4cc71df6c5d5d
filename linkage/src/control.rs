use std::sync::mpsc::{Receiver, Sender, channel};

use glam::DVec2;

use crate::core::state::{BodyId, Joint, JointId, Link};

/// One topology edit coming from the editing layer.
///
/// Applying any of these is a change notification: the whole pipeline is
/// rerun against the next snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    AddJoint(Joint),
    RemoveJoint(JointId),
    MoveJoint(JointId, DVec2),
    SetGrounded(JointId, bool),
    SetInput(JointId, bool),
    SetInputSpeed(JointId, f64),
    SetSlideAngle(JointId, f64),
    AddLink(Link),
    RemoveLink(BodyId),
}

pub struct CommandQueue {
    receiver: Receiver<EditCommand>,
}

#[derive(Clone)]
pub struct CommandSender {
    sender: Sender<EditCommand>,
}

impl CommandQueue {
    pub fn new() -> (Self, CommandSender) {
        let (sender, receiver) = channel();
        (Self { receiver }, CommandSender { sender })
    }

    pub fn try_recv(&self) -> Option<EditCommand> {
        self.receiver.try_recv().ok()
    }

    /// Everything queued so far, in send order.
    pub fn drain(&self) -> Vec<EditCommand> {
        self.receiver.try_iter().collect()
    }
}

impl CommandSender {
    pub fn send(&self, command: EditCommand) {
        // The queue owner going away just means nobody listens for edits anymore.
        let _ = self.sender.send(command);
    }
}
