mod common;

use glam::DVec2;
use linkage::control::{CommandQueue, EditCommand};
use linkage::{
    BodyId, Joint, JointId, Link, Mechanism, MechanismDescription, Simulation, SimulationConfig,
    TopologyError,
};

#[test]
fn every_edit_bumps_the_version() {
    let mut mechanism = common::mechanism(common::crank_rocker());
    assert_eq!(mechanism.version(), 7);

    mechanism
        .move_joint(JointId(3), DVec2::new(3.0, 2.4))
        .unwrap();
    mechanism.set_input_speed(JointId(1), -30.0).unwrap();
    assert_eq!(mechanism.version(), 9);
    assert_eq!(mechanism.snapshot().version(), 9);
}

#[test]
fn rejected_edits_leave_the_version_alone() {
    let mut mechanism = common::mechanism(common::crank_rocker());
    let before = mechanism.version();

    assert_eq!(
        mechanism.add_joint(Joint::revolute(1, 5.0, 5.0)),
        Err(TopologyError::DuplicateJoint(JointId(1)))
    );
    assert_eq!(
        mechanism.add_link(Link::new(10, [1, 4])),
        Err(TopologyError::DuplicateLink(BodyId(10)))
    );
    assert_eq!(
        mechanism.add_link(Link::new(20, [1, 9])),
        Err(TopologyError::UnknownJoint(JointId(9)))
    );
    assert_eq!(
        mechanism.add_link(Link::new(21, [2, 2])),
        Err(TopologyError::RepeatedJoint {
            link: BodyId(21),
            joint: JointId(2)
        })
    );
    assert_eq!(
        mechanism.add_link(Link::new(22, std::iter::empty())),
        Err(TopologyError::EmptyLink(BodyId(22)))
    );
    assert_eq!(
        mechanism.remove_link(BodyId(99)),
        Err(TopologyError::UnknownLink(BodyId(99)))
    );
    assert_eq!(
        mechanism.set_grounded(JointId(42), true),
        Err(TopologyError::UnknownJoint(JointId(42)))
    );

    assert_eq!(mechanism.version(), before);
}

#[test]
fn removing_a_joint_drops_emptied_links() {
    let mut mechanism = common::mechanism(common::crank_rocker());
    mechanism.add_joint(Joint::revolute(5, 6.0, 0.0)).unwrap();
    mechanism.add_link(Link::new(13, [5])).unwrap();

    mechanism.remove_joint(JointId(5)).unwrap();
    assert!(mechanism.links().iter().all(|link| link.id != BodyId(13)));

    mechanism.remove_joint(JointId(3)).unwrap();
    let coupler = mechanism
        .links()
        .iter()
        .find(|link| link.id == BodyId(11))
        .unwrap();
    assert_eq!(coupler.joints, [JointId(2)]);
}

#[test]
fn queued_commands_apply_in_order() {
    let mut mechanism = common::mechanism(common::crank_rocker());
    let (queue, sender) = CommandQueue::new();
    let remote = sender.clone();

    std::thread::spawn(move || {
        remote.send(EditCommand::SetInput(JointId(1), false));
        remote.send(EditCommand::SetInput(JointId(4), true));
        remote.send(EditCommand::SetInputSpeed(JointId(4), 45.0));
    })
    .join()
    .unwrap();
    sender.send(EditCommand::RemoveJoint(JointId(77)));

    let commands = queue.drain();
    assert_eq!(commands.len(), 4);
    let outcomes: Vec<bool> = commands
        .into_iter()
        .map(|command| mechanism.apply(command).is_ok())
        .collect();
    assert_eq!(outcomes, [true, true, true, false]);
    assert!(queue.try_recv().is_none());

    let rocker = mechanism.joint(JointId(4)).unwrap();
    assert!(rocker.input);
    assert_eq!(rocker.input_speed, 45.0);
    assert!(!mechanism.joint(JointId(1)).unwrap().input);

    let mut simulation = Simulation::new(SimulationConfig::default());
    let result = simulation.recompute(&mechanism).unwrap();
    assert!(result.runs()[0].is_valid());
}

#[test]
fn stale_results_are_discarded() {
    let mut mechanism = common::mechanism(common::crank_rocker());
    let mut simulation = Simulation::new(SimulationConfig::default());

    let stale = simulation.run(&mechanism.snapshot());
    mechanism
        .move_joint(JointId(4), DVec2::new(3.2, 0.0))
        .unwrap();
    let fresh = simulation.run(&mechanism.snapshot());

    assert!(!simulation.accept(stale.clone(), mechanism.version()));
    assert!(simulation.latest().is_none());
    assert!(simulation.accept(fresh, mechanism.version()));
    assert_eq!(simulation.latest().unwrap().version(), mechanism.version());

    assert_eq!(
        mechanism.commit_frame(&stale, 0, 10),
        Err(TopologyError::StaleResult {
            result: stale.version(),
            current: mechanism.version()
        })
    );
}

#[test]
fn committing_a_frame_moves_the_joints() {
    let mut mechanism = common::mechanism(common::crank_rocker());
    let mut simulation = Simulation::new(SimulationConfig::default());
    let result = simulation.recompute(&mechanism).unwrap().clone();
    let version = mechanism.version();

    assert_eq!(
        mechanism.commit_frame(&result, 0, 100_000),
        Err(TopologyError::MissingFrame {
            sub_assembly: 0,
            step: 100_000
        })
    );

    mechanism.commit_frame(&result, 0, 90).unwrap();
    assert_eq!(mechanism.version(), version + 1);

    let tip = mechanism.joint(JointId(2)).unwrap().position;
    assert!(tip.distance(DVec2::new(-1.0, 0.0)) < 1e-9);

    // The committed pose is a valid starting point for a fresh run.
    let rerun = simulation.recompute(&mechanism).unwrap();
    assert_eq!(rerun.version(), version + 1);
    assert_eq!(rerun.runs()[0].frames.steps(), 360);
}

#[test]
fn description_round_trips_through_ron() {
    let source = r#"(
        config: Some((max_steps: 180)),
        joints: [
            (id: 1, position: (0.0, 0.0), grounded: true, input: true, input_speed: 60.0),
            (id: 2, position: (0.0, 1.0)),
            (id: 3, position: (3.0, 2.5)),
            (id: 4, position: (3.0, 0.0), grounded: true),
        ],
        links: [
            (id: 10, joints: [1, 2]),
            (id: 11, joints: [2, 3]),
            (id: 12, joints: [3, 4]),
        ],
    )"#;
    let description = MechanismDescription::from_ron_str(source).unwrap();
    let config = description.config.clone().unwrap();
    assert_eq!(config.max_steps, 180);
    assert_eq!(config.revolute_step_deg, 1.0);

    let mechanism = Mechanism::from_description(description).unwrap();
    assert_eq!(mechanism.version(), 0);
    assert_eq!(mechanism.joints().len(), 4);

    let result = Simulation::new(config).run(&mechanism.snapshot());
    let run = &result.runs()[0];
    assert!(run.is_valid());
    assert_eq!(run.frames.steps(), 180);
}

#[test]
fn description_with_dangling_link_is_rejected() {
    let description = MechanismDescription {
        config: None,
        joints: vec![Joint::revolute(1, 0.0, 0.0)],
        links: vec![Link::new(1, [1, 2])],
    };
    assert_eq!(
        Mechanism::from_description(description).unwrap_err(),
        TopologyError::UnknownJoint(JointId(2))
    );
}

#[test]
fn recompute_stores_the_current_version() {
    let mut mechanism = common::mechanism(common::crank_rocker());
    let mut simulation = Simulation::new(SimulationConfig::default());

    let first = simulation.recompute(&mechanism).unwrap().version();
    assert_eq!(first, mechanism.version());

    mechanism.set_input_speed(JointId(1), 120.0).unwrap();
    let stale = simulation.latest().unwrap().version();
    assert!(stale < mechanism.version());

    let second = simulation.recompute(&mechanism).unwrap().version();
    assert_eq!(second, mechanism.version());
    assert_eq!(simulation.latest().unwrap().version(), mechanism.version());
}
