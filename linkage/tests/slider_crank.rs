mod common;

use approx::assert_relative_eq;
use linkage::core::solve::{HaltReason, SolveType};
use linkage::investigation::probe::{ClosureErrorProbe, JointSpeedProbe, LinkAngleProbe, Probe};
use linkage::{BodyId, JointId, Simulation, SimulationConfig};

#[test]
fn slider_stays_on_its_track() {
    let topology = common::topology(common::slider_crank());
    let result = Simulation::new(SimulationConfig::default()).run(&topology);
    let run = &result.runs()[0];

    assert_eq!(run.halt, Some(HaltReason::Closed));
    assert_eq!(run.frames.steps(), 360);

    let order = run.order.as_ref().unwrap();
    let types: Vec<SolveType> = order
        .steps()
        .iter()
        .map(|step| step.prerequisite.solve_type())
        .collect();
    assert_eq!(
        types,
        [SolveType::Ground, SolveType::RevoluteInput, SolveType::CircleLine]
    );

    let tip = run.frames.trace(JointId(2)).unwrap();
    let slider = run.frames.trace(JointId(3)).unwrap();
    let coupler = 10f64.sqrt();
    for (b, c) in tip.iter().zip(&slider) {
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-9);
        assert!(c.x > 0.0);
        assert_relative_eq!(b.distance(*c), coupler, epsilon = 1e-6);
    }
}

#[test]
fn slider_kinematics_match_finite_differences() {
    let topology = common::topology(common::slider_crank());
    let result = Simulation::new(SimulationConfig::default()).run(&topology);
    let slider = result.joint_analysis(JointId(3)).unwrap();
    let dt = slider.time_step;
    assert_relative_eq!(dt, 1.0 / 60.0, epsilon = 1e-12);

    for step in (1..slider.position.len() - 1).step_by(10) {
        let (prev, here, next) = (
            slider.position[step - 1],
            slider.position[step],
            slider.position[step + 1],
        );
        let velocity = (next - prev) / (2.0 * dt);
        let acceleration = (next - 2.0 * here + prev) / (dt * dt);

        assert_relative_eq!(slider.velocity[step].y, 0.0, epsilon = 1e-9);
        assert!(
            velocity.distance(slider.velocity[step]) < 1e-2,
            "velocity at step {step}: {velocity:?} vs {:?}",
            slider.velocity[step]
        );
        assert!(
            acceleration.distance(slider.acceleration[step]) < 1e-2,
            "acceleration at step {step}: {acceleration:?} vs {:?}",
            slider.acceleration[step]
        );
    }
}

#[test]
fn crank_tip_accelerates_towards_the_pivot() {
    let topology = common::topology(common::slider_crank());
    let result = Simulation::new(SimulationConfig::default()).run(&topology);
    let tip = result.joint_analysis(JointId(2)).unwrap();

    let omega = 60f64.to_radians();
    for (p, a) in tip.position.iter().zip(&tip.acceleration) {
        let expected = -*p * omega * omega;
        assert!(expected.distance(*a) < 1e-9);
    }
}

#[test]
fn probes_sample_every_frame() {
    let topology = common::topology(common::slider_crank());
    let result = Simulation::new(SimulationConfig::default()).run(&topology);
    let run = &result.runs()[0];
    let report = result.analyze(0).unwrap();

    let speed = JointSpeedProbe { joint: JointId(3) }.series(run, &report);
    let angle = LinkAngleProbe { link: BodyId(10) }.series(run, &report);
    let closure = ClosureErrorProbe.series(run, &report);

    assert_eq!(speed.len(), run.frames.len());
    assert_eq!(angle.len(), run.frames.len());
    assert_eq!(closure.len(), run.frames.len());
    assert_relative_eq!(angle[0], 90.0, epsilon = 1e-9);
    assert_relative_eq!(closure[0], 0.0);
    assert!(closure[closure.len() - 1] <= SimulationConfig::default().closure_tolerance);

    // Slider is at rest at the dead centres, where crank and coupler line up.
    assert!(speed.iter().any(|&s| s < 0.05));
}

#[test]
fn missing_probe_target_gives_empty_series() {
    let topology = common::topology(common::slider_crank());
    let result = Simulation::new(SimulationConfig::default()).run(&topology);
    let report = result.analyze(0).unwrap();

    let series = JointSpeedProbe { joint: JointId(99) }.series(&result.runs()[0], &report);
    assert!(series.is_empty());
}
