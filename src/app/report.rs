use linkage::SimulationResult;
use linkage::core::solve::Verdict;
use linkage::investigation::probe::{ClosureErrorProbe, JointSpeedProbe, LinkAngleProbe, Probe};

/// Prints one line block per sub-assembly.
pub fn print(result: &SimulationResult, verbose: bool) {
    let topology = result.topology();
    println!(
        "mechanism v{}: {} sub-assemblies",
        result.version(),
        result.runs().len()
    );

    for (index, run) in result.runs().iter().enumerate() {
        let ids: Vec<String> = run
            .sub_assembly
            .joints()
            .iter()
            .map(|&j| topology.joint(j).id.to_string())
            .collect();
        print!("[{index}] joints {}: ", ids.join(" "));

        let input = match run.verdict {
            Verdict::Valid { input, distance } => {
                println!("valid, loop distance {distance}");
                input
            }
            Verdict::Invalid(reason) => {
                println!("invalid, {reason}");
                continue;
            }
        };
        let (Some(order), Some(halt), Some(report)) =
            (run.order.as_ref(), run.halt, result.analyze(index))
        else {
            continue;
        };

        let steps: Vec<String> = order
            .steps()
            .iter()
            .map(|step| {
                let kind = step.prerequisite.solve_type();
                format!("{}:{kind:?}", topology.joint(step.joint).id)
            })
            .collect();
        println!("    input {}, order {}", topology.joint(input).id, steps.join(" "));

        let closure = ClosureErrorProbe.series(run, &report);
        println!(
            "    {:?} after {} steps ({} frames), closure error {:.2e}",
            halt,
            run.frames.steps(),
            run.frames.len(),
            closure.last().copied().unwrap_or_default()
        );

        for id in run.frames.joint_ids() {
            let probe = JointSpeedProbe { joint: *id };
            let peak = probe.series(run, &report).into_iter().fold(0.0, f64::max);
            println!("    {id} peak {} {peak:.4}", probe.name().to_lowercase());
        }

        if !verbose {
            continue;
        }
        for link in &report.links {
            let probe = LinkAngleProbe { link: link.link };
            let angles = probe.series(run, &report);
            let (low, high) = angles
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &a| {
                    (lo.min(a), hi.max(a))
                });
            let omega = link
                .angular_velocity
                .iter()
                .fold(0.0, |peak: f64, w| peak.max(w.abs()));
            println!(
                "    {} angle {low:.2}..{high:.2} deg, peak |w| {omega:.4} rad/s",
                link.link
            );
        }
        for joint in &report.joints {
            let (Some(v), Some(a)) = (joint.velocity.first(), joint.acceleration.first()) else {
                continue;
            };
            println!(
                "    {} v0 ({:.4}, {:.4}) a0 ({:.4}, {:.4}) dt {:.5}s",
                joint.joint, v.x, v.y, a.x, a.y, joint.time_step
            );
        }
    }
}
