use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::core::solve::{
    AnimationFrames, HaltReason, InvalidReason, SolveOrder, Stepper, Verdict, build_solve_order,
    classify,
};
use crate::core::state::{BodyId, JointId, Mechanism, SubAssembly, Topology};
use crate::investigation::analysis::{JointAnalysis, KinematicReport, LinkAnalysis, analyze};

/// Everything computed for one connected component.
#[derive(Debug, Clone, PartialEq)]
pub struct SubAssemblyRun {
    pub sub_assembly: SubAssembly,
    pub verdict: Verdict,
    pub order: Option<SolveOrder>,
    /// Empty unless the sub-assembly is valid.
    pub frames: AnimationFrames,
    pub halt: Option<HaltReason>,
}

impl SubAssemblyRun {
    fn invalid(sub_assembly: SubAssembly, reason: InvalidReason) -> Self {
        Self {
            sub_assembly,
            verdict: Verdict::Invalid(reason),
            order: None,
            frames: AnimationFrames::default(),
            halt: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verdict.is_valid()
    }
}

/// Pipeline output for one topology snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    topology: Topology,
    config: SimulationConfig,
    runs: Vec<SubAssemblyRun>,
}

impl SimulationResult {
    /// Version of the snapshot this result was computed from.
    pub fn version(&self) -> u64 {
        self.topology.version()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn runs(&self) -> &[SubAssemblyRun] {
        &self.runs
    }

    pub fn valid_runs(&self) -> impl Iterator<Item = (usize, &SubAssemblyRun)> {
        self.runs.iter().enumerate().filter(|(_, run)| run.is_valid())
    }

    /// Sub-assembly containing a joint.
    pub fn run_for_joint(&self, id: JointId) -> Option<(usize, &SubAssemblyRun)> {
        let joint = self.topology.joint_index(id)?;
        self.runs
            .iter()
            .enumerate()
            .find(|(_, run)| run.sub_assembly.contains(joint))
    }

    /// Kinematics of one sub-assembly, or `None` if it was not simulated.
    pub fn analyze(&self, index: usize) -> Option<KinematicReport> {
        let run = self.runs.get(index)?;
        let order = run.order.as_ref()?;
        Some(analyze(
            &self.topology,
            &run.sub_assembly,
            order,
            &run.frames,
            &self.config,
        ))
    }

    pub fn joint_analysis(&self, id: JointId) -> Option<JointAnalysis> {
        let (index, _) = self.run_for_joint(id)?;
        let report = self.analyze(index)?;
        report.joints.into_iter().find(|analysis| analysis.joint == id)
    }

    pub fn link_analysis(&self, id: BodyId) -> Option<LinkAnalysis> {
        let body = self.topology.body_index(id)?;
        let index = self
            .runs
            .iter()
            .position(|run| run.sub_assembly.bodies().contains(&body))?;
        let report = self.analyze(index)?;
        report.links.into_iter().find(|analysis| analysis.link == id)
    }
}

/// Runs classification, ordering and stepping for whole mechanisms and keeps
/// the latest result that still matches the mechanism.
#[derive(Debug, Default)]
pub struct Simulation {
    config: SimulationConfig,
    latest: Option<SimulationResult>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            latest: None,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn latest(&self) -> Option<&SimulationResult> {
        self.latest.as_ref()
    }

    /// Computes a full result for one snapshot. Pure: nothing is stored.
    pub fn run(&self, topology: &Topology) -> SimulationResult {
        let runs: Vec<SubAssemblyRun> = topology
            .sub_assemblies()
            .into_par_iter()
            .map(|sub| run_sub_assembly(topology, sub, &self.config))
            .collect();

        tracing::info!(
            version = topology.version(),
            sub_assemblies = runs.len(),
            valid = runs.iter().filter(|run| run.is_valid()).count(),
            "recomputed mechanism"
        );

        SimulationResult {
            topology: topology.clone(),
            config: self.config.clone(),
            runs,
        }
    }

    /// Stores `result` if it was computed for `current_version`.
    ///
    /// A result for an older snapshot is dropped whole; it is never merged.
    pub fn accept(&mut self, result: SimulationResult, current_version: u64) -> bool {
        if result.version() != current_version {
            tracing::debug!(
                result = result.version(),
                current = current_version,
                "discarding stale result"
            );
            return false;
        }
        self.latest = Some(result);
        true
    }

    /// Runs the current snapshot of `mechanism` and stores it as the latest result.
    pub fn recompute(&mut self, mechanism: &Mechanism) -> Option<&SimulationResult> {
        let result = self.run(&mechanism.snapshot());
        if self.accept(result, mechanism.version()) {
            self.latest()
        } else {
            None
        }
    }
}

fn run_sub_assembly(
    topology: &Topology,
    sub: SubAssembly,
    config: &SimulationConfig,
) -> SubAssemblyRun {
    let verdict = classify(topology, &sub);
    let input = match verdict {
        Verdict::Valid { input, .. } => input,
        Verdict::Invalid(reason) => {
            tracing::debug!(joints = sub.len(), %reason, "sub-assembly is not a mechanism");
            return SubAssemblyRun::invalid(sub, reason);
        }
    };

    let Some(order) = build_solve_order(topology, &sub, input) else {
        return SubAssemblyRun::invalid(sub, InvalidReason::Unsolvable);
    };

    let (frames, halt) = Stepper::new(topology, &order, config).run();
    tracing::debug!(
        input = %topology.joint(input).id,
        steps = frames.steps(),
        ?halt,
        "simulated sub-assembly"
    );

    SubAssemblyRun {
        sub_assembly: sub,
        verdict,
        order: Some(order),
        frames,
        halt: Some(halt),
    }
}
