use crate::core::state::{BodyId, JointId};
use crate::investigation::analysis::KinematicReport;
use crate::simulation::SubAssemblyRun;

/// Extracts one scalar per frame from a simulated sub-assembly, for charting.
pub trait Probe {
    fn name(&self) -> &str;
    fn series(&self, run: &SubAssemblyRun, report: &KinematicReport) -> Vec<f64>;
}

/// Speed of one joint.
pub struct JointSpeedProbe {
    pub joint: JointId,
}

impl Probe for JointSpeedProbe {
    fn name(&self) -> &str {
        "Joint Speed"
    }

    fn series(&self, _run: &SubAssemblyRun, report: &KinematicReport) -> Vec<f64> {
        report
            .joint(self.joint)
            .map(|analysis| analysis.speed())
            .unwrap_or_default()
    }
}

/// Angle of one link, in degrees.
pub struct LinkAngleProbe {
    pub link: BodyId,
}

impl Probe for LinkAngleProbe {
    fn name(&self) -> &str {
        "Link Angle"
    }

    fn series(&self, _run: &SubAssemblyRun, report: &KinematicReport) -> Vec<f64> {
        report
            .link(self.link)
            .map(|analysis| analysis.angle.iter().map(|a| a.to_degrees()).collect())
            .unwrap_or_default()
    }
}

/// Largest coordinate drift of any joint away from the seed frame.
pub struct ClosureErrorProbe;

impl Probe for ClosureErrorProbe {
    fn name(&self) -> &str {
        "Closure Error"
    }

    fn series(&self, run: &SubAssemblyRun, _report: &KinematicReport) -> Vec<f64> {
        let Some(seed) = run.frames.frame(0) else {
            return Vec::new();
        };
        run.frames
            .frames()
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .zip(seed)
                    .map(|(p, p0)| (*p - *p0).abs().max_element())
                    .fold(0.0, f64::max)
            })
            .collect()
    }
}
