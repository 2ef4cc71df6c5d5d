use std::path::PathBuf;

use clap::Parser;

/// Simulate a planar linkage described in a RON file.
#[derive(Debug, Parser)]
#[command(name = "mechsim", version)]
pub struct Args {
    /// Mechanism description (joints, links, optional config).
    pub description: PathBuf,

    /// Stepping parameters; overrides any config embedded in the description.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drive every input joint at this speed (deg/s, or the slider equivalent).
    #[arg(long, allow_hyphen_values = true)]
    pub speed: Option<f64>,

    /// Commit this frame of the first valid sub-assembly back to the model and rerun.
    #[arg(long, value_name = "STEP")]
    pub commit_step: Option<usize>,

    /// Print per-joint and per-link kinematics.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub description: PathBuf,
    pub config: Option<PathBuf>,
    pub speed: Option<f64>,
    pub commit_step: Option<usize>,
    pub verbose: bool,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        Self {
            description: args.description,
            config: args.config,
            speed: args.speed,
            commit_step: args.commit_step,
            verbose: args.verbose,
        }
    }
}
