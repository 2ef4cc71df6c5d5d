pub mod core;
pub mod report;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use linkage::control::{CommandQueue, EditCommand};
use linkage::{Mechanism, MechanismDescription, Simulation, SimulationConfig};

use self::core::AppConfig;

pub struct App {
    config: AppConfig,
    mechanism: Mechanism,
    simulation: Simulation,
    commands: CommandQueue,
}

impl App {
    pub fn load(config: AppConfig) -> Result<Self> {
        let source = read(&config.description)?;
        let description = MechanismDescription::from_ron_str(&source)
            .with_context(|| format!("parsing {}", config.description.display()))?;

        let overrides = match &config.config {
            Some(path) => Some(
                SimulationConfig::from_ron_str(&read(path)?)
                    .with_context(|| format!("parsing {}", path.display()))?,
            ),
            None => None,
        };
        let settings = overrides
            .or_else(|| description.config.clone())
            .unwrap_or_default();

        let mechanism = Mechanism::from_description(description)
            .with_context(|| format!("loading {}", config.description.display()))?;
        tracing::info!(
            joints = mechanism.joints().len(),
            links = mechanism.links().len(),
            "loaded mechanism"
        );

        let (commands, sender) = CommandQueue::new();
        if let Some(speed) = config.speed {
            for joint in mechanism.joints().iter().filter(|joint| joint.input) {
                sender.send(EditCommand::SetInputSpeed(joint.id, speed));
            }
        }

        Ok(Self {
            config,
            mechanism,
            simulation: Simulation::new(settings),
            commands,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.apply_pending();
        let result = self
            .simulation
            .recompute(&self.mechanism)
            .cloned()
            .ok_or_else(|| anyhow!("no result for mechanism v{}", self.mechanism.version()))?;
        report::print(&result, self.config.verbose);

        let Some(step) = self.config.commit_step else {
            return Ok(());
        };
        let (index, _) = result
            .valid_runs()
            .next()
            .ok_or_else(|| anyhow!("no valid sub-assembly to commit a frame from"))?;
        self.mechanism
            .commit_frame(&result, index, step)
            .with_context(|| format!("committing frame {step}"))?;
        tracing::info!(step, version = self.mechanism.version(), "committed frame");

        println!();
        println!("after committing frame {step}:");
        if let Some(rerun) = self.simulation.recompute(&self.mechanism) {
            report::print(rerun, self.config.verbose);
        }
        Ok(())
    }

    fn apply_pending(&mut self) {
        for command in self.commands.drain() {
            if let Err(err) = self.mechanism.apply(command) {
                tracing::warn!(%err, "edit rejected");
            }
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
