use std::path::PathBuf;

use clap::Parser;

/// `minderd`: the supervisor daemon's service-binary arguments.
///
/// Directory overrides take precedence over `STATE_DIRECTORY`/
/// `RUNTIME_DIRECTORY`; when absent, [`store::Paths::for_service`] resolves
/// them from the environment as usual.
#[derive(Parser, Debug)]
#[command(name = "minderd", about = "Sequencer-graph supervisor daemon", version)]
pub struct MinderD {
    /// Override `STATE_DIRECTORY` (holds profile.rules/observed.rules).
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
    /// Override `RUNTIME_DIRECTORY` (holds control.socket).
    #[arg(long)]
    pub runtime_dir: Option<PathBuf>,
    /// Stay attached to the controlling terminal instead of detaching.
    ///
    /// The supervisor never double-forks itself; under a service manager
    /// (the expected deployment) this flag has no effect. It exists so a
    /// developer running `minderd` directly from a shell gets an explicit
    /// opt-in rather than a daemon silently backgrounding itself.
    #[arg(long)]
    pub foreground: bool,
    /// Increase logging verbosity; may be repeated.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Only log warnings and errors.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl MinderD {
    /// Applies `--state-dir`/`--runtime-dir` overrides onto the
    /// environment before resolving [`store::Paths`], so the override takes
    /// effect without duplicating `store`'s resolution logic.
    pub fn apply_directory_overrides(&self) {
        if let Some(dir) = &self.state_dir {
            std::env::set_var("STATE_DIRECTORY", dir);
        }
        if let Some(dir) = &self.runtime_dir {
            std::env::set_var("RUNTIME_DIRECTORY", dir);
        }
    }
}
