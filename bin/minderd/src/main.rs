use std::process::ExitCode;

use clap::Parser;
use cli::minderd::MinderD;

fn main() -> ExitCode {
    let args = MinderD::parse();
    args.apply_directory_overrides();

    let verbosity = logging::Verbosity::from_flags(args.verbose, args.quiet);
    if let Err(err) = verbosity.init() {
        eprintln!("minderd: failed to initialize logging: {err}");
    }

    match run_service() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "minderd exiting");
            ExitCode::from(1)
        }
    }
}

fn run_service() -> Result<(), daemon::DaemonError> {
    let paths = store::Paths::for_service()?;
    let server = ipc::Server::bind(&paths.socket_path())?;
    let sequencer = seq::live::LiveSequencer::new();
    let mut core = daemon::Core::start(sequencer, paths)?;
    core.run(&server)
}
