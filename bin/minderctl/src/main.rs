use std::process::ExitCode;

use clap::Parser;
use cli::minderctl::{run, MinderCtl};

fn main() -> ExitCode {
    let ctl = MinderCtl::parse();

    let verbosity = logging::Verbosity::from_flags(ctl.verbose, ctl.quiet);
    if let Err(err) = verbosity.init() {
        eprintln!("minderctl: failed to initialize logging: {err}");
    }

    let paths = match store::Paths::for_client() {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("minderctl: {err}");
            return ExitCode::from(1);
        }
    };

    let code = run(&ctl, &paths, &mut std::io::stdout(), &mut std::io::stderr());
    ExitCode::from(code)
}
