use std::io::{Cursor, Write};

use clap::{Parser, Subcommand};

use crate::error::CliError;

/// `minderctl`: the user-facing control client for the supervisor daemon.
#[derive(Parser, Debug)]
#[command(name = "minderctl", about = "Control the sequencer-graph supervisor daemon", version)]
pub struct MinderCtl {
    /// Increase logging verbosity; may be repeated.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log warnings and errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// One control-socket request, or the purely-local `check` command.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a rule file and report any errors, without contacting the daemon.
    Check {
        /// Path to the rule file, or `-` for standard input.
        path: String,
    },
    /// Ask the daemon to reset its live connection graph.
    Reset {
        /// Keep the current observed rules instead of clearing them.
        #[arg(long)]
        keep: bool,
        /// Perform a hard reset (full kernel rescan) instead of a soft one.
        #[arg(long)]
        hard: bool,
    },
    /// Replace the daemon's profile rules with the contents of a file.
    Load {
        /// Path to the new profile, or `-` for standard input.
        path: String,
    },
    /// Write the daemon's current rule sets to a file.
    Save {
        /// Destination path, or `-` for standard output.
        path: String,
    },
    /// Print a short status report from the daemon.
    Status,
}

/// Runs one parsed invocation, returning the process exit code.
pub fn run(ctl: &MinderCtl, paths: &store::Paths, stdout: &mut impl Write, stderr: &mut impl Write) -> u8 {
    let result = match &ctl.command {
        Command::Check { path } => return run_check(path, stdout, stderr),
        Command::Reset { keep, hard } => run_reset(paths, *keep, *hard),
        Command::Load { path } => run_load(paths, path, stderr),
        Command::Save { path } => run_save(paths, path),
        Command::Status => run_status(paths, stdout),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(stderr, "minderctl: {err}");
            1
        }
    }
}

fn run_check(path: &str, stdout: &mut impl Write, stderr: &mut impl Write) -> u8 {
    let text = match store::read_user_file(path) {
        Ok(text) => text,
        Err(err) => {
            let _ = writeln!(stderr, "minderctl: {err}");
            return 1;
        }
    };

    let outcome = rule::parse_rules(&text);
    for line_error in &outcome.errors {
        let _ = writeln!(stderr, "{path}:{}: {}", line_error.line, line_error.error);
    }
    if outcome.is_ok() {
        let _ = writeln!(stdout, "{}: {} rule(s), no errors", path, outcome.rules.len());
        0
    } else {
        1
    }
}

fn run_reset(paths: &store::Paths, keep: bool, hard: bool) -> Result<(), CliError> {
    let mut options = Vec::new();
    if keep {
        options.push("keepObserved".to_string());
    }
    if hard {
        options.push("resetHard".to_string());
    }

    let mut client = ipc::Client::connect(&paths.socket_path())?;
    client.send_command_with_options("reset", &options)?;
    Ok(())
}

fn run_load(paths: &store::Paths, path: &str, stderr: &mut impl Write) -> Result<(), CliError> {
    let text = store::read_user_file(path)?;

    let outcome = rule::parse_rules(&text);
    if !outcome.is_ok() {
        for line_error in &outcome.errors {
            let _ = writeln!(stderr, "{path}:{}: {}", line_error.line, line_error.error);
        }
        return Ok(());
    }

    let mut client = ipc::Client::connect(&paths.socket_path())?;
    client.send_command("load")?;
    client.send_file(&mut Cursor::new(text.into_bytes()))?;
    Ok(())
}

fn run_save(paths: &store::Paths, path: &str) -> Result<(), CliError> {
    let mut client = ipc::Client::connect(&paths.socket_path())?;
    client.send_command("save")?;
    let mut buf = Vec::new();
    client.receive_file(&mut buf)?;
    store::write_user_file(path, &String::from_utf8_lossy(&buf))?;
    Ok(())
}

fn run_status(paths: &store::Paths, stdout: &mut impl Write) -> Result<(), CliError> {
    let mut client = ipc::Client::connect(&paths.socket_path())?;
    client.send_command("status")?;
    let mut buf = Vec::new();
    client.receive_file(&mut buf)?;
    stdout.write_all(&buf).map_err(|e| CliError::Ipc(ipc::IpcError::Io(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_reports_success_for_valid_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.rules");
        std::fs::write(&path, "Controller --> Synthesizer\n").unwrap();

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_check(path.to_str().unwrap(), &mut stdout, &mut stderr);

        assert_eq!(code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn check_reports_the_offending_line_on_malformed_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.rules");
        std::fs::write(&path, "not a rule at all ===>\n").unwrap();

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_check(path.to_str().unwrap(), &mut stdout, &mut stderr);

        assert_eq!(code, 1);
        assert!(!stderr.is_empty());
    }

    #[test]
    fn check_reports_missing_file_as_an_error() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_check("/nonexistent/minder/profile.rules", &mut stdout, &mut stderr);
        assert_eq!(code, 1);
    }
}
