use std::io::Cursor;

use ipc::Connection;
use seq::SequencerApi;

use crate::state::{rules_to_text, Core};

const OPT_KEEP_OBSERVED: &str = "keepObserved";
const OPT_RESET_HARD: &str = "resetHard";

impl<S: SequencerApi> Core<S> {
    /// Reads one command line off `conn` and dispatches it. Any
    /// [`ipc::IpcError`] aborts this exchange but never the daemon.
    pub fn handle_control_connection(&mut self, conn: &mut Connection) {
        let (command, options) = match conn.receive_command() {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(%err, "control connection failed while reading command");
                return;
            }
        };

        let result = match command.as_str() {
            "reset" => self.handle_reset(&options),
            "load" => self.handle_load(conn),
            "save" => self.handle_save(conn),
            "status" => self.handle_status(conn),
            other => {
                tracing::warn!(command = other, "unrecognized control command");
                Ok(())
            }
        };

        if let Err(err) = result {
            tracing::warn!(%err, command = %command, "control command failed");
        }
    }

    fn handle_reset(&mut self, options: &[String]) -> Result<(), ipc::IpcError> {
        let keep_observed = options.iter().any(|o| o == OPT_KEEP_OBSERVED);
        let reset_hard = options.iter().any(|o| o == OPT_RESET_HARD);
        for opt in options {
            if opt != OPT_KEEP_OBSERVED && opt != OPT_RESET_HARD {
                tracing::warn!(option = %opt, "unrecognized reset option");
            }
        }

        if !keep_observed {
            self.observed_rules.clear();
            self.save_observed();
        }
        if reset_hard {
            self.hard_reset();
        } else {
            self.soft_reset();
        }
        Ok(())
    }

    fn handle_load(&mut self, conn: &mut Connection) -> Result<(), ipc::IpcError> {
        let mut buf = Vec::new();
        conn.receive_file(&mut buf)?;
        let text = String::from_utf8_lossy(&buf).into_owned();
        self.load_profile(&text);
        Ok(())
    }

    /// Parses `text` as a new profile rule set and, if it parses cleanly,
    /// persists it, adopts it, clears the observed rules, and performs a
    /// soft reset so the live graph reflects the new profile. Returns
    /// whether the load was accepted.
    pub fn load_profile(&mut self, text: &str) -> bool {
        let outcome = rule::parse_rules(text);
        if !outcome.is_ok() {
            tracing::warn!(errors = outcome.errors.len(), "rejecting malformed profile load");
            return false;
        }

        if let Err(err) = store::write_file(&self.paths.profile_path(), text) {
            tracing::error!(%err, "failed to persist loaded profile");
            return false;
        }

        self.profile_rules = outcome.rules;
        self.observed_rules.clear();
        self.save_observed();
        self.soft_reset();
        true
    }

    fn handle_save(&mut self, conn: &mut Connection) -> Result<(), ipc::IpcError> {
        let profile_text = rules_to_text(&self.profile_rules);
        let observed_text = rules_to_text(&self.observed_rules);

        let body = if profile_text.is_empty() && observed_text.is_empty() {
            "# No rules defined.\n".to_string()
        } else {
            let mut body = String::new();
            if !profile_text.is_empty() {
                body.push_str("# Profile rules:\n");
                body.push_str(&profile_text);
            }
            if !observed_text.is_empty() {
                body.push_str("# Observed rules:\n");
                body.push_str(&observed_text);
            }
            body
        };

        conn.send_file(&mut Cursor::new(body.into_bytes()))
    }

    fn handle_status(&mut self, conn: &mut Connection) -> Result<(), ipc::IpcError> {
        let report = format!(
            "Daemon is running.\n{} profile rule(s), {} observed rule(s).\n{} active port(s), {} active connection(s).\n",
            self.profile_rules.len(),
            self.observed_rules.len(),
            self.active_port_count(),
            self.active_connection_count(),
        );
        conn.send_file(&mut Cursor::new(report.into_bytes()))
    }
}
