use std::time::Duration;

use seq::{SeqEvent, SequencerApi};

use crate::state::{conn_key, Core};

/// Grace period after observing a kernel-assigned default client name,
/// giving well-behaved clients time to rename themselves before their
/// ports are matched against rules keyed on the final name.
const CLIENT_RENAME_GRACE: Duration = Duration::from_millis(100);

fn is_default_client_name(name: &str) -> bool {
    name.strip_prefix("Client-")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

impl<S: SequencerApi> Core<S> {
    /// Dispatches one announcement event from the sequencer gateway.
    pub fn handle_seq_event(&mut self, event: SeqEvent) {
        match event {
            SeqEvent::ClientStart(client) => {
                let name = self.seq.client_name(client);
                if is_default_client_name(&name) {
                    std::thread::sleep(CLIENT_RENAME_GRACE);
                }
                // Falls through to `ClientExit`'s no-op, matching the
                // upstream behavior this design makes explicit.
            }
            SeqEvent::ClientExit(_) | SeqEvent::ClientChange(_) | SeqEvent::PortChange(_) => {}
            SeqEvent::PortStart(addr) => self.add_port(addr, false),
            SeqEvent::PortExit(addr) => self.del_port(addr),
            SeqEvent::PortSubscribed(conn) => {
                if !self.expected_connects.remove(&conn_key(conn)) {
                    self.add_connection(conn);
                }
            }
            SeqEvent::PortUnsubscribed(conn) => {
                if !self.expected_disconnects.remove(&conn_key(conn)) {
                    self.del_connection(conn);
                }
            }
        }
    }

    /// Drains every pending sequencer event, in order, before returning.
    pub fn drain_seq_events(&mut self) {
        while let Some(event) = self.seq.event_input() {
            self.handle_seq_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_kernel_default_names() {
        assert!(is_default_client_name("Client-129"));
        assert!(!is_default_client_name("Client-"));
        assert!(!is_default_client_name("My Synth"));
        assert!(!is_default_client_name("Client-12a"));
    }
}
