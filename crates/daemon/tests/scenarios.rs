use daemon::Core;
use seq::{RawAddr, CAN_RECV, CAN_SEND, TYPE_HARDWARE};
use test_support::{FakeSequencer, ScratchPaths};

const CONTROLLER: i32 = 150;
const SYNTH: i32 = 200;

fn paths(scratch: &ScratchPaths) -> store::Paths {
    store::Paths {
        state_dir: scratch.state_dir().to_path_buf(),
        runtime_dir: scratch.runtime_dir().to_path_buf(),
    }
}

fn start_with_two_ports(scratch: &ScratchPaths) -> Core<FakeSequencer> {
    let mut seq = FakeSequencer::new();
    seq.add_port(CONTROLLER, 0, CAN_SEND | CAN_RECV, TYPE_HARDWARE, "Controller", "Controller:out");
    seq.add_port(SYNTH, 0, CAN_SEND | CAN_RECV, TYPE_HARDWARE, "Synthesizer", "Synthesizer:in");
    let mut core = Core::start(seq, paths(scratch)).expect("start daemon core");
    core.drain_seq_events();
    core
}

fn subscribe(core: &mut Core<FakeSequencer>) {
    core.handle_seq_event(seq::SeqEvent::PortSubscribed(seq::RawConnection {
        sender: RawAddr::new(CONTROLLER, 0),
        dest: RawAddr::new(SYNTH, 0),
    }));
}

fn unsubscribe(core: &mut Core<FakeSequencer>) {
    core.handle_seq_event(seq::SeqEvent::PortUnsubscribed(seq::RawConnection {
        sender: RawAddr::new(CONTROLLER, 0),
        dest: RawAddr::new(SYNTH, 0),
    }));
}

fn observed_render(core: &Core<FakeSequencer>) -> Vec<String> {
    core.observed_rules().iter().map(std::string::ToString::to_string).collect()
}

fn write_rules(scratch: &ScratchPaths, path: std::path::PathBuf, text: &str) {
    let _ = &scratch;
    store::write_file(&path, text).expect("seed rule file");
}

#[test]
fn scenario_1_plain_subscribe_is_recorded_as_observed() {
    let scratch = ScratchPaths::new();
    let mut core = start_with_two_ports(&scratch);
    subscribe(&mut core);
    let rendered = observed_render(&core);
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("Controller:out"));
    assert!(rendered[0].contains("Synthesizer:in"));
}

#[test]
fn scenario_2_profile_connect_rule_leaves_observed_empty() {
    let scratch = ScratchPaths::new();
    write_rules(&scratch, scratch.profile_path(), "Controller --> Synthesizer\n");
    let mut core = start_with_two_ports(&scratch);
    subscribe(&mut core);
    assert!(observed_render(&core).is_empty());
}

#[test]
fn scenario_3_profile_block_rule_still_records_observed_override() {
    let scratch = ScratchPaths::new();
    write_rules(&scratch, scratch.profile_path(), "Controller -x-> Synthesizer\n");
    let mut core = start_with_two_ports(&scratch);
    subscribe(&mut core);
    assert_eq!(observed_render(&core).len(), 1);
}

#[test]
fn scenario_4_plain_unsubscribe_of_untracked_connection_is_a_noop() {
    let scratch = ScratchPaths::new();
    let mut core = start_with_two_ports(&scratch);
    unsubscribe(&mut core);
    assert!(observed_render(&core).is_empty());
}

#[test]
fn scenario_5_unsubscribe_against_profile_connect_records_a_block() {
    let scratch = ScratchPaths::new();
    write_rules(&scratch, scratch.profile_path(), "Controller --> Synthesizer\n");
    let mut core = start_with_two_ports(&scratch);
    unsubscribe(&mut core);
    assert_eq!(core.observed_rules().len(), 1);
    assert!(core.observed_rules()[0].blocking);
}

#[test]
fn scenario_6_resubscribe_through_disallow_replaces_observed_with_connect() {
    let scratch = ScratchPaths::new();
    write_rules(&scratch, scratch.profile_path(), "Controller -x-> Synthesizer\n");
    write_rules(&scratch, scratch.observed_path(), "Controller:out -x-> Synthesizer:in\n");
    let mut core = start_with_two_ports(&scratch);
    subscribe(&mut core);
    assert_eq!(core.observed_rules().len(), 1);
    assert!(!core.observed_rules()[0].blocking);
}

#[test]
fn scenario_7_load_replaces_profile_and_clears_observed() {
    let scratch = ScratchPaths::new();
    let mut core = start_with_two_ports(&scratch);
    subscribe(&mut core);
    assert!(!core.observed_rules().is_empty());

    let new_profile = "Controller --> Synthesizer\n";
    assert!(core.load_profile(new_profile));

    assert_eq!(core.profile_rules().len(), 1);
    assert!(core.observed_rules().is_empty());
    assert_eq!(store::read_file_or_empty(&scratch.observed_path()).unwrap(), "");
}

#[test]
fn scenario_8_hard_reset_rebuilds_the_same_connection() {
    let scratch = ScratchPaths::new();
    write_rules(&scratch, scratch.profile_path(), "Controller --> Synthesizer\n");
    let mut core = start_with_two_ports(&scratch);
    assert_eq!(core.active_connection_count(), 1);
    let observed_before = core.observed_rules().to_vec();

    core.hard_reset();

    assert_eq!(core.active_connection_count(), 1);
    assert_eq!(core.observed_rules().to_vec(), observed_before);
}

#[test]
fn invariant_active_connections_reference_known_ports() {
    let scratch = ScratchPaths::new();
    write_rules(&scratch, scratch.profile_path(), "Controller --> Synthesizer\n");
    let core = start_with_two_ports(&scratch);
    assert_eq!(core.active_port_count(), 2);
    assert_eq!(core.active_connection_count(), 1);
}
