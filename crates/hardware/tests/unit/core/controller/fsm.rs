//! Next-State Function Tests.
//!
//! One case per row of the transition table, evaluated on the pure function
//! with hand-built signals.

use cachesim_core::core::controller::RequestKind;
use cachesim_core::core::controller::fsm::{ControllerState, Signals, next_state};
use cachesim_core::core::units::cache::Lookup;
use rstest::rstest;

use ControllerState::{Fetch, Fill, Idle, Lookup as LookupState, WriteBack};

const HIT: Lookup = Lookup {
    hit_way: Some(1),
    replacement_way: 0,
};
const MISS: Lookup = Lookup {
    hit_way: None,
    replacement_way: 2,
};

fn signals(request: Option<RequestKind>, lookup: Option<Lookup>, write_back: bool) -> Signals {
    Signals {
        request,
        lookup,
        write_back_needed: write_back,
    }
}

#[rstest]
#[case::idle_no_request(Idle, signals(None, None, false), Idle)]
#[case::idle_read(Idle, signals(Some(RequestKind::Read), None, false), LookupState)]
#[case::idle_write(Idle, signals(Some(RequestKind::Write), None, false), LookupState)]
#[case::lookup_read_hit(LookupState, signals(Some(RequestKind::Read), Some(HIT), false), Idle)]
#[case::lookup_write_hit(LookupState, signals(Some(RequestKind::Write), Some(HIT), false), Idle)]
#[case::lookup_dirty_read_miss(LookupState, signals(Some(RequestKind::Read), Some(MISS), true), WriteBack)]
#[case::lookup_dirty_write_miss(LookupState, signals(Some(RequestKind::Write), Some(MISS), true), WriteBack)]
#[case::lookup_clean_read_miss(LookupState, signals(Some(RequestKind::Read), Some(MISS), false), Fetch)]
#[case::lookup_clean_write_miss(LookupState, signals(Some(RequestKind::Write), Some(MISS), false), Fill)]
#[case::writeback_read(WriteBack, signals(Some(RequestKind::Read), None, false), Fetch)]
#[case::writeback_write(WriteBack, signals(Some(RequestKind::Write), None, false), Fill)]
#[case::fetch(Fetch, signals(Some(RequestKind::Read), None, false), Fill)]
#[case::fill_read(Fill, signals(Some(RequestKind::Read), None, false), Idle)]
#[case::fill_write(Fill, signals(Some(RequestKind::Write), None, false), Idle)]
fn transition_table(
    #[case] from: ControllerState,
    #[case] sig: Signals,
    #[case] to: ControllerState,
) {
    assert_eq!(next_state(from, &sig), to);
}

#[test]
fn hit_wins_over_write_back_flag() {
    let sig = signals(Some(RequestKind::Read), Some(HIT), true);
    assert_eq!(next_state(LookupState, &sig), Idle);
}

#[test]
fn signal_helpers() {
    assert!(signals(None, Some(HIT), false).hit());
    assert!(!signals(None, Some(MISS), false).hit());
    assert!(!signals(None, None, false).hit());
    assert!(signals(Some(RequestKind::Write), None, false).is_write());
    assert!(!signals(Some(RequestKind::Read), None, false).is_write());
}

#[test]
fn state_names() {
    let names: Vec<String> = [Idle, LookupState, WriteBack, Fetch, Fill]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, ["IDLE", "LOOKUP", "WRITEBACK", "FETCH", "FILL"]);
    assert_eq!(ControllerState::default(), Idle);
}
