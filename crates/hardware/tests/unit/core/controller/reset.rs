//! Reset Tests.
//!
//! Reset returns the controller to IDLE from any state, clears the latched
//! registers, reinitializes the cache array and drops a pending write-back.

use crate::common::harness::{run_request, scenario_config, small_config};
use cachesim_core::config::WritePolicy;
use cachesim_core::core::controller::fsm::ControllerState;
use cachesim_core::core::controller::{CacheController, CacheInputs, Request, VictimCandidate};
use cachesim_core::core::units::cache::CacheLine;
use cachesim_core::soc::System;
use pretty_assertions::assert_eq;
use rstest::rstest;

type Snapshot = (
    ControllerState,
    Request,
    VictimCandidate,
    u64,
    Vec<CacheLine>,
    Vec<Vec<u32>>,
);

/// Captures everything reset is defined to restore.
fn snapshot(controller: &CacheController) -> Snapshot {
    let array = controller.array();
    let lines = (0..array.num_sets())
        .flat_map(|s| array.read_set(s).to_vec())
        .collect();
    let ages = (0..array.num_sets())
        .map(|s| array.ages(s).map(<[u32]>::to_vec).unwrap_or_default())
        .collect();
    (
        controller.state(),
        *controller.request(),
        *controller.victim(),
        controller.read_data(),
        lines,
        ages,
    )
}

fn busy_system() -> System {
    let mut system = System::new(&scenario_config(WritePolicy::WriteBack)).unwrap();
    for addr in [0x0003, 0x0043, 0x0083, 0x00C3, 0x0010] {
        run_request(&mut system, CacheInputs::write(addr, addr + 1));
    }
    system.store.poke(0x0007, 9);
    run_request(&mut system, CacheInputs::read(0x0007));
    system
}

#[test]
fn reset_restores_initial_state() {
    let mut system = busy_system();
    let out = system.tick(&CacheInputs::reset());
    assert!(out.ready);
    assert!(!out.done);
    assert_eq!(out.read_data, 0);

    let fresh = System::new(&scenario_config(WritePolicy::WriteBack)).unwrap();
    assert_eq!(snapshot(&system.controller), snapshot(&fresh.controller));
}

#[test]
fn reset_is_idempotent() {
    let mut once = busy_system();
    once.tick(&CacheInputs::reset());

    let mut twice = busy_system();
    twice.tick(&CacheInputs::reset());
    twice.tick(&CacheInputs::reset());

    assert_eq!(snapshot(&once.controller), snapshot(&twice.controller));
    assert_eq!(twice.controller.stats.resets, 2);
}

#[rstest]
#[case(1, ControllerState::Lookup)]
#[case(2, ControllerState::WriteBack)]
#[case(3, ControllerState::Fetch)]
#[case(4, ControllerState::Fill)]
fn reset_from_any_state_returns_to_idle(#[case] ticks: usize, #[case] state: ControllerState) {
    let mut system = busy_system();
    // 0x0103 misses on a full set whose LRU way (0x0003) is dirty.
    let mut inputs = CacheInputs::read(0x0103);
    for _ in 0..ticks {
        system.tick(&inputs);
        inputs = inputs.hold();
    }
    assert_eq!(system.controller.state(), state);

    system.tick(&CacheInputs::reset());
    assert_eq!(system.controller.state(), ControllerState::Idle);
    assert!(system.ready());
    assert!(system.controller.array().read_set(3).iter().all(|l| !l.valid));
}

#[test]
fn reset_drops_pending_writeback() {
    let mut system = busy_system();
    let mut inputs = CacheInputs::read(0x0103);
    for _ in 0..2 {
        system.tick(&inputs);
        inputs = inputs.hold();
    }
    assert_eq!(system.controller.state(), ControllerState::WriteBack);
    assert!(system.controller.victim().dirty);

    system.tick(&CacheInputs::reset());
    assert_eq!(system.store.peek(0x0003), 0, "flush lost");
    assert_eq!(system.controller.stats.writebacks, 0);
}

#[test]
fn reset_wins_over_presented_request() {
    let mut system = System::new(&small_config(WritePolicy::WriteThrough)).unwrap();
    let inputs = CacheInputs {
        reset: true,
        ..CacheInputs::read(0x01)
    };
    system.tick(&inputs);
    assert_eq!(system.controller.state(), ControllerState::Idle);
    assert_eq!(system.controller.stats.requests, 0);
}
