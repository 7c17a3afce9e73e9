//! Write Policy Tests.
//!
//! Write-through propagation, write-back deferral and flush of the victim
//! snapshot, and the read-after-write round trip under both policies.

use std::collections::HashMap;

use crate::common::harness::{run_request, scenario_config, small_config};
use crate::common::mocks::store::MockStore;
use cachesim_core::config::{Config, WritePolicy};
use cachesim_core::core::controller::CacheInputs;
use cachesim_core::core::controller::fsm::ControllerState;
use cachesim_core::sim::Simulator;
use cachesim_core::soc::System;
use cachesim_core::soc::memory::StoreCommand;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn write_back_hit_and_fill_never_touch_store() {
    // Only idle ticks and the fetches for reads are expected.
    let mut store = MockStore::quiet(0);
    store
        .expect_apply()
        .withf(|c| matches!(c, StoreCommand::Read { .. }))
        .return_const(());
    let mut system =
        System::with_store(&scenario_config(WritePolicy::WriteBack), Box::new(store)).unwrap();

    run_request(&mut system, CacheInputs::write(0x0010, 1));
    run_request(&mut system, CacheInputs::write(0x0010, 2));
    run_request(&mut system, CacheInputs::read(0x0011));

    let line = system.controller.array().read_set(0x10)[0];
    assert!(line.dirty);
    assert_eq!(line.data, 2);
    assert_eq!(system.controller.stats.store_writes, 0);
}

#[test]
fn dirty_eviction_flushes_exactly_once_with_last_data() {
    let mut store = MockStore::quiet(0);
    store
        .expect_apply()
        .withf(|c| matches!(c, StoreCommand::Read { .. }))
        .return_const(());
    store
        .expect_apply()
        .withf(|c| {
            *c == StoreCommand::Write {
                address: 0x0003,
                data: 0xBBBB,
            }
        })
        .times(1)
        .return_const(());
    let mut system =
        System::with_store(&scenario_config(WritePolicy::WriteBack), Box::new(store)).unwrap();

    run_request(&mut system, CacheInputs::write(0x0003, 0xAAAA));
    run_request(&mut system, CacheInputs::write(0x0003, 0xBBBB));
    for addr in [0x0043, 0x0083, 0x00C3] {
        run_request(&mut system, CacheInputs::read(addr));
    }

    let (_, cycles) = run_request(&mut system, CacheInputs::read(0x0103));
    assert_eq!(cycles, 5, "IDLE, LOOKUP, WRITEBACK, FETCH, FILL");
    assert_eq!(system.controller.stats.writebacks, 1);
    assert_eq!(system.controller.stats.evictions, 1);
    assert!(!system.controller.array().read_set(3)[0].dirty);
}

#[test]
fn clean_eviction_skips_writeback() {
    let mut system = System::new(&small_config(WritePolicy::WriteBack)).unwrap();
    // Set 1 of the 2-way cache: 0x01, 0x05, then 0x09 evicts the clean 0x01.
    for addr in [0x01, 0x05, 0x09] {
        let (_, cycles) = run_request(&mut system, CacheInputs::read(addr));
        assert_eq!(cycles, 4);
    }
    assert_eq!(system.controller.stats.evictions, 1);
    assert_eq!(system.controller.stats.writebacks, 0);
}

#[test]
fn dirty_write_miss_goes_writeback_then_fill() {
    let mut system = System::new(&small_config(WritePolicy::WriteBack)).unwrap();
    run_request(&mut system, CacheInputs::write(0x02, 0x11));
    run_request(&mut system, CacheInputs::write(0x06, 0x22));

    let mut states = Vec::new();
    let mut inputs = CacheInputs::write(0x0A, 0x33);
    loop {
        let out = system.tick(&inputs);
        inputs = inputs.hold();
        states.push(system.controller.state());
        if out.done {
            break;
        }
    }
    assert_eq!(
        states,
        [
            ControllerState::Lookup,
            ControllerState::WriteBack,
            ControllerState::Fill,
            ControllerState::Idle,
        ]
    );
    assert_eq!(system.store.peek(0x02), 0x11);
    assert_eq!(system.store.peek(0x0A), 0);
}

#[test]
fn writeback_uses_snapshot_after_line_is_refilled() {
    // The victim line is overwritten by FILL; the flush must already carry
    // the snapshotted tag and data.
    let mut system = System::new(&small_config(WritePolicy::WriteBack)).unwrap();
    run_request(&mut system, CacheInputs::write(0x03, 0x0A0A));
    run_request(&mut system, CacheInputs::write(0x07, 0x0B0B));
    run_request(&mut system, CacheInputs::read(0x0B));
    assert_eq!(system.store.peek(0x03), 0x0A0A);
    assert_eq!(system.controller.victim().tag, 0);
    assert_eq!(system.controller.victim().data, 0x0A0A);
}

#[test]
fn writeback_targets_line_aligned_address() {
    // 2 offset bits: the line for 0x0D is rebuilt as 0x0C.
    let mut config = small_config(WritePolicy::WriteBack);
    config.cache.num_sets = 2;
    config.cache.offset_width = 2;
    config.cache.tag_width = 5;
    config.cache.num_ways = 1;
    let mut system = System::new(&config).unwrap();

    run_request(&mut system, CacheInputs::write(0x0D, 0x77));
    // 0x2D maps to the same set with a different tag.
    run_request(&mut system, CacheInputs::read(0x2D));
    assert_eq!(system.store.peek(0x0C), 0x77);
    assert_eq!(system.store.peek(0x0D), 0);
}

fn roundtrip_config(write_back: bool) -> Config {
    small_config(if write_back {
        WritePolicy::WriteBack
    } else {
        WritePolicy::WriteThrough
    })
}

#[derive(Clone, Debug)]
enum Op {
    Read(u64),
    Write(u64, u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..32).prop_map(Op::Read),
        (0u64..32, 0u64..=0xFFFF).prop_map(|(a, d)| Op::Write(a, d)),
    ]
}

proptest! {
    /// Every read returns the last value written to its address (or the
    /// initial zero), under both policies and any eviction pattern.
    #[test]
    fn reads_return_last_write(write_back in any::<bool>(), ops in proptest::collection::vec(op(), 1..64)) {
        let mut sim = Simulator::new(&roundtrip_config(write_back)).unwrap();
        let mut model: HashMap<u64, u64> = HashMap::new();
        for op in ops {
            match op {
                Op::Write(addr, data) => {
                    sim.write(addr, data).unwrap();
                    model.insert(addr, data);
                }
                Op::Read(addr) => {
                    let done = sim.read(addr).unwrap();
                    prop_assert_eq!(done.read_data, Some(model.get(&addr).copied().unwrap_or(0)));
                }
            }
        }
    }

    /// Under write-through the backing store always mirrors every write.
    #[test]
    fn write_through_store_mirrors_writes(ops in proptest::collection::vec((0u64..32, 0u64..=0xFFFF), 1..32)) {
        let mut sim = Simulator::new(&roundtrip_config(false)).unwrap();
        for (addr, data) in ops {
            sim.write(addr, data).unwrap();
            prop_assert_eq!(sim.peek(addr), data);
        }
    }
}
