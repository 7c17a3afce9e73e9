//! Statistics Tests.
//!
//! Counter accounting across a mixed workload, derived rates and the
//! section-selective report.

use crate::common::harness::{run_request, small_config};
use cachesim_core::config::WritePolicy;
use cachesim_core::core::controller::CacheInputs;
use cachesim_core::soc::System;
use cachesim_core::stats::{CacheStats, STATS_SECTIONS};
use pretty_assertions::assert_eq;

#[test]
fn rates_are_zero_without_requests() {
    let stats = CacheStats::default();
    assert_eq!(stats.completed(), 0);
    assert!(stats.hit_rate().abs() < f64::EPSILON);
    assert!(stats.miss_rate().abs() < f64::EPSILON);
}

#[test]
fn rates_split_completed_requests() {
    let stats = CacheStats {
        hits: 3,
        misses: 1,
        ..CacheStats::default()
    };
    assert_eq!(stats.completed(), 4);
    assert!((stats.hit_rate() - 0.75).abs() < 1e-9);
    assert!((stats.miss_rate() - 0.25).abs() < 1e-9);
}

#[test]
fn counters_track_write_back_workload() {
    let mut system = System::new(&small_config(WritePolicy::WriteBack)).unwrap();
    // Set 0, 2 ways: two dirty fills, a hit, then a read evicting a dirty line.
    run_request(&mut system, CacheInputs::write(0x00, 1));
    run_request(&mut system, CacheInputs::write(0x04, 2));
    run_request(&mut system, CacheInputs::read(0x04));
    run_request(&mut system, CacheInputs::read(0x08));

    let stats = &system.controller.stats;
    assert_eq!(
        (stats.requests, stats.reads, stats.writes),
        (4, 2, 2)
    );
    assert_eq!((stats.hits, stats.misses), (1, 3));
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.writebacks, 1);
    assert_eq!(stats.fetches, 1);
    assert_eq!(stats.store_writes, 1);
    assert_eq!(stats.cycles, 3 + 3 + 2 + 5);
}

#[test]
fn write_through_counts_every_store_write() {
    let mut system = System::new(&small_config(WritePolicy::WriteThrough)).unwrap();
    run_request(&mut system, CacheInputs::write(0x00, 1));
    run_request(&mut system, CacheInputs::write(0x00, 2));
    run_request(&mut system, CacheInputs::write(0x04, 3));
    run_request(&mut system, CacheInputs::write(0x08, 4));
    let stats = &system.controller.stats;
    assert_eq!(stats.store_writes, 4);
    assert_eq!(stats.writebacks, 0);
    assert_eq!(stats.evictions, 1);
}

#[test]
fn report_includes_all_sections_by_default() {
    let stats = CacheStats {
        cycles: 10,
        requests: 2,
        hits: 1,
        misses: 1,
        ..CacheStats::default()
    };
    let text = stats.render_sections(&[]);
    assert!(text.contains("CACHE SIMULATION STATISTICS"));
    assert!(text.contains("REQUESTS"));
    assert!(text.contains("MEMORY"));
    assert!(text.contains("hit_rate                 0.5000"));
}

#[test]
fn report_honours_section_selection() {
    let stats = CacheStats::default();
    let text = stats.render_sections(&["memory".to_owned()]);
    assert!(text.contains("MEMORY"));
    assert!(!text.contains("REQUESTS"));
    assert!(!text.contains("CACHE SIMULATION STATISTICS"));
    assert_eq!(STATS_SECTIONS, ["summary", "requests", "memory"]);
}

#[test]
fn display_is_one_line() {
    let stats = CacheStats {
        hits: 2,
        ..CacheStats::default()
    };
    let text = stats.to_string();
    assert!(!text.contains('\n'));
    assert!(text.contains("hits=2"));
}
