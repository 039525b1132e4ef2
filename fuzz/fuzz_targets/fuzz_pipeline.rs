#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

use domain::common::clock::ManualClock;
use domain::common::entity::Verdict;
use domain::exclusion::ExclusionTables;
use domain::pipeline::{FilterSettings, ShardPipeline};

// Feed arbitrary frames through one shard: must never panic, and a frame
// that passes or aborts must come back byte-identical.
//
// Layout:
//   [0..8] = clock value (keeps frame rollover reachable)
//   [8]    = rate limit (0 is clamped to 1)
//   rest   = the frame
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }

    let mut now = [0u8; 8];
    now.copy_from_slice(&data[..8]);
    let now = u64::from_le_bytes(now).max(1);
    let rate_limit = u64::from(data[8]).max(1);

    let settings = FilterSettings {
        rate_limit,
        shard_count: 1,
        ..Default::default()
    };
    let mut tables = ExclusionTables::default();
    tables.v4.insert([192, 0, 2, 0], 24).unwrap();
    let mut pipeline = ShardPipeline::with_clock(
        0,
        &settings,
        Arc::new(tables),
        ManualClock::starting_at(now),
    )
    .unwrap();

    let mut frame = data[9..].to_vec();
    let original = frame.clone();
    // Run the same frame twice so the bounce path is reachable even with
    // a threshold of 1.
    for _ in 0..2 {
        frame.copy_from_slice(&original);
        match pipeline.process(&mut frame) {
            Verdict::Pass | Verdict::Abort => assert_eq!(frame, original),
            Verdict::Transmit => assert_eq!(frame.len(), original.len()),
        }
    }
});
