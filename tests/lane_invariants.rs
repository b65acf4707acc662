use lane_crossing::config::{BoardConfig, TrafficConfig};
use lane_crossing::simulation::{Board, LaneGrid, TrafficScheduler};
use proptest::prelude::*;

fn traffic_config(seed: u64, lower: f32, spread: f32, interval: f64, variance: f64) -> TrafficConfig {
    let mut config = TrafficConfig::default();
    config.random.seed = Some(seed);
    config.speeds.lower = lower;
    config.speeds.upper = lower + spread;
    config.spawn.mean_interval = interval;
    config.spawn.variance = variance;
    config
}

/// Within a lane every actor reaches every column, and leaves every column up
/// to the first off-board one, strictly after the one ahead of it.
fn assert_lanes_fifo(traffic: &TrafficScheduler, columns: usize) -> Result<(), TestCaseError> {
    for lane in traffic.active_lanes() {
        let records: Vec<_> = traffic.lane_records(lane).collect();
        for pair in records.windows(2) {
            let (ahead, behind) = (&pair[0].timeline, &pair[1].timeline);
            for column in 0..columns + 2 {
                prop_assert!(
                    behind.entry[column] > ahead.entry[column],
                    "lane {} column {}: entry {} not after {}",
                    lane.0, column, behind.entry[column], ahead.entry[column]
                );
            }
            for column in 0..=columns {
                prop_assert!(
                    behind.exit[column] > ahead.exit[column],
                    "lane {} column {}: exit {} not after {}",
                    lane.0, column, behind.exit[column], ahead.exit[column]
                );
            }
        }
    }
    Ok(())
}

fn assert_retirements_ordered(traffic: &TrafficScheduler) -> Result<(), TestCaseError> {
    let times: Vec<f64> = traffic.global_retire_times().collect();
    prop_assert!(times.windows(2).all(|pair| pair[0] <= pair[1]), "retire times out of order: {:?}", times);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lanes_stay_fifo_under_random_traffic(
        seed in any::<u64>(),
        lower in 50.0f32..400.0,
        spread in 0.0f32..400.0,
        interval in 0.05f64..1.0,
        variance in 0.0f64..=1.0,
        halt_at in proptest::option::of(0usize..600),
        halt_ticks in 1usize..120,
    ) {
        let board = Board::new(&BoardConfig::default());
        let config = traffic_config(seed, lower, spread, interval, variance);
        let mut traffic = TrafficScheduler::new(&config, &board);

        let dt = 1.0 / 60.0;
        let mut now = 0.0;
        let mut halted = 0;

        for frame in 0..900 {
            now += dt;
            if halt_at == Some(frame) {
                traffic.halt(true);
            }
            if !traffic.is_running() {
                halted += 1;
                if halted > halt_ticks {
                    traffic.resume();
                }
            }

            traffic.tick(dt, now, &board, &mut ());

            assert_lanes_fifo(&traffic, board.column_count())?;
            assert_retirements_ordered(&traffic)?;
            if traffic.is_running() {
                prop_assert!(traffic.global_retire_times().all(|time| time > now));
            }
        }

        let lane_total: usize = traffic.active_lanes().map(|lane| traffic.lane_records(lane).count()).sum();
        prop_assert_eq!(lane_total, traffic.active_count());

        let stats = traffic.stats();
        prop_assert_eq!(stats.spawned - stats.retired, traffic.active_count() as u64);
    }
}
