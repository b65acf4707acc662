mod common;

use anyhow::Result;
use common::{approx, fixed_speed_traffic, one_lane_board, Recorder};
use lane_crossing::simulation::{Board, Cell, CollisionForecast, LaneId, SpawnOutcome, TrafficScheduler};

const ROAD: LaneId = LaneId(1);

fn scheduler() -> (Board, TrafficScheduler) {
    let board = Board::new(&one_lane_board());
    let traffic = TrafficScheduler::new(&fixed_speed_traffic(), &board);
    (board, traffic)
}

#[test]
fn empty_lane_is_clear() {
    let (_board, mut traffic) = scheduler();

    assert_eq!(traffic.predict_collision(Some(2), ROAD, 0.0), CollisionForecast::Clear);
    // Grass rows never get a bucket
    assert_eq!(traffic.predict_collision(Some(0), LaneId(0), 0.0), CollisionForecast::Clear);
}

#[test]
fn single_actor_timeline() -> Result<()> {
    let (board, mut traffic) = scheduler();
    let spawned_at = 50.0;

    let summary = traffic.tick(1.0 / 60.0, spawned_at, &board, &mut ());
    assert_eq!(summary.spawn, Some(SpawnOutcome::Admitted { lane: ROAD, attempts: 1 }));

    let record = traffic.lane_records(ROAD).next().ok_or_else(|| anyhow::anyhow!("no actor"))?;
    let entry = record.timeline.entry[0];
    let exit = record.timeline.exit[0];
    assert!(approx(entry, spawned_at + 0.35));
    assert!(approx(exit, spawned_at + 2.02 - 0.65));

    // Before it arrives the oracle names the arrival time
    for now in [spawned_at, spawned_at + 0.2, entry - 1e-6] {
        assert_eq!(traffic.predict_collision(Some(0), ROAD, now), CollisionForecast::FutureCollisionAt(entry));
    }

    // While it overlaps the column the player is hit immediately
    for now in [entry, (entry + exit) / 2.0, exit - 1e-6] {
        assert_eq!(traffic.predict_collision(Some(0), ROAD, now), CollisionForecast::ImmediateCollision);
    }

    // Once it has left nothing else is coming
    assert_eq!(traffic.predict_collision(Some(0), ROAD, exit), CollisionForecast::Clear);

    // Further right it arrives later
    match traffic.predict_collision(Some(4), ROAD, spawned_at) {
        CollisionForecast::FutureCollisionAt(time) => assert!(approx(time, spawned_at + 4.04 + 0.35)),
        other => panic!("expected a future collision, got {:?}", other),
    }
    Ok(())
}

#[test]
fn oldest_unfinished_actor_answers() -> Result<()> {
    let (board, mut traffic) = scheduler();

    traffic.tick(0.01, 0.0, &board, &mut ());
    traffic.set_spawn_cadence(0.001, 0.0);
    let summary = traffic.tick(0.01, 1.5, &board, &mut ());
    assert_eq!(summary.spawn, Some(SpawnOutcome::Admitted { lane: ROAD, attempts: 1 }));

    let records: Vec<_> = traffic.lane_records(ROAD).collect();
    assert_eq!(records.len(), 2);
    let (first, second) = (&records[0].timeline, &records[1].timeline);

    // Before the first actor leaves column 1 it is the one reported
    assert_eq!(
        traffic.peek_collision(1, ROAD, 0.0),
        CollisionForecast::FutureCollisionAt(first.entry[1])
    );
    // After it leaves, the follower is next
    assert_eq!(
        traffic.peek_collision(1, ROAD, first.exit[1]),
        CollisionForecast::FutureCollisionAt(second.entry[1])
    );
    Ok(())
}

#[test]
fn predict_records_pending_query_and_peek_does_not() {
    let (_board, mut traffic) = scheduler();

    traffic.peek_collision(3, ROAD, 0.0);
    assert_eq!(traffic.pending_query(), None);

    traffic.predict_collision(Some(3), ROAD, 0.0);
    assert_eq!(traffic.pending_query(), Some(Cell { column: 3, lane: ROAD }));

    assert_eq!(traffic.predict_collision(None, ROAD, 0.0), CollisionForecast::Clear);
    assert_eq!(traffic.pending_query(), None);
}

#[test]
fn new_actor_in_queried_lane_notifies_player() {
    let (board, mut traffic) = scheduler();
    let mut recorder = Recorder::default();

    assert_eq!(traffic.predict_collision(Some(3), ROAD, 10.0), CollisionForecast::Clear);
    traffic.tick(0.01, 10.0, &board, &mut recorder);

    assert_eq!(recorder.threats.len(), 1);
    assert!(approx(recorder.threats[0], 10.0 + 3.03 + 0.35));
}

#[test]
fn cleared_query_gets_no_notification() {
    let (board, mut traffic) = scheduler();
    let mut recorder = Recorder::default();

    traffic.predict_collision(Some(3), ROAD, 10.0);
    traffic.predict_collision(None, ROAD, 10.0);
    traffic.tick(0.01, 10.0, &board, &mut recorder);

    assert_eq!(traffic.active_count(), 1);
    assert!(recorder.threats.is_empty());
}

#[test]
#[should_panic(expected = "column 5")]
fn column_outside_board_fails_fast() {
    let (_board, mut traffic) = scheduler();
    traffic.predict_collision(Some(5), ROAD, 0.0);
}

#[test]
#[should_panic(expected = "lane 3")]
fn unknown_lane_fails_fast() {
    let (_board, mut traffic) = scheduler();
    traffic.predict_collision(Some(0), LaneId(3), 0.0);
}
