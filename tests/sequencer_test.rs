// Phase boundary and restart behavior of the flight-phase sequencer.

use crazyflie_autopilot::sequencer::{FlightPlan, Phase, Sequencer};

fn long_plan() -> FlightPlan {
    FlightPlan {
        pre_takeoff_time: 6.0,
        takeoff_time: 2.0,
        hover_time: 30.0,
        land_time: 8.0,
        repeat_delay: 5.0,
    }
}

#[test]
fn phase_boundaries_follow_cumulative_durations() {
    let mut seq = Sequencer::new(long_plan());

    seq.tick(0.0);
    assert_eq!(seq.phase(), Phase::PreTakeoff);
    seq.tick(5.9);
    assert_eq!(seq.phase(), Phase::PreTakeoff);
    seq.tick(6.1);
    assert_eq!(seq.phase(), Phase::Takeoff);
    seq.tick(8.1);
    assert_eq!(seq.phase(), Phase::Hover);
    seq.tick(38.1);
    assert_eq!(seq.phase(), Phase::Land);

    // Past the end of the land phase the cycle completes: this tick already
    // emits the idle output and the timer restarts behind the ground gap.
    let out = seq.tick(46.1);
    assert_eq!(seq.phase(), Phase::Idle);
    assert_eq!(out, Phase::Idle.output());
    assert_eq!(seq.elapsed(), -5.0);
}

#[test]
fn cycle_restarts_after_the_idle_gap() {
    let mut seq = Sequencer::new(long_plan());

    seq.tick(0.0);
    seq.tick(47.0);
    assert_eq!(seq.elapsed(), -5.0);
    assert_eq!(seq.phase(), Phase::Idle);

    let out = seq.tick(49.0);
    assert_eq!(seq.phase(), Phase::Idle);
    assert!(!out.alt_hold);
    assert_eq!(out.thrust, 0.0);

    seq.tick(52.5);
    assert_eq!(seq.phase(), Phase::PreTakeoff);
    seq.tick(59.0);
    assert_eq!(seq.phase(), Phase::Takeoff);
}

#[test]
fn phase_is_independent_of_tick_granularity() {
    let plan = long_plan();
    let probes = [0.0, 3.0, 6.5, 7.9, 20.0, 37.9, 40.0, 45.9];

    for &t in probes.iter() {
        let mut direct = Sequencer::new(plan);
        direct.tick(0.0);
        direct.tick(t);

        let mut stepped = Sequencer::new(plan);
        let mut now = 0.0;
        while now < t {
            stepped.tick(now);
            now += 0.01;
        }
        stepped.tick(t);

        assert_eq!(direct.phase(), stepped.phase(), "at t={}", t);
    }
}

#[test]
fn reset_replays_an_identical_cycle() {
    let mut seq = Sequencer::new(long_plan());

    let first: Vec<_> = (0..92).map(|i| seq.tick(i as f64 * 0.5)).collect();

    // A fresh cycle against a completely different clock origin.
    seq.reset();
    let second: Vec<_> = (0..92).map(|i| seq.tick(1000.0 + i as f64 * 0.5)).collect();

    assert_eq!(first, second);
}

#[test]
fn zero_duration_phases_are_skipped() {
    let plan = FlightPlan {
        pre_takeoff_time: 0.0,
        takeoff_time: 0.0,
        hover_time: 10.0,
        land_time: 0.0,
        repeat_delay: 1.0,
    };
    let mut seq = Sequencer::new(plan);

    seq.tick(0.0);
    assert_eq!(seq.phase(), Phase::Hover);
    seq.tick(10.5);
    assert_eq!(seq.phase(), Phase::Idle);
    assert_eq!(seq.elapsed(), -1.0);
}

#[test]
fn a_decreasing_clock_shifts_the_timer_without_panicking() {
    let mut seq = Sequencer::new(long_plan());

    seq.tick(0.0);
    seq.tick(7.0);
    assert_eq!(seq.phase(), Phase::Takeoff);

    // Not guarded: the negative delta just rewinds the timer.
    seq.tick(3.0);
    assert_eq!(seq.elapsed(), 3.0);
    assert_eq!(seq.phase(), Phase::PreTakeoff);
}

#[test]
fn outputs_are_fixed_per_phase() {
    let takeoff = Phase::Takeoff.output();
    assert_eq!(takeoff.thrust, 1.0);
    assert!(takeoff.alt_hold);
    assert!(takeoff.alt_offset > 0.0);

    let hover = Phase::Hover.output();
    assert_eq!(hover.thrust, 0.0);
    assert_eq!(hover.yaw, 0.5);
    assert!(hover.alt_hold);

    let land = Phase::Land.output();
    assert_eq!(land.thrust, -1.0);
    assert!(land.alt_hold);
    assert!(land.alt_offset < 0.0);

    // Idle and pre-takeoff both keep the motors off.
    let idle = Phase::Idle.output();
    assert_eq!(idle.thrust, 0.0);
    assert!(!idle.alt_hold);
    assert_eq!(Phase::PreTakeoff.output(), idle);
}

#[test]
fn the_first_tick_after_creation_has_a_zero_delta() {
    let mut seq = Sequencer::new(long_plan());

    // Whatever the clock origin, a fresh sequencer starts at elapsed zero.
    seq.tick(123456.0);
    assert_eq!(seq.elapsed(), 0.0);
    assert_eq!(seq.phase(), Phase::PreTakeoff);
}
