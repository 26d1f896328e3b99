//! Scenario tests for two instruments on one block.
//!
//! # Oracle Pattern
//!
//! Each scenario drives both panels through the bus and ends with an oracle
//! check: the standard invariants on the final snapshot, plus the specific
//! states and lamps the scenario is about.

use std::time::Duration;

use blockline_core::{BlockState, Lamp, NodeConfig, Switch};
use blockline_harness::{InstrumentPair, InvariantRegistry, Side};
use blockline_proto::{AccessoryEvent, Polarity};

fn oracle(pair: &InstrumentPair, context: &str) {
    InvariantRegistry::standard().assert_all(&pair.snapshot(), context);
}

fn states(pair: &InstrumentPair, side: Side) -> (BlockState, BlockState) {
    let instrument = pair.instrument(side);
    (instrument.local_state(), instrument.remote_state())
}

#[test]
fn full_cycle_from_a_to_b() {
    let mut pair = InstrumentPair::new();
    let initial = *pair.rendered(Side::B);

    pair.operate(Side::A, Switch::LineClear);
    pair.settle();
    assert_eq!(states(&pair, Side::A).0, BlockState::LineClear);
    assert_eq!(states(&pair, Side::B).1, BlockState::LineClear);
    assert_eq!(pair.rendered(Side::B).remote.line_clear, Lamp::On);
    assert_eq!(pair.rendered(Side::A).local.line_clear, Lamp::On);

    pair.operate(Side::A, Switch::TrainOnTrack);
    pair.settle();
    assert_eq!(states(&pair, Side::B).1, BlockState::TrainOnTrack);
    assert_eq!(pair.rendered(Side::B).occupied, Lamp::On);

    pair.operate(Side::A, Switch::Normal);
    pair.settle();
    assert_eq!(states(&pair, Side::A), (BlockState::Normal, BlockState::Normal));
    assert_eq!(states(&pair, Side::B), (BlockState::Normal, BlockState::Normal));
    assert_eq!(*pair.rendered(Side::B), initial);

    oracle(&pair, "after full cycle");
}

#[test]
fn both_directions_are_independent() {
    let mut pair = InstrumentPair::new();

    pair.operate(Side::A, Switch::LineClear);
    pair.operate(Side::B, Switch::LineClear);
    pair.settle();

    pair.operate(Side::B, Switch::TrainOnTrack);
    pair.settle();

    assert_eq!(states(&pair, Side::A), (BlockState::LineClear, BlockState::TrainOnTrack));
    assert_eq!(states(&pair, Side::B), (BlockState::TrainOnTrack, BlockState::LineClear));
    oracle(&pair, "after crossing requests");
}

#[test]
fn locked_lever_refuses_then_unblocks() {
    let mut pair = InstrumentPair::new();

    pair.set_lever(Side::B, true);
    pair.operate(Side::A, Switch::LineClear);
    pair.settle();

    assert_eq!(states(&pair, Side::B).1, BlockState::LCBlocked);
    assert_eq!(states(&pair, Side::A).0, BlockState::LCBlocked);
    let b = pair.rendered(Side::B);
    assert_eq!(b.warning, Lamp::On);
    assert_eq!(b.remote.line_clear, Lamp::Blink);
    assert!(b.buzzer);
    oracle(&pair, "while blocked");

    // Switches do nothing while blocked
    pair.operate(Side::A, Switch::LineClear);
    pair.operate(Side::A, Switch::Normal);
    assert!(pair.bus().is_idle());

    pair.set_lever(Side::B, false);
    pair.settle();
    assert_eq!(states(&pair, Side::B).1, BlockState::LineClear);
    assert_eq!(states(&pair, Side::A).0, BlockState::LineClear);
    assert!(!pair.rendered(Side::B).buzzer);
    oracle(&pair, "after unblock");
}

#[test]
fn relocking_keeps_the_block_refused() {
    let mut pair = InstrumentPair::new();
    pair.set_lever(Side::B, true);
    pair.operate(Side::A, Switch::LineClear);
    pair.settle();

    pair.set_lever(Side::B, true);
    pair.settle();
    assert_eq!(states(&pair, Side::B).1, BlockState::LCBlocked);
    oracle(&pair, "after relock");
}

#[test]
fn lever_after_grant_does_not_revoke() {
    let mut pair = InstrumentPair::new();
    pair.operate(Side::A, Switch::LineClear);
    pair.settle();

    pair.set_lever(Side::B, true);
    pair.settle();
    assert_eq!(states(&pair, Side::B).1, BlockState::LineClear);
    assert!(!pair.instrument(Side::B).gate_released());
    oracle(&pair, "lever after grant");
}

#[test]
fn bell_rings_at_the_far_end_while_held() {
    let mut pair = InstrumentPair::new();

    pair.press(Side::A, Switch::Bell);
    pair.settle();
    assert!(pair.rendered(Side::B).bell);
    assert!(!pair.rendered(Side::A).bell);

    pair.release(Side::A, Switch::Bell);
    pair.settle();
    assert!(!pair.rendered(Side::B).bell);
    oracle(&pair, "after bell");
}

#[test]
fn lost_request_goes_stale_and_recovers_on_retry() {
    let mut pair = InstrumentPair::new();

    pair.operate(Side::A, Switch::LineClear);
    assert!(pair.bus().pending().count() >= 1);
    while !pair.bus().is_idle() {
        pair.apply(&blockline_harness::Operation::DropNext);
    }

    pair.advance(Duration::from_secs(5));
    assert!(!pair.instrument(Side::A).watchdog().is_stale());
    pair.advance(Duration::from_secs(6));
    assert!(pair.instrument(Side::A).watchdog().is_stale());
    assert_eq!(pair.rendered(Side::A).module, Lamp::Blink);
    assert_eq!(states(&pair, Side::A).0, BlockState::Normal);

    // The signaller tries again
    pair.operate(Side::A, Switch::LineClear);
    pair.settle();
    assert_eq!(states(&pair, Side::A).0, BlockState::LineClear);
    assert_eq!(pair.rendered(Side::A).module, Lamp::Off);
}

#[test]
fn strangers_on_the_bus_change_nothing() {
    let mut pair = InstrumentPair::new();
    let before = pair.snapshot();

    for event_number in 0..12 {
        let event = AccessoryEvent::long(999, event_number, Polarity::Asserted);
        pair.inject(event.to_frame(77).unwrap());
    }
    pair.settle();

    let after = pair.snapshot();
    assert_eq!(after.sides, before.sides);
}

#[test]
fn consuming_own_events_changes_nothing_untaught() {
    let [mut a, b] = blockline_harness::standard_configs();
    a.consume_own_events = true;
    let mut pair = InstrumentPair::from_configs(&a, &b).unwrap();

    pair.operate(Side::A, Switch::LineClear);
    pair.settle();

    assert_eq!(states(&pair, Side::A).0, BlockState::LineClear);
    oracle(&pair, "with own events consumed");
}

#[test]
fn configs_from_toml_pair_up() {
    let a = NodeConfig::from_toml(
        r#"
        node_number = 300
        can_id = 30
        request_timeout_ms = 0

        [[events]]
        node_number = 301
        event_number = 0
        variable = 9

        [[events]]
        node_number = 301
        event_number = 1
        variable = 6

        [[events]]
        node_number = 301
        event_number = 4
        variable = 4

        [[events]]
        node_number = 301
        event_number = 6
        variable = 1
        "#,
    )
    .unwrap();
    let mut b = NodeConfig::new(301, 31);
    b.teach_peer(300);
    b.teach_commutator(400, 7);

    let mut pair = InstrumentPair::from_configs(&a, &b).unwrap();
    pair.operate(Side::A, Switch::LineClear);
    pair.settle();

    assert_eq!(states(&pair, Side::A).0, BlockState::LineClear);
    assert!(pair.instrument(Side::A).watchdog().timeout().is_none());
}
