//! Runtime tests against the simulation driver.
//!
//! Exercises the same run loop the node uses: run-to-completion per input,
//! the power-on render, own-event loopback, and driver error propagation.

use std::time::Duration;

use blockline_app::{Instrument, Runtime, SwitchEdge};
use blockline_core::{
    BlockState, Emission, IndicatorVector, Lamp, MemoryEventTable, NodeConfig, OutgoingEvent,
    Switch, project,
};
use blockline_harness::{SimDriver, SimInstant};
use blockline_proto::{AccessoryEvent, Polarity};

const PEER: u16 = 2;

fn config() -> NodeConfig {
    let mut config = NodeConfig::new(1, 1);
    config.teach_peer(PEER);
    config.teach_commutator(50, 1);
    config
}

fn runtime(config: &NodeConfig) -> Runtime<SimDriver, MemoryEventTable> {
    let instrument: Instrument<MemoryEventTable, SimInstant> =
        Instrument::from_config(config).unwrap();
    Runtime::new(SimDriver::new(), instrument)
        .with_consume_own_events(config.consume_own_events)
}

fn initial() -> IndicatorVector {
    project(BlockState::Normal, BlockState::Normal)
}

#[tokio::test]
async fn run_renders_power_on_indications_and_stops() {
    let mut runtime = runtime(&config());

    runtime.run().await.unwrap();

    assert_eq!(runtime.driver().renders(), &[initial()]);
    assert!(runtime.driver().is_stopped());
}

#[tokio::test]
async fn peer_request_is_answered_in_order() {
    let mut runtime = runtime(&config());
    let request = AccessoryEvent::long(PEER, OutgoingEvent::LineClear.event_number(), Polarity::Asserted);
    runtime.driver_mut().inject_frame(request.to_frame(2).unwrap());

    runtime.run().await.unwrap();

    let codec = *runtime.instrument().codec();
    assert_eq!(runtime.driver_mut().take_sent(), vec![
        codec.encode(Emission::off(OutgoingEvent::BlockClearedAck)).unwrap(),
        codec.encode(Emission::on(OutgoingEvent::LineClearAck)).unwrap(),
    ]);
    assert_eq!(runtime.instrument().remote_state(), BlockState::LineClear);
    let last = runtime.driver().last_render().unwrap();
    assert_eq!(last.remote.line_clear, Lamp::On);
}

#[tokio::test]
async fn step_processes_one_input_at_a_time() {
    let mut runtime = runtime(&config());
    runtime.driver_mut().inject_switch(SwitchEdge::press(Switch::LineClear));
    runtime.driver_mut().inject_switch(SwitchEdge::press(Switch::Bell));

    assert!(runtime.step().await.unwrap());
    assert_eq!(runtime.driver_mut().take_sent().len(), 2);
    assert!(runtime.driver().has_pending());

    assert!(runtime.step().await.unwrap());
    assert_eq!(runtime.driver_mut().take_sent().len(), 1);
    assert!(!runtime.step().await.unwrap());
}

#[tokio::test]
async fn watchdog_runs_on_driver_time() {
    let mut runtime = runtime(&config());
    let driver = runtime.driver_mut();
    driver.inject_switch(SwitchEdge::press(Switch::LineClear));
    driver.inject_advance(Duration::from_secs(9));
    driver.inject_tick();
    driver.inject_advance(Duration::from_secs(2));
    driver.inject_tick();

    runtime.run().await.unwrap();

    // Power-on, the press, then only the tick that went stale
    let renders = runtime.driver().renders();
    assert_eq!(renders.len(), 3);
    assert_eq!(renders[2].module, Lamp::Blink);
    assert_eq!(runtime.instrument().local_state(), BlockState::Normal);
}

#[tokio::test]
async fn own_events_loop_back_through_the_table() {
    let mut config = config();
    config.consume_own_events = true;
    // This node has learned its own bell push
    config.events.push(blockline_core::TaughtEvent {
        node_number: 1,
        event_number: OutgoingEvent::AttentionBell.event_number(),
        variable: blockline_core::IncomingEvent::AttentionBell.variable(),
    });
    let mut runtime = runtime(&config);
    runtime.driver_mut().inject_switch(SwitchEdge::press(Switch::Bell));

    runtime.run().await.unwrap();

    assert!(runtime.instrument().bell());
    assert!(runtime.driver().last_render().unwrap().bell);
}

#[tokio::test]
async fn own_events_are_not_looped_back_by_default() {
    let mut config = config();
    config.events.push(blockline_core::TaughtEvent {
        node_number: 1,
        event_number: OutgoingEvent::AttentionBell.event_number(),
        variable: blockline_core::IncomingEvent::AttentionBell.variable(),
    });
    let mut runtime = runtime(&config);
    runtime.driver_mut().inject_switch(SwitchEdge::press(Switch::Bell));

    runtime.run().await.unwrap();

    assert!(!runtime.instrument().bell());
}

#[tokio::test]
async fn send_errors_stop_the_loop() {
    let mut runtime = runtime(&config());
    runtime.driver_mut().fail_sends();
    runtime.driver_mut().inject_switch(SwitchEdge::press(Switch::LineClear));

    assert!(runtime.run().await.is_err());
    assert!(!runtime.driver().is_stopped());
}
