//! Property-based tests for the interlock state machines.
//!
//! Drives the remote and local machines with arbitrary event sequences and
//! checks the properties that make the block safe: one outstanding request,
//! released request edges ignored, local state advanced only by
//! acknowledgements, lamps always a projection of state.

use blockline_core::{
    BlockState, Emission, IncomingEvent, Lamp, LocalInterlock, OutgoingEvent, RemoteInterlock,
    Switch, armed_switch, project,
};
use blockline_proto::Polarity;
use proptest::prelude::*;

fn incoming_event() -> impl Strategy<Value = IncomingEvent> {
    (0..IncomingEvent::BOUND).prop_map(|v| {
        IncomingEvent::from_variable(v).unwrap_or_else(|| unreachable!("variable below bound"))
    })
}

fn polarity() -> impl Strategy<Value = Polarity> {
    prop_oneof![Just(Polarity::Asserted), Just(Polarity::Released)]
}

fn switch() -> impl Strategy<Value = Switch> {
    prop_oneof![
        Just(Switch::LineClear),
        Just(Switch::TrainOnTrack),
        Just(Switch::Normal),
        Just(Switch::Bell),
    ]
}

/// The only (state, event) pairs that may move the remote machine.
fn remote_may_transition(state: BlockState, event: IncomingEvent, polarity: Polarity) -> bool {
    match (state, event) {
        (BlockState::LCBlocked, IncomingEvent::CommutatorLock) => true,
        (BlockState::Normal, IncomingEvent::LineClear)
        | (BlockState::LineClear, IncomingEvent::TrainOnTrack)
        | (BlockState::TrainOnTrack, IncomingEvent::BlockCleared) => polarity.is_asserted(),
        _ => false,
    }
}

proptest! {
    #[test]
    fn prop_remote_moves_only_on_accepted_events(
        events in prop::collection::vec((incoming_event(), polarity()), 0..64)
    ) {
        let mut remote = RemoteInterlock::new();

        for (event, polarity) in events {
            let before = remote.state();
            let sent = remote.handle(event, polarity);

            if remote_may_transition(before, event, polarity) {
                continue;
            }
            prop_assert_eq!(remote.state(), before, "{} {} in {}", event, polarity, before);
            prop_assert!(sent.is_empty());
        }
    }

    #[test]
    fn prop_remote_emissions_end_with_an_asserted_answer(
        events in prop::collection::vec((incoming_event(), polarity()), 0..64)
    ) {
        let mut remote = RemoteInterlock::new();

        for (event, polarity) in events {
            let before = remote.state();
            let sent = remote.handle(event, polarity);
            if sent.is_empty() {
                continue;
            }

            // Every transition closes with exactly one asserted event naming
            // the new state, after all the released ones.
            let (last, rest) = sent.split_last().unwrap_or_else(|| unreachable!());
            prop_assert!(last.polarity.is_asserted());
            prop_assert!(rest.iter().all(|e| !e.polarity.is_asserted()));

            let expected = match remote.state() {
                BlockState::LineClear => OutgoingEvent::LineClearAck,
                BlockState::TrainOnTrack => OutgoingEvent::TrainOnTrackAck,
                BlockState::Normal => OutgoingEvent::BlockClearedAck,
                BlockState::LCBlocked => OutgoingEvent::LineClearBlocked,
            };
            prop_assert_eq!(last.event, expected, "transition from {}", before);
        }
    }

    #[test]
    fn prop_gate_tracks_last_lock_edge(
        events in prop::collection::vec((incoming_event(), polarity()), 0..64)
    ) {
        let mut remote = RemoteInterlock::new();
        let mut released = true;

        for (event, polarity) in events {
            remote.handle(event, polarity);
            if event == IncomingEvent::CommutatorLock {
                released = !polarity.is_asserted();
            }
            prop_assert_eq!(remote.gate().is_released(), released);
        }
    }

    #[test]
    fn prop_switches_never_move_local_state(
        presses in prop::collection::vec(switch(), 0..32),
        start in 0usize..4,
    ) {
        let mut local = LocalInterlock::new();
        let ack = [
            IncomingEvent::BlockClearedAck,
            IncomingEvent::LineClearAck,
            IncomingEvent::TrainOnTrackAck,
            IncomingEvent::LineClearBlocked,
        ][start];
        local.apply_ack(ack);
        let state = local.state();

        for switch in presses {
            let sent = local.request_advance(switch);
            prop_assert_eq!(local.state(), state);
            prop_assert_eq!(sent.is_empty(), armed_switch(state) != Some(switch));
        }
    }

    #[test]
    fn prop_local_state_is_last_ack(
        events in prop::collection::vec(incoming_event(), 0..64)
    ) {
        let mut local = LocalInterlock::new();
        let mut expected = BlockState::Normal;

        for event in events {
            if let Some(target) = local.apply_ack(event) {
                expected = target;
            }
            prop_assert_eq!(local.state(), expected);
        }
    }

    #[test]
    fn prop_projection_is_deterministic(remote in 0usize..4, local in 0usize..4) {
        let remote = BlockState::ALL[remote];
        let local = BlockState::ALL[local];

        let lamps = project(remote, local);
        prop_assert_eq!(lamps, project(remote, local));
        prop_assert_eq!(lamps.warning == Lamp::On, remote == BlockState::LCBlocked);
        prop_assert_eq!(lamps.occupied == Lamp::On, remote == BlockState::TrainOnTrack);
    }
}

#[test]
fn locked_gate_refuses_line_clear_and_warns() {
    let mut remote = RemoteInterlock::new();
    let local = LocalInterlock::new();

    remote.handle(IncomingEvent::CommutatorLock, Polarity::Asserted);
    let sent = remote.handle(IncomingEvent::LineClear, Polarity::Asserted);

    assert_eq!(remote.state(), BlockState::LCBlocked);
    assert_eq!(sent, vec![Emission::on(OutgoingEvent::LineClearBlocked)]);

    let lamps = project(remote.state(), local.state());
    assert_eq!(lamps.warning, Lamp::On);
    assert_eq!(lamps.remote.line_clear, Lamp::Blink);
}

#[test]
fn full_cycle_restores_lamps_exactly() {
    let mut remote = RemoteInterlock::new();
    let local = LocalInterlock::new();
    let initial = project(remote.state(), local.state());

    for event in [IncomingEvent::LineClear, IncomingEvent::TrainOnTrack] {
        assert!(!remote.handle(event, Polarity::Asserted).is_empty());
        assert_ne!(project(remote.state(), local.state()), initial);
    }
    assert!(!remote.handle(IncomingEvent::BlockCleared, Polarity::Asserted).is_empty());

    assert_eq!(remote.state(), BlockState::Normal);
    assert!(remote.gate().is_released());
    assert_eq!(project(remote.state(), local.state()), initial);
}
