//! Model-based property tests for instrument pairs.
//!
//! Random operation sequences are applied to a pair with the standard
//! invariants checked after every step.
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!                          ▼
//!                   InstrumentPair ──► InvariantRegistry (every step)
//!                          │
//!                          ▼
//!                 settle, then compare both ends
//! ```

use blockline_core::BlockState;
use blockline_harness::{InstrumentPair, InvariantRegistry, Operation, PanelSwitch, Side};
use proptest::prelude::*;

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::A), Just(Side::B)]
}

fn switch_strategy() -> impl Strategy<Value = PanelSwitch> {
    prop_oneof![
        Just(PanelSwitch::LineClear),
        Just(PanelSwitch::TrainOnTrack),
        Just(PanelSwitch::Normal),
        Just(PanelSwitch::Bell),
    ]
}

/// Operations that never lose a frame.
fn lossless_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (side_strategy(), switch_strategy())
            .prop_map(|(side, switch)| Operation::Press { side, switch }),
        2 => (side_strategy(), switch_strategy())
            .prop_map(|(side, switch)| Operation::Release { side, switch }),
        2 => (side_strategy(), any::<bool>())
            .prop_map(|(side, locked)| Operation::Lever { side, locked }),
        4 => Just(Operation::DeliverNext),
        1 => Just(Operation::Settle),
        1 => any::<u16>().prop_map(|millis| Operation::AdvanceTime { millis }),
    ]
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        9 => lossless_operation(),
        1 => Just(Operation::DropNext),
    ]
}

proptest! {
    #[test]
    fn prop_lossless_pairs_converge(ops in prop::collection::vec(lossless_operation(), 0..80)) {
        let mut pair = InstrumentPair::new().with_invariants(InvariantRegistry::standard());

        for op in &ops {
            pair.apply(op);
        }
        pair.apply(&Operation::Settle);

        for side in Side::BOTH {
            let peer = side.peer();
            prop_assert_eq!(
                pair.instrument(side).local_state(),
                pair.instrument(peer).remote_state()
            );
        }
    }

    #[test]
    fn prop_panels_follow_state_despite_loss(ops in prop::collection::vec(operation(), 0..80)) {
        let mut pair = InstrumentPair::new().with_invariants(InvariantRegistry::standard());

        for op in &ops {
            pair.apply(op);
        }
    }

    #[test]
    fn prop_switches_alone_never_move_state(
        presses in prop::collection::vec((side_strategy(), switch_strategy(), any::<bool>()), 0..40)
    ) {
        let mut pair = InstrumentPair::new();

        for (side, switch, pressed) in presses {
            if pressed {
                pair.press(side, switch.into());
            } else {
                pair.release(side, switch.into());
            }
        }

        for side in Side::BOTH {
            prop_assert_eq!(pair.instrument(side).local_state(), BlockState::Normal);
            prop_assert_eq!(pair.instrument(side).remote_state(), BlockState::Normal);
        }
    }

    #[test]
    fn prop_lcblocked_only_with_locked_lever(ops in prop::collection::vec(lossless_operation(), 0..80)) {
        let mut pair = InstrumentPair::new();

        for op in &ops {
            pair.apply(op);
        }
        pair.settle();

        for side in Side::BOTH {
            if pair.instrument(side).remote_state() == BlockState::LCBlocked {
                prop_assert!(pair.lever_locked(side));
            }
        }
    }
}
