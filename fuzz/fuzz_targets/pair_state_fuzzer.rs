//! Fuzz target for two instruments on one block
//!
//! Drives a cross-taught pair with arbitrary operations, including lost
//! frames and stray accessory events from unknown nodes.
//!
//! # Invariants
//!
//! - Panels always show the projection of remote and local state
//! - On a lossless, drained bus each local state equals the peer's remote
//! - Gates follow the last lever move once the bus drains
//! - Nothing panics

#![no_main]

use arbitrary::Arbitrary;
use blockline_harness::{InstrumentPair, InvariantRegistry, Operation};
use blockline_proto::{AccessoryEvent, Polarity};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum FuzzOp {
    Pair(Operation),
    Stray { node_number: u16, event_number: u16, asserted: bool, short: bool },
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let mut pair = InstrumentPair::new().with_invariants(InvariantRegistry::standard());

    for op in ops {
        match op {
            FuzzOp::Pair(op) => pair.apply(&op),
            FuzzOp::Stray { node_number, event_number, asserted, short } => {
                // Strays come from nodes nobody has taught; a spoofed peer
                // event would break convergence by construction.
                let node_number = node_number | 0x8000;
                let polarity = Polarity::from_bool(asserted);
                let event = if short {
                    AccessoryEvent::short(node_number, event_number, polarity)
                } else {
                    AccessoryEvent::long(node_number, event_number, polarity)
                };
                if let Ok(frame) = event.to_frame(100) {
                    pair.inject(frame);
                }
            },
        }
    }

    pair.apply(&Operation::Settle);
});
