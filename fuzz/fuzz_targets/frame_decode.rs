//! Fuzz target for CanFrame::decode and AccessoryEvent::from_frame
//!
//! This fuzzer feeds arbitrary byte sequences to the frame codec to find:
//! - Parser crashes or panics
//! - Length bytes that bypass validation
//! - Accessory events parsed from frames that are too short
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use blockline_proto::{AccessoryEvent, CanFrame};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = CanFrame::decode(data) else {
        return;
    };

    // Whatever decodes must encode back to the same bytes
    let mut encoded = Vec::new();
    frame.encode(&mut encoded);
    assert_eq!(encoded.as_slice(), &data[..encoded.len()]);

    if let Ok(event) = AccessoryEvent::from_frame(&frame) {
        let again = event.to_frame(frame.can_id()).expect("can id came from a frame");
        assert_eq!(AccessoryEvent::from_frame(&again), Ok(event));
    }
});
