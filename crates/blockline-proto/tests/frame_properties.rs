//! Property-based tests for frame encoding and accessory event parsing.
//!
//! Verifies that parsing holds for ALL inputs, not just hand-picked frames:
//! decoding never panics on arbitrary bytes, and accessory events survive the
//! trip through a frame.

use blockline_proto::{AccessoryEvent, CanFrame, Opcode, Polarity, ProtocolError};
use proptest::prelude::*;

fn arbitrary_frame() -> impl Strategy<Value = CanFrame> {
    (0u8..=15, 0u8..=127, prop::collection::vec(any::<u8>(), 0..=8)).prop_map(
        |(priority, can_id, data)| {
            CanFrame::new(can_id, &data)
                .and_then(|f| f.with_priority(priority))
                .unwrap_or_else(|e| unreachable!("strategy produced invalid frame: {e}"))
        },
    )
}

fn arbitrary_polarity() -> impl Strategy<Value = Polarity> {
    prop_oneof![Just(Polarity::Asserted), Just(Polarity::Released)]
}

proptest! {
    #[test]
    fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        let _ = CanFrame::decode(&bytes);
    }

    #[test]
    fn prop_encoded_frame_decodes_to_itself(frame in arbitrary_frame()) {
        let mut buf = Vec::new();
        frame.encode(&mut buf);

        prop_assert_eq!(buf.len(), frame.encoded_len());
        prop_assert_eq!(CanFrame::decode(&buf), Ok(frame));
    }

    #[test]
    fn prop_accessory_event_survives_frame(
        node_number in any::<u16>(),
        event_number in any::<u16>(),
        polarity in arbitrary_polarity(),
        short in any::<bool>(),
        can_id in 0u8..=127,
    ) {
        let event = if short {
            AccessoryEvent::short(node_number, event_number, polarity)
        } else {
            AccessoryEvent::long(node_number, event_number, polarity)
        };

        let frame = event.to_frame(can_id).unwrap();
        let parsed = AccessoryEvent::from_frame(&frame).unwrap();

        prop_assert_eq!(parsed, event);
        prop_assert_eq!(parsed.polarity(), polarity);
        prop_assert_eq!(frame.opcode(), Some(Opcode::accessory(short, polarity).to_u8()));
    }

    #[test]
    fn prop_non_accessory_opcode_rejected(byte in any::<u8>(), rest in prop::collection::vec(any::<u8>(), 4..=7)) {
        prop_assume!(Opcode::from_u8(byte).is_none());

        let mut data = vec![byte];
        data.extend(rest);
        let frame = CanFrame::new(1, &data).unwrap();

        prop_assert_eq!(AccessoryEvent::from_frame(&frame), Err(ProtocolError::NotAccessory(byte)));
    }
}
