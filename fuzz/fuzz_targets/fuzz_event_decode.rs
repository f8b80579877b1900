//! Fuzz event decoding: any two-byte element either decodes into a valid
//! event that re-encodes to the same bytes, or is rejected — never a panic.

#![no_main]

use fogpen::events::{HwEvent, LowLevelEvent, QueueElement, UiEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let element = QueueElement {
        code: data[0],
        aux: data[1],
    };

    // Payload-free events normalise aux on re-encode, so only the code
    // byte is required to round-trip.
    if let Some(event) = LowLevelEvent::decode(element) {
        assert_eq!(event.encode().code, element.code);
    }
    if let Some(event) = UiEvent::decode(element) {
        assert_eq!(event.encode().code, element.code);
    }
    if let Some(event) = HwEvent::decode(element) {
        assert_eq!(event.encode().code, element.code);
    }
});
