#![no_main]

use std::sync::Arc;

use codec::{decode_packet, CodecError, CodecLimits, Direction, InboundStream};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(registry) = demo_messages::registry() else {
        return;
    };
    let limits = CodecLimits::for_testing();
    let wire_limits = wire::Limits::for_testing();

    for direction in [Direction::Inbound, Direction::Outbound] {
        let _ = decode_packet(&registry, direction, data, &wire_limits, &limits);
    }

    // Feed the same bytes through a stream in input-driven chunk sizes.
    let mut stream = InboundStream::new(
        Arc::new(registry),
        Direction::Inbound,
        wire_limits,
        limits,
    );
    let mut idx = 0usize;
    while idx < data.len() {
        let len = (usize::from(data[idx]) % 64).saturating_add(1);
        let end = (idx + len).min(data.len());
        if stream.push(&data[idx..end]).is_err() {
            break;
        }
        idx = end;
        loop {
            match stream.next_packet() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                // Framing errors leave the buffer corrupt.
                Err(CodecError::Frame(_)) => return,
                Err(_) => {}
            }
        }
    }
});
