mod common;

use codec::{
    decode_packet, deflate, encode_packet_to_vec, inflate, CodecError, CodecLimits, Compression,
    Direction, ProtocolPacket,
};
use common::{registry, Notice, Position};
use proptest::prelude::*;
use wire::SubChannel;

fn position_strategy() -> impl Strategy<Value = Position> {
    (
        -10_000.0f32..10_000.0,
        -10_000.0f32..10_000.0,
        -10_000.0f32..10_000.0,
        any::<u8>(),
    )
        .prop_map(|(x, y, z, flags)| Position { x, y, z, flags })
}

fn notice_strategy() -> impl Strategy<Value = Notice> {
    (1u8..=4, prop::collection::vec("[a-z ]{0,24}", 0..6))
        .prop_map(|(level, lines)| Notice { level, lines })
}

fn decode(direction: Direction, bytes: &[u8]) -> Result<ProtocolPacket, CodecError> {
    decode_packet(
        &registry(),
        direction,
        bytes,
        &wire::Limits::for_testing(),
        &CodecLimits::for_testing(),
    )
    .map(|decoded| decoded.packet)
}

/// Byte ranges covered by the header and body checksums of an
/// uncompressed or stored packet.
fn covered_ranges(sub_channel: SubChannel, compression: Compression, len: usize) -> [(usize, usize); 2] {
    let payload_start = sub_channel.header_size();
    let header = (payload_start, payload_start + 4);
    let inner_start = match compression {
        Compression::Stored => header.1 + 1,
        _ => header.1,
    };
    [header, (inner_start, len)]
}

proptest! {
    #[test]
    fn roundtrip_position(
        position in position_strategy(),
        sub_channel in any::<u8>(),
        sequence in any::<u32>(),
        compression in prop_oneof![
            Just(Compression::Disabled),
            Just(Compression::Stored),
            Just(Compression::Deflate),
        ],
    ) {
        let packet = ProtocolPacket::sequenced(SubChannel::new(sub_channel), sequence, Box::new(position))
            .with_compression(compression);
        let bytes = encode_packet_to_vec(&packet, &CodecLimits::for_testing()).unwrap();
        prop_assert_eq!(decode(Direction::Inbound, &bytes).unwrap(), packet);
    }

    #[test]
    fn roundtrip_notice(notice in notice_strategy(), deflated in any::<bool>()) {
        let compression = if deflated { Compression::Deflate } else { Compression::Disabled };
        let packet = ProtocolPacket::reliable(Box::new(notice)).with_compression(compression);
        let bytes = encode_packet_to_vec(&packet, &CodecLimits::for_testing()).unwrap();
        prop_assert_eq!(decode(Direction::Outbound, &bytes).unwrap(), packet);
    }

    #[test]
    fn single_bit_flip_is_checksum_mismatch(
        notice in notice_strategy(),
        sub_channel in any::<u8>(),
        stored in any::<bool>(),
        region in 0usize..2,
        offset in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let compression = if stored { Compression::Stored } else { Compression::Disabled };
        let sub_channel = SubChannel::new(sub_channel);
        let packet = ProtocolPacket::sequenced(sub_channel, 1, Box::new(notice))
            .with_compression(compression);
        let mut bytes = encode_packet_to_vec(&packet, &CodecLimits::for_testing()).unwrap();

        let (start, end) = covered_ranges(sub_channel, compression, bytes.len())[region];
        let index = start + offset.index(end - start);
        bytes[index] ^= 1 << bit;

        let result = decode(Direction::Outbound, &bytes);
        prop_assert!(
            matches!(result, Err(CodecError::ChecksumMismatch { .. })),
            "flip at {} gave {:?}",
            index,
            result
        );
    }

    #[test]
    fn deflate_inflate_identity(body in prop::collection::vec(any::<u8>(), 0..2048)) {
        let compressed = deflate(&body).unwrap();
        let size = u32::try_from(body.len()).unwrap();
        let inflated = inflate(&compressed, size, &CodecLimits::for_testing()).unwrap();
        prop_assert_eq!(inflated, body);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(Direction::Inbound, &bytes);
        let _ = decode(Direction::Outbound, &bytes);
    }
}
