//! Pure packet codec for the 0xEF01 wire format.
//!
//! Frame layout (all multi-byte integers big-endian):
//!
//! ```text
//! [0xEF 0x01][0xFF 0xFF 0xFF 0xFF][kind:1][len_hi len_lo][payload...][chk_hi chk_lo]
//! ```
//!
//! `len` counts the payload plus the two checksum bytes. The checksum is the
//! low 16 bits of `kind + len_hi + len_lo + sum(payload)`. No I/O happens
//! here; [`encode`] and [`decode`] operate on byte slices only.

use crate::constants::*;
use crate::error::{Result, ZfmError};
use crate::types::{Ack, Command, ConfirmationCode, PacketKind};

/// Checksum over the length-counted portion of a frame.
///
/// Deterministic: the same kind and payload always produce the same value.
pub fn checksum(kind: u8, payload: &[u8]) -> u16 {
    let len = (payload.len() + 2) as u16;
    let [len_hi, len_lo] = len.to_be_bytes();
    let sum = kind as u32
        + len_hi as u32
        + len_lo as u32
        + payload.iter().map(|&b| b as u32).sum::<u32>();
    sum as u16
}

/// Build a complete command frame for `command` with the given parameter bytes.
///
/// Always succeeds; any parameter byte sequence is legal at this layer.
pub fn encode(command: Command, params: &[u8]) -> Vec<u8> {
    let kind = PacketKind::Command.code();
    let mut payload = Vec::with_capacity(1 + params.len());
    payload.push(command.code());
    payload.extend_from_slice(params);

    let len = (payload.len() + 2) as u16;
    let chk = checksum(kind, &payload);

    let mut frame = Vec::with_capacity(MIN_ACK_LEN + params.len());
    frame.extend_from_slice(&HEADER);
    frame.extend_from_slice(&ADDRESS);
    frame.push(kind);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    frame.extend_from_slice(&chk.to_be_bytes());
    frame
}

/// Parse an acknowledgement frame out of `bytes`.
///
/// Fails with [`ZfmError::MalformedFrame`] when the buffer is shorter than the
/// minimum ack size or the packet-kind byte is not the ack tag. The trailing
/// checksum is not re-verified; the module is trusted on the reply path.
pub fn decode(bytes: &[u8]) -> Result<Ack> {
    if bytes.len() < MIN_ACK_LEN {
        return Err(ZfmError::MalformedFrame(format!(
            "{} byte(s), need at least {}",
            bytes.len(),
            MIN_ACK_LEN
        )));
    }
    if bytes[KIND_OFFSET] != PacketKind::Ack.code() {
        return Err(ZfmError::MalformedFrame(format!(
            "packet kind {:#04x} is not an acknowledgement",
            bytes[KIND_OFFSET]
        )));
    }

    let len = u16::from_be_bytes([bytes[LEN_OFFSET], bytes[LEN_OFFSET + 1]]) as usize;
    if len < 3 {
        return Err(ZfmError::MalformedFrame(format!(
            "length field {} leaves no room for a confirmation code",
            len
        )));
    }
    if bytes.len() < PAYLOAD_OFFSET + len - 2 {
        return Err(ZfmError::MalformedFrame(format!(
            "length field {} exceeds received {} byte(s)",
            len,
            bytes.len()
        )));
    }

    let payload = bytes[PAYLOAD_OFFSET..PAYLOAD_OFFSET + len - 2].to_vec();
    Ok(Ack {
        code: ConfirmationCode(payload[0]),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ack as ack_frame;

    #[test]
    fn encode_get_image_known_bytes() {
        // GetImage has no params: len = 3, checksum = 0x01 + 0x00 + 0x03 + 0x01
        let frame = encode(Command::GetImage, &[]);
        assert_eq!(
            frame,
            vec![0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x03, 0x01, 0x00, 0x05]
        );
    }

    #[test]
    fn encode_is_deterministic() {
        let params = [0x01, 0x00, 0x00, 0x00, 0xFF];
        let a = encode(Command::Search, &params);
        let b = encode(Command::Search, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn checksum_matches_manual_sum() {
        let payload = [0x06u8, 0x01, 0x00, 0x0A];
        let len = (payload.len() + 2) as u16;
        let expected = (0x01u32
            + (len >> 8) as u32
            + (len & 0xFF) as u32
            + payload.iter().map(|&b| b as u32).sum::<u32>()) as u16;
        assert_eq!(checksum(0x01, &payload), expected);
    }

    #[test]
    fn checksum_keeps_low_16_bits() {
        let payload = vec![0xFFu8; 600];
        let wide: u32 = 0x07
            + 2 // len = 602 -> 0x02 0x5A
            + 0x5A
            + payload.iter().map(|&b| b as u32).sum::<u32>();
        assert_eq!(checksum(0x07, &payload), wide as u16);
    }

    #[test]
    fn decode_recovers_confirmation_code() {
        let frame = ack_frame(0x00, &[]);
        let ack = decode(&frame).unwrap();
        assert!(ack.code.is_success());
        assert_eq!(ack.payload, vec![0x00]);
    }

    #[test]
    fn decode_keeps_extra_payload_fields() {
        let frame = ack_frame(0x00, &[0x00, 0x0C, 0x00, 0x57]);
        let ack = decode(&frame).unwrap();
        assert_eq!(ack.payload.len(), 5);
        assert_eq!(u16::from_be_bytes([ack.payload[1], ack.payload[2]]), 12);
        assert_eq!(u16::from_be_bytes([ack.payload[3], ack.payload[4]]), 87);
    }

    #[test]
    fn decode_rejects_short_input() {
        for n in 0..MIN_ACK_LEN {
            let bytes = vec![0u8; n];
            assert!(matches!(
                decode(&bytes),
                Err(ZfmError::MalformedFrame(_))
            ));
        }
    }

    #[test]
    fn decode_rejects_non_ack_kind() {
        let mut frame = ack_frame(0x00, &[]);
        frame[KIND_OFFSET] = PacketKind::Command.code();
        assert!(matches!(decode(&frame), Err(ZfmError::MalformedFrame(_))));

        for kind in [0x00u8, 0x02, 0x08, 0xFF] {
            frame[KIND_OFFSET] = kind;
            assert!(matches!(decode(&frame), Err(ZfmError::MalformedFrame(_))));
        }
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let mut frame = ack_frame(0x00, &[]);
        // Claim a payload longer than what was actually received
        frame[LEN_OFFSET] = 0x00;
        frame[LEN_OFFSET + 1] = 0x20;
        assert!(matches!(decode(&frame), Err(ZfmError::MalformedFrame(_))));
    }

    #[test]
    fn decode_of_encoded_command_is_rejected_as_non_ack() {
        // A command frame is well-formed but carries the wrong kind tag
        let frame = encode(Command::RegModel, &[]);
        assert!(matches!(decode(&frame), Err(ZfmError::MalformedFrame(_))));
    }
}
