//! Scripted transport for exercising the client and workflows without
//! hardware. Each queued reply answers one round trip, in order.

use crate::codec::checksum;
use crate::constants::{ADDRESS, HEADER};
use crate::error::Result;
use crate::transport::Transport;
use crate::types::PacketKind;
use std::collections::VecDeque;
use std::time::Duration;

pub struct ScriptedTransport {
    replies: VecDeque<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
    pub clears: usize,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Vec<u8>>) -> Self {
        ScriptedTransport {
            replies: replies.into(),
            sent: Vec::new(),
            clears: 0,
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Vec<u8>> {
        Ok(self.replies.pop_front().unwrap_or_default())
    }

    fn clear_input(&mut self) -> Result<()> {
        self.clears += 1;
        Ok(())
    }
}

/// Build a well-formed acknowledgement frame with `code` followed by any
/// command-specific payload bytes.
pub fn ack(code: u8, extra: &[u8]) -> Vec<u8> {
    let kind = PacketKind::Ack.code();
    let mut payload = vec![code];
    payload.extend_from_slice(extra);

    let len = (payload.len() + 2) as u16;
    let chk = checksum(kind, &payload);

    let mut frame = Vec::new();
    frame.extend_from_slice(&HEADER);
    frame.extend_from_slice(&ADDRESS);
    frame.push(kind);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    frame.extend_from_slice(&chk.to_be_bytes());
    frame
}
