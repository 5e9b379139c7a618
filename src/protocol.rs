use crate::codec;
use crate::constants::REPLY_TIMEOUT_MS;
use crate::error::{Result, ZfmError};
use crate::transport::{hex_dump, SerialTransport, Transport};
use crate::types::{Command, ConfirmationCode, SearchHit};
use log::debug;
use std::time::Duration;

/// Command client for a ZFM fingerprint module.
///
/// Exposes one method per primitive device operation. Every call is a full
/// round trip: clear residual input, send the encoded command frame, collect
/// the reply within the configured window, decode the acknowledgement.
/// Exclusive access (`&mut self`) keeps exactly one command in flight, which
/// is all the module supports.
///
/// Non-zero confirmation codes are returned in-band; only link failures and
/// unparseable replies surface as [`ZfmError`].
pub struct Zfm<T: Transport> {
    transport: T,
    reply_timeout: Duration,
}

impl Zfm<SerialTransport> {
    /// Connect to a module on `port_name` at the default 57600 baud.
    pub fn open(port_name: &str) -> Result<Self> {
        Ok(Self::new(SerialTransport::open_default(port_name)?))
    }

    /// Connect to a module on `port_name` at a specific baud rate.
    pub fn open_with_baud(port_name: &str, baud_rate: u32) -> Result<Self> {
        Ok(Self::new(SerialTransport::open(port_name, baud_rate)?))
    }

    /// List serial ports visible to the OS.
    pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
        SerialTransport::list_ports()
    }
}

impl<T: Transport> Zfm<T> {
    /// Wrap an already-open transport.
    pub fn new(transport: T) -> Self {
        Zfm {
            transport,
            reply_timeout: Duration::from_millis(REPLY_TIMEOUT_MS),
        }
    }

    /// Override the acknowledgement collection window.
    pub fn set_reply_timeout(&mut self, timeout: Duration) {
        self.reply_timeout = timeout;
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// One full command/acknowledgement round trip.
    fn transact(&mut self, command: Command, params: &[u8]) -> Result<crate::types::Ack> {
        self.transport.clear_input()?;

        let frame = codec::encode(command, params);
        debug!("{:?} -> {}", command, hex_dump(&frame));
        self.transport.send(&frame)?;

        let reply = self.transport.receive(self.reply_timeout)?;
        debug!("{:?} <- {}", command, hex_dump(&reply));
        codec::decode(&reply)
    }

    /// Round trip for commands whose ack carries only a confirmation code.
    fn simple(&mut self, command: Command, params: &[u8]) -> Result<ConfirmationCode> {
        Ok(self.transact(command, params)?.code)
    }

    /// Capture a live fingerprint image into the module's image buffer.
    pub fn get_image(&mut self) -> Result<ConfirmationCode> {
        self.simple(Command::GetImage, &[])
    }

    /// Extract characteristics from the captured image into `buffer_id` (1 or 2).
    pub fn gen_char(&mut self, buffer_id: u8) -> Result<ConfirmationCode> {
        self.simple(Command::GenChar, &[buffer_id])
    }

    /// Fuse the two character buffers into a template model.
    pub fn reg_model(&mut self) -> Result<ConfirmationCode> {
        self.simple(Command::RegModel, &[])
    }

    /// Persist the template from `buffer_id` into library page `page_id`.
    pub fn store(&mut self, page_id: u16, buffer_id: u8) -> Result<ConfirmationCode> {
        let [hi, lo] = page_id.to_be_bytes();
        self.simple(Command::Store, &[buffer_id, hi, lo])
    }

    /// Load the template at `page_id` into `buffer_id`.
    pub fn load_char(&mut self, page_id: u16, buffer_id: u8) -> Result<ConfirmationCode> {
        let [hi, lo] = page_id.to_be_bytes();
        self.simple(Command::LoadChar, &[buffer_id, hi, lo])
    }

    /// Delete `count` consecutive templates starting at `page_id`.
    pub fn delete_char(&mut self, page_id: u16, count: u8) -> Result<ConfirmationCode> {
        let [page_hi, page_lo] = page_id.to_be_bytes();
        self.simple(Command::DeleteChar, &[page_hi, page_lo, count])
    }

    /// Search `num_pages` library pages from `start_page` for the template in
    /// `buffer_id`. On success the hit's page id and score come back at fixed
    /// payload offsets; on a non-zero code there is no hit.
    pub fn search(
        &mut self,
        buffer_id: u8,
        start_page: u16,
        num_pages: u16,
    ) -> Result<(ConfirmationCode, Option<SearchHit>)> {
        let [start_hi, start_lo] = start_page.to_be_bytes();
        let [num_hi, num_lo] = num_pages.to_be_bytes();
        let ack = self.transact(
            Command::Search,
            &[buffer_id, start_hi, start_lo, num_hi, num_lo],
        )?;

        if !ack.code.is_success() {
            return Ok((ack.code, None));
        }
        if ack.payload.len() < 5 {
            return Err(ZfmError::MalformedFrame(format!(
                "search ack payload too short: {} byte(s)",
                ack.payload.len()
            )));
        }
        let hit = SearchHit {
            page_id: u16::from_be_bytes([ack.payload[1], ack.payload[2]]),
            score: u16::from_be_bytes([ack.payload[3], ack.payload[4]]),
        };
        Ok((ack.code, Some(hit)))
    }

    /// Compare the templates in the two character buffers. The score is
    /// present only when the module reports a match.
    pub fn match_buffers(
        &mut self,
        buffer_a: u8,
        buffer_b: u8,
    ) -> Result<(ConfirmationCode, Option<u16>)> {
        let ack = self.transact(Command::Match, &[buffer_a, buffer_b])?;

        if !ack.code.is_success() {
            return Ok((ack.code, None));
        }
        if ack.payload.len() < 3 {
            return Err(ZfmError::MalformedFrame(format!(
                "match ack payload too short: {} byte(s)",
                ack.payload.len()
            )));
        }
        let score = u16::from_be_bytes([ack.payload[1], ack.payload[2]]);
        Ok((ack.code, Some(score)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ack, ScriptedTransport};

    #[test]
    fn get_image_returns_code() {
        let transport = ScriptedTransport::new(vec![ack(0x00, &[])]);
        let mut zfm = Zfm::new(transport);
        let code = zfm.get_image().unwrap();
        assert!(code.is_success());
    }

    #[test]
    fn each_round_trip_clears_input_first() {
        let transport = ScriptedTransport::new(vec![ack(0x00, &[]), ack(0x02, &[])]);
        let mut zfm = Zfm::new(transport);
        zfm.get_image().unwrap();
        zfm.get_image().unwrap();
        assert_eq!(zfm.transport.clears, 2);
        assert_eq!(zfm.transport.sent.len(), 2);
    }

    #[test]
    fn store_encodes_buffer_then_page_big_endian() {
        let transport = ScriptedTransport::new(vec![ack(0x00, &[])]);
        let mut zfm = Zfm::new(transport);
        zfm.store(0x0203, 1).unwrap();

        let frame = &zfm.transport.sent[0];
        // payload starts at offset 9: command byte then params
        assert_eq!(frame[9], Command::Store.code());
        assert_eq!(&frame[10..13], &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn delete_char_encodes_page_then_one_byte_count() {
        let transport = ScriptedTransport::new(vec![ack(0x00, &[])]);
        let mut zfm = Zfm::new(transport);
        zfm.delete_char(0x0110, 1).unwrap();

        let frame = &zfm.transport.sent[0];
        // Three parameter bytes: len field = cmd + params + checksum = 6
        assert_eq!(u16::from_be_bytes([frame[7], frame[8]]), 6);
        assert_eq!(frame[9], Command::DeleteChar.code());
        assert_eq!(&frame[10..13], &[0x01, 0x10, 0x01]);
    }

    #[test]
    fn search_extracts_hit_fields_on_success() {
        let transport =
            ScriptedTransport::new(vec![ack(0x00, &[0x00, 0x0C, 0x00, 0x57])]);
        let mut zfm = Zfm::new(transport);
        let (code, hit) = zfm.search(1, 0, 100).unwrap();
        assert!(code.is_success());
        let hit = hit.unwrap();
        assert_eq!(hit.page_id, 12);
        assert_eq!(hit.score, 87);
    }

    #[test]
    fn search_no_match_has_no_hit() {
        let transport = ScriptedTransport::new(vec![ack(0x09, &[])]);
        let mut zfm = Zfm::new(transport);
        let (code, hit) = zfm.search(1, 0, 100).unwrap();
        assert_eq!(code, ConfirmationCode(0x09));
        assert!(hit.is_none());
    }

    #[test]
    fn match_buffers_extracts_score() {
        let transport = ScriptedTransport::new(vec![ack(0x00, &[0x00, 0x40])]);
        let mut zfm = Zfm::new(transport);
        let (code, score) = zfm.match_buffers(1, 2).unwrap();
        assert!(code.is_success());
        assert_eq!(score, Some(64));
    }

    #[test]
    fn match_buffers_mismatch_has_no_score() {
        let transport = ScriptedTransport::new(vec![ack(0x08, &[])]);
        let mut zfm = Zfm::new(transport);
        let (code, score) = zfm.match_buffers(1, 2).unwrap();
        assert_eq!(code, ConfirmationCode(0x08));
        assert!(score.is_none());
    }

    #[test]
    fn silent_link_surfaces_as_malformed_frame() {
        // Empty reply: the bounded slurp saw nothing before the window closed
        let transport = ScriptedTransport::new(vec![Vec::new()]);
        let mut zfm = Zfm::new(transport);
        assert!(matches!(
            zfm.get_image(),
            Err(ZfmError::MalformedFrame(_))
        ));
    }
}
