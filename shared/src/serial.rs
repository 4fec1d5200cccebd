//! Z-Wave Serial API framing
//!
//! The controller stick speaks a byte stream made of single-byte control
//! symbols and checksummed data frames:
//! ```text
//! ACK 0x06 | NAK 0x15 | CAN 0x18
//! [ SOF 0x01 ][ LEN ][ TYPE ][ FUNC ][ params... ][ CHECKSUM ]
//! ```
//! `LEN` counts TYPE through CHECKSUM. `CHECKSUM` is `0xFF` XOR every byte from
//! LEN to the last parameter.
//!
//! Inbound device commands arrive as `APPLICATION_COMMAND_HANDLER` requests:
//! ```text
//! params = [ rx status ][ source node ][ cmd len ][ class ][ command ][ payload... ]
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::identity::CommandIdentity;

pub const SOF: u8 = 0x01;
pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;
pub const CAN: u8 = 0x18;

pub const FRAME_TYPE_REQUEST: u8 = 0x00;
pub const FRAME_TYPE_RESPONSE: u8 = 0x01;

pub const FUNC_ID_APPLICATION_COMMAND_HANDLER: u8 = 0x04;
pub const FUNC_ID_SEND_DATA: u8 = 0x13;

/// TYPE, FUNC and CHECKSUM
const MIN_FRAME_LEN: u8 = 3;

/// Errors that can occur while framing or unframing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid frame length: {0}")]
    InvalidLength(u8),

    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    Checksum { expected: u8, actual: u8 },

    #[error("Frame parameters too long: {0} bytes")]
    TooLong(usize),

    #[error("Not an application command: type {frame_type:#04x}, function {function_id:#04x}")]
    NotApplicationCommand { frame_type: u8, function_id: u8 },

    #[error("Application command too short: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Application command length {0} cannot hold class and command")]
    InvalidCommandLength(u8),
}

/// One unit read off the serial stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialFrame {
    Ack,
    Nak,
    Can,
    Data(DataFrame),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    frame_type: u8,
    function_id: u8,
    params: Bytes,
}

impl DataFrame {
    pub fn new(frame_type: u8, function_id: u8, params: impl Into<Bytes>) -> Self {
        Self {
            frame_type,
            function_id,
            params: params.into(),
        }
    }

    pub fn frame_type(&self) -> u8 {
        self.frame_type
    }

    pub fn function_id(&self) -> u8 {
        self.function_id
    }

    pub fn params(&self) -> &Bytes {
        &self.params
    }
}

/// XOR checksum seeded with 0xFF
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0xFF, |acc, b| acc ^ b)
}

/// Encode a data frame into its wire form
pub fn encode(frame: &DataFrame) -> Result<Bytes, FrameError> {
    let len = frame.params.len() + MIN_FRAME_LEN as usize;
    if len > u8::MAX as usize {
        return Err(FrameError::TooLong(frame.params.len()));
    }

    let mut buf = BytesMut::with_capacity(2 + len);
    buf.put_u8(SOF);
    buf.put_u8(len as u8);
    buf.put_u8(frame.frame_type);
    buf.put_u8(frame.function_id);
    buf.put_slice(&frame.params);
    let sum = checksum(&buf[1..]);
    buf.put_u8(sum);

    Ok(buf.freeze())
}

/// Try to decode the next unit from a buffer
///
/// Returns:
/// - `Ok(Some(frame))` if a control byte or complete data frame was consumed
/// - `Ok(None)` if more data is needed
/// - `Err(...)` if a frame was consumed but is invalid; decoding can continue
///
/// Bytes that cannot start a frame are discarded.
pub fn decode(buf: &mut BytesMut) -> Result<Option<SerialFrame>, FrameError> {
    loop {
        let Some(&first) = buf.first() else {
            return Ok(None);
        };
        match first {
            ACK => {
                buf.advance(1);
                return Ok(Some(SerialFrame::Ack));
            }
            NAK => {
                buf.advance(1);
                return Ok(Some(SerialFrame::Nak));
            }
            CAN => {
                buf.advance(1);
                return Ok(Some(SerialFrame::Can));
            }
            SOF => break,
            _ => buf.advance(1),
        }
    }

    // Need SOF and LEN before anything can be validated
    if buf.len() < 2 {
        return Ok(None);
    }

    let len = buf[1];
    if len < MIN_FRAME_LEN {
        // Drop the SOF so the next call resynchronises on later bytes
        buf.advance(1);
        return Err(FrameError::InvalidLength(len));
    }

    let total_len = 2 + len as usize;
    if buf.len() < total_len {
        return Ok(None);
    }

    let frame = buf.split_to(total_len).freeze();
    let expected = checksum(&frame[1..total_len - 1]);
    let actual = frame[total_len - 1];
    if expected != actual {
        return Err(FrameError::Checksum { expected, actual });
    }

    Ok(Some(SerialFrame::Data(DataFrame {
        frame_type: frame[2],
        function_id: frame[3],
        params: frame.slice(4..total_len - 1),
    })))
}

/// Streaming decoder over a serial byte stream
#[derive(Debug, Default)]
pub struct SerialFrameDecoder {
    buffer: BytesMut,
}

impl SerialFrameDecoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(512),
        }
    }

    /// Add data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Call repeatedly until it returns `Ok(None)` to drain all complete frames
    pub fn decode_next(&mut self) -> Result<Option<SerialFrame>, FrameError> {
        decode(&mut self.buffer)
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

/// A device command unwrapped from an `APPLICATION_COMMAND_HANDLER` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationCommand {
    rx_status: u8,
    source_node: u8,
    identity: CommandIdentity,
    payload: Bytes,
}

impl ApplicationCommand {
    pub fn new(rx_status: u8, source_node: u8, identity: CommandIdentity, payload: Bytes) -> Self {
        Self {
            rx_status,
            source_node,
            identity,
            payload,
        }
    }

    /// Unwrap a data frame, validating the embedded command length
    ///
    /// Bytes after the command (RSSI and similar trailers) are ignored.
    pub fn parse(frame: &DataFrame) -> Result<Self, FrameError> {
        if frame.frame_type != FRAME_TYPE_REQUEST
            || frame.function_id != FUNC_ID_APPLICATION_COMMAND_HANDLER
        {
            return Err(FrameError::NotApplicationCommand {
                frame_type: frame.frame_type,
                function_id: frame.function_id,
            });
        }

        let params = &frame.params;
        if params.len() < 3 {
            return Err(FrameError::Truncated {
                needed: 3,
                available: params.len(),
            });
        }

        let cmd_len = params[2];
        if cmd_len < 2 {
            return Err(FrameError::InvalidCommandLength(cmd_len));
        }
        let end = 3 + cmd_len as usize;
        if params.len() < end {
            return Err(FrameError::Truncated {
                needed: end,
                available: params.len(),
            });
        }

        Ok(Self {
            rx_status: params[0],
            source_node: params[1],
            identity: CommandIdentity::new(params[3], params[4]),
            payload: params.slice(5..end),
        })
    }

    /// Wrap back into a request frame
    pub fn to_frame(&self) -> Result<DataFrame, FrameError> {
        let cmd_len = self.payload.len() + 2;
        if cmd_len > u8::MAX as usize {
            return Err(FrameError::TooLong(cmd_len));
        }

        let mut params = BytesMut::with_capacity(3 + cmd_len);
        params.put_u8(self.rx_status);
        params.put_u8(self.source_node);
        params.put_u8(cmd_len as u8);
        params.put_u8(self.identity.command_class());
        params.put_u8(self.identity.command());
        params.put_slice(&self.payload);

        Ok(DataFrame::new(
            FRAME_TYPE_REQUEST,
            FUNC_ID_APPLICATION_COMMAND_HANDLER,
            params.freeze(),
        ))
    }

    pub fn rx_status(&self) -> u8 {
        self.rx_status
    }

    pub fn source_node(&self) -> u8 {
        self.source_node
    }

    pub fn identity(&self) -> CommandIdentity {
        self.identity
    }

    /// Command payload with class and command bytes stripped
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_report_frame() -> Bytes {
        let command = ApplicationCommand::new(
            0x00,
            0x07,
            CommandIdentity::new(0x86, 0x12),
            Bytes::from_static(&[0x01, 0x04, 0x02, 0x01]),
        );
        encode(&command.to_frame().unwrap()).expect("encode failed")
    }

    #[test]
    fn test_known_checksum() {
        // SOF 03 00 15 (GetVersion request) with checksum 0xE9
        let frame = DataFrame::new(FRAME_TYPE_REQUEST, 0x15, Bytes::new());
        assert_eq!(&encode(&frame).unwrap()[..], &[0x01, 0x03, 0x00, 0x15, 0xE9]);
    }

    #[test]
    fn test_decode_application_command() {
        let encoded = version_report_frame();
        assert_eq!(encoded[1] as usize, encoded.len() - 2);

        let mut buf = BytesMut::from(&encoded[..]);
        let Some(SerialFrame::Data(frame)) = decode(&mut buf).expect("decode failed") else {
            panic!("expected data frame");
        };
        assert!(buf.is_empty(), "buffer should be empty after decode");

        let command = ApplicationCommand::parse(&frame).unwrap();
        assert_eq!(command.source_node(), 0x07);
        assert_eq!(command.identity(), CommandIdentity::new(0x86, 0x12));
        assert_eq!(&command.payload()[..], &[0x01, 0x04, 0x02, 0x01]);
    }

    #[test]
    fn test_partial_decode() {
        let encoded = version_report_frame();
        let mut buf = BytesMut::from(&encoded[..5]);
        assert!(decode(&mut buf).expect("partial data is not an error").is_none());
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_control_bytes_and_garbage() {
        let mut decoder = SerialFrameDecoder::new();
        decoder.extend(&[0x06, 0x99, 0x42, 0x15, 0x18]);
        assert_eq!(decoder.decode_next(), Ok(Some(SerialFrame::Ack)));
        assert_eq!(decoder.decode_next(), Ok(Some(SerialFrame::Nak)));
        assert_eq!(decoder.decode_next(), Ok(Some(SerialFrame::Can)));
        assert_eq!(decoder.decode_next(), Ok(None));
        assert_eq!(decoder.buffer_len(), 0);
    }

    #[test]
    fn test_frames_split_across_reads() {
        let encoded = version_report_frame();
        let mut decoder = SerialFrameDecoder::new();

        decoder.extend(&encoded[..3]);
        assert_eq!(decoder.decode_next(), Ok(None));
        decoder.extend(&encoded[3..]);
        decoder.extend(&[ACK]);
        decoder.extend(&encoded);

        assert!(matches!(decoder.decode_next(), Ok(Some(SerialFrame::Data(_)))));
        assert_eq!(decoder.decode_next(), Ok(Some(SerialFrame::Ack)));
        assert!(matches!(decoder.decode_next(), Ok(Some(SerialFrame::Data(_)))));
        assert_eq!(decoder.decode_next(), Ok(None));
    }

    #[test]
    fn test_bad_checksum_consumes_frame() {
        let encoded = version_report_frame();
        let mut corrupted = BytesMut::from(&encoded[..]);
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;
        corrupted.extend_from_slice(&encoded);

        assert!(matches!(decode(&mut corrupted), Err(FrameError::Checksum { .. })));
        assert!(matches!(decode(&mut corrupted), Ok(Some(SerialFrame::Data(_)))));
    }

    #[test]
    fn test_invalid_length_resyncs() {
        let mut buf = BytesMut::from(&[SOF, 0x02, ACK][..]);
        assert_eq!(decode(&mut buf), Err(FrameError::InvalidLength(2)));
        // The stray length byte is skipped as garbage
        assert_eq!(decode(&mut buf), Ok(Some(SerialFrame::Ack)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_rejects_other_frames() {
        let response = DataFrame::new(FRAME_TYPE_RESPONSE, FUNC_ID_SEND_DATA, vec![0x01]);
        assert!(matches!(
            ApplicationCommand::parse(&response),
            Err(FrameError::NotApplicationCommand { .. })
        ));

        // Command length claims 6 bytes, only 3 present
        let short = DataFrame::new(
            FRAME_TYPE_REQUEST,
            FUNC_ID_APPLICATION_COMMAND_HANDLER,
            vec![0x00, 0x07, 0x06, 0x86, 0x12, 0x01],
        );
        assert_eq!(
            ApplicationCommand::parse(&short),
            Err(FrameError::Truncated {
                needed: 9,
                available: 6
            })
        );

        let no_command = DataFrame::new(
            FRAME_TYPE_REQUEST,
            FUNC_ID_APPLICATION_COMMAND_HANDLER,
            vec![0x00, 0x07, 0x01, 0x86],
        );
        assert_eq!(
            ApplicationCommand::parse(&no_command),
            Err(FrameError::InvalidCommandLength(1))
        );
    }

    #[test]
    fn test_trailing_rssi_ignored() {
        let frame = DataFrame::new(
            FRAME_TYPE_REQUEST,
            FUNC_ID_APPLICATION_COMMAND_HANDLER,
            vec![0x00, 0x05, 0x03, 0x80, 0x03, 0x50, 0xC8],
        );
        let command = ApplicationCommand::parse(&frame).unwrap();
        assert_eq!(&command.payload()[..], &[0x50]);
    }
}
