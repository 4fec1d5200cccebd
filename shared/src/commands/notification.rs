//! NOTIFICATION command class (0x71), formerly ALARM

use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::entity::{Entity, NotificationDetails, NotificationReport};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x71;

pub const NOTIFICATION_GET: u8 = 0x04;
pub const NOTIFICATION_REPORT: u8 = 0x05;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, NOTIFICATION_REPORT);

pub const STATUS_ENABLED: u8 = 0xFF;

const V1_LEN: usize = 2;
/// v1 fields plus reserved, status, type, event and the parameter length byte
const EXTENDED_MIN_LEN: usize = 7;
const PARAMS_LENGTH_MASK: u8 = 0x1F;
/// v4+: a sequence number byte follows the parameters
const SEQUENCE_FLAG: u8 = 0x80;

/// Layout (v1): `[alarm type][alarm level]`
///
/// Layout (v3+): `[alarm type][alarm level][reserved][status][type][event][props][params; props & 0x1F]`
/// followed by `[sequence]` when bit 7 of `props` is set
pub struct NotificationReportDecoder;

impl Decoder for NotificationReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(V1_LEN)?;

        let alarm_type = reader.u8()?;
        let alarm_level = reader.u8()?;

        let details = if reader.remaining() > 0 {
            reader.require(EXTENDED_MIN_LEN)?;
            let _reserved = reader.u8()?;
            let status = reader.u8()?;
            let notification_type = reader.u8()?;
            let event = reader.u8()?;
            let props = reader.u8()?;
            let params = reader.take((props & PARAMS_LENGTH_MASK) as usize)?.to_vec();
            let details = NotificationDetails::new(status, notification_type, event, params);
            if props & SEQUENCE_FLAG != 0 {
                let sequence = reader
                    .u8()
                    .map_err(|_| DecodeError::malformed("sequence flag set without sequence number"))?;
                Some(details.with_sequence(sequence))
            } else {
                Some(details)
            }
        } else {
            None
        };
        reader.finish()?;

        Ok(Entity::NotificationReport(NotificationReport::new(
            alarm_type,
            alarm_level,
            details,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(payload: &[u8]) -> Result<Entity, DecodeError> {
        NotificationReportDecoder.decode(payload, &DecodeContext::default())
    }

    #[test]
    fn test_v1_report() {
        assert_eq!(
            decode(&[0x01, 0xFF]),
            Ok(Entity::NotificationReport(NotificationReport::new(1, 0xFF, None)))
        );
    }

    #[test]
    fn test_extended_report_with_params() {
        // Access control (0x06), event 0x06 (keypad unlock), one param byte
        let payload = [0x00, 0x00, 0x00, STATUS_ENABLED, 0x06, 0x06, 0x01, 0x03];
        let Ok(Entity::NotificationReport(report)) = decode(&payload) else {
            panic!("decode failed");
        };
        let details = report.details().expect("extended fields");
        assert_eq!(details.status(), STATUS_ENABLED);
        assert_eq!(details.notification_type(), 0x06);
        assert_eq!(details.event(), 0x06);
        assert_eq!(details.params(), &[0x03]);
        assert_eq!(details.sequence(), None);
    }

    #[test]
    fn test_sequence_number_after_params() {
        // Door lock keypad unlock with the sequence flag set, sequence 0x2A
        let payload = [0x00, 0x00, 0x00, STATUS_ENABLED, 0x06, 0x06, 0x81, 0x03, 0x2A];
        let Ok(Entity::NotificationReport(report)) = decode(&payload) else {
            panic!("decode failed");
        };
        let details = report.details().expect("extended fields");
        assert_eq!(details.params(), &[0x03]);
        assert_eq!(details.sequence(), Some(0x2A));

        // Flag set but the sequence byte is missing
        assert!(matches!(
            decode(&payload[..8]),
            Err(DecodeError::MalformedFrame(_))
        ));
        // Anything after the sequence byte is still rejected
        let mut extra = payload.to_vec();
        extra.push(0x00);
        assert!(matches!(decode(&extra), Err(DecodeError::MalformedFrame(_))));
    }

    #[test]
    fn test_partial_extension_is_truncated() {
        for len in 3..EXTENDED_MIN_LEN {
            let payload = vec![0u8; len];
            assert_eq!(
                decode(&payload),
                Err(DecodeError::TruncatedFrame {
                    needed: EXTENDED_MIN_LEN,
                    available: len
                })
            );
        }
    }

    #[test]
    fn test_params_length_checked() {
        // Claims 4 parameter bytes, only 1 present
        assert!(matches!(
            decode(&[0x00, 0x00, 0x00, 0xFF, 0x07, 0x08, 0x04, 0x01]),
            Err(DecodeError::MalformedFrame(_))
        ));
        // Claims 0, 1 trailing
        assert!(matches!(
            decode(&[0x00, 0x00, 0x00, 0xFF, 0x07, 0x08, 0x00, 0x01]),
            Err(DecodeError::MalformedFrame(_))
        ));
    }
}
