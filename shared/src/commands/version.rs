//! VERSION command class (0x86)

use bytes::{BufMut, BytesMut};

use super::mismatch;
use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::encoder::{EncodeError, Encoder};
use crate::entity::{Entity, VersionCommandClassReport, VersionReport};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x86;

pub const VERSION_GET: u8 = 0x11;
pub const VERSION_REPORT: u8 = 0x12;
pub const VERSION_COMMAND_CLASS_GET: u8 = 0x13;
pub const VERSION_COMMAND_CLASS_REPORT: u8 = 0x14;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, VERSION_REPORT);
pub const COMMAND_CLASS_REPORT: CommandIdentity =
    CommandIdentity::new(COMMAND_CLASS, VERSION_COMMAND_CLASS_REPORT);

/// Library type, protocol version and at least one firmware version
const REPORT_MIN_LEN: usize = 4;
const COMMAND_CLASS_REPORT_LEN: usize = 2;

/// Layout: `[library type][protocol version]([firmware hi][firmware lo])+`
pub struct VersionReportDecoder;

impl Decoder for VersionReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(REPORT_MIN_LEN)?;

        let library_type = reader.u8()?;
        let protocol_version = reader.u8()?;

        if reader.remaining() % 2 != 0 {
            return Err(DecodeError::malformed(format!(
                "firmware version list has odd length {}",
                reader.remaining()
            )));
        }

        let mut firmware_versions = Vec::with_capacity(reader.remaining() / 2);
        while reader.remaining() > 0 {
            firmware_versions.push(reader.u16()?);
        }
        reader.finish()?;

        Ok(Entity::VersionReport(VersionReport::new(
            library_type,
            protocol_version,
            firmware_versions,
        )))
    }
}

pub struct VersionReportEncoder;

impl Encoder for VersionReportEncoder {
    fn encode(&self, entity: &Entity, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Entity::VersionReport(report) = entity else {
            return Err(mismatch(REPORT, entity));
        };
        if report.firmware_versions().is_empty() {
            return Err(EncodeError::ValueOutOfRange(
                "version report needs at least one firmware version".into(),
            ));
        }

        buf.reserve(2 + report.firmware_versions().len() * 2);
        buf.put_u8(report.library_type());
        buf.put_u8(report.protocol_version());
        for firmware in report.firmware_versions() {
            buf.put_u16(*firmware);
        }
        Ok(())
    }
}

/// Layout: `[requested class][class version]`
pub struct CommandClassReportDecoder;

impl Decoder for CommandClassReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(COMMAND_CLASS_REPORT_LEN)?;

        let requested_class = reader.u8()?;
        let class_version = reader.u8()?;
        reader.finish()?;

        Ok(Entity::VersionCommandClassReport(
            VersionCommandClassReport::new(requested_class, class_version),
        ))
    }
}

pub struct CommandClassReportEncoder;

impl Encoder for CommandClassReportEncoder {
    fn encode(&self, entity: &Entity, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Entity::VersionCommandClassReport(report) = entity else {
            return Err(mismatch(COMMAND_CLASS_REPORT, entity));
        };
        buf.put_u8(report.requested_class());
        buf.put_u8(report.class_version());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::check_prefixes;

    fn decode(payload: &[u8]) -> Result<Entity, DecodeError> {
        VersionReportDecoder.decode(payload, &DecodeContext::new(7, 1))
    }

    #[test]
    fn test_single_firmware_report() {
        let entity = decode(&[0x01, 0x04, 0x02, 0x01]).expect("decode failed");
        assert_eq!(
            entity,
            Entity::VersionReport(VersionReport::new(1, 4, vec![0x0201]))
        );
    }

    #[test]
    fn test_truncated_report() {
        assert_eq!(
            decode(&[0x01, 0x04]),
            Err(DecodeError::TruncatedFrame {
                needed: 4,
                available: 2
            })
        );
        check_prefixes(&VersionReportDecoder, &[0x03, 0x05, 0x01, 0x02, 0x07, 0x08], 4);
    }

    #[test]
    fn test_multiple_firmware_targets() {
        let Entity::VersionReport(report) = decode(&[0x03, 0x06, 0x01, 0x02, 0x07, 0x08]).unwrap()
        else {
            panic!("wrong variant");
        };
        assert_eq!(report.library_type(), 3);
        assert_eq!(report.protocol_version(), 6);
        assert_eq!(report.firmware_versions(), &[0x0102, 0x0708]);
    }

    #[test]
    fn test_odd_trailing_byte_is_malformed() {
        assert!(matches!(
            decode(&[0x01, 0x04, 0x02, 0x01, 0x09]),
            Err(DecodeError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let payload = [0x01, 0x04, 0x02, 0x01];
        assert_eq!(decode(&payload), decode(&payload));
    }

    #[test]
    fn test_encode_report() {
        let entity = Entity::VersionReport(VersionReport::new(1, 4, vec![0x0201, 0x0300]));
        let mut buf = BytesMut::new();
        VersionReportEncoder.encode(&entity, &mut buf).unwrap();
        assert_eq!(&buf[..], &[0x01, 0x04, 0x02, 0x01, 0x03, 0x00]);

        let empty = Entity::VersionReport(VersionReport::new(1, 4, vec![]));
        assert!(matches!(
            VersionReportEncoder.encode(&empty, &mut BytesMut::new()),
            Err(EncodeError::ValueOutOfRange(_))
        ));

        assert_eq!(
            VersionReportEncoder.encode(&Entity::WakeUpNotification, &mut BytesMut::new()),
            Err(EncodeError::Mismatch {
                expected: REPORT,
                actual: CommandIdentity::new(0x84, 0x07),
            })
        );
    }

    #[test]
    fn test_command_class_report() {
        let ctx = DecodeContext::default();
        let entity = CommandClassReportDecoder.decode(&[0x25, 0x02], &ctx).unwrap();
        assert_eq!(
            entity,
            Entity::VersionCommandClassReport(VersionCommandClassReport::new(0x25, 2))
        );
        check_prefixes(&CommandClassReportDecoder, &[0x25, 0x02], 2);
        assert!(matches!(
            CommandClassReportDecoder.decode(&[0x25, 0x02, 0x00], &ctx),
            Err(DecodeError::MalformedFrame(_))
        ));
    }
}
