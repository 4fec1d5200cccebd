//! CONFIGURATION command class (0x70)

use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::entity::{ConfigurationReport, Entity};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x70;

pub const CONFIGURATION_SET: u8 = 0x04;
pub const CONFIGURATION_GET: u8 = 0x05;
pub const CONFIGURATION_REPORT: u8 = 0x06;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, CONFIGURATION_REPORT);

const REPORT_MIN_LEN: usize = 3;
const SIZE_MASK: u8 = 0x07;

/// Layout: `[parameter][size][value; size]`
pub struct ConfigurationReportDecoder;

impl Decoder for ConfigurationReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(REPORT_MIN_LEN)?;

        let parameter = reader.u8()?;
        let size = reader.u8()? & SIZE_MASK;
        if !matches!(size, 1 | 2 | 4) {
            return Err(DecodeError::malformed(format!(
                "invalid configuration value size {size}"
            )));
        }

        let raw = reader.take(size as usize)?;
        let value = PayloadReader::new(raw).signed(size as usize)?;
        reader.finish()?;

        Ok(Entity::ConfigurationReport(ConfigurationReport::new(
            parameter, size, value,
        )))
    }
}
