//! MANUFACTURER_SPECIFIC command class (0x72)

use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::entity::{Entity, ManufacturerSpecificReport};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x72;

pub const MANUFACTURER_SPECIFIC_GET: u8 = 0x04;
pub const MANUFACTURER_SPECIFIC_REPORT: u8 = 0x05;

pub const REPORT: CommandIdentity =
    CommandIdentity::new(COMMAND_CLASS, MANUFACTURER_SPECIFIC_REPORT);

const REPORT_LEN: usize = 6;

/// Layout: three big-endian u16 values (manufacturer, product type, product id)
pub struct ManufacturerSpecificReportDecoder;

impl Decoder for ManufacturerSpecificReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(REPORT_LEN)?;

        let manufacturer_id = reader.u16()?;
        let product_type_id = reader.u16()?;
        let product_id = reader.u16()?;
        reader.finish()?;

        Ok(Entity::ManufacturerSpecificReport(
            ManufacturerSpecificReport::new(manufacturer_id, product_type_id, product_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::check_prefixes;

    #[test]
    fn test_report() {
        let payload = [0x00, 0x86, 0x00, 0x03, 0x00, 0x60];
        let entity = ManufacturerSpecificReportDecoder
            .decode(&payload, &DecodeContext::default())
            .unwrap();
        assert_eq!(
            entity,
            Entity::ManufacturerSpecificReport(ManufacturerSpecificReport::new(
                0x0086, 0x0003, 0x0060
            ))
        );
        check_prefixes(&ManufacturerSpecificReportDecoder, &payload, REPORT_LEN);
    }
}
