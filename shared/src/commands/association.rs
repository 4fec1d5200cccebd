//! ASSOCIATION command class (0x85)

use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::entity::{AssociationReport, Entity};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x85;

pub const ASSOCIATION_SET: u8 = 0x01;
pub const ASSOCIATION_GET: u8 = 0x02;
pub const ASSOCIATION_REPORT: u8 = 0x03;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, ASSOCIATION_REPORT);

const REPORT_MIN_LEN: usize = 3;

/// Layout: `[grouping][max nodes][reports to follow][node id]*`
pub struct AssociationReportDecoder;

impl Decoder for AssociationReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(REPORT_MIN_LEN)?;

        let grouping = reader.u8()?;
        let max_nodes = reader.u8()?;
        let reports_to_follow = reader.u8()?;
        let nodes = reader.rest();

        if grouping == 0 {
            return Err(DecodeError::malformed("association grouping 0"));
        }
        if nodes.len() > max_nodes as usize {
            return Err(DecodeError::malformed(format!(
                "{} nodes listed for a group of at most {max_nodes}",
                nodes.len()
            )));
        }
        if nodes.contains(&0) {
            return Err(DecodeError::malformed("association lists node id 0"));
        }

        Ok(Entity::AssociationReport(AssociationReport::new(
            grouping,
            max_nodes,
            reports_to_follow,
            nodes.to_vec(),
        )))
    }
}
