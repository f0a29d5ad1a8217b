use std::sync::Arc;

use anyhow::Result;

use super::{Anchor, ExtractionContext, Extractor};
use crate::address::AddressParser;
use crate::model::set_once;

/// Joins the unclaimed lines above the license label.
pub struct AddressExtractor;

impl Extractor for AddressExtractor {
    fn name(&self) -> &'static str {
        "address"
    }

    fn priority(&self) -> u16 {
        30
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let Some(license_idx) = ctx.anchor(Anchor::License) else {
            return Ok(());
        };
        let claimed: Vec<usize> = [Anchor::Date, Anchor::Name, Anchor::Dba, Anchor::Category]
            .into_iter()
            .filter_map(|a| ctx.anchor(a))
            .collect();

        let parts: Vec<&str> = ctx.lines[..license_idx.min(ctx.lines.len())]
            .iter()
            .enumerate()
            .filter(|(idx, _)| !claimed.contains(idx))
            .map(|(_, line)| line.as_str())
            .collect();

        let address = parts.join(", ");
        set_once(&mut ctx.record.address, &address);
        Ok(())
    }
}

/// Fills the address components through an `AddressParser`.
pub struct AddressDetailsExtractor {
    parser: Arc<dyn AddressParser>,
}

impl AddressDetailsExtractor {
    pub fn new(parser: Arc<dyn AddressParser>) -> Self {
        AddressDetailsExtractor { parser }
    }
}

impl Extractor for AddressDetailsExtractor {
    fn name(&self) -> &'static str {
        "address_details"
    }

    fn priority(&self) -> u16 {
        35
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let Some(address) = ctx.record.address.as_deref() else {
            return Ok(());
        };
        let parts = self.parser.parse(address);
        let record = &mut ctx.record;
        for (slot, value) in [
            (&mut record.street_number, parts.street_number),
            (&mut record.street_name, parts.full_street_name),
            (&mut record.city, parts.neighborhood),
            (&mut record.state, parts.state),
            (&mut record.zipcode, parts.zipcode),
        ] {
            if let Some(value) = value {
                set_once(slot, &value);
            }
        }
        Ok(())
    }
}
