use anyhow::Result;

use super::{Anchor, ExtractionContext, Extractor};
use crate::model::set_once;

/// Free-text narrative from the category line up to the first label or
/// status line.
pub struct DetailsExtractor;

impl Extractor for DetailsExtractor {
    fn name(&self) -> &'static str {
        "details"
    }

    fn priority(&self) -> u16 {
        70
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let Some(start) = ctx.anchor(Anchor::Category) else {
            return Ok(());
        };
        let status_detail = ctx.record.status_detail.as_deref();
        let narrative: Vec<&str> = ctx.lines[start..]
            .iter()
            .map(String::as_str)
            .take_while(|line| {
                !line.starts_with("Manager:") && !line.starts_with("Attorney:") && Some(*line) != status_detail
            })
            .collect();

        let details = narrative.join(" ");
        set_once(&mut ctx.record.details, &details);
        Ok(())
    }
}
