use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::{Anchor, ExtractionContext, Extractor};
use crate::model::AlcoholType;

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(Holder of|Has applied for)").unwrap());

/// Alcohol bucket from the "Holder of" / "Has applied for" line. The line is
/// anchored even when it names no alcohol category.
pub struct CategoryExtractor;

impl Extractor for CategoryExtractor {
    fn name(&self) -> &'static str {
        "category"
    }

    fn priority(&self) -> u16 {
        26
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let Some(idx) = ctx.lines.iter().position(|l| CATEGORY_RE.is_match(l)) else {
            return Ok(());
        };
        if ctx.record.alcohol_type.is_none() {
            ctx.record.alcohol_type = AlcoholType::classify(&ctx.lines[idx]);
        }
        ctx.set_anchor(Anchor::Category, idx);
        Ok(())
    }
}
