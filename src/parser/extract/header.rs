use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::{Anchor, ExtractionContext, Extractor};
use crate::model::set_once;

static ENUMERATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[\d.\-)]+\s*").unwrap());

/// Minutes date from the synthesized `Date:` line, business name from the
/// enumerated line after it.
pub struct HeaderExtractor;

impl Extractor for HeaderExtractor {
    fn name(&self) -> &'static str {
        "header"
    }

    fn priority(&self) -> u16 {
        10
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let Some(first) = ctx.lines.first() else {
            return Ok(());
        };

        let name_idx = match first.strip_prefix("Date:") {
            Some(value) => {
                let value = value.trim().to_string();
                if !value.eq_ignore_ascii_case("null") {
                    set_once(&mut ctx.record.minutes_date, &value);
                }
                ctx.set_anchor(Anchor::Date, 0);
                1
            }
            None => 0,
        };

        if let Some(line) = ctx.lines.get(name_idx) {
            let name = ENUMERATION_RE.replace(line, "").trim().to_string();
            set_once(&mut ctx.record.business_name, &name);
            ctx.set_anchor(Anchor::Name, name_idx);
        }
        Ok(())
    }
}
