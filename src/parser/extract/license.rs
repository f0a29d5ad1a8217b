use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::{Anchor, ExtractionContext, Extractor};
use crate::model::set_once;

static LICENSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)License\s*#?\s*:?\s*(?:LB|L)\s*-?\s*(\d+)").unwrap());

/// Normalizes the first license-number label to `LB-<digits>`.
pub struct LicenseNumberExtractor;

impl Extractor for LicenseNumberExtractor {
    fn name(&self) -> &'static str {
        "license_number"
    }

    fn priority(&self) -> u16 {
        20
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let found = ctx
            .lines
            .iter()
            .enumerate()
            .find_map(|(idx, line)| LICENSE_RE.captures(line).map(|c| (idx, format!("LB-{}", &c[1]))));

        if let Some((idx, number)) = found {
            set_once(&mut ctx.record.license_number, &number);
            ctx.set_anchor(Anchor::License, idx);
        }
        Ok(())
    }
}
