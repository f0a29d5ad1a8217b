use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::{Anchor, ExtractionContext, Extractor};
use crate::model::set_once;

static DBA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:D/B/A|Doing business as|DBA)\s*:\s*(.*)").unwrap());

pub struct DbaExtractor;

impl Extractor for DbaExtractor {
    fn name(&self) -> &'static str {
        "dba"
    }

    fn priority(&self) -> u16 {
        25
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let found = ctx
            .lines
            .iter()
            .enumerate()
            .find_map(|(idx, line)| DBA_RE.captures(line).map(|c| (idx, c[1].trim().to_string())));

        if let Some((idx, dba)) = found {
            set_once(&mut ctx.record.dba_name, &dba);
            ctx.set_anchor(Anchor::Dba, idx);
        }
        Ok(())
    }
}
