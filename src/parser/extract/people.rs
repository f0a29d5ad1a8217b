use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::{ExtractionContext, Extractor};
use crate::model::set_once;

static MANAGER_TRAILING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^,.\n]+?)\s*,\s*Manager\.").unwrap());
static MANAGER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Manager\s*:\s*(.*)").unwrap());
static ATTORNEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Attorney\s*:\s*(.*)").unwrap());

/// Manager and attorney names; first non-empty match wins per field.
pub struct PeopleExtractor;

impl Extractor for PeopleExtractor {
    fn name(&self) -> &'static str {
        "people"
    }

    fn priority(&self) -> u16 {
        40
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        let record = &mut ctx.record;
        for line in &ctx.lines {
            if record.manager.is_none() {
                if let Some(c) = MANAGER_TRAILING_RE.captures(line) {
                    set_once(&mut record.manager, &c[1]);
                } else if let Some(c) = MANAGER_LABEL_RE.captures(line) {
                    let name = c[1].split('.').next().unwrap_or("");
                    set_once(&mut record.manager, name);
                }
            }
            if let Some(c) = ATTORNEY_RE.captures(line) {
                set_once(&mut record.attorney, &c[1]);
            }
        }
        Ok(())
    }
}
