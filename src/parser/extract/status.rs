use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::{ExtractionContext, Extractor};
use crate::model::{set_once, Status};

/// Outcome vocabulary of the board's decisions.
pub const STATUS_KEYWORDS: &[&str] = &[
    "Granted",
    "Deferred",
    "RE-SCHEDULED",
    "RESCHEDULED",
    "Continued",
    "Withdrawn",
    "No Violation",
    "Failed to Appear",
    "Dismissed",
    "No Action Taken",
    "Defer",
    "Dismiss",
    "Revised",
    "Corrected",
    "Rejected",
    "Denied",
];

/// Number of trailing lines searched for an outcome.
const TAIL_LINES: usize = 7;

static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<String> = STATUS_KEYWORDS.iter().map(|kw| regex::escape(kw)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).unwrap()
});

pub struct StatusExtractor;

impl Extractor for StatusExtractor {
    fn name(&self) -> &'static str {
        "status"
    }

    fn priority(&self) -> u16 {
        60
    }

    fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
        if ctx.record.status_detail.is_some() {
            return Ok(());
        }
        let start = ctx.lines.len().saturating_sub(TAIL_LINES);
        let Some(line) = ctx.lines[start..].iter().rev().find(|l| STATUS_RE.is_match(l)) else {
            return Ok(());
        };
        let detail = line.trim().to_string();
        ctx.record.status = Status::from_detail(&detail);
        set_once(&mut ctx.record.status_detail, &detail);
        Ok(())
    }
}
