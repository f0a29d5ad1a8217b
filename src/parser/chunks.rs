use std::ops::AddAssign;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::extract::status::STATUS_KEYWORDS;

static CHUNK_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+.+").unwrap());
static BARE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.$").unwrap());
static LICENSE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)license\s*:?\s*#\s*:?").unwrap());

/// Status vocabulary plus "Approved"; a matching line closes a sub-chunk.
static SPLIT_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<String> = STATUS_KEYWORDS
        .iter()
        .chain(&["Approved"])
        .map(|kw| regex::escape(kw))
        .collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).unwrap()
});

static MONTH_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b")
        .unwrap()
});
static SLASH_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());
static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

const MONTHS: &[&str] = &["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];

/// One candidate license mention. `lines[0]` is the synthesized
/// `Date:<value>` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub key: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChunkStats {
    /// Numbered spans found in the section.
    pub candidates: usize,
    pub accepted: usize,
    /// Spans without any license-number label.
    pub discarded: usize,
    /// Spans with several labels that went through the status resplit.
    pub resplit: usize,
    /// Resplit pieces still holding several labels.
    pub ambiguous: usize,
}

impl AddAssign for ChunkStats {
    fn add_assign(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.accepted += other.accepted;
        self.discarded += other.discarded;
        self.resplit += other.resplit;
        self.ambiguous += other.ambiguous;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Chunking {
    pub chunks: Vec<Chunk>,
    pub stats: ChunkStats,
}

/// Repair, split and validate a section into keyed chunks.
pub fn segment(doc_id: &str, section_lines: &[String]) -> Chunking {
    let repaired = repair_headers(section_lines);
    let first_line = repaired
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .unwrap_or("");
    let date_line = date_marker(first_line, doc_id);

    let mut stats = ChunkStats::default();
    let mut accepted: Vec<Vec<String>> = Vec::new();

    for (idx, candidate) in split_chunks(&repaired).into_iter().enumerate() {
        stats.candidates += 1;
        match license_mentions(&candidate) {
            0 => {
                stats.discarded += 1;
                debug!(doc = doc_id, chunk = idx + 1, "skipping chunk without license number");
            }
            1 => accepted.push(candidate),
            n => {
                stats.resplit += 1;
                debug!(doc = doc_id, chunk = idx + 1, mentions = n, "resplitting multi-license chunk");
                for sub in split_by_status(candidate) {
                    match license_mentions(&sub) {
                        0 => {}
                        1 => accepted.push(sub),
                        m => {
                            stats.ambiguous += 1;
                            warn!(
                                doc = doc_id,
                                chunk = idx + 1,
                                mentions = m,
                                "discarding sub-chunk with several license numbers"
                            );
                        }
                    }
                }
            }
        }
    }

    let chunks: Vec<Chunk> = accepted
        .into_iter()
        .enumerate()
        .map(|(i, lines)| {
            let mut body = Vec::with_capacity(lines.len() + 1);
            body.push(date_line.clone());
            body.extend(lines);
            Chunk {
                key: format!("{}_{}", doc_id, i + 1),
                lines: body,
            }
        })
        .collect();
    stats.accepted = chunks.len();

    Chunking { chunks, stats }
}

/// Merges a bare "23." line with the line after it.
pub fn repair_headers(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if BARE_NUMBER_RE.is_match(lines[i].trim()) && i + 1 < lines.len() {
            out.push(format!("{} {}", lines[i].trim_end(), lines[i + 1].trim_start()));
            i += 2;
            continue;
        }
        out.push(lines[i].clone());
        i += 1;
    }
    out
}

/// Lines before the first numbered line belong to no chunk.
pub fn split_chunks(lines: &[String]) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in lines {
        if CHUNK_START_RE.is_match(line) {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current.push(line.clone());
        } else if !current.is_empty() {
            current.push(line.clone());
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub fn license_mentions(lines: &[String]) -> usize {
    LICENSE_LABEL_RE.find_iter(&lines.join("\n")).count()
}

/// A status line closes the sub-chunk it belongs to.
pub fn split_by_status(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut subs = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        let closes = SPLIT_STATUS_RE.is_match(&line);
        current.push(line);
        if closes {
            subs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        subs.push(current);
    }
    subs
}

/// `Date:YYYY-MM-DD` from the section's first line, else from the document
/// id, else `Date:null`.
pub fn date_marker(first_line: &str, doc_id: &str) -> String {
    let from_line = parse_explicit_date(&first_line.replace(':', ""));
    let date = from_line.or_else(|| {
        let found = iso_date(doc_id);
        if found.is_none() {
            warn!(doc = doc_id, line = first_line, "could not determine minutes date");
        }
        found
    });
    match date {
        Some(d) => format!("Date:{}", d.format("%Y-%m-%d")),
        None => "Date:null".to_string(),
    }
}

/// Only dates carrying an explicit year are accepted.
pub fn parse_explicit_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = MONTH_DATE_RE.captures(text) {
        let month = MONTHS.iter().position(|m| caps[1].eq_ignore_ascii_case(m))? as u32 + 1;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(d);
        }
    }
    if let Some(caps) = SLASH_DATE_RE.captures(text) {
        let month = caps[1].parse().ok()?;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(d);
        }
    }
    iso_date(text)
}

pub fn iso_date(text: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE_RE.captures(text)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}
