//! Document-specific text patches applied at fixed pipeline checkpoints.
//!
//! Rules are static data. Every effect is an idempotent text transform, so a
//! rule applied to already-corrected text leaves it unchanged.

mod rules;

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::RuleError;
use crate::parser::chunks::Chunk;
use crate::source::Line;

pub use rules::BUILTIN_RULES;

static PAREN_ENUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\s*\d+)\)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Checkpoint {
    PostLines,
    PostSection,
    PostChunks,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PostLines => "post_lines",
            Self::PostSection => "post_section",
            Self::PostChunks => "post_chunks",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Document id (file name) contains the fragment.
    DocumentId(&'static str),
    /// Some line of the checkpoint state contains the text.
    Contains(&'static str),
}

impl Predicate {
    fn matches<T: TextLine>(&self, doc_id: &str, lines: &[T]) -> bool {
        match self {
            Self::DocumentId(fragment) => doc_id.contains(fragment),
            Self::Contains(needle) => lines.iter().any(|l| l.text().contains(needle)),
        }
    }

    /// Whether some document can satisfy both predicates. A text predicate
    /// can hold for any document.
    fn overlaps(&self, other: &Predicate) -> bool {
        match (self, other) {
            (Self::DocumentId(a), Self::DocumentId(b)) => a.contains(b) || b.contains(a),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Substring replacement. A `\n` in `to` splits the line. Lines already
    /// holding `to` are left alone when `to` contains `from`.
    Replace { from: &'static str, to: &'static str },
    /// Inserts `marker` as its own line before each line containing `anchor`,
    /// unless the marker already precedes it.
    InsertBefore { anchor: &'static str, marker: &'static str },
    /// Drops every line whose trimmed text contains one of the phrases.
    RemoveLines { phrases: &'static [&'static str] },
    /// Replaces whole lines by trimmed text, preserving leading indentation.
    ReplaceLines { table: &'static [(&'static str, &'static str)] },
    /// Rewrites a leading `N)` enumeration to `N.`.
    RenumberParenthesized,
    /// Shortens runs of blank lines to at most `max`.
    CollapseBlankLines { max: usize },
}

impl Effect {
    pub fn apply<T: TextLine>(&self, lines: Vec<T>) -> Vec<T> {
        match *self {
            Effect::Replace { from, to } => lines
                .into_iter()
                .flat_map(|line| {
                    let text = line.text();
                    if !text.contains(from) || (to.contains(from) && text.contains(to)) {
                        return vec![line];
                    }
                    let replaced = text.replace(from, to);
                    replaced
                        .split('\n')
                        .map(|part| line.with_text(part.to_string()))
                        .collect()
                })
                .collect(),
            Effect::InsertBefore { anchor, marker } => {
                let mut out: Vec<T> = Vec::with_capacity(lines.len() + 1);
                for line in lines {
                    if line.text().contains(anchor) {
                        let already = out.last().is_some_and(|prev| prev.text().trim() == marker);
                        if !already {
                            out.push(line.with_text(marker.to_string()));
                        }
                    }
                    out.push(line);
                }
                out
            }
            Effect::RemoveLines { phrases } => lines
                .into_iter()
                .filter(|line| {
                    let trimmed = line.text().trim();
                    !phrases.iter().any(|p| trimmed.contains(p))
                })
                .collect(),
            Effect::ReplaceLines { table } => lines
                .into_iter()
                .map(|line| {
                    let text = line.text();
                    let trimmed = text.trim();
                    match table.iter().find(|(key, _)| *key == trimmed) {
                        Some((_, replacement)) => {
                            let indent = &text[..text.len() - text.trim_start().len()];
                            line.with_text(format!("{indent}{replacement}"))
                        }
                        None => line,
                    }
                })
                .collect(),
            Effect::RenumberParenthesized => lines
                .into_iter()
                .map(|line| {
                    if PAREN_ENUM_RE.is_match(line.text()) {
                        let fixed = PAREN_ENUM_RE.replace(line.text(), "$1.").to_string();
                        line.with_text(fixed)
                    } else {
                        line
                    }
                })
                .collect(),
            Effect::CollapseBlankLines { max } => {
                let mut out = Vec::with_capacity(lines.len());
                let mut blanks = 0;
                for line in lines {
                    if line.text().trim().is_empty() {
                        blanks += 1;
                        if blanks > max {
                            continue;
                        }
                    } else {
                        blanks = 0;
                    }
                    out.push(line);
                }
                out
            }
        }
    }

    /// Text the effect keys on; two rules touching the same target for the
    /// same document shadow each other.
    fn targets(&self) -> Vec<&'static str> {
        match *self {
            Effect::Replace { from, .. } => vec![from],
            Effect::InsertBefore { anchor, .. } => vec![anchor],
            Effect::RemoveLines { phrases } => phrases.to_vec(),
            Effect::ReplaceLines { table } => table.iter().map(|(k, _)| *k).collect(),
            Effect::RenumberParenthesized => vec!["<renumber>"],
            Effect::CollapseBlankLines { .. } => vec!["<collapse>"],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorrectionRule {
    pub name: &'static str,
    /// Lower runs first.
    pub priority: u16,
    pub checkpoint: Checkpoint,
    pub predicate: Predicate,
    pub effects: &'static [Effect],
}

impl CorrectionRule {
    pub fn apply<T: TextLine>(&self, lines: Vec<T>) -> Vec<T> {
        self.effects.iter().fold(lines, |acc, effect| effect.apply(acc))
    }
}

/// Anything with editable text: raw `Line`s and plain chunk strings.
pub trait TextLine: Clone {
    fn text(&self) -> &str;
    fn with_text(&self, text: String) -> Self;
}

impl TextLine for String {
    fn text(&self) -> &str {
        self
    }

    fn with_text(&self, text: String) -> Self {
        text
    }
}

impl TextLine for Line {
    fn text(&self) -> &str {
        &self.text
    }

    fn with_text(&self, text: String) -> Self {
        Line {
            text,
            emphasis: self.emphasis,
            page: self.page,
        }
    }
}

/// Validated, priority-ordered set of correction rules.
#[derive(Debug, Clone)]
pub struct CorrectionRegistry {
    rules: Vec<CorrectionRule>,
}

impl CorrectionRegistry {
    pub fn new(rules: &[CorrectionRule]) -> Result<Self, RuleError> {
        let mut names = HashSet::new();
        for rule in rules {
            if !names.insert(rule.name) {
                return Err(RuleError::DuplicateName(rule.name));
            }
            if rule.effects.is_empty() {
                return Err(RuleError::NoEffects(rule.name));
            }
        }

        for (i, first) in rules.iter().enumerate() {
            for second in &rules[i + 1..] {
                if first.checkpoint != second.checkpoint || !first.predicate.overlaps(&second.predicate) {
                    continue;
                }
                let first_targets: HashSet<&str> =
                    first.effects.iter().flat_map(Effect::targets).collect();
                if let Some(target) = second
                    .effects
                    .iter()
                    .flat_map(Effect::targets)
                    .find(|t| first_targets.contains(t))
                {
                    return Err(RuleError::Shadowed {
                        first: first.name,
                        second: second.name,
                        checkpoint: first.checkpoint,
                        target,
                    });
                }
            }
        }

        let mut rules = rules.to_vec();
        rules.sort_by_key(|r| (r.checkpoint, r.priority, r.name));
        Ok(CorrectionRegistry { rules })
    }

    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(BUILTIN_RULES)
    }

    pub fn rules(&self) -> &[CorrectionRule] {
        &self.rules
    }

    /// Runs every rule registered for `checkpoint` whose predicate matches.
    pub fn apply<T: TextLine>(&self, checkpoint: Checkpoint, doc_id: &str, mut lines: Vec<T>) -> Vec<T> {
        for rule in self.rules.iter().filter(|r| r.checkpoint == checkpoint) {
            if rule.predicate.matches(doc_id, &lines) {
                debug!(rule = rule.name, doc = doc_id, checkpoint = %checkpoint, "applying correction");
                lines = rule.apply(lines);
            }
        }
        lines
    }

    /// `PostChunks` rules, evaluated per chunk.
    pub fn apply_chunks(&self, doc_id: &str, chunks: &mut [Chunk]) {
        for chunk in chunks.iter_mut() {
            let lines = std::mem::take(&mut chunk.lines);
            chunk.lines = self.apply(Checkpoint::PostChunks, doc_id, lines);
        }
    }
}
