use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub emphasis: bool,
    pub page: u32,
}

impl Line {
    pub fn plain(text: impl Into<String>) -> Self {
        Line {
            text: text.into(),
            emphasis: false,
            page: 0,
        }
    }

    pub fn emphasized(text: impl Into<String>, page: u32) -> Self {
        Line {
            text: text.into(),
            emphasis: true,
            page,
        }
    }
}

/// One input document: its identity (file name) and its line stream.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub lines: Vec<Line>,
    /// True when the source carried emphasis metadata, which routes the
    /// document to the layout classifier.
    pub has_emphasis: bool,
}

impl Document {
    pub fn from_text(id: impl Into<String>, raw: &str) -> Self {
        Document {
            id: id.into(),
            lines: lines_from_text(raw),
            has_emphasis: false,
        }
    }

    pub fn from_layout(id: impl Into<String>, lines: Vec<Line>) -> Self {
        Document {
            id: id.into(),
            lines,
            has_emphasis: true,
        }
    }
}

#[derive(Deserialize)]
struct LayoutRow {
    text: String,
    #[serde(default, alias = "is_bold", alias = "emphasis")]
    bold: bool,
    #[serde(default, alias = "page_num")]
    page: u32,
}

const TEXT_EXTENSIONS: &[&str] = &["txt"];
const LAYOUT_EXTENSIONS: &[&str] = &["jsonl"];

pub fn is_supported(path: &Path) -> bool {
    extension(path).is_some_and(|ext| {
        TEXT_EXTENSIONS.contains(&ext.as_str()) || LAYOUT_EXTENSIONS.contains(&ext.as_str())
    })
}

pub fn load(path: &Path) -> Result<Document> {
    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read document: {}", path.display()))?;

    let is_layout = extension(path).is_some_and(|ext| LAYOUT_EXTENSIONS.contains(&ext.as_str()));
    if is_layout {
        let lines = lines_from_jsonl(&raw)
            .with_context(|| format!("failed to parse layout lines: {}", path.display()))?;
        Ok(Document::from_layout(id, lines))
    } else {
        Ok(Document::from_text(id, &raw))
    }
}

/// Plain text: drops underscore rule lines and strips non-ASCII characters.
pub fn lines_from_text(raw: &str) -> Vec<Line> {
    raw.replace("\r\n", "\n")
        .split('\n')
        .filter(|l| !is_rule_line(l))
        .map(|l| Line::plain(strip_non_ascii(l)))
        .collect()
}

/// JSON Lines: one `{"text", "bold", "page"}` object per line. Zero-width
/// spaces are removed and lines left empty are skipped.
pub fn lines_from_jsonl(raw: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (i, row) in raw.lines().enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        let parsed: LayoutRow =
            serde_json::from_str(row).with_context(|| format!("invalid layout row {}", i + 1))?;
        let text = parsed.text.replace('\u{200b}', "").trim().to_string();
        if text.is_empty() {
            continue;
        }
        lines.push(Line {
            text,
            emphasis: parsed.bold,
            page: parsed.page,
        });
    }
    Ok(lines)
}

fn is_rule_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '_')
}

fn strip_non_ascii(line: &str) -> String {
    line.chars().filter(|c| c.is_ascii()).collect()
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_drops_rules_and_non_ascii() {
        let lines = lines_from_text("Caf\u{e9} Inc.\r\n_____\n\nLicense #: LB-1");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Caf Inc.", "", "License #: LB-1"]);
        assert!(lines.iter().all(|l| !l.emphasis));
    }

    #[test]
    fn jsonl_rows() {
        let raw = "{\"text\": \"02118\", \"bold\": true, \"page\": 2}\n\n{\"text\": \"\u{200b}\"}\n{\"text\": \"Boston, MA 02118\", \"is_bold\": false}";
        let lines = lines_from_jsonl(raw).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Line::emphasized("02118", 2));
        assert_eq!(lines[1], Line::plain("Boston, MA 02118"));
    }

    #[test]
    fn jsonl_bad_row_reports_line() {
        let err = lines_from_jsonl("{\"text\": \"ok\"}\nnot json").unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn supported_extensions() {
        assert!(is_supported(Path::new("minutes/voting_minutes_2024-09-26.txt")));
        assert!(is_supported(Path::new("Voting Minutes 7-31-25.JSONL")));
        assert!(!is_supported(Path::new("minutes.pdf")));
    }

    #[test]
    fn load_fixture_text() {
        let doc = load(Path::new("tests/fixtures/voting_minutes_2024-09-26.txt")).unwrap();
        assert_eq!(doc.id, "voting_minutes_2024-09-26.txt");
        assert!(!doc.has_emphasis);
        assert!(!doc.lines.is_empty());
    }
}
