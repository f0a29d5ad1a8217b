pub mod records;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::address::NEIGHBORHOODS;
use crate::model::set_once;
use crate::source::Line;

pub use records::into_records;

const SECTION_TRIGGER: &str =
    "the board deferred deliberation on the following applications for new alcoholic beverages licenses";

static GROUP_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(02118|02119|02121|02122|02124|02125|02126|02128|02129|02130|02131|02132|02136|oak square|all others)$",
    )
    .unwrap()
});
static BUSINESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(llc|l\.l\.c\.|corp\.?|corporation|inc\.?|co|company|ltd\.?|club)\b").unwrap());
static DBA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*doing\s+business\s+as:\s*(.+?)\s*$").unwrap());
static ADDR1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\d+.*\s+(St|Ave|Blvd|Rd|Square)\.?$").unwrap());
static ADDR2_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<String> = NEIGHBORHOODS.iter().map(|n| regex::escape(n)).collect();
    Regex::new(&format!(r"(?i)^\s*(?:{}),?\s*MA\b.*$", names.join("|"))).unwrap()
});
static LICENSE_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:Common\s+Victualler.*?License|Club All-Alcoholic Beverages License|General On-Premise All Alcoholic Beverages License)\s*$",
    )
    .unwrap()
});
static BOARD_ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(",
        r"the board\b.*\b(voted|vote|grant|approve|deny|defer|deferred|denied|acknowledge|approved)\b",
        r"|will hold\b.*\bactive status\b",
        r"|deferred deliberation\b",
        r"|wines\s+and\s+malt\s+beverages\b",
        r"|all\s+alcoholic\s+beverages\b",
        r"|licenses?\b",
        r"|zip\s*code\s*restricted\b",
        r")"
    ))
    .unwrap()
});
static END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-+\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    SectionTrigger,
    GroupHeader,
    RecordStart,
    Detail,
    Status,
    End,
}

/// Trimmed text with zero-width spaces removed.
fn clean(text: &str) -> String {
    text.replace('\u{200b}', "").trim().to_string()
}

pub fn classify(line: &Line) -> Option<LineClass> {
    let normalized = clean(&line.text).to_lowercase();
    if normalized.contains(SECTION_TRIGGER) {
        Some(LineClass::SectionTrigger)
    } else if END_RE.is_match(&normalized) {
        Some(LineClass::End)
    } else if line.emphasis && GROUP_HEADER_RE.is_match(&normalized) {
        Some(LineClass::GroupHeader)
    } else if line.emphasis && BUSINESS_RE.is_match(&normalized) {
        Some(LineClass::RecordStart)
    } else if [&*DBA_RE, &*ADDR1_RE, &*ADDR2_RE, &*LICENSE_TYPE_RE]
        .iter()
        .any(|re| re.is_match(&normalized))
    {
        Some(LineClass::Detail)
    } else if line.emphasis && BOARD_ACTION_RE.is_match(&normalized) {
        Some(LineClass::Status)
    } else {
        None
    }
}

/// One business in a deferred-deliberation listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingEntry {
    /// Zip code or named catch-all the entry was listed under.
    pub group: String,
    pub business_name: String,
    pub dba: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub license_type: Option<String>,
    pub status_lines: Vec<String>,
}

impl ListingEntry {
    pub fn key(&self) -> String {
        format!("{}/{}", self.group, self.business_name)
    }

    fn fill_detail(&mut self, text: &str) {
        if let Some(caps) = DBA_RE.captures(text) {
            set_once(&mut self.dba, &caps[1]);
        } else if ADDR1_RE.is_match(text) {
            set_once(&mut self.address_line1, text);
        } else if ADDR2_RE.is_match(text) {
            set_once(&mut self.address_line2, text);
        } else if LICENSE_TYPE_RE.is_match(text) {
            set_once(&mut self.license_type, text);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub section_found: bool,
    pub entries: Vec<ListingEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingSection,
    InSection,
}

#[derive(Debug)]
struct ClassifierState {
    phase: Phase,
    group: Option<String>,
    /// Index into the entry list.
    current: Option<usize>,
    capturing_tail: bool,
}

/// Single pass over emphasis-annotated lines, assembling listing entries.
pub fn classify_listing(lines: &[Line]) -> Listing {
    let mut state = ClassifierState {
        phase: Phase::AwaitingSection,
        group: None,
        current: None,
        capturing_tail: false,
    };
    let mut entries: Vec<ListingEntry> = Vec::new();

    for line in lines {
        let class = classify(line);
        let text = clean(&line.text);

        if class == Some(LineClass::SectionTrigger) {
            state.phase = Phase::InSection;
        }
        if state.phase == Phase::AwaitingSection {
            continue;
        }
        if class == Some(LineClass::End) {
            debug!(page = line.page, "end of listing");
            break;
        }

        if state.capturing_tail {
            let ends_tail = match class {
                Some(LineClass::GroupHeader) => true,
                Some(LineClass::RecordStart) => state.group.is_some(),
                _ => false,
            };
            if !ends_tail {
                // repeated trigger lines are not narrative
                if class != Some(LineClass::SectionTrigger) {
                    if let Some(idx) = state.current {
                        entries[idx].status_lines.push(text);
                    }
                }
                continue;
            }
            state.capturing_tail = false;
        }

        let Some(class) = class else {
            continue;
        };

        match class {
            LineClass::GroupHeader => {
                state.group = Some(text);
                state.current = None;
            }
            LineClass::RecordStart => {
                if let Some(group) = &state.group {
                    entries.push(ListingEntry {
                        group: group.clone(),
                        business_name: text,
                        ..ListingEntry::default()
                    });
                    state.current = Some(entries.len() - 1);
                    debug!(page = line.page, entry = %entries[entries.len() - 1].key(), "listing entry");
                }
            }
            LineClass::Detail if !line.emphasis => {
                if let Some(idx) = state.current {
                    entries[idx].fill_detail(&text);
                }
            }
            LineClass::Status if state.group.is_some() => {
                if let Some(idx) = state.current {
                    entries[idx].status_lines.push(text);
                }
                state.capturing_tail = true;
            }
            _ => {}
        }
    }

    Listing {
        section_found: state.phase == Phase::InSection,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(t: &str) -> Line {
        Line::plain(t)
    }

    fn bold(t: &str) -> Line {
        Line::emphasized(t, 1)
    }

    const TRIGGER: &str =
        "The Board deferred deliberation on the following applications for new alcoholic beverages licenses:";

    #[test]
    fn classes() {
        assert_eq!(classify(&plain(TRIGGER)), Some(LineClass::SectionTrigger));
        assert_eq!(classify(&bold("02128")), Some(LineClass::GroupHeader));
        assert_eq!(classify(&plain("02128")), None);
        assert_eq!(classify(&bold("Oak Square")), Some(LineClass::GroupHeader));
        assert_eq!(classify(&bold("Tresca Holdings, LLC")), Some(LineClass::RecordStart));
        assert_eq!(classify(&plain("Tresca Holdings, LLC")), None);
        assert_eq!(classify(&plain("Doing business as: Tresca")), Some(LineClass::Detail));
        assert_eq!(classify(&plain("233 Hanover St.")), Some(LineClass::Detail));
        assert_eq!(classify(&plain("East Boston, MA 02128")), Some(LineClass::Detail));
        assert_eq!(
            classify(&plain("Common Victualler 7 Day Wines and Malt Beverages License")),
            Some(LineClass::Detail)
        );
        assert_eq!(
            classify(&bold("The Board voted to grant the license.")),
            Some(LineClass::Status)
        );
        assert_eq!(classify(&plain("-----")), Some(LineClass::End));
        assert_eq!(classify(&plain("Some narrative")), None);
    }

    fn listing() -> Vec<Line> {
        vec![
            bold("Tresca Holdings, LLC"),
            plain(TRIGGER),
            bold("02128"),
            bold("Tresca Holdings, LLC"),
            plain("Doing business as: Tresca"),
            plain("233 Meridian St."),
            plain("East Boston, MA 02128"),
            plain("Common Victualler 7 Day All Alcoholic Beverages License"),
            bold("The Board voted to grant the license."),
            plain("Closing hour 11:00 PM."),
            plain("Manager: Ana Silva"),
            bold("Harbor Foods Inc."),
            plain("Doing business as: Harbor"),
            bold("All Others"),
            bold("Corner Club"),
            plain("10 Main St."),
        ]
    }

    #[test]
    fn ignores_lines_before_trigger() {
        let l = classify_listing(&listing());
        assert!(l.section_found);
        assert_eq!(l.entries.len(), 3);
        assert_eq!(l.entries[0].group, "02128");
    }

    #[test]
    fn fills_details() {
        let l = classify_listing(&listing());
        let e = &l.entries[0];
        assert_eq!(e.business_name, "Tresca Holdings, LLC");
        assert_eq!(e.dba.as_deref(), Some("Tresca"));
        assert_eq!(e.address_line1.as_deref(), Some("233 Meridian St."));
        assert_eq!(e.address_line2.as_deref(), Some("East Boston, MA 02128"));
        assert_eq!(
            e.license_type.as_deref(),
            Some("Common Victualler 7 Day All Alcoholic Beverages License")
        );
        assert_eq!(e.key(), "02128/Tresca Holdings, LLC");
    }

    #[test]
    fn tail_capture() {
        let l = classify_listing(&listing());
        assert_eq!(
            l.entries[0].status_lines,
            vec!["The Board voted to grant the license.", "Closing hour 11:00 PM.", "Manager: Ana Silva"]
        );
        assert_eq!(l.entries[1].business_name, "Harbor Foods Inc.");
        assert_eq!(l.entries[1].dba.as_deref(), Some("Harbor"));
        assert!(l.entries[1].status_lines.is_empty());
    }

    #[test]
    fn group_header_ends_tail() {
        let lines = vec![
            plain(TRIGGER),
            bold("02130"),
            bold("Pond Side Co"),
            bold("The Board voted to defer the application."),
            plain("Pending zoning review."),
            bold("02131"),
            bold("Roslindale Eats LLC"),
        ];
        let l = classify_listing(&lines);
        assert_eq!(l.entries.len(), 2);
        assert_eq!(l.entries[0].status_lines.len(), 2);
        assert_eq!(l.entries[1].group, "02131");
    }

    #[test]
    fn repeated_trigger_stays_out_of_tail() {
        let lines = vec![
            plain(TRIGGER),
            bold("02130"),
            bold("Pond Side Co"),
            bold("The Board voted to defer the application."),
            plain(TRIGGER),
            plain("Pending zoning review."),
        ];
        let l = classify_listing(&lines);
        assert_eq!(
            l.entries[0].status_lines,
            vec!["The Board voted to defer the application.", "Pending zoning review."]
        );
    }

    #[test]
    fn end_marker_stops_scan() {
        let lines = vec![plain(TRIGGER), bold("02130"), bold("A Co"), plain("---"), bold("B Co")];
        let l = classify_listing(&lines);
        assert_eq!(l.entries.len(), 1);
    }

    #[test]
    fn no_group_no_records() {
        let lines = vec![plain(TRIGGER), bold("Lonely LLC"), plain("Doing business as: Lonely")];
        let l = classify_listing(&lines);
        assert!(l.section_found);
        assert!(l.entries.is_empty());
    }

    #[test]
    fn missing_trigger() {
        let l = classify_listing(&[bold("02128"), bold("Tresca Holdings, LLC")]);
        assert!(!l.section_found);
        assert!(l.entries.is_empty());
    }
}
