use crate::source::Line;

const START_MARKERS: &[&str] = &[
    "Transactional Hearings,",
    "The Board held a transactional hearing on",
    "Transactional Hearings:",
    "Transactional Hearing",
    "Transactional Hearing:",
    "Transactional Hearing Agenda",
    "Hearing Date:",
];

const STOP_MARKERS: &[&str] = &[
    "Old & New Business",
    "OLD AND NEW BUSINESS",
    "Old and New Business",
    "Non Hearing Common Victualler Transactions",
    "Non-Hearing Common Transactions",
    "Non-Hearing Transactions",
    "Non-Hearing Transactional:",
    "Non-Hearing Transactional Items:",
    "The following are applying for a new Common Victualler License",
    "***FORCE STOP***",
];

/// The transactional-hearing span of a document: start marker line included,
/// stop marker line excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub lines: Vec<Line>,
}

impl Section {
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    NotStarted,
    InSection,
}

/// Single forward pass; scanning ends at the first stop marker and never
/// resumes.
pub fn extract_section(lines: &[Line]) -> Option<Section> {
    let mut state = ScanState::NotStarted;
    let mut extracted = Vec::new();

    for line in lines {
        let lower = line.text.trim().to_lowercase();
        match state {
            ScanState::NotStarted => {
                if matches_any(&lower, START_MARKERS) {
                    state = ScanState::InSection;
                    extracted.push(line.clone());
                }
            }
            ScanState::InSection => {
                if matches_any(&lower, STOP_MARKERS) {
                    break;
                }
                extracted.push(line.clone());
            }
        }
    }

    if extracted.is_empty() {
        None
    } else {
        Some(Section { lines: extracted })
    }
}

fn matches_any(lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| lower.contains(&m.to_lowercase()))
}
