use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AlcoholType {
    #[serde(rename = "all alcoholic beverages")]
    AllAlcoholic,
    #[serde(rename = "wines and malt beverages")]
    WinesAndMalt,
}

const ALL_ALCOHOLIC_KEYWORDS: &[&str] = &["all alcoholic", "common victualler", "all alcohol", "allalcohol"];
const WINES_AND_MALT_KEYWORDS: &[&str] = &["malt", "wine"];

impl AlcoholType {
    /// Buckets a license-category line. The all-alcoholic keywords win over
    /// wine/malt when both appear.
    pub fn classify(line: &str) -> Option<Self> {
        let normalized = line
            .to_lowercase()
            .replace(['-', '_'], " ")
            .replace('&', "and");
        if ALL_ALCOHOLIC_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
            Some(AlcoholType::AllAlcoholic)
        } else if WINES_AND_MALT_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
            Some(AlcoholType::WinesAndMalt)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllAlcoholic => "all alcoholic beverages",
            Self::WinesAndMalt => "wines and malt beverages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Granted,
    Rejected,
    Rescheduled,
    Withdrawn,
    Continued,
    Deferred,
}

impl Status {
    /// Canonical status for a board-action line, checked in a fixed order.
    pub fn from_detail(line: &str) -> Option<Self> {
        let lower = line.to_lowercase();
        if lower.contains("granted") {
            Some(Status::Granted)
        } else if lower.contains("rejected") {
            Some(Status::Rejected)
        } else if lower.contains("rescheduled") || lower.contains("re-scheduled") {
            Some(Status::Rescheduled)
        } else if lower.contains("withdrawn") {
            Some(Status::Withdrawn)
        } else if lower.contains("continued") {
            Some(Status::Continued)
        } else if lower.contains("defer") {
            Some(Status::Deferred)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Rejected => "rejected",
            Self::Rescheduled => "rescheduled",
            Self::Withdrawn => "withdrawn",
            Self::Continued => "continued",
            Self::Deferred => "deferred",
        }
    }
}

/// One structured license record. Absent fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub minutes_date: Option<String>,
    pub license_number: Option<String>,
    pub business_name: Option<String>,
    pub dba_name: Option<String>,
    pub address: Option<String>,
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub alcohol_type: Option<AlcoholType>,
    pub manager: Option<String>,
    pub attorney: Option<String>,
    pub status: Option<Status>,
    pub status_detail: Option<String>,
    pub details: Option<String>,
    pub entity_number: Option<String>,
    pub file_name: Option<String>,
}

impl Record {
    /// Empty record for a chunk keyed `<document-id>_<ordinal>`.
    pub fn for_key(key: &str) -> Self {
        let (file_name, entity_number) = match key.rsplit_once('_') {
            Some((file, n)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => {
                (file.to_string(), Some(n.to_string()))
            }
            _ => (key.to_string(), None),
        };
        Record {
            entity_number,
            file_name: Some(file_name),
            ..Record::default()
        }
    }
}

/// Sets `slot` only when it is still empty and `value` has content.
pub fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        let value = value.trim();
        if !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }
}
