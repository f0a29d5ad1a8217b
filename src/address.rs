use std::sync::LazyLock;

use regex::Regex;

pub const NEIGHBORHOODS: &[&str] = &[
    "Allston",
    "Boston",
    "Brighton",
    "Charlestown",
    "Chestnut Hill",
    "Dorchester",
    "East Boston",
    "Hyde Park",
    "Jamaica Plain",
    "Mattapan",
    "Mission Hill",
    "Quincy",
    "Roslindale",
    "Roxbury",
    "South Boston",
    "West Roxbury",
    "Back Bay",
];

static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{5})(?:-\d{4})?\b").unwrap());
static STATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(MA|Mass\.|Massachusetts)\b").unwrap());
static STREET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[A-Za-z]?(?:\s*-\s*\d+[A-Za-z]?)?)\s+([A-Za-z0-9].*?)\.?$").unwrap());

/// Longest names first so "East Boston" wins over "Boston".
static NEIGHBORHOOD_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let mut names: Vec<&'static str> = NEIGHBORHOODS.to_vec();
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));
    names
        .into_iter()
        .map(|n| (n, Regex::new(&format!(r"(?i)\b{}\b", regex::escape(n))).unwrap()))
        .collect()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub street_number: Option<String>,
    pub full_street_name: Option<String>,
    pub neighborhood: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

/// Decomposes a raw address string. Implementations never fail: input they
/// cannot read yields an all-absent `AddressParts`.
pub trait AddressParser: Send + Sync {
    fn parse(&self, raw: &str) -> AddressParts;
}

/// Local pattern-based parser for Boston-area addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternAddressParser;

impl AddressParser for PatternAddressParser {
    fn parse(&self, raw: &str) -> AddressParts {
        let segments: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

        let mut parts = AddressParts::default();
        let mut street_seg = None;
        for (i, seg) in segments.iter().enumerate() {
            if let Some(caps) = STREET_RE.captures(seg) {
                parts.street_number = Some(caps[1].replace(' ', ""));
                parts.full_street_name = Some(caps[2].trim().to_string());
                street_seg = Some(i);
                break;
            }
        }

        let tail = segments
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != street_seg)
            .map(|(_, s)| *s)
            .collect::<Vec<_>>()
            .join(", ");

        parts.neighborhood = NEIGHBORHOOD_RES
            .iter()
            .find(|(_, re)| re.is_match(&tail))
            .map(|(name, _)| name.to_string());
        if STATE_RE.is_match(&tail) {
            parts.state = Some("MA".to_string());
        }
        parts.zipcode = ZIP_RE
            .captures_iter(&tail)
            .last()
            .map(|c| c[1].to_string());

        parts
    }
}
