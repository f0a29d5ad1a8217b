pub mod address;
pub mod category;
pub mod dba;
pub mod details;
pub mod header;
pub mod license;
pub mod people;
pub mod status;

use std::any::Any;
use std::collections::{BTreeMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::error;

use super::chunks::Chunk;
use crate::address::AddressParser;
use crate::model::Record;

/// Named line indices recorded by one extractor for a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Anchor {
    Date,
    Name,
    License,
    Dba,
    Category,
}

/// Per-chunk scratch space shared by the extractor chain.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    pub key: String,
    /// Trimmed, non-empty chunk lines.
    pub lines: Vec<String>,
    pub anchors: BTreeMap<Anchor, usize>,
    pub record: Record,
}

impl ExtractionContext {
    pub fn new(chunk: &Chunk) -> Self {
        let lines = chunk
            .lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        ExtractionContext {
            key: chunk.key.clone(),
            lines,
            anchors: BTreeMap::new(),
            record: Record::for_key(&chunk.key),
        }
    }

    pub fn anchor(&self, anchor: Anchor) -> Option<usize> {
        self.anchors.get(&anchor).copied()
    }

    /// First writer wins.
    pub fn set_anchor(&mut self, anchor: Anchor, idx: usize) {
        self.anchors.entry(anchor).or_insert(idx);
    }
}

/// One field extractor. A pattern miss is `Ok(())`, never an error.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn priority(&self) -> u16;
    fn run(&self, ctx: &mut ExtractionContext) -> Result<()>;
}

pub struct ExtractionChain {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractionChain {
    pub fn new(mut extractors: Vec<Box<dyn Extractor>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for e in &extractors {
            if !seen.insert(e.priority()) {
                bail!("extractor {} reuses priority {}", e.name(), e.priority());
            }
        }
        extractors.sort_by_key(|e| e.priority());
        Ok(ExtractionChain { extractors })
    }

    pub fn standard(address_parser: Arc<dyn AddressParser>) -> Result<Self> {
        Self::new(vec![
            Box::new(header::HeaderExtractor),
            Box::new(license::LicenseNumberExtractor),
            Box::new(dba::DbaExtractor),
            Box::new(category::CategoryExtractor),
            Box::new(address::AddressExtractor),
            Box::new(address::AddressDetailsExtractor::new(address_parser)),
            Box::new(people::PeopleExtractor),
            Box::new(status::StatusExtractor),
            Box::new(details::DetailsExtractor),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Runs every extractor; one that errors or panics is logged and skipped.
    pub fn run(&self, ctx: &mut ExtractionContext) {
        for extractor in &self.extractors {
            match panic::catch_unwind(AssertUnwindSafe(|| extractor.run(ctx))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(
                    chunk = %ctx.key,
                    extractor = extractor.name(),
                    error = %err,
                    "extractor failed"
                ),
                Err(payload) => error!(
                    chunk = %ctx.key,
                    extractor = extractor.name(),
                    error = panic_message(&*payload),
                    "extractor panicked"
                ),
            }
        }
    }

    pub fn extract(&self, chunk: &Chunk) -> Record {
        let mut ctx = ExtractionContext::new(chunk);
        self.run(&mut ctx);
        ctx.record
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ctx;
    use super::*;
    use crate::address::PatternAddressParser;
    use crate::model::{AlcoholType, Status};

    struct Failing;

    impl Extractor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn priority(&self) -> u16 {
            15
        }
        fn run(&self, _ctx: &mut ExtractionContext) -> Result<()> {
            bail!("boom")
        }
    }

    struct OutOfBounds;

    impl Extractor for OutOfBounds {
        fn name(&self) -> &'static str {
            "out_of_bounds"
        }
        fn priority(&self) -> u16 {
            15
        }
        fn run(&self, ctx: &mut ExtractionContext) -> Result<()> {
            let line = &ctx.lines[999];
            ctx.record.details = Some(line.clone());
            Ok(())
        }
    }

    fn chain() -> ExtractionChain {
        ExtractionChain::standard(Arc::new(PatternAddressParser)).unwrap()
    }

    const CHUNK: &[&str] = &[
        "Date:2024-09-26",
        "23. Locale, Inc.",
        "Doing business as: Locale",
        "",
        "  417 Hanover St.  ",
        "Boston, MA 02113",
        "License #: LB-12345",
        "Has applied for a Common Victualler 7-Day All Alcoholic Beverages License",
        "to be exercised on the premises.",
        "Closing hour 11:00 PM.",
        "Maria Russo, Manager.",
        "Attorney: Jane Doe",
        "The license application is hereby Granted.",
    ];

    #[test]
    fn order_is_by_priority() {
        assert_eq!(
            chain().names(),
            vec!["header", "license_number", "dba", "category", "address", "address_details", "people", "status", "details"]
        );
    }

    #[test]
    fn full_chunk() {
        let mut c = ctx(CHUNK);
        chain().run(&mut c);
        let r = c.record;
        assert_eq!(r.minutes_date.as_deref(), Some("2024-09-26"));
        assert_eq!(r.business_name.as_deref(), Some("Locale, Inc."));
        assert_eq!(r.dba_name.as_deref(), Some("Locale"));
        assert_eq!(r.license_number.as_deref(), Some("LB-12345"));
        assert_eq!(r.address.as_deref(), Some("417 Hanover St., Boston, MA 02113"));
        assert_eq!(r.street_number.as_deref(), Some("417"));
        assert_eq!(r.street_name.as_deref(), Some("Hanover St"));
        assert_eq!(r.city.as_deref(), Some("Boston"));
        assert_eq!(r.state.as_deref(), Some("MA"));
        assert_eq!(r.zipcode.as_deref(), Some("02113"));
        assert_eq!(r.alcohol_type, Some(AlcoholType::AllAlcoholic));
        assert_eq!(r.manager.as_deref(), Some("Maria Russo"));
        assert_eq!(r.attorney.as_deref(), Some("Jane Doe"));
        assert_eq!(r.status, Some(Status::Granted));
        assert_eq!(r.status_detail.as_deref(), Some("The license application is hereby Granted."));
        assert_eq!(
            r.details.as_deref(),
            Some("Has applied for a Common Victualler 7-Day All Alcoholic Beverages License to be exercised on the premises. Closing hour 11:00 PM. Maria Russo, Manager.")
        );
        assert_eq!(r.entity_number.as_deref(), Some("3"));
        assert_eq!(r.file_name.as_deref(), Some("voting_minutes_2024-09-26.txt"));
    }

    #[test]
    fn rerun_changes_nothing() {
        let chain = chain();
        let mut c = ctx(CHUNK);
        chain.run(&mut c);
        let first = c.record.clone();
        let anchors = c.anchors.clone();
        chain.run(&mut c);
        assert_eq!(c.record, first);
        assert_eq!(c.anchors, anchors);
    }

    #[test]
    fn rerun_after_edit_keeps_populated_fields() {
        let chain = chain();
        let mut c = ctx(CHUNK);
        chain.run(&mut c);
        c.lines[1] = "99. Someone Else, LLC".into();
        c.lines[5] = "License #: LB-999".into();
        chain.run(&mut c);
        assert_eq!(c.record.business_name.as_deref(), Some("Locale, Inc."));
        assert_eq!(c.record.license_number.as_deref(), Some("LB-12345"));
    }

    #[test]
    fn failing_extractor_does_not_stop_chain() {
        let chain = ExtractionChain::new(vec![
            Box::new(Failing),
            Box::new(header::HeaderExtractor),
            Box::new(license::LicenseNumberExtractor),
        ])
        .unwrap();
        let mut c = ctx(CHUNK);
        chain.run(&mut c);
        assert_eq!(c.record.business_name.as_deref(), Some("Locale, Inc."));
        assert_eq!(c.record.license_number.as_deref(), Some("LB-12345"));
    }

    #[test]
    fn panicking_extractor_does_not_stop_chain() {
        let chain = ExtractionChain::new(vec![
            Box::new(header::HeaderExtractor),
            Box::new(OutOfBounds),
            Box::new(license::LicenseNumberExtractor),
            Box::new(status::StatusExtractor),
        ])
        .unwrap();
        let record = chain.extract(&Chunk {
            key: "minutes.txt_1".into(),
            lines: vec!["1. Foo, LLC".into(), "License #: LB-1".into(), "Granted.".into()],
        });
        assert_eq!(record.business_name.as_deref(), Some("Foo, LLC"));
        assert_eq!(record.license_number.as_deref(), Some("LB-1"));
        assert_eq!(record.status, Some(Status::Granted));
        assert!(record.details.is_none());
    }

    #[test]
    fn duplicate_priorities_rejected() {
        let err = ExtractionChain::new(vec![
            Box::new(license::LicenseNumberExtractor),
            Box::new(license::LicenseNumberExtractor),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn missing_anchors_leave_fields_null() {
        let mut c = ctx(&["Date:null", "7. Nameless Corp", "Some narrative without labels"]);
        chain().run(&mut c);
        let r = c.record;
        assert_eq!(r.business_name.as_deref(), Some("Nameless Corp"));
        assert!(r.minutes_date.is_none());
        assert!(r.license_number.is_none());
        assert!(r.address.is_none());
        assert!(r.street_number.is_none());
        assert!(r.details.is_none());
        assert!(r.status.is_none());
    }
}
