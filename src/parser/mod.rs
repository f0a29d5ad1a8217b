pub mod chunks;
pub mod extract;
pub mod section;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::address::AddressParser;
use crate::corrections::{Checkpoint, CorrectionRegistry};
use crate::error::PipelineError;
use crate::layout;
use crate::model::Record;
use crate::source::{Document, Line};
use chunks::{ChunkStats, Chunking};
use extract::ExtractionChain;
use section::Section;

/// Outcome of one document run. `reason` is set when `proceed` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub proceed: bool,
    pub reason: Option<String>,
}

impl RunResult {
    pub fn ok() -> Self {
        RunResult { proceed: true, reason: None }
    }

    pub fn halted(reason: impl Into<String>) -> Self {
        RunResult {
            proceed: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentRun {
    pub doc_id: String,
    pub result: RunResult,
    pub records: Vec<Record>,
    pub stats: ChunkStats,
}

impl DocumentRun {
    pub fn failed(doc_id: impl Into<String>, reason: impl Into<String>) -> Self {
        DocumentRun {
            doc_id: doc_id.into(),
            result: RunResult::halted(reason),
            records: Vec::new(),
            stats: ChunkStats::default(),
        }
    }
}

/// Lines → section → chunks → records for text documents; lines → listing
/// → records for documents carrying emphasis. Shared immutably across
/// worker threads.
pub struct Pipeline {
    corrections: CorrectionRegistry,
    chain: ExtractionChain,
    address: Arc<dyn AddressParser>,
}

impl Pipeline {
    pub fn new(corrections: CorrectionRegistry, address: Arc<dyn AddressParser>) -> Result<Self> {
        let chain = ExtractionChain::standard(Arc::clone(&address))?;
        Ok(Pipeline {
            corrections,
            chain,
            address,
        })
    }

    pub fn corrections(&self) -> &CorrectionRegistry {
        &self.corrections
    }

    pub fn run(&self, doc: &Document) -> DocumentRun {
        let outcome = if doc.has_emphasis {
            self.run_layout(doc)
        } else {
            self.run_text(doc)
        };
        match outcome {
            Ok((records, stats)) => {
                info!(doc = %doc.id, records = records.len(), "document processed");
                DocumentRun {
                    doc_id: doc.id.clone(),
                    result: RunResult::ok(),
                    records,
                    stats,
                }
            }
            Err(err) => {
                warn!(doc = %doc.id, reason = %err, "document halted");
                DocumentRun::failed(&doc.id, err.to_string())
            }
        }
    }

    /// Corrected lines after the `PostLines` checkpoint.
    fn lines(&self, doc: &Document) -> Result<Vec<Line>, PipelineError> {
        if doc.lines.iter().all(|l| l.text.trim().is_empty()) {
            return Err(PipelineError::NoLines { doc: doc.id.clone() });
        }
        Ok(self
            .corrections
            .apply(Checkpoint::PostLines, &doc.id, doc.lines.clone()))
    }

    /// The corrected transactional-hearing section of a text document.
    pub fn section(&self, doc: &Document) -> Result<Section, PipelineError> {
        if doc.has_emphasis {
            return Err(PipelineError::LayoutDocument { doc: doc.id.clone() });
        }
        let lines = self.lines(doc)?;
        let section =
            section::extract_section(&lines).ok_or_else(|| PipelineError::SectionNotFound { doc: doc.id.clone() })?;
        debug!(doc = %doc.id, lines = section.lines.len(), "section extracted");
        Ok(Section {
            lines: self
                .corrections
                .apply(Checkpoint::PostSection, &doc.id, section.lines),
        })
    }

    /// Accepted chunks after the `PostChunks` checkpoint.
    pub fn chunks(&self, doc: &Document) -> Result<Chunking, PipelineError> {
        let section = self.section(doc)?;
        let mut chunking = chunks::segment(&doc.id, &section.texts());
        if chunking.chunks.is_empty() {
            return Err(PipelineError::NoChunks { doc: doc.id.clone() });
        }
        self.corrections.apply_chunks(&doc.id, &mut chunking.chunks);
        debug!(
            doc = %doc.id,
            accepted = chunking.stats.accepted,
            discarded = chunking.stats.discarded,
            "chunks segmented"
        );
        Ok(chunking)
    }

    fn run_text(&self, doc: &Document) -> Result<(Vec<Record>, ChunkStats), PipelineError> {
        let chunking = self.chunks(doc)?;
        let records = chunking.chunks.iter().map(|c| self.chain.extract(c)).collect();
        Ok((records, chunking.stats))
    }

    fn run_layout(&self, doc: &Document) -> Result<(Vec<Record>, ChunkStats), PipelineError> {
        let lines = self.lines(doc)?;
        let listing = layout::classify_listing(&lines);
        if !listing.section_found {
            return Err(PipelineError::SectionNotFound { doc: doc.id.clone() });
        }
        if listing.entries.is_empty() {
            return Err(PipelineError::EmptyListing { doc: doc.id.clone() });
        }
        let records = layout::into_records(&listing.entries, &doc.id, self.address.as_ref());
        let stats = ChunkStats {
            candidates: records.len(),
            accepted: records.len(),
            ..ChunkStats::default()
        };
        Ok((records, stats))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::address::PatternAddressParser;
    use crate::model::{AlcoholType, Status};
    use crate::source;

    fn pipeline() -> Pipeline {
        Pipeline::new(CorrectionRegistry::builtin().unwrap(), Arc::new(PatternAddressParser)).unwrap()
    }

    fn fixture(name: &str) -> Document {
        source::load(&Path::new("tests/fixtures").join(name)).unwrap()
    }

    #[test]
    fn text_document_end_to_end() {
        let run = pipeline().run(&fixture("voting_minutes_2024-09-26.txt"));
        assert_eq!(run.result, RunResult::ok());
        assert_eq!(
            run.stats,
            ChunkStats {
                candidates: 5,
                accepted: 5,
                discarded: 1,
                resplit: 1,
                ambiguous: 0,
            }
        );

        let numbers: Vec<_> = run.records.iter().map(|r| r.license_number.as_deref()).collect();
        assert_eq!(
            numbers,
            vec![Some("LB-101010"), Some("LB-202020"), Some("LB-303030"), Some("LB-404040"), Some("LB-505050")]
        );
        let keys: Vec<_> = run.records.iter().map(|r| r.entity_number.as_deref()).collect();
        assert_eq!(keys, vec![Some("1"), Some("2"), Some("3"), Some("4"), Some("5")]);
        assert!(run.records.iter().all(|r| r.minutes_date.as_deref() == Some("2024-09-25")));
    }

    #[test]
    fn text_document_fields() {
        let run = pipeline().run(&fixture("voting_minutes_2024-09-26.txt"));
        let first = &run.records[0];
        assert_eq!(first.business_name.as_deref(), Some("Hanover Street Trattoria, LLC"));
        assert_eq!(first.dba_name.as_deref(), Some("Trattoria"));
        assert_eq!(first.address.as_deref(), Some("417 Hanover St., Boston, MA 02113"));
        assert_eq!(first.manager.as_deref(), Some("Maria Russo"));
        assert_eq!(first.attorney.as_deref(), Some("Jane Doe"));
        assert_eq!(first.status, Some(Status::Granted));

        // bare "3." merged with its name line; neighborhood typo corrected
        let market = &run.records[1];
        assert_eq!(market.business_name.as_deref(), Some("Meridian Market, LLC"));
        assert_eq!(market.city.as_deref(), Some("East Boston"));
        assert_eq!(market.manager.as_deref(), Some("Luis Ortega"));
        assert_eq!(market.alcohol_type, Some(AlcoholType::WinesAndMalt));
        assert_eq!(market.status, Some(Status::Withdrawn));

        assert_eq!(run.records[2].status, Some(Status::Rejected));
        assert_eq!(run.records[3].status, Some(Status::Continued));

        // "23 Locale" only becomes a chunk after correction
        let locale = &run.records[4];
        assert_eq!(locale.business_name.as_deref(), Some("Locale, Inc."));
        assert_eq!(
            locale.status_detail.as_deref(),
            Some("The license application is hereby Granted.")
        );
    }

    #[test]
    fn stop_marker_excludes_later_items() {
        let run = pipeline().run(&fixture("voting_minutes_2024-09-26.txt"));
        assert!(run
            .records
            .iter()
            .all(|r| r.license_number.as_deref() != Some("LB-606060")));
    }

    #[test]
    fn layout_document_end_to_end() {
        let run = pipeline().run(&fixture("voting_minutes_2025-02-13.jsonl"));
        assert!(run.result.proceed);
        assert_eq!(run.records.len(), 2);

        let tresca = &run.records[0];
        assert_eq!(tresca.business_name.as_deref(), Some("Tresca Holdings, LLC"));
        assert_eq!(tresca.minutes_date.as_deref(), Some("2025-02-13"));
        assert_eq!(tresca.zipcode.as_deref(), Some("02128"));
        assert_eq!(tresca.status, Some(Status::Granted));
        assert_eq!(
            tresca.status_detail.as_deref(),
            Some("The Board granted the license. Closing hour 11:00 PM.")
        );

        let bites = &run.records[1];
        assert_eq!(bites.city.as_deref(), Some("Brighton"));
        assert_eq!(bites.status, Some(Status::Deferred));
    }

    #[test]
    fn halts_without_lines() {
        let run = pipeline().run(&Document::from_text("voting_minutes_2024-01-01.txt", "\n  \n"));
        assert!(!run.result.proceed);
        assert!(run.records.is_empty());
        assert!(run.result.reason.unwrap().contains("no text lines"));
    }

    #[test]
    fn halts_without_section() {
        let doc = Document::from_text("minutes.txt", "Old and New Business\n1. Foo, LLC\nLicense #: LB-1");
        let run = pipeline().run(&doc);
        assert_eq!(
            run.result.reason.as_deref(),
            Some("no transactional hearing section found in minutes.txt")
        );
    }

    #[test]
    fn halts_without_chunks() {
        let doc = Document::from_text("minutes.txt", "Transactional Hearing\n1. Foo, LLC\nNo number here.");
        let run = pipeline().run(&doc);
        assert!(!run.result.proceed);
        assert_eq!(run.stats, ChunkStats::default());
    }

    #[test]
    fn layout_documents_have_no_text_section() {
        let p = pipeline();
        let doc = fixture("voting_minutes_2025-02-13.jsonl");
        assert_eq!(
            p.section(&doc).unwrap_err(),
            PipelineError::LayoutDocument {
                doc: "voting_minutes_2025-02-13.jsonl".into()
            }
        );
        assert!(matches!(p.chunks(&doc), Err(PipelineError::LayoutDocument { .. })));
    }

    #[test]
    fn layout_without_trigger() {
        let doc = Document::from_layout("minutes.jsonl", vec![Line::emphasized("02128", 0)]);
        let run = pipeline().run(&doc);
        assert!(run.result.reason.unwrap().contains("no transactional hearing section"));
    }
}
