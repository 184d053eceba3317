//! Resource count summary shown on the home view

use crate::fetch::{FetchTracker, Ticket};
use acehive_backend::{Backend, BackendResult, EqFilter};
use acehive_core::types::fields;
use acehive_core::{ResourceType, TableName};
use serde::Serialize;

/// Resource counts shown on the summary cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResourceCounts {
    /// Every resource row
    pub total: u64,
    /// Rows labelled `CT Paper`
    pub ct_papers: u64,
    /// Rows labelled `Sem Paper`
    pub sem_papers: u64,
    /// Rows labelled `Study Material`
    pub study_materials: u64,
}

impl ResourceCounts {
    /// Count for one resource type
    #[must_use]
    pub const fn for_type(&self, kind: ResourceType) -> u64 {
        match kind {
            ResourceType::CtPaper => self.ct_papers,
            ResourceType::SemPaper => self.sem_papers,
            ResourceType::StudyMaterial => self.study_materials,
        }
    }
}

/// Run the four count queries concurrently
///
/// A query that returns no count contributes zero.
pub async fn fetch_counts(backend: &dyn Backend) -> BackendResult<ResourceCounts> {
    let ct = EqFilter::new(fields::RESOURCE_TYPE, ResourceType::CtPaper.label());
    let sem = EqFilter::new(fields::RESOURCE_TYPE, ResourceType::SemPaper.label());
    let study = EqFilter::new(fields::RESOURCE_TYPE, ResourceType::StudyMaterial.label());

    let (total, ct_papers, sem_papers, study_materials) = futures::try_join!(
        backend.count(TableName::Resources, None),
        backend.count(TableName::Resources, Some(&ct)),
        backend.count(TableName::Resources, Some(&sem)),
        backend.count(TableName::Resources, Some(&study)),
    )?;

    Ok(ResourceCounts {
        total: total.unwrap_or(0),
        ct_papers: ct_papers.unwrap_or(0),
        sem_papers: sem_papers.unwrap_or(0),
        study_materials: study_materials.unwrap_or(0),
    })
}

/// One summary card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    /// Card title
    pub title: &'static str,
    /// Accent colour as a CSS hex value
    pub accent: &'static str,
    /// Count, or `None` while loading
    pub value: Option<u64>,
}

/// Home view state: the latest counts and their fetch status
#[derive(Debug, Default)]
pub struct SummaryPanel {
    counts: ResourceCounts,
    tracker: FetchTracker,
}

impl SummaryPanel {
    /// Create a panel that has not fetched yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh
    ///
    /// Returns `None` while a refresh is already outstanding.
    pub fn begin_refresh(&mut self) -> Option<Ticket> {
        if self.tracker.is_loading() {
            return None;
        }
        Some(self.tracker.begin())
    }

    /// Accept the counts fetched under `ticket`
    ///
    /// On failure the previous counts are kept. Returns `false` for a stale
    /// ticket.
    pub fn complete(&mut self, ticket: Ticket, result: Result<ResourceCounts, String>) -> bool {
        match result {
            Ok(counts) => {
                let accepted = self.tracker.settle(ticket, Ok(()));
                if accepted {
                    self.counts = counts;
                }
                accepted
            }
            Err(message) => self.tracker.settle(ticket, Err(message)),
        }
    }

    /// Latest accepted counts
    #[must_use]
    pub const fn counts(&self) -> ResourceCounts {
        self.counts
    }

    /// Whether a refresh is outstanding
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    /// Whether the panel has never fetched
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.tracker.is_idle()
    }

    /// Cards in display order
    #[must_use]
    pub fn cards(&self) -> [SummaryCard; 4] {
        let value = |count: u64| (!self.is_loading()).then_some(count);
        [
            SummaryCard {
                title: "Total",
                accent: "#00BFFF",
                value: value(self.counts.total),
            },
            SummaryCard {
                title: "CT Papers",
                accent: "#FF5733",
                value: value(self.counts.ct_papers),
            },
            SummaryCard {
                title: "Sem Papers",
                accent: "#28A745",
                value: value(self.counts.sem_papers),
            },
            SummaryCard {
                title: "Study Material",
                accent: "#FFC107",
                value: value(self.counts.study_materials),
            },
        ]
    }
}
