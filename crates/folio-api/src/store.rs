//! In-memory section store backing the page endpoints.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use folio_core::{PageId, PageSection, SectionId, ordered_ids, sort_sections};
use folio_ordering::{ReorderClient, ReorderRejection, ReorderRequest};

/// Sections grouped by page, shared across handlers.
#[derive(Clone, Default)]
pub struct SectionStore {
    pages: Arc<RwLock<HashMap<PageId, Vec<PageSection>>>>,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store, grouping sections by page.
    pub fn from_sections(sections: impl IntoIterator<Item = PageSection>) -> Self {
        let mut pages: HashMap<PageId, Vec<PageSection>> = HashMap::new();
        for section in sections {
            pages.entry(section.page_id).or_default().push(section);
        }
        for list in pages.values_mut() {
            sort_sections(list);
        }
        Self {
            pages: Arc::new(RwLock::new(pages)),
        }
    }

    /// Insert or replace a section by id.
    pub async fn upsert(&self, section: PageSection) {
        let mut pages = self.pages.write().await;
        let list = pages.entry(section.page_id).or_default();
        list.retain(|s| s.id != section.id);
        list.push(section);
        sort_sections(list);
    }

    pub async fn has_page(&self, page_id: PageId) -> bool {
        self.pages.read().await.contains_key(&page_id)
    }

    /// Sections of a page in display order.
    pub async fn list(&self, page_id: PageId) -> Option<Vec<PageSection>> {
        self.pages.read().await.get(&page_id).cloned()
    }

    pub async fn get(&self, page_id: PageId, id: SectionId) -> Option<PageSection> {
        self.pages
            .read()
            .await
            .get(&page_id)?
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Rewrite positions to the submitted order. The order must name every
    /// section of the page exactly once.
    pub async fn apply_order(&self, page_id: PageId, order: &[SectionId]) -> Result<(), ReorderRejection> {
        let mut pages = self.pages.write().await;
        let Some(list) = pages.get_mut(&page_id) else {
            return Err(ReorderRejection::new().field("page", "The page does not exist."));
        };

        if order.is_empty() {
            return Err(ReorderRejection::new().field("sections", "The sections field is required."));
        }
        let submitted: HashSet<SectionId> = order.iter().copied().collect();
        if submitted.len() != order.len() {
            return Err(ReorderRejection::new().field("sections", "The sections list contains duplicates."));
        }
        let current: HashSet<SectionId> = list.iter().map(|s| s.id).collect();
        if submitted != current {
            return Err(ReorderRejection::new().field(
                "sections",
                "The sections list must contain every section of the page exactly once.",
            ));
        }

        for section in list.iter_mut() {
            if let Some(index) = order.iter().position(|id| *id == section.id) {
                section.position = index as i64;
            }
        }
        sort_sections(list);
        info!(page_id, order = ?ordered_ids(list), "section order saved");
        Ok(())
    }
}

impl ReorderClient for SectionStore {
    async fn reorder(&self, request: &ReorderRequest) -> Result<(), ReorderRejection> {
        self.apply_order(request.page_id, &request.sections).await
    }
}
