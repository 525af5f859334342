//! Shared types used across Folio crates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a persisted page.
pub type PageId = u64;

/// Identifier of a persisted page section.
pub type SectionId = u64;

/// Persisted payload of one section: field name → value.
///
/// Values may be primitives, arrays, nested collection items or image
/// references. The map need not cover every field of the section's template.
pub type SectionData = Map<String, Value>;

/// One content block placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    pub id: SectionId,
    pub page_id: PageId,
    pub template_key: String,
    pub slot: String,
    /// Sort key, not a unique index. Ties are broken by `id`.
    pub position: i64,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub data: SectionData,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Unix timestamp (seconds) from which the section is shown.
    #[serde(default)]
    pub visible_from: Option<u64>,
    /// Unix timestamp (seconds) after which the section is hidden.
    #[serde(default)]
    pub visible_until: Option<u64>,
    #[serde(default)]
    pub locale: Option<String>,
}

fn default_active() -> bool {
    true
}

impl PageSection {
    /// Create an active section with empty data and no visibility window.
    pub fn new(id: SectionId, page_id: PageId, template_key: &str, slot: &str, position: i64) -> Self {
        Self {
            id,
            page_id,
            template_key: template_key.to_string(),
            slot: slot.to_string(),
            position,
            anchor: None,
            data: SectionData::new(),
            is_active: true,
            visible_from: None,
            visible_until: None,
            locale: None,
        }
    }

    pub fn with_data(mut self, data: SectionData) -> Self {
        self.data = data;
        self
    }

    /// Whether the section should be rendered at `now` (Unix seconds).
    ///
    /// Both window bounds are inclusive; a missing bound is open.
    pub fn is_visible_at(&self, now: u64) -> bool {
        if !self.is_active {
            return false;
        }
        if self.visible_from.is_some_and(|from| now < from) {
            return false;
        }
        if self.visible_until.is_some_and(|until| now > until) {
            return false;
        }
        true
    }

    /// Whether the section applies to `locale`. Sections without a locale
    /// apply everywhere.
    pub fn matches_locale(&self, locale: &str) -> bool {
        self.locale.as_deref().is_none_or(|l| l == locale)
    }

    /// Sort key: position first, identifier as tie-breaker.
    pub fn sort_key(&self) -> (i64, SectionId) {
        (self.position, self.id)
    }
}

/// Order sections by `(position, id)`.
pub fn sort_sections(sections: &mut [PageSection]) {
    sections.sort_by_key(PageSection::sort_key);
}

/// Identifiers of `sections` in display order.
pub fn ordered_ids(sections: &[PageSection]) -> Vec<SectionId> {
    let mut keys: Vec<(i64, SectionId)> = sections.iter().map(PageSection::sort_key).collect();
    keys.sort();
    keys.into_iter().map(|(_, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ties_break_by_id() {
        let mut sections = vec![
            PageSection::new(7, 1, "hero", "main", 2),
            PageSection::new(3, 1, "hero", "main", 2),
            PageSection::new(9, 1, "hero", "main", 0),
        ];
        sort_sections(&mut sections);
        let ids: Vec<_> = sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![9, 3, 7]);
        assert_eq!(ordered_ids(&sections), vec![9, 3, 7]);
    }

    #[test]
    fn visibility_window_is_inclusive() {
        let mut section = PageSection::new(1, 1, "hero", "main", 0);
        section.visible_from = Some(100);
        section.visible_until = Some(200);

        assert!(!section.is_visible_at(99));
        assert!(section.is_visible_at(100));
        assert!(section.is_visible_at(200));
        assert!(!section.is_visible_at(201));

        section.is_active = false;
        assert!(!section.is_visible_at(150));
    }

    #[test]
    fn locale_free_sections_match_everything() {
        let mut section = PageSection::new(1, 1, "hero", "main", 0);
        assert!(section.matches_locale("fr"));
        section.locale = Some("en".to_string());
        assert!(section.matches_locale("en"));
        assert!(!section.matches_locale("fr"));
    }

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "id": 4, "page_id": 2, "template_key": "hero", "slot": "main",
            "position": 1, "anchor": "top", "data": {"title": "Hi"},
            "is_active": true, "visible_from": null, "visible_until": null,
            "locale": "en"
        }"#;
        let section: PageSection = serde_json::from_str(json).unwrap();
        assert_eq!(section.anchor.as_deref(), Some("top"));
        assert_eq!(section.data["title"], "Hi");
    }
}
