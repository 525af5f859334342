//! Portfolio content records read by the capability providers.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use folio_core::{PageId, PageSection};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentLibrary {
    pub pages: Vec<Page>,
    pub sections: Vec<PageSection>,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub in_navigation: bool,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: u64,
    pub company: String,
    pub role: String,
    /// `YYYY-MM`.
    pub started_on: String,
    #[serde(default)]
    pub ended_on: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub level: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub institution: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub year: Option<i64>,
}

fn visible_by_default() -> bool {
    true
}

impl ContentLibrary {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading content from {}", path.display()))?;
        let library = serde_json::from_str(&raw)
            .with_context(|| format!("parsing content from {}", path.display()))?;
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(
            &path,
            r#"{"projects": [{"id": 1, "title": "Folio", "slug": "folio"}]}"#,
        )
        .unwrap();

        let library = ContentLibrary::from_file(&path).unwrap();
        assert_eq!(library.projects.len(), 1);
        assert!(library.projects[0].is_visible);
        assert!(library.pages.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ContentLibrary::from_file(Path::new("/nonexistent/content.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/content.json"));
    }
}
