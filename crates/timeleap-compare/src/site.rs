//! Site reference data.
//!
//! The comparison view only needs a name and two era labels; the full
//! record is kept so the viewer can list and log sites.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::variant::SceneVariant;

const BUILTIN_SITES: &str = include_str!("../assets/sites.json");

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One monument as published by the site data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub coordinates: Coordinates,
    /// Negative for BCE.
    #[serde(default)]
    pub year_built: Option<i32>,
    pub description: String,
    pub thumbnail_url: String,
    pub current_image_url: String,
    #[serde(default)]
    pub facts_count: u32,
    #[serde(default)]
    pub unesco_status: Option<String>,
    #[serde(default = "default_status")]
    pub current_status: String,
}

fn default_status() -> String {
    "Ruins".to_string()
}

#[derive(Debug)]
pub enum SiteError {
    NotFound(String),
    Duplicate(String),
    Empty,
    Parse(serde_json::Error),
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteError::NotFound(id) => write!(f, "no site with id `{id}`"),
            SiteError::Duplicate(id) => write!(f, "site id `{id}` appears more than once"),
            SiteError::Empty => f.write_str("site catalog is empty"),
            SiteError::Parse(e) => write!(f, "invalid site catalog: {e}"),
            SiteError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiteError::Parse(e) => Some(e),
            SiteError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Ordered, non-empty list of sites with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteCatalog {
    sites: Vec<SiteRecord>,
}

impl SiteCatalog {
    /// The three seed monuments bundled with the crate.
    pub fn builtin() -> Result<Self, SiteError> {
        Self::from_json(BUILTIN_SITES)
    }

    /// Parses a JSON array of site records.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let sites: Vec<SiteRecord> = serde_json::from_str(json).map_err(SiteError::Parse)?;
        Self::from_records(sites)
    }

    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let json = fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        log::info!("loaded {} sites from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn from_records(sites: Vec<SiteRecord>) -> Result<Self, SiteError> {
        if sites.is_empty() {
            return Err(SiteError::Empty);
        }
        for (i, s) in sites.iter().enumerate() {
            if sites[..i].iter().any(|earlier| earlier.id == s.id) {
                return Err(SiteError::Duplicate(s.id.clone()));
            }
        }
        Ok(Self { sites })
    }

    pub fn get(&self, id: &str) -> Result<&SiteRecord, SiteError> {
        self.sites
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SiteError::NotFound(id.to_string()))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.id == id)
    }

    pub fn by_index(&self, index: usize) -> Option<&SiteRecord> {
        self.sites.get(index)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Never true for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteRecord> {
        self.sites.iter()
    }

    /// Index after `index`, wrapping to the first site.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.sites.len()
    }

    /// Index before `index`, wrapping to the last site.
    pub fn prev_index(&self, index: usize) -> usize {
        let n = self.sites.len();
        (index % n + n - 1) % n
    }
}

/// Overlay text for the mounted site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    pub site_id: Option<String>,
    pub name: String,
    pub historical_label: String,
    pub current_label: String,
}

impl SiteContext {
    /// No site mounted: bare era words.
    pub fn placeholder() -> Self {
        Self {
            site_id: None,
            name: String::new(),
            historical_label: SceneVariant::Historical.label().to_string(),
            current_label: SceneVariant::Current.label().to_string(),
        }
    }

    pub fn from_record(record: &SiteRecord) -> Self {
        let then = match record.year_built {
            Some(year) => format_year(year),
            None => SceneVariant::Historical.label().to_string(),
        };
        let now = match record.current_status.trim() {
            "" => SceneVariant::Current.label(),
            status => status,
        };
        Self {
            site_id: Some(record.id.clone()),
            name: record.name.clone(),
            historical_label: format!("{} · {}", record.name, then),
            current_label: format!("{} · {}", record.name, now),
        }
    }

    pub fn label(&self, variant: SceneVariant) -> &str {
        match variant {
            SceneVariant::Historical => &self.historical_label,
            SceneVariant::Current => &self.current_label,
        }
    }
}

impl Default for SiteContext {
    fn default() -> Self {
        Self::placeholder()
    }
}

fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", year.unsigned_abs())
    } else {
        format!("{year} CE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"[{
        "id": "x", "name": "X", "location": "L",
        "coordinates": {"lat": 1.0, "lng": 2.0},
        "description": "", "thumbnail_url": "", "current_image_url": ""
    }]"#;

    #[test]
    fn builtin_has_the_seed_sites() {
        let cat = SiteCatalog::builtin().unwrap();
        assert_eq!(cat.len(), 3);
        let hampi = cat.get("hampi_virupaksha").unwrap();
        assert_eq!(hampi.name, "Virupaksha Temple");
        assert_eq!(hampi.year_built, Some(1442));
        assert_eq!(hampi.facts_count, 8);
        assert!(cat.get("nalanda_university").is_ok());
        assert!(cat.get("golconda_fort").is_ok());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let cat = SiteCatalog::builtin().unwrap();
        assert!(matches!(cat.get("stonehenge"), Err(SiteError::NotFound(id)) if id == "stonehenge"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cat = SiteCatalog::from_json(MINIMAL).unwrap();
        let s = cat.get("x").unwrap();
        assert_eq!(s.year_built, None);
        assert_eq!(s.facts_count, 0);
        assert_eq!(s.unesco_status, None);
        assert_eq!(s.current_status, "Ruins");
    }

    #[test]
    fn empty_and_duplicate_catalogs_rejected() {
        assert!(matches!(SiteCatalog::from_json("[]"), Err(SiteError::Empty)));
        let mut rec = SiteCatalog::from_json(MINIMAL).unwrap().sites;
        rec.push(rec[0].clone());
        assert!(matches!(SiteCatalog::from_records(rec), Err(SiteError::Duplicate(_))));
        assert!(matches!(SiteCatalog::from_json("{"), Err(SiteError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SiteCatalog::load(Path::new("/nonexistent/sites.json")).unwrap_err();
        assert!(matches!(err, SiteError::Io { .. }));
    }

    #[test]
    fn navigation_wraps() {
        let cat = SiteCatalog::builtin().unwrap();
        assert_eq!(cat.next_index(0), 1);
        assert_eq!(cat.next_index(2), 0);
        assert_eq!(cat.prev_index(0), 2);
        assert_eq!(cat.prev_index(1), 0);
        assert_eq!(cat.index_of("golconda_fort"), Some(2));
    }

    #[test]
    fn labels_from_record() {
        let cat = SiteCatalog::builtin().unwrap();
        let ctx = SiteContext::from_record(cat.get("hampi_virupaksha").unwrap());
        assert_eq!(ctx.historical_label, "Virupaksha Temple · 1442 CE");
        assert_eq!(ctx.current_label, "Virupaksha Temple · Active Conservation");
        assert_eq!(ctx.label(SceneVariant::Current), ctx.current_label);
    }

    #[test]
    fn labels_fall_back_to_era_words() {
        let mut rec = SiteCatalog::from_json(MINIMAL).unwrap().sites.remove(0);
        rec.current_status = "  ".to_string();
        let ctx = SiteContext::from_record(&rec);
        assert_eq!(ctx.historical_label, "X · Then");
        assert_eq!(ctx.current_label, "X · Now");

        let p = SiteContext::placeholder();
        assert_eq!(p.historical_label, "Then");
        assert_eq!(p.current_label, "Now");
    }

    #[test]
    fn bce_years() {
        assert_eq!(format_year(-500), "500 BCE");
        assert_eq!(format_year(427), "427 CE");
    }
}
