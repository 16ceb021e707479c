//! JSON run log keyed by point-of-interest id.
//!
//! Each entry summarises one stop: where it was, where it was moved to,
//! which place matched, what went wrong and which pictures were taken.

use crate::error::{Error, Result, ResultExt};
use crate::model::PointOfInterest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One captured picture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureEntry {
    pub pic_number: u32,
    pub pic_lat: f64,
    pub pic_lon: f64,
    pub heading: Option<f64>,
    pub date: Option<String>,
    pub pano_id: Option<String>,
}

/// Summary of one point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub lat: f64,
    pub lon: f64,
    pub og_lat: Option<f64>,
    pub og_lon: Option<f64>,
    pub fov: Option<u32>,
    pub place_id: Option<String>,
    pub place_name: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub pictures: Vec<PictureEntry>,
}

impl From<&PointOfInterest> for LogEntry {
    fn from(poi: &PointOfInterest) -> Self {
        Self {
            lat: poi.coords.latitude,
            lon: poi.coords.longitude,
            og_lat: poi.original_coords().map(|c| c.latitude),
            og_lon: poi.original_coords().map(|c| c.longitude),
            fov: poi.fov,
            place_id: poi.place_id().map(String::from),
            place_name: poi.place_name().map(String::from),
            errors: poi.errors().iter().map(ToString::to_string).collect(),
            pictures: poi
                .vantages()
                .iter()
                .map(|v| PictureEntry {
                    pic_number: v.number(),
                    pic_lat: v.coords.latitude,
                    pic_lon: v.coords.longitude,
                    heading: v.heading,
                    date: v.date.clone(),
                    pano_id: v.pano_id.as_ref().map(ToString::to_string),
                })
                .collect(),
        }
    }
}

/// Run log, ordered by id for stable output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunLog {
    entries: BTreeMap<String, LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing log so a run can add to it; a missing file is empty
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(Error::from)
            .context(format!("While reading run log {}", path.display()))
    }

    /// Insert or replace the entry for `poi`
    pub fn upsert(&mut self, poi: &PointOfInterest) {
        self.entries.insert(poi.id().to_string(), LogEntry::from(poi));
    }

    pub fn get(&self, id: &str) -> Option<&LogEntry> {
        self.entries.get(id)
    }

    /// Entries in id order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &LogEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the log, replacing the file only once the new content is on disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
