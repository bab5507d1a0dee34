//! Preset slots: parameter snapshots saved to a TOML file

use crate::anim::composite::CompositeState;
use crate::anim::PARAM_COUNT;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SLOT_COUNT: u8 = 4;

/// Everything needed to bring the driver back to a saved state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Entry id that was active
    pub active: String,
    /// Parameter values keyed by generator id
    #[serde(default)]
    pub params: BTreeMap<String, [f64; PARAM_COUNT]>,
    /// Strength and mapping keyed by composite id
    #[serde(default)]
    pub composites: BTreeMap<String, CompositeState>,
}

pub struct PresetStore {
    path: PathBuf,
    slots: BTreeMap<String, Snapshot>,
}

fn slot_key(slot: u8) -> Result<String> {
    if (1..=SLOT_COUNT).contains(&slot) {
        Ok(format!("slot{slot}"))
    } else {
        Err(Error::InvalidSlot(slot))
    }
}

impl PresetStore {
    /// Empty store that will write to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slots: BTreeMap::new(),
        }
    }

    /// Read the preset file. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::new(path));
        }

        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let slots: BTreeMap<String, Snapshot> =
            toml::from_str(&content).map_err(|source| Error::PresetParse {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), slots = slots.len(), "loaded presets");
        Ok(Self { path, slots })
    }

    /// Like [`open`](Self::open) but starts empty when the file is unreadable
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(err) => {
                warn!(%err, "starting with empty presets");
                Self::new(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, slot: u8) -> Result<&Snapshot> {
        self.slots.get(&slot_key(slot)?).ok_or(Error::EmptySlot(slot))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots that hold a snapshot, in order
    pub fn occupied(&self) -> Vec<u8> {
        (1..=SLOT_COUNT)
            .filter(|&slot| slot_key(slot).map(|k| self.slots.contains_key(&k)).unwrap_or(false))
            .collect()
    }

    /// Put a snapshot into a slot and write the file
    pub fn store(&mut self, slot: u8, snapshot: Snapshot) -> Result<()> {
        let key = slot_key(slot)?;
        let active = snapshot.active.clone();
        self.slots.insert(key, snapshot);
        self.save()?;
        info!(slot, active = %active, path = %self.path.display(), "saved preset");
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        let content = toml::to_string(&self.slots)?;
        fs::write(&self.path, content).map_err(|e| Error::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::mapper::MappingMode;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("termfuse-presets-{}-{name}", std::process::id()))
            .join("presets.toml")
    }

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot {
            active: "fluid-spiral".to_string(),
            ..Snapshot::default()
        };
        snapshot.params.insert("spiral".to_string(), [4.0, 1.25, 0.5, 0.75]);
        snapshot.composites.insert(
            "fluid-spiral".to_string(),
            CompositeState {
                strength: 1.5,
                mapping: MappingMode::Quadratic,
            },
        );
        snapshot
    }

    #[test]
    fn stores_and_reopens() {
        let path = temp_path("reopen");
        let mut store = PresetStore::new(&path);
        store.store(2, sample()).unwrap();

        let reopened = PresetStore::open(&path).unwrap();
        assert_eq!(reopened.get(2).unwrap(), &sample());
        assert_eq!(reopened.occupied(), vec![2]);
        assert!(matches!(reopened.get(1), Err(Error::EmptySlot(1))));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn slots_outside_range_are_rejected() {
        let mut store = PresetStore::new(temp_path("range"));
        assert!(matches!(store.get(0), Err(Error::InvalidSlot(0))));
        assert!(matches!(store.store(5, sample()), Err(Error::InvalidSlot(5))));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_file_is_empty() {
        let store = PresetStore::open(temp_path("missing")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn garbage_file_is_a_parse_error() {
        let path = temp_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "slot1 = 3").unwrap();
        assert!(matches!(PresetStore::open(&path), Err(Error::PresetParse { .. })));
        assert!(PresetStore::open_or_empty(&path).is_empty());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
