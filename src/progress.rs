use crate::contact::ContactStarted;
use crate::hazards::{PlayerFilter, PlayerLookup};
use bevy::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key under which the highest unlocked level is stored
pub const MAX_LEVEL_KEY: &str = "max_level_reached";

#[derive(Debug, Error)]
pub enum ProgressError {
	#[error("Could not access save file: {0}")]
	Io(#[from] std::io::Error),

	#[error("Could not parse save file: {0}")]
	Parse(#[from] ron::de::SpannedError),

	#[error("Could not write save data: {0}")]
	Serialize(#[from] ron::Error),
}

/// A small key-value store persisted as a RON map
#[derive(Resource, Debug, Clone)]
pub struct SaveStore {
	path: PathBuf,
	entries: BTreeMap<String, i64>,
}

impl SaveStore {
	/// An empty store that will be written to `path`
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			entries: BTreeMap::new(),
		}
	}

	/// Read the store from `path`. A missing file is an empty store, not an error.
	pub fn load(path: impl Into<PathBuf>) -> Result<Self, ProgressError> {
		let path = path.into();
		let entries = match std::fs::read(&path) {
			Ok(bytes) => ron::de::from_bytes(&bytes)?,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
			Err(e) => return Err(e.into()),
		};
		Ok(Self { path, entries })
	}

	pub fn save(&self) -> Result<(), ProgressError> {
		let text = ron::ser::to_string_pretty(&self.entries, ron::ser::PrettyConfig::default())?;
		std::fs::write(&self.path, text)?;
		Ok(())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn get_or(&self, key: &str, default: i64) -> i64 {
		self.entries.get(key).copied().unwrap_or(default)
	}

	pub fn set(&mut self, key: &str, value: i64) {
		self.entries.insert(key.to_owned(), value);
	}

	/// The highest level the player may select; level 1 is always unlocked
	pub fn max_level_reached(&self) -> i64 {
		self.get_or(MAX_LEVEL_KEY, 1)
	}

	/// Record that `level` was completed, unlocking the next one.
	/// Returns true if this raised the stored maximum.
	pub fn record_level_completed(&mut self, level: i64) -> bool {
		let next = level + 1;
		if next > self.max_level_reached() {
			self.set(MAX_LEVEL_KEY, next);
			true
		} else {
			false
		}
	}
}

/// Level-select gating: level numbers start at 1
pub fn is_level_unlocked(level: i64, max_level_reached: i64) -> bool {
	level <= max_level_reached
}

/// Touching this finishes the current level
#[derive(Component, Debug, Clone)]
pub struct LevelCompleteTrigger {
	pub level_number: i64,
	/// scene to go to afterwards; loading it is up to whoever listens for [LevelCompleted]
	pub next_scene: String,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelCompleted {
	pub level_number: i64,
	pub next_scene: String,
}

pub fn complete_levels(
	mut contacts: EventReader<ContactStarted>,
	triggers: Query<&LevelCompleteTrigger>,
	lookup: PlayerLookup,
	mut store: Option<ResMut<SaveStore>>,
	mut completed: EventWriter<LevelCompleted>,
) {
	for contact in contacts.read() {
		let Ok(trigger) = triggers.get(contact.this) else {
			continue;
		};
		if !lookup.matches(contact.other, PlayerFilter::Tag) {
			continue;
		}

		info!("level {} complete", trigger.level_number);
		match store.as_deref_mut() {
			Some(store) => {
				if store.record_level_completed(trigger.level_number) {
					if let Err(e) = store.save() {
						error!("failed to save progress to {}: {e}", store.path().display());
					}
				}
			}
			None => warn!("no SaveStore resource; progress will not be saved"),
		}
		completed.send(LevelCompleted {
			level_number: trigger.level_number,
			next_scene: trigger.next_scene.clone(),
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn temp_path(name: &str) -> PathBuf {
		std::env::temp_dir().join(format!("lifeline-{}-{name}.ron", std::process::id()))
	}

	#[test]
	fn missing_file_is_an_empty_store() {
		let store = SaveStore::load(temp_path("missing")).expect("missing file is fine");
		assert_eq!(store.max_level_reached(), 1);
	}

	#[test]
	fn completion_only_raises_the_maximum() {
		let mut store = SaveStore::new(temp_path("unused"));
		assert!(store.record_level_completed(2));
		assert_eq!(store.max_level_reached(), 3);
		assert!(!store.record_level_completed(1));
		assert_eq!(store.max_level_reached(), 3);
	}

	#[test]
	fn store_round_trips_through_disk() {
		let path = temp_path("round-trip");
		let mut store = SaveStore::new(&path);
		store.record_level_completed(4);
		store.save().expect("save should succeed");

		let loaded = SaveStore::load(&path).expect("load should succeed");
		assert_eq!(loaded.max_level_reached(), 5);
		std::fs::remove_file(&path).ok();
	}

	#[test]
	fn garbage_file_is_a_parse_error() {
		let path = temp_path("garbage");
		std::fs::write(&path, "not ron at all {").expect("write temp file");
		let result = SaveStore::load(&path);
		assert!(matches!(result, Err(ProgressError::Parse(_))));
		std::fs::remove_file(&path).ok();
	}

	#[test]
	fn level_gating() {
		assert!(is_level_unlocked(1, 1));
		assert!(!is_level_unlocked(2, 1));
		assert!(is_level_unlocked(2, 3));
	}
}
