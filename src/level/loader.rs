use crate::level::LevelDescription;
use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use thiserror::Error;

#[derive(Default)]
pub struct LevelAssetLoader;

#[derive(Debug, Error)]
pub enum LevelLoaderError {
	#[error("Could not load level: {0}")]
	Io(#[from] std::io::Error),

	#[error("Could not parse level RON: {0}")]
	Ron(#[from] ron::de::SpannedError),
}

impl AssetLoader for LevelAssetLoader {
	type Asset = LevelDescription;
	type Settings = ();
	type Error = LevelLoaderError;

	async fn load(
		&self,
		reader: &mut dyn Reader,
		_settings: &Self::Settings,
		_load_context: &mut LoadContext<'_>,
	) -> Result<Self::Asset, Self::Error> {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes).await?;
		let level = ron::de::from_bytes::<LevelDescription>(&bytes)?;
		Ok(level)
	}

	fn extensions(&self) -> &[&str] {
		&["level.ron"]
	}
}
