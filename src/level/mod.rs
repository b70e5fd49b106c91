mod description;
mod loader;
mod spawn;

pub use description::*;
pub use loader::*;
pub use spawn::*;

use bevy::prelude::*;

/// Loads a level description and spawns its contents
pub struct LevelPlugin {
	pub path: String,
}

impl Default for LevelPlugin {
	fn default() -> Self {
		Self {
			path: "levels/level_1.level.ron".to_owned(),
		}
	}
}

impl Plugin for LevelPlugin {
	fn build(&self, app: &mut App) {
		let path = self.path.clone();
		app.init_asset::<LevelDescription>()
			.init_asset_loader::<LevelAssetLoader>()
			.add_systems(Startup, move |mut commands: Commands, asset_server: Res<AssetServer>| {
				info!("loading level from {path}");
				commands.insert_resource(CurrentLevel::new(asset_server.load(path.clone())));
			})
			.add_systems(Update, spawn_level.run_if(resource_exists::<CurrentLevel>));
	}
}
