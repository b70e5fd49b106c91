use crate::util::FrameCount;
use bevy::prelude::*;
use serde::Deserialize;

/// Optional feedback assets for a one-shot effect. Either half may be absent.
#[derive(Clone, Debug, Default)]
pub struct EffectAssets {
	pub vfx: Option<Handle<Image>>,
	pub sfx: Option<Handle<AudioSource>>,
	pub vfx_size: Vec2,
	pub vfx_lifetime: FrameCount,
}

/// Asset paths for an [EffectAssets], as written in a level description.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EffectPaths {
	pub vfx: Option<String>,
	pub sfx: Option<String>,
}

impl EffectPaths {
	pub fn load(&self, asset_server: &AssetServer) -> EffectAssets {
		EffectAssets {
			vfx: self.vfx.as_ref().map(|path| asset_server.load(path.clone())),
			sfx: self.sfx.as_ref().map(|path| asset_server.load(path.clone())),
			vfx_size: Vec2::splat(4.0),
			vfx_lifetime: FrameCount(30),
		}
	}
}

/// A spawned visual effect that despawns itself after a number of frames.
#[derive(Component, Debug)]
pub struct TransientEffect {
	pub remaining: FrameCount,
}

/// Spawn whatever parts of `assets` are present at `position`.
/// `label` only shows up in logs.
pub fn play_effect(commands: &mut Commands, assets: &EffectAssets, position: Vec2, label: &str) {
	match &assets.vfx {
		Some(image) => {
			commands.spawn((
				TransientEffect {
					remaining: assets.vfx_lifetime,
				},
				Sprite {
					custom_size: Some(assets.vfx_size),
					..Sprite::from_image(image.clone())
				},
				Transform::from_translation(position.extend(2.0)),
			));
		}
		None => debug!("{label}: no vfx assigned, skipping"),
	}
	match &assets.sfx {
		Some(sound) => {
			commands.spawn((AudioPlayer::new(sound.clone()), PlaybackSettings::DESPAWN));
		}
		None => debug!("{label}: no sfx assigned, skipping"),
	}
}

pub fn expire_transient_effects(mut commands: Commands, mut effects: Query<(Entity, &mut TransientEffect)>) {
	for (entity, mut effect) in &mut effects {
		effect.remaining.decrement();
		if effect.remaining.is_zero() {
			commands.entity(entity).despawn_recursive();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bevy::ecs::system::RunSystemOnce;

	#[test]
	fn empty_assets_spawn_nothing() {
		let mut world = World::new();
		world
			.run_system_once(|mut commands: Commands| {
				play_effect(&mut commands, &EffectAssets::default(), Vec2::ZERO, "test");
			})
			.expect("system should run");
		assert_eq!(world.entities().len(), 0);
	}

	#[test]
	fn transient_effects_expire() {
		let mut app = App::new();
		app.add_systems(Update, expire_transient_effects);
		let effect = app
			.world_mut()
			.spawn(TransientEffect {
				remaining: FrameCount(2),
			})
			.id();
		app.update();
		assert!(app.world().entities().contains(effect));
		app.update();
		assert!(!app.world().entities().contains(effect));
	}
}
