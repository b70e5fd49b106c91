use crate::effects::EffectPaths;
use crate::hazards::PlayerFilter;
use crate::player::PlayerControlParams;
use crate::util::FrameCount;
use bevy::prelude::{Asset, TypePath, Vec2};
use serde::Deserialize;

/// Everything needed to build a level, as written in a `.ron` file
#[derive(Asset, Clone, Debug, Deserialize, TypePath)]
pub struct LevelDescription {
	pub level_number: i64,
	pub player: PlayerDescription,
	/// frames between the player's death and the world reset
	#[serde(default = "default_restore_delay")]
	pub restore_delay: FrameCount,
	#[serde(default)]
	pub platforms: Vec<BoxDescription>,
	#[serde(default)]
	pub checkpoints: Vec<CheckpointDescription>,
	#[serde(default)]
	pub spike_traps: Vec<SpikeTrapDescription>,
	#[serde(default)]
	pub saws: Vec<SawDescription>,
	#[serde(default)]
	pub spike_balls: Vec<SpikeBallDescription>,
	#[serde(default)]
	pub falling_blocks: Vec<FallingBlockDescription>,
	#[serde(default)]
	pub emerging_spikes: Vec<EmergingSpikesDescription>,
	#[serde(default)]
	pub patrol_enemies: Vec<PatrolEnemyDescription>,
	#[serde(default)]
	pub ambush_enemies: Vec<AmbushEnemyDescription>,
	#[serde(default)]
	pub enemy_walls: Vec<BoxDescription>,
	#[serde(default)]
	pub pickups: Vec<PickupDescription>,
	#[serde(default)]
	pub exit: Option<ExitDescription>,
}

fn default_restore_delay() -> FrameCount {
	FrameCount(30)
}

fn default_respawn_delay() -> FrameCount {
	FrameCount(30)
}

fn default_starting_lives() -> i32 {
	3
}

fn default_attack_cooldown() -> FrameCount {
	FrameCount(30)
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlayerDescription {
	pub spawn: Vec2,
	#[serde(default = "default_starting_lives")]
	pub starting_lives: i32,
	#[serde(default = "default_respawn_delay")]
	pub respawn_delay: FrameCount,
	#[serde(default)]
	pub controls: Option<PlayerControlParams>,
	#[serde(default)]
	pub death_effects: EffectPaths,
	#[serde(default)]
	pub starting_ammo: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BoxDescription {
	pub pos: Vec2,
	pub size: Vec2,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CheckpointDescription {
	pub pos: Vec2,
	#[serde(default)]
	pub one_use: bool,
	#[serde(default)]
	pub effects: EffectPaths,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpikeTrapDescription {
	pub pos: Vec2,
	pub size: Vec2,
	#[serde(default)]
	pub filter: PlayerFilter,
	#[serde(default)]
	pub hit_effects: EffectPaths,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SawDescription {
	pub pos: Vec2,
	pub radius: f32,
	#[serde(default = "default_saw_speed")]
	pub degrees_per_second: f32,
	#[serde(default = "default_true")]
	pub clockwise: bool,
}

fn default_saw_speed() -> f32 {
	360.0
}

fn default_true() -> bool {
	true
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpikeBallDescription {
	pub left: Vec2,
	pub right: Vec2,
	pub speed: f32,
	pub radius: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FallingBlockDescription {
	pub pos: Vec2,
	pub size: Vec2,
	/// the sensor area that releases the block
	pub trigger: BoxDescription,
	/// who can set the trigger off
	#[serde(default)]
	pub filter: PlayerFilter,
	#[serde(default)]
	pub reset_delay: FrameCount,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmergingSpikesDescription {
	/// the sensing area
	pub area: BoxDescription,
	pub blade_size: Vec2,
	pub raised_offset: Vec2,
	#[serde(default)]
	pub filter: PlayerFilter,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PatrolEnemyDescription {
	pub pos: Vec2,
	pub speed: f32,
	#[serde(default)]
	pub waypoints: Option<(f32, f32)>,
	#[serde(default)]
	pub destroy_on_attack: bool,
	#[serde(default = "default_attack_cooldown")]
	pub attack_cooldown: FrameCount,
	#[serde(default)]
	pub attack_effects: EffectPaths,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AmbushEnemyDescription {
	pub pos: Vec2,
	#[serde(default)]
	pub despawn_delay: FrameCount,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PickupDescription {
	pub pos: Vec2,
	pub apple_count: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExitDescription {
	pub area: BoxDescription,
	pub next_scene: String,
}
