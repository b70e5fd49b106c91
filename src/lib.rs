pub mod ammo;
pub mod checkpoint;
pub mod contact;
pub mod effects;
pub mod hazards;
pub mod hud;
pub mod level;
pub mod player;
pub mod progress;
pub mod respawn;
pub mod util;

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

/// Frame phases of the gameplay schedule, run in declaration order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
	/// player input and hazard motion
	Move,
	/// physics collisions become [contact::ContactStarted] events
	Detect,
	/// hazards, checkpoints and pickups react to contacts
	Contacts,
	/// death requests are applied
	Resolve,
	/// frame timers advance: respawns, cooldowns, resets
	Timers,
	/// the world reset after a death
	Restore,
	/// HUD
	Present,
}

pub struct GameplayPlugin {
	schedule: InternedScheduleLabel,
}

impl GameplayPlugin {
	/// Run gameplay in a custom schedule, e.g. `Update` for tests without a fixed clock
	pub fn in_schedule(label: impl ScheduleLabel) -> Self {
		Self {
			schedule: label.intern(),
		}
	}

	/// Run gameplay in `FixedUpdate`, alongside a physics plugin using its fixed schedule
	pub fn in_fixed_schedule() -> Self {
		Self::in_schedule(FixedUpdate)
	}
}

impl Default for GameplayPlugin {
	fn default() -> Self {
		Self::in_fixed_schedule()
	}
}

impl Plugin for GameplayPlugin {
	fn build(&self, app: &mut App) {
		use ammo::*;
		use checkpoint::*;
		use contact::*;
		use effects::*;
		use hazards::*;
		use hud::*;
		use player::*;
		use progress::*;
		use respawn::*;

		let schedule = self.schedule;

		app.add_event::<CollisionEvent>()
			.add_event::<ContactStarted>()
			.add_event::<DeathRequest>()
			.add_event::<LivesChanged>()
			.add_event::<PlayerRespawned>()
			.add_event::<FireRequest>()
			.add_event::<LevelStarted>()
			.add_event::<WorldRestored>()
			.add_event::<LevelCompleted>()
			.init_resource::<RespawnManager>();

		app.configure_sets(
			schedule,
			(
				GameplaySet::Move,
				GameplaySet::Detect,
				GameplaySet::Contacts,
				GameplaySet::Resolve,
				GameplaySet::Timers,
				GameplaySet::Restore,
				GameplaySet::Present,
			)
				.chain(),
		);

		app.add_systems(
			schedule,
			(
				(halt_locked_players, player_movement_system).chain(),
				patrol_enemies,
				spin_saws,
				roll_spike_balls,
				move_projectiles,
			)
				.in_set(GameplaySet::Move),
		)
		.add_systems(schedule, forward_collision_events.in_set(GameplaySet::Detect))
		.add_systems(
			schedule,
			(
				spike_trap_contacts,
				kill_players_touching::<SawTrap>,
				kill_players_touching::<SpikeBall>,
				kill_players_touching::<FallingSpikeBlock>,
				patrol_enemy_contacts,
				ambush_enemy_contacts,
				trigger_falling_blocks,
				trigger_emerging_spikes,
				activate_checkpoints,
				collect_pickups,
				(fire_projectiles, resolve_projectile_hits).chain(),
				complete_levels,
			)
				.in_set(GameplaySet::Contacts),
		)
		.add_systems(
			schedule,
			(announce_starting_lives, apply_death_requests, watch_player_death)
				.chain()
				.in_set(GameplaySet::Resolve),
		)
		.add_systems(
			schedule,
			(
				tick_respawn_timers,
				tick_patrol_enemies,
				tick_ambush_enemies,
				reset_falling_blocks,
				cycle_emerging_spikes,
				tick_launcher_cooldowns,
				expire_transient_effects,
			)
				.in_set(GameplaySet::Timers),
		)
		.add_systems(
			schedule,
			(capture_spawn_snapshots, run_restore_passes)
				.chain()
				.in_set(GameplaySet::Restore),
		)
		.add_systems(
			schedule,
			(sync_life_counter_subscriptions, broadcast_lives)
				.chain()
				.in_set(GameplaySet::Present),
		);
	}
}
