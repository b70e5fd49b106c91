use crate::ammo::{AmmoPickup, AmmoPouch};
use crate::hazards::PatrolEnemy;
use crate::player::PlayerHealth;
use crate::util::{FrameCount, PendingTimers};
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ColliderDisabled, Velocity};

/// Marks an entity that has been switched off (collected, killed) but not despawned,
/// so that a world reset can bring it back.
#[derive(Component, Debug, Default, Copy, Clone)]
pub struct Inactive;

/// Switch an entity off: hidden, no collisions, skipped by gameplay systems
pub fn deactivate(commands: &mut Commands, entity: Entity) {
	commands
		.entity(entity)
		.insert((Inactive, Visibility::Hidden, ColliderDisabled));
}

/// Undo [deactivate]
pub fn reactivate(commands: &mut Commands, entity: Entity) {
	commands
		.entity(entity)
		.remove::<(Inactive, ColliderDisabled)>()
		.insert(Visibility::Inherited);
}

/// Sent once the level's entities exist, to let the manager take its snapshots
#[derive(Event, Debug, Default, Copy, Clone)]
pub struct LevelStarted;

/// Sent after a restore pass finishes
#[derive(Event, Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WorldRestored {
	pub restored: usize,
	pub missing: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackedKind {
	Enemy,
	Pickup,
}

/// Where a tracked entity started. The manager does not own the entity; it may be gone by
/// the time a restore pass runs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpawnSnapshot {
	pub entity: Entity,
	pub kind: TrackedKind,
	pub initial_position: Vec2,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct RestorePass;

/// Records where every patrol enemy and pickup stood at level start, and puts them back
/// once per player death.
#[derive(Resource, Debug)]
pub struct RespawnManager {
	/// frames between noticing a death and restoring the world
	pub restore_delay: FrameCount,
	/// whether to snapshot patrolling enemies
	pub track_enemies: bool,
	/// whether to snapshot ammo pickups
	pub track_pickups: bool,
	player: Option<Entity>,
	captured: bool,
	snapshots: Vec<SpawnSnapshot>,
	/// set once a restore pass has been scheduled for the current death
	restore_scheduled: bool,
	timers: PendingTimers<RestorePass>,
}

impl Default for RespawnManager {
	fn default() -> Self {
		Self {
			restore_delay: FrameCount(30),
			track_enemies: true,
			track_pickups: true,
			player: None,
			captured: false,
			snapshots: Vec::new(),
			restore_scheduled: false,
			timers: PendingTimers::default(),
		}
	}
}

impl RespawnManager {
	pub fn with_restore_delay(restore_delay: FrameCount) -> Self {
		Self {
			restore_delay,
			..default()
		}
	}

	pub fn player(&self) -> Option<Entity> {
		self.player
	}

	pub fn snapshots(&self) -> &[SpawnSnapshot] {
		&self.snapshots
	}

	pub fn is_restore_scheduled(&self) -> bool {
		self.restore_scheduled
	}

	/// Feed the player's current death flag. Schedules a restore pass on the first frame of
	/// each death, and re-arms once the player is alive again.
	pub fn observe(&mut self, player_dead: bool) {
		if player_dead && !self.restore_scheduled {
			debug!("player death detected, restoring world in {:?}", self.restore_delay);
			self.restore_scheduled = true;
			self.timers.schedule(self.restore_delay, RestorePass);
		} else if !player_dead && self.restore_scheduled {
			debug!("player respawned, restore guard cleared");
			self.restore_scheduled = false;
		}
	}

	/// Advance pending restore passes; returns how many are due this frame
	pub fn tick(&mut self) -> usize {
		self.timers.tick().len()
	}
}

pub fn capture_spawn_snapshots(
	mut started: EventReader<LevelStarted>,
	mut manager: ResMut<RespawnManager>,
	players: Query<Entity, With<PlayerHealth>>,
	enemies: Query<(Entity, &Transform), With<PatrolEnemy>>,
	pickups: Query<(Entity, &Transform), With<AmmoPickup>>,
) {
	if started.is_empty() {
		return;
	}
	started.clear();
	if manager.captured {
		debug!("level already snapshotted; ignoring LevelStarted");
		return;
	}
	manager.captured = true;

	let Some(player) = players.iter().next() else {
		error!("no entity with PlayerHealth at level start; world reset disabled");
		return;
	};
	manager.player = Some(player);
	info!("respawn manager watching player {player}");

	if manager.track_enemies {
		let before = manager.snapshots.len();
		for (entity, transform) in &enemies {
			let initial_position = transform.translation.truncate();
			debug!("tracking enemy {entity} at {initial_position}");
			manager.snapshots.push(SpawnSnapshot {
				entity,
				kind: TrackedKind::Enemy,
				initial_position,
			});
		}
		info!("tracking {} enemies", manager.snapshots.len() - before);
	}

	if manager.track_pickups {
		let before = manager.snapshots.len();
		for (entity, transform) in &pickups {
			let initial_position = transform.translation.truncate();
			debug!("tracking pickup {entity} at {initial_position}");
			manager.snapshots.push(SpawnSnapshot {
				entity,
				kind: TrackedKind::Pickup,
				initial_position,
			});
		}
		info!("tracking {} pickups", manager.snapshots.len() - before);
	}
}

pub fn watch_player_death(mut manager: ResMut<RespawnManager>, players: Query<&PlayerHealth>) {
	let Some(player) = manager.player else {
		return;
	};
	let Ok(health) = players.get(player) else {
		return;
	};
	manager.observe(health.is_dead());
}

pub fn run_restore_passes(
	mut commands: Commands,
	mut manager: ResMut<RespawnManager>,
	mut transforms: Query<&mut Transform>,
	mut enemies: Query<(&mut PatrolEnemy, Option<&mut Velocity>)>,
	mut pickups: Query<&mut AmmoPickup>,
	mut pouches: Query<&mut AmmoPouch>,
	mut restored_events: EventWriter<WorldRestored>,
) {
	for _ in 0..manager.tick() {
		info!("restoring {} tracked entities", manager.snapshots.len());
		let mut report = WorldRestored::default();

		for snapshot in &manager.snapshots {
			let Ok(mut transform) = transforms.get_mut(snapshot.entity) else {
				warn!("tracked {:?} {} no longer exists; skipping", snapshot.kind, snapshot.entity);
				report.missing += 1;
				continue;
			};

			reactivate(&mut commands, snapshot.entity);
			transform.translation.x = snapshot.initial_position.x;
			transform.translation.y = snapshot.initial_position.y;

			match snapshot.kind {
				TrackedKind::Enemy => {
					if let Ok((mut enemy, velocity)) = enemies.get_mut(snapshot.entity) {
						enemy.reset();
						if let Some(mut velocity) = velocity {
							*velocity = Velocity::zero();
						}
					}
				}
				TrackedKind::Pickup => {
					if let Ok(mut pickup) = pickups.get_mut(snapshot.entity) {
						pickup.reset();
					}
				}
			}
			report.restored += 1;
		}

		match manager.player.map(|player| pouches.get_mut(player)) {
			Some(Ok(mut pouch)) => {
				pouch.empty();
				debug!("player ammo reset to 0");
			}
			_ => debug!("player has no ammo pouch to empty"),
		}

		info!("world restored: {} entities, {} missing", report.restored, report.missing);
		restored_events.send(report);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn one_restore_per_death() {
		let mut manager = RespawnManager::with_restore_delay(FrameCount(2));
		manager.observe(true);
		manager.observe(true);
		manager.observe(true);
		assert!(manager.is_restore_scheduled());
		assert_eq!(manager.tick(), 0);
		assert_eq!(manager.tick(), 1);
		manager.observe(true);
		assert_eq!(manager.tick(), 0);
	}

	#[test]
	fn guard_rearms_after_respawn() {
		let mut manager = RespawnManager::with_restore_delay(FrameCount(1));
		manager.observe(true);
		assert_eq!(manager.tick(), 1);
		manager.observe(false);
		assert!(!manager.is_restore_scheduled());
		manager.observe(true);
		assert_eq!(manager.tick(), 1);
	}

	#[test]
	fn respawn_before_restore_does_not_cancel_it() {
		let mut manager = RespawnManager::with_restore_delay(FrameCount(3));
		manager.observe(true);
		manager.tick();
		manager.observe(false);
		manager.tick();
		assert_eq!(manager.tick(), 1);
	}
}
