use crate::effects::{play_effect, EffectAssets};
use crate::hud::LivesObservers;
use crate::player::MovementLocked;
use crate::util::{FrameCount, PendingTimers};
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ColliderDisabled, RigidBody, Velocity};

/// Something wants `player` dead. Hazards send this instead of touching [PlayerHealth] directly.
#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeathRequest {
	pub player: Entity,
}

/// Broadcast whenever a player's lives count changes, including once at spawn
#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct LivesChanged {
	pub player: Entity,
	pub lives: i32,
}

#[derive(Event, Debug, Copy, Clone, PartialEq)]
pub struct PlayerRespawned {
	pub player: Entity,
	pub position: Vec2,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum HealthTimer {
	Respawn,
}

/// Lives and respawn state of a player.
///
/// The player is either alive, or dying: between a successful [PlayerHealth::die] and the
/// end of the respawn delay. Only one respawn can be in flight, so `die` does nothing
/// while dying. Lives have no lower bound.
#[derive(Component, Debug)]
#[require(LivesObservers)]
pub struct PlayerHealth {
	lives: i32,
	dying: bool,
	respawn_target: Vec2,
	respawn_delay: FrameCount,
	/// body type to restore once the respawn completes
	frozen_body: Option<RigidBody>,
	timers: PendingTimers<HealthTimer>,
}

impl PlayerHealth {
	/// `spawn_position` is the respawn target until a checkpoint says otherwise
	pub fn new(starting_lives: i32, spawn_position: Vec2, respawn_delay: FrameCount) -> Self {
		Self {
			lives: starting_lives,
			dying: false,
			respawn_target: spawn_position,
			respawn_delay,
			frozen_body: None,
			timers: PendingTimers::default(),
		}
	}

	pub fn lives(&self) -> i32 {
		self.lives
	}

	/// True from the moment of death until the respawn completes
	pub fn is_dead(&self) -> bool {
		self.dying
	}

	pub fn respawn_target(&self) -> Vec2 {
		self.respawn_target
	}

	pub fn set_respawn_point(&mut self, point: Vec2) {
		self.respawn_target = point;
	}

	/// Start a death. Returns the new lives count, or `None` if a respawn is already in progress.
	pub fn die(&mut self) -> Option<i32> {
		if self.dying {
			return None;
		}
		self.dying = true;
		self.lives -= 1;
		self.timers.schedule(self.respawn_delay, HealthTimer::Respawn);
		Some(self.lives)
	}

	/// Advance the respawn timer by one frame.
	/// Returns the position to respawn at when the respawn completes on this frame.
	pub fn tick(&mut self) -> Option<Vec2> {
		let mut respawned = None;
		for timer in self.timers.tick() {
			match timer {
				HealthTimer::Respawn => {
					self.dying = false;
					respawned = Some(self.respawn_target);
				}
			}
		}
		respawned
	}
}

/// Optional feedback played when the player dies
#[derive(Component, Debug, Default, Clone)]
pub struct DeathEffects(pub EffectAssets);

pub fn announce_starting_lives(
	players: Query<(Entity, &PlayerHealth), Added<PlayerHealth>>,
	mut lives_changed: EventWriter<LivesChanged>,
) {
	for (player, health) in &players {
		lives_changed.send(LivesChanged {
			player,
			lives: health.lives(),
		});
	}
}

pub fn apply_death_requests(
	mut commands: Commands,
	mut requests: EventReader<DeathRequest>,
	mut players: Query<(
		&mut PlayerHealth,
		&Transform,
		Option<&RigidBody>,
		Option<&mut Velocity>,
		Option<&DeathEffects>,
	)>,
	mut lives_changed: EventWriter<LivesChanged>,
) {
	for &DeathRequest { player } in requests.read() {
		let Ok((mut health, transform, body, velocity, effects)) = players.get_mut(player) else {
			debug!("death requested for {player}, which has no PlayerHealth; ignoring");
			continue;
		};
		let Some(lives) = health.die() else {
			debug!("death requested for {player} while already dying; ignoring");
			continue;
		};

		info!("player {player} died, {lives} lives left");
		lives_changed.send(LivesChanged { player, lives });

		// freeze in place until the respawn: no input, no collisions, no physics response
		if let Some(body) = body {
			health.frozen_body = Some(*body);
			commands.entity(player).insert(RigidBody::KinematicPositionBased);
		}
		if let Some(mut velocity) = velocity {
			*velocity = Velocity::zero();
		}
		commands.entity(player).insert((MovementLocked, ColliderDisabled));

		let position = transform.translation.truncate();
		match effects {
			Some(DeathEffects(assets)) => play_effect(&mut commands, assets, position, "death"),
			None => warn!("player {player} has no DeathEffects; skipping death feedback"),
		}
	}
}

pub fn tick_respawn_timers(
	mut commands: Commands,
	mut players: Query<(Entity, &mut PlayerHealth, &mut Transform, Option<&mut Velocity>)>,
	mut respawned: EventWriter<PlayerRespawned>,
) {
	for (player, mut health, mut transform, velocity) in &mut players {
		let Some(position) = health.tick() else {
			continue;
		};

		transform.translation.x = position.x;
		transform.translation.y = position.y;
		if let Some(body) = health.frozen_body.take() {
			commands.entity(player).insert(body);
		}
		if let Some(mut velocity) = velocity {
			*velocity = Velocity::zero();
		}
		commands.entity(player).remove::<(MovementLocked, ColliderDisabled)>();

		info!("player {player} respawned at {position}");
		respawned.send(PlayerRespawned { player, position });
	}
}
