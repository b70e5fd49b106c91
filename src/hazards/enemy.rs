use crate::contact::ContactStarted;
use crate::effects::{play_effect, EffectAssets};
use crate::hazards::{EnemyWall, PlayerLookup};
use crate::player::DeathRequest;
use crate::respawn::{deactivate, Inactive};
use crate::util::{FrameCount, PendingTimers, Side};
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ColliderDisabled, Velocity};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum EnemyTimer {
	AttackCooldown,
	Despawn,
}

/// how far an enemy is pushed past a boundary when it turns around, so it doesn't re-trigger
const REVERSE_NUDGE: f32 = 0.02;

/// An enemy that walks back and forth and kills the player on touch.
///
/// It turns around either at two waypoints, or when it bumps into an [EnemyWall].
/// When killed it is switched off rather than despawned, so the world reset can bring it back.
#[derive(Component, Debug)]
pub struct PatrolEnemy {
	/// units per second
	pub move_speed: f32,
	/// left and right x bounds of the patrol; `None` means "turn at walls"
	waypoints: Option<(f32, f32)>,
	pub kill_player_on_touch: bool,
	/// die after attacking, instead of cooling down
	pub destroy_on_attack: bool,
	pub attack_cooldown: FrameCount,
	/// played where the enemy stands each time it hits the player
	pub attack_effect: EffectAssets,
	direction: Side,
	dead: bool,
	on_cooldown: bool,
	timers: PendingTimers<EnemyTimer>,
}

impl PatrolEnemy {
	pub fn new(move_speed: f32, waypoints: Option<(f32, f32)>, start_x: f32) -> Self {
		let waypoints = waypoints.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });
		let direction = match waypoints {
			Some((left, right)) if start_x >= (left + right) * 0.5 => Side::Left,
			_ => Side::Right,
		};
		Self {
			move_speed,
			waypoints,
			kill_player_on_touch: true,
			destroy_on_attack: false,
			attack_cooldown: FrameCount(30),
			attack_effect: EffectAssets::default(),
			direction,
			dead: false,
			on_cooldown: false,
			timers: PendingTimers::default(),
		}
	}

	pub fn waypoints(&self) -> Option<(f32, f32)> {
		self.waypoints
	}

	pub fn direction(&self) -> Side {
		self.direction
	}

	pub fn is_dead(&self) -> bool {
		self.dead
	}

	pub fn is_on_cooldown(&self) -> bool {
		self.on_cooldown
	}

	pub fn velocity_x(&self) -> f32 {
		if self.dead { 0.0 } else { self.move_speed * self.direction }
	}

	/// Turn around, returning how far to nudge the enemy in its new direction
	pub fn reverse(&mut self) -> f32 {
		self.direction = -self.direction;
		REVERSE_NUDGE * self.direction
	}

	/// Whether the enemy at `x` has walked past the waypoint it is heading for
	pub fn passed_waypoint(&self, x: f32) -> bool {
		match (self.waypoints, self.direction) {
			(Some((_, right)), Side::Right) => x >= right,
			(Some((left, _)), Side::Left) => x <= left,
			(None, _) => false,
		}
	}

	/// Mark as dead. Returns false if it already was.
	pub fn die_now(&mut self) -> bool {
		if self.dead {
			return false;
		}
		self.dead = true;
		true
	}

	/// Start the attack cooldown, during which contacts are ignored
	pub fn begin_cooldown(&mut self) {
		self.on_cooldown = true;
		self.timers.schedule(self.attack_cooldown, EnemyTimer::AttackCooldown);
	}

	/// Advance the cooldown timer. Returns true when the cooldown ends on this frame.
	pub fn tick(&mut self) -> bool {
		let mut cooled_down = false;
		for timer in self.timers.tick() {
			if timer == EnemyTimer::AttackCooldown {
				self.on_cooldown = false;
				cooled_down = true;
			}
		}
		cooled_down
	}

	/// Back to the alive, ready state. Any pending cooldown is forgotten.
	pub fn reset(&mut self) {
		self.dead = false;
		self.on_cooldown = false;
		self.timers.clear();
	}
}

/// Kill a patrolling enemy, switching it off so it can be restored later
pub fn kill_patrol_enemy(
	commands: &mut Commands,
	entity: Entity,
	enemy: &mut PatrolEnemy,
	velocity: Option<Mut<Velocity>>,
) {
	if !enemy.die_now() {
		return;
	}
	if let Some(mut velocity) = velocity {
		*velocity = Velocity::zero();
	}
	deactivate(commands, entity);
	info!("enemy {entity} killed (disabled until the next world reset)");
}

pub fn patrol_enemies(
	mut enemies: Query<(&mut PatrolEnemy, &mut Transform, Option<&mut Velocity>), Without<Inactive>>,
	time: Res<Time>,
) {
	for (mut enemy, mut transform, velocity) in &mut enemies {
		if enemy.is_dead() {
			continue;
		}
		let vx = enemy.velocity_x();
		match velocity {
			Some(mut velocity) => velocity.linvel.x = vx,
			None => transform.translation.x += vx * time.delta_secs(),
		}
		if enemy.passed_waypoint(transform.translation.x) {
			transform.translation.x += enemy.reverse();
		}
	}
}

pub fn patrol_enemy_contacts(
	mut commands: Commands,
	mut contacts: EventReader<ContactStarted>,
	mut enemies: Query<(&mut PatrolEnemy, &mut Transform, Option<&mut Velocity>), Without<Inactive>>,
	walls: Query<(), With<EnemyWall>>,
	lookup: PlayerLookup,
	mut deaths: EventWriter<DeathRequest>,
) {
	for contact in contacts.read() {
		let Ok((mut enemy, mut transform, velocity)) = enemies.get_mut(contact.this) else {
			continue;
		};
		if enemy.is_dead() || enemy.is_on_cooldown() {
			continue;
		}

		if let Some(player) = lookup.vulnerable(contact.other) {
			if enemy.kill_player_on_touch {
				deaths.send(DeathRequest { player });
			}
			play_effect(
				&mut commands,
				&enemy.attack_effect,
				transform.translation.truncate(),
				"patrol enemy attack",
			);
			if enemy.destroy_on_attack {
				kill_patrol_enemy(&mut commands, contact.this, &mut enemy, velocity);
			} else {
				enemy.begin_cooldown();
				commands.entity(contact.this).insert(ColliderDisabled);
			}
			continue;
		}

		if enemy.waypoints().is_none() && walls.contains(contact.other) {
			transform.translation.x += enemy.reverse();
		}
	}
}

pub fn tick_patrol_enemies(mut commands: Commands, mut enemies: Query<(Entity, &mut PatrolEnemy)>) {
	for (entity, mut enemy) in &mut enemies {
		if enemy.tick() && !enemy.is_dead() {
			commands.entity(entity).remove::<ColliderDisabled>();
		}
	}
}

/// An enemy that sacrifices itself: touching the player kills both of them
#[derive(Component, Debug, Clone)]
pub struct AmbushEnemy {
	pub kill_player_on_touch: bool,
	/// frames between the attack and despawning; zero despawns immediately
	pub despawn_delay: FrameCount,
	pub death_effect: EffectAssets,
	struck: bool,
	timers: PendingTimers<EnemyTimer>,
}

impl Default for AmbushEnemy {
	fn default() -> Self {
		Self {
			kill_player_on_touch: true,
			despawn_delay: FrameCount(4),
			death_effect: EffectAssets::default(),
			struck: false,
			timers: PendingTimers::default(),
		}
	}
}

impl AmbushEnemy {
	pub fn has_struck(&self) -> bool {
		self.struck
	}
}

pub fn ambush_enemy_contacts(
	mut commands: Commands,
	mut contacts: EventReader<ContactStarted>,
	mut enemies: Query<(&mut AmbushEnemy, &GlobalTransform)>,
	lookup: PlayerLookup,
	mut deaths: EventWriter<DeathRequest>,
) {
	for contact in contacts.read() {
		let Ok((mut enemy, transform)) = enemies.get_mut(contact.this) else {
			continue;
		};
		if enemy.struck {
			continue;
		}
		let Some(player) = lookup.vulnerable(contact.other) else {
			continue;
		};

		enemy.struck = true;
		if enemy.kill_player_on_touch {
			deaths.send(DeathRequest { player });
		}
		play_effect(
			&mut commands,
			&enemy.death_effect,
			transform.translation().truncate(),
			"ambush enemy",
		);

		if enemy.despawn_delay.is_zero() {
			commands.entity(contact.this).despawn_recursive();
		} else {
			commands.entity(contact.this).insert(ColliderDisabled);
			let delay = enemy.despawn_delay;
			enemy.timers.schedule(delay, EnemyTimer::Despawn);
		}
	}
}

pub fn tick_ambush_enemies(mut commands: Commands, mut enemies: Query<(Entity, &mut AmbushEnemy)>) {
	for (entity, mut enemy) in &mut enemies {
		if enemy.timers.tick().contains(&EnemyTimer::Despawn) {
			debug!("ambush enemy {entity} despawned");
			commands.entity(entity).despawn_recursive();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn waypoints_are_sorted_and_pick_a_direction() {
		let enemy = PatrolEnemy::new(2.0, Some((10.0, 0.0)), 2.0);
		assert_eq!(enemy.waypoints(), Some((0.0, 10.0)));
		assert_eq!(enemy.direction(), Side::Right);
		let enemy = PatrolEnemy::new(2.0, Some((0.0, 10.0)), 8.0);
		assert_eq!(enemy.direction(), Side::Left);
	}

	#[test]
	fn turns_around_past_a_waypoint() {
		let mut enemy = PatrolEnemy::new(2.0, Some((0.0, 10.0)), 2.0);
		assert!(!enemy.passed_waypoint(9.0));
		assert!(enemy.passed_waypoint(10.0));
		assert!(enemy.reverse() < 0.0);
		assert_eq!(enemy.velocity_x(), -2.0);
		assert!(enemy.passed_waypoint(-0.1));
	}

	#[test]
	fn cooldown_expires() {
		let mut enemy = PatrolEnemy::new(1.0, None, 0.0);
		enemy.attack_cooldown = FrameCount(2);
		enemy.begin_cooldown();
		assert!(enemy.is_on_cooldown());
		assert!(!enemy.tick());
		assert!(enemy.tick());
		assert!(!enemy.is_on_cooldown());
	}

	#[test]
	fn reset_revives_and_forgets_cooldown() {
		let mut enemy = PatrolEnemy::new(1.0, None, 0.0);
		enemy.begin_cooldown();
		assert!(enemy.die_now());
		assert!(!enemy.die_now());
		assert_eq!(enemy.velocity_x(), 0.0);
		enemy.reset();
		assert!(!enemy.is_dead());
		assert!(!enemy.is_on_cooldown());
		assert!(!enemy.tick());
	}
}
