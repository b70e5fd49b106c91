use crate::ammo::Launcher;
use crate::contact::{find_in_ancestors, ContactStarted};
use crate::hazards::{kill_patrol_enemy, PatrolEnemy};
use crate::util::FrameCount;
use bevy::prelude::*;
use bevy_rapier2d::prelude::{Sensor, Velocity};

#[derive(Component, Debug, Clone)]
pub struct Projectile {
	pub shooter: Entity,
	pub direction: Vec2,
	/// units per second
	pub speed: f32,
	pub remaining: FrameCount,
}

impl Projectile {
	pub fn new(shooter: Entity, direction: Vec2, speed: f32, lifetime: FrameCount) -> Self {
		Self {
			shooter,
			direction: direction.normalize_or_zero(),
			speed,
			remaining: lifetime,
		}
	}
}

/// Something with hit points that projectiles can wear down
#[derive(Component, Debug, Clone)]
pub struct Damageable {
	pub hit_points: i32,
}

impl Damageable {
	/// Returns true when this hit was fatal
	pub fn take_damage(&mut self, amount: i32) -> bool {
		self.hit_points -= amount;
		self.hit_points <= 0
	}
}

pub fn move_projectiles(
	mut commands: Commands,
	mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
	time: Res<Time>,
) {
	for (entity, mut projectile, mut transform) in &mut projectiles {
		projectile.remaining.decrement();
		if projectile.remaining.is_zero() {
			commands.entity(entity).despawn_recursive();
			continue;
		}
		let step = projectile.direction * projectile.speed * time.delta_secs();
		transform.translation += step.extend(0.0);
	}
}

pub fn resolve_projectile_hits(
	mut commands: Commands,
	mut contacts: EventReader<ContactStarted>,
	projectiles: Query<&Projectile>,
	parents: Query<&Parent>,
	shooters: Query<(), With<Launcher>>,
	sensors: Query<(), With<Sensor>>,
	mut enemies: Query<(&mut PatrolEnemy, Option<&mut Velocity>)>,
	enemy_roots: Query<(), With<PatrolEnemy>>,
	mut damageables: Query<&mut Damageable>,
	damageable_roots: Query<(), With<Damageable>>,
) {
	let mut spent = Vec::new();
	for contact in contacts.read() {
		let Ok(projectile) = projectiles.get(contact.this) else {
			continue;
		};
		if spent.contains(&contact.this) {
			continue;
		}
		// fly through triggers (checkpoints, pickups, other projectiles)
		if sensors.contains(contact.other) || projectiles.contains(contact.other) {
			continue;
		}

		if let Some(shooter) = find_in_ancestors(contact.other, &parents, &shooters) {
			debug!("projectile from {} touched player {shooter}", projectile.shooter);
		} else if let Some(enemy) = find_in_ancestors(contact.other, &parents, &enemy_roots) {
			if let Ok((mut patrol, velocity)) = enemies.get_mut(enemy) {
				kill_patrol_enemy(&mut commands, enemy, &mut patrol, velocity);
			}
		} else if let Some(target) = find_in_ancestors(contact.other, &parents, &damageable_roots) {
			if let Ok(mut damageable) = damageables.get_mut(target) {
				if damageable.take_damage(1) {
					info!("{target} destroyed by projectile");
					commands.entity(target).despawn_recursive();
				}
			}
		}

		spent.push(contact.this);
		commands.entity(contact.this).despawn_recursive();
	}
}
