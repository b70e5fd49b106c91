use crate::ammo::{AmmoPouch, Projectile};
use crate::player::Facing;
use crate::util::{Cooldown, FrameCount, Side};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// The attack handler of a player: turns [FireRequest]s into projectiles.
///
/// A component can only be attached once per entity, so a player has at most one launcher
/// and a single request can never fire twice.
#[derive(Component, Debug, Clone)]
#[require(AmmoPouch)]
pub struct Launcher {
	pub projectile_speed: f32,
	pub projectile_lifetime: FrameCount,
	pub projectile_radius: f32,
	pub shoot_cooldown: FrameCount,
	/// spawn offset relative to the player, for a player facing right
	pub fire_offset: Vec2,
	cooldown: Cooldown,
}

impl Default for Launcher {
	fn default() -> Self {
		Self {
			projectile_speed: 80.0,
			projectile_lifetime: FrameCount(180),
			projectile_radius: 0.75,
			shoot_cooldown: FrameCount(15),
			fire_offset: Vec2::new(2.5, 0.5),
			cooldown: Cooldown::default(),
		}
	}
}

impl Launcher {
	pub fn is_ready(&self) -> bool {
		self.cooldown.is_ready()
	}
}

#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct FireRequest {
	pub shooter: Entity,
}

pub fn tick_launcher_cooldowns(mut launchers: Query<&mut Launcher>) {
	for mut launcher in &mut launchers {
		launcher.cooldown.tick();
	}
}

pub fn fire_projectiles(
	mut commands: Commands,
	mut requests: EventReader<FireRequest>,
	mut launchers: Query<(&mut Launcher, &mut AmmoPouch, &Transform, Option<&Facing>)>,
) {
	for &FireRequest { shooter } in requests.read() {
		let Ok((mut launcher, mut pouch, transform, facing)) = launchers.get_mut(shooter) else {
			continue;
		};
		if !launcher.is_ready() {
			continue;
		}
		let before = pouch.apples();
		if !pouch.take_one() {
			debug!("{shooter} tried to fire with no ammo");
			continue;
		}
		let shoot_cooldown = launcher.shoot_cooldown;
		launcher.cooldown.reset(shoot_cooldown);

		let side = facing.map(|f| f.0).unwrap_or(Side::Right);
		let offset = Vec2::new(launcher.fire_offset.x * side, launcher.fire_offset.y);
		let origin = transform.translation.truncate() + offset;
		debug!("{shooter} fired toward {side:?}: ammo {before} -> {}", pouch.apples());

		commands.spawn((
			Projectile::new(shooter, side.unit(), launcher.projectile_speed, launcher.projectile_lifetime),
			Sprite::from_color(Color::srgb(0.85, 0.1, 0.1), Vec2::splat(launcher.projectile_radius * 2.0)),
			Transform::from_translation(origin.extend(1.0)),
			RigidBody::KinematicPositionBased,
			Collider::ball(launcher.projectile_radius),
			Sensor,
			ActiveEvents::COLLISION_EVENTS,
			ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC | ActiveCollisionTypes::KINEMATIC_KINEMATIC,
		));
	}
}
