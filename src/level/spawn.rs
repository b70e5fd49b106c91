use crate::ammo::{AmmoPickup, AmmoPouch, Launcher};
use crate::checkpoint::{Checkpoint, CheckpointFeedback};
use crate::hazards::*;
use crate::level::LevelDescription;
use crate::player::{DeathEffects, Player, PlayerHealth};
use crate::progress::LevelCompleteTrigger;
use crate::respawn::{LevelStarted, RespawnManager};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// The level being played, and whether its entities exist yet
#[derive(Resource, Debug)]
pub struct CurrentLevel {
	pub handle: Handle<LevelDescription>,
	spawned: bool,
}

impl CurrentLevel {
	pub fn new(handle: Handle<LevelDescription>) -> Self {
		Self { handle, spawned: false }
	}
}

#[derive(Component)]
pub struct Platform;

/// collision group the player's collider belongs to
pub const PLAYER_GROUP: Group = Group::GROUP_1;

fn sensor_box(pos: Vec2, size: Vec2) -> impl Bundle {
	(
		Collider::cuboid(size.x * 0.5, size.y * 0.5),
		Sensor,
		ActiveEvents::COLLISION_EVENTS,
		ActiveCollisionTypes::all(),
		Transform::from_translation(pos.extend(0.0)),
	)
}

pub fn spawn_level(
	mut commands: Commands,
	asset_server: Res<AssetServer>,
	mut current: ResMut<CurrentLevel>,
	levels: Res<Assets<LevelDescription>>,
	mut manager: ResMut<RespawnManager>,
	mut started: EventWriter<LevelStarted>,
) {
	if current.spawned {
		return;
	}
	let Some(level) = levels.get(current.handle.id()) else {
		debug!("level not loaded yet");
		return;
	};
	current.spawned = true;
	info!("spawning level {}", level.level_number);

	manager.restore_delay = level.restore_delay;

	for platform in &level.platforms {
		commands.spawn((
			Platform,
			RigidBody::Fixed,
			Sprite::from_color(Color::srgb(0.15, 0.8, 0.25), platform.size),
			Collider::cuboid(platform.size.x * 0.5, platform.size.y * 0.5),
			Transform::from_translation(platform.pos.extend(0.0)),
		));
	}

	let player = &level.player;
	commands.spawn((
		Player {
			params: player.controls.unwrap_or_default(),
		},
		PlayerHealth::new(player.starting_lives, player.spawn, player.respawn_delay),
		DeathEffects(player.death_effects.load(&asset_server)),
		Launcher::default(),
		AmmoPouch::new(player.starting_ammo),
		Sprite::from_color(Color::srgb(1., 0.5, 0.), Vec2::new(3.0, 5.0)),
		Collider::cuboid(1.5, 2.5),
		CollisionGroups::new(PLAYER_GROUP, Group::ALL),
		Transform::from_translation(player.spawn.extend(1.0)),
		RigidBody::KinematicPositionBased,
		KinematicCharacterController {
			filter_flags: QueryFilterFlags::EXCLUDE_DYNAMIC | QueryFilterFlags::EXCLUDE_SENSORS,
			..default()
		},
		KinematicCharacterControllerOutput::default(),
		(ActiveEvents::COLLISION_EVENTS, ActiveCollisionTypes::all()),
	));

	for checkpoint in &level.checkpoints {
		commands.spawn((
			Checkpoint::new(checkpoint.pos, checkpoint.one_use),
			CheckpointFeedback {
				effect: checkpoint.effects.load(&asset_server),
				activated_color: Some(Color::srgb(0.2, 0.6, 1.0)),
			},
			Sprite::from_color(Color::srgb(0.6, 0.6, 0.6), Vec2::new(2.0, 6.0)),
			sensor_box(checkpoint.pos, Vec2::new(2.0, 6.0)),
		));
	}

	for trap in &level.spike_traps {
		commands.spawn((
			SpikeTrap {
				filter: trap.filter,
				hit_feedback: trap.hit_effects.load(&asset_server),
			},
			Sprite::from_color(Color::srgb(0.7, 0.7, 0.75), trap.size),
			sensor_box(trap.pos, trap.size),
		));
	}

	for saw in &level.saws {
		commands.spawn((
			SawTrap {
				degrees_per_second: saw.degrees_per_second,
				clockwise: saw.clockwise,
			},
			Sprite::from_color(Color::srgb(0.8, 0.8, 0.8), Vec2::splat(saw.radius * 2.0)),
			Collider::ball(saw.radius),
			Sensor,
			ActiveEvents::COLLISION_EVENTS,
			ActiveCollisionTypes::all(),
			Transform::from_translation(saw.pos.extend(0.0)),
		));
	}

	for ball in &level.spike_balls {
		commands.spawn((
			SpikeBall::new(ball.left, ball.right, ball.speed),
			Sprite::from_color(Color::srgb(0.3, 0.3, 0.3), Vec2::splat(ball.radius * 2.0)),
			Collider::ball(ball.radius),
			Sensor,
			ActiveEvents::COLLISION_EVENTS,
			ActiveCollisionTypes::all(),
			Transform::from_translation(ball.left.extend(0.0)),
		));
	}

	for falling in &level.falling_blocks {
		let home = Transform::from_translation(falling.pos.extend(0.0));
		let block = commands
			.spawn((
				FallingSpikeBlock::new(home, falling.reset_delay),
				Sprite::from_color(Color::srgb(0.5, 0.4, 0.4), falling.size),
				RigidBody::KinematicPositionBased,
				Velocity::zero(),
				GravityScale(1.0),
				Collider::cuboid(falling.size.x * 0.5, falling.size.y * 0.5),
				ActiveEvents::COLLISION_EVENTS,
				ActiveCollisionTypes::all(),
				home,
			))
			.id();
		commands.spawn((
			FallTrigger {
				block,
				filter: falling.filter,
			},
			sensor_box(falling.trigger.pos, falling.trigger.size),
		));
	}

	for spikes in &level.emerging_spikes {
		let blade = commands
			.spawn((
				SpikeTrap {
					filter: spikes.filter,
					..default()
				},
				Sprite::from_color(Color::srgb(0.7, 0.7, 0.75), spikes.blade_size),
				Collider::cuboid(spikes.blade_size.x * 0.5, spikes.blade_size.y * 0.5),
				Sensor,
				ColliderDisabled,
				ActiveEvents::COLLISION_EVENTS,
				ActiveCollisionTypes::all(),
				Transform::default(),
			))
			.id();
		let mut emerging = EmergingSpikes::new(blade, Vec2::ZERO, spikes.raised_offset);
		emerging.filter = spikes.filter;
		commands.spawn((emerging, sensor_box(spikes.area.pos, spikes.area.size))).add_child(blade);
	}

	for enemy in &level.patrol_enemies {
		let mut patrol = PatrolEnemy::new(enemy.speed, enemy.waypoints, enemy.pos.x);
		patrol.destroy_on_attack = enemy.destroy_on_attack;
		patrol.attack_cooldown = enemy.attack_cooldown;
		patrol.attack_effect = enemy.attack_effects.load(&asset_server);
		commands.spawn((
			patrol,
			Sprite::from_color(Color::srgb(0.8, 0.2, 0.3), Vec2::new(3.0, 3.0)),
			RigidBody::Dynamic,
			LockedAxes::ROTATION_LOCKED,
			Velocity::zero(),
			Collider::cuboid(1.5, 1.5),
			ActiveEvents::COLLISION_EVENTS,
			Transform::from_translation(enemy.pos.extend(0.0)),
		));
	}

	for enemy in &level.ambush_enemies {
		commands.spawn((
			{
				let mut ambush = AmbushEnemy::default();
				ambush.despawn_delay = enemy.despawn_delay;
				ambush
			},
			Sprite::from_color(Color::srgb(0.6, 0.1, 0.5), Vec2::new(3.0, 3.0)),
			sensor_box(enemy.pos, Vec2::new(3.0, 3.0)),
		));
	}

	for wall in &level.enemy_walls {
		commands.spawn((EnemyWall, sensor_box(wall.pos, wall.size)));
	}

	for pickup in &level.pickups {
		commands.spawn((
			AmmoPickup::new(pickup.apple_count),
			Sprite::from_color(Color::srgb(0.9, 0.1, 0.1), Vec2::splat(2.0)),
			sensor_box(pickup.pos, Vec2::splat(2.0)),
		));
	}

	if let Some(exit) = &level.exit {
		commands.spawn((
			LevelCompleteTrigger {
				level_number: level.level_number,
				next_scene: exit.next_scene.clone(),
			},
			Sprite::from_color(Color::srgba(1.0, 1.0, 0.2, 0.5), exit.area.size),
			sensor_box(exit.area.pos, exit.area.size),
		));
	}

	started.send(LevelStarted);
}
