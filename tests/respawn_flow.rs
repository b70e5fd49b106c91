use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ColliderDisabled, Velocity};
use lifeline::ammo::{AmmoPickup, AmmoPouch};
use lifeline::checkpoint::Checkpoint;
use lifeline::contact::ContactStarted;
use lifeline::hazards::{PatrolEnemy, SpikeTrap};
use lifeline::hud::LifeCounter;
use lifeline::player::{DeathRequest, MovementLocked, Player, PlayerHealth, PlayerRespawned};
use lifeline::respawn::{Inactive, LevelStarted, RespawnManager, WorldRestored};
use lifeline::util::FrameCount;
use lifeline::GameplayPlugin;

fn test_app() -> App {
	let mut app = App::new();
	app.add_plugins(MinimalPlugins)
		.add_plugins(GameplayPlugin::in_schedule(Update));
	app
}

fn spawn_player(app: &mut App, lives: i32, spawn: Vec2, respawn_delay: usize) -> Entity {
	app.world_mut()
		.spawn((
			Player::default(),
			PlayerHealth::new(lives, spawn, FrameCount(respawn_delay)),
			AmmoPouch::new(0),
			Transform::from_translation(spawn.extend(0.0)),
		))
		.id()
}

fn touch(app: &mut App, this: Entity, other: Entity) {
	app.world_mut().send_event(ContactStarted {
		this,
		other,
		sensor: true,
	});
}

fn health(app: &App, player: Entity) -> &PlayerHealth {
	app.world().get::<PlayerHealth>(player).expect("player has health")
}

fn position(app: &App, entity: Entity) -> Vec2 {
	app.world()
		.get::<Transform>(entity)
		.expect("entity has a transform")
		.translation
		.truncate()
}

fn cursor<E: Event>(app: &App) -> EventCursor<E> {
	app.world().resource::<Events<E>>().get_cursor_current()
}

/// Events sent since `cursor` last looked
fn drain<E: Event + Clone>(app: &App, cursor: &mut EventCursor<E>) -> Vec<E> {
	cursor.read(app.world().resource::<Events<E>>()).cloned().collect()
}

/// Update until `WorldRestored` is sent, returning it
fn run_until_restored(app: &mut App) -> WorldRestored {
	let mut restored = cursor::<WorldRestored>(app);
	for _ in 0..20 {
		app.update();
		if let Some(report) = drain(app, &mut restored).first() {
			return *report;
		}
	}
	panic!("world was never restored");
}

#[test]
fn spikes_kill_and_the_player_comes_back() {
	let mut app = test_app();
	let player = spawn_player(&mut app, 3, Vec2::new(5.0, 5.0), 3);
	let trap = app.world_mut().spawn((SpikeTrap::default(), Transform::default())).id();
	app.update();

	app.world_mut().entity_mut(player).insert(Transform::from_xyz(40.0, 5.0, 0.0));
	touch(&mut app, trap, player);
	app.update();

	assert_eq!(health(&app, player).lives(), 2);
	assert!(health(&app, player).is_dead());
	assert!(app.world().entity(player).contains::<MovementLocked>());
	assert!(app.world().entity(player).contains::<ColliderDisabled>());

	// still dying: a second hit is ignored
	touch(&mut app, trap, player);
	app.update();
	assert_eq!(health(&app, player).lives(), 2);

	let mut respawns = cursor::<PlayerRespawned>(&app);
	let mut respawned = None;
	for _ in 0..10 {
		app.update();
		if let Some(event) = drain(&app, &mut respawns).first() {
			respawned = Some(*event);
			break;
		}
	}
	let respawned = respawned.expect("player should respawn");
	assert_eq!(respawned.player, player);
	assert_eq!(respawned.position, Vec2::new(5.0, 5.0));

	assert!(!health(&app, player).is_dead());
	assert_eq!(health(&app, player).lives(), 2);
	assert_eq!(position(&app, player), Vec2::new(5.0, 5.0));
	assert!(!app.world().entity(player).contains::<MovementLocked>());
	assert!(!app.world().entity(player).contains::<ColliderDisabled>());
}

#[test]
fn many_death_requests_in_one_frame_cost_one_life() {
	let mut app = test_app();
	let player = spawn_player(&mut app, 3, Vec2::ZERO, 10);
	app.update();

	for _ in 0..4 {
		app.world_mut().send_event(DeathRequest { player });
	}
	app.update();
	assert_eq!(health(&app, player).lives(), 2);
}

#[test]
fn checkpoints_move_the_respawn_point() {
	let mut app = test_app();
	let player = spawn_player(&mut app, 3, Vec2::ZERO, 0);
	let foot = app.world_mut().spawn(Transform::default()).id();
	app.world_mut().entity_mut(player).add_child(foot);

	let one_use = app
		.world_mut()
		.spawn((Checkpoint::new(Vec2::new(10.0, 0.0), true), Transform::default()))
		.id();
	let reusable = app
		.world_mut()
		.spawn((Checkpoint::new(Vec2::new(20.0, 0.0), false), Transform::default()))
		.id();
	let other = app
		.world_mut()
		.spawn((Checkpoint::new(Vec2::new(30.0, 0.0), false), Transform::default()))
		.id();
	app.update();

	// a child collider of the player counts as the player
	touch(&mut app, one_use, foot);
	app.update();
	assert_eq!(health(&app, player).respawn_target(), Vec2::new(10.0, 0.0));

	touch(&mut app, reusable, player);
	app.update();
	assert_eq!(health(&app, player).respawn_target(), Vec2::new(20.0, 0.0));

	touch(&mut app, one_use, player);
	app.update();
	assert_eq!(health(&app, player).respawn_target(), Vec2::new(20.0, 0.0));

	touch(&mut app, other, player);
	app.update();
	touch(&mut app, reusable, player);
	app.update();
	assert_eq!(health(&app, player).respawn_target(), Vec2::new(20.0, 0.0));

	app.world_mut().send_event(DeathRequest { player });
	app.update();
	assert_eq!(position(&app, player), Vec2::new(20.0, 0.0));
}

#[test]
fn death_restores_enemies_and_pickups() {
	let mut app = test_app();
	app.insert_resource(RespawnManager::with_restore_delay(FrameCount(2)));

	let player = spawn_player(&mut app, 3, Vec2::ZERO, 60);
	let mut patrol = PatrolEnemy::new(2.0, None, 30.0);
	patrol.destroy_on_attack = true;
	let enemy = app
		.world_mut()
		.spawn((patrol, Velocity::zero(), Transform::from_xyz(30.0, 5.0, 0.0)))
		.id();
	let pickup = app
		.world_mut()
		.spawn((AmmoPickup::new(3), Transform::from_xyz(40.0, 5.0, 0.0)))
		.id();

	app.world_mut().send_event(LevelStarted);
	app.update();
	{
		let manager = app.world().resource::<RespawnManager>();
		assert_eq!(manager.player(), Some(player));
		assert_eq!(manager.snapshots().len(), 2);
	}

	touch(&mut app, pickup, player);
	app.update();
	assert_eq!(app.world().get::<AmmoPouch>(player).map(|p| p.apples()), Some(3));
	assert!(app.world().entity(pickup).contains::<Inactive>());

	// the enemy takes the player down with it
	touch(&mut app, enemy, player);
	app.update();
	assert!(health(&app, player).is_dead());
	assert!(app.world().entity(enemy).contains::<Inactive>());
	app.world_mut().entity_mut(enemy).insert(Transform::from_xyz(70.0, 1.0, 0.0));

	let report = run_until_restored(&mut app);
	assert_eq!(report, WorldRestored { restored: 2, missing: 0 });

	app.update();
	assert_eq!(position(&app, enemy), Vec2::new(30.0, 5.0));
	assert!(!app.world().entity(enemy).contains::<Inactive>());
	assert!(!app.world().get::<PatrolEnemy>(enemy).map_or(true, |e| e.is_dead()));
	assert!(!app.world().entity(pickup).contains::<Inactive>());
	assert!(!app.world().get::<AmmoPickup>(pickup).map_or(true, |p| p.is_collected()));
	assert_eq!(app.world().get::<AmmoPouch>(player).map(|p| p.apples()), Some(0));
	// the player is still waiting to respawn
	assert!(health(&app, player).is_dead());
}

#[test]
fn restore_survives_a_despawned_entity() {
	let mut app = test_app();
	app.insert_resource(RespawnManager::with_restore_delay(FrameCount(1)));

	let player = spawn_player(&mut app, 3, Vec2::ZERO, 30);
	let kept = app
		.world_mut()
		.spawn((AmmoPickup::new(1), Transform::from_xyz(10.0, 0.0, 0.0)))
		.id();
	let doomed = app
		.world_mut()
		.spawn((AmmoPickup::new(1), Transform::from_xyz(20.0, 0.0, 0.0)))
		.id();
	app.world_mut().send_event(LevelStarted);
	app.update();

	touch(&mut app, kept, player);
	app.update();
	app.world_mut().despawn(doomed);

	app.world_mut().send_event(DeathRequest { player });
	let report = run_until_restored(&mut app);
	assert_eq!(report, WorldRestored { restored: 1, missing: 1 });

	app.update();
	assert!(!app.world().get::<AmmoPickup>(kept).map_or(true, |p| p.is_collected()));
}

#[test]
fn one_restore_per_death() {
	let mut app = test_app();
	app.insert_resource(RespawnManager::with_restore_delay(FrameCount(1)));
	let player = spawn_player(&mut app, 5, Vec2::ZERO, 5);
	app.world_mut().send_event(LevelStarted);
	app.update();

	app.world_mut().send_event(DeathRequest { player });
	let mut restored = cursor::<WorldRestored>(&app);
	let mut restores = 0;
	for _ in 0..8 {
		app.update();
		restores += drain(&app, &mut restored).len();
	}
	assert_eq!(restores, 1);

	// alive again, so the next death gets its own restore
	assert!(!health(&app, player).is_dead());
	app.world_mut().send_event(DeathRequest { player });
	run_until_restored(&mut app);
}

#[test]
fn life_counter_follows_lives() {
	let mut app = test_app();
	let player = spawn_player(&mut app, 3, Vec2::ZERO, 0);
	let counter = app.world_mut().spawn((LifeCounter, Text::new(""))).id();
	let text = |app: &App| app.world().get::<Text>(counter).map(|t| t.0.clone());

	app.update();
	assert_eq!(text(&app).as_deref(), Some("Life: 3"));

	app.world_mut().send_event(DeathRequest { player });
	app.update();
	assert_eq!(text(&app).as_deref(), Some("Life: 2"));

	// hidden counters stop listening
	app.world_mut().entity_mut(counter).insert(Visibility::Hidden);
	app.update();
	app.world_mut().send_event(DeathRequest { player });
	app.update();
	assert_eq!(health(&app, player).lives(), 1);
	assert_eq!(text(&app).as_deref(), Some("Life: 2"));

	// and catch up when shown again
	app.world_mut().entity_mut(counter).insert(Visibility::Inherited);
	app.update();
	assert_eq!(text(&app).as_deref(), Some("Life: 1"));
}

#[test]
fn counter_spawned_before_the_player_still_subscribes() {
	let mut app = test_app();
	let counter = app.world_mut().spawn((LifeCounter, Text::new(""))).id();
	app.update();

	spawn_player(&mut app, 4, Vec2::ZERO, 0);
	app.update();
	assert_eq!(app.world().get::<Text>(counter).map(|t| t.0.as_str()), Some("Life: 4"));
}
