use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use lifeline::contact::ContactStarted;
use lifeline::player::{Player, PlayerHealth};
use lifeline::progress::{LevelCompleteTrigger, LevelCompleted, SaveStore, MAX_LEVEL_KEY};
use lifeline::util::FrameCount;
use lifeline::GameplayPlugin;
use std::path::PathBuf;

fn test_app() -> App {
	let mut app = App::new();
	app.add_plugins(MinimalPlugins)
		.add_plugins(GameplayPlugin::in_schedule(Update));
	app
}

/// A save file path no other test uses, with any leftover from an earlier run removed
fn save_path(name: &str) -> PathBuf {
	let path = std::env::temp_dir().join(format!("lifeline-progress-{}-{name}.ron", std::process::id()));
	let _ = std::fs::remove_file(&path);
	path
}

fn spawn_player(app: &mut App) -> Entity {
	app.world_mut()
		.spawn((
			Player::default(),
			PlayerHealth::new(3, Vec2::ZERO, FrameCount(0)),
			Transform::default(),
		))
		.id()
}

fn spawn_exit(app: &mut App, level_number: i64) -> Entity {
	app.world_mut()
		.spawn((
			LevelCompleteTrigger {
				level_number,
				next_scene: "level_3".into(),
			},
			Transform::default(),
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

/// Touch `exit` with `other` and return every `LevelCompleted` sent as a result
fn finish(app: &mut App, exit: Entity, other: Entity) -> Vec<LevelCompleted> {
	let mut cursor: EventCursor<LevelCompleted> = app.world().resource::<Events<LevelCompleted>>().get_cursor_current();
	touch(app, exit, other);
	app.update();
	cursor.read(app.world().resource::<Events<LevelCompleted>>()).cloned().collect()
}

#[test]
fn finishing_a_level_unlocks_the_next_one_on_disk() {
	let path = save_path("unlock");
	let mut app = test_app();
	app.insert_resource(SaveStore::new(path.clone()));
	let player = spawn_player(&mut app);
	let exit = spawn_exit(&mut app, 2);
	app.update();

	let sent = finish(&mut app, exit, player);
	assert_eq!(
		sent,
		vec![LevelCompleted {
			level_number: 2,
			next_scene: "level_3".into(),
		}]
	);
	assert_eq!(app.world().resource::<SaveStore>().max_level_reached(), 3);

	let reloaded = SaveStore::load(path.clone()).expect("progress should have been written");
	assert_eq!(reloaded.max_level_reached(), 3);
	let _ = std::fs::remove_file(&path);
}

#[test]
fn replaying_an_early_level_keeps_later_progress() {
	let path = save_path("replay");
	let mut earlier = SaveStore::new(path.clone());
	earlier.set(MAX_LEVEL_KEY, 5);
	earlier.save().expect("seed save should write");

	let mut app = test_app();
	app.insert_resource(SaveStore::load(path.clone()).expect("seed save should load"));
	let player = spawn_player(&mut app);
	let exit = spawn_exit(&mut app, 2);
	app.update();

	let sent = finish(&mut app, exit, player);
	assert_eq!(sent.len(), 1);
	assert_eq!(app.world().resource::<SaveStore>().max_level_reached(), 5);
	let reloaded = SaveStore::load(path.clone()).expect("save should still load");
	assert_eq!(reloaded.max_level_reached(), 5);
	let _ = std::fs::remove_file(&path);
}

#[test]
fn only_the_player_can_finish_a_level() {
	let path = save_path("not-player");
	let mut app = test_app();
	app.insert_resource(SaveStore::new(path.clone()));
	spawn_player(&mut app);
	let crate_box = app.world_mut().spawn(Transform::default()).id();
	let exit = spawn_exit(&mut app, 1);
	app.update();

	let sent = finish(&mut app, exit, crate_box);
	assert!(sent.is_empty());
	assert_eq!(app.world().resource::<SaveStore>().max_level_reached(), 1);
	assert!(!path.exists());
}

#[test]
fn a_child_collider_of_the_player_counts() {
	let path = save_path("child");
	let mut app = test_app();
	app.insert_resource(SaveStore::new(path.clone()));
	let player = spawn_player(&mut app);
	let foot = app.world_mut().spawn(Transform::default()).id();
	app.world_mut().entity_mut(player).add_child(foot);
	let exit = spawn_exit(&mut app, 1);
	app.update();

	assert_eq!(finish(&mut app, exit, foot).len(), 1);
	assert_eq!(app.world().resource::<SaveStore>().max_level_reached(), 2);
	let _ = std::fs::remove_file(&path);
}

#[test]
fn completion_is_reported_without_a_save_store() {
	let mut app = test_app();
	let player = spawn_player(&mut app);
	let exit = spawn_exit(&mut app, 4);
	app.update();

	let sent = finish(&mut app, exit, player);
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].level_number, 4);
	assert!(app.world().get_resource::<SaveStore>().is_none());
}
