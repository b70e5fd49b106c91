use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy_rapier2d::prelude::*;
use lifeline::ammo::FireRequest;
use lifeline::hud::LifeCounter;
use lifeline::level::LevelPlugin;
use lifeline::player::{Player, PlayerIntent};
use lifeline::progress::{LevelCompleted, SaveStore};
use lifeline::respawn::WorldRestored;
use lifeline::util::Side;
use lifeline::{GameplayPlugin, GameplaySet};

const SAVE_PATH: &str = "save.ron";

fn main() {
	App::new()
		// baseline bevy stuff
		.add_plugins(DefaultPlugins)
		.insert_resource(Time::<Fixed>::from_hz(60.))
		//
		// game
		.add_plugins(GameplayPlugin::in_fixed_schedule())
		.add_plugins(LevelPlugin::default())
		.add_systems(Startup, (setup_camera, setup_hud, load_progress))
		.add_systems(FixedUpdate, read_player_input.before(GameplaySet::Move))
		.add_systems(Update, (log_level_completion, log_world_restores))
		//
		// rapier physics
		//
		.insert_resource(TimestepMode::Fixed {
			dt: 1. / 60.,
			substeps: 1,
		})
		.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(10.0).in_fixed_schedule())
		.add_plugins(RapierDebugRenderPlugin::default())
		.run();
}

fn setup_camera(mut commands: Commands) {
	commands.spawn((
		Camera2d,
		Transform::from_xyz(50.0, 50.0, 1.0),
		OrthographicProjection {
			scaling_mode: ScalingMode::AutoMin {
				min_width: 100.,
				min_height: 100.,
			},
			..OrthographicProjection::default_2d()
		},
	));
}

fn setup_hud(mut commands: Commands) {
	commands.spawn((
		LifeCounter,
		Text::new("Life: -"),
		Node {
			position_type: PositionType::Absolute,
			top: Val::Px(10.0),
			left: Val::Px(10.0),
			..default()
		},
	));
}

fn load_progress(mut commands: Commands) {
	let store = match SaveStore::load(SAVE_PATH) {
		Ok(store) => {
			info!("progress loaded, max level reached: {}", store.max_level_reached());
			store
		}
		Err(e) => {
			error!("could not load progress from {SAVE_PATH}, starting fresh: {e}");
			SaveStore::new(SAVE_PATH)
		}
	};
	commands.insert_resource(store);
}

fn read_player_input(
	kb: Res<ButtonInput<KeyCode>>,
	mut players: Query<(Entity, &mut PlayerIntent), With<Player>>,
	mut fire: EventWriter<FireRequest>,
) {
	let horizontal = {
		let mut x = 0.0;
		if kb.pressed(KeyCode::KeyA) {
			x -= 1.0;
		}
		if kb.pressed(KeyCode::KeyD) {
			x += 1.0;
		}
		Side::from_sign(x)
	};

	for (player, mut intent) in &mut players {
		intent.horizontal = horizontal;
		intent.jump = kb.just_pressed(KeyCode::Space);
		if kb.just_pressed(KeyCode::KeyF) {
			fire.send(FireRequest { shooter: player });
		}
	}
}

fn log_level_completion(mut completed: EventReader<LevelCompleted>) {
	for LevelCompleted { level_number, next_scene } in completed.read() {
		// scene changes are not handled yet, so the level just keeps running
		info!("finished level {level_number}; next up is {next_scene}");
	}
}

fn log_world_restores(mut restored: EventReader<WorldRestored>) {
	for report in restored.read() {
		debug!("{report:?}");
	}
}
