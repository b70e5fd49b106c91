mod control_params;
mod control_state;
mod health;
mod system;

use bevy::prelude::Component;
pub use control_params::*;
pub use control_state::*;
pub use health::*;
pub use system::*;

#[derive(Component, Debug, Default)]
#[require(PlayerControlState, PlayerIntent, Facing)]
pub struct Player {
	pub params: PlayerControlParams,
}

/// While present, the player ignores movement input
#[derive(Component, Debug, Default, Copy, Clone)]
pub struct MovementLocked;
