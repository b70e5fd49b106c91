use crate::util::{CapacitiveFlag, Cooldown, Side};
use bevy::math::Vec2;
use bevy::prelude::Component;

#[derive(Component, Default, Debug)]
pub struct PlayerControlState {
	/// tracks whether the player is on the ground, or how recently they were on the ground
	pub grounded: CapacitiveFlag,

	/// tracks whether the player is airborne as the result of a jump (as opposed to falling)
	pub jumping: bool,

	/// flag used to avoid decrementing `jumps_remaining` every frame while in midair
	pub lost_jump_due_to_falling: bool,

	/// Velocity derived from the directional inputs, and gravity
	pub own_velocity: Vec2,

	/// Input buffer for jumping
	pub jump_requested: CapacitiveFlag,

	/// Resource counter for the player's jumps. Decrements when jumping from the ground or falling
	/// from a platform. Resets when landing on the ground
	pub jumps_remaining: u8,

	/// cooldown timer for jumping
	pub jump_cooldown: Cooldown,
}

impl PlayerControlState {
	/// Forget all motion, e.g. when the player is frozen for a respawn
	pub fn halt(&mut self) {
		*self = PlayerControlState::default();
	}
}

/// What the player is asking for this frame. Written by whatever reads the input devices.
#[derive(Component, Default, Debug, Clone)]
pub struct PlayerIntent {
	pub horizontal: Option<Side>,
	pub jump: bool,
}

/// The direction the player last moved in
#[derive(Component, Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Facing(pub Side);
