use crate::player::{Facing, HorizontalControlParams, MovementLocked, Player, PlayerControlState, PlayerIntent};
use crate::util::Side;
use bevy::log::debug;
use bevy::prelude::{Added, Query, Res, Time, Without};
use bevy_rapier2d::control::{KinematicCharacterController, KinematicCharacterControllerOutput};

pub fn player_movement_system(
	mut player_query: Query<
		(
			&Player,
			&PlayerIntent,
			&mut PlayerControlState,
			&mut Facing,
			&mut KinematicCharacterController,
			&KinematicCharacterControllerOutput,
		),
		Without<MovementLocked>,
	>,
	time: Res<Time>,
) {
	for (player, intent, mut state, mut facing, mut controller, last_controller_out) in &mut player_query {
		let params = &player.params;

		// Check if the player wants to jump
		let wants_to_jump = {
			state.jump_requested.tick(intent.jump);
			state.jump_requested.was_set_within(params.jump_input_buffer)
		};

		state.jump_cooldown.tick();

		// sync Rapier controller state back to player
		state.grounded.tick(last_controller_out.grounded);

		// refund jump ability when reaching the ground
		if state.grounded.is_set() {
			state.jumps_remaining = params.max_jumps;
			state.jumping = false;
			state.lost_jump_due_to_falling = false;
		}

		// if player walks off a platform without jumping, then they lose a jump
		if !state.grounded.was_set_within(params.coyote_time) && !state.lost_jump_due_to_falling && !state.jumping {
			state.jumps_remaining = state.jumps_remaining.saturating_sub(1);
			state.lost_jump_due_to_falling = true;
		}

		if let Some(side) = intent.horizontal {
			facing.0 = side;
		}
		state.own_velocity.x = compute_next_horizontal_velocity(state.own_velocity.x, intent.horizontal, params.run);

		// apply gravity when not already on the ground
		if state.grounded.is_set() && state.own_velocity.y <= 0.0 {
			state.own_velocity.y = 0.0;
		} else {
			state.own_velocity.y += params.gravity;
		}

		// bonk your head when jumping into a ceiling
		if state.own_velocity.y > 0.0
			&& last_controller_out.effective_translation.y < last_controller_out.desired_translation.y * 0.5
		{
			state.own_velocity.y = 0.0;
		}

		let can_jump = state.jumps_remaining > 0 && state.jump_cooldown.is_ready();
		if wants_to_jump && can_jump {
			debug!("jumping, jumps remaining before jump: {}", state.jumps_remaining);
			state.own_velocity.y = params.jump_speed;
			state.jumps_remaining -= 1;
			state.jumping = true;
			state.jump_cooldown.reset(params.jump_cooldown);
			state.jump_requested.consume();
		}

		// send computed translation to controller for resolution in the physics world
		controller.translation = Some(state.own_velocity * time.delta_secs());
	}
}

/// Solve for a player's new horizontal velocity by accelerating or decelerating
/// their current velocity towards their desired velocity
pub fn compute_next_horizontal_velocity(
	current_vel: f32,
	input_direction: Option<Side>,
	HorizontalControlParams {
		max_speed,
		acceleration,
		deceleration,
	}: HorizontalControlParams,
) -> f32 {
	let target_vel = match input_direction {
		None => 0.0,
		Some(side) => max_speed * side,
	};

	let accel_base = if current_vel == 0.0 {
		// anything is faster than 0, regardless of direction
		acceleration
	} else if input_direction.is_none() {
		deceleration
	} else if target_vel.signum() != current_vel.signum() {
		// if the goal is in the opposite direction, decelerate to 0 first
		deceleration
	} else if max_speed > current_vel.abs() {
		acceleration
	} else {
		// keep momentum above max speed
		0.0
	};

	let goal_delta = target_vel - current_vel;
	if goal_delta.abs() < accel_base {
		target_vel
	} else {
		current_vel + accel_base * goal_delta.signum()
	}
}

/// Zero out any motion the player had when movement got locked
pub fn halt_locked_players(mut players: Query<&mut PlayerControlState, Added<MovementLocked>>) {
	for mut state in &mut players {
		state.halt();
		debug!("player movement locked, velocity cleared");
	}
}
