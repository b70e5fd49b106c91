use crate::util::FrameCount;
use serde::Deserialize;

#[derive(Copy, Clone, Debug, Deserialize)]
pub struct PlayerControlParams {
	pub run: HorizontalControlParams,
	pub jump_speed: f32,
	pub gravity: f32,
	pub coyote_time: FrameCount,
	pub jump_input_buffer: FrameCount,
	pub max_jumps: u8,
	pub jump_cooldown: FrameCount,
}

#[derive(Copy, Clone, Debug, Deserialize)]
pub struct HorizontalControlParams {
	pub max_speed: f32,
	pub acceleration: f32,
	pub deceleration: f32,
}

impl Default for PlayerControlParams {
	fn default() -> Self {
		Self {
			run: HorizontalControlParams {
				max_speed: 90.0,
				// accelerate to max speed in a quarter second (15 frames)
				acceleration: 6.0,
				// decelerate from max speed to 0 in 1/10 second (6 frames)
				deceleration: 15.0,
			},
			jump_speed: 150.0,
			gravity: -10.0,
			coyote_time: FrameCount(6),
			jump_input_buffer: FrameCount(6),
			max_jumps: 1,
			jump_cooldown: FrameCount(8),
		}
	}
}
