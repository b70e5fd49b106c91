use crate::respawn::Inactive;
use bevy::prelude::*;

/// A spinning saw blade. Lethal through [crate::hazards::kill_players_touching].
#[derive(Component, Debug, Clone)]
pub struct SawTrap {
	pub degrees_per_second: f32,
	pub clockwise: bool,
}

impl Default for SawTrap {
	fn default() -> Self {
		Self {
			degrees_per_second: 360.0,
			clockwise: true,
		}
	}
}

pub fn spin_saws(mut saws: Query<(&SawTrap, &mut Transform), Without<Inactive>>, time: Res<Time>) {
	for (saw, mut transform) in &mut saws {
		let direction = if saw.clockwise { -1.0 } else { 1.0 };
		transform.rotate_z((direction * saw.degrees_per_second * time.delta_secs()).to_radians());
	}
}

/// A spiked ball sliding back and forth between two points
#[derive(Component, Debug, Clone)]
pub struct SpikeBall {
	pub left: Vec2,
	pub right: Vec2,
	/// units per second
	pub speed: f32,
	going_right: bool,
}

impl SpikeBall {
	/// distance at which a waypoint counts as reached
	const ARRIVAL_DISTANCE: f32 = 0.05;

	pub fn new(left: Vec2, right: Vec2, speed: f32) -> Self {
		Self {
			left,
			right,
			speed,
			going_right: true,
		}
	}

	pub fn target(&self) -> Vec2 {
		if self.going_right { self.right } else { self.left }
	}

	/// Move `position` toward the current target by at most `max_step`, turning around on arrival
	pub fn step(&mut self, position: Vec2, max_step: f32) -> Vec2 {
		let target = self.target();
		let delta = target - position;
		let distance = delta.length();
		let next = if distance <= max_step || distance <= f32::EPSILON {
			target
		} else {
			position + delta / distance * max_step
		};
		if next.distance(target) < Self::ARRIVAL_DISTANCE {
			self.going_right = !self.going_right;
		}
		next
	}
}

pub fn roll_spike_balls(mut balls: Query<(&mut SpikeBall, &mut Transform), Without<Inactive>>, time: Res<Time>) {
	for (mut ball, mut transform) in &mut balls {
		let max_step = ball.speed * time.delta_secs();
		let next = ball.step(transform.translation.truncate(), max_step);
		transform.translation.x = next.x;
		transform.translation.y = next.y;
	}
}
