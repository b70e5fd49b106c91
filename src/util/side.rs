use bevy::prelude::Vec2;
use serde::Deserialize;
use std::ops::{Mul, Neg};

/// Horizontal direction, used for facing, patrol direction and projectile heading.
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone, Deserialize)]
pub enum Side {
	Left,
	#[default]
	Right,
}

impl Side {
	/// Interpret the sign of `x` as a side; `None` when `x` is zero
	pub fn from_sign(x: f32) -> Option<Side> {
		if x > 0.0 {
			Some(Side::Right)
		} else if x < 0.0 {
			Some(Side::Left)
		} else {
			None
		}
	}

	pub fn unit(self) -> Vec2 {
		Vec2::X * self
	}
}

impl Neg for Side {
	type Output = Side;
	fn neg(self) -> Self::Output {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}
}

impl Mul<Side> for f32 {
	type Output = f32;
	fn mul(self, side: Side) -> Self::Output {
		match side {
			Side::Right => self,
			Side::Left => -self,
		}
	}
}

impl Mul<Side> for Vec2 {
	type Output = Vec2;
	fn mul(self, side: Side) -> Self::Output {
		match side {
			Side::Right => self,
			Side::Left => -self,
		}
	}
}
