mod launcher;
mod pickup;
mod projectile;

use bevy::prelude::Component;
pub use launcher::*;
pub use pickup::*;
pub use projectile::*;

/// The player's apple ammunition
#[derive(Component, Debug, Default, Clone)]
pub struct AmmoPouch {
	apples: u32,
}

impl AmmoPouch {
	pub fn new(apples: u32) -> Self {
		Self { apples }
	}

	pub fn apples(&self) -> u32 {
		self.apples
	}

	pub fn add(&mut self, count: u32) {
		self.apples = self.apples.saturating_add(count);
	}

	/// Consume one apple, returning false if the pouch was empty
	pub fn take_one(&mut self) -> bool {
		if self.apples == 0 {
			return false;
		}
		self.apples -= 1;
		true
	}

	pub fn empty(&mut self) {
		self.apples = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn adding_saturates_instead_of_wrapping() {
		let mut pouch = AmmoPouch::new(2);
		pouch.add(3);
		assert_eq!(pouch.apples(), 5);
		pouch.add(u32::MAX);
		assert_eq!(pouch.apples(), u32::MAX);
	}

	#[test]
	fn empty_pouch_cannot_fire() {
		let mut pouch = AmmoPouch::new(1);
		assert!(pouch.take_one());
		assert!(!pouch.take_one());
		assert_eq!(pouch.apples(), 0);
	}
}
