use crate::contact::ContactStarted;
use crate::hazards::{PlayerFilter, PlayerLookup};
use crate::util::{FrameCount, PendingTimers};
use bevy::prelude::*;
use bevy_rapier2d::prelude::{RigidBody, Velocity};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BlockTimer {
	ReturnHome,
}

/// A spiked block that hangs still until its [FallTrigger] is entered, then drops under
/// gravity. Touching the block itself is lethal.
#[derive(Component, Debug)]
pub struct FallingSpikeBlock {
	/// frames until the block returns home after falling; zero means it stays down
	pub reset_delay: FrameCount,
	home: Transform,
	triggered: bool,
	timers: PendingTimers<BlockTimer>,
}

impl FallingSpikeBlock {
	pub fn new(home: Transform, reset_delay: FrameCount) -> Self {
		Self {
			reset_delay,
			home,
			triggered: false,
			timers: PendingTimers::default(),
		}
	}

	pub fn is_triggered(&self) -> bool {
		self.triggered
	}

	/// Start falling. Returns false if the block is already down.
	pub fn trigger(&mut self) -> bool {
		if self.triggered {
			return false;
		}
		self.triggered = true;
		if !self.reset_delay.is_zero() {
			self.timers.schedule(self.reset_delay, BlockTimer::ReturnHome);
		}
		true
	}

	/// Advance the reset timer; returns the home transform when it is time to go back
	pub fn tick(&mut self) -> Option<Transform> {
		let mut home = None;
		for timer in self.timers.tick() {
			match timer {
				BlockTimer::ReturnHome => {
					self.triggered = false;
					home = Some(self.home);
				}
			}
		}
		home
	}
}

/// Sensor region that drops `block` when a player passing `filter` enters it
#[derive(Component, Debug, Copy, Clone)]
pub struct FallTrigger {
	pub block: Entity,
	pub filter: PlayerFilter,
}

impl FallTrigger {
	pub fn new(block: Entity) -> Self {
		Self {
			block,
			filter: PlayerFilter::Tag,
		}
	}
}

pub fn trigger_falling_blocks(
	mut contacts: EventReader<ContactStarted>,
	triggers: Query<&FallTrigger>,
	mut blocks: Query<(&mut FallingSpikeBlock, &mut RigidBody, Option<&mut Velocity>)>,
	lookup: PlayerLookup,
) {
	for contact in contacts.read() {
		let Ok(trigger) = triggers.get(contact.this) else {
			continue;
		};
		if !lookup.matches(contact.other, trigger.filter) {
			continue;
		}
		let Ok((mut block, mut body, velocity)) = blocks.get_mut(trigger.block) else {
			warn!("fall trigger {} points at {}, which is not a falling block", contact.this, trigger.block);
			continue;
		};
		if !block.trigger() {
			continue;
		}
		debug!("falling block {} released", trigger.block);
		if let Some(mut velocity) = velocity {
			*velocity = Velocity::zero();
		}
		*body = RigidBody::Dynamic;
	}
}

pub fn reset_falling_blocks(
	mut blocks: Query<(
		Entity,
		&mut FallingSpikeBlock,
		&mut RigidBody,
		&mut Transform,
		Option<&mut Velocity>,
	)>,
) {
	for (entity, mut block, mut body, mut transform, velocity) in &mut blocks {
		let Some(home) = block.tick() else {
			continue;
		};
		debug!("falling block {entity} returning home");
		if let Some(mut velocity) = velocity {
			*velocity = Velocity::zero();
		}
		*body = RigidBody::KinematicPositionBased;
		*transform = home;
	}
}
