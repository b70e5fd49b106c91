use crate::contact::ContactStarted;
use crate::hazards::{PlayerFilter, PlayerLookup};
use crate::util::FrameCount;
use bevy::prelude::*;
use bevy_rapier2d::prelude::ColliderDisabled;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SpikePhase {
	#[default]
	Hidden,
	Raising,
	Up,
	Retracting,
}

/// Spikes that pop out of the floor when the player steps into the sensing area.
///
/// The lethal part is the `blade` entity, which carries a [crate::hazards::SpikeTrap]; its
/// collider is only enabled while the spikes are fully up.
#[derive(Component, Debug, Clone)]
pub struct EmergingSpikes {
	pub blade: Entity,
	pub filter: PlayerFilter,
	/// blade position (relative to its parent) while hidden
	pub hidden_offset: Vec2,
	/// how far the blade travels when raised
	pub raised_offset: Vec2,
	pub raise_duration: FrameCount,
	pub stay_up: FrameCount,
	pub retract_duration: FrameCount,
	phase: SpikePhase,
	elapsed: FrameCount,
}

fn ratio(elapsed: FrameCount, duration: FrameCount) -> f32 {
	if duration.is_zero() {
		1.0
	} else {
		(elapsed.0 as f32 / duration.0 as f32).min(1.0)
	}
}

impl EmergingSpikes {
	pub fn new(blade: Entity, hidden_offset: Vec2, raised_offset: Vec2) -> Self {
		Self {
			blade,
			filter: PlayerFilter::Tag,
			hidden_offset,
			raised_offset,
			raise_duration: FrameCount(7),
			stay_up: FrameCount(36),
			retract_duration: FrameCount(7),
			phase: SpikePhase::Hidden,
			elapsed: FrameCount(0),
		}
	}

	pub fn phase(&self) -> SpikePhase {
		self.phase
	}

	/// Start a raise cycle. A cycle already in progress is not interrupted.
	pub fn trigger(&mut self) -> bool {
		if self.phase != SpikePhase::Hidden {
			return false;
		}
		self.phase = SpikePhase::Raising;
		self.elapsed = FrameCount(0);
		true
	}

	/// Advance one frame. Returns `Some(armed)` when the blade becomes lethal or harmless.
	pub fn advance(&mut self) -> Option<bool> {
		if self.phase == SpikePhase::Hidden {
			return None;
		}
		self.elapsed.increment();
		let (duration, next, armed) = match self.phase {
			SpikePhase::Raising => (self.raise_duration, SpikePhase::Up, Some(true)),
			SpikePhase::Up => (self.stay_up, SpikePhase::Retracting, Some(false)),
			SpikePhase::Retracting => (self.retract_duration, SpikePhase::Hidden, None),
			SpikePhase::Hidden => unreachable!(),
		};
		if self.elapsed < duration {
			return None;
		}
		self.phase = next;
		self.elapsed = FrameCount(0);
		armed
	}

	/// How far up the blade is, from 0 (hidden) to 1 (raised)
	pub fn raised_fraction(&self) -> f32 {
		match self.phase {
			SpikePhase::Hidden => 0.0,
			SpikePhase::Raising => ratio(self.elapsed, self.raise_duration),
			SpikePhase::Up => 1.0,
			SpikePhase::Retracting => 1.0 - ratio(self.elapsed, self.retract_duration),
		}
	}

	pub fn blade_offset(&self) -> Vec2 {
		self.hidden_offset + self.raised_offset * self.raised_fraction()
	}
}

pub fn trigger_emerging_spikes(
	mut contacts: EventReader<ContactStarted>,
	mut spikes: Query<&mut EmergingSpikes>,
	lookup: PlayerLookup,
) {
	for contact in contacts.read() {
		let Ok(mut spike) = spikes.get_mut(contact.this) else {
			continue;
		};
		if lookup.matches(contact.other, spike.filter) && spike.trigger() {
			debug!("emerging spikes {} raising", contact.this);
		}
	}
}

pub fn cycle_emerging_spikes(
	mut commands: Commands,
	mut spikes: Query<&mut EmergingSpikes>,
	mut blades: Query<&mut Transform>,
) {
	for mut spike in &mut spikes {
		if spike.phase() == SpikePhase::Hidden {
			continue;
		}
		let armed = spike.advance();
		let Ok(mut blade) = blades.get_mut(spike.blade) else {
			warn!("emerging spikes lost their blade {}", spike.blade);
			continue;
		};
		let offset = spike.blade_offset();
		blade.translation.x = offset.x;
		blade.translation.y = offset.y;

		match armed {
			Some(true) => {
				commands.entity(spike.blade).remove::<ColliderDisabled>();
			}
			Some(false) => {
				commands.entity(spike.blade).insert(ColliderDisabled);
			}
			None => {}
		}
	}
}
