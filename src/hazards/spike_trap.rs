use crate::contact::ContactStarted;
use crate::effects::{play_effect, EffectAssets};
use crate::hazards::{PlayerFilter, PlayerLookup};
use crate::player::DeathRequest;
use crate::respawn::Inactive;
use bevy::prelude::*;

/// Static spikes. Kills the player on contact, optionally with hit feedback.
#[derive(Component, Debug, Default, Clone)]
pub struct SpikeTrap {
	pub filter: PlayerFilter,
	pub hit_feedback: EffectAssets,
}

pub fn spike_trap_contacts(
	mut commands: Commands,
	mut contacts: EventReader<ContactStarted>,
	traps: Query<&SpikeTrap, Without<Inactive>>,
	transforms: Query<&GlobalTransform>,
	lookup: PlayerLookup,
	mut deaths: EventWriter<DeathRequest>,
) {
	for contact in contacts.read() {
		let Ok(trap) = traps.get(contact.this) else {
			continue;
		};
		if !lookup.matches(contact.other, trap.filter) {
			continue;
		}

		match lookup.vulnerable(contact.other) {
			Some(player) => {
				debug!("spike trap {} hit player {player}", contact.this);
				deaths.send(DeathRequest { player });
			}
			None => debug!("spike trap {} touched a player without PlayerHealth", contact.this),
		}

		let position = transforms
			.get(contact.other)
			.map(|t| t.translation().truncate())
			.unwrap_or_default();
		play_effect(&mut commands, &trap.hit_feedback, position, "spike hit");
	}
}
