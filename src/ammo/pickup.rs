use crate::ammo::AmmoPouch;
use crate::contact::{find_in_ancestors, ContactStarted};
use crate::effects::{play_effect, EffectAssets};
use crate::player::Player;
use crate::respawn::{deactivate, Inactive};
use bevy::prelude::*;

/// A floating pickup that grants ammo once, then hides until the world is reset
#[derive(Component, Debug, Clone)]
pub struct AmmoPickup {
	pub apple_count: u32,
	collected: bool,
}

impl AmmoPickup {
	pub fn new(apple_count: u32) -> Self {
		Self {
			apple_count,
			collected: false,
		}
	}

	pub fn is_collected(&self) -> bool {
		self.collected
	}

	/// Make the pickup collectable again
	pub fn reset(&mut self) {
		self.collected = false;
	}
}

#[derive(Component, Debug, Default, Clone)]
pub struct PickupFeedback(pub EffectAssets);

/// Find the ammo pouch belonging to whatever touched a pickup.
///
/// The pouch is normally on the touched entity or one of its ancestors; failing that, a
/// tagged player root is searched downwards in case the pouch lives on a child.
fn resolve_pouch(
	touched: Entity,
	parents: &Query<&Parent>,
	children: &Query<&Children>,
	pouch_holders: &Query<(), With<AmmoPouch>>,
	tagged_players: &Query<(), With<Player>>,
) -> Option<Entity> {
	if let Some(holder) = find_in_ancestors(touched, parents, pouch_holders) {
		return Some(holder);
	}
	let root = find_in_ancestors(touched, parents, tagged_players)?;
	children.iter_descendants(root).find(|e| pouch_holders.contains(*e))
}

pub fn collect_pickups(
	mut commands: Commands,
	mut contacts: EventReader<ContactStarted>,
	mut pickups: Query<(&mut AmmoPickup, &Transform, Option<&PickupFeedback>), Without<Inactive>>,
	parents: Query<&Parent>,
	children: Query<&Children>,
	pouch_holders: Query<(), With<AmmoPouch>>,
	tagged_players: Query<(), With<Player>>,
	mut pouches: Query<&mut AmmoPouch>,
) {
	for contact in contacts.read() {
		let Ok((mut pickup, transform, feedback)) = pickups.get_mut(contact.this) else {
			continue;
		};
		if pickup.collected {
			continue;
		}
		let Some(holder) = resolve_pouch(contact.other, &parents, &children, &pouch_holders, &tagged_players) else {
			continue;
		};
		let Ok(mut pouch) = pouches.get_mut(holder) else {
			continue;
		};

		pickup.collected = true;
		let before = pouch.apples();
		pouch.add(pickup.apple_count);
		info!(
			"pickup {} collected by {holder}: ammo {before} -> {}",
			contact.this,
			pouch.apples()
		);

		if let Some(PickupFeedback(effect)) = feedback {
			play_effect(&mut commands, effect, transform.translation.truncate(), "pickup");
		}
		deactivate(&mut commands, contact.this);
	}
}
