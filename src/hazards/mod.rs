mod enemy;
mod falling_block;
mod emerging;
mod moving;
mod spike_trap;

pub use emerging::*;
pub use enemy::*;
pub use falling_block::*;
pub use moving::*;
pub use spike_trap::*;

use crate::contact::{find_in_ancestors, ContactStarted};
use crate::player::{DeathRequest, Player, PlayerHealth};
use crate::respawn::Inactive;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::{CollisionGroups, Group};
use serde::Deserialize;

/// How a hazard recognizes the player
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum PlayerFilter {
	/// the touched entity, or one of its ancestors, carries the [Player] marker
	#[default]
	Tag,
	/// the touched collider is a member of one of these collision groups (bit mask)
	Layers(u32),
}

/// Resolves "what did this hazard just touch" to a killable player
#[derive(SystemParam)]
pub struct PlayerLookup<'w, 's> {
	parents: Query<'w, 's, &'static Parent>,
	tagged: Query<'w, 's, (), With<Player>>,
	vulnerable: Query<'w, 's, (), With<PlayerHealth>>,
	groups: Query<'w, 's, &'static CollisionGroups>,
}

impl PlayerLookup<'_, '_> {
	/// Whether `touched` passes `filter`
	pub fn matches(&self, touched: Entity, filter: PlayerFilter) -> bool {
		match filter {
			PlayerFilter::Tag => find_in_ancestors(touched, &self.parents, &self.tagged).is_some(),
			PlayerFilter::Layers(mask) => self
				.groups
				.get(touched)
				.is_ok_and(|groups| groups.memberships.intersects(Group::from_bits_truncate(mask))),
		}
	}

	/// The nearest ancestor of `touched` (or itself) that has [PlayerHealth]
	pub fn vulnerable(&self, touched: Entity) -> Option<Entity> {
		find_in_ancestors(touched, &self.parents, &self.vulnerable)
	}

	/// The player to kill, if `touched` passes `filter` and has [PlayerHealth] somewhere above it
	pub fn victim(&self, touched: Entity, filter: PlayerFilter) -> Option<Entity> {
		if !self.matches(touched, filter) {
			return None;
		}
		self.vulnerable(touched)
	}
}

/// Generic "touching this kills you" behavior for hazards whose only job is to be sharp.
/// Uses the [PlayerFilter::Tag] check.
pub fn kill_players_touching<H: Component>(
	mut contacts: EventReader<ContactStarted>,
	hazards: Query<(), (With<H>, Without<Inactive>)>,
	lookup: PlayerLookup,
	mut deaths: EventWriter<DeathRequest>,
) {
	for contact in contacts.read() {
		if !hazards.contains(contact.this) {
			continue;
		}
		if let Some(player) = lookup.victim(contact.other, PlayerFilter::Tag) {
			debug!("{} ({}) touched player {player}", contact.this, std::any::type_name::<H>());
			deaths.send(DeathRequest { player });
		}
	}
}

/// Invisible boundary that turns patrolling enemies around
#[derive(Component, Debug, Default, Copy, Clone)]
pub struct EnemyWall;
