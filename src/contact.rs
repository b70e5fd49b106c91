use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

/// A contact between `this` and `other` has just begun.
#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ContactStarted {
	pub this: Entity,
	pub other: Entity,
	/// Whether either participant was a sensor (a trigger overlap rather than a physical collision)
	pub sensor: bool,
}

impl ContactStarted {
	/// Build both directed views of a contact between `a` and `b`
	pub fn pair(a: Entity, b: Entity, sensor: bool) -> [ContactStarted; 2] {
		[
			ContactStarted { this: a, other: b, sensor },
			ContactStarted { this: b, other: a, sensor },
		]
	}
}

/// Re-sends each started rapier contact once from each participant's side
pub fn forward_collision_events(
	mut collisions: EventReader<CollisionEvent>,
	mut contacts: EventWriter<ContactStarted>,
) {
	for collision in collisions.read() {
		if let CollisionEvent::Started(a, b, flags) = *collision {
			let sensor = flags.contains(CollisionEventFlags::SENSOR);
			contacts.send_batch(ContactStarted::pair(a, b, sensor));
		}
	}
}

/// Walk up the hierarchy from `start` (inclusive) and return the first entity matching `filter`.
///
/// Colliders are often attached to child entities, so a contact with a player's foot sensor
/// or sprite child should still resolve to the player root.
pub fn find_in_ancestors<F: bevy::ecs::query::QueryFilter>(
	start: Entity,
	parents: &Query<&Parent>,
	filter: &Query<(), F>,
) -> Option<Entity> {
	let mut current = start;
	loop {
		if filter.contains(current) {
			return Some(current);
		}
		current = parents.get(current).ok()?.get();
	}
}
