use crate::player::{LivesChanged, PlayerHealth};
use bevy::prelude::*;

#[derive(Component, Debug, Default, Clone)]
pub struct LivesObservers {
	subscribers: Vec<Entity>,
}

impl LivesObservers {
	/// Returns false if `observer` was already subscribed
	pub fn subscribe(&mut self, observer: Entity) -> bool {
		if self.subscribers.contains(&observer) {
			return false;
		}
		self.subscribers.push(observer);
		true
	}

	/// Returns false if `observer` was not subscribed
	pub fn unsubscribe(&mut self, observer: Entity) -> bool {
		let before = self.subscribers.len();
		self.subscribers.retain(|&e| e != observer);
		self.subscribers.len() != before
	}

	pub fn subscribers(&self) -> &[Entity] {
		&self.subscribers
	}
}

/// A text element showing "Life: N" for the players it is subscribed to
#[derive(Component, Debug, Default, Clone, Copy)]
#[require(Visibility)]
pub struct LifeCounter;

pub fn format_lives(lives: i32) -> String {
	format!("Life: {lives}")
}

/// Keep subscriptions in line with counter visibility. Runs for counters whose visibility
/// changed, and for every counter when a player appears after them.
pub fn sync_life_counter_subscriptions(
	counters: Query<(Entity, Ref<Visibility>, Ref<LifeCounter>)>,
	mut removed: RemovedComponents<LifeCounter>,
	mut players: Query<(Ref<PlayerHealth>, &mut LivesObservers)>,
	mut texts: Query<&mut Text>,
) {
	for counter in removed.read() {
		for (_, mut observers) in &mut players {
			observers.unsubscribe(counter);
		}
	}

	for (counter, visibility, marker) in &counters {
		let counter_changed = visibility.is_changed() || marker.is_added();
		let visible = *visibility != Visibility::Hidden;
		for (health, mut observers) in &mut players {
			if !counter_changed && !health.is_added() {
				continue;
			}
			if !visible {
				if observers.unsubscribe(counter) {
					debug!("life counter {counter} hidden, unsubscribed");
				}
				continue;
			}
			if observers.subscribe(counter) {
				debug!("life counter {counter} subscribed");
				if let Ok(mut text) = texts.get_mut(counter) {
					text.0 = format_lives(health.lives());
				}
			}
		}
	}
}

pub fn broadcast_lives(
	mut lives_changed: EventReader<LivesChanged>,
	players: Query<&LivesObservers>,
	mut texts: Query<&mut Text>,
) {
	for &LivesChanged { player, lives } in lives_changed.read() {
		let Ok(observers) = players.get(player) else {
			continue;
		};
		for &observer in observers.subscribers() {
			match texts.get_mut(observer) {
				Ok(mut text) => text.0 = format_lives(lives),
				Err(_) => warn!("life counter {observer} has no Text to write to"),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn subscriptions_are_unique() {
		let mut observers = LivesObservers::default();
		let ui = Entity::from_raw(7);
		assert!(observers.subscribe(ui));
		assert!(!observers.subscribe(ui));
		assert_eq!(observers.subscribers(), &[ui]);
		assert!(observers.unsubscribe(ui));
		assert!(!observers.unsubscribe(ui));
	}

	#[test]
	fn lives_text() {
		assert_eq!(format_lives(3), "Life: 3");
		assert_eq!(format_lives(-1), "Life: -1");
	}
}
