use crate::contact::{find_in_ancestors, ContactStarted};
use crate::effects::{play_effect, EffectAssets};
use crate::player::{Player, PlayerHealth};
use bevy::prelude::*;

/// A trigger region that moves the player's respawn target when touched.
#[derive(Component, Debug, Clone)]
pub struct Checkpoint {
	/// where the player will reappear, usually the checkpoint's own position
	pub respawn_point: Vec2,
	/// once activated, ignore all later contacts
	pub one_use: bool,
	activated: bool,
}

impl Checkpoint {
	pub fn new(respawn_point: Vec2, one_use: bool) -> Self {
		Self {
			respawn_point,
			one_use,
			activated: false,
		}
	}

	pub fn is_activated(&self) -> bool {
		self.activated
	}

	/// Register a player contact. Returns the respawn point to publish, if any.
	pub fn touch(&mut self) -> Option<Vec2> {
		if self.activated && self.one_use {
			return None;
		}
		self.activated = true;
		Some(self.respawn_point)
	}
}

/// Optional feedback when a checkpoint activates
#[derive(Component, Debug, Default, Clone)]
pub struct CheckpointFeedback {
	pub effect: EffectAssets,
	pub activated_color: Option<Color>,
}

pub fn activate_checkpoints(
	mut commands: Commands,
	mut contacts: EventReader<ContactStarted>,
	mut checkpoints: Query<(&mut Checkpoint, Option<&CheckpointFeedback>, Option<&mut Sprite>)>,
	parents: Query<&Parent>,
	tagged_players: Query<(), With<Player>>,
	mut players: Query<&mut PlayerHealth>,
) {
	for contact in contacts.read() {
		let Ok((mut checkpoint, feedback, sprite)) = checkpoints.get_mut(contact.this) else {
			continue;
		};
		if checkpoint.is_activated() && checkpoint.one_use {
			continue;
		}
		let Some(player) = find_in_ancestors(contact.other, &parents, &tagged_players) else {
			continue;
		};
		let Ok(mut health) = players.get_mut(player) else {
			debug!("checkpoint touched by player {player} without PlayerHealth; nothing to do");
			continue;
		};
		let Some(point) = checkpoint.touch() else {
			continue;
		};

		health.set_respawn_point(point);
		info!("checkpoint {} activated, respawn point is now {point}", contact.this);

		if let Some(feedback) = feedback {
			play_effect(&mut commands, &feedback.effect, point, "checkpoint");
			if let (Some(color), Some(mut sprite)) = (feedback.activated_color, sprite) {
				sprite.color = color;
			}
		}
	}
}
