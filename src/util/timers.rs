use serde::Deserialize;

/// Integer value representing a number of frames, or game "ticks".
/// Can be used to represent a duration, or act as a timer that counts up or down.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Deserialize)]
pub struct FrameCount(pub usize);

impl FrameCount {
	/// Add one to this counter (will saturate to [usize::MAX])
	pub fn increment(&mut self) {
		self.0 = self.0.saturating_add(1);
	}

	/// Remove one from this counter (will saturate at 0)
	pub fn decrement(&mut self) {
		self.0 = self.0.saturating_sub(1);
	}

	pub fn is_zero(&self) -> bool {
		self.0 == 0
	}
}

/// A cooldown timer.
/// By default, the timer is "ready".
/// The timer can be `reset` to a specified duration, so that it will not be ready again
/// until [Cooldown::tick] is called the specified number of times.
#[derive(Default, Debug, Clone)]
pub struct Cooldown(FrameCount);

impl Cooldown {
	/// Put the associated action "on cooldown" for the specified duration
	pub fn reset(&mut self, duration: FrameCount) {
		self.0 = duration;
	}

	/// Advance the cooldown timer, possibly causing the associated action to become "ready"
	pub fn tick(&mut self) {
		self.0.decrement();
	}

	/// Check if the associated action is ready, i.e. "off cooldown"
	pub fn is_ready(&self) -> bool {
		self.0.is_zero()
	}
}

/// A boolean flag that remembers how long it has been un-set.
/// Used for coyote time and jump buffering.
#[derive(Debug)]
pub struct CapacitiveFlag {
	value: bool,
	time_since_released: FrameCount,
}

impl Default for CapacitiveFlag {
	fn default() -> Self {
		Self {
			value: false,
			time_since_released: FrameCount(usize::MAX),
		}
	}
}

impl CapacitiveFlag {
	/// Set or clear the flag, incrementing the internal timer when the flag remains cleared
	pub fn tick(&mut self, value: bool) {
		if value {
			self.value = true;
			self.time_since_released = FrameCount(0);
		} else {
			if !self.value {
				self.time_since_released.increment();
			}
			self.value = false;
		}
	}

	/// Check if the flag is *currently* set
	pub fn is_set(&self) -> bool {
		self.value
	}

	/// Check if the flag is currently set, or has been set at any time in the last `duration`.
	/// For example, "did the player try to jump within the last 3 frames?"
	pub fn was_set_within(&self, duration: FrameCount) -> bool {
		self.time_since_released <= duration
	}

	/// Forget any previous "set", e.g. after a buffered jump has been consumed
	pub fn consume(&mut self) {
		self.value = false;
		self.time_since_released = FrameCount(usize::MAX);
	}
}

/// A list of actions waiting for a deadline, measured in frames.
///
/// Each owner (usually an entity, as a component) keeps its own list and advances it
/// once per frame with [PendingTimers::tick], which hands back every action whose
/// deadline has arrived. An action scheduled with a delay of `n` frames is returned by
/// the `n`th call to `tick` after scheduling (a delay of 0 fires on the next tick).
#[derive(Debug, Clone)]
pub struct PendingTimers<A> {
	pending: Vec<(FrameCount, A)>,
}

impl<A> Default for PendingTimers<A> {
	fn default() -> Self {
		Self { pending: Vec::new() }
	}
}

impl<A> PendingTimers<A> {
	pub fn schedule(&mut self, delay: FrameCount, action: A) {
		self.pending.push((delay, action));
	}

	/// Advance every deadline by one frame, returning the actions that are now due,
	/// in the order they were scheduled.
	pub fn tick(&mut self) -> Vec<A> {
		let mut due = Vec::new();
		let mut still_pending = Vec::with_capacity(self.pending.len());
		for (mut remaining, action) in self.pending.drain(..) {
			remaining.decrement();
			if remaining.is_zero() {
				due.push(action);
			} else {
				still_pending.push((remaining, action));
			}
		}
		self.pending = still_pending;
		due
	}

	/// Drop every pending action without running it
	pub fn clear(&mut self) {
		self.pending.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cooldown_is_ready_after_duration_ticks() {
		let mut cooldown = Cooldown::default();
		assert!(cooldown.is_ready());
		cooldown.reset(FrameCount(2));
		assert!(!cooldown.is_ready());
		cooldown.tick();
		assert!(!cooldown.is_ready());
		cooldown.tick();
		assert!(cooldown.is_ready());
	}

	#[test]
	fn capacitive_flag_remembers_recent_set() {
		let mut flag = CapacitiveFlag::default();
		assert!(!flag.was_set_within(FrameCount(10)));
		flag.tick(true);
		flag.tick(false);
		flag.tick(false);
		assert!(!flag.is_set());
		assert!(flag.was_set_within(FrameCount(2)));
		assert!(!flag.was_set_within(FrameCount(0)));
		flag.consume();
		assert!(!flag.was_set_within(FrameCount(100)));
	}

	#[test]
	fn pending_timer_fires_on_the_nth_tick() {
		let mut timers = PendingTimers::default();
		timers.schedule(FrameCount(3), "respawn");
		assert!(timers.tick().is_empty());
		assert!(timers.tick().is_empty());
		assert_eq!(timers.tick(), vec!["respawn"]);
		assert!(timers.tick().is_empty());
	}

	#[test]
	fn zero_delay_fires_on_next_tick() {
		let mut timers = PendingTimers::default();
		timers.schedule(FrameCount(0), 7);
		assert_eq!(timers.tick(), vec![7]);
	}

	#[test]
	fn timers_fire_independently_in_schedule_order() {
		let mut timers = PendingTimers::default();
		timers.schedule(FrameCount(2), 'b');
		timers.schedule(FrameCount(1), 'a');
		timers.schedule(FrameCount(2), 'c');
		assert_eq!(timers.tick(), vec!['a']);
		assert_eq!(timers.tick(), vec!['b', 'c']);
		assert!(timers.tick().is_empty());
	}

	#[test]
	fn cleared_timers_never_fire() {
		let mut timers = PendingTimers::default();
		timers.schedule(FrameCount(1), ());
		timers.clear();
		assert!(timers.tick().is_empty());
	}
}
