//! Injectable time source for token freshness checks.

// crates.io
#[cfg(test)] use parking_lot::Mutex;
// self
use crate::_prelude::*;

/// Source of "now" consulted by the token cache.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall clock backed by [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Clock that only moves when told to; used to exercise expiry without sleeping.
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
#[cfg(test)]
impl ManualClock {
	/// Starts the clock at `start`.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(start)))
	}

	/// Moves the clock forward (or backward, for negative deltas).
	pub fn advance(&self, delta: Duration) {
		*self.0.lock() += delta;
	}

	/// Jumps the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}
}
#[cfg(test)]
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn manual_clock_moves_only_on_demand() {
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC));
		let shared: Arc<dyn Clock> = Arc::new(clock.clone());

		assert_eq!(shared.now(), macros::datetime!(2025-01-01 00:00 UTC));

		clock.advance(Duration::minutes(59));

		assert_eq!(shared.now(), macros::datetime!(2025-01-01 00:59 UTC));

		clock.set(macros::datetime!(2030-06-01 12:00 UTC));

		assert_eq!(shared.now(), macros::datetime!(2030-06-01 12:00 UTC));
	}
}
