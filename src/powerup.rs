use std::time::{Duration, Instant};

use rand::Rng;

pub const POWERUP_DURATION: Duration = Duration::from_millis(5000);

/// Kills needed before a spawn triggers, redrawn after every crossing.
const THRESHOLD_MIN: u32 = 3;
const THRESHOLD_MAX: u32 = 15; // exclusive

/// Sub-state machine for the timed power-up: Absent -> Present (entity on
/// screen, owned by the orchestrator) -> Collected (window running) ->
/// expired (flag cleared). Holds no entity itself, only the counters and
/// the clock.
pub struct PowerUpState {
    pub active: bool,
    pub spawned_this_level: bool,
    activated_at: Option<Instant>,
    duration: Duration,
    kill_counter: u32,
    spawn_threshold: u32,
}

impl PowerUpState {
    pub fn new(rng: &mut impl Rng) -> Self {
        PowerUpState {
            active: false,
            spawned_this_level: false,
            activated_at: None,
            duration: POWERUP_DURATION,
            kill_counter: 0,
            spawn_threshold: draw_threshold(rng),
        }
    }

    /// Accumulate kills. Returns true when the counter crosses the
    /// threshold; the counter resets and a fresh threshold is drawn
    /// whether or not the caller ends up spawning anything.
    pub fn record_kills(&mut self, kills: u32, rng: &mut impl Rng) -> bool {
        self.kill_counter += kills;
        if self.kill_counter >= self.spawn_threshold {
            self.kill_counter = 0;
            self.spawn_threshold = draw_threshold(rng);
            true
        } else {
            false
        }
    }

    /// The token was picked up: start the active window.
    pub fn collect(&mut self, now: Instant) {
        self.active = true;
        self.activated_at = Some(now);
    }

    /// Per-tick expiry check against the monotonic clock.
    pub fn tick(&mut self, now: Instant) {
        if self.active {
            if let Some(start) = self.activated_at {
                if now.duration_since(start) > self.duration {
                    self.active = false;
                    self.activated_at = None;
                }
            }
        }
    }

    /// New level: the spawn latch opens again.
    pub fn level_reset(&mut self) {
        self.spawned_this_level = false;
    }

    /// New game: everything back to the initial state.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.active = false;
        self.spawned_this_level = false;
        self.activated_at = None;
        self.kill_counter = 0;
        self.spawn_threshold = draw_threshold(rng);
    }
}

fn draw_threshold(rng: &mut impl Rng) -> u32 {
    rng.gen_range(THRESHOLD_MIN..THRESHOLD_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn threshold_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let state = PowerUpState::new(&mut rng);
            assert!(state.spawn_threshold >= THRESHOLD_MIN);
            assert!(state.spawn_threshold < THRESHOLD_MAX);
        }
    }

    #[test]
    fn kill_counter_crosses_threshold() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = PowerUpState::new(&mut rng);
        let threshold = state.spawn_threshold;

        // One short of the threshold never triggers
        assert!(!state.record_kills(threshold - 1, &mut rng));
        // The crossing kill does, and the counter resets
        assert!(state.record_kills(1, &mut rng));
        assert_eq!(state.kill_counter, 0);
    }

    #[test]
    fn window_expires_on_first_check_past_duration() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = PowerUpState::new(&mut rng);
        let start = Instant::now();

        state.collect(start);
        assert!(state.active);

        // Exactly at the boundary: still active (strictly greater ends it)
        state.tick(start + POWERUP_DURATION);
        assert!(state.active);

        state.tick(start + POWERUP_DURATION + Duration::from_millis(1));
        assert!(!state.active);
    }

    #[test]
    fn level_reset_opens_spawn_latch_only() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = PowerUpState::new(&mut rng);
        state.spawned_this_level = true;
        state.kill_counter = 2;

        state.level_reset();
        assert!(!state.spawned_this_level);
        assert_eq!(state.kill_counter, 2);
    }

    #[test]
    fn full_reset_clears_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = PowerUpState::new(&mut rng);
        state.collect(Instant::now());
        state.spawned_this_level = true;
        state.kill_counter = 9;

        state.reset(&mut rng);
        assert!(!state.active);
        assert!(!state.spawned_this_level);
        assert_eq!(state.kill_counter, 0);
    }
}
