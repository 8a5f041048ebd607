use std::time::Duration;

use crate::types::Color;

pub const DEFAULT_INITIAL_TIME: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    TimeExpired(Color),
}

/// Two countdowns, at most one of which runs at a time.
///
/// The clock holds no timer of its own: the caller feeds it elapsed time
/// through [`GameClock::tick`], which only ever charges the running side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    white: Duration,
    black: Duration,
    running: Option<Color>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_TIME)
    }
}

impl GameClock {
    /// Both sides start with `initial`; a zero budget falls back to the default
    pub fn new(initial: Duration) -> Self {
        let initial = if initial.is_zero() {
            DEFAULT_INITIAL_TIME
        } else {
            initial
        };
        Self {
            white: initial,
            black: initial,
            running: None,
        }
    }

    /// Refill both sides and stop
    pub fn reset(&mut self, initial: Duration) {
        *self = GameClock::new(initial);
    }

    pub fn remaining(&self, color: Color) -> Duration {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn running(&self) -> Option<Color> {
        self.running
    }

    /// Stop whichever side is running and start `side`
    pub fn on_turn_changed(&mut self, side: Color) {
        self.stop();
        if !self.remaining(side).is_zero() {
            self.running = Some(side);
        }
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    /// Charge `elapsed` to the running side. Reports expiry once, then stops.
    pub fn tick(&mut self, elapsed: Duration) -> Option<ClockEvent> {
        let side = self.running?;
        let remaining = match side {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        *remaining = remaining.saturating_sub(elapsed);
        if remaining.is_zero() {
            self.stop();
            return Some(ClockEvent::TimeExpired(side));
        }
        None
    }

    pub fn tick_second(&mut self) -> Option<ClockEvent> {
        self.tick(Duration::from_secs(1))
    }

    /// `mm:ss`, rounded down to the second
    pub fn format_remaining(&self, color: Color) -> String {
        let secs = self.remaining(color).as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
