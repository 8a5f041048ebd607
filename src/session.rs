//! One game plus its clock, as seen by a front end.
//!
//! The session forwards turn changes to the clock, clock expiry to the game,
//! and stops the clock as soon as the game is decided.

use std::time::Duration;

use crate::clock::{ClockEvent, GameClock, DEFAULT_INITIAL_TIME};
use crate::game::*;
use crate::rules::RuleSet;
use crate::types::*;

pub struct Session {
    game: Game,
    clock: GameClock,
}

impl Session {
    /// A fresh game with white's clock already running
    pub fn new(rules: RuleSet, initial_time: Duration) -> Self {
        let mut session = Self {
            game: Game::new(rules),
            clock: GameClock::new(initial_time),
        };
        session.clock.on_turn_changed(Color::White);
        session
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Reinitialize board, rights and turn, refill both clocks and start white's
    pub fn reset_game(&mut self, initial_secs: u64) {
        self.game.reset();
        self.clock.reset(initial_time_or_default(initial_secs));
        self.clock.on_turn_changed(Color::White);
    }

    /// Change the time budget for both sides without touching the board
    pub fn set_time(&mut self, secs: u64) {
        let running = self.clock.running();
        self.clock.reset(initial_time_or_default(secs));
        if let Some(side) = running {
            self.clock.on_turn_changed(side);
        }
    }

    pub fn highlights(&self, from: Position) -> Vec<Position> {
        self.game.possible_moves(from)
    }

    pub fn request_move(&mut self, from: Position, to: Position) -> MoveOutcome {
        let outcome = self.game.play(from, to);
        if let MoveOutcome::Applied(_) = outcome {
            match self.game.status() {
                GameStatus::ToMove(side) => self.clock.on_turn_changed(side),
                GameStatus::GameOver(_) => self.clock.stop(),
            }
        }
        outcome
    }

    /// Advance the running clock; an expiry ends the game
    pub fn tick(&mut self, elapsed: Duration) -> Option<Outcome> {
        if self.game.is_over() {
            self.clock.stop();
            return None;
        }
        match self.clock.tick(elapsed) {
            Some(ClockEvent::TimeExpired(side)) => {
                self.game.on_time_expired(side);
                match self.game.status() {
                    GameStatus::GameOver(outcome) => Some(outcome),
                    GameStatus::ToMove(_) => None,
                }
            }
            None => None,
        }
    }

    /// Board diagram followed by the clocks and the status line
    pub fn render(&self) -> String {
        let mut out = self.game.board().draw_board();
        out.push_str(&format!(
            "white {}  black {}\n",
            self.clock.format_remaining(Color::White),
            self.clock.format_remaining(Color::Black)
        ));
        match self.game.status() {
            GameStatus::ToMove(side) => {
                let check = if self.game.is_in_check(side) { " (check)" } else { "" };
                out.push_str(&format!("{} to move{}\n", side, check));
            }
            GameStatus::GameOver(outcome) => out.push_str(&format!("game over: {}\n", outcome)),
        }
        out
    }
}

fn initial_time_or_default(secs: u64) -> Duration {
    if secs == 0 {
        DEFAULT_INITIAL_TIME
    } else {
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    #[test]
    fn white_clock_runs_first() {
        let session = Session::new(RuleSet::standard(), Duration::from_secs(60));
        assert_eq!(session.clock().running(), Some(Color::White));
    }

    #[test]
    fn moves_hand_the_clock_over() {
        let mut session = Session::new(RuleSet::standard(), Duration::from_secs(60));
        session.tick(Duration::from_secs(3));
        assert!(matches!(
            session.request_move(pos("e2"), pos("e4")),
            MoveOutcome::Applied(_)
        ));
        assert_eq!(session.clock().running(), Some(Color::Black));
        session.tick(Duration::from_secs(7));
        assert_eq!(session.clock().remaining(Color::White), Duration::from_secs(57));
        assert_eq!(session.clock().remaining(Color::Black), Duration::from_secs(53));
    }

    #[test]
    fn rejected_moves_keep_the_clock() {
        let mut session = Session::new(RuleSet::standard(), Duration::from_secs(60));
        assert_eq!(
            session.request_move(pos("e2"), pos("e5")),
            MoveOutcome::Rejected(crate::movegen::Rejection::PatternViolated)
        );
        assert_eq!(session.clock().running(), Some(Color::White));
    }

    #[test]
    fn expiry_ends_the_game() {
        let mut session = Session::new(RuleSet::standard(), Duration::from_secs(2));
        assert_eq!(session.tick(Duration::from_secs(1)), None);
        assert_eq!(
            session.tick(Duration::from_secs(1)),
            Some(Outcome::TimeExpired {
                loser: Color::White
            })
        );
        assert!(session.game().is_over());
        assert_eq!(session.tick(Duration::from_secs(1)), None);
        assert!(matches!(
            session.request_move(pos("e2"), pos("e4")),
            MoveOutcome::Rejected(_)
        ));
    }

    #[test]
    fn reset_game_restarts_everything() {
        let mut session = Session::new(RuleSet::standard(), Duration::from_secs(2));
        session.request_move(pos("e2"), pos("e4"));
        session.tick(Duration::from_secs(5));
        assert!(session.game().is_over());

        session.reset_game(120);
        assert_eq!(session.game().status(), GameStatus::ToMove(Color::White));
        assert_eq!(session.clock().running(), Some(Color::White));
        assert_eq!(session.clock().remaining(Color::Black), Duration::from_secs(120));

        session.reset_game(0);
        assert_eq!(session.clock().remaining(Color::White), DEFAULT_INITIAL_TIME);
    }

    #[test]
    fn set_time_keeps_the_running_side() {
        let mut session = Session::new(RuleSet::standard(), Duration::from_secs(60));
        session.request_move(pos("e2"), pos("e4"));
        session.set_time(30);
        assert_eq!(session.clock().running(), Some(Color::Black));
        assert_eq!(session.clock().remaining(Color::White), Duration::from_secs(30));
    }

    #[test]
    fn mate_stops_the_clock() {
        let mut session = Session::new(RuleSet::standard(), Duration::from_secs(60));
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            session.request_move(pos(from), pos(to));
        }
        assert!(session.game().is_over());
        assert_eq!(session.clock().running(), None);
        assert!(session.render().contains("checkmate, black wins"));
    }

    #[test]
    fn render_shows_clocks_and_turn() {
        let session = Session::new(RuleSet::standard(), Duration::from_secs(300));
        let rendered = session.render();
        assert!(rendered.contains("white 05:00  black 05:00"));
        assert!(rendered.contains("white to move"));
    }
}
