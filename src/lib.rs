pub mod types;
pub mod board;
pub mod rules;
pub mod geometry;
pub mod attacks;
pub mod special;
pub mod movegen;
pub mod game;
pub mod clock;
pub mod session;
