//! Two-player chess in the terminal.
//!
//! Usage: cargo run --release -- --initial-time 300 --rules standard
//!
//! Enter moves as `e2 e4` or `e2e4`. Other commands: `moves <square>`,
//! `board`, `history`, `reset [secs]`, `time <secs>`, `quit`.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chess_referee::game::MoveOutcome;
use chess_referee::rules::RuleSet;
use chess_referee::session::Session;
use chess_referee::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Rules {
    /// Standard chess rules
    Standard,
    /// Looser house rules: no knight checks, king capture ends the game
    Legacy,
}

impl From<Rules> for RuleSet {
    fn from(rules: Rules) -> Self {
        match rules {
            Rules::Standard => RuleSet::standard(),
            Rules::Legacy => RuleSet::legacy(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "chess_referee")]
#[command(about = "Play two-player chess in the terminal")]
struct Args {
    /// Seconds on each side's clock
    #[arg(short, long, default_value_t = 300)]
    initial_time: u64,

    /// Which rule set to play by
    #[arg(long, value_enum, default_value_t = Rules::Standard)]
    rules: Rules,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Move(Position, Position),
    Highlight(Position),
    Board,
    History,
    Reset(Option<u64>),
    Time(u64),
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["quit"] | ["exit"] => Ok(Command::Quit),
        ["board"] => Ok(Command::Board),
        ["history"] => Ok(Command::History),
        ["reset"] => Ok(Command::Reset(None)),
        // an unreadable budget means the default one
        ["reset", secs] => Ok(Command::Reset(Some(secs.parse().unwrap_or(0)))),
        ["time", secs] => Ok(Command::Time(secs.parse().unwrap_or(0))),
        ["moves", square] => Ok(Command::Highlight(Position::from_algebraic(square)?)),
        [from, to] => Ok(Command::Move(
            Position::from_algebraic(from)?,
            Position::from_algebraic(to)?,
        )),
        [both] if both.is_ascii() && both.len() == 4 => Ok(Command::Move(
            Position::from_algebraic(&both[0..2])?,
            Position::from_algebraic(&both[2..4])?,
        )),
        _ => Err(eyre!("unrecognized command: {line}")),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive("chess_referee=warn".parse()?))
        .init();

    let args = Args::parse();
    tracing::info!(?args, "starting session");

    let mut session = Session::new(args.rules.into(), Duration::from_secs(args.initial_time));
    let mut stdout = io::stdout();
    let mut last_tick = Instant::now();

    print!("{}", session.render());
    print!("> ");
    stdout.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;

        // the clock only advances while we wait for input
        let now = Instant::now();
        if let Some(outcome) = session.tick(now - last_tick) {
            println!("game over: {outcome}");
        }
        last_tick = now;

        if line.trim().is_empty() {
            print!("> ");
            stdout.flush()?;
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Board) => print!("{}", session.render()),
            Ok(Command::History) => println!("{}", session.game().transcript()),
            Ok(Command::Reset(secs)) => {
                session.reset_game(secs.unwrap_or(args.initial_time));
                print!("{}", session.render());
            }
            Ok(Command::Time(secs)) => {
                session.set_time(secs);
                print!("{}", session.render());
            }
            Ok(Command::Highlight(square)) => {
                let targets: Vec<String> = session
                    .highlights(square)
                    .iter()
                    .map(|p| p.to_algebraic())
                    .collect();
                println!("{}", targets.join(" "));
            }
            Ok(Command::Move(from, to)) => match session.request_move(from, to) {
                MoveOutcome::Applied(record) => {
                    println!("{}", record.to_human());
                    print!("{}", session.render());
                }
                MoveOutcome::Cancelled => println!("selection cleared"),
                MoveOutcome::Rejected(rejection) => println!("illegal move: {rejection}"),
            },
            Err(err) => println!("{err}"),
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}
