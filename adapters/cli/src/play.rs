//! Interactive terminal session.
//!
//! Stdin lines and clock ticks are funnelled into one channel so the session
//! only ever sees a single, serialised stream of commands.

use std::{
    io::{self, BufRead, Write},
    sync::mpsc::{self, Sender},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use maze_runner_core::{Command, Direction, Event};
use maze_runner_world::{self as world, query, GameSession};

use crate::render;

const HELP: &str = "Move with w/a/s/d (or up/left/down/right), r restarts, q quits.";

/// Parsed line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Command(Command),
    Quit,
}

/// Interprets a single line of player input.
pub(crate) fn parse_input(line: &str) -> Option<Input> {
    let moving = |direction| Some(Input::Command(Command::Move { direction }));
    match line.trim().to_ascii_lowercase().as_str() {
        "w" | "up" | "k" => moving(Direction::Up),
        "s" | "down" | "j" => moving(Direction::Down),
        "a" | "left" | "h" => moving(Direction::Left),
        "d" | "right" | "l" => moving(Direction::Right),
        "r" | "restart" => Some(Input::Command(Command::Restart)),
        "q" | "quit" | "exit" => Some(Input::Quit),
        _ => None,
    }
}

#[derive(Debug)]
enum Message {
    Line(String),
    Tick,
    Closed,
}

/// Runs the session until the player quits or stdin closes.
pub(crate) fn run(mut session: GameSession, tick_interval: Duration) -> Result<()> {
    let (sender, receiver) = mpsc::channel();
    spawn_ticker(sender.clone(), tick_interval);
    spawn_reader(sender);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{HELP}")?;
    show_board(&mut out, &session)?;
    out.flush()?;

    for message in receiver {
        let command = match message {
            Message::Tick => Command::Tick,
            Message::Closed => break,
            Message::Line(line) => match parse_input(&line) {
                Some(Input::Command(command)) => command,
                Some(Input::Quit) => break,
                None => {
                    writeln!(out, "unrecognised input `{}`. {HELP}", line.trim())?;
                    out.flush()?;
                    continue;
                }
            },
        };

        let mut events = Vec::new();
        world::apply(&mut session, command, &mut events);
        present(&mut out, &session, &events)?;
        out.flush()?;
    }

    log::debug!("leaving session in state {:?}", query::play_state(&session));
    Ok(())
}

/// Writes the effect of one processed command.
pub(crate) fn present<W: Write>(out: &mut W, session: &GameSession, events: &[Event]) -> Result<()> {
    let moved = events.iter().any(|event| {
        matches!(
            event,
            Event::PlayerMoved { .. } | Event::MazeGenerated { .. }
        )
    });

    for event in events {
        if let Event::MazeGenerated { fell_back: true, .. } = event {
            writeln!(out, "No solvable maze sampled in time; a corridor was carved.")?;
        }
    }

    if moved {
        show_board(out, session)?;
    } else if events.iter().any(|event| matches!(event, Event::TimeAdvanced { .. })) {
        writeln!(out, "{}", render::status(&query::snapshot(session)))?;
    }

    for event in events {
        if let Event::SessionEnded { outcome } = event {
            writeln!(out, "{}", render::outcome(outcome))?;
            writeln!(out, "Type r to try again or q to quit.")?;
        }
    }

    Ok(())
}

fn show_board<W: Write>(out: &mut W, session: &GameSession) -> Result<()> {
    let snapshot = query::snapshot(session);
    write!(out, "{}", render::board(query::grid(session), snapshot.player))?;
    writeln!(out, "{}", render::status(&snapshot))?;
    Ok(())
}

fn spawn_ticker(sender: Sender<Message>, interval: Duration) {
    let _ = thread::spawn(move || loop {
        thread::sleep(interval);
        if sender.send(Message::Tick).is_err() {
            break;
        }
    });
}

fn spawn_reader(sender: Sender<Message>) {
    let _ = thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let message = match line.context("failed to read player input") {
                Ok(line) => Message::Line(line),
                Err(error) => {
                    log::warn!("{error:#}");
                    break;
                }
            };
            if sender.send(message).is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Closed);
    });
}
