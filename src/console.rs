//! Terminal driver: prompts, board rendering, turn order and replay.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use log::info;
use rand::Rng;

use crate::minimax::cpu_move;
use crate::tic_tac_toe::{Board, Cell, GameOutcome, Mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Mode {
    /// Two people share the keyboard.
    Pvp,
    /// One person plays against the computer.
    Cpu,
}

pub(crate) struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs games until the player declines a rematch.
    pub fn run<S: Rng + ?Sized>(&mut self, mode: Option<Mode>, rng: &mut S) -> Result<()> {
        writeln!(self.output, "\nWelcome to Tic-Tac-Toe.\n")?;
        loop {
            let mode = match mode {
                Some(mode) => mode,
                None => self.choose_mode()?,
            };
            info!("starting a {:?} game", mode);
            let outcome = match mode {
                Mode::Pvp => self.play_pvp()?,
                Mode::Cpu => self.play_cpu(rng)?,
            };
            info!("game over: {:?}", outcome);

            let answer = self.prompt("Play again? (y/n): ")?;
            if !answer.trim().to_lowercase().starts_with('y') {
                return Ok(());
            }
        }
    }

    fn play_pvp(&mut self) -> Result<GameOutcome> {
        let player1 = self.ask_name("Name of player 1: ", "Player 1")?;
        let player2 = self.ask_name("Name of player 2: ", "Player 2")?;

        let mut board = Board::new();
        let mut current = Mark::X;
        self.show(&board)?;
        loop {
            let name = if current == Mark::X { &player1 } else { &player2 };
            let cell = self.player_move(&board, name, current)?;
            board.play(cell, current)?;
            self.show(&board)?;

            match board.outcome() {
                GameOutcome::Win(mark) => {
                    let winner = if mark == Mark::X { &player1 } else { &player2 };
                    writeln!(self.output, "{} ({}) wins!", winner, mark)?;
                    return Ok(board.outcome());
                }
                GameOutcome::Draw => {
                    writeln!(self.output, "Draw.")?;
                    return Ok(board.outcome());
                }
                GameOutcome::InProgress => current = current.opponent(),
            }
        }
    }

    fn play_cpu<S: Rng + ?Sized>(&mut self, rng: &mut S) -> Result<GameOutcome> {
        let name = self.ask_name("Your name: ", "Player")?;
        let human = self.choose_symbol()?;
        let ai = human.opponent();

        let mut board = Board::new();
        let mut current = Mark::X;
        self.show(&board)?;
        loop {
            if current == human {
                let cell = self.player_move(&board, &name, human)?;
                board.play(cell, human)?;
            } else {
                writeln!(self.output, "CPU is thinking...")?;
                let Some(cell) = cpu_move(&board, ai, human, rng) else {
                    bail!("no move left for the CPU");
                };
                board.play(cell, ai)?;
                writeln!(self.output, "CPU played cell {}.", cell + 1)?;
            }
            self.show(&board)?;

            match board.outcome() {
                GameOutcome::Win(mark) if mark == human => {
                    writeln!(self.output, "Congratulations, {}! You win.", name)?;
                    return Ok(board.outcome());
                }
                GameOutcome::Win(_) => {
                    writeln!(self.output, "The CPU wins. Better luck next time.")?;
                    return Ok(board.outcome());
                }
                GameOutcome::Draw => {
                    writeln!(self.output, "Draw.")?;
                    return Ok(board.outcome());
                }
                GameOutcome::InProgress => current = current.opponent(),
            }
        }
    }

    fn show(&mut self, board: &Board) -> Result<()> {
        writeln!(self.output, "\n{}", board)?;
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            bail!("input closed");
        }
        Ok(line.trim().to_string())
    }

    fn ask_name(&mut self, message: &str, default: &str) -> Result<String> {
        let name = self.prompt(message)?;
        if name.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(name)
        }
    }

    fn choose_mode(&mut self) -> Result<Mode> {
        writeln!(self.output, "Game mode:\n1) Player vs Player\n2) Player vs CPU")?;
        loop {
            match self.prompt("Choose 1 or 2: ")?.as_str() {
                "1" => return Ok(Mode::Pvp),
                "2" => return Ok(Mode::Cpu),
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
    }

    fn choose_symbol(&mut self) -> Result<Mark> {
        loop {
            let answer = self.prompt("Choose your symbol (X/O). X goes first: ")?;
            match answer.parse::<Mark>() {
                Ok(mark) => return Ok(mark),
                Err(_) => writeln!(self.output, "Choose X or O.")?,
            }
        }
    }

    /// Asks until the player names a free cell; returns its 0-based index.
    fn player_move(&mut self, board: &Board, name: &str, mark: Mark) -> Result<usize> {
        loop {
            let answer = self.prompt(&format!("{} ({}), choose a cell (1-9): ", name, mark))?;
            let Ok(number) = answer.parse::<usize>() else {
                writeln!(self.output, "Invalid input. Type a number from 1 to 9.")?;
                continue;
            };
            if !(1..=9).contains(&number) {
                writeln!(self.output, "Invalid number. Try again.")?;
                continue;
            }
            if board.cell(number - 1) != Some(Cell::Empty) {
                writeln!(self.output, "That cell is taken. Choose another.")?;
                continue;
            }
            return Ok(number - 1);
        }
    }
}
