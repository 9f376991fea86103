use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use arcade_core::*;

use crate::render;

const MENU: &str = "\
== Arcade ==
1) View Career Stats
2) Snake Game
3) Minesweeper
4) Tic Tac Toe
q) Quit";

/// Line based stand-in for the launcher window, forwards input to the engines.
pub(crate) struct Arcade<'a, I, O> {
    store: &'a StatsStore,
    seed: u64,
    sessions: u64,
    input: I,
    output: O,
}

impl<'a, I: BufRead, O: Write> Arcade<'a, I, O> {
    pub(crate) fn new(store: &'a StatsStore, seed: u64, input: I, output: O) -> Self {
        Self {
            store,
            seed,
            sessions: 0,
            input,
            output,
        }
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.read_line()? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.view_stats()?,
                "2" => self.play_snake()?,
                "3" => self.play_minesweeper()?,
                "4" => self.play_tictactoe()?,
                "q" | "quit" => return Ok(()),
                "" => {}
                other => writeln!(self.output, "Unknown choice {other:?}")?,
            }
        }
    }

    /// Next trimmed input line, `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Could not read input")?;
        Ok((read > 0).then(|| line.trim().to_owned()))
    }

    fn next_seed(&mut self) -> u64 {
        self.sessions += 1;
        self.seed.wrapping_add(self.sessions)
    }

    fn view_stats(&mut self) -> Result<()> {
        match self.store.summary() {
            Ok(summary) => writeln!(self.output, "{summary}")?,
            Err(err) => self.show_error("Could not read career stats", err)?,
        }
        Ok(())
    }

    fn show_error(&mut self, what: &str, err: impl Into<anyhow::Error>) -> Result<()> {
        let err = err.into().context(what.to_owned());
        log::error!("{err:?}");
        writeln!(self.output, "Error: {err:#}")?;
        Ok(())
    }

    fn play_snake(&mut self) -> Result<()> {
        let store = self.store;
        let config = SnakeConfig::with_seed(self.next_seed());
        let mut engine = SnakeEngine::new(config, store)?;

        loop {
            writeln!(self.output, "{}", render::snake_board(engine.state()))?;
            writeln!(
                self.output,
                "Direction (w/a/s/d or Up/Down/Left/Right), Enter to keep going, q to quit:"
            )?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            if line == "q" {
                writeln!(self.output, "Game abandoned")?;
                return Ok(());
            }
            if !line.is_empty() {
                engine.set_direction_key(&line);
            }

            match engine.tick() {
                Ok(TickOutcome::Died(collision)) => {
                    writeln!(self.output, "{}", render::snake_board(engine.state()))?;
                    writeln!(
                        self.output,
                        "Game Over! {collision:?}, final score: {}",
                        engine.score()
                    )?;
                    return Ok(());
                }
                Ok(_) => {}
                Err(err) => return self.show_error("Could not record the snake result", err),
            }
        }
    }

    fn play_minesweeper(&mut self) -> Result<()> {
        let store = self.store;
        let seed = self.next_seed();
        let mut engine = MinesweeperEngine::new(MinesweeperConfig::default(), seed, store)?;

        loop {
            writeln!(self.output, "{}", render::minefield(engine.state()))?;
            writeln!(self.output, "Reveal with \"x y\", flag with \"f x y\", q to quit:")?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            if line == "q" {
                writeln!(self.output, "Game abandoned")?;
                return Ok(());
            }

            let Some(command) = MineCommand::parse(&line) else {
                writeln!(self.output, "Could not understand {line:?}")?;
                continue;
            };
            let outcome = match command {
                MineCommand::Reveal(coords) => engine.reveal(coords),
                MineCommand::Flag(coords) => {
                    if !engine.toggle_flag(coords).has_update() {
                        writeln!(self.output, "Cannot flag {coords:?}")?;
                    }
                    continue;
                }
            };

            match outcome {
                Ok(RevealOutcome::HitMine) => {
                    writeln!(self.output, "{}", render::minefield(engine.state()))?;
                    writeln!(self.output, "Game Over! You hit a mine.")?;
                    return Ok(());
                }
                Ok(RevealOutcome::Won) => {
                    writeln!(self.output, "{}", render::minefield(engine.state()))?;
                    writeln!(self.output, "You win!")?;
                    return Ok(());
                }
                Ok(outcome) if !outcome.has_update() => {
                    writeln!(self.output, "Nothing to reveal at {line:?}")?;
                }
                Ok(_) => {}
                Err(err) => return self.show_error("Could not record the minesweeper result", err),
            }
        }
    }

    fn play_tictactoe(&mut self) -> Result<()> {
        let mut engine = TicTacToeEngine::new(self.store);

        loop {
            writeln!(self.output, "{}", render::tictactoe_board(engine.state()))?;
            writeln!(
                self.output,
                "Player {}, pick a cell (1-{BOARD_CELLS}), q to quit:",
                engine.state().current_player().symbol()
            )?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            if line == "q" {
                writeln!(self.output, "Game abandoned")?;
                return Ok(());
            }

            // the board is bound by explicit index, anything unparsable becomes an ignored move
            let index = line
                .parse::<usize>()
                .ok()
                .and_then(|cell| cell.checked_sub(1))
                .unwrap_or(usize::MAX);

            match engine.make_move(index) {
                Ok(MoveOutcome::Won(player)) => {
                    writeln!(self.output, "{}", render::tictactoe_board(engine.state()))?;
                    writeln!(self.output, "Player {} wins!", player.symbol())?;
                    return Ok(());
                }
                Ok(MoveOutcome::Tied) => {
                    writeln!(self.output, "{}", render::tictactoe_board(engine.state()))?;
                    writeln!(self.output, "It's a tie!")?;
                    return Ok(());
                }
                Ok(MoveOutcome::NoChange) => {
                    writeln!(self.output, "Cell {line:?} is not available")?;
                }
                Ok(MoveOutcome::Placed) => {}
                Err(err) => return self.show_error("Could not record the tic tac toe result", err),
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum MineCommand {
    Reveal(Coord2),
    Flag(Coord2),
}

impl MineCommand {
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let first = parts.next()?;
        let (flag, x) = if first.eq_ignore_ascii_case("f") {
            (true, parts.next()?)
        } else {
            (false, first)
        };
        let coords = (x.parse().ok()?, parts.next()?.parse().ok()?);
        if parts.next().is_some() {
            return None;
        }
        Some(if flag {
            Self::Flag(coords)
        } else {
            Self::Reveal(coords)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(store: &StatsStore, script: &str) -> String {
        let mut output = Vec::new();
        Arcade::new(store, 1, Cursor::new(script.to_owned()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn store_in(dir: &TempDir) -> StatsStore {
        StatsStore::new(dir.path().join(StatsStore::DEFAULT_FILE_NAME))
    }

    #[test]
    fn stats_before_any_game() {
        let dir = TempDir::new().unwrap();
        let output = run_script(&store_in(&dir), "1\nq\n");
        assert!(output.contains(NO_STATS_MESSAGE));
    }

    #[test]
    fn tictactoe_win_is_recorded() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let output = run_script(&store, "4\n1\n4\n2\n5\n3\n1\nq\n");

        assert!(output.contains("Player X wins!"));
        assert!(output.contains("Games Played: 1"));
        assert!(output.contains("Tic Tac Toe: 1"));
        assert_eq!(store.load().unwrap().best_score("Tic Tac Toe"), Some(1));
    }

    #[test]
    fn tictactoe_rejects_taken_and_bogus_cells() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let output = run_script(&store, "4\n5\n5\nten\n0\nq\nq\n");

        assert!(output.contains("Cell \"5\" is not available"));
        assert!(output.contains("Cell \"ten\" is not available"));
        assert!(output.contains("Cell \"0\" is not available"));
        assert!(output.contains("Game abandoned"));
        assert_eq!(store.load_existing().unwrap(), None);
    }

    #[test]
    fn snake_runs_into_wall_and_records() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        // heading up from row 10 leaves the board on the eleventh tick
        let script = format!("2\nw\n{}q\n", "\n".repeat(20));
        let output = run_script(&store, &script);

        assert!(output.contains("Game Over!"));
        let record = store.load().unwrap();
        assert_eq!(record.games_played, 1);
        assert!(record.best_score("Snake Game").is_some());
    }

    #[test]
    fn minesweeper_session_can_be_abandoned() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let output = run_script(&store, "3\nf 0 0\nbogus\nf 10 10\n10 0\nq\nq\n");

        assert!(output.contains("Could not understand \"bogus\""));
        assert!(output.contains("Cannot flag (10, 10)"));
        assert!(output.contains("Nothing to reveal at \"10 0\""));
        assert!(output.contains("Mines left: 9"));
        assert_eq!(store.load_existing().unwrap(), None);
    }

    #[test]
    fn corrupt_stats_are_reported_not_reset() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        let output = run_script(&store, "1\nq\n");

        assert!(output.contains("Error: Could not read career stats"));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "not json");
    }

    #[test]
    fn end_of_input_leaves_menu() {
        let dir = TempDir::new().unwrap();
        let output = run_script(&store_in(&dir), "");
        assert!(output.contains("== Arcade =="));
    }

    #[test]
    fn mine_commands_parse() {
        assert_eq!(MineCommand::parse("3 4"), Some(MineCommand::Reveal((3, 4))));
        assert_eq!(MineCommand::parse("f 0 9"), Some(MineCommand::Flag((0, 9))));
        assert_eq!(MineCommand::parse("F 1 1"), Some(MineCommand::Flag((1, 1))));
        assert_eq!(MineCommand::parse("1"), None);
        assert_eq!(MineCommand::parse("1 2 3"), None);
        assert_eq!(MineCommand::parse("-1 2"), None);
        assert_eq!(MineCommand::parse("f x y"), None);
    }
}
