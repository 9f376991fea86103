use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[default]
    X,
    O,
}

impl Player {
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::X => 'X',
            Self::O => 'O',
        }
    }
}

/// Valid transitions:
/// - InProgress -> InProgress
/// - InProgress -> Won
/// - InProgress -> Tied
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    InProgress,
    Won(Player),
    Tied,
}

impl MatchState {
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Placed,
    Won(Player),
    Tied,
}

/// Cells on the 3x3 board.
pub const BOARD_CELLS: usize = 9;

/// Rows, columns and diagonals of the 3x3 board, cells indexed row-major.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Rules of a single tic-tac-toe match, free of any reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    board: [Option<Player>; BOARD_CELLS],
    current_player: Player,
    state: MatchState,
}

impl TicTacToeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &[Option<Player>; BOARD_CELLS] {
        &self.board
    }

    pub fn cell(&self, index: usize) -> Option<Player> {
        self.board.get(index).copied().flatten()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_final()
    }

    /// First line fully held by one player, if any.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        LINES.into_iter().find(|&[a, b, c]| {
            self.board[a].is_some() && self.board[a] == self.board[b] && self.board[b] == self.board[c]
        })
    }

    pub fn make_move(&mut self, index: usize) -> MoveOutcome {
        if self.state.is_final() {
            return MoveOutcome::NoChange;
        }
        if !matches!(self.board.get(index), Some(None)) {
            log::trace!("Ignoring move at {index}");
            return MoveOutcome::NoChange;
        }

        let player = self.current_player;
        self.board[index] = Some(player);

        if self.winning_line().is_some() {
            self.state = MatchState::Won(player);
            log::debug!("{player:?} won tic tac toe");
            MoveOutcome::Won(player)
        } else if self.board.iter().all(Option::is_some) {
            self.state = MatchState::Tied;
            log::debug!("Tic tac toe tied");
            MoveOutcome::Tied
        } else {
            self.current_player = player.other();
            MoveOutcome::Placed
        }
    }
}

/// A tic-tac-toe match that reports `1` for a win and `0` for a tie.
#[derive(Debug)]
pub struct TicTacToeEngine<R> {
    state: TicTacToeState,
    recorder: R,
}

impl<R: ResultRecorder> TicTacToeEngine<R> {
    pub const WIN_SCORE: i64 = 1;
    pub const TIE_SCORE: i64 = 0;

    pub fn new(recorder: R) -> Self {
        Self {
            state: TicTacToeState::new(),
            recorder,
        }
    }

    pub fn state(&self) -> &TicTacToeState {
        &self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn make_move(&mut self, index: usize) -> Result<MoveOutcome> {
        let outcome = self.state.make_move(index);
        let score = match outcome {
            MoveOutcome::Won(_) => Self::WIN_SCORE,
            MoveOutcome::Tied => Self::TIE_SCORE,
            MoveOutcome::NoChange | MoveOutcome::Placed => return Ok(outcome),
        };
        self.recorder.record_result(GameKind::TicTacToe, score)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::testing::MemoryRecorder;

    fn play(engine: &mut TicTacToeEngine<&MemoryRecorder>, moves: &[usize]) -> MoveOutcome {
        moves
            .iter()
            .map(|&index| engine.make_move(index).unwrap())
            .last()
            .unwrap_or(MoveOutcome::NoChange)
    }

    #[test]
    fn players_alternate_starting_with_x() {
        let mut state = TicTacToeState::new();
        assert_eq!(state.current_player(), Player::X);

        assert_eq!(state.make_move(4), MoveOutcome::Placed);
        assert_eq!(state.cell(4), Some(Player::X));
        assert_eq!(state.current_player(), Player::O);

        assert_eq!(state.make_move(0), MoveOutcome::Placed);
        assert_eq!(state.cell(0), Some(Player::O));
        assert_eq!(state.current_player(), Player::X);
    }

    #[test]
    fn occupied_cell_is_a_no_op() {
        let mut state = TicTacToeState::new();
        state.make_move(4);
        let before = state.clone();

        assert_eq!(state.make_move(4), MoveOutcome::NoChange);
        assert_eq!(state, before);
        assert_eq!(state.current_player(), Player::O);
    }

    #[test]
    fn out_of_range_index_is_a_no_op() {
        let mut state = TicTacToeState::new();
        assert_eq!(state.make_move(BOARD_CELLS), MoveOutcome::NoChange);
        assert_eq!(state.make_move(usize::MAX), MoveOutcome::NoChange);
        assert_eq!(state, TicTacToeState::new());
    }

    #[test]
    fn every_line_wins_for_x() {
        for line in LINES {
            let recorder = MemoryRecorder::default();
            let mut engine = TicTacToeEngine::new(&recorder);
            let filler: Vec<_> = (0..BOARD_CELLS).filter(|i| !line.contains(i)).collect();

            let outcome = play(
                &mut engine,
                &[line[0], filler[0], line[1], filler[1], line[2]],
            );

            assert_eq!(outcome, MoveOutcome::Won(Player::X), "line {line:?}");
            assert_eq!(engine.state().winning_line(), Some(line));
            assert_eq!(recorder.results(), vec![(GameKind::TicTacToe, 1)]);
        }
    }

    #[test]
    fn o_can_win() {
        let recorder = MemoryRecorder::default();
        let mut engine = TicTacToeEngine::new(&recorder);

        let outcome = play(&mut engine, &[0, 3, 1, 4, 8, 5]);

        assert_eq!(outcome, MoveOutcome::Won(Player::O));
        assert_eq!(engine.state().state(), MatchState::Won(Player::O));
        assert_eq!(recorder.results(), vec![(GameKind::TicTacToe, 1)]);
    }

    #[test]
    fn full_board_without_line_ties() {
        let recorder = MemoryRecorder::default();
        let mut engine = TicTacToeEngine::new(&recorder);

        // X O X / X O O / O X X
        let outcome = play(&mut engine, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

        assert_eq!(outcome, MoveOutcome::Tied);
        assert!(engine.is_game_over());
        assert_eq!(engine.state().winning_line(), None);
        assert_eq!(recorder.results(), vec![(GameKind::TicTacToe, 0)]);
    }

    #[test]
    fn win_on_last_cell_is_not_a_tie() {
        let recorder = MemoryRecorder::default();
        let mut engine = TicTacToeEngine::new(&recorder);

        // X O X / O O X / O X X, the ninth move completes the right column
        let outcome = play(&mut engine, &[0, 1, 7, 3, 2, 4, 5, 6, 8]);

        assert_eq!(outcome, MoveOutcome::Won(Player::X));
        assert_eq!(engine.state().winning_line(), Some([2, 5, 8]));
        assert_eq!(recorder.results(), vec![(GameKind::TicTacToe, 1)]);
    }

    #[test]
    fn finished_game_ignores_moves() {
        let recorder = MemoryRecorder::default();
        let mut engine = TicTacToeEngine::new(&recorder);

        play(&mut engine, &[0, 3, 1, 4, 2]);
        let before = engine.state().clone();

        assert_eq!(engine.make_move(8).unwrap(), MoveOutcome::NoChange);
        assert_eq!(engine.state(), &before);
        assert_eq!(recorder.results().len(), 1);
    }
}
