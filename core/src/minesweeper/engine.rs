use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// Mine uncovered after the game was lost.
    Mine,
}

impl CellView {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    #[default]
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Merges outcomes of several reveals, the most severe one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Rules of a single minesweeper board, free of any reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinesweeperState {
    layout: MineLayout,
    board: Array2<CellView>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: BoardState,
    triggered_mine: Option<Coord2>,
}

impl MinesweeperState {
    pub fn new(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: BoardState::Active,
            triggered_mine: None,
        }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_finished()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged_count as isize)
    }

    /// `None` when `coords` lies outside the board.
    pub fn cell_at(&self, coords: Coord2) -> Option<CellView> {
        self.layout
            .contains(coords)
            .then(|| self.board[coords.to_nd_index()])
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_some_and(CellView::is_revealed)
    }

    pub fn revealed_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.board
            .indexed_iter()
            .filter(|&(_, cell)| cell.is_revealed())
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        if !self.layout.contains(coords) || self.state.is_finished() {
            return FlagOutcome::NoChange;
        }

        let cell = &mut self.board[coords.to_nd_index()];
        match *cell {
            CellView::Hidden => {
                *cell = CellView::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Changed
            }
            CellView::Flagged => {
                *cell = CellView::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Changed
            }
            CellView::Revealed(_) | CellView::Mine => FlagOutcome::NoChange,
        }
    }

    /// Reveals a hidden cell, cascading through zero-count neighbours.
    ///
    /// Out-of-range, flagged and already revealed cells are ignored, as is everything once the game is over.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.layout.contains(coords) {
            log::trace!("Ignoring reveal outside the board at {coords:?}");
            return RevealOutcome::NoChange;
        }
        if self.state.is_finished() || self.board[coords.to_nd_index()] != CellView::Hidden {
            return RevealOutcome::NoChange;
        }

        if self.layout.contains_mine(coords) {
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }

        self.flood_reveal(coords);

        if self.revealed_count == self.layout.safe_cell_count() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Worklist flood fill, each cell is marked revealed before its neighbours are queued so none is visited twice.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            if self.board[coords.to_nd_index()] != CellView::Hidden {
                continue;
            }

            let count = self.layout.adjacent_mine_count(coords);
            self.board[coords.to_nd_index()] = CellView::Revealed(count);
            self.revealed_count += 1;
            log::trace!("Revealed {coords:?}, adjacent mines: {count}");

            if count == 0 {
                let board = &self.board;
                to_visit.extend(
                    self.layout
                        .iter_neighbors(coords)
                        .filter(|&pos| board[pos.to_nd_index()] == CellView::Hidden),
                );
            }
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { BoardState::Won } else { BoardState::Lost };
        log::debug!(
            "Minesweeper {:?} with {} cells revealed",
            self.state,
            self.revealed_count
        );

        if !won {
            let mines: Vec<_> = self.layout.mine_coords().collect();
            for coords in mines {
                self.board[coords.to_nd_index()] = CellView::Mine;
            }
        }
    }
}

/// A minesweeper session that reports the revealed cell count when the game ends.
#[derive(Debug)]
pub struct MinesweeperEngine<R> {
    state: MinesweeperState,
    recorder: R,
}

impl<R: ResultRecorder> MinesweeperEngine<R> {
    pub fn new(config: MinesweeperConfig, seed: u64, recorder: R) -> Result<Self> {
        let layout = RandomMineGenerator::new(seed).generate(config)?;
        Ok(Self::with_layout(layout, recorder))
    }

    pub fn with_layout(layout: MineLayout, recorder: R) -> Self {
        Self {
            state: MinesweeperState::new(layout),
            recorder,
        }
    }

    pub fn state(&self) -> &MinesweeperState {
        &self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let outcome = self.state.reveal(coords);
        if outcome.is_final() {
            self.recorder.record_result(
                GameKind::Minesweeper,
                self.state.revealed_count().into(),
            )?;
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        self.state.toggle_flag(coords)
    }
}
