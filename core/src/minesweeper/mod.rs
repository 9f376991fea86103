use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub use engine::*;
pub use generator::*;

mod engine;
mod generator;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinesweeperConfig {
    /// Cells per side of the square board.
    pub side: Coord,
    pub mines: CellCount,
}

impl MinesweeperConfig {
    pub fn new(side: Coord, mines: CellCount) -> Result<Self> {
        let config = Self { side, mines };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.side == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.side, self.side)
    }

    pub const fn total_cells(&self) -> CellCount {
        let side = self.side as CellCount;
        side.saturating_mul(side)
    }
}

impl Default for MinesweeperConfig {
    fn default() -> Self {
        Self { side: 10, mines: 10 }
    }
}

/// Mine positions plus the adjacency counts derived from them once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent_counts: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    /// At least one cell must stay free of mines.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (dim_x, dim_y) = mine_mask.dim();
        if dim_x == 0 || dim_y == 0 || Coord::try_from(dim_x.max(dim_y)).is_err() {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        if mine_count >= mine_mask.len() {
            return Err(GameError::TooManyMines);
        }

        let adjacent_counts = Array2::from_shape_fn(mine_mask.dim(), |(x, y)| {
            // both axes fit in `Coord`, checked above
            let coords = (x as Coord, y as Coord);
            mine_mask
                .iter_neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8
        });

        Ok(Self {
            mine_mask,
            adjacent_counts,
            mine_count: mine_count as CellCount,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn config(&self) -> MinesweeperConfig {
        MinesweeperConfig {
            side: self.size().0,
            mines: self.mine_count,
        }
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size().0 && coords.1 < self.size().1
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.mine_mask.dim();
        // validated on construction
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent_counts[coords.to_nd_index()]
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_classic_board() {
        let config = MinesweeperConfig::default();
        assert_eq!(config.size(), (10, 10));
        assert_eq!(config.mines, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_full_board() {
        assert!(matches!(
            MinesweeperConfig::new(10, 100),
            Err(GameError::TooManyMines)
        ));
        assert!(matches!(
            MinesweeperConfig::new(0, 0),
            Err(GameError::InvalidBoardShape)
        ));
        assert!(MinesweeperConfig::new(10, 99).is_ok());
    }

    #[test]
    fn adjacency_counts_match_neighbourhood() {
        let layout = MineLayout::from_mine_coords((4, 4), &[(0, 0), (1, 0), (3, 3)]).unwrap();

        assert_eq!(layout.mine_count(), 3);
        assert_eq!(layout.adjacent_mine_count((0, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 2)), 1);
        assert_eq!(layout.adjacent_mine_count((3, 0)), 0);
        assert_eq!(layout.adjacent_mine_count((0, 3)), 0);
    }

    #[test]
    fn duplicate_coords_count_once() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(1, 1), (1, 1)]).unwrap();
        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.safe_cell_count(), 8);
    }

    #[test]
    fn out_of_range_mine_is_rejected() {
        assert!(matches!(
            MineLayout::from_mine_coords((3, 3), &[(3, 0)]),
            Err(GameError::InvalidCoords)
        ));
    }

    #[test]
    fn layout_without_safe_cell_is_rejected() {
        assert!(matches!(
            MineLayout::from_mine_coords((1, 1), &[(0, 0)]),
            Err(GameError::TooManyMines)
        ));
    }
}
