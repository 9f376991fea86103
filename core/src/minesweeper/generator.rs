use ndarray::Array2;
use rand::prelude::*;

use crate::*;

pub trait MineGenerator {
    fn generate(self, config: MinesweeperConfig) -> Result<MineLayout>;
}

/// Purely random placement, the first click is not protected.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: MinesweeperConfig) -> Result<MineLayout> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut mines_placed = 0;
        let mut attempts = 0u32;

        // terminates because validation leaves at least one free cell
        while mines_placed < config.mines {
            let coords = (
                rng.random_range(0..config.side),
                rng.random_range(0..config.side),
            );
            attempts += 1;
            let cell = &mut mine_mask[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                mines_placed += 1;
            }
        }
        log::debug!(
            "Placed {} mines on a {side}x{side} board in {attempts} draws",
            config.mines,
            side = config.side
        );

        MineLayout::from_mine_mask(mine_mask)
    }
}
