use std::collections::VecDeque;
use std::time::Duration;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// A cell on the snake grid, may lie outside the grid after a wall hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved_in_direction(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Parses a key name such as `Up` or `w`, anything else yields `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Some(Self::Up),
            "down" | "s" => Some(Self::Down),
            "left" | "a" => Some(Self::Left),
            "right" | "d" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Where food may respawn after being eaten.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodPlacement {
    /// Any cell of the grid, including cells under the snake.
    #[default]
    Anywhere,
    /// Only cells not covered by the snake, falls back to `Anywhere` on a full grid.
    AvoidSnake,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeConfig {
    pub width: u16,
    pub height: u16,
    /// Pixel pitch of one cell, only meaningful to renderers.
    pub cell_size: u16,
    /// Cadence the presentation layer should call [`SnakeEngine::tick`] at.
    pub tick_interval: Duration,
    pub food_placement: FoodPlacement,
    pub seed: u64,
}

impl SnakeConfig {
    pub const SCORE_PER_FOOD: u32 = 10;
    pub const START_DIRECTION: Direction = Direction::Right;
    pub const START_SEGMENTS: [Position; 3] = [
        Position::new(10, 10),
        Position::new(9, 10),
        Position::new(8, 10),
    ];

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            cell_size: 10,
            tick_interval: Duration::from_millis(100),
            food_placement: FoodPlacement::Anywhere,
            seed: 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Wall,
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    Moved,
    Ate,
    Died(Collision),
}

/// Rules of a single snake session, free of any reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnakeStateParts")]
pub struct SnakeState {
    width: i32,
    height: i32,
    segments: VecDeque<Position>,
    food: Position,
    direction: Direction,
    score: u32,
    alive: bool,
}

/// Unchecked mirror of [`SnakeState`], validated on deserialize.
#[derive(Deserialize)]
struct SnakeStateParts {
    width: i32,
    height: i32,
    segments: VecDeque<Position>,
    food: Position,
    direction: Direction,
    score: u32,
    alive: bool,
}

impl TryFrom<SnakeStateParts> for SnakeState {
    type Error = GameError;

    fn try_from(parts: SnakeStateParts) -> Result<Self> {
        if parts.width <= 0 || parts.height <= 0 || parts.segments.is_empty() {
            return Err(GameError::InvalidBoardShape);
        }

        let state = Self {
            width: parts.width,
            height: parts.height,
            segments: parts.segments,
            food: parts.food,
            direction: parts.direction,
            score: parts.score,
            alive: parts.alive,
        };
        // a dead snake keeps the head that left the grid
        let body_start = usize::from(!state.alive);
        let body_out = state
            .segments
            .iter()
            .skip(body_start)
            .any(|&pos| !state.in_bounds(pos));
        if body_out || !state.in_bounds(state.food) {
            return Err(GameError::InvalidCoords);
        }
        Ok(state)
    }
}

impl SnakeState {
    /// Builds an arbitrary live position, head first.
    pub fn from_parts(
        (width, height): (u16, u16),
        segments: impl IntoIterator<Item = Position>,
        direction: Direction,
        food: Position,
    ) -> Result<Self> {
        Self::try_from(SnakeStateParts {
            width: width.into(),
            height: height.into(),
            segments: segments.into_iter().collect(),
            food,
            direction,
            score: 0,
            alive: true,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Advances the snake one cell.
    ///
    /// The tail is dropped before collisions are checked, so following the tail into its old cell is safe.
    pub fn step(&mut self, rng: &mut impl Rng, placement: FoodPlacement) -> TickOutcome {
        if !self.alive {
            return TickOutcome::NoChange;
        }

        let new_head = self.head().moved_in_direction(self.direction);
        self.segments.push_front(new_head);

        let ate = new_head == self.food;
        if ate {
            self.score += SnakeConfig::SCORE_PER_FOOD;
            self.food = self.place_food(rng, placement);
            log::debug!("Ate food at {new_head:?}, score: {}", self.score);
        } else {
            self.segments.pop_back();
        }

        if let Some(collision) = self.collision() {
            self.alive = false;
            log::debug!("Snake died at {new_head:?}: {collision:?}");
            return TickOutcome::Died(collision);
        }

        if ate {
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        }
    }

    fn collision(&self) -> Option<Collision> {
        let head = self.head();
        if !self.in_bounds(head) {
            Some(Collision::Wall)
        } else if self.segments.iter().skip(1).any(|&pos| pos == head) {
            Some(Collision::SelfCollision)
        } else {
            None
        }
    }

    fn place_food(&self, rng: &mut impl Rng, placement: FoodPlacement) -> Position {
        if placement == FoodPlacement::AvoidSnake {
            let free: Vec<_> = (0..self.height)
                .flat_map(|y| (0..self.width).map(move |x| Position::new(x, y)))
                .filter(|pos| !self.segments.contains(pos))
                .collect();
            if let Some(&pos) = free.choose(rng) {
                return pos;
            }
            log::warn!("No free cell for food, placing it anywhere");
        }
        random_cell(rng, self.width, self.height)
    }
}

fn random_cell(rng: &mut impl Rng, width: i32, height: i32) -> Position {
    Position::new(rng.random_range(0..width), rng.random_range(0..height))
}

/// A snake session that reports its final score when the snake dies.
#[derive(Debug)]
pub struct SnakeEngine<R> {
    config: SnakeConfig,
    state: SnakeState,
    rng: SmallRng,
    recorder: R,
}

impl<R: ResultRecorder> SnakeEngine<R> {
    pub fn new(config: SnakeConfig, recorder: R) -> Result<Self> {
        let mut state = SnakeState::from_parts(
            (config.width, config.height),
            SnakeConfig::START_SEGMENTS,
            SnakeConfig::START_DIRECTION,
            Position::new(0, 0),
        )?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        state.food = random_cell(&mut rng, state.width, state.height);

        Ok(Self {
            config,
            state,
            rng,
            recorder,
        })
    }

    /// Resumes from a prepared state, the config only supplies food placement and seed.
    pub fn from_state(config: SnakeConfig, state: SnakeState, recorder: R) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            state,
            recorder,
        }
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.state.set_direction(direction);
    }

    /// Applies a key name, returns whether it named a direction.
    pub fn set_direction_key(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(direction) => {
                self.set_direction(direction);
                true
            }
            None => {
                log::trace!("Ignoring key {key:?}");
                false
            }
        }
    }

    pub fn tick(&mut self) -> Result<TickOutcome> {
        let outcome = self.state.step(&mut self.rng, self.config.food_placement);
        if let TickOutcome::Died(_) = outcome {
            self.recorder
                .record_result(GameKind::Snake, self.state.score().into())?;
        }
        Ok(outcome)
    }
}
