use std::collections::HashSet;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use rand::{
    distributions::{Distribution, Standard},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::config::GridConfig;
use crate::error::{GridError, Result};

pub const TARGET_REWARD: f32 = 1.0;
pub const AVOID_REWARD: f32 = -1.0;
pub const OBSTACLE_REWARD: f32 = 0.0;

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Right,
    Down,
    Left,
}

/// A cell coordinate, `row` counted from the top and `col` from the left.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos::new(row, col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Movement {
    pub fn into_vector(self) -> (isize, isize) {
        match self {
            Movement::Up    => (-1, 0),
            Movement::Down  => ( 1, 0),
            Movement::Left  => ( 0,-1),
            Movement::Right => ( 0, 1),
        }
    }

    pub fn actions() -> Vec<Movement> {
        vec![Movement::Up, Movement::Down, Movement::Right, Movement::Left]
    }

    /// Single letter used by drivers and the policy rendering.
    pub fn label(self) -> char {
        match self {
            Movement::Up    => 'U',
            Movement::Down  => 'D',
            Movement::Left  => 'L',
            Movement::Right => 'R',
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<char> for Movement {
    type Error = GridError;

    fn try_from(label: char) -> Result<Self> {
        match label.to_ascii_uppercase() {
            'U' => Ok(Movement::Up),
            'D' => Ok(Movement::Down),
            'L' => Ok(Movement::Left),
            'R' => Ok(Movement::Right),
            _ => Err(GridError::InvalidAction(label.to_string())),
        }
    }
}

impl FromStr for Movement {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(label), None) => Movement::try_from(label)
                .map_err(|_| GridError::InvalidAction(s.to_string())),
            _ => Err(GridError::InvalidAction(s.to_string())),
        }
    }
}

impl Distribution<Movement> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Movement {
        match rng.gen_range(0..4) {
            0 => Movement::Up,
            1 => Movement::Right,
            2 => Movement::Down,
            _ => Movement::Left,
        }
    }
}

/// Placement of the special cells. Immutable once a world is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub start: Pos,
    pub target: Pos,
    pub avoid: Pos,
    pub obstacles: Vec<Pos>,
}

impl Layout {
    /// Draws a layout by rejection sampling. The caller must have
    /// validated the config, otherwise sampling may never finish.
    fn random<R: Rng + ?Sized>(config: &GridConfig, rng: &mut R) -> Self {
        let start = random_pos(config, rng);
        let (target, avoid) = loop {
            let target = random_pos(config, rng);
            let avoid = random_pos(config, rng);
            if target != avoid && target != start && avoid != start {
                break (target, avoid);
            }
        };

        let mut taken: HashSet<Pos> = [start, target, avoid].into_iter().collect();
        let mut obstacles: Vec<Pos> = Vec::with_capacity(config.obstacle_count);
        for _ in 0..config.obstacle_count {
            let obstacle = loop {
                let candidate = random_pos(config, rng);
                if taken.insert(candidate) {
                    break candidate;
                }
            };
            obstacles.push(obstacle);
        }

        Self { start, target, avoid, obstacles }
    }

    fn special_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        [self.start, self.target, self.avoid]
            .into_iter()
            .chain(self.obstacles.iter().copied())
    }
}

fn random_pos<R: Rng + ?Sized>(config: &GridConfig, rng: &mut R) -> Pos {
    Pos::new(rng.gen_range(0..config.height), rng.gen_range(0..config.width))
}

/// A randomly generated grid world with one agent.
///
/// The layout (start, terminal cells, obstacles and the reward table) is
/// fixed at construction. Only the agent position changes, through
/// [`GridWorld::r#move`] and [`GridWorld::reset`].
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    step_reward: f32,
    layout: Layout,
    obstacle_fields: HashSet<Pos>,
    rewards: Array2<f32>,
    current: Pos,
}

impl GridWorld {
    /// Generates a random layout from `rng`.
    ///
    /// Fails with [`GridError::LayoutInfeasible`] when the grid has fewer
    /// than `3 + obstacle_count` cells.
    pub fn new<R: Rng + ?Sized>(config: &GridConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let layout = Layout::random(config, rng);
        debug!(
            width = config.width,
            height = config.height,
            start = %layout.start,
            target = %layout.target,
            avoid = %layout.avoid,
            obstacles = ?layout.obstacles,
            "generated grid layout"
        );
        Ok(Self::build(config, layout))
    }

    /// Same as [`GridWorld::new`] with a ChaCha8 generator seeded from `seed`.
    pub fn with_seed(config: &GridConfig, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(config, &mut rng)
    }

    /// Builds a world around an explicit layout, checking the same
    /// invariants random generation guarantees.
    pub fn from_layout(config: &GridConfig, layout: Layout) -> Result<Self> {
        config.validate()?;
        if layout.obstacles.len() != config.obstacle_count {
            return Err(GridError::ObstacleCount {
                expected: config.obstacle_count,
                actual: layout.obstacles.len(),
            });
        }
        let mut seen = HashSet::new();
        for pos in layout.special_cells() {
            if pos.row >= config.height || pos.col >= config.width {
                return Err(GridError::OutOfBounds {
                    pos,
                    width: config.width,
                    height: config.height,
                });
            }
            if !seen.insert(pos) {
                return Err(GridError::Overlap(pos));
            }
        }
        Ok(Self::build(config, layout))
    }

    fn build(config: &GridConfig, layout: Layout) -> Self {
        let mut rewards = Array2::<f32>::from_elem((config.height, config.width), config.step_reward);
        rewards[[layout.target.row, layout.target.col]] = TARGET_REWARD;
        rewards[[layout.avoid.row, layout.avoid.col]] = AVOID_REWARD;
        for o in &layout.obstacles {
            rewards[[o.row, o.col]] = OBSTACLE_REWARD;
        }

        Self {
            width: config.width,
            height: config.height,
            step_reward: config.step_reward,
            current: layout.start,
            obstacle_fields: layout.obstacles.iter().copied().collect(),
            layout,
            rewards,
        }
    }

    pub fn get_current_state(&self) -> Pos {
        self.current
    }

    pub fn is_state_terminal(&self) -> bool {
        self.is_terminal(self.current)
    }

    /// Moves the agent one cell in the direction of `movement`.
    ///
    /// Moves off the grid or into an obstacle leave the agent in place.
    /// Returns the reward of the cell the agent occupies afterwards.
    pub fn r#move(&mut self, movement: Movement) -> f32 {
        let next = self.transition(self.current, movement);
        if next == self.current {
            trace!(pos = %self.current, ?movement, "move rejected");
        }
        self.current = next;
        self.reward(self.current)
    }

    /// Parses a `U`/`D`/`L`/`R` label and moves. Unknown labels are
    /// rejected without touching the agent.
    pub fn move_label(&mut self, label: char) -> Result<f32> {
        let movement = Movement::try_from(label)?;
        Ok(self.r#move(movement))
    }

    pub fn reset(&mut self) {
        self.current = self.layout.start;
    }

    /// Where `movement` takes an agent standing on `pos`, without moving it.
    /// A `pos` outside the grid is returned unchanged.
    pub fn transition(&self, pos: Pos, movement: Movement) -> Pos {
        if !self.contains(pos) {
            return pos;
        }
        match self.check_movement(pos, movement.into_vector()) {
            Some(new_pos) if !self.is_obstacle(new_pos) => new_pos,
            _ => pos,
        }
    }

    fn check_movement(&self, pos: Pos, movement_vec: (isize, isize)) -> Option<Pos> {
        let row = pos.row.checked_add_signed(movement_vec.0)?;
        let col = pos.col.checked_add_signed(movement_vec.1)?;
        let new_pos = Pos::new(row, col);
        if self.contains(new_pos) {
            Some(new_pos)
        } else {
            None
        }
    }

    pub fn width(&self) -> usize { self.width }

    pub fn height(&self) -> usize { self.height }

    pub fn step_reward(&self) -> f32 { self.step_reward }

    pub fn starting_position(&self) -> Pos { self.layout.start }

    pub fn target(&self) -> Pos { self.layout.target }

    pub fn avoid(&self) -> Pos { self.layout.avoid }

    pub fn terminal_states(&self) -> [Pos; 2] {
        [self.layout.target, self.layout.avoid]
    }

    pub fn obstacles(&self) -> &[Pos] {
        &self.layout.obstacles
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Reward table indexed by `[[row, col]]`.
    pub fn rewards(&self) -> &Array2<f32> {
        &self.rewards
    }

    /// Reward for occupying `pos`. Panics if `pos` is outside the grid.
    pub fn reward(&self, pos: Pos) -> f32 {
        self.rewards[[pos.row, pos.col]]
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn is_terminal(&self, pos: Pos) -> bool {
        pos == self.layout.target || pos == self.layout.avoid
    }

    pub fn is_obstacle(&self, pos: Pos) -> bool {
        self.obstacle_fields.contains(&pos)
    }

    pub fn iter_all_coordinates(&self) -> EnvIter {
        EnvIter::new(self.height, self.width)
    }
}

/// Row-major iterator over every cell of a grid.
pub struct EnvIter {
    row: usize,
    col: usize,
    height: usize,
    width: usize,
}

impl EnvIter {
    fn new(height: usize, width: usize) -> EnvIter {
        EnvIter { row: 0, col: 0, height, width }
    }
}

impl Iterator for EnvIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        if self.row >= self.height || self.width == 0 {
            return None;
        }
        let pos = Pos::new(self.row, self.col);
        self.col += 1;
        if self.col == self.width {
            self.col = 0;
            self.row += 1;
        }
        Some(pos)
    }
}
