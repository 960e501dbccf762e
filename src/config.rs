//! Configuration for randomly generated grid worlds.

use crate::error::{GridError, Result};

/// Number of special cells every layout needs besides obstacles:
/// start, target and avoid.
pub const SPECIAL_CELLS: usize = 3;

/// Geometry and reward settings for a [`GridWorld`](crate::GridWorld).
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Reward for occupying any ordinary cell.
    pub step_reward: f32,
    /// Number of cells the agent can never enter.
    pub obstacle_count: usize,
}

impl GridConfig {
    pub const DEFAULT_STEP_REWARD: f32 = -0.1;
    pub const DEFAULT_OBSTACLES: usize = 2;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            step_reward: Self::DEFAULT_STEP_REWARD,
            obstacle_count: Self::DEFAULT_OBSTACLES,
        }
    }

    pub fn with_step_reward(mut self, step_reward: f32) -> Self {
        self.step_reward = step_reward;
        self
    }

    pub fn with_obstacles(mut self, obstacle_count: usize) -> Self {
        self.obstacle_count = obstacle_count;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Checks that a layout with distinct start, target, avoid and
    /// obstacle cells fits on the grid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::EmptyGrid);
        }
        let cells = self.cell_count();
        let required = SPECIAL_CELLS.saturating_add(self.obstacle_count);
        if cells < required {
            return Err(GridError::LayoutInfeasible { cells, required });
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(4, 4)
    }
}
