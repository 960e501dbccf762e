//! Procedurally generated grid-world MDP for tabular reinforcement learning.
//!
//! A [`GridWorld`] is a bounded 2D grid holding one agent, one target cell
//! (reward `+1`), one cell to avoid (reward `-1`) and a number of obstacles
//! the agent cannot enter. Every other cell yields the step reward.
//!
//! ```
//! use grid_world::{GridConfig, GridWorld, Movement};
//!
//! let config = GridConfig::new(4, 4).with_obstacles(2);
//! let mut world = GridWorld::with_seed(&config, 42).unwrap();
//! for _ in 0..1000 {
//!     if world.is_state_terminal() {
//!         break;
//!     }
//!     world.r#move(rand::random::<Movement>());
//! }
//! world.reset();
//! assert_eq!(world.get_current_state(), world.starting_position());
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod render;

pub use config::GridConfig;
pub use environment::{EnvIter, GridWorld, Layout, Movement, Pos};
pub use error::{GridError, Result};
