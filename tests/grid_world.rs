use std::collections::HashSet;

use grid_world::{GridConfig, GridError, GridWorld, Layout, Movement, Pos};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn scenario() -> GridWorld {
    let config = GridConfig::new(4, 4).with_obstacles(0);
    let layout = Layout {
        start: Pos::new(0, 0),
        target: Pos::new(3, 3),
        avoid: Pos::new(1, 1),
        obstacles: vec![],
    };
    GridWorld::from_layout(&config, layout).unwrap()
}

fn walled() -> GridWorld {
    let config = GridConfig::new(4, 4).with_obstacles(2);
    let layout = Layout {
        start: Pos::new(2, 2),
        target: Pos::new(0, 3),
        avoid: Pos::new(3, 0),
        obstacles: vec![Pos::new(2, 3), Pos::new(1, 2)],
    };
    GridWorld::from_layout(&config, layout).unwrap()
}

// ── Fixed scenarios ─────────────────────────────────────────

#[test]
fn walk_down_the_left_edge() {
    let mut world = scenario();
    assert_eq!(world.r#move(Movement::Down), -0.1);
    assert_eq!(world.get_current_state(), Pos::new(1, 0));
    assert_eq!(world.r#move(Movement::Down), -0.1);
    assert_eq!(world.get_current_state(), Pos::new(2, 0));
    assert_eq!(world.r#move(Movement::Down), -0.1);
    assert_eq!(world.get_current_state(), Pos::new(3, 0));
    // bottom edge
    assert_eq!(world.r#move(Movement::Down), -0.1);
    assert_eq!(world.get_current_state(), Pos::new(3, 0));
    assert!(!world.is_state_terminal());
}

#[test]
fn moving_off_the_top_edge_keeps_position() {
    let mut world = scenario();
    let reward = world.r#move(Movement::Up);
    assert_eq!(world.get_current_state(), Pos::new(0, 0));
    assert_eq!(reward, world.reward(Pos::new(0, 0)));
    world.r#move(Movement::Left);
    assert_eq!(world.get_current_state(), Pos::new(0, 0));
}

#[test]
fn obstacle_blocks_move() {
    let mut world = walled();
    assert_eq!(world.r#move(Movement::Right), -0.1);
    assert_eq!(world.get_current_state(), Pos::new(2, 2));
    world.r#move(Movement::Up);
    assert_eq!(world.get_current_state(), Pos::new(2, 2));
    world.r#move(Movement::Down);
    assert_eq!(world.get_current_state(), Pos::new(3, 2));
}

#[test]
fn reaching_the_target_ends_the_episode() {
    let mut world = scenario();
    for m in [Movement::Right, Movement::Right, Movement::Right, Movement::Down, Movement::Down] {
        assert_eq!(world.r#move(m), -0.1);
        assert!(!world.is_state_terminal());
    }
    assert_eq!(world.r#move(Movement::Down), 1.0);
    assert!(world.is_state_terminal());
    assert_eq!(world.get_current_state(), Pos::new(3, 3));
}

#[test]
fn entering_the_avoid_cell_is_terminal() {
    let mut world = scenario();
    world.r#move(Movement::Down);
    assert_eq!(world.r#move(Movement::Right), -1.0);
    assert!(world.is_state_terminal());
    assert_eq!(world.get_current_state(), Pos::new(1, 1));
}

#[test]
fn moves_after_terminal_are_permitted() {
    let mut world = scenario();
    world.r#move(Movement::Down);
    world.r#move(Movement::Right);
    assert!(world.is_state_terminal());
    assert_eq!(world.r#move(Movement::Right), -0.1);
    assert_eq!(world.get_current_state(), Pos::new(1, 2));
    assert!(!world.is_state_terminal());
}

#[test]
fn reset_returns_to_start() {
    let mut world = scenario();
    world.r#move(Movement::Down);
    world.r#move(Movement::Right);
    world.reset();
    assert_eq!(world.get_current_state(), Pos::new(0, 0));
    assert!(!world.is_state_terminal());
}

#[test]
fn current_state_is_idempotent() {
    let mut world = walled();
    world.r#move(Movement::Left);
    assert_eq!(world.get_current_state(), world.get_current_state());
}

#[test]
fn labels_drive_moves() {
    let mut world = scenario();
    assert_eq!(world.move_label('D').unwrap(), -0.1);
    assert_eq!(world.move_label('r').unwrap(), -1.0);
    assert!(matches!(world.move_label('x'), Err(GridError::InvalidAction(_))));
    assert_eq!(world.get_current_state(), Pos::new(1, 1));
}

// ── Construction ────────────────────────────────────────────

#[test]
fn infeasible_grid_fails_fast() {
    let config = GridConfig::new(2, 2).with_obstacles(2);
    assert!(matches!(
        GridWorld::with_seed(&config, 0),
        Err(GridError::LayoutInfeasible { cells: 4, required: 5 })
    ));
    let config = GridConfig::new(1, 2).with_obstacles(0);
    assert!(matches!(
        GridWorld::with_seed(&config, 0),
        Err(GridError::LayoutInfeasible { cells: 2, required: 3 })
    ));
}

#[test]
fn empty_grid_fails() {
    let config = GridConfig::new(0, 4);
    assert!(matches!(GridWorld::with_seed(&config, 0), Err(GridError::EmptyGrid)));
}

#[test]
fn exact_fit_grid_uses_every_cell() {
    let config = GridConfig::new(3, 3).with_obstacles(6);
    let world = GridWorld::with_seed(&config, 11).unwrap();
    let mut cells: HashSet<Pos> = world.obstacles().iter().copied().collect();
    cells.insert(world.starting_position());
    cells.insert(world.target());
    cells.insert(world.avoid());
    assert_eq!(cells.len(), 9);
}

#[test]
fn same_seed_same_layout() {
    let config = GridConfig::new(6, 5).with_obstacles(4);
    let a = GridWorld::with_seed(&config, 1234).unwrap();
    let b = GridWorld::with_seed(&config, 1234).unwrap();
    assert_eq!(a.layout(), b.layout());
    assert_eq!(a.rewards(), b.rewards());
}

#[test]
fn terminal_states_are_target_and_avoid() {
    let world = walled();
    assert_eq!(world.terminal_states(), [Pos::new(0, 3), Pos::new(3, 0)]);
    assert!(world.is_terminal(Pos::new(0, 3)));
    assert!(!world.is_terminal(Pos::new(2, 2)));
}

// ── Properties ──────────────────────────────────────────────

fn arb_config() -> impl Strategy<Value = GridConfig> {
    (1usize..8, 1usize..8, 0usize..10)
        .prop_filter("layout must fit", |(w, h, o)| w * h >= 3 + o)
        .prop_map(|(w, h, o)| GridConfig::new(w, h).with_obstacles(o))
}

proptest! {
    #[test]
    fn generated_layout_invariants(config in arb_config(), seed in any::<u64>()) {
        let world = GridWorld::with_seed(&config, seed).unwrap();
        let start = world.starting_position();
        let (target, avoid) = (world.target(), world.avoid());

        prop_assert_ne!(start, target);
        prop_assert_ne!(start, avoid);
        prop_assert_ne!(target, avoid);

        let distinct: HashSet<Pos> = world.obstacles().iter().copied().collect();
        prop_assert_eq!(distinct.len(), config.obstacle_count);
        for o in world.obstacles() {
            prop_assert!(world.contains(*o));
            prop_assert!(*o != start && *o != target && *o != avoid);
        }
        prop_assert_eq!(world.get_current_state(), start);
    }

    #[test]
    fn reward_table_counts(config in arb_config(), seed in any::<u64>()) {
        let world = GridWorld::with_seed(&config, seed).unwrap();
        let rewards = world.rewards();
        prop_assert_eq!(rewards.len(), config.width * config.height);
        prop_assert_eq!(rewards.iter().filter(|r| **r == 1.0).count(), 1);
        prop_assert_eq!(rewards.iter().filter(|r| **r == -1.0).count(), 1);
        prop_assert_eq!(rewards.iter().filter(|r| **r == 0.0).count(), config.obstacle_count);
        let open = config.width * config.height - 2 - config.obstacle_count;
        prop_assert_eq!(rewards.iter().filter(|r| **r == config.step_reward).count(), open);
    }

    #[test]
    fn custom_step_reward_fills_open_cells(
        config in arb_config(),
        step_reward in prop_oneof![-0.95f32..-0.01, 0.01f32..0.95],
        seed in any::<u64>(),
    ) {
        let config = config.with_step_reward(step_reward);
        let world = GridWorld::with_seed(&config, seed).unwrap();
        prop_assert_eq!(world.step_reward(), step_reward);
        let mut open = 0;
        for pos in world.iter_all_coordinates() {
            let reward = world.reward(pos);
            if world.is_obstacle(pos) {
                prop_assert_eq!(reward, 0.0);
            } else if pos == world.target() {
                prop_assert_eq!(reward, 1.0);
            } else if pos == world.avoid() {
                prop_assert_eq!(reward, -1.0);
            } else {
                prop_assert_eq!(reward, step_reward);
                open += 1;
            }
        }
        prop_assert_eq!(open, config.width * config.height - 2 - config.obstacle_count);
    }

    #[test]
    fn random_walk_stays_legal(config in arb_config(), seed in any::<u64>(), steps in 0usize..200) {
        let mut world = GridWorld::with_seed(&config, seed).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
        for _ in 0..steps {
            let before = world.get_current_state();
            let m: Movement = rng.gen();
            let reward = world.r#move(m);
            let after = world.get_current_state();
            prop_assert!(world.contains(after));
            prop_assert!(!world.is_obstacle(after));
            prop_assert_eq!(reward, world.reward(after));
            prop_assert_eq!(after, world.transition(before, m));
        }
        world.reset();
        prop_assert_eq!(world.get_current_state(), world.starting_position());
    }
}
