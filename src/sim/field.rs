//! Brick field construction and row-clear progression
//!
//! The grid is laid out centered, 10 columns by 5 rows. Each cell rolls its
//! hit count and power-up drop independently from the seeded RNG, so a given
//! seed always produces the same field.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand_pcg::Pcg32;

use super::effects::DROP_TABLE;
use super::geometry::Rect;
use super::state::{Banner, Brick, GameState};
use crate::consts::*;

/// X coordinate of the first column (grid is centered in the arena)
pub fn grid_left() -> f32 {
    (ARENA_WIDTH - BRICK_COLS as f32 * (BRICK_WIDTH + BRICK_GAP) + BRICK_GAP) / 2.0
}

/// Pixel rect for a grid cell
pub fn cell_rect(row: usize, col: usize) -> Rect {
    Rect::new(
        grid_left() + col as f32 * (BRICK_WIDTH + BRICK_GAP),
        BRICK_TOP_OFFSET + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
        BRICK_WIDTH,
        BRICK_HEIGHT,
    )
}

/// Build the full starting grid
pub fn build(rng: &mut Pcg32) -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let hits_required = if rng.random_bool(MULTI_HIT_CHANCE) { 2 } else { 1 };
            let power_up = if rng.random_bool(POWER_UP_CHANCE) {
                DROP_TABLE.choose(rng).copied()
            } else {
                None
            };
            bricks.push(Brick {
                row,
                col,
                rect: cell_rect(row, col),
                hits_required,
                hits_taken: 0,
                broken: false,
                power_up,
                bonus: false,
            });
        }
    }
    bricks
}

/// Spawn up to `count` single-hit bonus bricks into empty grid cells,
/// favoring upper rows, never overlapping an unbroken brick. Returns the
/// number actually spawned.
pub fn spawn_bonus_bricks(bricks: &mut Vec<Brick>, rng: &mut Pcg32, count: usize) -> usize {
    let mut occupied = [[false; BRICK_COLS]; BRICK_ROWS];
    for brick in bricks.iter() {
        if !brick.broken {
            occupied[brick.row][brick.col] = true;
        }
    }

    let mut candidates: Vec<(usize, usize)> = (0..BRICK_ROWS)
        .flat_map(|row| (0..BRICK_COLS).map(move |col| (row, col)))
        .filter(|&(row, col)| !occupied[row][col])
        .collect();
    // Shuffle, then stable-sort by row: random within a row, upper rows first
    candidates.shuffle(rng);
    candidates.sort_by_key(|&(row, _)| row);

    let spawned = candidates.len().min(count);
    for &(row, col) in candidates.iter().take(spawned) {
        bricks.push(Brick {
            row,
            col,
            rect: cell_rect(row, col),
            hits_required: 1,
            hits_taken: 0,
            broken: false,
            power_up: None,
            bonus: true,
        });
    }
    spawned
}

/// Check whether breaking a brick in `row` completes that row. Raises the
/// row-clear level (monotone, capped) and emits the tier banner when it
/// does. Bonus bricks never participate.
pub fn evaluate_row_clear(state: &mut GameState, row: usize) {
    if (row as u8) < state.row_clear_level {
        return;
    }
    let row_done = state
        .bricks
        .iter()
        .filter(|b| b.counts_for_clear() && b.row == row)
        .all(|b| b.broken);
    if !row_done {
        return;
    }
    let tier = ((row as u8) + 1).min(ROW_CLEAR_MAX_LEVEL);
    if tier > state.row_clear_level {
        state.row_clear_level = tier;
        state.banner(Banner::RowClear { tier });
        log::info!("row {row} cleared, multiplier tier {tier}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_build_fills_grid() {
        let bricks = build(&mut rng());
        assert_eq!(bricks.len(), BRICK_ROWS * BRICK_COLS);
        for brick in &bricks {
            assert!(brick.hits_required == 1 || brick.hits_required == 2);
            assert_eq!(brick.hits_taken, 0);
            assert!(!brick.broken);
            assert!(!brick.bonus);
        }
    }

    #[test]
    fn test_build_is_deterministic_per_seed() {
        let a = build(&mut rng());
        let b = build(&mut rng());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.hits_required, y.hits_required);
            assert_eq!(x.power_up, y.power_up);
        }
    }

    #[test]
    fn test_grid_is_centered() {
        let first = cell_rect(0, 0);
        let last = cell_rect(0, BRICK_COLS - 1);
        let left_margin = first.left();
        let right_margin = ARENA_WIDTH - last.right();
        assert!((left_margin - right_margin).abs() < 0.01);
    }

    #[test]
    fn test_bonus_bricks_fill_empty_cells_only() {
        let mut bricks = build(&mut rng());
        // Break the whole top row to open cells there
        for brick in bricks.iter_mut().filter(|b| b.row == 0) {
            brick.hits_taken = brick.hits_required;
            brick.broken = true;
        }
        let spawned = spawn_bonus_bricks(&mut bricks, &mut rng(), BONUS_BRICK_COUNT);
        assert_eq!(spawned, BONUS_BRICK_COUNT);

        let bonus: Vec<_> = bricks.iter().filter(|b| b.bonus).collect();
        assert_eq!(bonus.len(), BONUS_BRICK_COUNT);
        for brick in &bonus {
            assert_eq!(brick.row, 0, "only row 0 had empty cells");
            assert_eq!(brick.hits_required, 1);
            assert!(brick.power_up.is_none());
        }
        // No two unbroken bricks share a cell
        let mut cells: Vec<_> = bricks
            .iter()
            .filter(|b| !b.broken)
            .map(|b| (b.row, b.col))
            .collect();
        cells.sort();
        cells.dedup();
        assert_eq!(
            cells.len(),
            bricks.iter().filter(|b| !b.broken).count(),
            "bonus bricks must not overlap unbroken bricks"
        );
    }

    #[test]
    fn test_spawn_caps_at_available_cells() {
        let mut bricks = build(&mut rng());
        let spawned = spawn_bonus_bricks(&mut bricks, &mut rng(), BONUS_BRICK_COUNT);
        assert_eq!(spawned, 0, "a full grid has no room");
    }

    #[test]
    fn test_row_clear_raises_level_once() {
        let mut state = GameState::new(42);
        for brick in state.bricks.iter_mut().filter(|b| b.row == 0) {
            brick.hits_taken = brick.hits_required;
            brick.broken = true;
        }

        evaluate_row_clear(&mut state, 0);
        assert_eq!(state.row_clear_level, 1);
        let banners = state
            .events
            .iter()
            .filter(|e| matches!(e, crate::sim::GameEvent::Banner(Banner::RowClear { tier: 1 })))
            .count();
        assert_eq!(banners, 1);

        // Evaluating the same row again emits nothing further
        evaluate_row_clear(&mut state, 0);
        assert_eq!(state.row_clear_level, 1);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_row_clear_level_is_capped() {
        let mut state = GameState::new(42);
        for brick in state.bricks.iter_mut() {
            brick.hits_taken = brick.hits_required;
            brick.broken = true;
        }
        for row in 0..BRICK_ROWS {
            evaluate_row_clear(&mut state, row);
        }
        assert_eq!(state.row_clear_level, ROW_CLEAR_MAX_LEVEL);
    }

    #[test]
    fn test_lower_row_cannot_lower_level() {
        let mut state = GameState::new(42);
        state.row_clear_level = 2;
        for brick in state.bricks.iter_mut().filter(|b| b.row == 0) {
            brick.hits_taken = brick.hits_required;
            brick.broken = true;
        }
        evaluate_row_clear(&mut state, 0);
        assert_eq!(state.row_clear_level, 2, "level is monotone");
    }
}
