//! Brick Runner - a neon arcade brick-breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `highscores`: Best-score persistence
//!
//! Rendering, audio playback, and input devices live outside this crate:
//! the simulation exposes read-only entity state plus a per-tick stream of
//! [`sim::GameEvent`]s for those layers to consume.

pub mod highscores;
pub mod sim;

pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (pixels, origin top-left, Y down)
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_BASE_WIDTH: f32 = 150.0;
    pub const PADDLE_HEIGHT: f32 = 22.5;
    /// Gap between the paddle underside and the arena floor
    pub const PADDLE_BOTTOM_OFFSET: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 675.0;
    /// Extra width multiplier per widen stack (level 1 => x1.35)
    pub const PADDLE_WIDTH_STEP: f32 = 0.35;

    /// Ball defaults (the ball collides as a square AABB)
    pub const BALL_SIZE: f32 = 60.0;
    pub const BALL_LAUNCH_SPEED: f32 = 300.0;
    /// Paddle angle control: vx = impact offset * launch speed * this
    pub const BALL_ANGLE_FACTOR: f32 = 1.5;
    /// Speed-up applied to both velocity axes on every brick contact
    pub const BRICK_SPEEDUP: f32 = 1.005;

    /// Brick grid
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_GAP: f32 = 3.0;
    pub const BRICK_WIDTH: f32 = ARENA_WIDTH / BRICK_COLS as f32 - BRICK_GAP;
    pub const BRICK_HEIGHT: f32 = 30.0;
    pub const BRICK_TOP_OFFSET: f32 = 75.0;
    /// Chance a cell needs two hits instead of one
    pub const MULTI_HIT_CHANCE: f64 = 0.25;
    /// Chance a cell carries a power-up drop
    pub const POWER_UP_CHANCE: f64 = 0.35;

    /// Falling pickups
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_FALL_SPEED: f32 = 180.0;
    /// Gravity for rejected (bounced) pickups, pixels/s^2
    pub const POWER_UP_GRAVITY: f32 = 900.0;
    /// Upward kick when a pickup is rejected at max stack
    pub const POWER_UP_REJECT_KICK: f32 = 380.0;
    /// Max sideways speed of a rejected pickup
    pub const POWER_UP_REJECT_SIDE: f32 = 190.0;

    /// Laser bolts
    pub const LASER_SPEED: f32 = 750.0;
    pub const LASER_WIDTH: f32 = 9.0;
    pub const LASER_HEIGHT: f32 = 30.0;
    pub const FIRE_COOLDOWN_MS: f64 = 300.0;

    /// Timed effects
    pub const MAX_EFFECT_STACK: u8 = 3;
    /// Ball displacement factor per slow-mo level
    pub const SLOW_MO_FACTOR: f32 = 0.75;
    /// Global cue pitch hint while slow-mo is active
    pub const SLOW_MO_PITCH: f32 = 0.25;
    pub const WIDE_PADDLE_DURATION_MS: f64 = 15_000.0;
    pub const SLOW_MO_DURATION_MS: f64 = 5_000.0;
    pub const STICKY_DURATION_MS: f64 = 4_000.0;
    pub const LASER_DURATION_MS: f64 = 3_000.0;

    /// Scoring
    pub const POINTS_BASE: u64 = 10;
    pub const POINTS_ROOF: u64 = 15;
    pub const POINTS_WALL_BONUS: u64 = 2;
    pub const POINTS_BONUS_BRICK: u64 = 6;
    pub const POINTS_LASER_BONUS: u64 = 3;
    /// Finishing hit of a two-hit brick scales the total (rounded)
    pub const MULTI_HIT_FINISH_FACTOR: f32 = 1.6;
    pub const NEON_LEGEND_THRESHOLD: u64 = 500;
    pub const ROW_CLEAR_MAX_LEVEL: u8 = 3;
    pub const BONUS_BRICK_COUNT: usize = 5;

    /// Round lifecycle
    pub const STARTING_LIVES: u8 = 3;
    pub const AUTO_LAUNCH_DELAY_MS: f64 = 3_000.0;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
