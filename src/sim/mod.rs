//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Wall-clock timers as absolute timestamps passed in by the caller
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod effects;
pub mod field;
pub mod geometry;
pub mod state;
pub mod tick;

pub use effects::{Activation, Discipline, EffectDef, EffectEngine, Expiry, PowerUpKind, effect_def};
pub use geometry::{Rect, overlaps};
pub use state::{
    Ball, Banner, Brick, Cue, GameEvent, GamePhase, GameState, Laser, Paddle, PowerUp,
};
pub use tick::{TickInput, tick};
