//! Game state and core simulation types
//!
//! All mutable gameplay state lives in [`GameState`]; the presentation layer
//! reads entity positions back after each tick and drains the event buffer
//! for audio cues and notification banners.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::effects::{EffectEngine, PowerUpKind};
use super::field;
use super::geometry::Rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Pre-game / menu; simulation idle
    Idle,
    /// Round initialized, ball stuck on the paddle awaiting launch
    Serve,
    /// Active gameplay
    Playing,
    /// Physics frozen, resumable
    Paused,
    /// Round over; score compared against the persisted best
    Ended { won: bool },
}

/// Named audio cues emitted by the simulation. Playback is an external
/// concern: a missing sound simply means the cue is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Bounce,
    MultiHit,
    Destroy,
    PowerUpSpawn,
    LaserFire,
    Grow,
    GrowReversed,
    MagActivate,
    MagLaunch,
    WinSong,
    LoseSong,
}

/// Typed notification banners; rendering and timing out are external
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Power-up activated; `level` is the stack tier (0 for instants)
    PowerUp { kind: PowerUpKind, level: u8 },
    /// Stacking pickup rejected at max stack
    MaxPower,
    /// Row fully cleared; tier is the new score multiplier level
    RowClear { tier: u8 },
    /// Score crossed the legend threshold
    NeonLegend,
}

/// Boundary events produced during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Audio cue with playback hints
    Cue { cue: Cue, pitch: f32, volume: f32 },
    Banner(Banner),
}

/// The ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// While stuck, position derives from the paddle and velocity is zero
    pub stuck: bool,
}

impl Ball {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, BALL_SIZE, BALL_SIZE)
    }
}

/// The player's paddle. Only the center x moves; effective width comes
/// from the effect engine's widen level.
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub x: f32,
}

impl Paddle {
    /// Y coordinate of the paddle's top edge (fixed)
    pub fn top() -> f32 {
        ARENA_HEIGHT - PADDLE_BOTTOM_OFFSET - PADDLE_HEIGHT
    }

    pub fn rect(&self, width: f32) -> Rect {
        Rect::new(self.x - width / 2.0, Self::top(), width, PADDLE_HEIGHT)
    }

    /// Keep both edges inside the arena
    pub fn clamp(&mut self, width: f32) {
        let half = width / 2.0;
        self.x = self.x.clamp(half, ARENA_WIDTH - half);
    }
}

/// One grid brick
#[derive(Debug, Clone)]
pub struct Brick {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    /// 1 or 2
    pub hits_required: u8,
    pub hits_taken: u8,
    pub broken: bool,
    pub power_up: Option<PowerUpKind>,
    /// Extra-spawned brick: one-time point bonus, excluded from row-clear
    /// and win accounting
    pub bonus: bool,
}

impl Brick {
    /// Bonus bricks don't count toward clearing the field
    pub fn counts_for_clear(&self) -> bool {
        !self.bonus
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Center position
    pub pos: Vec2,
    /// Used only after the pickup bounces off a full stack
    pub vel: Vec2,
    /// False = straight fall with sway; true = lobbed projectile
    pub bounced: bool,
    pub(crate) origin_x: f32,
    pub(crate) sway_amplitude: f32,
    pub(crate) sway_frequency: f32,
    pub(crate) sway_phase: f32,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, POWER_UP_SIZE, POWER_UP_SIZE)
    }
}

/// A laser bolt traveling straight up
#[derive(Debug, Clone, Copy)]
pub struct Laser {
    pub pos: Vec2,
}

impl Laser {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, LASER_WIDTH, LASER_HEIGHT)
    }
}

/// Complete game state, advanced by [`super::tick::tick`]
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// External loader gate: the start command is a no-op until true
    pub assets_ready: bool,
    /// Roof bonus: armed on ceiling contact, consumed at the next brick
    /// break. Survives paddle bounces.
    pub roof_bonus_armed: bool,
    /// Wall-bounce bonus: armed on any wall/ceiling bounce, cleared by the
    /// next paddle or brick contact
    pub wall_bounce_armed: bool,
    /// One-way cosmetic flag, set once score crosses the legend threshold
    pub neon_legend: bool,
    /// Row-clear multiplier tier (0-3, monotone within a round)
    pub row_clear_level: u8,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    pub lasers: Vec<Laser>,
    pub effects: EffectEngine,
    /// Cleared at the start of every tick; drain after each tick (and after
    /// direct commands like `start_round`) before advancing again
    pub events: Vec<GameEvent>,
    pub(crate) auto_launch_at: Option<f64>,
    pub(crate) next_fire_at: f64,
    pub(crate) rng: Pcg32,
    seed: u64,
}

impl GameState {
    /// Create an idle game with a freshly built brick field
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bricks = field::build(&mut rng);
        let paddle = Paddle {
            x: ARENA_WIDTH / 2.0,
        };
        let mut state = Self {
            phase: GamePhase::Idle,
            score: 0,
            lives: STARTING_LIVES,
            assets_ready: false,
            roof_bonus_armed: false,
            wall_bounce_armed: false,
            neon_legend: false,
            row_clear_level: 0,
            paddle,
            ball: Ball {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                stuck: true,
            },
            bricks,
            power_ups: Vec::new(),
            lasers: Vec::new(),
            effects: EffectEngine::new(),
            events: Vec::new(),
            auto_launch_at: None,
            next_fire_at: 0.0,
            rng,
            seed,
        };
        state.seat_ball_on_paddle();
        state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Report the external asset loader's readiness gate
    pub fn set_assets_ready(&mut self, ready: bool) {
        self.assets_ready = ready;
    }

    /// Effective paddle width (base scaled by the widen level)
    pub fn paddle_width(&self) -> f32 {
        PADDLE_BASE_WIDTH * self.effects.width_multiplier()
    }

    pub fn paddle_rect(&self) -> Rect {
        self.paddle.rect(self.paddle_width())
    }

    /// Place the stuck ball centered on the paddle top
    pub(crate) fn seat_ball_on_paddle(&mut self) {
        self.ball.pos = Vec2::new(self.paddle.x, Paddle::top() - BALL_SIZE / 2.0);
        self.ball.vel = Vec2::ZERO;
    }

    /// Start a new round. No-op unless assets are ready and the game is
    /// idle or ended.
    pub fn start_round(&mut self, now_ms: f64) {
        if !self.assets_ready {
            log::debug!("start ignored: assets not ready");
            return;
        }
        if !matches!(self.phase, GamePhase::Idle | GamePhase::Ended { .. }) {
            return;
        }
        self.reset_round_state();
        self.phase = GamePhase::Serve;
        self.auto_launch_at = Some(now_ms + AUTO_LAUNCH_DELAY_MS);
        self.cue(Cue::WinSong);
        log::info!("round started (seed {})", self.seed);
    }

    /// Back to the idle/menu state with a fresh field
    pub fn reset(&mut self) {
        self.reset_round_state();
        self.phase = GamePhase::Idle;
    }

    fn reset_round_state(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.roof_bonus_armed = false;
        self.wall_bounce_armed = false;
        self.neon_legend = false;
        self.row_clear_level = 0;
        self.effects.clear();
        self.power_ups.clear();
        self.lasers.clear();
        self.auto_launch_at = None;
        self.next_fire_at = 0.0;
        self.paddle.x = ARENA_WIDTH / 2.0;
        self.bricks = field::build(&mut self.rng);
        self.ball.stuck = true;
        self.seat_ball_on_paddle();
    }

    /// Launch a stuck ball: straight up, with sideways speed from the
    /// ball's offset against the paddle center. Ignored if not stuck.
    pub(crate) fn launch_stuck_ball(&mut self) {
        if !self.ball.stuck {
            return;
        }
        self.auto_launch_at = None;
        self.ball.stuck = false;
        let half = self.paddle_width() / 2.0;
        let impact = ((self.ball.pos.x - self.paddle.x) / half).clamp(-1.0, 1.0);
        self.ball.vel = Vec2::new(
            impact * BALL_LAUNCH_SPEED * BALL_ANGLE_FACTOR,
            -BALL_LAUNCH_SPEED,
        );
        if self.phase == GamePhase::Serve {
            self.phase = GamePhase::Playing;
        }
        self.cue(Cue::MagLaunch);
    }

    /// Fire a laser bolt from the paddle center. Valid only while the
    /// laser effect is armed and the cooldown has elapsed.
    pub(crate) fn fire_laser(&mut self, now_ms: f64) {
        if !self.effects.is_active(PowerUpKind::LaserBlast) || now_ms < self.next_fire_at {
            return;
        }
        self.next_fire_at = now_ms + FIRE_COOLDOWN_MS;
        self.lasers.push(Laser {
            pos: Vec2::new(self.paddle.x, Paddle::top() - LASER_HEIGHT / 2.0),
        });
        self.cue(Cue::LaserFire);
    }

    pub(crate) fn cue(&mut self, cue: Cue) {
        self.cue_with(cue, 1.0, 1.0);
    }

    /// Emit a cue; the slow-mo pitch factor applies to every cue globally
    pub(crate) fn cue_with(&mut self, cue: Cue, pitch: f32, volume: f32) {
        self.events.push(GameEvent::Cue {
            cue,
            pitch: pitch * self.effects.pitch_factor(),
            volume,
        });
    }

    pub(crate) fn banner(&mut self, banner: Banner) {
        self.events.push(GameEvent::Banner(banner));
    }
}
