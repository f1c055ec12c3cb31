//! Timed power-up effects
//!
//! One generic queue-based engine drives every power-up type, parameterized
//! by the effect catalog. Each type holds an ordered list of absolute expiry
//! timestamps; stacking types chain new expiries onto the tail (up to a
//! maximum stack), refreshing types overwrite a single slot, instant types
//! never enter the queue at all.

use crate::consts::*;

/// Power-up identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// "EXPANDO" - wider paddle, score multiplier per stack
    WidePaddle,
    /// "SLOW-MO" - ball displacement damped per stack
    SlowMo,
    /// "MAG-LOCK" - ball sticks to the paddle until launched
    StickyPaddle,
    /// "LASER BLAST" - arms the fire action
    LaserBlast,
    /// "BRICKED UP!" - instantly spawns extra bonus bricks
    BonusBricks,
}

impl PowerUpKind {
    pub const COUNT: usize = 5;

    pub const ALL: [PowerUpKind; Self::COUNT] = [
        PowerUpKind::WidePaddle,
        PowerUpKind::SlowMo,
        PowerUpKind::StickyPaddle,
        PowerUpKind::LaserBlast,
        PowerUpKind::BonusBricks,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            PowerUpKind::WidePaddle => 0,
            PowerUpKind::SlowMo => 1,
            PowerUpKind::StickyPaddle => 2,
            PowerUpKind::LaserBlast => 3,
            PowerUpKind::BonusBricks => 4,
        }
    }

    /// Display name used in log lines
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::WidePaddle => "EXPANDO",
            PowerUpKind::SlowMo => "SLOW-MO",
            PowerUpKind::StickyPaddle => "MAG-LOCK",
            PowerUpKind::LaserBlast => "LASER BLAST",
            PowerUpKind::BonusBricks => "BRICKED UP!",
        }
    }
}

/// How repeated activations of a type combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Chain a new expiry onto the tail, up to [`MAX_EFFECT_STACK`]
    Stacking,
    /// Single slot, always overwritten with a fresh full duration
    Refreshing,
    /// One-shot action, no timer
    Instant,
}

/// Catalog entry for one power-up type
#[derive(Debug, Clone, Copy)]
pub struct EffectDef {
    pub kind: PowerUpKind,
    pub discipline: Discipline,
    /// Nominal duration in milliseconds (zero for instant effects)
    pub duration_ms: f64,
}

const CATALOG: [EffectDef; PowerUpKind::COUNT] = [
    EffectDef {
        kind: PowerUpKind::WidePaddle,
        discipline: Discipline::Stacking,
        duration_ms: WIDE_PADDLE_DURATION_MS,
    },
    EffectDef {
        kind: PowerUpKind::SlowMo,
        discipline: Discipline::Stacking,
        duration_ms: SLOW_MO_DURATION_MS,
    },
    EffectDef {
        kind: PowerUpKind::StickyPaddle,
        discipline: Discipline::Refreshing,
        duration_ms: STICKY_DURATION_MS,
    },
    EffectDef {
        kind: PowerUpKind::LaserBlast,
        discipline: Discipline::Refreshing,
        duration_ms: LASER_DURATION_MS,
    },
    EffectDef {
        kind: PowerUpKind::BonusBricks,
        discipline: Discipline::Instant,
        duration_ms: 0.0,
    },
];

/// Look up the catalog entry for a power-up type
pub fn effect_def(kind: PowerUpKind) -> &'static EffectDef {
    &CATALOG[kind.index()]
}

/// Weighted drop table: wide-paddle and slow-mo appear more often
pub const DROP_TABLE: [PowerUpKind; 8] = [
    PowerUpKind::WidePaddle,
    PowerUpKind::WidePaddle,
    PowerUpKind::WidePaddle,
    PowerUpKind::SlowMo,
    PowerUpKind::SlowMo,
    PowerUpKind::StickyPaddle,
    PowerUpKind::LaserBlast,
    PowerUpKind::BonusBricks,
];

/// Outcome of an activation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Timer accepted; `level` is the stack level after activation
    Applied { level: u8 },
    /// Instant effect: the caller performs the one-shot action
    Instant,
    /// Stacking type already at max stack; the pickup bounces away
    Refused,
}

/// A timer expiry popped during [`EffectEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub kind: PowerUpKind,
    /// Stack level remaining after the pop (0 = fully deactivated)
    pub level: u8,
}

/// Tracks active timed effects for every power-up type.
///
/// Invariant: each type's expiry list is sorted ascending, never longer
/// than the type's maximum stack, and only ever shrinks from the front.
#[derive(Debug, Clone, Default)]
pub struct EffectEngine {
    timers: [Vec<f64>; PowerUpKind::COUNT],
}

impl EffectEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to activate a power-up at wall-clock time `now_ms`
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: f64) -> Activation {
        let def = effect_def(kind);
        let slot = &mut self.timers[kind.index()];
        match def.discipline {
            Discipline::Instant => Activation::Instant,
            Discipline::Refreshing => {
                slot.clear();
                slot.push(now_ms + def.duration_ms);
                Activation::Applied { level: 1 }
            }
            Discipline::Stacking => {
                if slot.len() >= MAX_EFFECT_STACK as usize {
                    return Activation::Refused;
                }
                // Chain onto the tail so total duration accumulates
                let tail = slot.last().copied().unwrap_or(now_ms);
                slot.push(tail.max(now_ms) + def.duration_ms);
                Activation::Applied {
                    level: slot.len() as u8,
                }
            }
        }
    }

    /// Pop every expired timer, front first. Returns one [`Expiry`] per pop
    /// so the caller can react to level drops and full deactivations.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Expiry> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = &mut self.timers[kind.index()];
            while slot.first().is_some_and(|&end| now_ms >= end) {
                slot.remove(0);
                expired.push(Expiry {
                    kind,
                    level: slot.len() as u8,
                });
            }
        }
        expired
    }

    /// Current stack level of a type (0 = inactive)
    pub fn level(&self, kind: PowerUpKind) -> u8 {
        self.timers[kind.index()].len() as u8
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.level(kind) > 0
    }

    /// Expiry timestamp of the front timer, for status displays
    pub fn front_expiry(&self, kind: PowerUpKind) -> Option<f64> {
        self.timers[kind.index()].first().copied()
    }

    /// Paddle width multiplier: 1 + 0.35 per widen stack
    pub fn width_multiplier(&self) -> f32 {
        1.0 + self.level(PowerUpKind::WidePaddle) as f32 * PADDLE_WIDTH_STEP
    }

    /// Ball displacement factor: 0.75^level while slow-mo is stacked
    pub fn speed_factor(&self) -> f32 {
        SLOW_MO_FACTOR.powi(self.level(PowerUpKind::SlowMo) as i32)
    }

    /// Global audio pitch hint (quartered while slow-mo is active)
    pub fn pitch_factor(&self) -> f32 {
        if self.is_active(PowerUpKind::SlowMo) {
            SLOW_MO_PITCH
        } else {
            1.0
        }
    }

    /// Drop every active effect (life lost / round reset)
    pub fn clear(&mut self) {
        for slot in &mut self.timers {
            slot.clear();
        }
    }
}
