//! Per-tick collision resolution and scoring
//!
//! Runs after the physics step, in a fixed order: ball vs walls/ceiling,
//! ball vs paddle, ball vs bricks (at most one brick per tick), lasers vs
//! bricks, pickups vs paddle. All score deltas and effect activations
//! happen here.

use glam::Vec2;
use rand::Rng;

use super::effects::{Activation, PowerUpKind};
use super::field;
use super::geometry::overlaps;
use super::state::{Banner, Cue, GameState, PowerUp};
use crate::consts::*;

/// Resolve the ball against walls, ceiling, paddle, and bricks
pub(crate) fn resolve_ball(state: &mut GameState) {
    if state.ball.stuck {
        return;
    }

    resolve_walls(state);
    resolve_paddle(state);
    resolve_bricks(state);
}

fn resolve_walls(state: &mut GameState) {
    let half = BALL_SIZE / 2.0;
    let ball = &mut state.ball;

    // Side walls: reflect only while still moving toward the boundary
    if (ball.pos.x - half <= 0.0 && ball.vel.x < 0.0)
        || (ball.pos.x + half >= ARENA_WIDTH && ball.vel.x > 0.0)
    {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = ball.pos.x.clamp(half, ARENA_WIDTH - half);
        state.wall_bounce_armed = true;
        state.cue(Cue::Bounce);
    }

    // Ceiling
    if state.ball.pos.y - half <= 0.0 && state.ball.vel.y < 0.0 {
        state.ball.pos.y = half;
        state.ball.vel.y = -state.ball.vel.y;
        state.wall_bounce_armed = true;
        state.cue_with(Cue::Bounce, 0.8, 1.0);
        // Arm the roof bonus once per airborne excursion
        if !state.roof_bonus_armed {
            state.roof_bonus_armed = true;
            state.cue_with(Cue::PowerUpSpawn, 2.5, 0.5);
        }
    }
}

fn resolve_paddle(state: &mut GameState) {
    let paddle_rect = state.paddle_rect();
    if !(overlaps(&state.ball.rect(), &paddle_rect) && state.ball.vel.y > 0.0) {
        return;
    }

    state.cue(Cue::Bounce);
    // The armed roof bonus deliberately survives paddle contact; only the
    // bank-shot bonus is spent here.
    state.wall_bounce_armed = false;

    if state.effects.is_active(PowerUpKind::StickyPaddle) {
        state.ball.stuck = true;
        state.ball.vel = Vec2::ZERO;
        return;
    }

    // Seat the ball on the paddle top and reflect
    state.ball.pos.y = paddle_rect.top() - BALL_SIZE / 2.0;
    state.ball.vel.y = -state.ball.vel.y;

    // Angle control: sideways speed proportional to the impact offset
    let half = paddle_rect.w / 2.0;
    let impact = ((state.ball.pos.x - state.paddle.x) / half).clamp(-1.0, 1.0);
    state.ball.vel.x = impact * BALL_LAUNCH_SPEED * BALL_ANGLE_FACTOR;
}

fn resolve_bricks(state: &mut GameState) {
    let ball_rect = state.ball.rect();
    let Some(i) = state
        .bricks
        .iter()
        .position(|b| !b.broken && overlaps(&ball_rect, &b.rect))
    else {
        return;
    };

    let finishing = state.bricks[i].hits_taken + 1 >= state.bricks[i].hits_required;
    state.bricks[i].hits_taken += 1;

    if finishing {
        let points = brick_points(state, i);
        state.bricks[i].broken = true;
        state.score += points;
        state.roof_bonus_armed = false;
        state.cue(Cue::Destroy);

        let (row, bonus, power_up) = {
            let b = &state.bricks[i];
            (b.row, b.bonus, b.power_up)
        };
        if !bonus {
            field::evaluate_row_clear(state, row);
        }
        if let Some(kind) = power_up {
            let at = state.bricks[i].rect.center();
            spawn_pickup(state, kind, at);
        }
        check_legend(state);
    } else {
        state.cue(Cue::MultiHit);
    }

    // Bounce and accelerate on every brick contact, broken or not
    state.ball.vel.y = -state.ball.vel.y;
    state.ball.vel *= BRICK_SPEEDUP;
    state.wall_bounce_armed = false;
}

/// Points for finishing the brick at `i`, with every bonus and multiplier
/// applied in order: base + flat bonuses, widen multiplier, row multiplier,
/// then the two-hit finish factor.
fn brick_points(state: &GameState, i: usize) -> u64 {
    let brick = &state.bricks[i];
    let mut points = if state.roof_bonus_armed {
        POINTS_ROOF
    } else {
        POINTS_BASE
    };
    if state.wall_bounce_armed {
        points += POINTS_WALL_BONUS;
    }
    if brick.bonus {
        points += POINTS_BONUS_BRICK;
    }
    points *= 1 + state.effects.level(PowerUpKind::WidePaddle) as u64;
    points *= 1 + state.row_clear_level as u64;
    if brick.hits_required == 2 {
        points = (points as f32 * MULTI_HIT_FINISH_FACTOR).round() as u64;
    }
    points
}

/// Lasers one-shot bricks for a flat score, no multipliers
pub(crate) fn resolve_lasers(state: &mut GameState) {
    let mut li = 0;
    'bolts: while li < state.lasers.len() {
        let laser_rect = state.lasers[li].rect();
        for bi in 0..state.bricks.len() {
            if state.bricks[bi].broken || !overlaps(&laser_rect, &state.bricks[bi].rect) {
                continue;
            }
            let brick = &mut state.bricks[bi];
            brick.hits_taken = brick.hits_required;
            brick.broken = true;
            state.score += POINTS_BASE + POINTS_LASER_BONUS;
            state.cue(Cue::Destroy);

            let (row, bonus, power_up) = {
                let b = &state.bricks[bi];
                (b.row, b.bonus, b.power_up)
            };
            if !bonus {
                field::evaluate_row_clear(state, row);
            }
            if let Some(kind) = power_up {
                let at = state.bricks[bi].rect.center();
                spawn_pickup(state, kind, at);
            }
            check_legend(state);

            state.lasers.remove(li);
            continue 'bolts;
        }
        li += 1;
    }
}

/// Pickups vs the paddle. Bounced (rejected) pickups are no longer
/// collectable and simply fall out of the arena.
pub(crate) fn resolve_power_ups(state: &mut GameState, now_ms: f64) {
    let paddle_rect = state.paddle_rect();
    let mut i = 0;
    while i < state.power_ups.len() {
        let caught =
            !state.power_ups[i].bounced && overlaps(&state.power_ups[i].rect(), &paddle_rect);
        if caught {
            let kind = state.power_ups[i].kind;
            match state.effects.activate(kind, now_ms) {
                Activation::Refused => {
                    // Deflect the pickup away so the player sees it rejected
                    let pu = &mut state.power_ups[i];
                    pu.bounced = true;
                    pu.vel = Vec2::new(
                        state.rng.random_range(-POWER_UP_REJECT_SIDE..POWER_UP_REJECT_SIDE),
                        -POWER_UP_REJECT_KICK,
                    );
                    state.banner(Banner::MaxPower);
                    i += 1;
                }
                Activation::Applied { level } => {
                    state.power_ups.remove(i);
                    apply_pickup(state, kind, level);
                }
                Activation::Instant => {
                    state.power_ups.remove(i);
                    let spawned = field::spawn_bonus_bricks(
                        &mut state.bricks,
                        &mut state.rng,
                        BONUS_BRICK_COUNT,
                    );
                    log::debug!("bonus bricks: {spawned} spawned");
                    state.banner(Banner::PowerUp { kind, level: 0 });
                }
            }
            continue;
        }
        // Off the bottom edge
        if state.power_ups[i].pos.y - POWER_UP_SIZE / 2.0 > ARENA_HEIGHT {
            state.power_ups.remove(i);
            continue;
        }
        i += 1;
    }
}

/// Side effects of a consumed timed pickup
fn apply_pickup(state: &mut GameState, kind: PowerUpKind, level: u8) {
    match kind {
        PowerUpKind::WidePaddle => {
            state.cue(Cue::Grow);
            // Widening near a wall must not push the edges outside
            let width = state.paddle_width();
            state.paddle.clamp(width);
        }
        PowerUpKind::SlowMo => state.cue_with(Cue::Bounce, 0.8, 0.7),
        PowerUpKind::StickyPaddle => state.cue(Cue::MagActivate),
        PowerUpKind::LaserBlast => state.cue_with(Cue::LaserFire, 1.2, 1.0),
        PowerUpKind::BonusBricks => {}
    }
    state.banner(Banner::PowerUp { kind, level });
    log::debug!("{} activated (level {level})", kind.label());
}

fn spawn_pickup(state: &mut GameState, kind: PowerUpKind, at: Vec2) {
    let sway_amplitude = state.rng.random_range(25.0..45.0);
    let sway_frequency = state.rng.random_range(0.02..0.04);
    let sway_phase = state.rng.random_range(0.0..std::f32::consts::TAU);
    state.power_ups.push(PowerUp {
        kind,
        pos: at,
        vel: Vec2::ZERO,
        bounced: false,
        origin_x: at.x,
        sway_amplitude,
        sway_frequency,
        sway_phase,
    });
    state.cue_with(Cue::PowerUpSpawn, 2.0, 1.0);
}

/// One-way legend flag once the score crosses the threshold
fn check_legend(state: &mut GameState) {
    if state.score > NEON_LEGEND_THRESHOLD && !state.neon_legend {
        state.neon_legend = true;
        state.banner(Banner::NeonLegend);
        state.cue(Cue::WinSong);
    }
}
