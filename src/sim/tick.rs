//! Per-frame simulation tick
//!
//! The host calls [`tick`] once per display frame with the elapsed time and
//! the current wall clock. Everything — input, effect expiry, physics,
//! collisions, lifecycle transitions — runs synchronously inside that call,
//! so no entity state is ever mutated concurrently.

use glam::Vec2;

use super::collision;
use super::effects::PowerUpKind;
use super::state::{Cue, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub left: bool,
    pub right: bool,
    /// Absolute pointer position (takes precedence over keys)
    pub pointer_x: Option<f32>,
    /// Launch a stuck ball
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Fire the laser (subject to arming and cooldown)
    pub fire: bool,
}

/// Advance the game by one frame.
///
/// `dt` is the elapsed simulation time in seconds; `now_ms` is the wall
/// clock used for effect expiry, auto-launch, and the fire cooldown. A
/// `dt` of zero moves nothing but still processes wall-clock expiries.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, now_ms: f64) {
    state.events.clear();

    // Pause toggle. Ignored while the ball is stuck (serve or sticky
    // catch) so a stale resume can't fire into a catch-wait.
    if input.pause {
        match state.phase {
            GamePhase::Playing if !state.ball.stuck => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Idle | GamePhase::Paused | GamePhase::Ended { .. } => return,
        GamePhase::Serve | GamePhase::Playing => {}
    }

    // Discrete commands
    if input.launch {
        state.launch_stuck_ball();
    }
    if input.fire {
        state.fire_laser(now_ms);
    }
    if state.auto_launch_at.is_some_and(|at| now_ms >= at) {
        state.launch_stuck_ball();
    }

    // Timed-effect expiries (wall clock, independent of dt)
    let expiries = state.effects.tick(now_ms);
    for expiry in expiries {
        state.cue_with(Cue::GrowReversed, 1.2, 0.5);
        if expiry.level == 0 && expiry.kind == PowerUpKind::StickyPaddle {
            // A ball waiting on a now-expired catch launches itself
            if state.ball.stuck && state.phase == GamePhase::Playing {
                state.launch_stuck_ball();
            }
        }
    }

    // Physics step
    step_paddle(state, input, dt);
    step_ball(state, dt);
    step_power_ups(state, dt);
    step_lasers(state, dt);

    // Collision resolution
    collision::resolve_ball(state);
    collision::resolve_lasers(state);
    collision::resolve_power_ups(state, now_ms);

    // A stuck ball rides the paddle
    if state.ball.stuck {
        state.seat_ball_on_paddle();
    }

    // End-of-round checks
    if state
        .bricks
        .iter()
        .filter(|b| b.counts_for_clear())
        .all(|b| b.broken)
    {
        end_round(state, true);
    } else if !state.ball.stuck && state.ball.rect().top() > ARENA_HEIGHT {
        state.lives -= 1;
        if state.lives > 0 {
            reserve_after_life_lost(state);
        } else {
            end_round(state, false);
        }
    }
}

/// Paddle follows the pointer when present, else the held keys
fn step_paddle(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(x) = input.pointer_x {
        state.paddle.x = x;
    } else if input.left {
        state.paddle.x -= PADDLE_SPEED * dt;
    } else if input.right {
        state.paddle.x += PADDLE_SPEED * dt;
    }
    let width = state.paddle_width();
    state.paddle.clamp(width);
}

fn step_ball(state: &mut GameState, dt: f32) {
    if state.ball.stuck {
        return;
    }
    let factor = state.effects.speed_factor();
    let vel = state.ball.vel;
    state.ball.pos += vel * factor * dt;
}

/// Pre-bounce pickups fall with a sine sway; rejected ones fly ballistic
fn step_power_ups(state: &mut GameState, dt: f32) {
    for pu in &mut state.power_ups {
        if pu.bounced {
            pu.vel.y += POWER_UP_GRAVITY * dt;
            let vel = pu.vel;
            pu.pos += vel * dt;
        } else {
            pu.pos.y += POWER_UP_FALL_SPEED * dt;
            pu.pos.x =
                pu.origin_x + pu.sway_amplitude * (pu.pos.y * pu.sway_frequency + pu.sway_phase).sin();
        }
    }
}

fn step_lasers(state: &mut GameState, dt: f32) {
    for laser in &mut state.lasers {
        laser.pos.y -= LASER_SPEED * dt;
    }
    state.lasers.retain(|l| l.rect().bottom() > 0.0);
}

/// Lives remain: re-serve with the ball stuck and every effect cleared.
/// Score is untouched.
fn reserve_after_life_lost(state: &mut GameState) {
    state.ball.stuck = true;
    state.seat_ball_on_paddle();
    state.roof_bonus_armed = false;
    state.wall_bounce_armed = false;
    state.effects.clear();
    state.phase = GamePhase::Serve;
    log::info!("life lost, {} remaining", state.lives);
}

fn end_round(state: &mut GameState, won: bool) {
    state.phase = GamePhase::Ended { won };
    state.ball.vel = Vec2::ZERO;
    // Clear outstanding deadlines so nothing fires into the ended state
    state.auto_launch_at = None;
    state.next_fire_at = 0.0;
    state.cue(if won { Cue::WinSong } else { Cue::LoseSong });
    log::info!(
        "round over: {} (score {})",
        if won { "won" } else { "lost" },
        state.score
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameEvent;

    fn serve_state() -> GameState {
        let mut state = GameState::new(99);
        state.set_assets_ready(true);
        state.start_round(0.0);
        state
    }

    fn launched_state() -> GameState {
        let mut state = serve_state();
        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, 0.0);
        state
    }

    #[test]
    fn test_serve_to_playing_on_launch() {
        let mut state = serve_state();
        assert_eq!(state.phase, GamePhase::Serve);

        tick(&mut state, &TickInput::default(), SIM_DT, 0.0);
        assert_eq!(state.phase, GamePhase::Serve, "no launch yet");

        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.ball.stuck);
    }

    #[test]
    fn test_auto_launch_fires_after_delay() {
        let mut state = serve_state();
        tick(&mut state, &TickInput::default(), SIM_DT, AUTO_LAUNCH_DELAY_MS - 1.0);
        assert_eq!(state.phase, GamePhase::Serve);

        tick(&mut state, &TickInput::default(), SIM_DT, AUTO_LAUNCH_DELAY_MS);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_toggle_roundtrip() {
        let mut state = launched_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT, 10.0);
        assert_eq!(state.phase, GamePhase::Paused);

        let pos = state.ball.pos;
        tick(&mut state, &TickInput::default(), SIM_DT, 20.0);
        assert_eq!(state.ball.pos, pos, "paused physics is frozen");

        tick(&mut state, &pause, SIM_DT, 30.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_ignored_while_stuck() {
        let mut state = serve_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT, 0.0);
        assert_eq!(state.phase, GamePhase::Serve, "no pause during serve");
    }

    #[test]
    fn test_zero_dt_moves_nothing_but_expires_timers() {
        let mut state = launched_state();
        state.effects.activate(PowerUpKind::SlowMo, 0.0);
        let ball_pos = state.ball.pos;
        let paddle_x = state.paddle.x;

        tick(&mut state, &TickInput::default(), 0.0, SLOW_MO_DURATION_MS + 1.0);

        assert_eq!(state.ball.pos, ball_pos);
        assert_eq!(state.paddle.x, paddle_x);
        assert!(!state.effects.is_active(PowerUpKind::SlowMo), "wall clock still ran");
    }

    #[test]
    fn test_slow_mo_damps_displacement() {
        let mut state = launched_state();
        let start = state.ball.pos;
        tick(&mut state, &TickInput::default(), SIM_DT, 10.0);
        let plain = (state.ball.pos - start).length();

        let mut slowed = launched_state();
        slowed.effects.activate(PowerUpKind::SlowMo, 0.0);
        let start = slowed.ball.pos;
        tick(&mut slowed, &TickInput::default(), SIM_DT, 10.0);
        let damped = (slowed.ball.pos - start).length();

        assert!((damped - plain * SLOW_MO_FACTOR).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_keys_and_clamp() {
        let mut state = launched_state();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        // Hold right well past the wall
        for i in 0..400 {
            tick(&mut state, &input, SIM_DT, 20.0 + i as f64);
        }
        let rect = state.paddle_rect();
        assert!(rect.right() <= ARENA_WIDTH);
        assert!((rect.right() - ARENA_WIDTH).abs() < 1e-3, "pinned to the wall");
    }

    #[test]
    fn test_life_lost_reserves_and_keeps_score() {
        let mut state = launched_state();
        state.score = 240;
        state.effects.activate(PowerUpKind::WidePaddle, 10.0);
        state.effects.activate(PowerUpKind::LaserBlast, 10.0);
        state.lives = 2;

        // Drop the ball below the floor
        state.ball.pos.y = ARENA_HEIGHT + BALL_SIZE;
        tick(&mut state, &TickInput::default(), SIM_DT, 20.0);

        assert_eq!(state.lives, 1);
        assert_eq!(state.phase, GamePhase::Serve);
        assert!(state.ball.stuck, "ball re-stuck to the paddle");
        assert_eq!(state.score, 240, "score survives a lost life");
        assert!(!state.effects.is_active(PowerUpKind::WidePaddle));
        assert!(!state.effects.is_active(PowerUpKind::LaserBlast));
        assert_eq!(state.paddle_width(), PADDLE_BASE_WIDTH, "paddle size reset");
    }

    #[test]
    fn test_last_life_ends_round() {
        let mut state = launched_state();
        state.lives = 1;
        state.ball.pos.y = ARENA_HEIGHT + BALL_SIZE;

        tick(&mut state, &TickInput::default(), SIM_DT, 20.0);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Ended { won: false });
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Cue {
                cue: Cue::LoseSong,
                ..
            }
        )));
    }

    #[test]
    fn test_stuck_ball_does_not_lose_life() {
        let mut state = serve_state();
        state.ball.pos.y = ARENA_HEIGHT + BALL_SIZE;
        let lives = state.lives;

        tick(&mut state, &TickInput::default(), SIM_DT, 0.0);
        assert_eq!(state.lives, lives);
        // The seated ball snapped back onto the paddle
        assert!(state.ball.rect().bottom() < ARENA_HEIGHT);
    }

    #[test]
    fn test_win_when_non_bonus_bricks_broken() {
        let mut state = launched_state();
        // Keep the ball safely mid-air
        state.ball.pos = Vec2::new(450.0, 400.0);
        state.ball.vel = Vec2::ZERO;
        for brick in state.bricks.iter_mut() {
            brick.hits_taken = brick.hits_required;
            brick.broken = true;
        }
        // An unbroken bonus brick must not block the win
        state.bricks.push(crate::sim::Brick {
            row: 0,
            col: 0,
            rect: crate::sim::field::cell_rect(0, 0),
            hits_required: 1,
            hits_taken: 0,
            broken: false,
            power_up: None,
            bonus: true,
        });

        tick(&mut state, &TickInput::default(), SIM_DT, 20.0);
        assert_eq!(state.phase, GamePhase::Ended { won: true });
        assert_eq!(state.auto_launch_at, None, "deadlines cleared at round end");
    }

    #[test]
    fn test_sticky_expiry_launches_waiting_ball() {
        let mut state = launched_state();
        state.effects.activate(PowerUpKind::StickyPaddle, 0.0);
        // Catch the ball on the paddle
        let paddle_rect = state.paddle_rect();
        state.ball.pos = Vec2::new(state.paddle.x, paddle_rect.top() - 10.0);
        state.ball.vel = Vec2::new(0.0, 200.0);
        tick(&mut state, &TickInput::default(), SIM_DT, 10.0);
        assert!(state.ball.stuck, "sticky catch holds the ball");

        // Let the catch effect expire
        tick(&mut state, &TickInput::default(), SIM_DT, STICKY_DURATION_MS + 1.0);
        assert!(!state.ball.stuck, "expired catch releases the ball");
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_legend_flag_permanent_for_round() {
        let mut state = launched_state();
        state.score = NEON_LEGEND_THRESHOLD + 1;
        state.neon_legend = true;
        // Nothing in later ticks may clear it (score never decreases)
        for i in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT, 30.0 + i as f64);
            assert!(state.neon_legend);
        }
    }

    #[test]
    fn test_determinism_per_seed() {
        let run = || {
            let mut state = GameState::new(1234);
            state.set_assets_ready(true);
            state.start_round(0.0);
            let mut now = 0.0;
            for i in 0..2_000_u32 {
                let input = TickInput {
                    launch: i == 10,
                    pointer_x: Some(450.0 + (i as f32 * 0.05).sin() * 300.0),
                    ..Default::default()
                };
                tick(&mut state, &input, SIM_DT, now);
                now += SIM_DT as f64 * 1000.0;
            }
            state
        };
        let a = run();
        let b = run();
        assert_eq!(a.score, b.score);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.lives, b.lives);
        assert_eq!(
            a.bricks.iter().filter(|x| x.broken).count(),
            b.bricks.iter().filter(|x| x.broken).count()
        );
    }
}
