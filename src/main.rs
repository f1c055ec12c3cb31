//! Brick Runner headless demo
//!
//! Runs one autopiloted round at a fixed 120 Hz timestep, logging the
//! event stream, then records the score against the persisted best. Useful
//! as an end-to-end smoke test of the simulation without any frontend.

use brick_runner::HighScores;
use brick_runner::consts::*;
use brick_runner::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xB121C);

    let mut scores = HighScores::load("brick_runner_highscore.json");
    let mut state = GameState::new(seed);
    // No assets to actually load in the headless driver
    state.set_assets_ready(true);

    let mut now_ms = 0.0;
    state.start_round(now_ms);

    // Ten minutes of simulated play, tops
    let max_ticks = (10 * 60 * 120) as u64;
    let mut input = TickInput::default();

    for _ in 0..max_ticks {
        input.pointer_x = Some(autopilot_target(&state));
        input.fire = true; // arming and cooldown gate the actual shots
        input.launch = state.ball.stuck; // serve immediately, release catches

        tick(&mut state, &input, SIM_DT, now_ms);
        for event in &state.events {
            match event {
                GameEvent::Banner(banner) => log::info!("banner: {banner:?}"),
                GameEvent::Cue { cue, pitch, volume } => {
                    log::debug!("cue: {cue:?} (pitch {pitch:.2}, volume {volume:.2})")
                }
            }
        }

        now_ms += f64::from(SIM_DT) * 1000.0;
        if matches!(state.phase, GamePhase::Ended { .. }) {
            break;
        }
    }

    let outcome = match state.phase {
        GamePhase::Ended { won: true } => "mission complete",
        GamePhase::Ended { won: false } => "system failure",
        _ => "timed out",
    };
    println!("{outcome}: final score {}", state.score);

    if scores.record(state.score) {
        println!("new high score!");
    } else {
        println!("best remains {}", scores.best());
    }
}

/// Track the most urgent falling object: the free ball, else the nearest
/// pickup worth grabbing
fn autopilot_target(state: &GameState) -> f32 {
    if !state.ball.stuck {
        // Lead slightly toward where the ball is heading
        return state.ball.pos.x + state.ball.vel.x * 0.1;
    }
    state
        .power_ups
        .iter()
        .filter(|pu| !pu.bounced)
        .map(|pu| pu.pos.x)
        .next()
        .unwrap_or(ARENA_WIDTH / 2.0)
}
