//! Headless demo runner
//!
//! Loads a level file (or a built-in demo level), burns both thrusters, and
//! logs the frame events until the session ends. Useful for smoke-testing
//! the simulation and level files without a renderer.

use std::time::Duration;

use glam::Vec2;

use rolleron::level::LevelRecord;
use rolleron::sim::{FrameEvent, GameSession, TickInput, Terminal, TileGrid, TileKind, tick};

/// Fixed demo timestep (matches a 60 Hz presentation loop)
const DT: f32 = 1.0 / 60.0;

/// Straight corridor with the win tile a few rows up from the spawn
fn demo_level() -> LevelRecord {
    let mut grid = TileGrid::empty();
    grid.set(24, 24, TileKind::Win);
    LevelRecord {
        name: "Demo Corridor".to_string(),
        spawn_pos: Vec2::new(24.5, 16.5),
        spawn_rot: std::f32::consts::FRAC_PI_2,
        record: f32::INFINITY,
        grid,
    }
}

fn main() {
    env_logger::init();

    let level = match std::env::args().nth(1) {
        Some(path) => match LevelRecord::load(&path) {
            Ok(level) => level,
            Err(e) => {
                eprintln!("failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => demo_level(),
    };

    log::info!("playing '{}'", level.name);
    let mut session = GameSession::new(&level, 0xC0FFEE);

    let input = TickInput {
        left_thruster: true,
        right_thruster: true,
    };

    // 30 simulated seconds is plenty for any sane level
    let max_frames = (30.0 / DT) as u32;
    for frame in 0..max_frames {
        let out = tick(&mut session, &input, DT);

        for event in &out.events {
            match event {
                FrameEvent::StateChanged { from, to } => {
                    log::info!("frame {frame}: {from:?} -> {to:?}");
                }
                FrameEvent::AudioCue { channel, playing, volume } => {
                    log::debug!("frame {frame}: {channel:?} playing={playing} vol={volume:.2}");
                }
                FrameEvent::PlayOneShot(cue) => log::info!("frame {frame}: one-shot {cue:?}"),
                _ => {}
            }
        }

        if let Some(terminal) = out.terminal {
            let verdict = match terminal {
                Terminal::LevelWon => format!("won in {:.1}s", session.elapsed),
                Terminal::LevelLost => "lost".to_string(),
            };
            println!(
                "{verdict} after {:?} simulated",
                Duration::from_secs_f32(frame as f32 * DT)
            );
            return;
        }
    }

    println!("session still running after 30s simulated; giving up");
}
