//! One-frame simulation step
//!
//! Orchestrates a single frame: sample coverage, run state transitions,
//! accumulate forces, integrate, and emit side-effect events for the
//! presentation layer. The caller drives this once per rendered frame with
//! a clamped delta-time; the core itself never blocks or spawns work.

use glam::Vec2;
use rand::Rng;

use super::audio::{CHANNELS, desired_channels};
use super::collision::Coverage;
use super::forces::{accumulate, thrust_power, thruster_firing};
use super::grid::TileKind;
use super::state::{FrameEvent, GameSession, OneShot, ParticleKind, PlayerState, Terminal};
use crate::consts::{
    EXPLOSION_DURATION, EXPLOSION_PARTICLES, FIELD_FORCE, PARTICLE_INTERVAL, WIN_REST_THRESHOLD,
    WIN_ROT_DECAY, WIN_VEL_DECAY,
};
use crate::{heading, rotate_offset};

/// Music volume hint once the win cue plays (ducked under the fanfare)
const WIN_MUSIC_VOLUME: f32 = 0.125;

/// Exhaust particles leave from the rear thruster nozzles
const EXHAUST_NOZZLES: [Vec2; 2] = [Vec2::new(-0.125, 0.2), Vec2::new(-0.125, -0.2)];

/// Operator input for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left_thruster: bool,
    pub right_thruster: bool,
}

/// Everything one step hands back to the caller
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub state: PlayerState,
    pub events: Vec<FrameEvent>,
    /// End-of-session signal; at most one per call. Kept raised on
    /// subsequent frames until the caller tears the session down.
    pub terminal: Option<Terminal>,
}

/// Advance the session by one frame.
///
/// `dt` is expected in `(0, ~0.1]` seconds; clamping degenerate frame
/// times is the caller's job.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> FrameOutput {
    let mut events = Vec::new();
    let mut terminal = None;

    session.body.left_thruster = input.left_thruster;
    session.body.right_thruster = input.right_thruster;

    // Coverage is the per-frame single source of truth; Exploding no longer
    // cares where the hull is.
    if matches!(session.state, PlayerState::Playing | PlayerState::Winning) {
        session.coverage = Coverage::sample(&session.grid, &session.body);
    }

    if session.state == PlayerState::Playing {
        check_transitions(session, &mut events);
    }

    match session.state {
        PlayerState::Playing => {
            // Timer only runs once the ship has moved; lining up the first
            // burn is free.
            if session.body.in_motion() {
                session.elapsed += dt;
            }

            let (force, torque) = accumulate(&session.coverage, &session.body);
            session.body.integrate(force, torque, dt);

            emit_exhaust(session, dt, &mut events);
            emit_force_sparks(session, dt, &mut events);
            update_audio(session, &mut events);
        }

        PlayerState::Winning => {
            // Drifting into a wall at parade speed bounces instead of
            // exploding; the session is already won.
            if session.coverage.any_lethal() {
                session.body.vel = -session.body.vel;
                session.body.rot_vel = -session.body.rot_vel;
            }

            session.body.vel *= WIN_VEL_DECAY.powf(dt);
            session.body.pos += session.body.vel * dt;
            session.body.rot_vel *= WIN_ROT_DECAY.powf(dt);
            session.body.rot += session.body.rot_vel * dt;

            if session.body.speed() < WIN_REST_THRESHOLD
                && session.body.rot_vel.abs() < WIN_REST_THRESHOLD
            {
                terminal = Some(Terminal::LevelWon);
            }
        }

        PlayerState::Exploding => {
            session.explosion_timer += dt;
            if session.explosion_timer >= EXPLOSION_DURATION {
                terminal = Some(Terminal::LevelLost);
            }
        }
    }

    if let Some(t) = terminal {
        log::debug!("terminal signal {t:?} at t={:.2}", session.elapsed);
    }

    FrameOutput {
        state: session.state,
        events,
        terminal,
    }
}

/// Playing-state transition check. Lethal contact is checked before the
/// win tile: touching both in the same frame explodes.
fn check_transitions(session: &mut GameSession, events: &mut Vec<FrameEvent>) {
    if session.coverage.any_lethal() {
        session.state = PlayerState::Exploding;
        session.explosion_timer = 0.0;
        emit_explosion_burst(session, events);
        events.push(FrameEvent::HaltAllAudio);
        session.channel_playing = Default::default();
        events.push(FrameEvent::PlayOneShot(OneShot::Explosion));
        events.push(FrameEvent::StateChanged {
            from: PlayerState::Playing,
            to: PlayerState::Exploding,
        });
        log::info!("player exploded at ({:.2}, {:.2})", session.body.pos.x, session.body.pos.y);
    } else if session.coverage.contains(TileKind::Win) {
        session.state = PlayerState::Winning;
        events.push(FrameEvent::HaltAllAudio);
        session.channel_playing = Default::default();
        events.push(FrameEvent::PlayOneShot(OneShot::Win));
        events.push(FrameEvent::MusicVolume(WIN_MUSIC_VOLUME));
        events.push(FrameEvent::StateChanged {
            from: PlayerState::Playing,
            to: PlayerState::Winning,
        });
        log::info!("player won in {:.1}s (record {:.1})", session.elapsed, session.record);
    }
}

/// 64-particle burst scattered from the hull position
fn emit_explosion_burst(session: &mut GameSession, events: &mut Vec<FrameEvent>) {
    use std::f32::consts::TAU;
    for _ in 0..EXPLOSION_PARTICLES {
        let rot = session.rng.random_range(0.0..TAU);
        let speed = 0.5 + session.rng.random_range(0.0..3.0);
        let size = 0.1 + session.rng.random_range(0.0..0.1);
        events.push(FrameEvent::ParticleSpawn {
            kind: ParticleKind::Explosion,
            pos: session.body.pos,
            vel: heading(rot) * speed,
            size,
        });
    }
}

/// Thruster exhaust: one particle per firing nozzle every spawn interval,
/// thrown backwards with a little angular jitter. Size and exhaust speed
/// follow the power tier.
fn emit_exhaust(session: &mut GameSession, dt: f32, events: &mut Vec<FrameEvent>) {
    let (left, right) = thruster_firing(&session.coverage, &session.body);
    if !left && !right {
        return;
    }

    session.exhaust_timer += dt;
    if session.exhaust_timer < PARTICLE_INTERVAL {
        return;
    }
    session.exhaust_timer -= PARTICLE_INTERVAL;

    let power = thrust_power(&session.coverage);
    let size = if power > 1.0 {
        0.125
    } else if power < 1.0 {
        0.075
    } else {
        0.1
    };

    for (nozzle, firing) in EXHAUST_NOZZLES.into_iter().zip([left, right]) {
        if !firing {
            continue;
        }
        let pos = session.body.pos + rotate_offset(nozzle, session.body.rot);
        let jitter = session.rng.random_range(-0.125..0.125);
        let vel = session.body.vel - heading(session.body.rot + jitter) * power;
        events.push(FrameEvent::ParticleSpawn {
            kind: ParticleKind::ThrusterExhaust,
            pos,
            vel,
            size,
        });
    }
}

/// Sparks while sitting in a force or torque field, drifting against the
/// push so the field direction reads visually. Spawn point is a random
/// spot on either the fuselage line or the wing line.
fn emit_force_sparks(session: &mut GameSession, dt: f32, events: &mut Vec<FrameEvent>) {
    let cov = session.coverage;
    if !cov.any_force_field() {
        return;
    }

    session.spark_timer += dt;
    if session.spark_timer < PARTICLE_INTERVAL {
        return;
    }
    session.spark_timer -= PARTICLE_INTERVAL;

    let (start, end) = if session.rng.random_bool(0.5) {
        // fuselage, nose to tail
        (Vec2::new(0.375, 0.0), Vec2::new(-0.0625, 0.0))
    } else {
        // wing tips
        (Vec2::new(-0.09375, 0.25), Vec2::new(-0.09375, -0.25))
    };
    let t = session.rng.random_range(0.0..1.0);
    let local = start.lerp(end, t);
    let pos = session.body.pos + rotate_offset(local, session.body.rot);

    // Spark velocity opposes the net directional push (cancelled pairs
    // leave the spark drifting with the ship)
    let mut vel = session.body.vel;
    let left = cov.contains(TileKind::LeftForce);
    let right = cov.contains(TileKind::RightForce);
    let down = cov.contains(TileKind::DownForce);
    let up = cov.contains(TileKind::UpForce);
    if left && !right {
        vel.x += FIELD_FORCE;
    } else if right && !left {
        vel.x -= FIELD_FORCE;
    }
    if down && !up {
        vel.y += FIELD_FORCE;
    } else if up && !down {
        vel.y -= FIELD_FORCE;
    }

    events.push(FrameEvent::ParticleSpawn {
        kind: ParticleKind::ForceSpark,
        pos,
        vel,
        size: 0.1,
    });
}

/// Diff desired channel states against what was last reported and emit
/// cue-change events.
fn update_audio(session: &mut GameSession, events: &mut Vec<FrameEvent>) {
    let desired = desired_channels(&session.coverage, &session.body);
    for (i, (channel, want)) in CHANNELS.into_iter().zip(desired).enumerate() {
        let playing_changed = want.playing != session.channel_playing[i];
        let volume_changed =
            want.playing && (want.volume - session.channel_volume[i]).abs() > 1.0 / 256.0;
        if playing_changed || volume_changed {
            events.push(FrameEvent::AudioCue {
                channel,
                playing: want.playing,
                volume: want.volume,
            });
            session.channel_playing[i] = want.playing;
            session.channel_volume[i] = want.volume;
        }
    }
}
