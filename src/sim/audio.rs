//! Looping audio channel model
//!
//! The core never touches an audio device. Each frame it computes the
//! desired state of seven looping channels from the collision coverage and
//! the body's motion; the tick diffs that against what it last reported and
//! emits [`FrameEvent::AudioCue`] changes for the mixer to apply.
//!
//! Volumes are normalized to 0..=1; the mixer owns the actual scale.

use serde::{Deserialize, Serialize};

use super::body::PlayerBody;
use super::collision::Coverage;
use super::forces::{thruster_firing, thrust_power};
use super::grid::TileKind;

/// Looping mixer channels, in reservation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioChannel {
    LeftThruster,
    RightThruster,
    Alarm,
    Boost,
    Drag,
    Force,
    Gravity,
}

pub const CHANNEL_COUNT: usize = 7;

/// All channels, index-aligned with the session's bookkeeping arrays
pub const CHANNELS: [AudioChannel; CHANNEL_COUNT] = [
    AudioChannel::LeftThruster,
    AudioChannel::RightThruster,
    AudioChannel::Alarm,
    AudioChannel::Boost,
    AudioChannel::Drag,
    AudioChannel::Force,
    AudioChannel::Gravity,
];

/// Desired play state and volume for one channel this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    pub playing: bool,
    pub volume: f32,
}

/// Compute the desired state of every looping channel from this frame's
/// coverage and motion.
pub fn desired_channels(cov: &Coverage, body: &PlayerBody) -> [ChannelState; CHANNEL_COUNT] {
    let (left, right) = thruster_firing(cov, body);

    // Thruster loudness follows the power tier
    let thruster_volume = if thrust_power(cov) > 1.0 {
        1.0
    } else if thrust_power(cov) < 1.0 {
        0.25
    } else {
        0.5
    };

    // The alarm warns that a control-override tile has the thrusters
    let alarm = cov.contains(TileKind::ThrustersOn) || cov.contains(TileKind::ThrustersOff);

    let speed = body.speed();
    let boost = cov.contains(TileKind::Boost);
    let drag = cov.contains(TileKind::Drag);
    let force = cov.any_force_field();
    let gravity_mag = cov.gravity.length();
    let gravity = gravity_mag != 0.0;

    [
        ChannelState { playing: left, volume: thruster_volume },
        ChannelState { playing: right, volume: thruster_volume },
        ChannelState { playing: alarm, volume: 1.0 },
        ChannelState {
            playing: boost,
            volume: ((32.0 + 15.0 * speed) / 128.0).min(1.0),
        },
        ChannelState {
            playing: drag,
            volume: (24.0 * speed / 128.0).min(1.0),
        },
        ChannelState { playing: force, volume: 1.0 },
        ChannelState {
            playing: gravity,
            volume: (96.0 * gravity_mag / 128.0).min(1.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::TileGrid;
    use glam::Vec2;

    fn sample(grid: &TileGrid, body: &PlayerBody) -> [ChannelState; CHANNEL_COUNT] {
        desired_channels(&Coverage::sample(grid, body), body)
    }

    fn body_at_center() -> PlayerBody {
        PlayerBody::at_spawn(Vec2::new(24.5, 16.5), 0.0)
    }

    fn channel(states: &[ChannelState; CHANNEL_COUNT], ch: AudioChannel) -> ChannelState {
        states[CHANNELS.iter().position(|&c| c == ch).unwrap()]
    }

    #[test]
    fn test_idle_ship_is_silent() {
        let states = sample(&TileGrid::empty(), &body_at_center());
        for ch in [
            AudioChannel::LeftThruster,
            AudioChannel::RightThruster,
            AudioChannel::Alarm,
            AudioChannel::Boost,
            AudioChannel::Drag,
            AudioChannel::Force,
            AudioChannel::Gravity,
        ] {
            assert!(!channel(&states, ch).playing, "{ch:?} should be idle");
        }
    }

    #[test]
    fn test_thruster_channels_follow_sides() {
        let mut body = body_at_center();
        body.left_thruster = true;
        let states = sample(&TileGrid::empty(), &body);
        assert!(channel(&states, AudioChannel::LeftThruster).playing);
        assert!(!channel(&states, AudioChannel::RightThruster).playing);
        assert_eq!(channel(&states, AudioChannel::LeftThruster).volume, 0.5);
    }

    #[test]
    fn test_power_tiles_change_thruster_volume_and_alarm() {
        let mut grid = TileGrid::empty();
        grid.set(16, 24, TileKind::ThrustersOn);
        let states = sample(&grid, &body_at_center());
        // Forced thrust plays both sides and sounds the alarm
        assert!(channel(&states, AudioChannel::LeftThruster).playing);
        assert!(channel(&states, AudioChannel::RightThruster).playing);
        assert!(channel(&states, AudioChannel::Alarm).playing);

        let mut grid = TileGrid::empty();
        grid.set(16, 24, TileKind::StrongerThrusters);
        let mut body = body_at_center();
        body.right_thruster = true;
        let states = sample(&grid, &body);
        assert_eq!(channel(&states, AudioChannel::RightThruster).volume, 1.0);
    }

    #[test]
    fn test_drag_volume_scales_with_speed_and_clamps() {
        let mut grid = TileGrid::empty();
        grid.set(16, 24, TileKind::Drag);
        let mut body = body_at_center();

        body.vel = Vec2::new(1.0, 0.0);
        let states = sample(&grid, &body);
        let quiet = channel(&states, AudioChannel::Drag);
        assert!(quiet.playing);
        assert!((quiet.volume - 24.0 / 128.0).abs() < 1e-6);

        body.vel = Vec2::new(100.0, 0.0);
        let states = sample(&grid, &body);
        assert_eq!(channel(&states, AudioChannel::Drag).volume, 1.0);
    }

    #[test]
    fn test_gravity_channel_tracks_field_strength() {
        let mut grid = TileGrid::empty();
        grid.set(16, 28, TileKind::Gravity);
        let body = PlayerBody::at_spawn(Vec2::new(24.0, 16.5), 0.0);
        let cov = Coverage::sample(&grid, &body);
        let states = desired_channels(&cov, &body);
        let gravity = channel(&states, AudioChannel::Gravity);
        assert!(gravity.playing);
        assert!((gravity.volume - 96.0 * cov.gravity.length() / 128.0).abs() < 1e-6);
    }
}
