pub mod clock;
pub mod controller;

pub use clock::{ShuttleClock, Tick, TickReceiver, TimerKind};
pub use controller::ShuttleController;

/// Playback mode as seen by the shuttle controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShuttleMode {
    Stopped,
    Playing(f64),
}

/// Playback state owned by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_rate: f64,
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn mode(&self) -> ShuttleMode {
        if self.is_playing {
            ShuttleMode::Playing(self.current_rate)
        } else {
            ShuttleMode::Stopped
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_rate: 1.0,
            is_playing: false,
        }
    }
}

/// Text shown in the speed readout for a rate
pub fn rate_label(rate: f64) -> String {
    format!("{}x", rate)
}
