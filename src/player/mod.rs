pub mod simulated;

pub use simulated::SimulatedPlayer;

use crate::error::PlayError;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Completion signal of a play request
pub type PlayRequest = BoxFuture<'static, Result<(), PlayError>>;

/// Notifications a player sends about changes made outside the controller
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The speed was changed from the player's own UI
    NativeRateChanged(f64),
    /// The native play/pause control (or the video surface) was clicked
    PlayControlClicked,
    /// Native playback started
    Played,
}

/// Media player driven by the shuttle controller.
///
/// Native playback rates are never negative; reverse playback is simulated
/// by the controller through `set_current_time`.
pub trait Player {
    /// Current play-head position in seconds
    fn current_time(&self) -> f64;

    /// Seek to a position in seconds
    fn set_current_time(&mut self, seconds: f64);

    /// Media duration in seconds (may be NaN while unknown)
    fn duration(&self) -> f64;

    /// Start native playback.
    ///
    /// May return a completion signal that resolves to an error when the
    /// host refuses to play.
    fn play(&mut self) -> Option<PlayRequest>;

    /// Pause native playback
    fn pause(&mut self);

    /// Native playback rate
    fn playback_rate(&self) -> f64;

    /// Set the native playback rate (positive values only)
    fn set_playback_rate(&mut self, rate: f64);

    /// Whether the native play/pause control currently shows "paused"
    fn is_natively_paused(&self) -> bool;

    /// Update the speed readout
    fn set_rate_label(&mut self, label: &str);

    /// Place the in/out markers, as percentages of the duration
    fn set_marker_positions(&mut self, in_pct: f64, out_pct: f64);

    /// Switch the play/pause control between its "playing" and "paused" look
    fn set_play_control_playing(&mut self, _playing: bool) {}

    /// Rate list configured on the host player, if any
    fn host_playback_rates(&self) -> Option<Vec<f64>> {
        None
    }
}
