use crate::error::PlayError;
use crate::player::{PlayRequest, Player};
use tokio::time::Instant;

/// In-process player for running without a real media backend.
///
/// The position advances with elapsed time multiplied by the native rate
/// while playing, and stops at either end of the media.
pub struct SimulatedPlayer {
    duration: f64,
    position: f64,
    /// Set while natively playing: the instant `position` was last rebased
    anchor: Option<Instant>,
    rate: f64,
    rate_label: String,
    markers: Option<(f64, f64)>,
    play_control_playing: bool,
    host_rates: Option<Vec<f64>>,
    reject_play: bool,
}

impl SimulatedPlayer {
    /// Create a paused player for media of `duration` seconds
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            position: 0.0,
            anchor: None,
            rate: 1.0,
            rate_label: "1x".to_string(),
            markers: None,
            play_control_playing: false,
            host_rates: None,
            reject_play: false,
        }
    }

    /// Advertise a host-level rate list
    #[cfg(test)]
    pub fn with_host_rates(mut self, rates: Vec<f64>) -> Self {
        self.host_rates = Some(rates);
        self
    }

    /// Make play requests fail as if blocked by an autoplay policy
    #[cfg(test)]
    pub fn set_reject_play(&mut self, reject: bool) {
        self.reject_play = reject;
    }

    pub fn is_playing(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn rate_label(&self) -> &str {
        &self.rate_label
    }

    pub fn markers(&self) -> Option<(f64, f64)> {
        self.markers
    }

    #[cfg(test)]
    pub fn play_control_playing(&self) -> bool {
        self.play_control_playing
    }

    /// Fold elapsed playing time into `position`
    fn rebase(&mut self) {
        if let Some(anchor) = self.anchor {
            let now = Instant::now();
            self.position = self.advanced_from(anchor, now);
            self.anchor = Some(now);
        }
    }

    fn advanced_from(&self, anchor: Instant, now: Instant) -> f64 {
        let elapsed = now.duration_since(anchor).as_secs_f64();
        (self.position + elapsed * self.rate).clamp(0.0, self.duration.max(0.0))
    }
}

impl Player for SimulatedPlayer {
    fn current_time(&self) -> f64 {
        match self.anchor {
            Some(anchor) => self.advanced_from(anchor, Instant::now()),
            None => self.position,
        }
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.duration.max(0.0));
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn play(&mut self) -> Option<PlayRequest> {
        if self.reject_play {
            let request: PlayRequest = Box::pin(async {
                Err(PlayError::NotAllowed("simulated autoplay policy".to_string()))
            });
            return Some(request);
        }

        if self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
        self.play_control_playing = true;
        let request: PlayRequest = Box::pin(async { Ok(()) });
        Some(request)
    }

    fn pause(&mut self) {
        self.rebase();
        self.anchor = None;
        self.play_control_playing = false;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rebase();
        self.rate = rate.max(0.0);
    }

    fn is_natively_paused(&self) -> bool {
        !self.play_control_playing
    }

    fn set_rate_label(&mut self, label: &str) {
        self.rate_label = label.to_string();
    }

    fn set_marker_positions(&mut self, in_pct: f64, out_pct: f64) {
        self.markers = Some((in_pct, out_pct));
    }

    fn set_play_control_playing(&mut self, playing: bool) {
        self.play_control_playing = playing;
    }

    fn host_playback_rates(&self) -> Option<Vec<f64>> {
        self.host_rates.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_position_follows_native_rate() {
        let mut player = SimulatedPlayer::new(60.0);
        player.set_playback_rate(2.0);
        assert!(player.play().unwrap().await.is_ok());

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_relative_eq!(player.current_time(), 6.0, epsilon = 1e-6);

        player.pause();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_relative_eq!(player.current_time(), 6.0, epsilon = 1e-6);
        assert!(player.is_natively_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_clamps_at_end() {
        let mut player = SimulatedPlayer::new(10.0);
        player.set_current_time(9.0);
        let _ = player.play();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(player.current_time(), 10.0);
    }

    #[tokio::test]
    async fn test_rejected_play_stays_paused() {
        let mut player = SimulatedPlayer::new(10.0);
        player.set_reject_play(true);

        let result = player.play().unwrap().await;
        assert!(matches!(result, Err(PlayError::NotAllowed(_))));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_seek_clamps_to_media() {
        let mut player = SimulatedPlayer::new(10.0);
        player.set_current_time(-3.0);
        assert_eq!(player.current_time(), 0.0);
        player.set_current_time(42.0);
        assert_eq!(player.current_time(), 10.0);
    }
}
