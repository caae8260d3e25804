use crate::config::ShuttleConfig;
use crate::core::{Direction, LoopRange, RateLadder};
use crate::input::Command;
use crate::player::{PlayRequest, Player, PlayerEvent};
use crate::playback::{rate_label, PlaybackState, ShuttleClock, ShuttleMode, Tick, TickReceiver, TimerKind};
use std::time::Duration;
use tracing::{debug, info};

/// Keyboard shuttle controller for a [`Player`].
///
/// Owns the playback state and the loop range, and runs reverse playback
/// and loop containment off the [`ShuttleClock`]. All methods are meant to
/// be called from a single event loop.
pub struct ShuttleController<P: Player> {
    player: P,
    clock: ShuttleClock,
    state: PlaybackState,
    range: LoopRange,
    ladder: RateLadder,
    frame_time: f64,
    period: Duration,
    seen_native_play: bool,
}

impl<P: Player> ShuttleController<P> {
    /// Create a controller; ticks for [`ShuttleController::handle_tick`]
    /// arrive on the returned receiver
    pub fn new(player: P, config: &ShuttleConfig) -> (Self, TickReceiver) {
        let rates = match player.host_playback_rates() {
            Some(rates) if !rates.is_empty() => rates,
            _ => config.playback_rates.clone(),
        };
        let (clock, ticks) = ShuttleClock::new();

        let mut controller = Self {
            player,
            clock,
            state: PlaybackState::default(),
            range: LoopRange::new(config.in_time, config.out_time),
            ladder: RateLadder::new(rates),
            frame_time: config.frame_time(),
            period: config.frame_period(),
            seen_native_play: false,
        };
        controller.update_markers();
        (controller, ticks)
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mode(&self) -> ShuttleMode {
        self.state.mode()
    }

    pub fn loop_range(&self) -> LoopRange {
        self.range
    }

    pub fn ladder(&self) -> &RateLadder {
        &self.ladder
    }

    pub fn clock(&self) -> &ShuttleClock {
        &self.clock
    }

    /// Execute a key command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::PlayPause => self.toggle_play_pause(),
            Command::ShuttleForward => self.shuttle(Direction::Forward),
            Command::ShuttleBackward => self.shuttle(Direction::Backward),
            Command::FrameForward(steps) => self.frame_step(steps),
            Command::FrameBackward(steps) => self.frame_step(-steps),
            Command::MarkIn => self.mark_in(),
            Command::MarkOut => self.mark_out(),
        }
    }

    /// React to a notification from the player
    pub fn handle_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::NativeRateChanged(rate) => self.native_rate_changed(rate),
            PlayerEvent::PlayControlClicked => self.external_play_pause_toggle(),
            PlayerEvent::Played => {
                if !self.seen_native_play {
                    self.seen_native_play = true;
                    self.state.is_playing = true;
                }
            }
        }
    }

    /// Dispatch a clock tick; ticks from cancelled timers are ignored
    pub fn handle_tick(&mut self, tick: Tick) {
        if !self.clock.accept(&tick) {
            return;
        }
        match tick.kind {
            TimerKind::NegativeSimulation => self.negative_tick(tick.rate),
            TimerKind::LoopEnforcement => self.loop_tick(tick.rate),
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.state.is_playing {
            self.pause_only();
            self.reset_rate();
        } else {
            self.enter_playing(1.0);
        }
    }

    pub fn shuttle(&mut self, direction: Direction) {
        let rate = if self.state.is_playing {
            self.ladder.step(self.state.current_rate, direction)
        } else {
            direction.initial_rate()
        };
        self.enter_playing(rate);
    }

    /// Start (or restart) playback at `rate`, simulating it when not positive
    pub fn enter_playing(&mut self, rate: f64) {
        self.state.current_rate = rate;
        self.state.is_playing = true;
        self.clock.stop_all();

        let period = self.period;
        if rate > 0.0 {
            self.player.set_playback_rate(rate);
            let request = self.player.play();
            silence_play_request(request);
        } else {
            self.player.pause();
            self.player.set_play_control_playing(true);
            self.clock.start(TimerKind::NegativeSimulation, period, rate);
        }
        self.player.set_rate_label(&rate_label(rate));
        self.clock.start(TimerKind::LoopEnforcement, period, rate);

        info!("Playing at {}x", rate);
    }

    /// Step the play-head back by one tick's worth of `rate`
    pub fn negative_tick(&mut self, rate: f64) {
        self.player.set_play_control_playing(true);
        self.state.is_playing = true;
        self.player.pause();
        self.player.set_rate_label(&rate_label(rate));

        let mut position = self.player.current_time() + self.frame_time * rate;
        if position < 0.0 {
            position = self.player.duration();
        }
        self.player.set_current_time(position);
    }

    /// Keep the play-head inside the loop range
    pub fn loop_tick(&mut self, rate: f64) {
        if !self.state.is_playing {
            return;
        }

        let (in_time, out_time) = self.range.bounds(self.player.duration());
        let position = self.player.current_time();
        let advance = self.frame_time * rate;

        if in_time == out_time {
            info!("Loop range is empty at {:.3}s, stopping", in_time);
            self.pause_only();
            self.reset_rate();
            self.player.set_current_time(in_time);
        } else if position < in_time || position > out_time {
            let target = if rate > 0.0 {
                in_time + advance
            } else {
                out_time + advance
            };
            debug!("Looping from {:.3}s to {:.3}s", position, target);
            self.player.set_current_time(target);
        }
    }

    pub fn mark_in(&mut self) {
        let PlaybackState { current_rate, is_playing } = self.state;

        self.range.set_in(self.player.current_time());
        if is_playing && current_rate < 0.0 {
            let restart = self.range.out_time().unwrap_or_else(|| self.player.duration());
            self.player.set_current_time(restart);
        }
        if is_playing {
            self.enter_playing(current_rate);
        }

        info!("In point set to {:.3}s", self.range.in_time().unwrap_or(0.0));
        self.update_markers();
    }

    pub fn mark_out(&mut self) {
        let PlaybackState { current_rate, is_playing } = self.state;

        self.range.set_out(self.player.current_time());
        if is_playing && current_rate > 0.0 {
            let restart = self.range.in_time().unwrap_or(0.0);
            self.player.set_current_time(restart);
        }
        if is_playing {
            self.enter_playing(current_rate);
        }

        info!("Out point set to {:.3}s", self.range.out_time().unwrap_or(0.0));
        self.update_markers();
    }

    /// Pause and move by `steps` frames (negative steps go back)
    pub fn frame_step(&mut self, steps: f64) {
        self.clock.stop_all();
        self.player.pause();
        let position = self.player.current_time() + self.frame_time * steps;
        self.player.set_current_time(position);
    }

    /// The speed was changed from the player's own UI
    pub fn native_rate_changed(&mut self, rate: f64) {
        if self.state.is_playing {
            self.enter_playing(rate);
        } else {
            self.player.set_rate_label(&rate_label(rate));
            self.state.current_rate = rate;
        }
    }

    /// Reconcile after the native play/pause control was clicked directly
    pub fn external_play_pause_toggle(&mut self) {
        let paused = self.player.is_natively_paused();
        let PlaybackState { current_rate: rate, is_playing } = self.state;

        let negative_playing = is_playing && rate < 0.0 && paused;
        let negative_paused = !is_playing && rate < 0.0 && paused;
        let positive_playing = is_playing && rate > 0.0 && !paused;
        let positive_paused = !is_playing && rate > 0.0 && paused;

        if negative_playing || positive_playing {
            self.pause_only();
        }
        if negative_paused || positive_paused {
            self.enter_playing(rate);
        }
    }

    /// Stop ticking and pause without touching the rate
    fn pause_only(&mut self) {
        self.clock.stop_all();
        self.state.is_playing = false;
        self.player.set_play_control_playing(false);
        self.player.pause();
        info!("Paused");
    }

    fn reset_rate(&mut self) {
        self.state.current_rate = 1.0;
        self.player.set_playback_rate(1.0);
        self.player.set_rate_label(&rate_label(1.0));
    }

    fn update_markers(&mut self) {
        match self.range.marker_positions(self.player.duration()) {
            Some((in_pct, out_pct)) => self.player.set_marker_positions(in_pct, out_pct),
            None => debug!("Duration unknown, markers not placed"),
        }
    }
}

/// Drive a play request to completion, discarding any rejection
fn silence_play_request(request: Option<PlayRequest>) {
    if let Some(request) = request {
        tokio::spawn(async move {
            if let Err(e) = request.await {
                debug!("Ignoring failed play request: {}", e);
            }
        });
    }
}
