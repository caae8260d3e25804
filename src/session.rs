use crate::input::KeyCommandMapper;
use crate::player::{Player, PlayerEvent};
use crate::playback::{ShuttleController, ShuttleMode, TickReceiver};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Input to a running shuttle session
#[derive(Debug, Clone, PartialEq)]
pub enum ShuttleEvent {
    /// A key press, with its `KeyboardEvent.key` identifier
    Key { key: String, shift: bool },
    Player(PlayerEvent),
    /// Log the current playback state
    Status,
    /// Log the key bindings
    Help,
    Shutdown,
}

/// Event loop tying a controller to its key map and clock.
///
/// Key presses, player notifications and timer ticks are handled one at a
/// time, each to completion.
pub struct Session<P: Player> {
    controller: ShuttleController<P>,
    mapper: KeyCommandMapper,
    ticks: TickReceiver,
}

impl<P: Player> Session<P> {
    pub fn new(controller: ShuttleController<P>, ticks: TickReceiver, mapper: KeyCommandMapper) -> Self {
        Self {
            controller,
            mapper,
            ticks,
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> &ShuttleController<P> {
        &self.controller
    }

    /// Handle one input event; returns false once the session should end
    pub fn handle_event(&mut self, event: ShuttleEvent) -> bool {
        match event {
            ShuttleEvent::Key { key, shift } => {
                let commands = self.mapper.map(&key, shift);
                if commands.is_empty() {
                    debug!("Unbound key {:?}", key);
                }
                for command in commands {
                    debug!("Key {:?} (shift: {}) -> {:?}", key, shift, command);
                    self.controller.apply(command);
                }
            }
            ShuttleEvent::Player(event) => self.controller.handle_player_event(event),
            ShuttleEvent::Status => self.log_status(),
            ShuttleEvent::Help => {
                for line in self.mapper.help_lines() {
                    info!("{}", line);
                }
                info!("Shuttle rates: {:?}", self.controller.ladder().rates());
            }
            ShuttleEvent::Shutdown => return false,
        }
        true
    }

    fn log_status(&self) {
        let player = self.controller.player();
        let range = self.controller.loop_range();
        let state = self.controller.state();
        let mode = match state.mode() {
            ShuttleMode::Stopped => format!("stopped (rate {}x)", state.current_rate),
            ShuttleMode::Playing(rate) => format!("playing at {}x", rate),
        };
        info!(
            "{} at {:.3}s / {:.3}s, native rate {}x, loop {:?}..{:?}, {} timer(s) active",
            mode,
            player.current_time(),
            player.duration(),
            player.playback_rate(),
            range.in_time(),
            range.out_time(),
            self.controller.clock().active_count()
        );
    }

    /// Run until a shutdown event arrives or the event channel closes
    pub async fn run(mut self, mut events: mpsc::Receiver<ShuttleEvent>) -> Result<ShuttleController<P>> {
        info!("Shuttle session started");

        loop {
            tokio::select! {
                Some(tick) = self.ticks.recv() => {
                    self.controller.handle_tick(tick);
                }
                event = events.recv() => {
                    match event {
                        Some(event) => {
                            if !self.handle_event(event) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        info!("Shuttle session stopped");
        Ok(self.controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShuttleConfig;
    use crate::player::SimulatedPlayer;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn key(key: &str) -> ShuttleEvent {
        ShuttleEvent::Key {
            key: key.to_string(),
            shift: false,
        }
    }

    fn session(duration: f64, config: &ShuttleConfig) -> Session<SimulatedPlayer> {
        let (controller, ticks) = ShuttleController::new(SimulatedPlayer::new(duration), config);
        Session::new(controller, ticks, KeyCommandMapper::from_config(config))
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_drive_controller() {
        let mut session = session(60.0, &ShuttleConfig::default());
        assert!(session.handle_event(key("l")));
        assert!(session.handle_event(key("l")));
        assert_eq!(session.controller().mode(), ShuttleMode::Playing(2.0));

        assert!(session.handle_event(key("k")));
        assert_eq!(session.controller().mode(), ShuttleMode::Stopped);
        assert!(!session.handle_event(ShuttleEvent::Shutdown));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_simulates_reverse_playback() {
        let session = session(60.0, &ShuttleConfig::default());
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(rx));

        for _ in 0..3 {
            tx.send(ShuttleEvent::Key { key: "ArrowRight".to_string(), shift: true }).await.unwrap();
        }
        tx.send(key("j")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(ShuttleEvent::Shutdown).await.unwrap();

        let controller = handle.await.unwrap().unwrap();
        assert_eq!(controller.mode(), ShuttleMode::Playing(-1.0));
        // 30 frames forward, then about 15 ticks back at one frame per tick
        let position = controller.player().current_time();
        assert!(position < 1.0);
        assert!(position > 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_keeps_forward_playback_inside_loop() {
        let config = ShuttleConfig {
            in_time: Some(10.0),
            out_time: Some(12.0),
            ..Default::default()
        };
        let session = session(60.0, &config);
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(rx));

        tx.send(key("l")).await.unwrap();
        tx.send(key("l")).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        tx.send(ShuttleEvent::Status).await.unwrap();
        tx.send(ShuttleEvent::Shutdown).await.unwrap();

        let controller = handle.await.unwrap().unwrap();
        assert_eq!(controller.mode(), ShuttleMode::Playing(2.0));
        assert!(controller.player().is_playing());
        assert_eq!(controller.clock().active_count(), 1);

        // at 2x the play-head can pass the out point by at most one tick's travel
        let position = controller.player().current_time();
        assert!(position >= 10.0, "position {} before in point", position);
        assert!(position <= 12.0 + 2.0 / 30.0 + 1e-6, "position {} past out point", position);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ends_when_channel_closes() {
        let session = session(60.0, &ShuttleConfig::default());
        let (tx, rx) = mpsc::channel(4);
        tx.send(key("i")).await.unwrap();
        drop(tx);

        let controller = session.run(rx).await.unwrap();
        assert_relative_eq!(controller.loop_range().in_time().unwrap(), 0.0);
    }
}
