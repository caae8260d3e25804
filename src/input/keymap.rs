use crate::config::{KeyBindings, ShuttleConfig};

/// Abstract shuttle command produced by a keystroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    PlayPause,
    ShuttleForward,
    ShuttleBackward,
    /// Step forward by this many frames
    FrameForward(f64),
    /// Step backward by this many frames
    FrameBackward(f64),
    MarkIn,
    MarkOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    PlayPause,
    ShuttleForward,
    ShuttleBackward,
    FrameForward,
    FrameBackward,
    MarkIn,
    MarkOut,
}

impl Binding {
    fn description(self) -> &'static str {
        match self {
            Binding::PlayPause => "Play/Pause",
            Binding::ShuttleForward => "Shuttle Forward",
            Binding::ShuttleBackward => "Shuttle Backward",
            Binding::FrameForward => "Next Frame",
            Binding::FrameBackward => "Previous Frame",
            Binding::MarkIn => "Mark In",
            Binding::MarkOut => "Mark Out",
        }
    }
}

/// Translates key presses into shuttle commands.
///
/// Every binding is checked independently, so a key listed under several
/// bindings yields several commands, in a fixed order.
pub struct KeyCommandMapper {
    bindings: Vec<(Binding, Vec<String>)>,
    shift_magnification: f64,
}

impl KeyCommandMapper {
    pub fn new(keys: &KeyBindings, shift_magnification: f64) -> Self {
        let bindings = vec![
            (Binding::PlayPause, keys.play_pause.clone()),
            (Binding::ShuttleForward, keys.shuttle_forward.clone()),
            (Binding::ShuttleBackward, keys.shuttle_backward.clone()),
            (Binding::FrameForward, keys.frame_forward.clone()),
            (Binding::FrameBackward, keys.frame_backward.clone()),
            (Binding::MarkIn, keys.mark_in.clone()),
            (Binding::MarkOut, keys.mark_out.clone()),
        ];
        Self {
            bindings,
            shift_magnification,
        }
    }

    pub fn from_config(config: &ShuttleConfig) -> Self {
        Self::new(&config.keys, config.shift_magnification)
    }

    /// Commands bound to `key`; frame steps are magnified while shift is held
    pub fn map(&self, key: &str, shift: bool) -> Vec<Command> {
        let magnitude = if shift { self.shift_magnification } else { 1.0 };

        self.bindings
            .iter()
            .filter(|(_, keys)| keys.iter().any(|k| k == key))
            .map(|(binding, _)| match binding {
                Binding::PlayPause => Command::PlayPause,
                Binding::ShuttleForward => Command::ShuttleForward,
                Binding::ShuttleBackward => Command::ShuttleBackward,
                Binding::FrameForward => Command::FrameForward(magnitude),
                Binding::FrameBackward => Command::FrameBackward(magnitude),
                Binding::MarkIn => Command::MarkIn,
                Binding::MarkOut => Command::MarkOut,
            })
            .collect()
    }

    /// One line per binding: keys, then what they do
    pub fn help_lines(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|(binding, keys)| {
                let keys = keys.iter().map(|k| key_to_string(k)).collect::<Vec<_>>().join(", ");
                format!("  {:15} - {}", keys, binding.description())
            })
            .collect()
    }
}

fn key_to_string(key: &str) -> String {
    match key {
        " " => "Space".to_string(),
        "ArrowLeft" => "←".to_string(),
        "ArrowRight" => "→".to_string(),
        "ArrowUp" => "↑".to_string(),
        "ArrowDown" => "↓".to_string(),
        _ => key.to_string(),
    }
}

impl Default for KeyCommandMapper {
    fn default() -> Self {
        Self::from_config(&ShuttleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let mapper = KeyCommandMapper::default();
        assert_eq!(mapper.map(" ", false), vec![Command::PlayPause]);
        assert_eq!(mapper.map("k", false), vec![Command::PlayPause]);
        assert_eq!(mapper.map("l", false), vec![Command::ShuttleForward]);
        assert_eq!(mapper.map("j", false), vec![Command::ShuttleBackward]);
        assert_eq!(mapper.map("i", false), vec![Command::MarkIn]);
        assert_eq!(mapper.map("o", false), vec![Command::MarkOut]);
        assert!(mapper.map("x", false).is_empty());
    }

    #[test]
    fn test_shift_magnifies_frame_steps() {
        let mapper = KeyCommandMapper::default();
        assert_eq!(mapper.map("ArrowRight", false), vec![Command::FrameForward(1.0)]);
        assert_eq!(mapper.map("ArrowRight", true), vec![Command::FrameForward(10.0)]);
        assert_eq!(mapper.map("ArrowLeft", true), vec![Command::FrameBackward(10.0)]);
        assert_eq!(mapper.map("l", true), vec![Command::ShuttleForward]);
    }

    #[test]
    fn test_overlapping_bindings_all_fire() {
        let keys = KeyBindings {
            play_pause: vec!["k".to_string()],
            mark_in: vec!["k".to_string()],
            ..Default::default()
        };
        let mapper = KeyCommandMapper::new(&keys, 5.0);
        assert_eq!(mapper.map("k", false), vec![Command::PlayPause, Command::MarkIn]);
    }

    #[test]
    fn test_help_lists_every_binding() {
        let lines = KeyCommandMapper::default().help_lines();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].contains("Space, k"));
        assert!(lines[0].ends_with("Play/Pause"));
    }
}
