use crate::player::PlayerEvent;
use crate::session::ShuttleEvent;

/// Parse one line typed on the terminal into a session event.
///
/// Key tokens follow `KeyboardEvent.key` naming: `space`, `left`, `right`,
/// `up` and `down` are spelled out, anything else is taken literally. A
/// `shift+` prefix or an uppercase letter counts as shift being held.
pub fn parse_line(line: &str) -> Option<ShuttleEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut words = line.split_whitespace();
    match words.next()? {
        "quit" | "exit" => return Some(ShuttleEvent::Shutdown),
        "status" => return Some(ShuttleEvent::Status),
        "help" => return Some(ShuttleEvent::Help),
        "click" => return Some(ShuttleEvent::Player(PlayerEvent::PlayControlClicked)),
        "play" => return Some(ShuttleEvent::Player(PlayerEvent::Played)),
        "rate" => {
            let rate = words.next()?.parse::<f64>().ok()?;
            return Some(ShuttleEvent::Player(PlayerEvent::NativeRateChanged(rate)));
        }
        _ => {}
    }

    let (token, shift_prefix) = match line.strip_prefix("shift+") {
        Some(rest) => (rest, true),
        None => (line, false),
    };

    let key = match token {
        "space" => " ".to_string(),
        "left" => "ArrowLeft".to_string(),
        "right" => "ArrowRight".to_string(),
        "up" => "ArrowUp".to_string(),
        "down" => "ArrowDown".to_string(),
        other => other.to_string(),
    };
    let uppercase = key.chars().count() == 1 && key.chars().all(|c| c.is_uppercase());

    Some(ShuttleEvent::Key {
        key,
        shift: shift_prefix || uppercase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: &str, shift: bool) -> Option<ShuttleEvent> {
        Some(ShuttleEvent::Key {
            key: key.to_string(),
            shift,
        })
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(parse_line("space"), key(" ", false));
        assert_eq!(parse_line("left"), key("ArrowLeft", false));
        assert_eq!(parse_line("shift+right"), key("ArrowRight", true));
        assert_eq!(parse_line("  l \n"), key("l", false));
    }

    #[test]
    fn test_uppercase_implies_shift() {
        assert_eq!(parse_line("L"), key("L", true));
        assert_eq!(parse_line("shift+j"), key("j", true));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_line("quit"), Some(ShuttleEvent::Shutdown));
        assert_eq!(parse_line("status"), Some(ShuttleEvent::Status));
        assert_eq!(
            parse_line("rate 1.5"),
            Some(ShuttleEvent::Player(PlayerEvent::NativeRateChanged(1.5)))
        );
        assert_eq!(
            parse_line("click"),
            Some(ShuttleEvent::Player(PlayerEvent::PlayControlClicked))
        );
        assert_eq!(parse_line("rate fast"), None);
        assert_eq!(parse_line("   "), None);
    }
}
