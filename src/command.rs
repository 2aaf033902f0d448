//! External triggers for the driver
//!
//! Keyboard, mouse and the control socket all speak this vocabulary.
//! Text commands are one per line, case-insensitive.

use crate::error::SkyburstError;
use crate::simulation::MAX_BURST;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Launch one rocket at a horizontal position
    LaunchAt(f32),
    /// Launch one rocket at a random position
    Launch,
    /// Staggered volley; `None` picks a random count
    Burst(Option<usize>),
    Clear,
    ToggleAuto,
    SetAuto(bool),
    Pause,
    Resume,
    Quit,
}

impl FromStr for Command {
    type Err = SkyburstError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_lowercase();
        let invalid = || SkyburstError::InvalidCommand(line.clone());
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(invalid)?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(invalid());
        }

        let cmd = match (verb, arg) {
            ("launch" | "fire", None) => Command::Launch,
            ("launch" | "fire", Some(x)) => {
                let x: f32 = x.parse().map_err(|_| invalid())?;
                if !x.is_finite() {
                    return Err(invalid());
                }
                Command::LaunchAt(x)
            },
            ("burst", None) => Command::Burst(None),
            ("burst", Some(n)) => {
                let n: usize = n.parse().map_err(|_| invalid())?;
                if n > MAX_BURST {
                    return Err(invalid());
                }
                Command::Burst(Some(n))
            },
            ("clear", None) => Command::Clear,
            ("toggle" | "auto", None) => Command::ToggleAuto,
            ("auto", Some("on" | "true" | "1")) => Command::SetAuto(true),
            ("auto", Some("off" | "false" | "0")) => Command::SetAuto(false),
            ("pause" | "stop", None) => Command::Pause,
            ("resume" | "start", None) => Command::Resume,
            ("quit" | "exit" | "q", None) => Command::Quit,
            _ => return Err(invalid()),
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!("launch".parse::<Command>().unwrap(), Command::Launch);
        assert_eq!("  CLEAR ".parse::<Command>().unwrap(), Command::Clear);
        assert_eq!("toggle".parse::<Command>().unwrap(), Command::ToggleAuto);
        assert_eq!("pause".parse::<Command>().unwrap(), Command::Pause);
        assert_eq!("start".parse::<Command>().unwrap(), Command::Resume);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!("launch 400".parse::<Command>().unwrap(), Command::LaunchAt(400.0));
        assert_eq!("burst".parse::<Command>().unwrap(), Command::Burst(None));
        assert_eq!("burst 7".parse::<Command>().unwrap(), Command::Burst(Some(7)));
        assert_eq!("burst 100".parse::<Command>().unwrap(), Command::Burst(Some(MAX_BURST)));
        assert_eq!("auto off".parse::<Command>().unwrap(), Command::SetAuto(false));
        assert_eq!("Auto ON".parse::<Command>().unwrap(), Command::SetAuto(true));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "",
            "dance",
            "launch here",
            "burst -1",
            "burst 101",
            "burst 2000000000000000000",
            "launch nan",
            "clear all",
            "auto maybe",
        ] {
            assert!(
                matches!(bad.parse::<Command>(), Err(SkyburstError::InvalidCommand(_))),
                "accepted {:?}",
                bad
            );
        }
    }
}
