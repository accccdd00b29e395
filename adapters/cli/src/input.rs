//! Line-oriented keyboard input.

use anyhow::{anyhow, bail, Context, Result as AnyResult};
use motion_maze_core::{CellCoord, Direction};
use motion_maze_engine::{EngineError, Submitter};

/// Parsed keyboard line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Move(Direction),
    Button,
    Motion,
    Pause,
    Teleport(CellCoord),
    Quit,
}

impl Input {
    /// Enqueues the matching signal. `Quit` submits nothing.
    pub(crate) fn submit(self, submitter: &Submitter) -> Result<(), EngineError> {
        match self {
            Self::Move(direction) => submitter.submit_movement(direction),
            Self::Button => submitter.submit_button_press(),
            Self::Motion => submitter.submit_motion_trigger(),
            Self::Pause => submitter.submit_pause(),
            Self::Teleport(cell) => submitter.submit_teleport(cell),
            Self::Quit => Ok(()),
        }
    }
}

/// Parses one line; blank lines yield `None`.
pub(crate) fn parse_line(line: &str) -> AnyResult<Option<Input>> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "w" | "up" => Input::Move(Direction::Up),
        "a" | "left" => Input::Move(Direction::Left),
        "s" | "down" => Input::Move(Direction::Down),
        "d" | "right" => Input::Move(Direction::Right),
        "b" | "button" => Input::Button,
        "m" | "motion" => Input::Motion,
        "p" | "pause" => Input::Pause,
        "q" | "quit" => Input::Quit,
        "t" | "teleport" => {
            let column = coordinate(words.next(), "x")?;
            let row = coordinate(words.next(), "y")?;
            Input::Teleport(CellCoord::new(column, row))
        }
        other => bail!("unrecognised input `{other}`"),
    };

    if words.next().is_some() {
        bail!("unexpected trailing input after `{word}`");
    }
    Ok(Some(input))
}

fn coordinate(word: Option<&str>, axis: &str) -> AnyResult<u32> {
    let word = word.ok_or_else(|| anyhow!("teleport needs an {axis} coordinate"))?;
    word.parse()
        .with_context(|| format!("invalid {axis} coordinate `{word}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movement_aliases() {
        assert_eq!(
            parse_line("w").expect("parse"),
            Some(Input::Move(Direction::Up))
        );
        assert_eq!(
            parse_line("  LEFT ").expect("parse"),
            Some(Input::Move(Direction::Left))
        );
        assert_eq!(
            parse_line("d").expect("parse"),
            Some(Input::Move(Direction::Right))
        );
        assert_eq!(parse_line("").expect("parse"), None);
    }

    #[test]
    fn parses_teleport_coordinates() {
        assert_eq!(
            parse_line("t 3 7").expect("parse"),
            Some(Input::Teleport(CellCoord::new(3, 7)))
        );
        assert!(parse_line("t 3").is_err());
        assert!(parse_line("t -1 2").is_err());
        assert!(parse_line("t 1 2 3").is_err());
    }

    #[test]
    fn rejects_unknown_words() {
        assert!(parse_line("jump").is_err());
        assert!(parse_line("b now").is_err());
        assert_eq!(parse_line("q").expect("parse"), Some(Input::Quit));
    }
}
