//! Action notation.
//!
//! One action per line: `WAIT`, `SEED <source> <target>`, `GROW <cell>` or
//! `COMPLETE <cell>`. Anything after the arguments (such as a message
//! following WAIT) is ignored when parsing.

use crate::board::Action;

/// Errors that can occur while parsing an action line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty input")]
    Empty,

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("invalid cell index '{0}'")]
    InvalidCell(String),
}

/// Parses one action line.
pub fn parse_action(s: &str) -> Result<Action, NotationError> {
    let mut tokens = s.split_whitespace();
    let keyword = tokens.next().ok_or(NotationError::Empty)?;

    match keyword {
        "WAIT" => Ok(Action::Wait),
        "SEED" => {
            let source = parse_cell(tokens.next(), "source cell")?;
            let target = parse_cell(tokens.next(), "target cell")?;
            Ok(Action::Seed { source, target })
        }
        "GROW" => Ok(Action::Grow {
            target: parse_cell(tokens.next(), "cell")?,
        }),
        "COMPLETE" => Ok(Action::Complete {
            target: parse_cell(tokens.next(), "cell")?,
        }),
        other => Err(NotationError::UnknownAction(other.to_string())),
    }
}

fn parse_cell(token: Option<&str>, what: &'static str) -> Result<usize, NotationError> {
    let token = token.ok_or(NotationError::UnexpectedEnd(what))?;
    token
        .parse()
        .map_err(|_| NotationError::InvalidCell(token.to_string()))
}

/// Formats an action as an output line (without the newline).
pub fn format_action(action: &Action) -> String {
    match *action {
        Action::Wait => "WAIT".to_string(),
        Action::Seed { source, target } => format!("SEED {} {}", source, target),
        Action::Grow { target } => format!("GROW {}", target),
        Action::Complete { target } => format!("COMPLETE {}", target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_keyword() {
        assert_eq!(parse_action("WAIT"), Ok(Action::Wait));
        assert_eq!(
            parse_action("SEED 4 17"),
            Ok(Action::Seed {
                source: 4,
                target: 17
            })
        );
        assert_eq!(parse_action("GROW 8"), Ok(Action::Grow { target: 8 }));
        assert_eq!(
            parse_action("  COMPLETE 0 "),
            Ok(Action::Complete { target: 0 })
        );
    }

    #[test]
    fn seed_prints_source_first() {
        let action = Action::Seed {
            source: 3,
            target: 21,
        };
        assert_eq!(format_action(&action), "SEED 3 21");
        assert_eq!(format_action(&Action::Wait), "WAIT");
        assert_eq!(format_action(&Action::Complete { target: 5 }), "COMPLETE 5");
    }

    #[test]
    fn trailing_text_ignored() {
        assert_eq!(parse_action("WAIT zzz good night"), Ok(Action::Wait));
        assert_eq!(parse_action("GROW 8 hello"), Ok(Action::Grow { target: 8 }));
    }

    #[test]
    fn malformed_lines_rejected() {
        assert_eq!(parse_action(""), Err(NotationError::Empty));
        assert_eq!(
            parse_action("PLANT 3"),
            Err(NotationError::UnknownAction("PLANT".to_string()))
        );
        assert_eq!(
            parse_action("SEED 3"),
            Err(NotationError::UnexpectedEnd("target cell"))
        );
        assert_eq!(
            parse_action("GROW -1"),
            Err(NotationError::InvalidCell("-1".to_string()))
        );
    }
}
