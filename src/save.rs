//! Line-oriented text encoding of a single snake.
//!
//! ```text
//! L:<length>,D:<direction code>
//! B
//!  b:<x>,<y>
//!  ...
//! ```
//!
//! One ` b:` line follows per segment, head first. Colors are not stored.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::input::Direction;
use crate::snake::{Position, Snake};

const LENGTH_KEY: &str = "L:";
const DIRECTION_KEY: &str = "D:";
const BODY_MARKER: &str = "B";
const SEGMENT_PREFIX: &str = " b:";

/// Malformed save data.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum SaveFormatError {
    #[error("save data is empty")]
    MissingHeader,
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown direction code {0}")]
    UnknownDirection(u8),
    #[error("declared length must be at least 1")]
    ZeroLength,
    #[error("expected body marker `B`, found {0:?}")]
    MissingBodyMarker(Option<String>),
    #[error("expected {expected} body lines, found {found}")]
    MissingSegment { expected: usize, found: usize },
    #[error("malformed body line {index}: {line:?}")]
    MalformedSegment { index: usize, line: String },
}

impl Snake {
    /// Encodes length, direction and body in the save format.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Replaces length, direction and body from save data.
    ///
    /// The head position follows the first body line. Colors are kept. On
    /// error the snake is left unchanged.
    pub fn deserialize(&mut self, text: &str) -> Result<(), SaveFormatError> {
        let (direction, body) = parse(text)?;
        self.direction = direction;
        self.body = body;
        Ok(())
    }
}

impl fmt::Display for Snake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{LENGTH_KEY}{},{DIRECTION_KEY}{}",
            self.len(),
            self.direction().code()
        )?;
        writeln!(f, "{BODY_MARKER}")?;
        for segment in self.segments() {
            f.write_str(SEGMENT_PREFIX)?;
            writeln!(f, "{},{}", segment.x, segment.y)?;
        }
        Ok(())
    }
}

impl FromStr for Snake {
    type Err = SaveFormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (direction, body) = parse(text)?;
        Snake::from_segments(body, direction).ok_or(SaveFormatError::ZeroLength)
    }
}

fn parse(text: &str) -> Result<(Direction, Vec<Position>), SaveFormatError> {
    let mut lines = text.lines();

    let header = lines.next().ok_or(SaveFormatError::MissingHeader)?;
    let (length, direction) = parse_header(header)?;

    match lines.next() {
        Some(BODY_MARKER) => {}
        other => return Err(SaveFormatError::MissingBodyMarker(other.map(str::to_owned))),
    }

    // The declared length is untrusted; the body grows only per line read.
    let mut body = Vec::new();
    for index in 0..length {
        let line = lines.next().ok_or(SaveFormatError::MissingSegment {
            expected: length,
            found: index,
        })?;
        body.push(parse_segment(index, line)?);
    }

    Ok((direction, body))
}

fn parse_header(line: &str) -> Result<(usize, Direction), SaveFormatError> {
    let malformed = || SaveFormatError::MalformedHeader(line.to_owned());

    let (length_field, direction_field) = line.split_once(',').ok_or_else(malformed)?;
    let length_text = length_field.strip_prefix(LENGTH_KEY).ok_or_else(malformed)?;
    let direction_text = direction_field
        .strip_prefix(DIRECTION_KEY)
        .ok_or_else(malformed)?;

    let length: usize = parse_number("length", length_text)?;
    if length == 0 {
        return Err(SaveFormatError::ZeroLength);
    }

    let code: u8 = parse_number("direction", direction_text)?;
    let direction = Direction::from_code(code).ok_or(SaveFormatError::UnknownDirection(code))?;

    Ok((length, direction))
}

fn parse_segment(index: usize, line: &str) -> Result<Position, SaveFormatError> {
    let malformed = || SaveFormatError::MalformedSegment {
        index,
        line: line.to_owned(),
    };

    let (x, y) = line
        .strip_prefix(SEGMENT_PREFIX)
        .and_then(|coords| coords.split_once(','))
        .ok_or_else(malformed)?;

    Ok(Position {
        x: parse_number("x", x)?,
        y: parse_number("y", y)?,
    })
}

/// Plain decimal only: `str::parse` would also take a leading `+`.
fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, SaveFormatError> {
    let invalid = || SaveFormatError::InvalidNumber {
        field,
        value: value.to_owned(),
    };

    if value.starts_with('+') {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;
    use crate::palette::PALETTE_VIOLET;
    use crate::snake::{Position, Snake};

    use super::SaveFormatError;

    const SAMPLE: &str = "L:2,D:0\nB\n b:5,5\n b:5,6\n";

    fn sample_snake() -> Snake {
        Snake::from_segments(
            vec![Position { x: 5, y: 5 }, Position { x: 5, y: 6 }],
            Direction::Up,
        )
        .expect("segments are non-empty")
    }

    #[test]
    fn serializes_exact_grammar() {
        assert_eq!(sample_snake().serialize(), SAMPLE);
    }

    #[test]
    fn serializes_negative_coordinates() {
        let snake = Snake::new(1, Position { x: -3, y: 0 }, Direction::Right);
        assert_eq!(snake.serialize(), "L:1,D:3\nB\n b:-3,0\n");
    }

    #[test]
    fn deserializes_sample() {
        let mut snake = Snake::new(7, Position { x: 0, y: 0 }, Direction::Left);
        snake.deserialize(SAMPLE).expect("sample should parse");

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.direction(), Direction::Up);
        assert_eq!(snake.body(), sample_snake().body());
        assert_eq!(snake.head(), Position { x: 5, y: 5 });
    }

    #[test]
    fn deserialize_keeps_palette() {
        let mut snake = Snake::new(1, Position { x: 0, y: 0 }, Direction::Left)
            .with_palette(PALETTE_VIOLET);
        snake.deserialize(SAMPLE).expect("sample should parse");

        assert_eq!(snake.palette(), Some(PALETTE_VIOLET));
    }

    #[test]
    fn round_trips_a_moved_and_grown_snake() {
        let mut snake = Snake::new(3, Position { x: 10, y: 10 }, Direction::Right);
        snake.move_forward();
        snake.turn(Direction::Down);
        snake.move_forward();
        snake.grow();

        let restored: Snake = snake.serialize().parse().expect("round trip should parse");

        assert_eq!(restored.len(), snake.len());
        assert_eq!(restored.direction(), snake.direction());
        assert_eq!(restored.body(), snake.body());
    }

    #[test]
    fn reads_only_the_declared_number_of_lines() {
        let text = "L:1,D:2\nB\n b:1,2\n b:3,4\n trailing garbage\n";
        let snake: Snake = text.parse().expect("extra lines are ignored");

        assert_eq!(snake.body(), &[Position { x: 1, y: 2 }]);
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let snake: Snake = "L:1,D:1\r\nB\r\n b:0,9\r\n"
            .parse()
            .expect("CRLF should parse");

        assert_eq!(snake.head(), Position { x: 0, y: 9 });
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            "".parse::<Snake>().unwrap_err(),
            SaveFormatError::MissingHeader
        );
    }

    #[test]
    fn rejects_non_numeric_length() {
        assert_eq!(
            "L:two,D:0\nB\n".parse::<Snake>().unwrap_err(),
            SaveFormatError::InvalidNumber {
                field: "length",
                value: "two".to_owned()
            }
        );
    }

    #[test]
    fn rejects_swapped_header_keys() {
        assert!(matches!(
            "D:0,L:1\nB\n b:0,0\n".parse::<Snake>(),
            Err(SaveFormatError::MalformedHeader(_))
        ));
    }

    #[test]
    fn rejects_unknown_direction_codes() {
        assert_eq!(
            "L:1,D:4\nB\n b:0,0\n".parse::<Snake>().unwrap_err(),
            SaveFormatError::UnknownDirection(4)
        );
        assert!(matches!(
            "L:1,D:-1\nB\n b:0,0\n".parse::<Snake>(),
            Err(SaveFormatError::InvalidNumber {
                field: "direction",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_length() {
        assert_eq!(
            "L:0,D:0\nB\n".parse::<Snake>().unwrap_err(),
            SaveFormatError::ZeroLength
        );
    }

    #[test]
    fn rejects_oversized_declared_length() {
        assert_eq!(
            "L:18446744073709551615,D:0\nB\n b:0,0\n"
                .parse::<Snake>()
                .unwrap_err(),
            SaveFormatError::MissingSegment {
                expected: usize::MAX,
                found: 1
            }
        );
        assert!(matches!(
            "L:100000000000,D:0\nB\n b:0,0\n".parse::<Snake>(),
            Err(SaveFormatError::MissingSegment { found: 1, .. })
        ));
    }

    #[test]
    fn rejects_explicit_plus_signs() {
        assert_eq!(
            "L:+1,D:0\nB\n b:0,0\n".parse::<Snake>().unwrap_err(),
            SaveFormatError::InvalidNumber {
                field: "length",
                value: "+1".to_owned()
            }
        );
        assert!(matches!(
            "L:1,D:0\nB\n b:+5,5\n".parse::<Snake>(),
            Err(SaveFormatError::InvalidNumber { field: "x", .. })
        ));
    }

    #[test]
    fn accepts_coordinate_extremes() {
        let snake: Snake = "L:2,D:3\nB\n b:2147483647,-2147483648\n b:0,0\n"
            .parse()
            .expect("i32 limits are valid coordinates");

        assert_eq!(
            snake.head(),
            Position {
                x: i32::MAX,
                y: i32::MIN
            }
        );
    }

    #[test]
    fn rejects_missing_body_marker() {
        assert_eq!(
            "L:1,D:0\n b:0,0\n".parse::<Snake>().unwrap_err(),
            SaveFormatError::MissingBodyMarker(Some(" b:0,0".to_owned()))
        );
        assert_eq!(
            "L:1,D:0\n".parse::<Snake>().unwrap_err(),
            SaveFormatError::MissingBodyMarker(None)
        );
    }

    #[test]
    fn rejects_short_body() {
        assert_eq!(
            "L:3,D:0\nB\n b:0,0\n".parse::<Snake>().unwrap_err(),
            SaveFormatError::MissingSegment {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_malformed_body_lines() {
        assert!(matches!(
            "L:1,D:0\nB\nb:0,0\n".parse::<Snake>(),
            Err(SaveFormatError::MalformedSegment { index: 0, .. })
        ));
        assert!(matches!(
            "L:1,D:0\nB\n b:0;0\n".parse::<Snake>(),
            Err(SaveFormatError::MalformedSegment { index: 0, .. })
        ));
        assert!(matches!(
            "L:1,D:0\nB\n b:0, 1\n".parse::<Snake>(),
            Err(SaveFormatError::InvalidNumber { field: "y", .. })
        ));
    }

    #[test]
    fn failed_deserialize_leaves_snake_untouched() {
        let mut snake = sample_snake();
        let before = snake.clone();

        assert!(snake.deserialize("L:2,D:1\nB\n b:9,9\n").is_err());
        assert_eq!(snake, before);
    }
}
