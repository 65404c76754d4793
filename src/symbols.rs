// Spoken vocabulary for directions and preset commands
//
// Directives carry free-form tokens ("go left", "north east", "spin").
// Each symbol owns a synonym list; reverse lookup tables are built once
// and consulted in the context of the caller (move, rotate, command).

use std::collections::HashMap;
use std::sync::LazyLock;

/// Directional symbols understood by the motion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
    RotateLeft,
    RotateRight,
    Stop,
}

impl Direction {
    pub const ALL: [Direction; 11] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
        Direction::ForwardLeft,
        Direction::ForwardRight,
        Direction::BackwardLeft,
        Direction::BackwardRight,
        Direction::RotateLeft,
        Direction::RotateRight,
        Direction::Stop,
    ];

    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Direction::Forward => &["forward", "forwards", "go forward", "north"],
            Direction::Backward => &["back", "backward", "backwards", "go backward", "south"],
            Direction::Left => &["left", "go left", "east"],
            Direction::Right => &["right", "go right", "west"],
            Direction::ForwardLeft => &["north west", "forward left"],
            Direction::ForwardRight => &["north east", "forward right"],
            Direction::BackwardLeft => &["south west", "backward left"],
            Direction::BackwardRight => &["south east", "backward right"],
            Direction::RotateLeft => &["left", "counterclockwise", "anticlockwise"],
            Direction::RotateRight => &["right", "clockwise"],
            Direction::Stop => &["stop", "brake"],
        }
    }

    /// First synonym, the token a directive would normally carry
    pub fn canonical_token(self) -> &'static str {
        self.synonyms()[0]
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, Direction::RotateLeft | Direction::RotateRight)
    }

    /// Resolve a token in move context (translations and stop)
    pub fn resolve_move(token: &str) -> Option<Direction> {
        lookup(&*MOVE_TABLE, token)
    }

    /// Resolve a token in rotate context
    ///
    /// The plain left/right vocabulary also counts as a rotation here.
    pub fn resolve_rotation(token: &str) -> Option<Direction> {
        lookup(&*ROTATE_TABLE, token)
    }
}

/// Named multi-step presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveCircle,
    MoveSquare,
    Patrol,
    Shoot,
    Take,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::MoveCircle,
        Command::MoveSquare,
        Command::Patrol,
        Command::Shoot,
        Command::Take,
    ];

    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Command::MoveCircle => &["circle", "spin"],
            Command::MoveSquare => &["square"],
            Command::Patrol => &["patrol"],
            Command::Shoot => &["shoot"],
            Command::Take => &["take"],
        }
    }

    pub fn resolve(token: &str) -> Option<Command> {
        lookup(&*COMMAND_TABLE, token)
    }
}

static MOVE_TABLE: LazyLock<HashMap<&'static str, Direction>> = LazyLock::new(|| {
    build_table(
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_rotation())
            .map(|d| (d, d)),
    )
});

static ROTATE_TABLE: LazyLock<HashMap<&'static str, Direction>> = LazyLock::new(|| {
    build_table([
        (Direction::RotateLeft, Direction::RotateLeft),
        (Direction::RotateRight, Direction::RotateRight),
        (Direction::Left, Direction::RotateLeft),
        (Direction::Right, Direction::RotateRight),
    ])
});

static COMMAND_TABLE: LazyLock<HashMap<&'static str, Command>> = LazyLock::new(|| {
    Command::ALL
        .into_iter()
        .flat_map(|c| c.synonyms().iter().map(move |&token| (token, c)))
        .collect()
});

// Maps every synonym of `source` onto `target`
fn build_table(
    entries: impl IntoIterator<Item = (Direction, Direction)>,
) -> HashMap<&'static str, Direction> {
    let mut table = HashMap::new();
    for (source, target) in entries {
        for &token in source.synonyms() {
            table.entry(token).or_insert(target);
        }
    }
    table
}

fn lookup<T: Copy>(table: &HashMap<&'static str, T>, token: &str) -> Option<T> {
    let normalized = token.trim().to_ascii_lowercase();
    table.get(normalized.as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_context_prefers_strafing() {
        assert_eq!(Direction::resolve_move("left"), Some(Direction::Left));
        assert_eq!(Direction::resolve_move("right"), Some(Direction::Right));
        assert_eq!(Direction::resolve_move("north east"), Some(Direction::ForwardRight));
        assert_eq!(Direction::resolve_move("brake"), Some(Direction::Stop));
    }

    #[test]
    fn test_move_context_has_no_rotation_only_tokens() {
        assert_eq!(Direction::resolve_move("clockwise"), None);
        assert_eq!(Direction::resolve_move("anticlockwise"), None);
    }

    #[test]
    fn test_rotate_context() {
        assert_eq!(Direction::resolve_rotation("left"), Some(Direction::RotateLeft));
        assert_eq!(Direction::resolve_rotation("east"), Some(Direction::RotateLeft));
        assert_eq!(Direction::resolve_rotation("clockwise"), Some(Direction::RotateRight));
        assert_eq!(Direction::resolve_rotation("forward"), None);
    }

    #[test]
    fn test_lookup_is_case_and_space_insensitive() {
        assert_eq!(Direction::resolve_move("  Go Forward "), Some(Direction::Forward));
        assert_eq!(Command::resolve("SPIN"), Some(Command::MoveCircle));
    }

    #[test]
    fn test_every_synonym_resolves_in_its_context() {
        for direction in Direction::ALL {
            for token in direction.synonyms() {
                let resolved = if direction.is_rotation() {
                    Direction::resolve_rotation(token)
                } else {
                    Direction::resolve_move(token)
                };
                assert_eq!(resolved, Some(direction), "token {:?}", token);
            }
        }
        for command in Command::ALL {
            for token in command.synonyms() {
                assert_eq!(Command::resolve(token), Some(command));
            }
        }
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(Direction::resolve_move("sideways"), None);
        assert_eq!(Command::resolve("dance"), None);
    }
}
