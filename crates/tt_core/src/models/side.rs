use serde::{Deserialize, Serialize};

/// One of the two competitors in a match.
///
/// Every rule in the engine is symmetric in the two sides; code that branches
/// on `Side` must match exhaustively so a new variant can never slip through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// The other side of the table.
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}
