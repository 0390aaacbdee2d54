use crate::game_state::chess_types::{Color, PieceKind, Position};

/// A piece on the board together with its current candidate destinations.
///
/// `move_count` doubles as the "has moved" flag (castling) and, for pawns,
/// as the double-step guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Position,
    pub move_count: u32,
    /// Pseudo-legal destinations from the last generation pass.
    pub candidates: Vec<Position>,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, position: Position) -> Self {
        Piece {
            kind,
            color,
            position,
            move_count: 0,
            candidates: Vec::new(),
        }
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }
}
