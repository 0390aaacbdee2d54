use crate::game_state::chess_types::{Color, EnPassantState, PieceId, Position};
use crate::game_state::piece_record::Piece;

/// A piece taken off the board by a committed move.
///
/// `square` is where the piece stood, which differs from the mover's
/// destination for an en-passant capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub id: PieceId,
    pub square: Position,
    pub piece: Piece,
}

/// The rook leg of a castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RookLeg {
    pub rook: PieceId,
    pub from: Position,
    pub to: Position,
}

/// The pawn destroyed by a promotion and the piece created in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub pawn_id: PieceId,
    pub pawn: Piece,
    pub promoted: PieceId,
}

/// Single undo record for `commit` / `revert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub mover: PieceId,
    pub color: Color,
    pub origin: Position,
    pub destination: Position,
    pub captured: Option<Capture>,
    pub rook_leg: Option<RookLeg>,
    pub promotion: Option<Promotion>,

    pub prev_en_passant: EnPassantState,
    pub prev_castled: bool,
}
