//! Ray walking for bishops, rooks and queens.

use crate::game_state::chess_types::{Offset, PieceKind, Position};
use crate::game_state::piece_record::Piece;
use crate::game_state::position_index::{PositionIndex, ThreatTable};

pub const ORTHOGONAL_DIRECTIONS: [Offset; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL_DIRECTIONS: [Offset; 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
pub const QUEEN_DIRECTIONS: [Offset; 8] = [
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

/// Direction vectors walked repeatedly by a sliding kind. Empty for the rest.
pub const fn slide_directions(kind: PieceKind) -> &'static [Offset] {
    match kind {
        PieceKind::Bishop => &DIAGONAL_DIRECTIONS,
        PieceKind::Rook => &ORTHOGONAL_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        _ => &[],
    }
}

/// Empty squares along each ray, plus the first occupied square if it holds
/// an enemy piece.
pub fn sliding_moves(index: &PositionIndex, piece: &Piece, out: &mut Vec<Position>) {
    for &direction in slide_directions(piece.kind) {
        let mut next = piece.position.offset(direction);
        while let Some(square) = next {
            match index.owner_at(square) {
                None => out.push(square),
                Some(owner) => {
                    if owner != piece.color {
                        out.push(square);
                    }
                    break;
                }
            }
            next = square.offset(direction);
        }
    }
}

/// Every square along each ray up to the first blocker. An own blocker is a
/// defence; an enemy blocker is a threat, and an enemy piece directly behind
/// it is recorded as a pinner.
pub fn sliding_threats(index: &PositionIndex, piece: &Piece, table: &mut ThreatTable) {
    for &direction in slide_directions(piece.kind) {
        let mut next = piece.position.offset(direction);
        while let Some(square) = next {
            match index.owner_at(square) {
                None => {
                    table.threats.insert(square);
                }
                Some(owner) if owner == piece.color => {
                    table.defences.insert(square);
                    break;
                }
                Some(_) => {
                    table.threats.insert(square);
                    if let Some(behind) = square.offset(direction) {
                        if index.owner_at(behind).is_some_and(|o| o != piece.color) {
                            table.pinners.insert(behind);
                        }
                    }
                    break;
                }
            }
            next = square.offset(direction);
        }
    }
}
