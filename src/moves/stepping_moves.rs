//! One-shot offsets for knights and kings.

use crate::game_state::chess_types::{Offset, PieceKind, Position};
use crate::game_state::piece_record::Piece;
use crate::game_state::position_index::{PositionIndex, ThreatTable};

pub const KNIGHT_OFFSETS: [Offset; 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

pub const KING_OFFSETS: [Offset; 8] = [
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

pub const fn step_offsets(kind: PieceKind) -> &'static [Offset] {
    match kind {
        PieceKind::Knight => &KNIGHT_OFFSETS,
        PieceKind::King => &KING_OFFSETS,
        _ => &[],
    }
}

/// On-board targets that are empty or hold an enemy piece.
pub fn step_moves(index: &PositionIndex, piece: &Piece, out: &mut Vec<Position>) {
    for &offset in step_offsets(piece.kind) {
        let Some(target) = piece.position.offset(offset) else {
            continue;
        };
        if index.owner_at(target) != Some(piece.color) {
            out.push(target);
        }
    }
}

pub fn step_threats(index: &PositionIndex, piece: &Piece, table: &mut ThreatTable) {
    for &offset in step_offsets(piece.kind) {
        let Some(target) = piece.position.offset(offset) else {
            continue;
        };
        if index.owner_at(target) == Some(piece.color) {
            table.defences.insert(target);
        } else {
            table.threats.insert(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{Color, PlacedPiece};

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).expect("valid square")
    }

    #[test]
    fn corner_knight_has_two_targets() {
        let index = PositionIndex::from_placements(&[
            PlacedPiece::new(sq("e1"), Color::White, PieceKind::King),
            PlacedPiece::new(sq("e8"), Color::Black, PieceKind::King),
            PlacedPiece::new(sq("a1"), Color::White, PieceKind::Knight),
            PlacedPiece::new(sq("c2"), Color::White, PieceKind::Pawn),
        ])
        .expect("valid position");
        let knight = index.piece_at(sq("a1")).expect("knight");

        let mut out = Vec::new();
        step_moves(&index, knight, &mut out);
        assert_eq!(out, vec![sq("b3")]);

        let mut table = ThreatTable::default();
        step_threats(&index, knight, &mut table);
        assert!(table.threats.contains(&sq("b3")));
        assert!(table.defences.contains(&sq("c2")));
    }
}
