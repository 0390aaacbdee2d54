//! Canonical chess-rule constants.
//!
//! Original squares of the castling pieces, castle destinations and the
//! standard starting layout.

use crate::game_state::chess_types::{Color, PieceKind, PlacedPiece, Position};

pub const KING_START_FILE: i8 = 5;
pub const KINGSIDE_ROOK_FILE: i8 = 8;
pub const QUEENSIDE_ROOK_FILE: i8 = 1;

/// Files the king lands on when castling.
pub const KINGSIDE_KING_DEST_FILE: i8 = 7;
pub const QUEENSIDE_KING_DEST_FILE: i8 = 3;

/// Files the rook lands on when castling.
pub const KINGSIDE_ROOK_DEST_FILE: i8 = 6;
pub const QUEENSIDE_ROOK_DEST_FILE: i8 = 4;

/// Squares that must be empty between king and rook.
pub const KINGSIDE_EMPTY_FILES: [i8; 2] = [6, 7];
pub const QUEENSIDE_EMPTY_FILES: [i8; 3] = [2, 3, 4];

/// Squares the king crosses; they must not be in the opponent's threat set.
/// The queenside rook's transit square (b-file) only needs to be empty.
pub const KINGSIDE_SAFE_FILES: [i8; 2] = [6, 7];
pub const QUEENSIDE_SAFE_FILES: [i8; 2] = [3, 4];

const BACK_RANK_ORDER: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Square on `color`'s back rank at `file`.
#[inline]
pub const fn back_rank_square(color: Color, file: i8) -> Position {
    Position::from_coords(file, color.back_rank())
}

/// Rank a pawn of `color` starts on.
#[inline]
pub const fn pawn_home_rank(color: Color) -> i8 {
    color.back_rank() + color.forward()
}

/// The 32 pieces of the standard starting position, white first.
pub fn standard_layout() -> Vec<PlacedPiece> {
    let mut layout = Vec::with_capacity(32);
    for color in [Color::White, Color::Black] {
        for (file, kind) in (1..=8).zip(BACK_RANK_ORDER) {
            layout.push(PlacedPiece::new(back_rank_square(color, file), color, kind));
        }
        for file in 1..=8 {
            layout.push(PlacedPiece::new(
                Position::from_coords(file, pawn_home_rank(color)),
                color,
                PieceKind::Pawn,
            ));
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_has_one_king_per_side() {
        let layout = standard_layout();
        assert_eq!(layout.len(), 32);
        for color in [Color::White, Color::Black] {
            let kings: Vec<_> = layout
                .iter()
                .filter(|p| p.color == color && p.kind == PieceKind::King)
                .collect();
            assert_eq!(kings.len(), 1);
            assert_eq!(kings[0].position, back_rank_square(color, KING_START_FILE));
        }
    }

    #[test]
    fn pawns_start_in_front_of_the_back_rank() {
        assert_eq!(pawn_home_rank(Color::White), 2);
        assert_eq!(pawn_home_rank(Color::Black), 7);
    }
}
