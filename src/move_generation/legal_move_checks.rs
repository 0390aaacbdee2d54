//! Check detection.
//!
//! `is_attacked` and `is_checked` answer from the generated threat sets.
//! `would_expose_check` ignores the threat sets and scans the board directly,
//! so it stays correct in the middle of a commit, after occupancy changed but
//! before any regeneration.

use crate::chess_errors::MoveError;
use crate::game_state::chess_types::{Color, PieceKind, Position};
use crate::game_state::position_index::PositionIndex;
use crate::moves::sliding_moves::{DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS};
use crate::moves::stepping_moves::KNIGHT_OFFSETS;

/// How much of the attacker set `would_expose_check` looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDepth {
    /// Rooks, bishops and queens only. A vacated square can only unblock these.
    Sliding,
    /// Sliders plus knights and pawns.
    Full,
}

#[inline]
pub fn is_attacked(index: &PositionIndex, square: Position, by: Color) -> bool {
    index.threat_table(by).threats.contains(&square)
}

/// Whether `color`'s king stands on a square the opponent threatens.
pub fn is_checked(index: &PositionIndex, color: Color) -> Result<bool, MoveError> {
    let king = index.king_position(color)?;
    Ok(is_attacked(index, king, color.opposite()))
}

/// Whether a piece of `owner` standing on `square` would be attacked, judged
/// from current occupancy.
pub fn would_expose_check(index: &PositionIndex, owner: Color, square: Position, depth: ScanDepth) -> bool {
    let enemy = owner.opposite();

    let ray_hits = |directions: &[(i8, i8)], attackers: [PieceKind; 2]| {
        directions.iter().any(|&direction| {
            let mut next = square.offset(direction);
            while let Some(probe) = next {
                if let Some(piece) = index.piece_at(probe) {
                    return piece.color == enemy && attackers.contains(&piece.kind);
                }
                next = probe.offset(direction);
            }
            false
        })
    };

    if ray_hits(&ORTHOGONAL_DIRECTIONS[..], [PieceKind::Rook, PieceKind::Queen])
        || ray_hits(&DIAGONAL_DIRECTIONS[..], [PieceKind::Bishop, PieceKind::Queen])
    {
        return true;
    }

    if depth == ScanDepth::Sliding {
        return false;
    }

    let enemy_on = |offset: (i8, i8), kind: PieceKind| {
        square
            .offset(offset)
            .and_then(|probe| index.piece_at(probe))
            .is_some_and(|piece| piece.color == enemy && piece.kind == kind)
    };

    KNIGHT_OFFSETS.iter().any(|&offset| enemy_on(offset, PieceKind::Knight))
        || [-1, 1]
            .into_iter()
            .any(|df| enemy_on((df, owner.forward()), PieceKind::Pawn))
}
