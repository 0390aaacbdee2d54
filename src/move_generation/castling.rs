//! Castling eligibility.
//!
//! Derived from the castled latch, move counts, occupancy, and the opponent's
//! threat set. The opponent's threats must have been generated for the
//! current position before this is queried.

use crate::chess_errors::MoveError;
use crate::game_state::chess_rules::*;
use crate::game_state::chess_types::{CastleRights, Color, PieceKind, Position};
use crate::game_state::position_index::PositionIndex;

/// Which castles `color` may perform right now.
pub fn can_castle(index: &PositionIndex, color: Color) -> Result<CastleRights, MoveError> {
    if index.has_castled(color) {
        return Ok(CastleRights::None);
    }

    let king = index.king(color)?;
    if king.has_moved() || king.position != back_rank_square(color, KING_START_FILE) {
        return Ok(CastleRights::None);
    }

    let kingside = side_is_open(
        index,
        color,
        KINGSIDE_ROOK_FILE,
        &KINGSIDE_EMPTY_FILES,
        &KINGSIDE_SAFE_FILES,
    );
    let queenside = side_is_open(
        index,
        color,
        QUEENSIDE_ROOK_FILE,
        &QUEENSIDE_EMPTY_FILES,
        &QUEENSIDE_SAFE_FILES,
    );

    Ok(CastleRights::from_sides(queenside, kingside))
}

fn side_is_open(
    index: &PositionIndex,
    color: Color,
    rook_file: i8,
    empty_files: &[i8],
    safe_files: &[i8],
) -> bool {
    let rook_ready = index
        .piece_at(back_rank_square(color, rook_file))
        .is_some_and(|rook| rook.kind == PieceKind::Rook && rook.color == color && !rook.has_moved());
    if !rook_ready {
        return false;
    }

    let enemy_threats = &index.threat_table(color.opposite()).threats;
    empty_files
        .iter()
        .all(|&file| !index.is_occupied(back_rank_square(color, file)))
        && safe_files
            .iter()
            .all(|&file| !enemy_threats.contains(&back_rank_square(color, file)))
}

/// King destinations granted by `rights`.
pub fn castle_destinations(color: Color, rights: CastleRights) -> Vec<Position> {
    let mut out = Vec::with_capacity(2);
    if rights.queenside() {
        out.push(back_rank_square(color, QUEENSIDE_KING_DEST_FILE));
    }
    if rights.kingside() {
        out.push(back_rank_square(color, KINGSIDE_KING_DEST_FILE));
    }
    out
}

/// For a two-file king move from the original square, the rook's origin and
/// destination squares.
pub fn castle_rook_squares(color: Color, king_from: Position, king_to: Position) -> Option<(Position, Position)> {
    if king_from != back_rank_square(color, KING_START_FILE) || king_to.rank() != color.back_rank() {
        return None;
    }
    match king_to.file() {
        KINGSIDE_KING_DEST_FILE => Some((
            back_rank_square(color, KINGSIDE_ROOK_FILE),
            back_rank_square(color, KINGSIDE_ROOK_DEST_FILE),
        )),
        QUEENSIDE_KING_DEST_FILE => Some((
            back_rank_square(color, QUEENSIDE_ROOK_FILE),
            back_rank_square(color, QUEENSIDE_ROOK_DEST_FILE),
        )),
        _ => None,
    }
}
