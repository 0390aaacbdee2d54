//! King steps plus castle destinations.

use crate::chess_errors::MoveError;
use crate::game_state::chess_types::Position;
use crate::game_state::piece_record::Piece;
use crate::game_state::position_index::PositionIndex;
use crate::move_generation::castling::{can_castle, castle_destinations};
use crate::moves::stepping_moves::step_moves;

/// One-square steps, then any castle the evaluator grants. The opponent's
/// threat set must be current.
pub fn king_moves(index: &PositionIndex, piece: &Piece, out: &mut Vec<Position>) -> Result<(), MoveError> {
    step_moves(index, piece, out);
    let rights = can_castle(index, piece.color)?;
    out.extend(castle_destinations(piece.color, rights));
    Ok(())
}
