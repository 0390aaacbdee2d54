//! Position classification by exhaustive trial commits.
//!
//! Every candidate of the side to move is committed and immediately reverted.
//! The index is left exactly as it was found whichever path is taken; a fatal
//! error is the only way out of the loop without a revert.

use crate::chess_errors::MoveError;
use crate::game_state::chess_types::{Color, GameStatus, PieceKind};
use crate::game_state::position_index::PositionIndex;
use crate::move_generation::legal_move_apply::commit;
use crate::move_generation::legal_move_checks::is_checked;
use crate::moves::move_descriptions::MoveRequest;

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Classify the position for `side`.
///
/// Requires the opponent's threat set and `side`'s candidate lists to be
/// current for this position.
pub fn classify(index: &mut PositionIndex, side: Color) -> Result<GameStatus, MoveError> {
    let in_check = is_checked(index, side)?;
    let has_legal = has_legal_move(index, side)?;
    Ok(GameStatus::from_flags(in_check, has_legal))
}

/// Stops at the first accepted commit.
pub fn has_legal_move(index: &mut PositionIndex, side: Color) -> Result<bool, MoveError> {
    let mut found = false;
    trial_commits(index, side, |_| {
        found = true;
        false
    })?;
    Ok(found)
}

/// Every legal move for `side`. A promotion appears once per promotion kind.
pub fn legal_moves(index: &mut PositionIndex, side: Color) -> Result<Vec<MoveRequest>, MoveError> {
    let mut moves = Vec::new();
    trial_commits(index, side, |request| {
        if request.promotion.is_some() {
            moves.extend(PROMOTION_KINDS.map(|kind| request.with_promotion(kind)));
        } else {
            moves.push(request);
        }
        true
    })?;
    Ok(moves)
}

/// Commit and revert each candidate of `side`, handing accepted requests to
/// `on_legal` until it returns false. A promoting request is reported with a
/// queen promotion filled in.
fn trial_commits<F>(index: &mut PositionIndex, side: Color, mut on_legal: F) -> Result<(), MoveError>
where
    F: FnMut(MoveRequest) -> bool,
{
    for id in index.pieces_of(side) {
        let piece = index.live_piece(id)?;
        let start = piece.position;
        let promotes = piece.kind == PieceKind::Pawn;
        let candidates = piece.candidates.clone();

        for end in candidates {
            let mut request = MoveRequest::from_candidate(index, start, end)?;
            if promotes && end.rank() == side.last_rank() {
                request = request.with_promotion(PieceKind::Queen);
            }
            match commit(index, &request, &mut PieceKind::Queen) {
                Ok(tx) => {
                    tx.revert(index)?;
                    if !on_legal(request) {
                        return Ok(());
                    }
                }
                Err(err) if err.is_rejection() => {}
                Err(err) => return Err(err),
            }
        }
    }
    Ok(())
}
