//! Move commitment with rollback.
//!
//! [`commit`] validates a request, mutates the index, re-checks the mover's
//! king and either keeps the result or restores the board before returning a
//! rejection. An accepted commit hands back a [`MoveTransaction`] holding the
//! undo record; [`MoveTransaction::revert`] restores the exact prior state.
//! Threat sets and candidate lists are not touched here; the caller
//! regenerates them after a commit it keeps.

use log::{debug, warn};

use crate::chess_errors::MoveError;
use crate::game_state::chess_types::{EnPassantState, PieceId, PieceKind, Position};
use crate::game_state::piece_record::Piece;
use crate::game_state::position_index::PositionIndex;
use crate::game_state::undo_state::{Capture, Promotion, RookLeg, UndoState};
use crate::move_generation::castling::castle_rook_squares;
use crate::move_generation::legal_move_checks::{would_expose_check, ScanDepth};
use crate::moves::move_descriptions::{MoveRequest, PromotionChooser};

/// An accepted move that can still be taken back.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an accepted move should be kept or reverted explicitly"]
pub struct MoveTransaction {
    undo: UndoState,
}

impl MoveTransaction {
    pub fn undo_state(&self) -> &UndoState {
        &self.undo
    }

    pub fn is_capture(&self) -> bool {
        self.undo.captured.is_some()
    }

    pub fn is_en_passant(&self) -> bool {
        self.undo
            .captured
            .as_ref()
            .is_some_and(|capture| capture.square != self.undo.destination)
    }

    pub fn is_castle(&self) -> bool {
        self.undo.rook_leg.is_some()
    }

    pub fn is_promotion(&self) -> bool {
        self.undo.promotion.is_some()
    }

    /// Undo the move: promotion, rook leg, mover, captured piece, then the
    /// en-passant state and castle latch.
    pub fn revert(self, index: &mut PositionIndex) -> Result<(), MoveError> {
        let undo = self.undo;

        if let Some(promotion) = undo.promotion {
            lift_expected(index, promotion.promoted, undo.destination)?;
            index.pop_piece(promotion.promoted)?;
            index.restore_to_arena(promotion.pawn_id, promotion.pawn)?;
            index.place(promotion.pawn_id, undo.destination)?;
        }

        if let Some(leg) = undo.rook_leg {
            relocate(index, leg.rook, leg.to, leg.from)?;
            unbump(index, leg.rook)?;
        }

        relocate(index, undo.mover, undo.destination, undo.origin)?;
        unbump(index, undo.mover)?;

        if let Some(capture) = undo.captured {
            index.restore_to_arena(capture.id, capture.piece)?;
            index.place(capture.id, capture.square)?;
        }

        index.set_en_passant(undo.prev_en_passant);
        index.set_castled(undo.color, undo.prev_castled);
        Ok(())
    }
}

/// Apply `request` if it is legal.
///
/// Ordinary rejections leave the index exactly as it was. The pawn
/// promotion kind comes from `request.promotion` or, when absent, from
/// `chooser`; an answer that is not a promotion target becomes a queen.
pub fn commit(
    index: &mut PositionIndex,
    request: &MoveRequest,
    chooser: &mut dyn PromotionChooser,
) -> Result<MoveTransaction, MoveError> {
    let (start, end) = (request.start, request.end);
    let mover_id = index
        .piece_id_at(start)
        .ok_or_else(|| MoveError::MalformedRequest(format!("no piece on {start}")))?;
    let mover = index.live_piece(mover_id)?;
    let (color, kind) = (mover.color, mover.kind);
    let enemy = color.opposite();

    if start == end || !mover.candidates.contains(&end) {
        return Err(MoveError::MalformedRequest(format!(
            "{end} is not a candidate destination of the {kind:?} on {start}"
        )));
    }

    // Pre-mutation rejections.
    if kind == PieceKind::King && index.threat_table(enemy).covers(end) {
        debug!("rejected {start}{end}: king destination is covered by {enemy}");
        return Err(MoveError::IllegalKingMove { destination: end });
    }
    if index.owner_at(end) == Some(color) {
        debug!("rejected {start}{end}: own piece on destination");
        return Err(MoveError::OwnPieceCapture { destination: end });
    }

    let rook_leg = if kind == PieceKind::King && (end.file() - start.file()).abs() == 2 {
        let (from, to) = castle_rook_squares(color, start, end)
            .ok_or_else(|| MoveError::MalformedRequest(format!("king on {start} cannot castle to {end}")))?;
        if request.castle_rook_end.is_some_and(|rook_end| rook_end != to) {
            return Err(MoveError::MalformedRequest(format!(
                "castle to {end} moves the rook to {to}"
            )));
        }
        let rook = index
            .piece_id_at(from)
            .filter(|&id| {
                index
                    .piece(id)
                    .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color)
            })
            .ok_or_else(|| MoveError::MalformedRequest(format!("no rook on {from} to castle with")))?;
        Some(RookLeg { rook, from, to })
    } else {
        None
    };

    let capture_square = if index.is_occupied(end) {
        Some(end)
    } else if kind == PieceKind::Pawn && end.file() != start.file() {
        let victim = Position::new(end.file(), start.rank())
            .filter(|&square| index.en_passant().target == Some(square))
            .ok_or_else(|| MoveError::MalformedRequest(format!("no en-passant capture onto {end}")))?;
        Some(victim)
    } else {
        None
    };

    let prev_en_passant = index.en_passant();
    let prev_castled = index.has_castled(color);

    // Apply.
    let captured = match capture_square {
        Some(square) => {
            let id = index
                .lift(square)
                .ok_or_else(|| MoveError::InvariantViolation(format!("capture square {square} is empty")))?;
            Some((id, square))
        }
        None => None,
    };
    relocate(index, mover_id, start, end)?;
    bump(index, mover_id)?;
    if let Some(leg) = rook_leg {
        relocate(index, leg.rook, leg.from, leg.to)?;
        bump(index, leg.rook)?;
    }

    // Validate against the position after the move.
    let king_square = if kind == PieceKind::King {
        end
    } else {
        index.king_position(color)?
    };
    if would_expose_check(index, color, king_square, ScanDepth::Full) {
        roll_back(index, mover_id, start, end, captured, rook_leg)?;
        debug!("rejected {start}{end}: {color} king on {king_square} would be in check");
        return Err(MoveError::RevealedCheck);
    }

    let captured = match captured {
        Some((id, square)) => {
            if index.piece(id).is_some_and(|p| p.kind == PieceKind::King) {
                roll_back(index, mover_id, start, end, Some((id, square)), rook_leg)?;
                return Err(MoveError::InvariantViolation(format!(
                    "{start}{end} would capture the king on {square}"
                )));
            }
            let piece = index.take_from_arena(id)?;
            Some(Capture { id, square, piece })
        }
        None => None,
    };

    let double_step = kind == PieceKind::Pawn && (end.rank() - start.rank()).abs() == 2;
    index.set_en_passant(EnPassantState {
        target: double_step.then_some(end),
    });
    if rook_leg.is_some() {
        index.set_castled(color, true);
    }

    let promotion = if kind == PieceKind::Pawn && end.rank() == color.last_rank() {
        let choice = request.promotion.unwrap_or_else(|| chooser.choose(color, end));
        let promote_to = if choice.is_promotion_target() {
            choice
        } else {
            warn!("cannot promote to {choice:?} on {end}, using a queen");
            PieceKind::Queen
        };
        Some(promote(index, mover_id, end, promote_to)?)
    } else {
        None
    };

    Ok(MoveTransaction {
        undo: UndoState {
            mover: mover_id,
            color,
            origin: start,
            destination: end,
            captured,
            rook_leg,
            promotion,
            prev_en_passant,
            prev_castled,
        },
    })
}

fn promote(index: &mut PositionIndex, pawn_id: PieceId, square: Position, kind: PieceKind) -> Result<Promotion, MoveError> {
    lift_expected(index, pawn_id, square)?;
    let pawn = index.take_from_arena(pawn_id)?;
    let mut replacement = Piece::new(kind, pawn.color, square);
    replacement.move_count = 1;
    let promoted = index.push_piece(replacement);
    index.place(promoted, square)?;
    Ok(Promotion {
        pawn_id,
        pawn,
        promoted,
    })
}

/// Reverse the apply step of a commit that was never accepted.
fn roll_back(
    index: &mut PositionIndex,
    mover: PieceId,
    start: Position,
    end: Position,
    captured: Option<(PieceId, Position)>,
    rook_leg: Option<RookLeg>,
) -> Result<(), MoveError> {
    if let Some(leg) = rook_leg {
        relocate(index, leg.rook, leg.to, leg.from)?;
        unbump(index, leg.rook)?;
    }
    relocate(index, mover, end, start)?;
    unbump(index, mover)?;
    if let Some((id, square)) = captured {
        index.place(id, square)?;
    }
    Ok(())
}

fn lift_expected(index: &mut PositionIndex, id: PieceId, square: Position) -> Result<(), MoveError> {
    match index.lift(square) {
        Some(found) if found == id => Ok(()),
        found => Err(MoveError::InvariantViolation(format!(
            "expected {id:?} on {square}, found {found:?}"
        ))),
    }
}

fn relocate(index: &mut PositionIndex, id: PieceId, from: Position, to: Position) -> Result<(), MoveError> {
    lift_expected(index, id, from)?;
    index.place(id, to)
}

fn bump(index: &mut PositionIndex, id: PieceId) -> Result<(), MoveError> {
    index.live_piece_mut(id)?.move_count += 1;
    Ok(())
}

fn unbump(index: &mut PositionIndex, id: PieceId) -> Result<(), MoveError> {
    let piece = index.live_piece_mut(id)?;
    piece.move_count = piece
        .move_count
        .checked_sub(1)
        .ok_or_else(|| MoveError::InvariantViolation(format!("move count of {id:?} went negative")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{Color, PlacedPiece};
    use crate::move_generation::move_generator::{generate_moves_for, generate_threats_for};

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).expect("valid square")
    }

    fn prepared(pieces: &[(&str, Color, PieceKind)], side: Color) -> PositionIndex {
        let placements: Vec<_> = pieces
            .iter()
            .map(|&(name, color, kind)| PlacedPiece::new(sq(name), color, kind))
            .collect();
        let mut index = PositionIndex::from_placements(&placements).expect("valid position");
        generate_threats_for(&mut index, side.opposite()).expect("threats");
        generate_moves_for(&mut index, side).expect("moves");
        index
    }

    fn request(index: &PositionIndex, from: &str, to: &str) -> MoveRequest {
        MoveRequest::from_candidate(index, sq(from), sq(to)).expect("request")
    }

    #[test]
    fn capture_commits_and_reverts_exactly() {
        let mut index = prepared(
            &[
                ("e1", Color::White, PieceKind::King),
                ("e8", Color::Black, PieceKind::King),
                ("d1", Color::White, PieceKind::Queen),
                ("d7", Color::Black, PieceKind::Knight),
            ],
            Color::White,
        );
        let before = index.clone();

        let mv = request(&index, "d1", "d7");
        let tx = commit(&mut index, &mv, &mut PieceKind::Queen).expect("legal capture");
        assert!(tx.is_capture());
        assert_eq!(index.owner_at(sq("d7")), Some(Color::White));
        assert_eq!(index.piece_count(), 3);

        tx.revert(&mut index).expect("revert");
        assert_eq!(index, before);
    }

    #[test]
    fn revealed_check_is_rolled_back() {
        let mut index = prepared(
            &[
                ("e1", Color::White, PieceKind::King),
                ("e2", Color::White, PieceKind::Knight),
                ("e8", Color::Black, PieceKind::Rook),
                ("a8", Color::Black, PieceKind::King),
            ],
            Color::White,
        );
        let before = index.clone();
        let mv = request(&index, "e2", "c3");
        assert_eq!(
            commit(&mut index, &mv, &mut PieceKind::Queen),
            Err(MoveError::RevealedCheck)
        );
        assert_eq!(index, before);
    }

    #[test]
    fn king_cannot_take_a_defended_piece() {
        let mut index = prepared(
            &[
                ("e1", Color::White, PieceKind::King),
                ("e2", Color::Black, PieceKind::Pawn),
                ("e3", Color::Black, PieceKind::Rook),
                ("a8", Color::Black, PieceKind::King),
            ],
            Color::White,
        );
        let mv = request(&index, "e1", "e2");
        assert_eq!(
            commit(&mut index, &mv, &mut PieceKind::Queen),
            Err(MoveError::IllegalKingMove { destination: sq("e2") })
        );
    }

    #[test]
    fn non_candidate_destination_is_malformed() {
        let mut index = prepared(
            &[
                ("e1", Color::White, PieceKind::King),
                ("e8", Color::Black, PieceKind::King),
                ("a1", Color::White, PieceKind::Rook),
            ],
            Color::White,
        );
        let before = index.clone();
        let mv = MoveRequest::new(sq("a1"), sq("b2"));
        assert!(matches!(
            commit(&mut index, &mv, &mut PieceKind::Queen),
            Err(MoveError::MalformedRequest(_))
        ));
        assert_eq!(index, before);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn_and_reverts() {
        let mut index = PositionIndex::from_placements(&[
            PlacedPiece::new(sq("e1"), Color::White, PieceKind::King),
            PlacedPiece::new(sq("e8"), Color::Black, PieceKind::King),
            PlacedPiece::new(sq("e5"), Color::White, PieceKind::Pawn),
            PlacedPiece::new(sq("d5"), Color::Black, PieceKind::Pawn),
        ])
        .expect("valid position");
        index.set_en_passant(EnPassantState {
            target: Some(sq("d5")),
        });
        generate_threats_for(&mut index, Color::Black).expect("threats");
        generate_moves_for(&mut index, Color::White).expect("moves");
        let before = index.clone();

        let mv = request(&index, "e5", "d6");
        let tx = commit(&mut index, &mv, &mut PieceKind::Queen).expect("en passant");
        assert!(tx.is_en_passant());
        assert!(!index.is_occupied(sq("d5")));
        assert_eq!(index.en_passant(), EnPassantState::default());

        tx.revert(&mut index).expect("revert");
        assert_eq!(index, before);
    }

    #[test]
    fn castle_moves_the_rook_and_latches() {
        let mut index = prepared(
            &[
                ("e1", Color::White, PieceKind::King),
                ("h1", Color::White, PieceKind::Rook),
                ("e8", Color::Black, PieceKind::King),
            ],
            Color::White,
        );
        let before = index.clone();

        let mv = request(&index, "e1", "g1");
        assert!(mv.is_castle());
        let tx = commit(&mut index, &mv, &mut PieceKind::Queen).expect("castle");
        assert_eq!(index.piece_at(sq("f1")).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(index.has_castled(Color::White));

        tx.revert(&mut index).expect("revert");
        assert_eq!(index, before);
    }

    #[test]
    fn promotion_asks_the_chooser_and_reverts() {
        let mut index = prepared(
            &[
                ("e1", Color::White, PieceKind::King),
                ("h8", Color::Black, PieceKind::King),
                ("a7", Color::White, PieceKind::Pawn),
            ],
            Color::White,
        );
        let before = index.clone();

        let mv = request(&index, "a7", "a8");
        let mut asked = 0;
        let mut chooser = |_color: Color, _square: Position| {
            asked += 1;
            PieceKind::Knight
        };
        let tx = commit(&mut index, &mv, &mut chooser).expect("promotion");
        assert_eq!(asked, 1);
        let promoted = index.piece_at(sq("a8")).expect("promoted piece");
        assert_eq!((promoted.kind, promoted.move_count), (PieceKind::Knight, 1));

        tx.revert(&mut index).expect("revert");
        assert_eq!(index, before);

        let invalid = commit(&mut index, &mv, &mut PieceKind::King).expect("promotion");
        assert_eq!(index.piece_at(sq("a8")).map(|p| p.kind), Some(PieceKind::Queen));
        invalid.revert(&mut index).expect("revert");
    }
}
