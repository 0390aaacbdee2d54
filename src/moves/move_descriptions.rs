//! Resolved move descriptors and the promotion-choice collaborator.
//!
//! A [`MoveRequest`] is fully disambiguated: it names the exact start and end
//! squares of a generated candidate. The notation layer that turns text into
//! a request lives outside this crate; inside it, requests are built from the
//! candidate lists with [`MoveRequest::from_candidate`].

use serde::{Deserialize, Serialize};

use crate::chess_errors::MoveError;
use crate::game_state::chess_types::{Color, PieceKind, Position};
use crate::game_state::position_index::PositionIndex;
use crate::move_generation::castling::castle_rook_squares;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub start: Position,
    pub end: Position,
    /// Where the rook lands when this request is a castle.
    pub castle_rook_end: Option<Position>,
    pub capture: bool,
    /// Kind a pawn becomes on its last rank. `None` defers to the chooser.
    pub promotion: Option<PieceKind>,
    pub pawn_move: bool,
    pub pawn_attack: bool,
}

impl MoveRequest {
    /// A plain move with every flag cleared.
    pub const fn new(start: Position, end: Position) -> Self {
        MoveRequest {
            start,
            end,
            castle_rook_end: None,
            capture: false,
            promotion: None,
            pawn_move: false,
            pawn_attack: false,
        }
    }

    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.castle_rook_end.is_some()
    }

    /// Describe moving the piece on `start` to `end`, filling in the flags
    /// from the current position.
    ///
    /// A two-file king move from its original square becomes a castle; a pawn
    /// moving diagonally onto an empty square is an en-passant capture.
    pub fn from_candidate(index: &PositionIndex, start: Position, end: Position) -> Result<Self, MoveError> {
        let piece = index
            .piece_at(start)
            .ok_or_else(|| MoveError::MalformedRequest(format!("no piece on {start}")))?;

        let mut request = MoveRequest::new(start, end);
        match piece.kind {
            PieceKind::King if (end.file() - start.file()).abs() == 2 => {
                let (_, rook_end) = castle_rook_squares(piece.color, start, end).ok_or_else(|| {
                    MoveError::MalformedRequest(format!("king on {start} cannot castle to {end}"))
                })?;
                request.castle_rook_end = Some(rook_end);
            }
            PieceKind::Pawn => {
                request.pawn_move = true;
                request.pawn_attack = end.file() != start.file();
            }
            _ => {}
        }

        request.capture = match index.owner_at(end) {
            Some(owner) => owner != piece.color,
            None => request.pawn_attack,
        };
        Ok(request)
    }
}

/// Answers which kind a pawn becomes when a request reaches the last rank
/// without naming one.
pub trait PromotionChooser {
    fn choose(&mut self, color: Color, square: Position) -> PieceKind;
}

/// A fixed answer.
impl PromotionChooser for PieceKind {
    fn choose(&mut self, _color: Color, _square: Position) -> PieceKind {
        *self
    }
}

impl<F> PromotionChooser for F
where
    F: FnMut(Color, Position) -> PieceKind,
{
    fn choose(&mut self, color: Color, square: Position) -> PieceKind {
        self(color, square)
    }
}
