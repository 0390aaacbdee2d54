//! Errors used throughout the rules engine.
//!
//! Two error types exist because the two entry points fail in different ways:
//!
//! - [`MoveError`] is returned by move commitment and the turn loop. Most of
//!   its variants are ordinary rejections (the caller asks for another move);
//!   `MalformedRequest` means the request did not describe a generated move;
//!   `InvariantViolation` signals corrupted state or a programming defect and
//!   must not be treated as a game outcome.
//! - [`LoadError`] is returned by the bulk-load entry point. Each variant names
//!   one precise reason a position was refused, so an external loader can show
//!   a useful message and fall back to the standard layout.

use thiserror::Error;

use crate::game_state::chess_types::{Color, Position};

/// Failure modes of committing a [`MoveRequest`](crate::moves::move_descriptions::MoveRequest).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The request does not describe a move the generator produced (no piece
    /// on the start square, destination not a candidate, wrong side, ...).
    /// Nothing was mutated.
    #[error("malformed move request: {0}")]
    MalformedRequest(String),

    /// A king tried to step onto a square the opponent attacks or covers.
    #[error("king cannot move to {destination}: square is attacked")]
    IllegalKingMove { destination: Position },

    /// The destination holds a piece of the mover's own color.
    #[error("cannot capture own piece on {destination}")]
    OwnPieceCapture { destination: Position },

    /// The move was applied, left the mover's king in check, and was rolled back.
    #[error("move reveals check")]
    RevealedCheck,

    /// Corrupted state: a king would be deleted, a king is missing, an undo
    /// record does not match the board.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl MoveError {
    /// True for the ordinary rejections a player can recover from by choosing
    /// another move.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MoveError::IllegalKingMove { .. }
                | MoveError::OwnPieceCapture { .. }
                | MoveError::RevealedCheck
        )
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, MoveError::InvariantViolation(_))
    }
}

/// Reasons a bulk-loaded position is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Raised by the external save-file loader when a file's header cannot be
    /// read. Nothing in this crate constructs it.
    #[error("file structure was not recognised: {0}")]
    BadHeader(String),

    #[error("invalid value {value} for {field}")]
    BadEnumValue { field: &'static str, value: u8 },

    #[error("square ({file}, {rank}) is not on the board")]
    InvalidSquare { file: u8, rank: u8 },

    #[error("more than one piece placed on {0}")]
    OvercrowdedSquare(Position),

    #[error("{0} has more than one king")]
    TooManyKings(Color),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("unpromoted pawn left on the last rank at {0}")]
    UnpromotedPawn(Position),

    #[error("{0} moved last and left their king in check")]
    KingLeftInCheck(Color),

    /// Generation failed on a position that passed structural validation.
    #[error(transparent)]
    Rules(#[from] MoveError),
}
