//! Turn-level game state.
//!
//! `GameState` owns the [`PositionIndex`] together with the side to move and
//! the last classification. It runs the generation passes in the order the
//! check and castling queries depend on: threats of the side that just moved,
//! then candidates of the side to move, then classification.

use std::collections::BTreeSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::chess_errors::{LoadError, MoveError};
use crate::game_state::chess_rules::standard_layout;
use crate::game_state::chess_types::*;
use crate::game_state::position_index::PositionIndex;
use crate::move_generation::game_status::{classify, legal_moves};
use crate::move_generation::legal_move_apply::commit;
use crate::move_generation::legal_move_checks::is_attacked;
use crate::move_generation::move_generator::{generate_moves_for, generate_threats_for};
use crate::moves::move_descriptions::{MoveRequest, PromotionChooser};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

/// What a played move did, and the status it left the opponent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyReport {
    pub request: MoveRequest,
    pub mover: Color,
    pub captured: Option<PieceKind>,
    pub en_passant: bool,
    pub castled: bool,
    pub promoted_to: Option<PieceKind>,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub index: PositionIndex,
    pub side_to_move: Color,
    /// Classification of the position for `side_to_move`.
    pub status: GameStatus,
    pub ply: u32,
}

impl GameState {
    #[inline]
    pub fn new_game() -> Self {
        Self::load(&standard_layout(), Color::White).expect("standard layout should always load")
    }

    /// Accept a position wholesale.
    ///
    /// On top of the structural checks of
    /// [`PositionIndex::from_placements`], refuses a position in which the
    /// side that just moved is in check. En passant is never available in a
    /// loaded position and neither side counts as having castled.
    pub fn load(placements: &[PlacedPiece], side_to_move: Color) -> Result<Self, LoadError> {
        let mut index = PositionIndex::from_placements(placements)?;

        let last_mover = side_to_move.opposite();
        generate_threats_for(&mut index, side_to_move)?;
        if is_attacked(&index, index.king_position(last_mover)?, side_to_move) {
            return Err(LoadError::KingLeftInCheck(last_mover));
        }

        let mut state = GameState {
            index,
            side_to_move,
            status: GameStatus::Nominal,
            ply: 0,
        };
        state.prepare()?;
        info!("loaded position, {side_to_move} to move: {:?}", state.status);
        Ok(state)
    }

    /// Regenerate tables for the side to move and classify.
    fn prepare(&mut self) -> Result<(), MoveError> {
        generate_threats_for(&mut self.index, self.side_to_move.opposite())?;
        generate_moves_for(&mut self.index, self.side_to_move)?;
        self.status = classify(&mut self.index, self.side_to_move)?;
        Ok(())
    }

    /// Build a request for the piece on `start`, flags filled in.
    pub fn request(&self, start: Position, end: Position) -> Result<MoveRequest, MoveError> {
        MoveRequest::from_candidate(&self.index, start, end)
    }

    /// Play one ply for the side to move.
    ///
    /// Rejections leave the state untouched; the caller asks for another move.
    pub fn play(&mut self, request: &MoveRequest, chooser: &mut dyn PromotionChooser) -> Result<PlyReport, MoveError> {
        if let Some(outcome) = self.outcome() {
            return Err(MoveError::MalformedRequest(format!("the game is over: {outcome:?}")));
        }
        let mover = self.side_to_move;
        match self.index.owner_at(request.start) {
            Some(owner) if owner == mover => {}
            _ => {
                return Err(MoveError::MalformedRequest(format!(
                    "{mover} has no piece on {}",
                    request.start
                )))
            }
        }

        let tx = commit(&mut self.index, request, chooser)?;
        let undo = tx.undo_state();
        let captured = undo.captured.as_ref().map(|capture| capture.piece.kind);
        let promoted_to = match undo.promotion {
            Some(_) => self.index.piece_at(request.end).map(|piece| piece.kind),
            None => None,
        };
        let (en_passant, castled) = (tx.is_en_passant(), tx.is_castle());

        self.side_to_move = mover.opposite();
        self.ply += 1;
        let previous = self.status;
        self.prepare()?;
        if self.status != previous && self.status != GameStatus::Nominal {
            info!("{} is in {:?} after ply {}", self.side_to_move, self.status, self.ply);
        }

        Ok(PlyReport {
            request: *request,
            mover,
            captured,
            en_passant,
            castled,
            promoted_to,
            status: self.status,
        })
    }

    /// `Some` once the side to move is checkmated or stalemated.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::Checkmate => Some(Outcome::Checkmate {
                winner: self.side_to_move.opposite(),
            }),
            GameStatus::Stalemate => Some(Outcome::Stalemate),
            GameStatus::Nominal | GameStatus::Check => None,
        }
    }

    pub fn legal_moves(&mut self) -> Result<Vec<MoveRequest>, MoveError> {
        legal_moves(&mut self.index, self.side_to_move)
    }

    /// Squares `color` threatens, for external check indicators.
    pub fn threats_of(&self, color: Color) -> &BTreeSet<Position> {
        &self.index.threat_table(color).threats
    }
}
