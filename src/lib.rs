//! Crate root module declarations for the Plum rules engine.
//!
//! This file exposes the board model, per-piece movement rules and the
//! move-generation subsystems (check detection, castling, move commitment,
//! position classification and perft) plus a seeded random-playout harness,
//! so binaries, tests, and external collaborators can import stable module
//! paths.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod piece_record;
    pub mod position_index;
    pub mod undo_state;
}

pub mod moves {
    pub mod king_moves;
    pub mod move_descriptions;
    pub mod pawn_moves;
    pub mod sliding_moves;
    pub mod stepping_moves;
}

pub mod move_generation {
    pub mod castling;
    pub mod game_status;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod move_generator;
    pub mod perft;
}

pub mod utils {
    pub mod random_playout;
}
