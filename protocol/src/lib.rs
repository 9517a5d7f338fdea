//! 将棋规则引擎与共享协议库
//!
//! 包含:
//! - 棋子、棋盘、持驹、局面等核心数据结构
//! - 走法生成、打入规则、将军与将死判定、走法执行
//! - 局面格式 (SFEN, 线上 JSON 表示)
//! - 消息类型定义 (ClientMessage, ServerMessage)
//! - 帧编解码 (FrameReader, FrameWriter)

mod apply;
mod board;
mod check;
mod checkmate;
mod codec;
mod constants;
mod drops;
mod error;
mod legal;
mod message;
mod moves;
mod piece;
mod rules;
mod sfen;
mod wire;

pub use apply::{MoveApplier, PromotionOption};
pub use board::{Board, GameState, Hand, Hands};
pub use check::CheckDetector;
pub use checkmate::CheckmateDetector;
pub use codec::{FrameReader, FrameWriter};
pub use constants::*;
pub use drops::DropGenerator;
pub use error::{ErrorCategory, ProtocolError, Result, ShogiError};
pub use legal::LegalMoveFilter;
pub use message::{
    ClientMessage, ErrorCode, GameResult, MoveResponse, MoveSubmission, RejectReason,
    ServerMessage, SessionId, SessionInfo, WinReason,
};
pub use moves::{Move, MoveGenerator};
pub use piece::{Piece, PieceKind, Side, Square, HAND_KINDS};
pub use rules::{oriented, MoveRule, Offset};
pub use sfen::{Sfen, INITIAL_SFEN};
pub use wire::{WireHands, WirePosition};
