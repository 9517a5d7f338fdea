//! 错误类型定义

use thiserror::Error;

use crate::piece::{PieceKind, Square};

/// 将棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShogiError {
    /// 不是你的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 起点没有棋子
    #[error("No piece at {square}")]
    SquareEmpty { square: Square },

    /// 起点的棋子不属于走子方
    #[error("Piece at {square} does not belong to the mover")]
    NotOwnedByMover { square: Square },

    /// 目标格不在合法走法/打入范围内
    #[error("Illegal destination: {to}")]
    IllegalDestination { to: Square },

    /// 持驹中没有该棋子（或该棋子不能打入）
    #[error("No {kind:?} in hand")]
    NotInHand { kind: PieceKind },

    /// 可选升变时未给出选择
    #[error("Promotion choice required for move {from} -> {to}")]
    AmbiguousPromotion { from: Square, to: Square },

    /// 该走法不允许升变
    #[error("Promotion not allowed for move {from} -> {to}")]
    PromotionNotAllowed { from: Square, to: Square },

    /// 该走法必须升变
    #[error("Promotion required for move {from} -> {to}")]
    PromotionRequired { from: Square, to: Square },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 局面不变量被破坏（正常对局历史中不可达）
    #[error("Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// 无效的 SFEN 字符串
    #[error("Invalid SFEN string: {reason}")]
    InvalidSfen { reason: String },

    /// 无效的线上局面表示
    #[error("Invalid wire position: {reason}")]
    InvalidWire { reason: String },
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 走法不合法，可恢复，局面不变
    Validation,
    /// 需要调用方重新提交升变选择
    AmbiguousPromotion,
    /// 对局已损坏，应中止会话
    Invariant,
    /// 输入格式错误
    Parse,
}

impl ShogiError {
    /// 获取错误分类
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShogiError::AmbiguousPromotion { .. } => ErrorCategory::AmbiguousPromotion,
            ShogiError::InvariantViolation { .. } => ErrorCategory::Invariant,
            ShogiError::InvalidSfen { .. } | ShogiError::InvalidWire { .. } => ErrorCategory::Parse,
            _ => ErrorCategory::Validation,
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        ShogiError::InvariantViolation {
            reason: reason.into(),
        }
    }
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误（bincode）
    #[error("Bincode serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 协议版本不匹配
    #[error("Protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    /// 帧大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,

    /// 将棋规则错误
    #[error("Shogi error: {0}")]
    Shogi(#[from] ShogiError),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
