//! 消息类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::GameState;
use crate::error::ShogiError;
use crate::moves::Move;
use crate::piece::Side;
use crate::wire::WirePosition;

/// 对局会话 ID
pub type SessionId = u64;

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// 先手胜
    SenteWin(WinReason),
    /// 后手胜
    GoteWin(WinReason),
}

impl GameResult {
    /// 构造 `winner` 获胜的结果
    pub fn win(winner: Side, reason: WinReason) -> Self {
        match winner {
            Side::Sente => GameResult::SenteWin(reason),
            Side::Gote => GameResult::GoteWin(reason),
        }
    }

    /// 胜方
    pub fn winner(&self) -> Side {
        match self {
            GameResult::SenteWin(_) => Side::Sente,
            GameResult::GoteWin(_) => Side::Gote,
        }
    }
}

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// 将死
    Checkmate,
    /// 对方认输
    Resign,
}

/// 会话信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub sente: String,
    pub gote: String,
    pub started_at: DateTime<Utc>,
}

/// 走法提交
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSubmission {
    pub session_id: SessionId,
    pub moving_side: Side,
    pub mv: Move,
}

/// 走法被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    NotYourTurn,
    SquareEmpty,
    NotOwnedByMover,
    IllegalDestination,
    /// 可选升变时需要明确给出选择
    PromotionChoiceRequired,
    PromotionNotAllowed,
    PromotionRequired,
    PieceNotInHand,
    GameAlreadyOver,
    SessionNotFound,
    /// 局面损坏，会话已中止
    InternalError,
}

impl From<&ShogiError> for RejectReason {
    fn from(err: &ShogiError) -> Self {
        match err {
            ShogiError::NotYourTurn => RejectReason::NotYourTurn,
            ShogiError::SquareEmpty { .. } => RejectReason::SquareEmpty,
            ShogiError::NotOwnedByMover { .. } => RejectReason::NotOwnedByMover,
            ShogiError::IllegalDestination { .. } => RejectReason::IllegalDestination,
            ShogiError::NotInHand { .. } => RejectReason::PieceNotInHand,
            ShogiError::AmbiguousPromotion { .. } => RejectReason::PromotionChoiceRequired,
            ShogiError::PromotionNotAllowed { .. } => RejectReason::PromotionNotAllowed,
            ShogiError::PromotionRequired { .. } => RejectReason::PromotionRequired,
            ShogiError::GameOver => RejectReason::GameAlreadyOver,
            ShogiError::InvariantViolation { .. }
            | ShogiError::InvalidSfen { .. }
            | ShogiError::InvalidWire { .. } => RejectReason::InternalError,
        }
    }
}

/// 走法提交的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub accepted: bool,
    /// 接受后的新局面
    pub new_state: Option<WirePosition>,
    pub reason: Option<RejectReason>,
    /// 走后对方是否被将军
    pub check: bool,
    /// 走后对局结束时的结果
    pub result: Option<GameResult>,
}

impl MoveResponse {
    /// 走法被接受
    pub fn accepted(new_state: &GameState, check: bool, result: Option<GameResult>) -> Self {
        Self {
            accepted: true,
            new_state: Some(WirePosition::encode(new_state)),
            reason: None,
            check,
            result,
        }
    }

    /// 走法被拒绝
    pub fn rejected(reason: RejectReason) -> Self {
        Self {
            accepted: false,
            new_state: None,
            reason: Some(reason),
            check: false,
            result: None,
        }
    }
}

/// 客户端发送给服务端的消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientMessage {
    // === 会话 ===
    /// 创建对局
    CreateSession { sente: String, gote: String },
    /// 查询局面
    GetState { session_id: SessionId },
    /// 查询当前走子方的所有合法走法
    LegalMoves { session_id: SessionId },

    // === 对局操作 ===
    /// 走棋
    SubmitMove(MoveSubmission),
    /// 认输
    Resign { session_id: SessionId, side: Side },

    // === 心跳 ===
    /// 心跳请求
    Ping,
}

/// 服务端发送给客户端的消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerMessage {
    // === 会话 ===
    /// 对局创建成功
    SessionCreated { info: SessionInfo },
    /// 当前局面
    State {
        session_id: SessionId,
        position: WirePosition,
    },
    /// 合法走法列表
    LegalMoves {
        session_id: SessionId,
        moves: Vec<Move>,
    },

    // === 对局事件 ===
    /// 走棋结果
    MoveResult(MoveResponse),
    /// 游戏结束
    GameOver {
        session_id: SessionId,
        result: GameResult,
    },

    // === 心跳 ===
    /// 心跳响应
    Pong,

    // === 错误 ===
    /// 错误消息
    Error { code: ErrorCode, message: String },
}

/// 错误码定义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    // === 会话相关 (1xx) ===
    /// 会话不存在
    SessionNotFound = 100,
    /// 会话数已达上限
    TooManySessions = 101,
    /// 无效的对局者名字
    InvalidName = 102,

    // === 对局相关 (2xx) ===
    /// 游戏已结束
    GameAlreadyOver = 203,

    // === 系统相关 (5xx) ===
    /// 内部错误
    InternalError = 500,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceKind, Square};

    #[test]
    fn test_client_message_serialize() {
        let msg = ClientMessage::SubmitMove(MoveSubmission {
            session_id: 7,
            moving_side: Side::Sente,
            mv: Move::with_promotion(
                Square::new_unchecked(4, 3),
                Square::new_unchecked(4, 2),
                true,
            ),
        });
        let bytes = bincode::serialize(&msg).unwrap();
        let decoded: ClientMessage = bincode::deserialize(&bytes).unwrap();

        match decoded {
            ClientMessage::SubmitMove(submission) => {
                assert_eq!(submission.session_id, 7);
                assert_eq!(submission.mv.to_string(), "43-42+");
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_move_result_serialize() {
        let response = MoveResponse::accepted(&GameState::initial(), false, None);
        let msg = ServerMessage::MoveResult(response.clone());
        let bytes = bincode::serialize(&msg).unwrap();
        let decoded: ServerMessage = bincode::deserialize(&bytes).unwrap();

        match decoded {
            ServerMessage::MoveResult(decoded) => assert_eq!(decoded, response),
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_session_info_serialize() {
        let info = SessionInfo {
            id: 1,
            sente: "alice".to_string(),
            gote: "bob".to_string(),
            started_at: Utc::now(),
        };
        let msg = ServerMessage::SessionCreated { info: info.clone() };
        let bytes = bincode::serialize(&msg).unwrap();
        match bincode::deserialize::<ServerMessage>(&bytes).unwrap() {
            ServerMessage::SessionCreated { info: decoded } => assert_eq!(decoded, info),
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_reject_reason_mapping() {
        let sq = Square::new_unchecked(5, 5);
        assert_eq!(
            RejectReason::from(&ShogiError::AmbiguousPromotion { from: sq, to: sq }),
            RejectReason::PromotionChoiceRequired
        );
        assert_eq!(
            RejectReason::from(&ShogiError::NotInHand { kind: PieceKind::Gold }),
            RejectReason::PieceNotInHand
        );
        assert_eq!(RejectReason::from(&ShogiError::GameOver), RejectReason::GameAlreadyOver);
        assert_eq!(
            RejectReason::from(&ShogiError::InvariantViolation { reason: "x".into() }),
            RejectReason::InternalError
        );

        let rejected = MoveResponse::rejected(RejectReason::NotYourTurn);
        assert!(!rejected.accepted);
        assert!(rejected.new_state.is_none());
    }

    #[test]
    fn test_game_result_winner() {
        assert_eq!(
            GameResult::win(Side::Gote, WinReason::Resign),
            GameResult::GoteWin(WinReason::Resign)
        );
        assert_eq!(GameResult::SenteWin(WinReason::Checkmate).winner(), Side::Sente);
    }
}
