//! 对局会话
//!
//! 每个会话持有唯一权威的局面，所有走法都在这里经过规则引擎后才生效。

use tracing::{error, info, warn};

use shogi_protocol::{
    CheckDetector, CheckmateDetector, ErrorCategory, GameResult, GameState, LegalMoveFilter, Move,
    MoveApplier, MoveResponse, RejectReason, SessionInfo, ShogiError, Side, WinReason,
    WirePosition,
};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// 对局进行中
    Playing,
    /// 对局正常结束
    Finished,
    /// 局面损坏，对局中止
    Aborted,
}

/// 对局会话
pub struct GameSession {
    pub info: SessionInfo,
    state: GameState,
    status: SessionStatus,
    result: Option<GameResult>,
}

impl GameSession {
    /// 以平手初始局面开始新对局
    pub fn new(info: SessionInfo) -> Self {
        Self::with_state(info, GameState::initial())
    }

    /// 从指定局面开始对局
    pub fn with_state(info: SessionInfo, state: GameState) -> Self {
        Self {
            info,
            state,
            status: SessionStatus::Playing,
            result: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// 线上局面
    pub fn position(&self) -> WirePosition {
        WirePosition::encode(&self.state)
    }

    /// 当前走子方的所有合法走法（对局结束后为空）
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.status != SessionStatus::Playing {
            return Vec::new();
        }
        LegalMoveFilter::legal_moves(&self.state)
    }

    /// 提交走法
    pub fn submit(&mut self, moving_side: Side, mv: Move) -> MoveResponse {
        let session_id = self.info.id;

        if self.status != SessionStatus::Playing {
            warn!(session_id, %mv, "对局已结束，拒绝走法");
            return MoveResponse::rejected(RejectReason::GameAlreadyOver);
        }
        if moving_side != self.state.turn() {
            warn!(session_id, %moving_side, %mv, "不是该方的回合");
            return MoveResponse::rejected(RejectReason::NotYourTurn);
        }

        let next = match MoveApplier::apply(&self.state, mv) {
            Ok(next) => next,
            Err(err) => return self.reject(err),
        };

        let opponent = moving_side.opponent();
        let check = CheckDetector::is_in_check(next.board(), opponent);
        let result = if check && CheckmateDetector::is_checkmate(&next, opponent) {
            Some(GameResult::win(moving_side, WinReason::Checkmate))
        } else {
            None
        };

        self.state = next;
        if let Some(result) = result {
            self.finish(result);
        }
        MoveResponse::accepted(&self.state, check, result)
    }

    /// 认输，返回对局结果
    pub fn resign(&mut self, side: Side) -> Result<GameResult, ShogiError> {
        if self.status != SessionStatus::Playing {
            return Err(ShogiError::GameOver);
        }
        let result = GameResult::win(side.opponent(), WinReason::Resign);
        self.finish(result);
        Ok(result)
    }

    fn finish(&mut self, result: GameResult) {
        info!(session_id = self.info.id, ?result, "对局结束");
        self.status = SessionStatus::Finished;
        self.result = Some(result);
    }

    fn reject(&mut self, err: ShogiError) -> MoveResponse {
        if err.category() == ErrorCategory::Invariant {
            error!(session_id = self.info.id, error = %err, "局面不变量被破坏，中止对局");
            self.status = SessionStatus::Aborted;
        } else {
            warn!(session_id = self.info.id, error = %err, "走法被拒绝");
        }
        MoveResponse::rejected(RejectReason::from(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shogi_protocol::{PieceKind, Sfen, Square};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn info() -> SessionInfo {
        SessionInfo {
            id: 1,
            sente: "sente".to_string(),
            gote: "gote".to_string(),
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_not_your_turn() {
        let mut session = GameSession::new(info());
        let response = session.submit(Side::Gote, Move::new(sq(3, 3), sq(3, 4)));

        assert!(!response.accepted);
        assert_eq!(response.reason, Some(RejectReason::NotYourTurn));
        assert_eq!(session.state(), &GameState::initial());
    }

    #[test]
    fn test_accepted_move_updates_state() {
        let mut session = GameSession::new(info());
        let response = session.submit(Side::Sente, Move::new(sq(7, 7), sq(7, 6)));

        assert!(response.accepted);
        assert!(!response.check);
        assert_eq!(response.result, None);
        assert_eq!(session.state().turn(), Side::Gote);
        assert_eq!(response.new_state, Some(session.position()));
    }

    #[test]
    fn test_rejected_move_keeps_state() {
        let mut session = GameSession::new(info());
        let response = session.submit(Side::Sente, Move::new(sq(7, 7), sq(7, 5)));

        assert_eq!(response.reason, Some(RejectReason::IllegalDestination));
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.state(), &GameState::initial());
    }

    #[test]
    fn test_checkmate_finishes_session() {
        // 金打 12 将死：后手玉 11，先手桂 33 控制 21，金 13 保护 12
        let state = Sfen::parse("8k/9/6N1G/9/9/9/9/9/4K4 b G 1").unwrap();
        let mut session = GameSession::with_state(info(), state);

        let response = session.submit(Side::Sente, Move::drop(PieceKind::Gold, sq(1, 2)));
        assert!(response.accepted);
        assert!(response.check);
        assert_eq!(response.result, Some(GameResult::SenteWin(WinReason::Checkmate)));
        assert_eq!(session.status(), SessionStatus::Finished);

        let later = session.submit(Side::Gote, Move::new(sq(1, 1), sq(2, 1)));
        assert_eq!(later.reason, Some(RejectReason::GameAlreadyOver));
        assert!(session.legal_moves().is_empty());
    }

    #[test]
    fn test_resign() {
        let mut session = GameSession::new(info());
        let result = session.resign(Side::Sente).unwrap();

        assert_eq!(result, GameResult::GoteWin(WinReason::Resign));
        assert_eq!(session.result(), Some(result));
        assert_eq!(session.resign(Side::Gote), Err(ShogiError::GameOver));
    }

    #[test]
    fn test_ambiguous_promotion_reason() {
        let state = Sfen::parse("k8/9/5S3/9/9/9/9/9/4K4 b - 1").unwrap();
        let mut session = GameSession::with_state(info(), state);

        let response = session.submit(Side::Sente, Move::new(sq(4, 3), sq(4, 2)));
        assert_eq!(response.reason, Some(RejectReason::PromotionChoiceRequired));

        let response = session.submit(Side::Sente, Move::with_promotion(sq(4, 3), sq(4, 2), true));
        assert!(response.accepted);
    }
}
