//! 会话管理

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use shogi_protocol::{
    ErrorCode, GameResult, Move, MoveResponse, MoveSubmission, RejectReason, SessionId,
    SessionInfo, Side, WirePosition, MAX_NAME_LEN,
};

use crate::session::GameSession;

/// 会话错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error("Too many sessions (max: {max})")]
    TooManySessions { max: usize },

    #[error("Player name must not be empty")]
    EmptyName,

    #[error("Player name longer than {max} characters")]
    NameTooLong { max: usize },

    #[error("Game is already over")]
    GameAlreadyOver,
}

impl SessionError {
    /// 对应的协议错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            SessionError::TooManySessions { .. } => ErrorCode::TooManySessions,
            SessionError::EmptyName | SessionError::NameTooLong { .. } => ErrorCode::InvalidName,
            SessionError::GameAlreadyOver => ErrorCode::GameAlreadyOver,
        }
    }
}

/// 会话管理器
///
/// 不同会话可以并行处理；同一会话的提交由会话自己的锁串行化。
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<GameSession>>>>,
    next_id: AtomicU64,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            max_sessions,
        }
    }

    /// 生成新的会话 ID
    fn generate_id(&self) -> SessionId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// 验证对局者名字，返回去掉首尾空白后的名字
    pub fn validate_name(name: &str) -> Result<String, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(SessionError::NameTooLong { max: MAX_NAME_LEN });
        }
        Ok(name.to_string())
    }

    /// 创建对局
    pub async fn create(&self, sente: &str, gote: &str) -> Result<SessionInfo, SessionError> {
        let sente = Self::validate_name(sente)?;
        let gote = Self::validate_name(gote)?;

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            return Err(SessionError::TooManySessions {
                max: self.max_sessions,
            });
        }

        let info = SessionInfo {
            id: self.generate_id(),
            sente,
            gote,
            started_at: Utc::now(),
        };
        sessions.insert(info.id, Arc::new(Mutex::new(GameSession::new(info.clone()))));
        info!(session_id = info.id, sente = %info.sente, gote = %info.gote, "对局创建");
        Ok(info)
    }

    /// 获取会话
    pub async fn get(&self, id: SessionId) -> Result<Arc<Mutex<GameSession>>, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::SessionNotFound(id))
    }

    /// 提交走法
    pub async fn submit(&self, submission: MoveSubmission) -> MoveResponse {
        let session = match self.get(submission.session_id).await {
            Ok(session) => session,
            Err(_) => return MoveResponse::rejected(RejectReason::SessionNotFound),
        };
        let mut session = session.lock().await;
        // 规则校验和将死搜索是 CPU 密集的，不占用异步工作线程
        tokio::task::block_in_place(|| session.submit(submission.moving_side, submission.mv))
    }

    /// 认输
    pub async fn resign(&self, id: SessionId, side: Side) -> Result<GameResult, SessionError> {
        let session = self.get(id).await?;
        let mut session = session.lock().await;
        session.resign(side).map_err(|_| SessionError::GameAlreadyOver)
    }

    /// 当前局面
    pub async fn position(&self, id: SessionId) -> Result<WirePosition, SessionError> {
        let session = self.get(id).await?;
        let session = session.lock().await;
        Ok(session.position())
    }

    /// 当前走子方的合法走法
    pub async fn legal_moves(&self, id: SessionId) -> Result<Vec<Move>, SessionError> {
        let session = self.get(id).await?;
        let session = session.lock().await;
        Ok(tokio::task::block_in_place(|| session.legal_moves()))
    }

    /// 移除会话
    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// 会话数量
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
