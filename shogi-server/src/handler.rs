//! 客户端消息处理

use tracing::debug;

use shogi_protocol::{ClientMessage, ServerMessage};

use crate::manager::{SessionError, SessionManager};

/// 消息处理器
pub struct MessageHandler;

impl MessageHandler {
    /// 处理客户端消息，返回给该客户端的回复
    pub async fn handle(manager: &SessionManager, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::CreateSession { sente, gote } => {
                match manager.create(&sente, &gote).await {
                    Ok(info) => ServerMessage::SessionCreated { info },
                    Err(err) => Self::error(err),
                }
            }
            ClientMessage::GetState { session_id } => match manager.position(session_id).await {
                Ok(position) => ServerMessage::State {
                    session_id,
                    position,
                },
                Err(err) => Self::error(err),
            },
            ClientMessage::LegalMoves { session_id } => {
                match manager.legal_moves(session_id).await {
                    Ok(moves) => ServerMessage::LegalMoves { session_id, moves },
                    Err(err) => Self::error(err),
                }
            }
            ClientMessage::SubmitMove(submission) => {
                debug!(session_id = submission.session_id, mv = %submission.mv, "收到走法");
                ServerMessage::MoveResult(manager.submit(submission).await)
            }
            ClientMessage::Resign { session_id, side } => {
                match manager.resign(session_id, side).await {
                    Ok(result) => ServerMessage::GameOver { session_id, result },
                    Err(err) => Self::error(err),
                }
            }
            ClientMessage::Ping => ServerMessage::Pong,
        }
    }

    fn error(err: SessionError) -> ServerMessage {
        ServerMessage::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shogi_protocol::{ErrorCode, GameResult, Move, MoveSubmission, Side, Square, WinReason};

    async fn create(manager: &SessionManager) -> u64 {
        match MessageHandler::handle(
            manager,
            ClientMessage::CreateSession {
                sente: "alice".to_string(),
                gote: "bob".to_string(),
            },
        )
        .await
        {
            ServerMessage::SessionCreated { info } => info.id,
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ping() {
        let manager = SessionManager::new(4);
        assert!(matches!(
            MessageHandler::handle(&manager, ClientMessage::Ping).await,
            ServerMessage::Pong
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_game_flow() {
        let manager = SessionManager::new(4);
        let session_id = create(&manager).await;

        match MessageHandler::handle(&manager, ClientMessage::LegalMoves { session_id }).await {
            ServerMessage::LegalMoves { moves, .. } => assert_eq!(moves.len(), 30),
            other => panic!("Unexpected message: {:?}", other),
        }

        let submission = MoveSubmission {
            session_id,
            moving_side: Side::Sente,
            mv: Move::new(Square::new(2, 7).unwrap(), Square::new(2, 6).unwrap()),
        };
        match MessageHandler::handle(&manager, ClientMessage::SubmitMove(submission)).await {
            ServerMessage::MoveResult(response) => assert!(response.accepted),
            other => panic!("Unexpected message: {:?}", other),
        }

        match MessageHandler::handle(&manager, ClientMessage::GetState { session_id }).await {
            ServerMessage::State { position, .. } => {
                assert_eq!(position.turn, Side::Gote);
                assert_eq!(position.board[5][7], "P");
            }
            other => panic!("Unexpected message: {:?}", other),
        }

        match MessageHandler::handle(
            &manager,
            ClientMessage::Resign {
                session_id,
                side: Side::Gote,
            },
        )
        .await
        {
            ServerMessage::GameOver { result, .. } => {
                assert_eq!(result, GameResult::SenteWin(WinReason::Resign))
            }
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_errors() {
        let manager = SessionManager::new(4);

        match MessageHandler::handle(&manager, ClientMessage::GetState { session_id: 99 }).await {
            ServerMessage::Error { code, .. } => assert_eq!(code, ErrorCode::SessionNotFound),
            other => panic!("Unexpected message: {:?}", other),
        }

        let msg = ClientMessage::CreateSession {
            sente: String::new(),
            gote: "bob".to_string(),
        };
        match MessageHandler::handle(&manager, msg).await {
            ServerMessage::Error { code, .. } => assert_eq!(code, ErrorCode::InvalidName),
            other => panic!("Unexpected message: {:?}", other),
        }
    }
}
