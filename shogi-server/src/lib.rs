//! 将棋对局服务端
//!
//! 包含:
//! - 服务端配置
//! - 对局会话（唯一权威局面）
//! - 会话管理
//! - 消息处理

pub mod config;
pub mod handler;
pub mod manager;
pub mod session;

pub use config::ServerConfig;
pub use handler::MessageHandler;
pub use manager::{SessionError, SessionManager};
pub use session::{GameSession, SessionStatus};
