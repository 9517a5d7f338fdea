use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shogi_protocol::{ClientMessage, FrameReader, FrameWriter, ProtocolError};
use shogi_server::{MessageHandler, ServerConfig, SessionManager};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;

    // 初始化日志
    let directive: Directive = config.log_directive.parse().context("无效的日志过滤指令")?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    info!("将棋服务端启动中...");

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法监听 {}", addr))?;
    info!(%addr, max_sessions = config.max_sessions, "开始监听");

    let manager = Arc::new(SessionManager::new(config.max_sessions));

    loop {
        let (stream, peer) = listener.accept().await.context("接受连接失败")?;
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            info!(%peer, "新连接");
            match serve(stream, &manager).await {
                Ok(()) => info!(%peer, "连接关闭"),
                Err(err) => warn!(%peer, error = %err, "连接异常断开"),
            }
        });
    }
}

/// 处理单个连接：逐帧读取客户端消息并回复
async fn serve(stream: TcpStream, manager: &SessionManager) -> Result<(), ProtocolError> {
    stream.set_nodelay(true)?;
    let (read_half, write_half) = stream.into_split();
    let mut reader = FrameReader::new(read_half);
    let mut writer = FrameWriter::new(write_half);

    loop {
        let msg: ClientMessage = match reader.read_frame().await {
            Ok(msg) => msg,
            Err(ProtocolError::ConnectionClosed) => return Ok(()),
            Err(err) => return Err(err),
        };
        let reply = MessageHandler::handle(manager, msg).await;
        writer.write_frame(&reply).await?;
    }
}
