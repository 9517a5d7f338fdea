//! 服务端配置

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "SHOGI_SERVER_CONFIG";

/// 服务端配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 同时进行的对局数上限
    pub max_sessions: usize,
    /// 追加到 RUST_LOG 之后的日志过滤指令
    pub log_directive: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9528,
            max_sessions: 1024,
            log_directive: "shogi_server=info".to_string(),
        }
    }
}

impl ServerConfig {
    /// 加载配置：设置了环境变量时读取对应的 JSON 文件，否则使用默认值
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// 从 JSON 文件加载
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("配置文件格式错误 {}", path.display()))
    }

    /// 从 JSON 字符串解析，缺省字段使用默认值
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        anyhow::ensure!(config.max_sessions > 0, "max_sessions 必须大于 0");
        Ok(config)
    }

    /// 监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
