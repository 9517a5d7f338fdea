//! 协议常量定义

/// 协议版本号
pub const PROTOCOL_VERSION: u8 = 1;

/// 棋盘边长（筋数 = 段数 = 9）
pub const BOARD_SIZE: u8 = 9;

/// 棋盘格子总数
pub const SQUARE_COUNT: usize = 81;

/// 升变区深度（敌阵三段）
pub const PROMOTION_ZONE_DEPTH: u8 = 3;

/// 一局棋的棋子总数（盘上 + 双方持驹，成驹按原驹计）
pub const TOTAL_PIECES: usize = 40;

/// 消息帧最大大小
pub const MAX_FRAME_SIZE: usize = 65536;

/// 对局者名字最大长度
pub const MAX_NAME_LEN: usize = 20;
