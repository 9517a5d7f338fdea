//! SFEN 格式解析和生成
//!
//! 将棋 SFEN 格式：
//! `<棋盘> <走子方> <持驹> <手数>`
//!
//! 示例：
//! `lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1`
//!
//! 棋盘从一段写到九段，每段从九筋写到一筋。持驹按 R B G S N L P 的顺序，
//! 先手在前，数量大于 1 时加数字前缀。

use crate::board::{Board, GameState, Hands};
use crate::constants::BOARD_SIZE;
use crate::error::ShogiError;
use crate::piece::{Piece, PieceKind, Side, Square, HAND_KINDS};

/// 平手初始局面 SFEN
pub const INITIAL_SFEN: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

fn invalid(reason: impl Into<String>) -> ShogiError {
    ShogiError::InvalidSfen {
        reason: reason.into(),
    }
}

/// SFEN 格式处理
pub struct Sfen;

impl Sfen {
    /// 平手初始局面
    pub fn initial() -> GameState {
        GameState::initial()
    }

    /// 解析 SFEN 字符串为局面
    ///
    /// 走子方、持驹、手数可以省略，分别默认为先手、无持驹、1。
    pub fn parse(sfen: &str) -> Result<GameState, ShogiError> {
        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(invalid("Empty SFEN string"));
        }
        if parts.len() > 4 {
            return Err(invalid(format!("Expected at most 4 fields, got {}", parts.len())));
        }

        let board = Self::parse_board(parts[0])?;

        let turn = match parts.get(1) {
            Some(field) => {
                let mut chars = field.chars();
                match (chars.next().and_then(Side::from_sfen_char), chars.next()) {
                    (Some(side), None) => side,
                    _ => return Err(invalid(format!("Invalid side to move: {}", field))),
                }
            }
            None => Side::Sente,
        };

        let hands = match parts.get(2) {
            Some(field) => Self::parse_hands(field)?,
            None => Hands::default(),
        };

        let move_number = match parts.get(3) {
            Some(field) => field
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| invalid(format!("Invalid move number: {}", field)))?,
            None => 1,
        };

        let state = GameState::new(board, hands, turn).map_err(|err| match err {
            ShogiError::InvariantViolation { reason } => invalid(reason),
            other => other,
        })?;
        Ok(state.with_move_number(move_number))
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, ShogiError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE as usize {
            return Err(invalid(format!("Expected 9 ranks, got {}", rows.len())));
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let rank = row_idx as u8 + 1;
            // 已经填过的格数，对应筋 = 9 - filled
            let mut filled = 0u8;
            let mut promoted = false;

            for c in row.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if promoted || empty == 0 {
                        return Err(invalid(format!("Unexpected '{}' on rank {}", c, rank)));
                    }
                    filled += empty as u8;
                } else if c == '+' {
                    if promoted {
                        return Err(invalid(format!("Double '+' on rank {}", rank)));
                    }
                    promoted = true;
                    continue;
                } else {
                    if filled >= BOARD_SIZE {
                        return Err(invalid(format!("Rank {} has too many files", rank)));
                    }
                    let token = if promoted { format!("+{}", c) } else { c.to_string() };
                    let piece = Piece::from_token(&token)
                        .ok_or_else(|| invalid(format!("Invalid piece: {}", token)))?;
                    board.set(Square::new_unchecked(BOARD_SIZE - filled, rank), Some(piece));
                    filled += 1;
                }
                promoted = false;

                if filled > BOARD_SIZE {
                    return Err(invalid(format!("Rank {} has too many files", rank)));
                }
            }

            if promoted {
                return Err(invalid(format!("Dangling '+' on rank {}", rank)));
            }
            if filled != BOARD_SIZE {
                return Err(invalid(format!("Rank {} has {} files, expected 9", rank, filled)));
            }
        }

        Ok(board)
    }

    /// 解析持驹部分
    fn parse_hands(field: &str) -> Result<Hands, ShogiError> {
        let mut hands = Hands::default();
        if field == "-" {
            return Ok(hands);
        }

        let mut count: u32 = 0;
        for c in field.chars() {
            if let Some(digit) = c.to_digit(10) {
                count = count * 10 + digit;
                if count > 18 {
                    return Err(invalid(format!("Hand count too large in {}", field)));
                }
                continue;
            }

            let kind = PieceKind::from_letter(c)
                .filter(|kind| kind.is_droppable())
                .ok_or_else(|| invalid(format!("Invalid hand piece: {}", c)))?;
            let side = if c.is_ascii_uppercase() {
                Side::Sente
            } else {
                Side::Gote
            };
            let hand = hands.get_mut(side);
            let total = u32::from(hand.count(kind)) + count.max(1);
            if total > u32::from(kind.max_count()) {
                return Err(invalid(format!("Too many {} in hand: {}", c, total)));
            }
            for _ in 0..count.max(1) {
                hand.add(kind);
            }
            count = 0;
        }

        if count != 0 {
            return Err(invalid(format!("Dangling count in hands: {}", field)));
        }
        Ok(hands)
    }

    /// 将局面转换为 SFEN 字符串
    pub fn to_string(state: &GameState) -> String {
        format!(
            "{} {} {} {}",
            Self::board_to_string(state.board()),
            state.turn().to_sfen_char(),
            Self::hands_to_string(state.hands()),
            state.move_number()
        )
    }

    /// 将棋盘转换为 SFEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE as usize);

        for rank in 1..=BOARD_SIZE {
            let mut row = String::new();
            let mut empty_count = 0;

            for file in (1..=BOARD_SIZE).rev() {
                if let Some(piece) = board.get(Square::new_unchecked(file, rank)) {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push_str(&piece.token());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }

    /// 将持驹转换为 SFEN 持驹部分
    pub fn hands_to_string(hands: &Hands) -> String {
        let mut out = String::new();
        for side in [Side::Sente, Side::Gote] {
            let hand = hands.get(side);
            for kind in HAND_KINDS {
                let count = hand.count(kind);
                if count == 0 {
                    continue;
                }
                if count > 1 {
                    out.push_str(&count.to_string());
                }
                out.push_str(&Piece::new(kind, side).token());
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }
}
