//! 线上局面表示
//!
//! 发给客户端的局面是一个 9x9 的字符串网格加双方持驹：
//! - `board[0]` 是一段，每行从九筋到一筋
//! - 先手大写、后手小写、成驹加 `+` 前缀，空格为 `""`
//! - 持驹键与棋盘记号一致（先手大写、后手小写），数量为 0 的不出现

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Board, GameState, Hand, Hands};
use crate::constants::BOARD_SIZE;
use crate::error::{Result, ShogiError};
use crate::piece::{Piece, PieceKind, Side, Square};

fn invalid(reason: impl Into<String>) -> ShogiError {
    ShogiError::InvalidWire {
        reason: reason.into(),
    }
}

/// 线上持驹
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireHands {
    pub sente: BTreeMap<String, u32>,
    pub gote: BTreeMap<String, u32>,
}

/// 线上局面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    pub board: Vec<Vec<String>>,
    pub hands: WireHands,
    pub turn: Side,
    pub move_number: u32,
}

impl WirePosition {
    /// 编码局面
    pub fn encode(state: &GameState) -> Self {
        let board = (1..=BOARD_SIZE)
            .map(|rank| {
                (1..=BOARD_SIZE)
                    .rev()
                    .map(|file| {
                        state
                            .board()
                            .get(Square::new_unchecked(file, rank))
                            .map(|piece| piece.token())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self {
            board,
            hands: WireHands {
                sente: Self::encode_hand(state.hand(Side::Sente), Side::Sente),
                gote: Self::encode_hand(state.hand(Side::Gote), Side::Gote),
            },
            turn: state.turn(),
            move_number: state.move_number(),
        }
    }

    fn encode_hand(hand: &Hand, side: Side) -> BTreeMap<String, u32> {
        hand.iter()
            .map(|(kind, count)| (Piece::new(kind, side).token(), count as u32))
            .collect()
    }

    /// 解码为局面（检查局面不变量）
    pub fn decode(&self) -> std::result::Result<GameState, ShogiError> {
        if self.board.len() != BOARD_SIZE as usize {
            return Err(invalid(format!("Expected 9 ranks, got {}", self.board.len())));
        }
        if self.move_number == 0 {
            return Err(invalid("Move number must start at 1"));
        }

        let mut board = Board::empty();
        for (row_idx, row) in self.board.iter().enumerate() {
            let rank = row_idx as u8 + 1;
            if row.len() != BOARD_SIZE as usize {
                return Err(invalid(format!("Rank {} has {} files, expected 9", rank, row.len())));
            }
            for (col, token) in row.iter().enumerate() {
                if token.is_empty() {
                    continue;
                }
                let piece = Piece::from_token(token)
                    .ok_or_else(|| invalid(format!("Invalid piece token: {:?}", token)))?;
                board.set(Square::new_unchecked(BOARD_SIZE - col as u8, rank), Some(piece));
            }
        }

        let hands = Hands {
            sente: Self::decode_hand(&self.hands.sente, Side::Sente)?,
            gote: Self::decode_hand(&self.hands.gote, Side::Gote)?,
        };

        let state = GameState::new(board, hands, self.turn).map_err(|err| match err {
            ShogiError::InvariantViolation { reason } => invalid(reason),
            other => other,
        })?;
        Ok(state.with_move_number(self.move_number))
    }

    fn decode_hand(
        entries: &BTreeMap<String, u32>,
        side: Side,
    ) -> std::result::Result<Hand, ShogiError> {
        let mut hand = Hand::new();
        for (key, count) in entries {
            let piece = Piece::from_token(key)
                .filter(|piece| piece.owner == side && piece.kind.is_droppable())
                .ok_or_else(|| invalid(format!("Invalid {} hand key: {:?}", side, key)))?;
            if *count == 0 || *count > u32::from(piece.kind.max_count()) {
                return Err(invalid(format!("Invalid hand count for {:?}: {}", key, count)));
            }
            for _ in 0..*count {
                hand.add(piece.kind);
            }
        }
        Ok(hand)
    }

    /// 持驹中某种棋子的数量
    pub fn hand_count(&self, side: Side, kind: PieceKind) -> u32 {
        let key = Piece::new(kind.base(), side).token();
        let hand = match side {
            Side::Sente => &self.hands.sente,
            Side::Gote => &self.hands.gote,
        };
        hand.get(&key).copied().unwrap_or(0)
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 反序列化
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&GameState> for WirePosition {
    fn from(state: &GameState) -> Self {
        Self::encode(state)
    }
}
