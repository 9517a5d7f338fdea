//! 走法定义与伪合法走法生成

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{PieceKind, Square};
use crate::rules::{oriented, MoveRule};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// 盘上走子；`promote` 为 None 表示未指定是否升变
    Board {
        from: Square,
        to: Square,
        promote: Option<bool>,
    },
    /// 打入持驹
    Drop { to: Square, kind: PieceKind },
}

impl Move {
    /// 创建盘上走法（不指定升变）
    pub fn new(from: Square, to: Square) -> Self {
        Move::Board {
            from,
            to,
            promote: None,
        }
    }

    /// 创建指定升变选择的走法
    pub fn with_promotion(from: Square, to: Square, promote: bool) -> Self {
        Move::Board {
            from,
            to,
            promote: Some(promote),
        }
    }

    /// 创建打入走法
    pub fn drop(kind: PieceKind, to: Square) -> Self {
        Move::Drop { to, kind }
    }

    /// 目标格
    pub fn to(&self) -> Square {
        match self {
            Move::Board { to, .. } | Move::Drop { to, .. } => *to,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Board { from, to, promote } => {
                write!(f, "{}-{}", from, to)?;
                match promote {
                    Some(true) => write!(f, "+"),
                    Some(false) => write!(f, "="),
                    None => Ok(()),
                }
            }
            Move::Drop { to, kind } => write!(f, "{}*{}", kind.letter(), to),
        }
    }
}

/// 伪合法走法生成器
///
/// 只看棋子走法形状，不考虑走后己方玉是否被将军，因此绝不调用将军判定。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成 `from` 上棋子的所有伪合法目标格（没有棋子时返回空）
    pub fn raw_moves(board: &Board, from: Square) -> Vec<Square> {
        let piece = match board.get(from) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        let rule = MoveRule::for_kind(piece.kind);
        let mut targets = Vec::with_capacity(16);

        for &offset in rule.steps() {
            let (d_rank, d_file) = oriented(offset, piece.owner);
            if let Some(to) = from.offset(d_rank, d_file) {
                match board.get(to) {
                    Some(target) if target.owner == piece.owner => {}
                    _ => targets.push(to),
                }
            }
        }

        for &direction in rule.directions() {
            let (d_rank, d_file) = oriented(direction, piece.owner);
            let mut current = from;
            while let Some(to) = current.offset(d_rank, d_file) {
                if let Some(target) = board.get(to) {
                    // 遇到棋子：对方的可以吃，己方的停在前一格
                    if target.owner != piece.owner {
                        targets.push(to);
                    }
                    break;
                }
                targets.push(to);
                current = to;
            }
        }

        targets
    }
}
