//! 棋盘与局面状态

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{BOARD_SIZE, SQUARE_COUNT};
use crate::error::ShogiError;
use crate::piece::{Piece, PieceKind, Side, Square};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// 9x9 棋盘，索引见 `Square::to_index`
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建平手初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceKind::Lance,
            PieceKind::Knight,
            PieceKind::Silver,
            PieceKind::Gold,
            PieceKind::King,
            PieceKind::Gold,
            PieceKind::Silver,
            PieceKind::Knight,
            PieceKind::Lance,
        ];

        for (i, kind) in back_rank.iter().enumerate() {
            let file = i as u8 + 1;
            board.set(Square::new_unchecked(file, 9), Some(Piece::new(*kind, Side::Sente)));
            board.set(Square::new_unchecked(file, 1), Some(Piece::new(*kind, Side::Gote)));
        }

        for file in 1..=BOARD_SIZE {
            let sente_pawn = Piece::new(PieceKind::Pawn, Side::Sente);
            let gote_pawn = Piece::new(PieceKind::Pawn, Side::Gote);
            board.set(Square::new_unchecked(file, 7), Some(sente_pawn));
            board.set(Square::new_unchecked(file, 3), Some(gote_pawn));
        }

        // 先手：飞车在二筋，角行在八筋
        board.set(Square::new_unchecked(2, 8), Some(Piece::new(PieceKind::Rook, Side::Sente)));
        board.set(Square::new_unchecked(8, 8), Some(Piece::new(PieceKind::Bishop, Side::Sente)));
        // 后手：飞车在八筋，角行在二筋
        board.set(Square::new_unchecked(8, 2), Some(Piece::new(PieceKind::Rook, Side::Gote)));
        board.set(Square::new_unchecked(2, 2), Some(Piece::new(PieceKind::Bishop, Side::Gote)));

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares.get(sq.to_index()).copied().flatten()
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if let Some(slot) = self.squares.get_mut(sq.to_index()) {
            *slot = piece;
        }
    }

    /// 移动棋子（不检查规则），返回被吃的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 查找指定阵营的玉位置
    pub fn find_king(&self, side: Side) -> Option<Square> {
        self.pieces(side)
            .into_iter()
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// 获取指定阵营的所有棋子位置
    pub fn pieces(&self, side: Side) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.owner == side)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let piece = (*slot)?;
                Square::from_index(index).map(|sq| (sq, piece))
            })
            .collect()
    }

    /// 该筋上是否已有 `side` 的未成步兵（二步判定）
    pub fn has_unpromoted_pawn_on_file(&self, side: Side, file: u8) -> bool {
        (1..=BOARD_SIZE).any(|rank| {
            self.get(Square::new_unchecked(file, rank)) == Some(Piece::new(PieceKind::Pawn, side))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  9  8  7  6  5  4  3  2  1")?;
        for rank in 1..=BOARD_SIZE {
            for file in (1..=BOARD_SIZE).rev() {
                match self.get(Square::new_unchecked(file, rank)) {
                    Some(piece) if piece.owner == Side::Gote => {
                        write!(f, " v{}", piece.display_char())?
                    }
                    Some(piece) => write!(f, "  {}", piece.display_char())?,
                    None => write!(f, "  ・")?,
                }
            }
            writeln!(f, " {}", rank)?;
        }
        Ok(())
    }
}

/// 持驹：原驹种类 -> 数量（数量为 0 的条目会被移除）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    counts: BTreeMap<PieceKind, u8>,
}

impl Hand {
    /// 创建空持驹
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取某种棋子的数量
    pub fn count(&self, kind: PieceKind) -> u8 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// 加入一枚棋子（成驹按原驹计）
    pub fn add(&mut self, kind: PieceKind) {
        let count = self.counts.entry(kind.base()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// 取出一枚棋子，没有时返回 false
    pub fn remove(&mut self, kind: PieceKind) -> bool {
        match self.counts.get_mut(&kind) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&kind);
                true
            }
            None => false,
        }
    }

    /// 持有的棋子种类及数量
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u8)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }

    /// 持驹总数
    pub fn total(&self) -> usize {
        self.counts.values().map(|c| *c as usize).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// 双方持驹
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hands {
    pub sente: Hand,
    pub gote: Hand,
}

impl Hands {
    /// 获取指定阵营的持驹
    pub fn get(&self, side: Side) -> &Hand {
        match side {
            Side::Sente => &self.sente,
            Side::Gote => &self.gote,
        }
    }

    /// 获取指定阵营的持驹（可变）
    pub fn get_mut(&mut self, side: Side) -> &mut Hand {
        match side {
            Side::Sente => &mut self.sente,
            Side::Gote => &mut self.gote,
        }
    }
}

/// 完整的局面状态（棋盘、持驹、走子方）
///
/// 局面是不可变的值：规则引擎的所有操作都只读取 `&GameState` 并返回新值，
/// 将死判定等模拟走法都在副本上进行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    hands: Hands,
    turn: Side,
    /// 手数（从 1 开始，每走一步 +1）
    move_number: u32,
}

impl GameState {
    /// 创建平手初始局面
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            hands: Hands::default(),
            turn: Side::Sente,
            move_number: 1,
        }
    }

    /// 从棋盘和持驹创建局面（会检查不变量）
    pub fn new(board: Board, hands: Hands, turn: Side) -> Result<Self, ShogiError> {
        let state = Self {
            board,
            hands,
            turn,
            move_number: 1,
        };
        state.validate()?;
        Ok(state)
    }

    /// 设置手数（解码器使用）
    pub(crate) fn with_move_number(mut self, move_number: u32) -> Self {
        self.move_number = move_number;
        self
    }

    /// 由规则引擎直接组装下一局面，不做检查
    pub(crate) fn from_parts(board: Board, hands: Hands, turn: Side, move_number: u32) -> Self {
        Self {
            board,
            hands,
            turn,
            move_number,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    /// 指定阵营的持驹
    pub fn hand(&self, side: Side) -> &Hand {
        self.hands.get(side)
    }

    /// 当前走子方
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// 棋子总数（盘上 + 双方持驹）
    pub fn piece_count(&self) -> usize {
        self.board.all_pieces().len() + self.hands.sente.total() + self.hands.gote.total()
    }

    /// 检查局面不变量：每方至多一个玉、没有二步、持驹只含可打入的原驹
    pub fn validate(&self) -> Result<(), ShogiError> {
        for side in [Side::Sente, Side::Gote] {
            let pieces = self.board.pieces(side);

            let kings = pieces.iter().filter(|(_, p)| p.kind == PieceKind::King).count();
            if kings > 1 {
                return Err(ShogiError::invariant(format!("{} has {} kings", side, kings)));
            }

            let mut pawn_files = [false; BOARD_SIZE as usize + 1];
            for (sq, piece) in &pieces {
                if piece.kind != PieceKind::Pawn {
                    continue;
                }
                if pawn_files[sq.file as usize] {
                    return Err(ShogiError::invariant(format!(
                        "{} has two pawns on file {}",
                        side, sq.file
                    )));
                }
                pawn_files[sq.file as usize] = true;
            }

            for (kind, count) in self.hands.get(side).iter() {
                if !kind.is_droppable() {
                    return Err(ShogiError::invariant(format!("{} holds {:?} in hand", side, kind)));
                }
                if count > kind.max_count() {
                    return Err(ShogiError::invariant(format!(
                        "{} holds {} {:?} in hand",
                        side, count, kind
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
