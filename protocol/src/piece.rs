//! 棋子定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, PROMOTION_ZONE_DEPTH, SQUARE_COUNT};

/// 棋子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    /// 玉将/王将
    King,
    /// 飞车
    Rook,
    /// 角行
    Bishop,
    /// 金将
    Gold,
    /// 银将
    Silver,
    /// 桂马
    Knight,
    /// 香车
    Lance,
    /// 步兵
    Pawn,
    /// 龙王
    PromotedRook,
    /// 龙马
    PromotedBishop,
    /// 成银
    PromotedSilver,
    /// 成桂
    PromotedKnight,
    /// 成香
    PromotedLance,
    /// と金
    PromotedPawn,
}

/// 可以进入持驹的棋子种类（SFEN 持驹顺序）
pub const HAND_KINDS: [PieceKind; 7] = [
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Gold,
    PieceKind::Silver,
    PieceKind::Knight,
    PieceKind::Lance,
    PieceKind::Pawn,
];

impl PieceKind {
    /// 是否为成驹
    pub fn is_promoted(&self) -> bool {
        matches!(
            self,
            PieceKind::PromotedRook
                | PieceKind::PromotedBishop
                | PieceKind::PromotedSilver
                | PieceKind::PromotedKnight
                | PieceKind::PromotedLance
                | PieceKind::PromotedPawn
        )
    }

    /// 是否可以升变（玉、金、成驹不可）
    pub fn can_promote(&self) -> bool {
        self.promote().is_some()
    }

    /// 升变后的种类
    pub fn promote(&self) -> Option<PieceKind> {
        match self {
            PieceKind::Rook => Some(PieceKind::PromotedRook),
            PieceKind::Bishop => Some(PieceKind::PromotedBishop),
            PieceKind::Silver => Some(PieceKind::PromotedSilver),
            PieceKind::Knight => Some(PieceKind::PromotedKnight),
            PieceKind::Lance => Some(PieceKind::PromotedLance),
            PieceKind::Pawn => Some(PieceKind::PromotedPawn),
            _ => None,
        }
    }

    /// 原驹种类（被吃后进入持驹时使用）
    pub fn base(&self) -> PieceKind {
        match self {
            PieceKind::PromotedRook => PieceKind::Rook,
            PieceKind::PromotedBishop => PieceKind::Bishop,
            PieceKind::PromotedSilver => PieceKind::Silver,
            PieceKind::PromotedKnight => PieceKind::Knight,
            PieceKind::PromotedLance => PieceKind::Lance,
            PieceKind::PromotedPawn => PieceKind::Pawn,
            other => *other,
        }
    }

    /// 是否可以打入
    pub fn is_droppable(&self) -> bool {
        !self.is_promoted() && *self != PieceKind::King
    }

    /// 一副棋中该原驹的枚数
    pub fn max_count(&self) -> u8 {
        match self.base() {
            PieceKind::Pawn => 18,
            PieceKind::King | PieceKind::Rook | PieceKind::Bishop => 2,
            _ => 4,
        }
    }

    /// 获取 SFEN 字母（原驹字母，大写）
    pub fn letter(&self) -> char {
        match self.base() {
            PieceKind::King => 'K',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Gold => 'G',
            PieceKind::Silver => 'S',
            PieceKind::Knight => 'N',
            PieceKind::Lance => 'L',
            _ => 'P',
        }
    }

    /// 从 SFEN 字母解析原驹种类（大小写均可）
    pub fn from_letter(c: char) -> Option<PieceKind> {
        let kind = match c.to_ascii_uppercase() {
            'K' => PieceKind::King,
            'R' => PieceKind::Rook,
            'B' => PieceKind::Bishop,
            'G' => PieceKind::Gold,
            'S' => PieceKind::Silver,
            'N' => PieceKind::Knight,
            'L' => PieceKind::Lance,
            'P' => PieceKind::Pawn,
            _ => return None,
        };
        Some(kind)
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 先手（向一段方向前进）
    Sente,
    /// 后手（向九段方向前进）
    Gote,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Sente => Side::Gote,
            Side::Gote => Side::Sente,
        }
    }

    /// 以本方视角计算段数：1 表示最远的一段
    pub fn relative_rank(&self, rank: u8) -> u8 {
        match self {
            Side::Sente => rank,
            Side::Gote => BOARD_SIZE + 1 - rank,
        }
    }

    /// 获取 SFEN 字符
    pub fn to_sfen_char(&self) -> char {
        match self {
            Side::Sente => 'b',
            Side::Gote => 'w',
        }
    }

    /// 从 SFEN 字符解析
    pub fn from_sfen_char(c: char) -> Option<Side> {
        match c {
            'b' => Some(Side::Sente),
            'w' => Some(Side::Gote),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Sente => write!(f, "先手"),
            Side::Gote => write!(f, "后手"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, owner: Side) -> Self {
        Self { kind, owner }
    }

    /// 获取棋子显示的汉字
    pub fn display_char(&self) -> char {
        match self.kind {
            PieceKind::King => match self.owner {
                Side::Sente => '玉',
                Side::Gote => '王',
            },
            PieceKind::Rook => '飛',
            PieceKind::Bishop => '角',
            PieceKind::Gold => '金',
            PieceKind::Silver => '銀',
            PieceKind::Knight => '桂',
            PieceKind::Lance => '香',
            PieceKind::Pawn => '歩',
            PieceKind::PromotedRook => '龍',
            PieceKind::PromotedBishop => '馬',
            PieceKind::PromotedSilver => '全',
            PieceKind::PromotedKnight => '圭',
            PieceKind::PromotedLance => '杏',
            PieceKind::PromotedPawn => 'と',
        }
    }

    /// 获取记号：先手大写，后手小写，成驹加 `+` 前缀
    pub fn token(&self) -> String {
        let letter = match self.owner {
            Side::Sente => self.kind.letter(),
            Side::Gote => self.kind.letter().to_ascii_lowercase(),
        };
        if self.kind.is_promoted() {
            format!("+{}", letter)
        } else {
            letter.to_string()
        }
    }

    /// 从记号解析
    pub fn from_token(token: &str) -> Option<Piece> {
        let (promoted, rest) = match token.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let mut chars = rest.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let owner = if c.is_ascii_uppercase() {
            Side::Sente
        } else {
            Side::Gote
        };
        let base = PieceKind::from_letter(c)?;
        let kind = if promoted { base.promote()? } else { base };
        Some(Piece::new(kind, owner))
    }
}

/// 棋盘格子：筋 (file) 1-9，段 (rank) 1-9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    /// 筋 (1-9)
    pub(crate) file: u8,
    /// 段 (1-9)
    pub(crate) rank: u8,
}

impl Square {
    /// 创建新格子
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=BOARD_SIZE).contains(&file) && (1..=BOARD_SIZE).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，调用方保证 1-9）
    pub(crate) const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    pub const fn file(&self) -> u8 {
        self.file
    }

    pub const fn rank(&self) -> u8 {
        self.rank
    }

    /// 遍历全部 81 格（一段从九筋到一筋，依次到九段）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT).filter_map(Square::from_index)
    }

    /// 获取偏移后的格子
    pub fn offset(&self, d_rank: i8, d_file: i8) -> Option<Square> {
        let rank = self.rank as i8 + d_rank;
        let file = self.file as i8 + d_file;
        if rank < 1 || file < 1 {
            return None;
        }
        Square::new(file as u8, rank as u8)
    }

    /// 以 `side` 视角是否处于敌阵（升变区）
    pub fn is_in_promotion_zone(&self, side: Side) -> bool {
        side.relative_rank(self.rank) <= PROMOTION_ZONE_DEPTH
    }

    /// 转换为数组索引（段优先，九筋在前）
    pub fn to_index(&self) -> usize {
        (self.rank - 1) as usize * BOARD_SIZE as usize + (BOARD_SIZE - self.file) as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < SQUARE_COUNT {
            let size = BOARD_SIZE as usize;
            Some(Square {
                file: BOARD_SIZE - (index % size) as u8,
                rank: (index / size) as u8 + 1,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
        if s.len() != 2 || digits.len() != 2 {
            return Err(format!("invalid square token: {:?}", s));
        }
        Square::new(digits[0] as u8, digits[1] as u8)
            .ok_or_else(|| format!("square out of range: {:?}", s))
    }
}

impl TryFrom<String> for Square {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_token() {
        let pawn = Piece::new(PieceKind::Pawn, Side::Sente);
        assert_eq!(pawn.token(), "P");

        let dragon = Piece::new(PieceKind::PromotedRook, Side::Gote);
        assert_eq!(dragon.token(), "+r");

        assert_eq!(
            Piece::from_token("+B"),
            Some(Piece::new(PieceKind::PromotedBishop, Side::Sente))
        );
        assert_eq!(Piece::from_token("n"), Some(Piece::new(PieceKind::Knight, Side::Gote)));
        // 金和玉没有成驹
        assert_eq!(Piece::from_token("+G"), None);
        assert_eq!(Piece::from_token("+k"), None);
        assert_eq!(Piece::from_token(""), None);
        assert_eq!(Piece::from_token("PP"), None);
    }

    #[test]
    fn test_piece_display_char() {
        assert_eq!(Piece::new(PieceKind::King, Side::Sente).display_char(), '玉');
        assert_eq!(Piece::new(PieceKind::King, Side::Gote).display_char(), '王');
        assert_eq!(Piece::new(PieceKind::PromotedPawn, Side::Gote).display_char(), 'と');
    }

    #[test]
    fn test_kind_promotion() {
        assert_eq!(PieceKind::Silver.promote(), Some(PieceKind::PromotedSilver));
        assert_eq!(PieceKind::Gold.promote(), None);
        assert_eq!(PieceKind::King.promote(), None);
        assert_eq!(PieceKind::PromotedLance.promote(), None);
        assert_eq!(PieceKind::PromotedLance.base(), PieceKind::Lance);
        assert!(PieceKind::Knight.can_promote());
        assert!(!PieceKind::PromotedKnight.can_promote());
        assert!(PieceKind::Gold.is_droppable());
        assert!(!PieceKind::King.is_droppable());
        assert!(!PieceKind::PromotedPawn.is_droppable());
        assert_eq!(PieceKind::Pawn.max_count(), 18);
        assert_eq!(PieceKind::PromotedRook.max_count(), 2);
        assert_eq!(PieceKind::Lance.max_count(), 4);
    }

    #[test]
    fn test_square_token() {
        let sq = Square::new(7, 6).unwrap();
        assert_eq!(sq.to_string(), "76");
        assert_eq!("76".parse::<Square>(), Ok(sq));
        assert!("06".parse::<Square>().is_err());
        assert!("7".parse::<Square>().is_err());
        assert!("7x".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_index() {
        assert_eq!(Square::new_unchecked(9, 1).to_index(), 0);
        assert_eq!(Square::new_unchecked(1, 9).to_index(), 80);
        for sq in Square::all() {
            assert_eq!(Square::from_index(sq.to_index()), Some(sq));
        }
        assert_eq!(Square::all().count(), 81);
    }

    #[test]
    fn test_square_checked_construction() {
        assert_eq!(Square::new(0, 5), None);
        assert_eq!(Square::new(5, 10), None);
        let sq = Square::new(3, 7).unwrap();
        assert_eq!((sq.file(), sq.rank()), (3, 7));
        assert_eq!("06".parse::<Square>().ok(), None);
        assert_eq!("91".parse::<Square>().map(|sq| sq.to_index()), Ok(0));
    }

    #[test]
    fn test_square_offset() {
        let sq = Square::new_unchecked(1, 1);
        assert_eq!(sq.offset(-1, 0), None);
        assert_eq!(sq.offset(0, -1), None);
        assert_eq!(sq.offset(1, 1), Some(Square::new_unchecked(2, 2)));
        assert_eq!(Square::new_unchecked(9, 9).offset(1, 0), None);
    }

    #[test]
    fn test_promotion_zone() {
        assert!(Square::new_unchecked(5, 3).is_in_promotion_zone(Side::Sente));
        assert!(!Square::new_unchecked(5, 4).is_in_promotion_zone(Side::Sente));
        assert!(Square::new_unchecked(5, 7).is_in_promotion_zone(Side::Gote));
        assert!(!Square::new_unchecked(5, 6).is_in_promotion_zone(Side::Gote));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Sente.opponent(), Side::Gote);
        assert_eq!(Side::Gote.opponent(), Side::Sente);
        assert_eq!(Side::Gote.relative_rank(9), 1);
    }

    #[test]
    fn test_square_serde() {
        let sq = Square::new_unchecked(5, 5);
        assert_eq!(serde_json::to_string(&sq).unwrap(), "\"55\"");
        let back: Square = serde_json::from_str("\"55\"").unwrap();
        assert_eq!(back, sq);
        assert!(serde_json::from_str::<Square>("\"00\"").is_err());
    }
}
