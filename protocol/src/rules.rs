//! 棋子走法表
//!
//! 每种棋子对应一个走法描述，偏移量统一以先手视角给出：
//! `(段变化, 筋变化)`，前进为段数减小。后手的偏移量取反即可。

use crate::piece::{PieceKind, Side};

/// 偏移量 `(d_rank, d_file)`
pub type Offset = (i8, i8);

const KING_STEPS: &[Offset] = &[
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const GOLD_STEPS: &[Offset] = &[(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0)];

const SILVER_STEPS: &[Offset] = &[(-1, -1), (-1, 0), (-1, 1), (1, -1), (1, 1)];

const KNIGHT_STEPS: &[Offset] = &[(-2, -1), (-2, 1)];

const PAWN_STEPS: &[Offset] = &[(-1, 0)];

const ORTHOGONAL: &[Offset] = &[(-1, 0), (1, 0), (0, -1), (0, 1)];

const DIAGONAL: &[Offset] = &[(-1, -1), (-1, 1), (1, -1), (1, 1)];

const FORWARD: &[Offset] = &[(-1, 0)];

/// 走法描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRule {
    /// 固定的一步走法
    Fixed(&'static [Offset]),
    /// 沿方向滑行直到被阻挡，外加一步走法补充（龙王、龙马）
    Sliding {
        directions: &'static [Offset],
        steps: &'static [Offset],
    },
}

impl MoveRule {
    /// 获取棋子种类的走法描述
    pub fn for_kind(kind: PieceKind) -> MoveRule {
        match kind {
            PieceKind::King => MoveRule::Fixed(KING_STEPS),
            PieceKind::Gold
            | PieceKind::PromotedSilver
            | PieceKind::PromotedKnight
            | PieceKind::PromotedLance
            | PieceKind::PromotedPawn => MoveRule::Fixed(GOLD_STEPS),
            PieceKind::Silver => MoveRule::Fixed(SILVER_STEPS),
            PieceKind::Knight => MoveRule::Fixed(KNIGHT_STEPS),
            PieceKind::Pawn => MoveRule::Fixed(PAWN_STEPS),
            PieceKind::Lance => MoveRule::Sliding {
                directions: FORWARD,
                steps: &[],
            },
            PieceKind::Rook => MoveRule::Sliding {
                directions: ORTHOGONAL,
                steps: &[],
            },
            PieceKind::Bishop => MoveRule::Sliding {
                directions: DIAGONAL,
                steps: &[],
            },
            PieceKind::PromotedRook => MoveRule::Sliding {
                directions: ORTHOGONAL,
                steps: DIAGONAL,
            },
            PieceKind::PromotedBishop => MoveRule::Sliding {
                directions: DIAGONAL,
                steps: ORTHOGONAL,
            },
        }
    }

    /// 一步走法
    pub fn steps(&self) -> &'static [Offset] {
        match *self {
            MoveRule::Fixed(steps) => steps,
            MoveRule::Sliding { steps, .. } => steps,
        }
    }

    /// 滑行方向
    pub fn directions(&self) -> &'static [Offset] {
        match *self {
            MoveRule::Fixed(_) => &[],
            MoveRule::Sliding { directions, .. } => directions,
        }
    }
}

/// 按阵营调整偏移方向（后手点对称）
pub fn oriented(offset: Offset, side: Side) -> Offset {
    match side {
        Side::Sente => offset,
        Side::Gote => (-offset.0, -offset.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promoted_minor_pieces_move_like_gold() {
        let gold = MoveRule::for_kind(PieceKind::Gold);
        for kind in [
            PieceKind::PromotedSilver,
            PieceKind::PromotedKnight,
            PieceKind::PromotedLance,
            PieceKind::PromotedPawn,
        ] {
            assert_eq!(MoveRule::for_kind(kind), gold);
        }
    }

    #[test]
    fn test_dragon_and_horse_cover_king_neighbourhood() {
        for kind in [PieceKind::PromotedRook, PieceKind::PromotedBishop] {
            let rule = MoveRule::for_kind(kind);
            let mut reach: Vec<Offset> =
                rule.steps().iter().chain(rule.directions()).copied().collect();
            reach.sort();
            let mut king = KING_STEPS.to_vec();
            king.sort();
            assert_eq!(reach, king);
        }
    }

    #[test]
    fn test_gote_orientation() {
        assert_eq!(oriented((-1, 0), Side::Gote), (1, 0));
        assert_eq!(oriented((-2, 1), Side::Gote), (2, -1));
        assert_eq!(oriented((-2, 1), Side::Sente), (-2, 1));
    }

    #[test]
    fn test_lance_slides_forward_only() {
        let rule = MoveRule::for_kind(PieceKind::Lance);
        assert_eq!(rule.directions(), FORWARD);
        assert!(rule.steps().is_empty());
    }
}
