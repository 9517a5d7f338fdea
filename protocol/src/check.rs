//! 王手（将军）判定

use crate::board::Board;
use crate::moves::MoveGenerator;
use crate::piece::{Side, Square};

/// 将军检测器
pub struct CheckDetector;

impl CheckDetector {
    /// 检查指定阵营的玉是否被将军
    pub fn is_in_check(board: &Board, side: Side) -> bool {
        let king_sq = match board.find_king(side) {
            Some(sq) => sq,
            None => return false, // 没有玉，视为不被将军
        };

        board
            .pieces(side.opponent())
            .into_iter()
            .any(|(from, _)| MoveGenerator::raw_moves(board, from).contains(&king_sq))
    }

    /// 获取 `by` 一方能走到 `target` 的所有棋子位置
    pub fn attackers(board: &Board, target: Square, by: Side) -> Vec<Square> {
        board
            .pieces(by)
            .into_iter()
            .filter(|(from, _)| MoveGenerator::raw_moves(board, *from).contains(&target))
            .map(|(from, _)| from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfen::Sfen;

    #[test]
    fn test_initial_not_in_check() {
        let state = Sfen::initial();
        assert!(!CheckDetector::is_in_check(state.board(), Side::Sente));
        assert!(!CheckDetector::is_in_check(state.board(), Side::Gote));
    }

    #[test]
    fn test_check_by_rook() {
        // 后手飞车在 51 直射先手玉 59
        let state = Sfen::parse("4r4/9/9/9/9/9/9/9/4K4 b - 1").unwrap();
        assert!(CheckDetector::is_in_check(state.board(), Side::Sente));
        assert_eq!(
            CheckDetector::attackers(state.board(), Square::new_unchecked(5, 9), Side::Gote),
            vec![Square::new_unchecked(5, 1)]
        );
    }

    #[test]
    fn test_check_blocked() {
        let state = Sfen::parse("4r4/9/9/9/4P4/9/9/9/4K4 b - 1").unwrap();
        assert!(!CheckDetector::is_in_check(state.board(), Side::Sente));
    }

    #[test]
    fn test_check_by_gote_knight() {
        // 后手桂马 53 跳到 45 / 65
        let state = Sfen::parse("9/9/4n4/9/5K3/9/9/9/9 b - 1").unwrap();
        assert!(CheckDetector::is_in_check(state.board(), Side::Sente));
    }

    #[test]
    fn test_pawn_attacks_only_forward() {
        // 先手步兵 52 攻击 51，不攻击侧面的 41
        let state = Sfen::parse("4k4/4P4/9/9/9/9/9/9/9 w - 1").unwrap();
        assert!(CheckDetector::is_in_check(state.board(), Side::Gote));

        let state = Sfen::parse("5k3/4P4/9/9/9/9/9/9/9 w - 1").unwrap();
        assert!(!CheckDetector::is_in_check(state.board(), Side::Gote));
    }

    #[test]
    fn test_missing_king_is_not_check() {
        let state = Sfen::parse("4r4/9/9/9/9/9/9/9/9 b - 1").unwrap();
        assert!(!CheckDetector::is_in_check(state.board(), Side::Sente));
    }
}
