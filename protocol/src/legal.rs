//! 合法走法过滤：去掉走后己方玉被将军的走法

use crate::apply::{MoveApplier, PromotionOption};
use crate::board::GameState;
use crate::check::CheckDetector;
use crate::drops::DropGenerator;
use crate::moves::{Move, MoveGenerator};
use crate::piece::Square;

/// 合法走法过滤器
pub struct LegalMoveFilter;

impl LegalMoveFilter {
    /// 生成 `from` 上棋子的所有合法目标格
    pub fn legal_board_moves(state: &GameState, from: Square) -> Vec<Square> {
        let board = state.board();
        let mover = match board.get(from) {
            Some(piece) => piece.owner,
            None => return Vec::new(),
        };

        MoveGenerator::raw_moves(board, from)
            .into_iter()
            .filter(|to| {
                // 模拟走法
                let mut test_board = board.clone();
                test_board.move_piece(from, *to);
                !CheckDetector::is_in_check(&test_board, mover)
            })
            .collect()
    }

    /// 生成当前走子方的所有合法走法（升变选择已展开，包含打入）
    pub fn legal_moves(state: &GameState) -> Vec<Move> {
        let side = state.turn();
        let board = state.board();
        let mut moves = Vec::with_capacity(128);

        for (from, piece) in board.pieces(side) {
            for to in Self::legal_board_moves(state, from) {
                match MoveApplier::promotion_option(piece, from, to) {
                    PromotionOption::Forced => moves.push(Move::with_promotion(from, to, true)),
                    PromotionOption::Optional => {
                        moves.push(Move::with_promotion(from, to, false));
                        moves.push(Move::with_promotion(from, to, true));
                    }
                    PromotionOption::None => moves.push(Move::new(from, to)),
                }
            }
        }

        for (kind, _) in state.hand(side).iter() {
            for to in DropGenerator::legal_drops(state, side, kind) {
                moves.push(Move::drop(kind, to));
            }
        }

        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceKind, Side};
    use crate::sfen::Sfen;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new_unchecked(file, rank)
    }

    #[test]
    fn test_initial_move_count() {
        // 平手初始局面先手有 30 种合法走法：
        // 步兵 9，香车 2，银将 4，金将 6，玉 3，飞车 6，角行与桂马 0
        let state = GameState::initial();
        assert_eq!(LegalMoveFilter::legal_moves(&state).len(), 30);
    }

    #[test]
    fn test_initial_pawn_push() {
        let state = GameState::initial();
        assert_eq!(LegalMoveFilter::legal_board_moves(&state, sq(7, 7)), vec![sq(7, 6)]);
    }

    #[test]
    fn test_pinned_piece_cannot_leave_line() {
        // 先手金 58 被后手飞车 51 钉住，只能沿五筋移动
        let state = Sfen::parse("k3r4/9/9/9/9/9/9/4G4/4K4 b - 1").unwrap();
        let mut moves = LegalMoveFilter::legal_board_moves(&state, sq(5, 8));
        moves.sort();
        assert_eq!(moves, vec![sq(5, 7)]);
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        // 后手飞车 41 控制四筋
        let state = Sfen::parse("k4r3/9/9/9/9/9/9/9/4K4 b - 1").unwrap();
        let moves = LegalMoveFilter::legal_board_moves(&state, sq(5, 9));
        assert!(!moves.contains(&sq(4, 9)));
        assert!(!moves.contains(&sq(4, 8)));
        assert!(moves.contains(&sq(6, 8)));
    }

    #[test]
    fn test_legal_moves_expand_promotion() {
        let state = Sfen::parse("k8/9/5S3/9/9/9/9/9/4K4 b - 1").unwrap();
        let moves = LegalMoveFilter::legal_moves(&state);

        assert!(moves.contains(&Move::with_promotion(sq(4, 3), sq(4, 2), false)));
        assert!(moves.contains(&Move::with_promotion(sq(4, 3), sq(4, 2), true)));
        // 玉的走法不涉及升变
        assert!(moves.contains(&Move::new(sq(5, 9), sq(5, 8))));
    }

    #[test]
    fn test_legal_moves_include_drops() {
        let state = Sfen::parse("k8/9/9/9/9/9/9/9/4K4 b G 1").unwrap();
        let moves = LegalMoveFilter::legal_moves(&state);
        let drops = moves
            .iter()
            .filter(|mv| matches!(mv, Move::Drop { kind: PieceKind::Gold, .. }))
            .count();
        // 81 格减去两个玉
        assert_eq!(drops, 79);
    }

    #[test]
    fn test_no_move_targets_own_piece() {
        let state = GameState::initial();
        for mv in LegalMoveFilter::legal_moves(&state) {
            if let Some(piece) = state.board().get(mv.to()) {
                assert_ne!(piece.owner, Side::Sente, "走到己方棋子上: {}", mv);
            }
        }
    }
}
