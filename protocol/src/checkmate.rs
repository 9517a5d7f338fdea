//! 将死与无子可动判定

use tracing::trace;

use crate::board::GameState;
use crate::check::CheckDetector;
use crate::drops::DropGenerator;
use crate::legal::LegalMoveFilter;
use crate::piece::{Side, Square};

/// 将死检测器
pub struct CheckmateDetector;

impl CheckmateDetector {
    /// 检查 `side` 是否被将死：被将军，且所有走子与打入都无法解除
    pub fn is_checkmate(state: &GameState, side: Side) -> bool {
        if !CheckDetector::is_in_check(state.board(), side) {
            return false;
        }
        let mated = !Self::has_legal_move(state, side);
        if mated {
            trace!(%side, "将死");
        }
        mated
    }

    /// 检查 `side` 是否没有被将军但无路可走
    ///
    /// 将棋中这种情况同样判负，规则引擎只负责识别。
    pub fn is_stalemate(state: &GameState, side: Side) -> bool {
        !CheckDetector::is_in_check(state.board(), side) && !Self::has_legal_move(state, side)
    }

    /// `side` 是否至少有一个合法走法（找到第一个即返回）
    pub fn has_legal_move(state: &GameState, side: Side) -> bool {
        let view = Self::as_mover(state, side);

        let board_escape = view
            .board()
            .pieces(side)
            .into_iter()
            .any(|(from, _)| !LegalMoveFilter::legal_board_moves(&view, from).is_empty());
        if board_escape {
            return true;
        }

        let drop_escape = view.hand(side).iter().any(|(kind, _)| {
            Square::all().any(|to| DropGenerator::is_legal_drop(&view, side, kind, to))
        });
        drop_escape
    }

    /// 以 `side` 为走子方的局面视图
    fn as_mover(state: &GameState, side: Side) -> GameState {
        if state.turn() == side {
            return state.clone();
        }
        GameState::from_parts(
            state.board().clone(),
            state.hands().clone(),
            side,
            state.move_number(),
        )
    }
}
