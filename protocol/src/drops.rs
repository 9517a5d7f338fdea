//! 持驹打入生成
//!
//! 一个格子可以打入，当且仅当以下条件全部满足：
//! 1. 格子为空
//! 2. 步兵、香车不能打在最远的一段；桂马不能打在最远的两段
//! 3. 步兵不能打在已有己方未成步兵的筋上（二步）
//! 4. 打入后己方玉不被将军
//! 5. 步兵打入后不能直接将死对方（打步诘）

use tracing::trace;

use crate::board::GameState;
use crate::check::CheckDetector;
use crate::checkmate::CheckmateDetector;
use crate::piece::{Piece, PieceKind, Side, Square};

/// 打入生成器
pub struct DropGenerator;

impl DropGenerator {
    /// 生成 `owner` 打入 `kind` 的所有合法格子
    ///
    /// 不检查 `owner` 是否真的持有该棋子，由调用方负责。
    pub fn legal_drops(state: &GameState, owner: Side, kind: PieceKind) -> Vec<Square> {
        if !kind.is_droppable() {
            return Vec::new();
        }
        Square::all()
            .filter(|to| Self::is_legal_drop(state, owner, kind, *to))
            .collect()
    }

    /// 检查单个格子是否可以打入
    pub fn is_legal_drop(state: &GameState, owner: Side, kind: PieceKind, to: Square) -> bool {
        let board = state.board();
        if !kind.is_droppable() || board.get(to).is_some() {
            return false;
        }

        let relative_rank = owner.relative_rank(to.rank);
        match kind {
            PieceKind::Pawn | PieceKind::Lance if relative_rank == 1 => return false,
            PieceKind::Knight if relative_rank <= 2 => return false,
            _ => {}
        }

        if kind == PieceKind::Pawn && board.has_unpromoted_pawn_on_file(owner, to.file) {
            return false;
        }

        let next = Self::simulate(state, owner, kind, to);
        if CheckDetector::is_in_check(next.board(), owner) {
            return false;
        }

        if kind == PieceKind::Pawn {
            let opponent = owner.opponent();
            if CheckDetector::is_in_check(next.board(), opponent)
                && CheckmateDetector::is_checkmate(&next, opponent)
            {
                trace!(square = %to, "打步诘，禁止打入");
                return false;
            }
        }

        true
    }

    /// 在副本上模拟打入，返回轮到对方走的新局面
    pub(crate) fn simulate(
        state: &GameState,
        owner: Side,
        kind: PieceKind,
        to: Square,
    ) -> GameState {
        let mut board = state.board().clone();
        let mut hands = state.hands().clone();
        board.set(to, Some(Piece::new(kind, owner)));
        hands.get_mut(owner).remove(kind);
        GameState::from_parts(board, hands, owner.opponent(), state.move_number() + 1)
    }
}
