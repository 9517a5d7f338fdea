//! 走法执行
//!
//! 校验一个走法并返回新局面。输入局面不会被修改，校验失败时调用方手里的
//! 局面仍然有效。

use tracing::debug;

use crate::board::GameState;
use crate::drops::DropGenerator;
use crate::error::ShogiError;
use crate::legal::LegalMoveFilter;
use crate::moves::Move;
use crate::piece::{Piece, PieceKind, Square};

/// 升变选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOption {
    /// 必须升变（否则棋子再也无法移动）
    Forced,
    /// 可以升变，也可以不升变
    Optional,
    /// 不能升变
    None,
}

/// 走法执行器
pub struct MoveApplier;

impl MoveApplier {
    /// 判断 `piece` 从 `from` 走到 `to` 时的升变选项
    pub fn promotion_option(piece: Piece, from: Square, to: Square) -> PromotionOption {
        if !piece.kind.can_promote() {
            return PromotionOption::None;
        }
        let side = piece.owner;
        if !from.is_in_promotion_zone(side) && !to.is_in_promotion_zone(side) {
            return PromotionOption::None;
        }

        let relative_rank = side.relative_rank(to.rank);
        match piece.kind {
            PieceKind::Pawn | PieceKind::Lance if relative_rank == 1 => PromotionOption::Forced,
            PieceKind::Knight if relative_rank <= 2 => PromotionOption::Forced,
            _ => PromotionOption::Optional,
        }
    }

    /// 校验并执行走法，返回新局面
    pub fn apply(state: &GameState, mv: Move) -> Result<GameState, ShogiError> {
        let result = match mv {
            Move::Board { from, to, promote } => Self::apply_board_move(state, from, to, promote),
            Move::Drop { to, kind } => Self::apply_drop(state, to, kind),
        };
        if let Err(ref err) = result {
            debug!(%mv, error = %err, "走法被拒绝");
        }
        result
    }

    fn apply_board_move(
        state: &GameState,
        from: Square,
        to: Square,
        promote: Option<bool>,
    ) -> Result<GameState, ShogiError> {
        let mover = state.turn();
        let piece = state
            .board()
            .get(from)
            .ok_or(ShogiError::SquareEmpty { square: from })?;
        if piece.owner != mover {
            return Err(ShogiError::NotOwnedByMover { square: from });
        }

        if !LegalMoveFilter::legal_board_moves(state, from).contains(&to) {
            return Err(ShogiError::IllegalDestination { to });
        }

        let promoted = match (Self::promotion_option(piece, from, to), promote) {
            (PromotionOption::Forced, Some(false)) => {
                return Err(ShogiError::PromotionRequired { from, to })
            }
            (PromotionOption::Forced, _) => true,
            (PromotionOption::Optional, Some(choice)) => choice,
            (PromotionOption::Optional, None) => {
                return Err(ShogiError::AmbiguousPromotion { from, to })
            }
            (PromotionOption::None, Some(true)) => {
                return Err(ShogiError::PromotionNotAllowed { from, to })
            }
            (PromotionOption::None, _) => false,
        };

        let mut board = state.board().clone();
        let mut hands = state.hands().clone();

        let captured = board.move_piece(from, to);
        if let Some(captured) = captured {
            if captured.kind == PieceKind::King {
                return Err(ShogiError::invariant(format!(
                    "{} would capture the king at {}",
                    mover, to
                )));
            }
            hands.get_mut(mover).add(captured.kind.base());
        }

        if promoted {
            let kind = piece
                .kind
                .promote()
                .ok_or_else(|| ShogiError::invariant(format!("{:?} cannot promote", piece.kind)))?;
            board.set(to, Some(Piece::new(kind, mover)));
        }

        Ok(GameState::from_parts(
            board,
            hands,
            mover.opponent(),
            state.move_number() + 1,
        ))
    }

    fn apply_drop(state: &GameState, to: Square, kind: PieceKind) -> Result<GameState, ShogiError> {
        let mover = state.turn();
        if !kind.is_droppable() || state.hand(mover).count(kind) == 0 {
            return Err(ShogiError::NotInHand { kind });
        }
        if !DropGenerator::is_legal_drop(state, mover, kind, to) {
            return Err(ShogiError::IllegalDestination { to });
        }
        Ok(DropGenerator::simulate(state, mover, kind, to))
    }
}
