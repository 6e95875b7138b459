//! 局面操作・指し手ラベル化・棋譜再生のエラー型。
//!
//! ライブラリの境界では型付きのエラーを返し、バイナリ側で `anyhow` に包む。

use thiserror::Error;

use crate::shogi::*;

/// 局面に指し手を適用できなかった理由。
///
/// これが返されたとき、局面は変更されていない。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BoardError {
    #[error("no piece on source square {0:?}")]
    NoPieceAtSource(Square),

    #[error("piece on {sq:?} belongs to {owner:?}, not to the side to move")]
    NotOwnPiece { sq: Square, owner: Side },

    #[error("destination {0:?} is occupied by own piece")]
    OwnPieceAtDestination(Square),

    #[error("king on {0:?} cannot be captured")]
    KingCapture(Square),

    #[error("{pk:?} on {sq:?} cannot promote")]
    NotPromotable { sq: Square, pk: PieceKind },

    #[error("{0:?} cannot be dropped")]
    NotHandKind(PieceKind),

    #[error("{side:?} has no {pk:?} in hand")]
    EmptyHand { side: Side, pk: PieceKind },

    #[error("drop destination {0:?} is occupied")]
    DropOnOccupied(Square),

    #[error("{side:?} would hold too many {pk:?} in hand")]
    HandOverflow { side: Side, pk: PieceKind },
}

/// 指し手をラベルに符号化できなかった理由。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EncodeError {
    /// 移動量が (0, 0)、つまり移動元と移動先が同じ。
    #[error("degenerate displacement (dy={dy}, dx={dx})")]
    Degenerate { dy: i32, dx: i32 },

    #[error("{0:?} is not a droppable piece kind")]
    NotDroppable(PieceKind),
}

/// 棋譜再生中のエラーの中身。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ReplayErrorKind {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// 棋譜再生中のエラー。何手目のどの指し手で失敗したかを持つ。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("ply {ply} ({mv}): {kind}")]
pub struct ReplayError {
    /// 1 始まりの手数。
    pub ply: u32,
    pub mv: Move,
    pub kind: ReplayErrorKind,
}

/// 設定と呼び出し側の期待値が食い違っている。
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("input channel mismatch: expected {expected}, configured {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("label count mismatch: expected {expected}, configured {actual}")]
    LabelMismatch { expected: usize, actual: usize },
}
