//! 盤面の 180 度回転。
//!
//! 後手番の局面を先手視点に正規化するのに使う。

use crate::bitboard::Bitboard;
use crate::shogi::*;

/// マス単位の 180 度回転表。
///
/// 一度作って使い回す。回転は対合(2 回適用すると元に戻る)。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rotator {
    table: [Square; Square::NUM],
}

impl Rotator {
    pub fn new() -> Self {
        let mut table = [SQ_91; Square::NUM];
        for sq in Square::iter() {
            table[usize::from(sq)] = Square::from_inner(Square::NUM as i32 - 1 - sq.inner());
        }

        Self { table }
    }

    /// マスを 180 度回転したマスを返す。
    pub fn rotate_square(&self, sq: Square) -> Square {
        self.table[usize::from(sq)]
    }

    /// bitboard を 180 度回転した bitboard を返す。
    ///
    /// 立っているビットのみを走査する。
    pub fn rotate_bitboard(&self, bb: Bitboard) -> Bitboard {
        let mut res = Bitboard::zero();
        bb.for_each_square(|sq| res |= Bitboard::from(self.rotate_square(sq)));

        res
    }
}

impl Default for Rotator {
    fn default() -> Self {
        Self::new()
    }
}
