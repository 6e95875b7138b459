//! 手番側から見た局面の写し。

use crate::bitboard::Bitboard;
use crate::position::{BbOccSide, BbPk};
use crate::rotate::Rotator;
use crate::shogi::*;

/// 局面の写し。特徴量抽出の入力となる。
///
/// `Position::snapshot()` で作られたものは手番側から見たものに正規化されており、
/// `Side::Black` 側が常に手番側を表す。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Snapshot {
    bb_pk: BbPk,
    bb_occ_side: BbOccSide,
    hands: Hands,
}

impl Snapshot {
    pub(crate) fn new(bb_pk: BbPk, bb_occ_side: BbOccSide, hands: Hands) -> Self {
        Self {
            bb_pk,
            bb_occ_side,
            hands,
        }
    }

    /// 盤面を 180 度回転し、両陣営を入れ替えたものを返す。
    ///
    /// 2 回適用すると元に戻る。
    pub fn rotate180(&self, rotator: &Rotator) -> Self {
        let mut bb_pk = BbPk::default();
        for pk in PieceKind::iter_piece() {
            bb_pk[pk] = rotator.rotate_bitboard(self.bb_pk[pk]);
        }

        let bb_occ_side = BbOccSide::from([
            rotator.rotate_bitboard(self.bb_occ_side[Side::White]),
            rotator.rotate_bitboard(self.bb_occ_side[Side::Black]),
        ]);

        let hands = Hands::from([self.hands[Side::White], self.hands[Side::Black]]);

        Self {
            bb_pk,
            bb_occ_side,
            hands,
        }
    }

    /// 指定した駒種の bitboard (陣営を区別しない)を返す。
    pub fn bb_piece_kind(&self, pk: PieceKind) -> Bitboard {
        self.bb_pk[pk]
    }

    /// 指定した陣営の occupied bitboard を返す。
    pub fn bb_occupied_side(&self, side: Side) -> Bitboard {
        self.bb_occ_side[side]
    }

    /// 指定した陣営、駒種の bitboard を返す。
    pub fn bb_piece(&self, side: Side, pk: PieceKind) -> Bitboard {
        self.bb_occ_side[side] & self.bb_pk[pk]
    }

    /// 指定した陣営の手駒を返す。
    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    use crate::config::EncoderConfig;
    use crate::position::Position;

    #[test]
    fn test_rotate180_involution() {
        let config = EncoderConfig::new();
        let rot = Rotator::new();

        let mut pos = Position::startpos();
        pos.do_move(&config, Move::new_walk(SQ_77, SQ_76)).unwrap();
        pos.do_move(&config, Move::new_walk(SQ_33, SQ_34)).unwrap();
        pos.do_move(&config, Move::new_walk_promotion(SQ_88, SQ_22)).unwrap();

        // 後手番なので正規化済み。回転し直すと実際の盤面になる。
        let snap = pos.snapshot(&rot);
        let raw = snap.rotate180(&rot);

        assert_ne!(raw, snap);
        assert_eq!(raw.rotate180(&rot), snap);

        assert_eq!(raw.hand(Side::Black)[PieceKind::Bishop], 1);
        assert!(raw
            .bb_piece(Side::Black, PieceKind::Horse)
            .test_square(SQ_22));

        assert_eq!(snap.hand(Side::White)[PieceKind::Bishop], 1);
        assert!(snap.hand(Side::Black).is_empty());
        assert!(snap
            .bb_piece(Side::White, PieceKind::Horse)
            .test_square(SQ_88));
    }
}
