//! スナップショットからの特徴量抽出。
//!
//! 各陣営(手番側が先)について次のプレーンをこの順に並べる:
//!
//! * 駒種ごとの配置 14 枚(`PieceKind` の順)
//! * 手駒の閾値プレーン(歩 18, 香 4, 桂 4, 銀 4, 金 4, 角 2, 飛 2 の計 38 枚)。
//!   `n` 枚目は手駒の枚数が `n` を超えていれば全マス 1 となる。
//!
//! 合計 104 枚。

use crate::bitboard::Bitboard;
use crate::config::EncoderConfig;
use crate::error::ConfigError;
use crate::shogi::*;
use crate::snapshot::Snapshot;

/// 9x9 の 2 値プレーン。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Plane(Bitboard);

impl Plane {
    pub const fn new(bb: Bitboard) -> Self {
        Self(bb)
    }

    pub const fn bitboard(self) -> Bitboard {
        self.0
    }

    pub fn get(self, row: Row, col: Col) -> bool {
        self.0.test_square(Square::from_col_row(col, row))
    }

    pub fn count_ones(self) -> u32 {
        self.0.count_ones()
    }
}

/// プレーンの列。
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Features(Vec<Plane>);

impl Features {
    /// チャンネル数を返す。
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `c` 番目のプレーンを返す。
    pub fn plane(&self, c: usize) -> Option<Plane> {
        self.0.get(c).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Plane> + '_ {
        self.0.iter().copied()
    }

    /// (チャンネル, 段, 筋) の順に並べた 0/1 の配列を返す。
    ///
    /// 段は一段目が先、筋は九筋が先。
    pub fn to_flat_vec(&self) -> Vec<f32> {
        let mut res = vec![0.0; self.0.len() * Square::NUM];

        for (plane, chunk) in self.0.iter().zip(res.chunks_exact_mut(Square::NUM)) {
            plane.0.for_each_square(|sq| chunk[usize::from(sq)] = 1.0);
        }

        res
    }

    /// 各プレーンを bitboard の内部値として詰めた配列を返す。
    pub fn to_packed(&self) -> Vec<u128> {
        self.0.iter().map(|plane| plane.0.inner()).collect()
    }

    /// `to_packed()` の逆変換。盤面外のビットは落とされる。
    pub fn from_packed(packed: &[u128]) -> Self {
        Self(
            packed
                .iter()
                .map(|&inner| Plane(Bitboard::from_inner(inner)))
                .collect(),
        )
    }
}

impl std::ops::Index<usize> for Features {
    type Output = Plane;

    fn index(&self, c: usize) -> &Self::Output {
        &self.0[c]
    }
}

/// 特徴量抽出器。
#[derive(Clone, Copy, Debug)]
pub struct FeatureExtractor<'a> {
    config: &'a EncoderConfig,
}

impl<'a> FeatureExtractor<'a> {
    /// 抽出器を作る。
    ///
    /// 生成されるプレーン数が `expected_channels` と一致しなければエラーを返す。
    pub fn new(config: &'a EncoderConfig, expected_channels: usize) -> Result<Self, ConfigError> {
        config.ensure_input_channels(expected_channels)?;

        Ok(Self { config })
    }

    pub fn channels(&self) -> usize {
        self.config.input_channels()
    }

    /// スナップショットから特徴量を抽出する。
    pub fn extract(&self, snap: &Snapshot) -> Features {
        let mut planes = Vec::with_capacity(self.channels());

        for side in Side::iter() {
            let bb_side = snap.bb_occupied_side(side);
            planes.extend(
                PieceKind::iter_piece().map(|pk| Plane(snap.bb_piece_kind(pk) & bb_side)),
            );

            let hand = snap.hand(side);
            for (pk, limit) in self.config.hand_limits() {
                let count = hand[pk];
                planes.extend((0..limit).map(|n| {
                    Plane(if count > n {
                        Bitboard::all()
                    } else {
                        Bitboard::zero()
                    })
                }));
            }
        }

        debug_assert_eq!(planes.len(), self.channels());

        Features(planes)
    }
}
