//! 符号化器の設定。
//!
//! 盤の回転表、手駒の上限枚数、ラベル空間や入力チャンネル数など、
//! 全コンポーネントが共有する不変の値をまとめる。
//! 起動時に一度だけ作り、各コンポーネントへ参照で渡す。

use crate::error::ConfigError;
use crate::rotate::Rotator;
use crate::shogi::*;

/// 盤上の駒の移動方向の数(成/不成それぞれ 10 方向)。
pub const NUM_BOARD_DIRECTIONS: usize = 20;

/// 駒打ちの方向の数(手駒となりうる駒種ごとに 1 つ)。
pub const NUM_DROP_DIRECTIONS: usize = PieceKind::NUM_HAND;

/// 方向の総数。
pub const NUM_DIRECTIONS: usize = NUM_BOARD_DIRECTIONS + NUM_DROP_DIRECTIONS;

/// ラベルの総数。
pub const NUM_LABELS: usize = NUM_DIRECTIONS * Square::NUM;

/// 特徴量のチャンネル数。陣営ごとに駒プレーン 14 枚と手駒プレーン 38 枚。
pub const INPUT_CHANNELS: usize = 104;

/// 手駒となりうる駒種と、同時に持ちうる最大枚数。特徴量の並び順。
const HAND_LIMITS: [(PieceKind, u32); PieceKind::NUM_HAND] = [
    (PieceKind::Pawn, 18),
    (PieceKind::Lance, 4),
    (PieceKind::Knight, 4),
    (PieceKind::Silver, 4),
    (PieceKind::Gold, 4),
    (PieceKind::Bishop, 2),
    (PieceKind::Rook, 2),
];

/// 符号化器全体で共有する不変の設定。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncoderConfig {
    rotator: Rotator,
    hand_limits: [(PieceKind, u32); PieceKind::NUM_HAND],
}

impl EncoderConfig {
    pub fn new() -> Self {
        Self {
            rotator: Rotator::new(),
            hand_limits: HAND_LIMITS,
        }
    }

    pub fn rotator(&self) -> &Rotator {
        &self.rotator
    }

    /// 手駒となりうる駒種とその上限枚数を、特徴量の並び順に列挙する。
    pub fn hand_limits(&self) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        self.hand_limits.iter().copied()
    }

    /// 駒種 `pk` を手駒として同時に持ちうる最大枚数を返す。手駒とならない駒種なら 0。
    pub fn hand_limit(&self, pk: PieceKind) -> u32 {
        self.hand_limits
            .iter()
            .find(|&&(hk, _)| hk == pk)
            .map_or(0, |&(_, n)| n)
    }

    /// 1 陣営あたりの手駒プレーン数を返す。
    pub fn hand_planes_per_side(&self) -> usize {
        self.hand_limits.iter().map(|&(_, n)| n as usize).sum()
    }

    /// 特徴量のチャンネル数を返す。
    pub fn input_channels(&self) -> usize {
        2 * (PieceKind::NUM + self.hand_planes_per_side())
    }

    /// 方向の総数を返す。
    pub fn num_directions(&self) -> usize {
        NUM_BOARD_DIRECTIONS + self.hand_limits.len()
    }

    /// ラベルの総数を返す。
    pub fn num_labels(&self) -> usize {
        self.num_directions() * Square::NUM
    }

    /// 呼び出し側が想定するチャンネル数と一致するか検査する。
    pub fn ensure_input_channels(&self, expected: usize) -> Result<(), ConfigError> {
        let actual = self.input_channels();
        if actual != expected {
            return Err(ConfigError::ChannelMismatch { expected, actual });
        }

        Ok(())
    }

    /// 呼び出し側が想定するラベル数と一致するか検査する。
    pub fn ensure_num_labels(&self, expected: usize) -> Result<(), ConfigError> {
        let actual = self.num_labels();
        if actual != expected {
            return Err(ConfigError::LabelMismatch { expected, actual });
        }

        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
