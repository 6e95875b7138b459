//! 指し手のラベル化。
//!
//! 指し手を「移動方向 × 移動先」の組に写し、`81 * 方向 + 移動先` を教師ラベルとする。
//! 後手の指し手は盤面を 180 度回転してから符号化するので、常に手番側視点のラベルになる。
//!
//! 飛び駒の長距離移動は隣接 1 マスの方向に丸められる。
//! たとえば飛車の 8 マス前進は歩の 1 マス前進と同じ方向になる。

use crate::config::{EncoderConfig, NUM_BOARD_DIRECTIONS};
use crate::error::EncodeError;
use crate::shogi::*;

/// 盤上の駒の移動方向(手番側視点)。成る指し手は `*Promote` の方向となる。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Up2Left,
    Up2Right,
    UpPromote,
    DownPromote,
    LeftPromote,
    RightPromote,
    UpLeftPromote,
    UpRightPromote,
    DownLeftPromote,
    DownRightPromote,
    Up2LeftPromote,
    Up2RightPromote,
}

impl MoveDirection {
    const ALL: [Self; NUM_BOARD_DIRECTIONS] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
        Self::Up2Left,
        Self::Up2Right,
        Self::UpPromote,
        Self::DownPromote,
        Self::LeftPromote,
        Self::RightPromote,
        Self::UpLeftPromote,
        Self::UpRightPromote,
        Self::DownLeftPromote,
        Self::DownRightPromote,
        Self::Up2LeftPromote,
        Self::Up2RightPromote,
    ];

    /// 成らない方向の数。
    const NUM_RAW: usize = NUM_BOARD_DIRECTIONS / 2;

    /// 0 始まりの通し番号を返す。
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 通し番号から方向を返す。盤上の方向でなければ `None`。
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// 成る指し手の方向かどうかを返す。
    pub const fn is_promotion(self) -> bool {
        self.index() >= Self::NUM_RAW
    }

    /// 対応する成りの方向を返す。既に成りの方向ならそのまま返す。
    pub fn to_promoted(self) -> Self {
        if self.is_promotion() {
            self
        } else {
            Self::ALL[self.index() + Self::NUM_RAW]
        }
    }

    /// 手番側視点の移動量 (dy, dx) から方向を求める。成りは考慮しない。
    ///
    /// 桂馬跳び以外の移動量は各成分を -1..=1 に丸めてから方向表を引く。
    /// 移動量が 0 なら `None`。
    pub fn from_displacement(dy: i32, dx: i32) -> Option<Self> {
        // [dy + 1][dx + 1] で引く。
        const TABLE: [[Option<MoveDirection>; 3]; 3] = [
            [
                Some(MoveDirection::UpLeft),
                Some(MoveDirection::Up),
                Some(MoveDirection::UpRight),
            ],
            [Some(MoveDirection::Left), None, Some(MoveDirection::Right)],
            [
                Some(MoveDirection::DownLeft),
                Some(MoveDirection::Down),
                Some(MoveDirection::DownRight),
            ],
        ];

        match (dy, dx) {
            (-2, -1) => Some(Self::Up2Left),
            (-2, 1) => Some(Self::Up2Right),
            _ => TABLE[(dy.signum() + 1) as usize][(dx.signum() + 1) as usize],
        }
    }
}

/// 指し手のラベル。`81 * 方向 + 移動先` で、方向は盤上の 20 方向のあとに駒打ち 7 方向が続く。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Label(u16);

impl Label {
    /// 方向の通し番号と(回転済みの)移動先からラベルを作る。
    pub fn new(direction: usize, dst: Square) -> Self {
        let inner = direction * Square::NUM + usize::from(dst);
        debug_assert!(inner <= usize::from(u16::MAX));

        Self(inner as u16)
    }

    /// 内部値からラベルを作る。
    pub const fn from_inner(inner: u16) -> Self {
        Self(inner)
    }

    /// 内部値を返す。
    pub const fn inner(self) -> u16 {
        self.0
    }

    /// 方向の通し番号を返す。
    pub const fn direction(self) -> usize {
        self.0 as usize / Square::NUM
    }

    /// 移動先(手番側視点)を返す。
    pub fn square(self) -> Square {
        Square::from_inner((self.0 as usize % Square::NUM) as i32)
    }
}

impl From<Label> for usize {
    fn from(label: Label) -> Self {
        label.0 as Self
    }
}

impl From<Label> for u16 {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 指し手をラベルに符号化する。
#[derive(Clone, Copy, Debug)]
pub struct LabelCodec<'a> {
    config: &'a EncoderConfig,
}

impl<'a> LabelCodec<'a> {
    pub fn new(config: &'a EncoderConfig) -> Self {
        Self { config }
    }

    /// 手番 `side` の指し手 `mv` をラベルに符号化する。
    ///
    /// 盤面は参照しないので、指し手の合法性は検査しない。
    pub fn encode(&self, mv: Move, side: Side) -> Result<Label, EncodeError> {
        let rotator = self.config.rotator();
        let canon = |sq: Square| match side {
            Side::Black => sq,
            Side::White => rotator.rotate_square(sq),
        };

        let dst = canon(mv.dst());

        let direction = match mv {
            Move::Drop { pk, .. } => {
                let idx = self
                    .config
                    .hand_limits()
                    .position(|(hk, _)| hk == pk)
                    .ok_or(EncodeError::NotDroppable(pk))?;
                NUM_BOARD_DIRECTIONS + idx
            }
            Move::Walk { src, promo, .. } => {
                let src = canon(src);
                let dy = dst.row() - src.row();
                let dx = dst.col() - src.col();

                let dir = MoveDirection::from_displacement(dy, dx)
                    .ok_or(EncodeError::Degenerate { dy, dx })?;
                let dir = if promo { dir.to_promoted() } else { dir };

                dir.index()
            }
        };

        let label = Label::new(direction, dst);

        debug_assert!(usize::from(label) < self.config.num_labels());

        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    use crate::config::NUM_LABELS;

    fn encode(mv: Move, side: Side) -> Result<Label, EncodeError> {
        let config = EncoderConfig::new();
        LabelCodec::new(&config).encode(mv, side)
    }

    #[test]
    fn test_direction_index() {
        assert_eq!(MoveDirection::Up.index(), 0);
        assert_eq!(MoveDirection::Up2Right.index(), 9);
        assert_eq!(MoveDirection::UpPromote.index(), 10);
        assert_eq!(MoveDirection::Up2RightPromote.index(), 19);

        for i in 0..NUM_BOARD_DIRECTIONS {
            let dir = MoveDirection::from_index(i).unwrap();
            assert_eq!(dir.index(), i);
            assert_eq!(dir.is_promotion(), i >= 10);
        }
        assert_eq!(MoveDirection::from_index(NUM_BOARD_DIRECTIONS), None);

        assert_eq!(
            MoveDirection::DownLeft.to_promoted(),
            MoveDirection::DownLeftPromote
        );
        assert_eq!(
            MoveDirection::DownLeftPromote.to_promoted(),
            MoveDirection::DownLeftPromote
        );
    }

    #[test]
    fn test_from_displacement() {
        use MoveDirection::*;

        assert_eq!(MoveDirection::from_displacement(-1, 0), Some(Up));
        assert_eq!(MoveDirection::from_displacement(1, 0), Some(Down));
        assert_eq!(MoveDirection::from_displacement(0, -1), Some(Left));
        assert_eq!(MoveDirection::from_displacement(0, 1), Some(Right));
        assert_eq!(MoveDirection::from_displacement(-1, -1), Some(UpLeft));
        assert_eq!(MoveDirection::from_displacement(-1, 1), Some(UpRight));
        assert_eq!(MoveDirection::from_displacement(1, -1), Some(DownLeft));
        assert_eq!(MoveDirection::from_displacement(1, 1), Some(DownRight));
        assert_eq!(MoveDirection::from_displacement(-2, -1), Some(Up2Left));
        assert_eq!(MoveDirection::from_displacement(-2, 1), Some(Up2Right));
        assert_eq!(MoveDirection::from_displacement(0, 0), None);

        // 長距離移動は丸められる。
        assert_eq!(MoveDirection::from_displacement(-8, 0), Some(Up));
        assert_eq!(MoveDirection::from_displacement(5, 5), Some(DownRight));
        assert_eq!(MoveDirection::from_displacement(2, 1), Some(DownRight));
        assert_eq!(MoveDirection::from_displacement(-3, -1), Some(UpLeft));
    }

    #[test]
    fn test_encode_walk() {
        // ７六歩: ７七(56) -> ７六(47), 上。
        assert_eq!(
            encode(Move::new_walk(SQ_77, SQ_76), Side::Black),
            Ok(Label::from_inner(47))
        );

        // 後手の３四歩は回転すると先手の７六歩と同じ。
        assert_eq!(
            encode(Move::new_walk(SQ_33, SQ_34), Side::White),
            Ok(Label::from_inner(47))
        );

        // ２二角成: 右上方向の成り(15)、移動先は ２二(16)。
        assert_eq!(
            encode(Move::new_walk_promotion(SQ_88, SQ_22), Side::Black),
            Ok(Label::from_inner(15 * 81 + 16))
        );

        // 後手の ３一銀 -> ２二: 回転すると ７九 -> ８八 で左上(4)。
        assert_eq!(
            encode(Move::new_walk(SQ_31, SQ_22), Side::White),
            Ok(Label::from_inner(4 * 81 + 64))
        );

        // 桂馬跳び。
        assert_eq!(
            encode(Move::new_walk(SQ_89, SQ_77), Side::Black),
            Ok(Label::new(MoveDirection::Up2Right.index(), SQ_77))
        );
        assert_eq!(
            encode(Move::new_walk(SQ_29, SQ_37), Side::Black),
            Ok(Label::new(MoveDirection::Up2Left.index(), SQ_37))
        );
    }

    #[test]
    fn test_encode_drop() {
        // ４五角打: 20 + 5 = 25 方向、移動先 ４五(41)。
        let label = encode(Move::new_drop(PieceKind::Bishop, SQ_45), Side::Black).unwrap();
        assert_eq!(label, Label::from_inner(25 * 81 + 41));
        assert_eq!(label.direction(), 25);
        assert_eq!(label.square(), SQ_45);

        // 後手の駒打ちは移動先が回転される。
        let label = encode(Move::new_drop(PieceKind::Pawn, SQ_11), Side::White).unwrap();
        assert_eq!(label.direction(), NUM_BOARD_DIRECTIONS);
        assert_eq!(label.square(), SQ_99);

        assert_eq!(
            encode(Move::new_drop(PieceKind::King, SQ_55), Side::Black),
            Err(EncodeError::NotDroppable(PieceKind::King))
        );
        assert_eq!(
            encode(Move::new_drop(PieceKind::Horse, SQ_55), Side::Black),
            Err(EncodeError::NotDroppable(PieceKind::Horse))
        );
    }

    #[test]
    fn test_encode_degenerate() {
        assert_eq!(
            encode(Move::new_walk(SQ_55, SQ_55), Side::Black),
            Err(EncodeError::Degenerate { dy: 0, dx: 0 })
        );
    }

    #[test]
    fn test_encode_range() {
        let config = EncoderConfig::new();
        let codec = LabelCodec::new(&config);

        for side in Side::iter() {
            for src in Square::iter() {
                for dst in Square::iter().filter(|&dst| dst != src) {
                    for mv in [Move::new_walk(src, dst), Move::new_walk_promotion(src, dst)] {
                        let label = codec.encode(mv, side).unwrap();
                        assert!(usize::from(label) < NUM_LABELS);
                        assert_eq!(label.direction() >= 10, mv.is_promotion());
                    }
                }
            }
        }
    }

    #[test]
    fn test_encode_drop_all() {
        let config = EncoderConfig::new();
        let codec = LabelCodec::new(&config);

        // 駒打ちのラベルは 81 * (20 + k) + 移動先。k は歩を 0 とする手駒の通し番号。
        for (k, pk) in PieceKind::iter_hand().enumerate() {
            for sq in Square::iter() {
                let expected = 81 * (20 + k) + usize::from(sq);
                let label = codec.encode(Move::new_drop(pk, sq), Side::Black).unwrap();
                assert_eq!(usize::from(label), expected);

                // 後手は移動先を回転する。
                let expected = 81 * (20 + k) + (80 - usize::from(sq));
                let label = codec.encode(Move::new_drop(pk, sq), Side::White).unwrap();
                assert_eq!(usize::from(label), expected);
            }
        }
    }
}
