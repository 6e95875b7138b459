//! 将棋の基本要素たち。
//!
//! 陣営、駒種、指し手は閉じた enum で表現し、無効値を作れないようにする。
//! 筋、段、マスは newtype で表現する(差分計算や範囲外判定で内部値を直接扱いたいため)。
//!
//! 筋、段、マスの内部値は先手から見た盤面の行優先順で割り当てている:
//!
//! * 筋は９筋, ８筋, ..., １筋の順(先手から見て左から右)。
//! * 段は一段目, 二段目, ..., 九段目の順。
//! * マスは `9 * 段 + 筋`。つまり９一が 0, １一が 8, １九が 80。
//!
//! この割り当てでは 180 度回転がマスの内部値 `i` を `80 - i` に写す写像になる。

use std::iter::FusedIterator;

use crate::myarray::*;

/// 陣営。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// 敵陣営を返す。
    pub const fn inv(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// 陣営を昇順に列挙する。(`Black`、`White` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [Self::Black, Self::White].into_iter()
    }
}

impl From<Side> for usize {
    fn from(side: Side) -> Self {
        side as Self
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Black => f.write_str("先手"),
            Self::White => f.write_str("後手"),
        }
    }
}

/// 盤面の筋。たとえば `COL_3` は３筋。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Col(i32);

pub const COL_9: Col = Col(0);
pub const COL_8: Col = Col(1);
pub const COL_7: Col = Col(2);
pub const COL_6: Col = Col(3);
pub const COL_5: Col = Col(4);
pub const COL_4: Col = Col(5);
pub const COL_3: Col = Col(6);
pub const COL_2: Col = Col(7);
pub const COL_1: Col = Col(8);

impl Col {
    /// 内部値を指定して筋を作る。盤面外の値を渡してはならない。
    pub const fn from_inner(inner: i32) -> Self {
        let this = Self(inner);
        debug_assert!(this.is_on_board());

        this
    }

    /// 筋番号(1..=9)から筋を作る。範囲外なら `None` を返す。
    pub const fn from_file(file: u32) -> Option<Self> {
        if 1 <= file && file <= 9 {
            Some(Self(9 - file as i32))
        } else {
            None
        }
    }

    /// 筋番号(1..=9)を返す。
    pub const fn file(self) -> u32 {
        (9 - self.0) as u32
    }

    /// 筋が盤面内かどうかを返す。
    pub const fn is_on_board(self) -> bool {
        COL_9.0 <= self.0 && self.0 <= COL_1.0
    }

    /// 全ての筋を昇順に列挙する。(`COL_9`, `COL_8`, ..., `COL_1` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        (COL_9.0..COL_1.0 + 1).map(Self)
    }

    /// 内部値を返す。`const` 文脈で使える。
    pub const fn inner(self) -> i32 {
        self.0
    }
}

impl std::ops::Sub<Self> for Col {
    type Output = i32;

    fn sub(self, rhs: Self) -> i32 {
        self.0 - rhs.0
    }
}

impl From<Col> for usize {
    fn from(col: Col) -> Self {
        debug_assert!(col.is_on_board());

        col.0 as Self
    }
}

impl std::fmt::Debug for Col {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_on_board() {
            write!(f, "COL_{}", self.file())
        } else {
            write!(f, "Col({})", self.0)
        }
    }
}

impl std::fmt::Display for Col {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const NAMES: [&str; 9] = ["９", "８", "７", "６", "５", "４", "３", "２", "１"];

        match NAMES.get(self.0 as usize) {
            Some(s) if self.is_on_board() => f.write_str(s),
            _ => write!(f, "無効な筋({})", self.0),
        }
    }
}

/// 盤面の段。たとえば `ROW_3` は三段目。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Row(i32);

pub const ROW_1: Row = Row(0);
pub const ROW_2: Row = Row(1);
pub const ROW_3: Row = Row(2);
pub const ROW_4: Row = Row(3);
pub const ROW_5: Row = Row(4);
pub const ROW_6: Row = Row(5);
pub const ROW_7: Row = Row(6);
pub const ROW_8: Row = Row(7);
pub const ROW_9: Row = Row(8);

impl Row {
    /// 内部値を指定して段を作る。盤面外の値を渡してはならない。
    pub const fn from_inner(inner: i32) -> Self {
        let this = Self(inner);
        debug_assert!(this.is_on_board());

        this
    }

    /// 段番号(1..=9)から段を作る。範囲外なら `None` を返す。
    pub const fn from_rank(rank: u32) -> Option<Self> {
        if 1 <= rank && rank <= 9 {
            Some(Self(rank as i32 - 1))
        } else {
            None
        }
    }

    /// 段番号(1..=9)を返す。
    pub const fn rank(self) -> u32 {
        (self.0 + 1) as u32
    }

    /// 段が盤面内かどうかを返す。
    pub const fn is_on_board(self) -> bool {
        ROW_1.0 <= self.0 && self.0 <= ROW_9.0
    }

    /// 全ての段を昇順に列挙する。(`ROW_1`, `ROW_2`, ..., `ROW_9` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        (ROW_1.0..ROW_9.0 + 1).map(Self)
    }

    /// 内部値を返す。`const` 文脈で使える。
    pub const fn inner(self) -> i32 {
        self.0
    }
}

impl std::ops::Sub<Self> for Row {
    type Output = i32;

    fn sub(self, rhs: Self) -> i32 {
        self.0 - rhs.0
    }
}

impl From<Row> for usize {
    fn from(row: Row) -> Self {
        debug_assert!(row.is_on_board());

        row.0 as Self
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_on_board() {
            write!(f, "ROW_{}", self.rank())
        } else {
            write!(f, "Row({})", self.0)
        }
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const NAMES: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];

        match NAMES.get(self.0 as usize) {
            Some(s) if self.is_on_board() => f.write_str(s),
            _ => write!(f, "無効な段({})", self.0),
        }
    }
}

/// 盤面のマス。たとえば `SQ_45` は４五。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Square(i32);

pub const SQ_91: Square = Square::from_col_row(COL_9, ROW_1);
pub const SQ_81: Square = Square::from_col_row(COL_8, ROW_1);
pub const SQ_71: Square = Square::from_col_row(COL_7, ROW_1);
pub const SQ_61: Square = Square::from_col_row(COL_6, ROW_1);
pub const SQ_51: Square = Square::from_col_row(COL_5, ROW_1);
pub const SQ_41: Square = Square::from_col_row(COL_4, ROW_1);
pub const SQ_31: Square = Square::from_col_row(COL_3, ROW_1);
pub const SQ_21: Square = Square::from_col_row(COL_2, ROW_1);
pub const SQ_11: Square = Square::from_col_row(COL_1, ROW_1);
pub const SQ_92: Square = Square::from_col_row(COL_9, ROW_2);
pub const SQ_82: Square = Square::from_col_row(COL_8, ROW_2);
pub const SQ_72: Square = Square::from_col_row(COL_7, ROW_2);
pub const SQ_62: Square = Square::from_col_row(COL_6, ROW_2);
pub const SQ_52: Square = Square::from_col_row(COL_5, ROW_2);
pub const SQ_42: Square = Square::from_col_row(COL_4, ROW_2);
pub const SQ_32: Square = Square::from_col_row(COL_3, ROW_2);
pub const SQ_22: Square = Square::from_col_row(COL_2, ROW_2);
pub const SQ_12: Square = Square::from_col_row(COL_1, ROW_2);
pub const SQ_93: Square = Square::from_col_row(COL_9, ROW_3);
pub const SQ_83: Square = Square::from_col_row(COL_8, ROW_3);
pub const SQ_73: Square = Square::from_col_row(COL_7, ROW_3);
pub const SQ_63: Square = Square::from_col_row(COL_6, ROW_3);
pub const SQ_53: Square = Square::from_col_row(COL_5, ROW_3);
pub const SQ_43: Square = Square::from_col_row(COL_4, ROW_3);
pub const SQ_33: Square = Square::from_col_row(COL_3, ROW_3);
pub const SQ_23: Square = Square::from_col_row(COL_2, ROW_3);
pub const SQ_13: Square = Square::from_col_row(COL_1, ROW_3);
pub const SQ_94: Square = Square::from_col_row(COL_9, ROW_4);
pub const SQ_84: Square = Square::from_col_row(COL_8, ROW_4);
pub const SQ_74: Square = Square::from_col_row(COL_7, ROW_4);
pub const SQ_64: Square = Square::from_col_row(COL_6, ROW_4);
pub const SQ_54: Square = Square::from_col_row(COL_5, ROW_4);
pub const SQ_44: Square = Square::from_col_row(COL_4, ROW_4);
pub const SQ_34: Square = Square::from_col_row(COL_3, ROW_4);
pub const SQ_24: Square = Square::from_col_row(COL_2, ROW_4);
pub const SQ_14: Square = Square::from_col_row(COL_1, ROW_4);
pub const SQ_95: Square = Square::from_col_row(COL_9, ROW_5);
pub const SQ_85: Square = Square::from_col_row(COL_8, ROW_5);
pub const SQ_75: Square = Square::from_col_row(COL_7, ROW_5);
pub const SQ_65: Square = Square::from_col_row(COL_6, ROW_5);
pub const SQ_55: Square = Square::from_col_row(COL_5, ROW_5);
pub const SQ_45: Square = Square::from_col_row(COL_4, ROW_5);
pub const SQ_35: Square = Square::from_col_row(COL_3, ROW_5);
pub const SQ_25: Square = Square::from_col_row(COL_2, ROW_5);
pub const SQ_15: Square = Square::from_col_row(COL_1, ROW_5);
pub const SQ_96: Square = Square::from_col_row(COL_9, ROW_6);
pub const SQ_86: Square = Square::from_col_row(COL_8, ROW_6);
pub const SQ_76: Square = Square::from_col_row(COL_7, ROW_6);
pub const SQ_66: Square = Square::from_col_row(COL_6, ROW_6);
pub const SQ_56: Square = Square::from_col_row(COL_5, ROW_6);
pub const SQ_46: Square = Square::from_col_row(COL_4, ROW_6);
pub const SQ_36: Square = Square::from_col_row(COL_3, ROW_6);
pub const SQ_26: Square = Square::from_col_row(COL_2, ROW_6);
pub const SQ_16: Square = Square::from_col_row(COL_1, ROW_6);
pub const SQ_97: Square = Square::from_col_row(COL_9, ROW_7);
pub const SQ_87: Square = Square::from_col_row(COL_8, ROW_7);
pub const SQ_77: Square = Square::from_col_row(COL_7, ROW_7);
pub const SQ_67: Square = Square::from_col_row(COL_6, ROW_7);
pub const SQ_57: Square = Square::from_col_row(COL_5, ROW_7);
pub const SQ_47: Square = Square::from_col_row(COL_4, ROW_7);
pub const SQ_37: Square = Square::from_col_row(COL_3, ROW_7);
pub const SQ_27: Square = Square::from_col_row(COL_2, ROW_7);
pub const SQ_17: Square = Square::from_col_row(COL_1, ROW_7);
pub const SQ_98: Square = Square::from_col_row(COL_9, ROW_8);
pub const SQ_88: Square = Square::from_col_row(COL_8, ROW_8);
pub const SQ_78: Square = Square::from_col_row(COL_7, ROW_8);
pub const SQ_68: Square = Square::from_col_row(COL_6, ROW_8);
pub const SQ_58: Square = Square::from_col_row(COL_5, ROW_8);
pub const SQ_48: Square = Square::from_col_row(COL_4, ROW_8);
pub const SQ_38: Square = Square::from_col_row(COL_3, ROW_8);
pub const SQ_28: Square = Square::from_col_row(COL_2, ROW_8);
pub const SQ_18: Square = Square::from_col_row(COL_1, ROW_8);
pub const SQ_99: Square = Square::from_col_row(COL_9, ROW_9);
pub const SQ_89: Square = Square::from_col_row(COL_8, ROW_9);
pub const SQ_79: Square = Square::from_col_row(COL_7, ROW_9);
pub const SQ_69: Square = Square::from_col_row(COL_6, ROW_9);
pub const SQ_59: Square = Square::from_col_row(COL_5, ROW_9);
pub const SQ_49: Square = Square::from_col_row(COL_4, ROW_9);
pub const SQ_39: Square = Square::from_col_row(COL_3, ROW_9);
pub const SQ_29: Square = Square::from_col_row(COL_2, ROW_9);
pub const SQ_19: Square = Square::from_col_row(COL_1, ROW_9);

impl Square {
    /// マスの総数。
    pub const NUM: usize = 81;

    /// 内部値を指定してマスを作る。盤面外の値を渡してはならない。
    pub const fn from_inner(inner: i32) -> Self {
        let this = Self(inner);
        debug_assert!(this.is_on_board());

        this
    }

    /// 筋と段からマスを作る。
    pub const fn from_col_row(col: Col, row: Row) -> Self {
        Self(9 * row.0 + col.0)
    }

    /// 筋番号と段番号(いずれも 1..=9)からマスを作る。範囲外なら `None` を返す。
    pub const fn from_file_rank(file: u32, rank: u32) -> Option<Self> {
        match (Col::from_file(file), Row::from_rank(rank)) {
            (Some(col), Some(row)) => Some(Self::from_col_row(col, row)),
            _ => None,
        }
    }

    /// マスが盤面内かどうかを返す。
    pub const fn is_on_board(self) -> bool {
        0 <= self.0 && self.0 < Self::NUM as i32
    }

    /// マスの属する筋を返す。
    pub const fn col(self) -> Col {
        debug_assert!(self.is_on_board());

        Col(self.0 % 9)
    }

    /// マスの属する段を返す。
    pub const fn row(self) -> Row {
        debug_assert!(self.is_on_board());

        Row(self.0 / 9)
    }

    /// 全マスを昇順に列挙する。(`SQ_91`, `SQ_81`, ..., `SQ_11`, `SQ_92`, ..., `SQ_19` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        (0..Self::NUM as i32).map(Self)
    }

    /// 内部値を返す。`const` 文脈で使える。
    pub const fn inner(self) -> i32 {
        self.0
    }
}

impl From<Square> for usize {
    fn from(sq: Square) -> Self {
        debug_assert!(sq.is_on_board());

        sq.0 as Self
    }
}

impl std::fmt::Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_on_board() {
            write!(f, "SQ_{}{}", self.col().file(), self.row().rank())
        } else {
            write!(f, "Square({})", self.0)
        }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if !self.is_on_board() {
            return write!(f, "無効なマス({})", self.0);
        }

        write!(f, "{}{}", self.col(), self.row())
    }
}

/// 駒種(陣営の区別なし)。
///
/// 並び順は生駒 8 種、成駒 6 種の順で、特徴量の駒プレーンの並びと一致する。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Lance,
    Knight,
    Silver,
    Gold,
    Bishop,
    Rook,
    King,
    ProPawn,
    ProLance,
    ProKnight,
    ProSilver,
    Horse,
    Dragon,
}

impl PieceKind {
    /// 駒種の総数。
    pub const NUM: usize = 14;

    /// 手駒となりうる駒種の総数。
    pub const NUM_HAND: usize = 7;

    const ALL: [Self; Self::NUM] = [
        Self::Pawn,
        Self::Lance,
        Self::Knight,
        Self::Silver,
        Self::Gold,
        Self::Bishop,
        Self::Rook,
        Self::King,
        Self::ProPawn,
        Self::ProLance,
        Self::ProKnight,
        Self::ProSilver,
        Self::Horse,
        Self::Dragon,
    ];

    const HAND: [Self; Self::NUM_HAND] = [
        Self::Pawn,
        Self::Lance,
        Self::Knight,
        Self::Silver,
        Self::Gold,
        Self::Bishop,
        Self::Rook,
    ];

    /// 0 始まりの通し番号を返す。
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 通し番号から駒種を返す。範囲外なら `None` を返す。
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// 成駒かどうかを返す。
    pub const fn is_promoted(self) -> bool {
        self.index() >= Self::ProPawn.index()
    }

    /// 手駒となりうる駒種かどうかを返す。
    pub const fn is_hand(self) -> bool {
        self.index() < Self::King.index()
    }

    /// 成った駒種を返す。成れない駒種なら `None` を返す。
    pub const fn to_promoted(self) -> Option<Self> {
        match self {
            Self::Pawn => Some(Self::ProPawn),
            Self::Lance => Some(Self::ProLance),
            Self::Knight => Some(Self::ProKnight),
            Self::Silver => Some(Self::ProSilver),
            Self::Bishop => Some(Self::Horse),
            Self::Rook => Some(Self::Dragon),
            _ => None,
        }
    }

    /// 成っていない駒種を返す。生駒はそのまま返す。
    pub const fn to_raw(self) -> Self {
        match self {
            Self::ProPawn => Self::Pawn,
            Self::ProLance => Self::Lance,
            Self::ProKnight => Self::Knight,
            Self::ProSilver => Self::Silver,
            Self::Horse => Self::Bishop,
            Self::Dragon => Self::Rook,
            pk => pk,
        }
    }

    /// CSA 形式の駒コードから駒種を返す。
    pub fn from_csa(code: &str) -> Option<Self> {
        let pk = match code {
            "FU" => Self::Pawn,
            "KY" => Self::Lance,
            "KE" => Self::Knight,
            "GI" => Self::Silver,
            "KI" => Self::Gold,
            "KA" => Self::Bishop,
            "HI" => Self::Rook,
            "OU" => Self::King,
            "TO" => Self::ProPawn,
            "NY" => Self::ProLance,
            "NK" => Self::ProKnight,
            "NG" => Self::ProSilver,
            "UM" => Self::Horse,
            "RY" => Self::Dragon,
            _ => return None,
        };

        Some(pk)
    }

    /// 全ての駒種を昇順に列挙する。
    pub fn iter_piece(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        Self::ALL.into_iter()
    }

    /// 手駒となりうる駒種を昇順に列挙する。
    pub fn iter_hand(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        Self::HAND.into_iter()
    }
}

impl From<PieceKind> for usize {
    fn from(pk: PieceKind) -> Self {
        pk.index()
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const NAMES: [&str; PieceKind::NUM] = [
            "歩", "香", "桂", "銀", "金", "角", "飛", "玉", "と", "杏", "圭", "全", "馬", "龍",
        ];

        f.write_str(NAMES[self.index()])
    }
}

/// 駒(陣営の区別あり)。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }
}

/// 指し手。
///
/// 盤面とは独立に作れるので、合法性は保証しない。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Move {
    Walk { src: Square, dst: Square, promo: bool },
    Drop { pk: PieceKind, dst: Square },
}

impl Move {
    /// 盤上の駒を動かして成らない指し手を作る。
    pub const fn new_walk(src: Square, dst: Square) -> Self {
        Self::Walk {
            src,
            dst,
            promo: false,
        }
    }

    /// 盤上の駒を動かして成る指し手を作る。
    pub const fn new_walk_promotion(src: Square, dst: Square) -> Self {
        Self::Walk {
            src,
            dst,
            promo: true,
        }
    }

    /// 駒打ちの指し手を作る。
    pub const fn new_drop(pk: PieceKind, dst: Square) -> Self {
        Self::Drop { pk, dst }
    }

    /// 成りかどうかを返す。
    pub const fn is_promotion(self) -> bool {
        matches!(self, Self::Walk { promo: true, .. })
    }

    /// 移動先を返す。
    pub const fn dst(self) -> Square {
        match self {
            Self::Walk { dst, .. } | Self::Drop { dst, .. } => dst,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::Walk { src, dst, promo } => {
                write!(f, "{}{}", src, dst)?;
                if promo {
                    f.write_str("成")?;
                }
                Ok(())
            }
            Self::Drop { pk, dst } => write!(f, "{}{}打", dst, pk),
        }
    }
}

/// 盤面。局面の初期配置を組み立てるのに使う。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Board([Option<Piece>; Square::NUM]);

impl Board {
    /// 空の盤面を返す。
    pub const fn empty() -> Self {
        Self([None; Square::NUM])
    }

    /// 平手初期盤面を返す。
    pub fn startpos() -> Self {
        const BACK: [PieceKind; 9] = [
            PieceKind::Lance,
            PieceKind::Knight,
            PieceKind::Silver,
            PieceKind::Gold,
            PieceKind::King,
            PieceKind::Gold,
            PieceKind::Silver,
            PieceKind::Knight,
            PieceKind::Lance,
        ];

        let mut board = Self::empty();

        for (col, pk) in Col::iter().zip(BACK) {
            board[Square::from_col_row(col, ROW_1)] = Some(Piece::new(Side::White, pk));
            board[Square::from_col_row(col, ROW_3)] =
                Some(Piece::new(Side::White, PieceKind::Pawn));
            board[Square::from_col_row(col, ROW_7)] =
                Some(Piece::new(Side::Black, PieceKind::Pawn));
            board[Square::from_col_row(col, ROW_9)] = Some(Piece::new(Side::Black, pk));
        }

        board[SQ_82] = Some(Piece::new(Side::White, PieceKind::Rook));
        board[SQ_22] = Some(Piece::new(Side::White, PieceKind::Bishop));
        board[SQ_88] = Some(Piece::new(Side::Black, PieceKind::Bishop));
        board[SQ_28] = Some(Piece::new(Side::Black, PieceKind::Rook));

        board
    }
}

impl std::ops::Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, sq: Square) -> &Self::Output {
        &self.0[usize::from(sq)]
    }
}

impl std::ops::IndexMut<Square> for Board {
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.0[usize::from(sq)]
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in Row::iter() {
            for col in Col::iter() {
                match self[Square::from_col_row(col, row)] {
                    None => f.write_str(" ・")?,
                    Some(pc) => {
                        f.write_str(if pc.side == Side::Black { " " } else { "v" })?;
                        write!(f, "{}", pc.kind)?;
                    }
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// 手駒。
///
/// 手駒となりうる駒種の枚数を単純な配列で持つ。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Hand([u32; PieceKind::NUM_HAND]);

impl Hand {
    /// 空の手駒を返す。
    pub const fn empty() -> Self {
        Self([0; PieceKind::NUM_HAND])
    }

    /// 手駒が空かどうかを返す。
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// 手駒の総枚数を返す。
    pub fn count(&self) -> u32 {
        self.0.iter().sum()
    }
}

impl std::ops::Index<PieceKind> for Hand {
    type Output = u32;

    /// 手駒とならない駒種を渡してはならない。
    fn index(&self, pk: PieceKind) -> &Self::Output {
        debug_assert!(pk.is_hand());

        &self.0[pk.index()]
    }
}

impl std::ops::IndexMut<PieceKind> for Hand {
    /// 手駒とならない駒種を渡してはならない。
    fn index_mut(&mut self, pk: PieceKind) -> &mut Self::Output {
        debug_assert!(pk.is_hand());

        &mut self.0[pk.index()]
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("なし");
        }

        for pk in PieceKind::iter_hand().rev() {
            let n = self[pk];
            if n == 0 {
                continue;
            }

            write!(f, "{}", pk)?;
            if n >= 2 {
                write!(f, "{}", n)?;
            }
        }

        Ok(())
    }
}

/// 両陣営の手駒。`Side` でインデックスアクセスできる。
pub type Hands = MyArray1<Hand, Side, 2>;

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::assert_equal;

    #[test]
    fn test_square_layout() {
        assert_eq!(SQ_91.inner(), 0);
        assert_eq!(SQ_11.inner(), 8);
        assert_eq!(SQ_92.inner(), 9);
        assert_eq!(SQ_19.inner(), 80);

        assert_eq!(SQ_76.col(), COL_7);
        assert_eq!(SQ_76.row(), ROW_6);
        assert_eq!(Square::from_file_rank(7, 6), Some(SQ_76));
        assert_eq!(Square::from_file_rank(0, 6), None);
        assert_eq!(Square::from_file_rank(7, 10), None);

        assert_eq!(SQ_76.col() - SQ_77.col(), 0);
        assert_eq!(SQ_76.row() - SQ_77.row(), -1);
    }

    #[test]
    fn test_square_fmt() {
        assert_eq!(format!("{:?}", SQ_45), "SQ_45");
        assert_eq!(SQ_45.to_string(), "４五");
        assert_eq!(format!("{:?}", COL_3), "COL_3");
        assert_eq!(format!("{:?}", ROW_8), "ROW_8");
    }

    #[test]
    fn test_square_iter() {
        assert_eq!(Square::iter().len(), 81);
        assert_equal(Square::iter().take(3), [SQ_91, SQ_81, SQ_71]);
        assert_eq!(Square::iter().last(), Some(SQ_19));
    }

    #[test]
    fn test_piece_kind() {
        assert_eq!(PieceKind::iter_piece().len(), PieceKind::NUM);
        assert_equal(
            PieceKind::iter_hand(),
            [
                PieceKind::Pawn,
                PieceKind::Lance,
                PieceKind::Knight,
                PieceKind::Silver,
                PieceKind::Gold,
                PieceKind::Bishop,
                PieceKind::Rook,
            ],
        );

        for pk in PieceKind::iter_piece() {
            assert_eq!(PieceKind::from_index(pk.index()), Some(pk));
            if let Some(promoted) = pk.to_promoted() {
                assert!(promoted.is_promoted());
                assert_eq!(promoted.to_raw(), pk);
            }
        }

        assert_eq!(PieceKind::from_index(PieceKind::NUM), None);
        assert_eq!(PieceKind::Gold.to_promoted(), None);
        assert_eq!(PieceKind::King.to_raw(), PieceKind::King);
        assert_eq!(PieceKind::from_csa("FU"), Some(PieceKind::Pawn));
        assert_eq!(PieceKind::from_csa("UM"), Some(PieceKind::Horse));
        assert_eq!(PieceKind::from_csa("RY"), Some(PieceKind::Dragon));
        assert_eq!(PieceKind::from_csa("fu"), None);
    }

    #[test]
    fn test_move() {
        let mv = Move::new_walk_promotion(SQ_88, SQ_22);
        assert!(mv.is_promotion());
        assert_eq!(mv.dst(), SQ_22);
        assert_eq!(mv.to_string(), "８八２二成");

        let mv = Move::new_drop(PieceKind::Bishop, SQ_45);
        assert!(!mv.is_promotion());
        assert_eq!(mv.dst(), SQ_45);
        assert_eq!(mv.to_string(), "４五角打");
    }

    #[test]
    fn test_board_startpos() {
        let board = Board::startpos();

        assert_eq!(
            board[SQ_59],
            Some(Piece::new(Side::Black, PieceKind::King))
        );
        assert_eq!(
            board[SQ_51],
            Some(Piece::new(Side::White, PieceKind::King))
        );
        assert_eq!(
            board[SQ_28],
            Some(Piece::new(Side::Black, PieceKind::Rook))
        );
        assert_eq!(
            board[SQ_22],
            Some(Piece::new(Side::White, PieceKind::Bishop))
        );
        assert_eq!(board[SQ_55], None);

        let n = Square::iter().filter(|&sq| board[sq].is_some()).count();
        assert_eq!(n, 40);
    }

    #[test]
    fn test_hand() {
        let mut hand = Hand::empty();
        assert!(hand.is_empty());
        assert_eq!(hand.to_string(), "なし");

        hand[PieceKind::Pawn] = 3;
        hand[PieceKind::Rook] = 1;
        assert_eq!(hand.count(), 4);
        assert_eq!(hand.to_string(), "飛歩3");
    }
}
