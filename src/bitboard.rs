use crate::bitop;
use crate::shogi::*;

/// 横型 bitboard。
///
/// bit0:９一, bit1:８一, ..., bit8:１一, bit9:９二, ..., bit80:１九, bit81-127:(未使用)
///
/// ビット位置はマスの内部値と一致する。
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Bitboard(u128);

impl Bitboard {
    const MASK: u128 = (1 << Square::NUM) - 1;

    /// 全マスが 0 の bitboard を作る。盤面外は 0 になっている。
    pub const fn zero() -> Self {
        Self(0)
    }

    /// 全マスが 1 の bitboard を作る。盤面外は 0 になっている。
    pub const fn all() -> Self {
        Self(Self::MASK)
    }

    /// 内部値を指定して bitboard を作る。盤面外は 0 に落とされる。
    pub const fn from_inner(inner: u128) -> Self {
        Self(inner & Self::MASK)
    }

    /// 内部値を返す。
    pub const fn inner(self) -> u128 {
        self.0
    }

    /// 全ビットが 0 かどうかを返す。
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// self と other を AND した結果が非 0 かどうかを返す。
    pub const fn test(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// 指定したマスに 1 が立っているかどうかを返す。
    pub fn test_square(self, sq: Square) -> bool {
        self.test(Self::from(sq))
    }

    /// 1 のビットの個数を返す。
    pub const fn count_ones(self) -> u32 {
        self.0.count_ones()
    }

    /// 1 が立っている全てのマスについて昇順に `f` を呼ぶ。
    pub fn for_each_square<F>(self, mut f: F)
    where
        F: FnMut(Square),
    {
        let mut x = self.0;
        while x != 0 {
            let i = bitop::pop_lsb_u128(&mut x);
            f(Square::from_inner(i as i32));
        }
    }
}

impl From<Square> for Bitboard {
    /// 与えられたマスのみが 1 の bitboard を返す。
    fn from(sq: Square) -> Self {
        debug_assert!(sq.is_on_board());

        Self(1 << sq.inner())
    }
}

impl std::ops::Not for Bitboard {
    type Output = Self;

    /// 全マスについて 0 と 1 を反転した bitboard を返す。盤面外は 0 のまま。
    fn not(self) -> Self {
        self ^ Self::all()
    }
}

macro_rules! impl_bit_binop {
    ($trait:ident, $method:ident, $trait_assign:ident, $method_assign:ident, $op:tt) => {
        impl std::ops::$trait for Bitboard {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self(self.0 $op rhs.0)
            }
        }

        impl std::ops::$trait_assign for Bitboard {
            fn $method_assign(&mut self, rhs: Self) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}

impl_bit_binop!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
impl_bit_binop!(BitOr, bitor, BitOrAssign, bitor_assign, |);
impl_bit_binop!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl std::fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Bitboard({:#023X})", self.0)
    }
}

impl std::fmt::Display for Bitboard {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in Row::iter() {
            for col in Col::iter() {
                let sq = Square::from_col_row(col, row);
                let sq_s = if self.test_square(sq) { " *" } else { " ." };
                f.write_str(sq_s)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
