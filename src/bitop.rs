//! bitboard の下請けとなるビット演算。

/// x の最下位の 1 のビット位置を返す。x == 0 のときの挙動は未定義。
pub fn lsb_u128(x: u128) -> u32 {
    debug_assert_ne!(x, 0);

    x.trailing_zeros()
}

/// x の最下位の 1 を 0 に変え、そのビット位置を返す。x == 0 のときの挙動は未定義。
pub fn pop_lsb_u128(x: &mut u128) -> u32 {
    debug_assert_ne!(*x, 0);

    let res = lsb_u128(*x);
    *x = blsr_u128(*x);
    res
}

/// x の最下位の 1 を 0 に変えたものを返す。x == 0 のときの挙動は未定義。
pub fn blsr_u128(x: u128) -> u128 {
    debug_assert_ne!(x, 0);

    x & (x - 1)
}
