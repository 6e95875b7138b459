use std::fmt::Write as _;

use crate::position::Position;
use crate::shogi::*;

use super::sfen_raw_piece_char;

/// (開始局面, 指し手の配列) を sfen 文字列にエンコードする。
/// 合法性チェックは一切行わない。
///
/// 開始局面が平手初期局面の場合、局面文字列は "startpos" になる。
pub fn sfen_encode<T>(pos: &Position, mvs: T) -> String
where
    T: AsRef<[Move]>,
{
    let mut s = sfen_encode_position(pos);

    s.push_str(" moves");

    for &mv in mvs.as_ref() {
        s.push(' ');
        sfen_encode_move_impl(mv, &mut s);
    }

    s
}

/// 局面を sfen 局面文字列にエンコードする。
/// 合法性チェックは一切行わない。
///
/// 局面が平手初期局面の場合、"startpos" を返す。
pub fn sfen_encode_position(pos: &Position) -> String {
    if *pos == Position::startpos() {
        return "startpos".to_owned();
    }

    let mut s = String::new();

    s.push_str("sfen ");

    sfen_encode_board(pos.board(), &mut s);
    s.push(' ');

    sfen_encode_side(pos.side_to_move(), &mut s);
    s.push(' ');

    sfen_encode_hands(pos.hands(), &mut s);
    s.push(' ');

    // String への書き込みは失敗しない。
    let _ = write!(s, "{}", pos.ply());

    s
}

/// 盤面を sfen 盤面文字列にエンコードし、既存の文字列に追記する。
/// 合法性チェックは一切行わない。
fn sfen_encode_board(board: &Board, s: &mut String) {
    for row in Row::iter() {
        if row != ROW_1 {
            s.push('/');
        }
        sfen_encode_board_row(board, row, s);
    }
}

fn sfen_encode_board_row(board: &Board, row: Row, s: &mut String) {
    #[derive(Debug)]
    struct State<'a> {
        s: &'a mut String,
        run_blank: u32,
    }
    impl<'a> State<'a> {
        fn new(s: &'a mut String) -> Self {
            Self { s, run_blank: 0 }
        }
        fn update(&mut self, pc: Option<Piece>) {
            match pc {
                None => self.run_blank += 1,
                Some(pc) => {
                    self.flush_run();
                    sfen_encode_board_piece(pc, self.s);
                }
            }
        }
        fn flush_run(&mut self) {
            if self.run_blank > 0 {
                let _ = write!(self.s, "{}", self.run_blank);
                self.run_blank = 0;
            }
        }
    }

    let mut state = State::new(s);
    for col in Col::iter() {
        let sq = Square::from_col_row(col, row);
        state.update(board[sq]);
    }
    state.flush_run();
}

fn sfen_encode_board_piece(pc: Piece, s: &mut String) {
    if pc.kind.is_promoted() {
        s.push('+');
    }

    sfen_encode_piece(pc.side, pc.kind.to_raw(), s);
}

/// 生駒を陣営に応じた大文字/小文字で追記する。
fn sfen_encode_piece(side: Side, pk: PieceKind, s: &mut String) {
    if let Some(c) = sfen_raw_piece_char(pk) {
        match side {
            Side::Black => s.push(c),
            Side::White => s.push(c.to_ascii_lowercase()),
        }
    }
}

/// 手番の陣営を sfen 手番文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_side(side_to_move: Side, s: &mut String) {
    match side_to_move {
        Side::Black => s.push('b'),
        Side::White => s.push('w'),
    }
}

/// 両陣営の手駒を sfen 手駒文字列にエンコードし、既存の文字列に追記する。
/// 合法性チェックは一切行わない。
fn sfen_encode_hands(hands: &Hands, s: &mut String) {
    // sfen の仕様では手駒の順番を以下のように規定している:
    //
    // * 全ての先手の手駒、全ての後手の手駒の順に並べる。
    // * 駒種は飛、角、金、銀、桂、香、歩の順に並べる。

    if hands.iter().all(Hand::is_empty) {
        s.push('-');
        return;
    }

    for side in Side::iter() {
        for pk in PieceKind::iter_hand().rev() {
            let n = hands[side][pk];
            if n == 0 {
                continue;
            }

            if n >= 2 {
                let _ = write!(s, "{}", n);
            }
            sfen_encode_piece(side, pk, s);
        }
    }
}

/// 指し手を sfen 指し手文字列にエンコードする。
/// 合法性チェックは一切行わない。
pub fn sfen_encode_move(mv: Move) -> String {
    let mut s = String::new();

    sfen_encode_move_impl(mv, &mut s);

    s
}

/// 指し手を sfen 指し手文字列にエンコードし、既存の文字列に追記する。
fn sfen_encode_move_impl(mv: Move, s: &mut String) {
    match mv {
        Move::Walk { src, dst, promo } => {
            sfen_encode_move_square(src, s);
            sfen_encode_move_square(dst, s);
            if promo {
                s.push('+');
            }
        }
        Move::Drop { pk, dst } => {
            sfen_encode_piece(Side::Black, pk, s);
            s.push('*');
            sfen_encode_move_square(dst, s);
        }
    }
}

fn sfen_encode_move_square(sq: Square, s: &mut String) {
    let _ = write!(s, "{}", sq.col().file());
    s.push(char::from(b'a' + (sq.row().rank() - 1) as u8));
}
