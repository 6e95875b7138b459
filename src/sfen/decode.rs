use anyhow::{anyhow, bail, ensure, Context as _};

use crate::config::EncoderConfig;
use crate::position::Position;
use crate::shogi::*;

use super::sfen_raw_piece_char;

/// sfen 文字列をデコードし、(開始局面, 指し手の配列) を返す。
/// 構文と持駒の枚数(`config` の上限)はチェックするが、それ以外の合法性チェックは行わない。
///
/// 文字列の先頭と末尾の空白は無視される。
/// また、最初のトークンが "position" の場合、それは単に無視される。
pub fn sfen_decode(
    config: &EncoderConfig,
    s: impl AsRef<str>,
) -> anyhow::Result<(Position, Vec<Move>)> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    let mut tokens = s.split_ascii_whitespace();

    let pos = sfen_decode_position_from_iter(config, &mut tokens)?;

    let mvs = if let Some(moves_magic) = tokens.next() {
        ensure!(
            moves_magic == "moves",
            r#""moves" expected, but got {}"#,
            moves_magic
        );
        tokens
            .map(sfen_decode_move_impl)
            .collect::<Result<_, _>>()?
    } else {
        vec![]
    };

    Ok((pos, mvs))
}

/// sfen 局面文字列をデコードし、その局面を返す。
/// 構文と持駒の枚数はチェックするが、それ以外の合法性チェックは行わない。
pub fn sfen_decode_position(
    config: &EncoderConfig,
    s: impl AsRef<str>,
) -> anyhow::Result<Position> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    let mut tokens = s.split_ascii_whitespace();

    let pos = sfen_decode_position_from_iter(config, &mut tokens)?;

    if let Some(token) = tokens.next() {
        bail!("position string has redundant token: {}", token);
    }

    Ok(pos)
}

fn sfen_decode_position_from_iter<'a, I>(
    config: &EncoderConfig,
    it: &mut I,
) -> anyhow::Result<Position>
where
    I: Iterator<Item = &'a str>,
{
    let mut it = it.peekable();

    // 最初のトークンが "position" なら単に無視する。
    // 外部アプリは "position" を付けたり付けなかったりまちまちなので、それへの対処。
    if it.peek().context("position string is empty")? == &"position" {
        it.next();
    }

    let magic = it.next().context("position string is empty")?;

    if magic == "startpos" {
        return Ok(Position::startpos());
    }

    ensure!(magic == "sfen", "invalid position string magic: {}", magic);

    let board = sfen_decode_board(it.next().context("board string not found")?)?;
    let side_to_move = sfen_decode_side(it.next().context("side string not found")?)?;
    let hands = sfen_decode_hands(it.next().context("hands string not found")?)?;
    let ply = sfen_decode_ply(it.next().context("ply string not found")?)?;

    let mut pos = Position::from_parts(config, side_to_move, board, hands)?;
    pos.set_ply(ply);

    Ok(pos)
}

/// sfen 盤面文字列をデコードし、その盤面を返す。合法性チェックは一切行わない。
fn sfen_decode_board(s: &str) -> anyhow::Result<Board> {
    let mut board = Board::empty();

    let mut it = s.split('/');

    for row in Row::iter() {
        let row_s = it.next().context("board string must have exactly 9 rows")?;
        sfen_decode_board_row(row_s, row, &mut board)
            .with_context(|| format!("invalid board row: {}", row_s))?;
    }

    if let Some(s) = it.next() {
        bail!("board string has redundant row: {}", s);
    }

    Ok(board)
}

fn sfen_decode_board_row(s: &str, row: Row, board: &mut Board) -> anyhow::Result<()> {
    #[derive(Debug)]
    struct State<'a> {
        board: &'a mut Board,
        cols: std::iter::Peekable<std::vec::IntoIter<Col>>,
        row: Row,
        promo: bool,
    }
    impl<'a> State<'a> {
        fn new(board: &'a mut Board, row: Row) -> Self {
            Self {
                board,
                cols: Col::iter().collect::<Vec<_>>().into_iter().peekable(),
                row,
                promo: false,
            }
        }
        fn update(&mut self, c: char) -> anyhow::Result<()> {
            match c {
                '+' => {
                    ensure!(!self.promo, "double '+' is not allowed");
                    ensure!(self.cols.peek().is_some(), "row overflow");
                    self.promo = true;
                }
                '1'..='9' => {
                    ensure!(!self.promo, "'+' cannot be placed before digit");
                    let n = c as usize - '0' as usize;
                    for _ in 0..n {
                        self.cols.next().context("row overflow")?;
                    }
                }
                _ => {
                    let (side, mut pk) = sfen_decode_board_piece(c)?;
                    let col = self.cols.next().context("row overflow")?;
                    if self.promo {
                        pk = pk
                            .to_promoted()
                            .with_context(|| format!("not promotable piece: {}", c))?;
                        self.promo = false;
                    }
                    let sq = Square::from_col_row(col, self.row);
                    self.board[sq] = Some(Piece::new(side, pk));
                }
            }
            Ok(())
        }
        fn finalize(&mut self) -> anyhow::Result<()> {
            ensure!(!self.promo, "remaining promotion flag");
            ensure!(
                self.cols.peek().is_none(),
                "board row must have exactly 9 columns"
            );
            Ok(())
        }
    }

    let mut state = State::new(board, row);
    for c in s.chars() {
        state.update(c)?;
    }
    state.finalize()?;

    Ok(())
}

fn sfen_decode_board_piece(c: char) -> anyhow::Result<(Side, PieceKind)> {
    sfen_decode_piece(c, PieceKind::iter_piece())
        .ok_or_else(|| anyhow!("invalid board piece char: {}", c))
}

fn sfen_decode_hand_piece(c: char) -> anyhow::Result<(Side, PieceKind)> {
    sfen_decode_piece(c, PieceKind::iter_hand())
        .ok_or_else(|| anyhow!("invalid hand piece char: {}", c))
}

/// 大文字なら先手、小文字なら後手の駒として `pks` の中から探す。
fn sfen_decode_piece(
    c: char,
    mut pks: impl Iterator<Item = PieceKind>,
) -> Option<(Side, PieceKind)> {
    let side = if c.is_ascii_uppercase() {
        Side::Black
    } else {
        Side::White
    };
    let c_upper = c.to_ascii_uppercase();

    pks.find(|&pk| sfen_raw_piece_char(pk) == Some(c_upper))
        .map(|pk| (side, pk))
}

/// sfen 手番文字列をデコードし、手番の陣営を返す。
fn sfen_decode_side(s: &str) -> anyhow::Result<Side> {
    match s {
        "b" => Ok(Side::Black),
        "w" => Ok(Side::White),
        _ => bail!("invalid side string: {}", s),
    }
}

/// sfen 手駒文字列をデコードし、両陣営の手駒を返す。合法性チェックは一切行わない。
fn sfen_decode_hands(s: &str) -> anyhow::Result<Hands> {
    if s == "-" {
        return Ok(Hands::default());
    }

    #[derive(Debug)]
    struct State {
        hands: Hands,
        count: u8,
    }
    impl State {
        fn new() -> Self {
            Self {
                hands: Hands::default(),
                count: 0,
            }
        }
        fn update(&mut self, c: char) -> anyhow::Result<()> {
            match c {
                '0'..='9' => {
                    ensure!(
                        !(c == '0' && self.count == 0),
                        "leading zero is not allowed"
                    );
                    let d = c as u8 - b'0';
                    self.count = self
                        .count
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(d))
                        .context("count is too large")?;
                }
                _ => {
                    let (side, pk) = sfen_decode_hand_piece(c)?;
                    let n = if self.count == 0 { 1 } else { self.count };
                    self.hands[side][pk] = self.hands[side][pk]
                        .checked_add(u32::from(n))
                        .context("hand overflow")?;
                    self.count = 0;
                }
            }
            Ok(())
        }
        fn finalize(&self) -> anyhow::Result<()> {
            ensure!(self.count == 0, "remaining count specifier");
            Ok(())
        }
    }

    let mut state = State::new();
    for c in s.chars() {
        state.update(c)?;
    }
    state.finalize()?;

    Ok(state.hands)
}

/// sfen 手数文字列をデコードし、その手数を返す。
fn sfen_decode_ply(s: &str) -> anyhow::Result<u32> {
    let ply: u32 = s.parse().with_context(|| format!("invalid ply: {}", s))?;
    ensure!(ply >= 1, "ply must be positive");

    Ok(ply)
}

/// sfen 指し手文字列をデコードし、その指し手を返す。
/// 構文はチェックするが、合法性チェックは一切行わない。
///
/// 文字列の先頭と末尾の空白は無視される。
pub fn sfen_decode_move(s: impl AsRef<str>) -> anyhow::Result<Move> {
    // 先頭と末尾の空白は無視する。
    let s = s.as_ref().trim();

    sfen_decode_move_impl(s)
}

fn sfen_decode_move_impl(s: &str) -> anyhow::Result<Move> {
    sfen_decode_move_walk(s)
        .or_else(|| sfen_decode_move_drop(s))
        .ok_or_else(|| anyhow!("invalid move string: {}", s))
}

fn sfen_decode_move_walk(s: &str) -> Option<Move> {
    let mut it = s.chars();

    let src_col = sfen_decode_move_col(it.next()?)?;
    let src_row = sfen_decode_move_row(it.next()?)?;
    let dst_col = sfen_decode_move_col(it.next()?)?;
    let dst_row = sfen_decode_move_row(it.next()?)?;

    let promo = if let Some(c) = it.next() {
        (c == '+').then(|| true)?
    } else {
        false
    };

    let src = Square::from_col_row(src_col, src_row);
    let dst = Square::from_col_row(dst_col, dst_row);

    (it.next().is_none() && src != dst).then(|| {
        if promo {
            Move::new_walk_promotion(src, dst)
        } else {
            Move::new_walk(src, dst)
        }
    })
}

fn sfen_decode_move_drop(s: &str) -> Option<Move> {
    let mut it = s.chars();

    let (side, pk) = sfen_decode_piece(it.next()?, PieceKind::iter_hand())?;
    if side != Side::Black {
        return None;
    }

    if it.next()? != '*' {
        return None;
    }

    let dst_col = sfen_decode_move_col(it.next()?)?;
    let dst_row = sfen_decode_move_row(it.next()?)?;

    it.next().is_none().then(|| {
        let dst = Square::from_col_row(dst_col, dst_row);
        Move::new_drop(pk, dst)
    })
}

fn sfen_decode_move_col(c: char) -> Option<Col> {
    c.to_digit(10).and_then(Col::from_file)
}

fn sfen_decode_move_row(c: char) -> Option<Row> {
    match c {
        'a'..='i' => Row::from_rank(u32::from(c as u8 - b'a') + 1),
        _ => None,
    }
}
