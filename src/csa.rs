//! CSA 形式の棋譜の読み込み。
//!
//! floodgate の棋譜で使われる範囲をサポートする:
//!
//! * バージョン `V2.2`、対局者名 `N+`/`N-`、棋譜情報 `$...`、コメント `'...`
//! * 開始局面 `PI`(駒落ち指定を含む)、`P1`..`P9`、`P+`/`P-`、手番 `+`/`-`
//! * 指し手 `+7776FU`、消費時間 `T...`(`,` 区切りで同じ行に置いてもよい)
//! * 終局 `%TORYO` など
//!
//! 成りは移動元の駒種と移動後の駒コードの違いから推定する。
//! そのため指し手は読みながら局面に適用して検査する。

use anyhow::{bail, ensure, Context as _};
use log::debug;
use regex::Regex;

use crate::config::EncoderConfig;
use crate::kifu::Kifu;
use crate::myarray::*;
use crate::position::Position;
use crate::shogi::*;

/// 終局理由。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GameEnd {
    /// 投了。手番側の負け。
    Toryo,
    /// 時間切れ。手番側の負け。
    TimeUp,
    /// 反則手。手番側の負け。
    IllegalMove,
    /// 指定した陣営の反則行為による負け。
    IllegalAction(Side),
    /// 入玉宣言勝ち。手番側の勝ち。
    Kachi,
    Sennichite,
    Jishogi,
    Chudan,
    MaxMoves,
}

impl GameEnd {
    /// CSA 形式の終局文字列をパースする。
    pub fn from_csa(s: &str) -> Option<Self> {
        let end = match s {
            "%TORYO" => Self::Toryo,
            "%TIME_UP" => Self::TimeUp,
            "%ILLEGAL_MOVE" => Self::IllegalMove,
            "%+ILLEGAL_ACTION" => Self::IllegalAction(Side::Black),
            "%-ILLEGAL_ACTION" => Self::IllegalAction(Side::White),
            "%KACHI" => Self::Kachi,
            "%SENNICHITE" => Self::Sennichite,
            "%JISHOGI" => Self::Jishogi,
            "%CHUDAN" => Self::Chudan,
            "%MAX_MOVES" => Self::MaxMoves,
            _ => return None,
        };

        Some(end)
    }

    /// 終局時の手番から勝者を求める。引き分けや中断なら `None`。
    pub fn winner(self, side_to_move: Side) -> Option<Side> {
        match self {
            Self::Toryo | Self::TimeUp | Self::IllegalMove => Some(side_to_move.inv()),
            Self::Kachi => Some(side_to_move),
            Self::IllegalAction(loser) => Some(loser.inv()),
            Self::Sennichite | Self::Jishogi | Self::Chudan | Self::MaxMoves => None,
        }
    }
}

/// CSA 形式の棋譜。
#[derive(Clone, Debug)]
pub struct CsaRecord {
    pub start: Position,
    pub moves: Vec<Move>,
    pub end: Option<GameEnd>,
    pub winner: Option<Side>,
    pub names: MyArray1<Option<String>, Side, 2>,
    /// floodgate のコメント `'black_rate:NAME:RATE` から得たレーティング。
    pub rates: MyArray1<Option<f64>, Side, 2>,
}

impl CsaRecord {
    /// 勝敗のついた棋譜に変換する。勝者がいなければエラー。
    pub fn into_kifu(self) -> anyhow::Result<Kifu> {
        let winner = self
            .winner
            .with_context(|| format!("record has no winner (end: {:?})", self.end))?;

        Ok(Kifu {
            start: self.start,
            moves: self.moves,
            winner,
        })
    }

    /// 両対局者のレーティングの小さい方を返す。どちらかが欠けていれば `None`。
    pub fn min_rate(&self) -> Option<f64> {
        match (self.rates[Side::Black], self.rates[Side::White]) {
            (Some(b), Some(w)) => Some(b.min(w)),
            _ => None,
        }
    }
}

/// CSA 形式の棋譜のパーサ。正規表現を使い回すためにインスタンスを作る。
///
/// 局面の検査(持駒の上限枚数など)には `config` を使う。
#[derive(Debug)]
pub struct CsaParser<'a> {
    config: &'a EncoderConfig,
    rate_re: Regex,
}

impl<'a> CsaParser<'a> {
    pub fn new(config: &'a EncoderConfig) -> anyhow::Result<Self> {
        let rate_re = Regex::new(r"^'(black|white)_rate:.*:([^:]*)$")?;

        Ok(Self { config, rate_re })
    }

    pub fn config(&self) -> &'a EncoderConfig {
        self.config
    }

    /// CSA 形式の文字列をパースする。
    pub fn parse(&self, text: &str) -> anyhow::Result<CsaRecord> {
        let mut state = State::new(self.config, &self.rate_re);

        for (i, line) in text.lines().enumerate() {
            state
                .update_line(line.trim_end_matches('\r'))
                .with_context(|| format!("line {}: {}", i + 1, line))?;
        }

        state.finalize()
    }
}

/// CSA 形式の文字列をパースする。
pub fn parse_csa(config: &EncoderConfig, text: &str) -> anyhow::Result<CsaRecord> {
    CsaParser::new(config)?.parse(text)
}

#[derive(Debug)]
struct State<'a> {
    config: &'a EncoderConfig,
    rate_re: &'a Regex,

    // 開始局面の組み立て中の情報。
    board: Board,
    hands: Hands,
    has_board: bool,

    // 開始局面が確定したら以降はこちらを使う。
    start: Option<Position>,
    pos: Option<Position>,

    moves: Vec<Move>,
    end: Option<GameEnd>,
    winner: Option<Side>,
    names: MyArray1<Option<String>, Side, 2>,
    rates: MyArray1<Option<f64>, Side, 2>,
}

impl<'a> State<'a> {
    fn new(config: &'a EncoderConfig, rate_re: &'a Regex) -> Self {
        Self {
            config,
            rate_re,

            board: Board::empty(),
            hands: Hands::default(),
            has_board: false,

            start: None,
            pos: None,

            moves: vec![],
            end: None,
            winner: None,
            names: MyArray1::from([None, None]),
            rates: MyArray1::from([None, None]),
        }
    }

    fn update_line(&mut self, line: &str) -> anyhow::Result<()> {
        // コメントは ',' を含みうるので分割前に処理する。
        if let Some(comment) = line.strip_prefix('\'') {
            return self.update_comment(comment, line);
        }

        for stmt in line.split(',') {
            self.update_statement(stmt)?;
        }

        Ok(())
    }

    fn update_comment(&mut self, comment: &str, line: &str) -> anyhow::Result<()> {
        if let Some(caps) = self.rate_re.captures(line) {
            let side = if &caps[1] == "black" {
                Side::Black
            } else {
                Side::White
            };
            let rate: f64 = caps[2]
                .trim()
                .parse()
                .with_context(|| format!("invalid rate: {}", &caps[2]))?;
            self.rates[side] = Some(rate);
        } else {
            debug!("comment: {}", comment);
        }

        Ok(())
    }

    fn update_statement(&mut self, stmt: &str) -> anyhow::Result<()> {
        if stmt.is_empty() {
            return Ok(());
        }

        if let Some(name) = stmt.strip_prefix("N+") {
            self.names[Side::Black] = Some(name.to_owned());
        } else if let Some(name) = stmt.strip_prefix("N-") {
            self.names[Side::White] = Some(name.to_owned());
        } else if stmt.starts_with('V') || stmt.starts_with('$') || stmt.starts_with('T') {
            // バージョン、棋譜情報、消費時間は使わない。
        } else if let Some(rest) = stmt.strip_prefix("PI") {
            self.update_pi(rest)?;
        } else if let Some(rest) = stmt.strip_prefix("P+") {
            self.update_placement(Side::Black, rest)?;
        } else if let Some(rest) = stmt.strip_prefix("P-") {
            self.update_placement(Side::White, rest)?;
        } else if let Some(rest) = stmt.strip_prefix('P') {
            self.update_board_row(rest)?;
        } else if stmt == "+" {
            self.fix_start(Side::Black)?;
        } else if stmt == "-" {
            self.fix_start(Side::White)?;
        } else if stmt.starts_with('+') || stmt.starts_with('-') {
            self.update_move(stmt)?;
        } else if stmt.starts_with('%') {
            self.update_end(stmt)?;
        } else {
            bail!("unknown statement: {}", stmt);
        }

        Ok(())
    }

    /// 平手初期配置。後ろに駒落ちの指定("82HI" など)が続きうる。
    fn update_pi(&mut self, rest: &str) -> anyhow::Result<()> {
        ensure!(self.start.is_none(), "start position is already fixed");

        self.board = Board::startpos();
        self.hands = Hands::default();
        self.has_board = true;

        for chunk in chunks(rest, 4)? {
            let sq = parse_square(&chunk[..2])?;
            let pk = parse_piece_kind(&chunk[2..])?;
            ensure!(
                self.board[sq].map(|pc| pc.kind) == Some(pk),
                "no {} on {:?} to remove",
                chunk,
                sq
            );
            self.board[sq] = None;
        }

        Ok(())
    }

    /// 一括表現 "P1-KY-KE-GI-KI-OU-KI-GI-KE-KY" の 1 段分。
    fn update_board_row(&mut self, rest: &str) -> anyhow::Result<()> {
        ensure!(self.start.is_none(), "start position is already fixed");

        let rank = rest
            .get(..1)
            .and_then(|s| s.parse::<u32>().ok())
            .and_then(Row::from_rank)
            .with_context(|| format!("invalid row statement: P{}", rest))?;

        // 末尾の空白が削られていることがあるので補う。
        let cells = format!("{:<27}", &rest[1..]);
        let cells = chunks(&cells, 3)?;
        ensure!(cells.len() == 9, "board row must have exactly 9 columns");

        for (col, cell) in Col::iter().zip(cells) {
            let sq = Square::from_col_row(col, rank);
            self.board[sq] = match cell.trim() {
                "*" | "" => None,
                cell => Some(parse_piece(cell)?),
            };
        }
        self.has_board = true;

        Ok(())
    }

    /// 駒別単独表現 "P+99KY89KE" や "P-00FU"(持駒)。
    fn update_placement(&mut self, side: Side, rest: &str) -> anyhow::Result<()> {
        ensure!(self.start.is_none(), "start position is already fixed");

        for chunk in chunks(rest, 4)? {
            ensure!(&chunk[2..] != "AL", "\"AL\" is not supported");
            let pk = parse_piece_kind(&chunk[2..])?;
            if &chunk[..2] == "00" {
                ensure!(pk.is_hand(), "{:?} cannot be in hand", pk);
                self.hands[side][pk] = self.hands[side][pk].saturating_add(1);
            } else {
                let sq = parse_square(&chunk[..2])?;
                self.board[sq] = Some(Piece::new(side, pk));
            }
        }
        self.has_board = true;

        Ok(())
    }

    /// 開始局面を確定させる。
    fn fix_start(&mut self, side_to_move: Side) -> anyhow::Result<()> {
        ensure!(self.start.is_none(), "side to move is already fixed");
        ensure!(self.has_board, "start position is not given");

        let pos = Position::from_parts(
            self.config,
            side_to_move,
            self.board.clone(),
            self.hands,
        )?;
        self.start = Some(pos.clone());
        self.pos = Some(pos);

        Ok(())
    }

    fn update_move(&mut self, stmt: &str) -> anyhow::Result<()> {
        ensure!(self.end.is_none(), "move after game end");
        ensure!(stmt.len() == 7 && stmt.is_ascii(), "invalid move: {}", stmt);

        let side = if stmt.starts_with('+') {
            Side::Black
        } else {
            Side::White
        };

        // 手番行が省略されていたら最初の指し手の手番を使う。
        if self.pos.is_none() {
            self.fix_start(side)?;
        }
        let pos = self.pos.as_mut().context("start position is not given")?;

        ensure!(
            pos.side_to_move() == side,
            "side mismatch: {:?} to move",
            pos.side_to_move()
        );

        let pk = parse_piece_kind(&stmt[5..7])?;
        let dst = parse_square(&stmt[3..5])?;

        let mv = if &stmt[1..3] == "00" {
            Move::new_drop(pk, dst)
        } else {
            let src = parse_square(&stmt[1..3])?;
            let (_, pk_src) = pos
                .piece_on(src)
                .with_context(|| format!("no piece on {:?}", src))?;
            if pk == pk_src {
                Move::new_walk(src, dst)
            } else if pk_src.to_promoted() == Some(pk) {
                Move::new_walk_promotion(src, dst)
            } else {
                bail!("{:?} on {:?} cannot become {:?}", pk_src, src, pk);
            }
        };

        let ply = pos.ply();
        pos.do_move(self.config, mv)
            .with_context(|| format!("ply {}: cannot apply {}", ply, stmt))?;
        self.moves.push(mv);

        Ok(())
    }

    fn update_end(&mut self, stmt: &str) -> anyhow::Result<()> {
        ensure!(self.end.is_none(), "duplicate game end: {}", stmt);

        let end = GameEnd::from_csa(stmt).with_context(|| format!("unknown result: {}", stmt))?;

        if self.pos.is_none() {
            self.fix_start(Side::Black)?;
        }
        let side_to_move = self
            .pos
            .as_ref()
            .map_or(Side::Black, Position::side_to_move);

        self.end = Some(end);
        self.winner = end.winner(side_to_move);

        Ok(())
    }

    fn finalize(mut self) -> anyhow::Result<CsaRecord> {
        if self.start.is_none() {
            self.fix_start(Side::Black)?;
        }
        let start = self.start.context("start position is not given")?;

        Ok(CsaRecord {
            start,
            moves: self.moves,
            end: self.end,
            winner: self.winner,
            names: self.names,
            rates: self.rates,
        })
    }
}

/// 文字列を `n` 文字ずつに区切る。ASCII でなければならない。
fn chunks(s: &str, n: usize) -> anyhow::Result<Vec<&str>> {
    ensure!(s.is_ascii(), "non-ASCII string: {}", s);
    ensure!(s.len() % n == 0, "length must be a multiple of {}: {}", n, s);

    Ok((0..s.len()).step_by(n).map(|i| &s[i..i + n]).collect())
}

/// "77" のような 2 桁の数字をマスとしてパースする。
fn parse_square(s: &str) -> anyhow::Result<Square> {
    let mut it = s.chars().map(|c| c.to_digit(10));

    match (it.next(), it.next(), it.next()) {
        (Some(Some(file)), Some(Some(rank)), None) => {
            Square::from_file_rank(file, rank).with_context(|| format!("invalid square: {}", s))
        }
        _ => bail!("invalid square: {}", s),
    }
}

fn parse_piece_kind(s: &str) -> anyhow::Result<PieceKind> {
    PieceKind::from_csa(s).with_context(|| format!("invalid piece code: {}", s))
}

/// "+FU" のような陣営付きの駒をパースする。
fn parse_piece(s: &str) -> anyhow::Result<Piece> {
    let side = match s.get(..1) {
        Some("+") => Side::Black,
        Some("-") => Side::White,
        _ => bail!("invalid piece: {}", s),
    };
    let pk = parse_piece_kind(&s[1..])?;

    Ok(Piece::new(side, pk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    const HIRATE: &str = "\
P1-KY-KE-GI-KI-OU-KI-GI-KE-KY
P2 * -HI *  *  *  *  * -KA * 
P3-FU-FU-FU-FU-FU-FU-FU-FU-FU
P4 *  *  *  *  *  *  *  *  * 
P5 *  *  *  *  *  *  *  *  * 
P6 *  *  *  *  *  *  *  *  * 
P7+FU+FU+FU+FU+FU+FU+FU+FU+FU
P8 * +KA *  *  *  *  * +HI * 
P9+KY+KE+GI+KI+OU+KI+GI+KE+KY
";

    #[test]
    fn test_parse_basic() {
        let config = EncoderConfig::new();
        let text = "\
V2.2
N+alice
N-bob
'black_rate:alice+0123:3120.5
'white_rate:bob+4567:2980
$EVENT:test
PI
+
+7776FU,T3
-3334FU
T5
+8822UM
-3122GI
%TORYO
";
        let rec = parse_csa(&config, text).unwrap();

        assert_eq!(rec.start, Position::startpos());
        assert_eq!(
            rec.moves,
            [
                Move::new_walk(SQ_77, SQ_76),
                Move::new_walk(SQ_33, SQ_34),
                Move::new_walk_promotion(SQ_88, SQ_22),
                Move::new_walk(SQ_31, SQ_22),
            ]
        );
        assert_eq!(rec.end, Some(GameEnd::Toryo));
        // 先手番で投了したので後手の勝ち。
        assert_eq!(rec.winner, Some(Side::White));
        assert_eq!(rec.names[Side::Black].as_deref(), Some("alice"));
        assert_eq!(rec.names[Side::White].as_deref(), Some("bob"));
        assert_eq!(rec.rates[Side::Black], Some(3120.5));
        assert_eq!(rec.rates[Side::White], Some(2980.0));
        assert_eq!(rec.min_rate(), Some(2980.0));

        let kifu = rec.into_kifu().unwrap();
        assert_eq!(kifu.winner, Side::White);
        assert_eq!(kifu.moves.len(), 4);
    }

    #[test]
    fn test_parse_board_rows() {
        let config = EncoderConfig::new();
        let text = format!("{}+\n+7776FU\n%KACHI\n", HIRATE);
        let rec = parse_csa(&config, &text).unwrap();

        assert_eq!(rec.start, Position::startpos());
        assert_eq!(rec.end, Some(GameEnd::Kachi));
        // 後手番で宣言したので後手の勝ち。
        assert_eq!(rec.winner, Some(Side::White));
    }

    #[test]
    fn test_parse_trimmed_board_rows() {
        let config = EncoderConfig::new();
        let text: String = HIRATE.lines().map(|l| format!("{}\n", l.trim_end())).collect();
        let rec = parse_csa(&config, &format!("{}+\n", text)).unwrap();

        assert_eq!(rec.start, Position::startpos());
        assert_eq!(rec.end, None);
        assert_eq!(rec.winner, None);
        assert!(rec.into_kifu().is_err());
    }

    #[test]
    fn test_parse_placement() {
        let config = EncoderConfig::new();
        let text = "\
P+59OU00KA00FU00FU
P-51OU13KY
-
-5142OU
+0055KA
%CHUDAN
";
        let rec = parse_csa(&config, text).unwrap();

        assert_eq!(rec.start.side_to_move(), Side::White);
        assert_eq!(rec.start.hand(Side::Black)[PieceKind::Pawn], 2);
        assert_eq!(rec.start.hand(Side::Black)[PieceKind::Bishop], 1);
        assert_eq!(
            rec.start.piece_on(SQ_13),
            Some((Side::White, PieceKind::Lance))
        );
        assert_eq!(
            rec.moves,
            [
                Move::new_walk(SQ_51, SQ_42),
                Move::new_drop(PieceKind::Bishop, SQ_55),
            ]
        );
        assert_eq!(rec.winner, None);

        // 後手は角を持っていないので打てない。
        assert!(parse_csa(&config, "P+59OU00KA\nP-51OU\n-\n-0055KA\n").is_err());
        // 玉は持駒にできない。
        assert!(parse_csa(&config, "P+00OU\n+\n").is_err());
    }

    #[test]
    fn test_parse_handicap() {
        let config = EncoderConfig::new();
        let rec = parse_csa(&config, "PI82HI22KA\n-\n-5142OU\n%SENNICHITE\n").unwrap();

        assert_eq!(rec.start.piece_on(SQ_82), None);
        assert_eq!(rec.start.piece_on(SQ_22), None);
        assert_eq!(rec.start.side_to_move(), Side::White);
        assert_eq!(rec.moves, [Move::new_walk(SQ_51, SQ_42)]);
        assert_eq!(rec.winner, None);
    }

    #[test]
    fn test_game_end_winner() {
        assert_eq!(GameEnd::Toryo.winner(Side::Black), Some(Side::White));
        assert_eq!(GameEnd::TimeUp.winner(Side::White), Some(Side::Black));
        assert_eq!(GameEnd::IllegalMove.winner(Side::Black), Some(Side::White));
        assert_eq!(GameEnd::Kachi.winner(Side::Black), Some(Side::Black));
        assert_eq!(
            GameEnd::IllegalAction(Side::Black).winner(Side::Black),
            Some(Side::White)
        );
        assert_eq!(
            GameEnd::IllegalAction(Side::White).winner(Side::Black),
            Some(Side::Black)
        );
        assert_eq!(GameEnd::Chudan.winner(Side::Black), None);
        assert_eq!(GameEnd::from_csa("%MAX_MOVES"), Some(GameEnd::MaxMoves));
        assert_eq!(GameEnd::from_csa("%FOO"), None);
    }

    #[test]
    fn test_parse_errors() {
        let config = EncoderConfig::new();
        // 手番違い。
        assert!(parse_csa(&config, "PI\n+\n-3334FU\n").is_err());
        // 移動元に駒がない。
        assert!(parse_csa(&config, "PI\n+\n+5554FU\n").is_err());
        // 成れない駒が成っている。
        assert!(parse_csa(&config, "PI\n+\n+6958NG\n").is_err());
        // 駒コードが移動元の駒と矛盾する。
        assert!(parse_csa(&config, "PI\n+\n+7776KY\n").is_err());
        // 持っていない駒を打つ。
        assert!(parse_csa(&config, "PI\n+\n+0055KA\n").is_err());
        // 終局後の指し手。
        assert!(parse_csa(&config, "PI\n+\n%TORYO\n+7776FU\n").is_err());
        // 不明な文。
        assert!(parse_csa(&config, "PI\n+\nX\n").is_err());
        // 開始局面がない。
        assert!(parse_csa(&config, "+\n").is_err());
    }

    #[test]
    fn test_parse_hand_overflow() {
        let config = EncoderConfig::new();

        let placement = |n: usize| format!("P+59OU{}\nP-51OU\n+\n", "00FU".repeat(n));

        let rec = parse_csa(&config, &placement(18)).unwrap();
        assert_eq!(rec.start.hand(Side::Black)[PieceKind::Pawn], 18);

        // 歩は 18 枚まで。
        assert!(parse_csa(&config, &placement(19)).is_err());
        // 飛車は 2 枚まで。
        assert!(parse_csa(&config, "P+59OU\nP-51OU00HI00HI00HI\n+\n").is_err());
    }
}
