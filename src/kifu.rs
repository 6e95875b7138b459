//! 勝敗のついた棋譜と、そのファイルからの読み込み。

use std::path::Path;

use anyhow::{bail, Context as _};

use crate::config::EncoderConfig;
use crate::csa::CsaParser;
use crate::position::Position;
use crate::sfen::sfen_decode;
use crate::shogi::*;

/// 開始局面、指し手列、勝者からなる棋譜。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Kifu {
    pub start: Position,
    pub moves: Vec<Move>,
    pub winner: Side,
}

impl Kifu {
    /// 棋譜ファイルを拡張子に応じて読み込む。
    ///
    /// * `.csa`: CSA 形式。勝者のいない棋譜はエラー。
    /// * `.sfen`, `.usi`: 最初の非コメント行が局面と指し手、`# winner: b|w` 行が勝者。
    pub fn load(parser: &CsaParser, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;

        let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let kifu = match ext {
            "csa" => parser.parse(&text)?.into_kifu(),
            "sfen" | "usi" => Self::from_sfen_text(parser.config(), &text),
            _ => bail!("unknown kifu extension: {}", path.display()),
        };

        kifu.with_context(|| format!("invalid kifu: {}", path.display()))
    }

    /// sfen/usi 形式の棋譜テキストを読み込む。
    pub fn from_sfen_text(config: &EncoderConfig, text: &str) -> anyhow::Result<Self> {
        let mut body = None;
        let mut winner = None;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(value) = comment.trim().strip_prefix("winner:") {
                    winner = Some(match value.trim() {
                        "b" => Side::Black,
                        "w" => Side::White,
                        value => bail!("invalid winner: {}", value),
                    });
                }
            } else if body.is_none() {
                body = Some(line);
            }
        }

        let body = body.context("no position line")?;
        let winner = winner.context("no winner line")?;
        let (start, moves) = sfen_decode(config, body)?;

        Ok(Self {
            start,
            moves,
            winner,
        })
    }
}
