//! 棋譜の再生。
//!
//! 棋譜を 1 手ずつ局面に適用しながら、各手番について
//! (手番側視点のスナップショット, 指し手ラベル, 勝敗) の組を遅延生成する。

use crate::config::EncoderConfig;
use crate::error::{ReplayError, ReplayErrorKind};
use crate::kifu::Kifu;
use crate::label::{Label, LabelCodec};
use crate::position::Position;
use crate::shogi::*;
use crate::snapshot::Snapshot;

/// 1 手分の教師データ(特徴量抽出前)。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Example {
    /// 手番側視点に正規化された着手前の局面。
    pub snapshot: Snapshot,
    /// 実際に指された手のラベル。
    pub label: Label,
    /// 手番側が最終的に勝ったなら 1, そうでなければ 0。
    pub win: u8,
}

/// 棋譜を再生するイテレータ。
///
/// エラーが起きたらそのエラーを 1 度だけ返し、以降は何も返さない。
#[derive(Debug)]
pub struct Replayer<'a> {
    config: &'a EncoderConfig,
    codec: LabelCodec<'a>,
    pos: Position,
    mvs: std::slice::Iter<'a, Move>,
    winner: Side,
    done: bool,
}

impl<'a> Replayer<'a> {
    pub fn new(config: &'a EncoderConfig, kifu: &'a Kifu) -> Self {
        Self {
            config,
            codec: LabelCodec::new(config),
            pos: kifu.start.clone(),
            mvs: kifu.moves.iter(),
            winner: kifu.winner,
            done: false,
        }
    }

    /// 現在の局面への参照を返す。
    pub fn position(&self) -> &Position {
        &self.pos
    }

    fn step(&mut self, mv: Move) -> Result<Example, ReplayErrorKind> {
        let us = self.pos.side_to_move();

        let win = u8::from(us == self.winner);
        let snapshot = self.pos.snapshot(self.config.rotator());
        let label = self.codec.encode(mv, us)?;

        self.pos.do_move(self.config, mv)?;

        Ok(Example {
            snapshot,
            label,
            win,
        })
    }
}

impl Iterator for Replayer<'_> {
    type Item = Result<Example, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mv = match self.mvs.next() {
            Some(&mv) => mv,
            None => {
                self.done = true;
                return None;
            }
        };

        let ply = self.pos.ply();
        let res = self.step(mv).map_err(|kind| ReplayError { ply, mv, kind });
        if res.is_err() {
            self.done = true;
        }

        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(self.mvs.len()))
        }
    }
}

impl std::iter::FusedIterator for Replayer<'_> {}

/// 棋譜を最後まで再生し、全ての教師データを返す。
pub fn replay(config: &EncoderConfig, kifu: &Kifu) -> Result<Vec<Example>, ReplayError> {
    Replayer::new(config, kifu).collect()
}
