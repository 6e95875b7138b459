//! 棋譜リストから教師データを作り、ファイルに保存する。
//!
//! 保存形式は `DataRow` を 1 行ずつ bincode で連結したもの。

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EncoderConfig;
use crate::csa::CsaParser;
use crate::error::ReplayError;
use crate::features::{FeatureExtractor, Features};
use crate::kifu::Kifu;
use crate::label::Label;
use crate::replay::Replayer;

/// 保存される教師データの 1 行。
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    /// `Features::to_packed()` の値。
    pub features: Vec<u128>,
    pub move_label: u16,
    pub win: u8,
}

impl DataRow {
    pub fn new(features: &Features, label: Label, win: u8) -> Self {
        Self {
            features: features.to_packed(),
            move_label: label.inner(),
            win,
        }
    }

    pub fn features(&self) -> Features {
        Features::from_packed(&self.features)
    }

    pub fn label(&self) -> Label {
        Label::from_inner(self.move_label)
    }
}

/// 不正な棋譜に出会ったときの振る舞い。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorPolicy {
    /// 警告を出してその棋譜を捨てる。
    Skip,
    /// 全体をエラーとする。
    Abort,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::Skip
    }
}

impl std::str::FromStr for ErrorPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            _ => bail!("invalid error policy: {}", s),
        }
    }
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        };
        f.write_str(s)
    }
}

/// 棋譜リストファイルを読み込む。
///
/// 1 行に 1 パス。空行と `#` で始まる行は無視する。
pub fn read_kifu_list(path: impl AsRef<Path>) -> anyhow::Result<Vec<PathBuf>> {
    let path = path.as_ref();

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read kifu list {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

/// 棋譜を教師データに変換する。
#[derive(Debug)]
pub struct DatasetEncoder<'a> {
    config: &'a EncoderConfig,
    extractor: FeatureExtractor<'a>,
    parser: CsaParser<'a>,
}

impl<'a> DatasetEncoder<'a> {
    pub fn new(config: &'a EncoderConfig, expected_channels: usize) -> anyhow::Result<Self> {
        let extractor = FeatureExtractor::new(config, expected_channels)?;
        let parser = CsaParser::new(config)?;

        Ok(Self {
            config,
            extractor,
            parser,
        })
    }

    /// 1 局分の教師データを作る。
    pub fn encode_kifu(&self, kifu: &Kifu) -> Result<Vec<DataRow>, ReplayError> {
        Replayer::new(self.config, kifu)
            .map(|res| {
                res.map(|ex| {
                    let features = self.extractor.extract(&ex.snapshot);
                    DataRow::new(&features, ex.label, ex.win)
                })
            })
            .collect()
    }

    /// 棋譜ファイルを読み込み、1 局分の教師データを作る。
    pub fn encode_file(&self, path: impl AsRef<Path>) -> anyhow::Result<Vec<DataRow>> {
        let path = path.as_ref();

        let kifu = Kifu::load(&self.parser, path)?;
        let rows = self
            .encode_kifu(&kifu)
            .with_context(|| format!("cannot replay {}", path.display()))?;
        debug!("{}: {} rows", path.display(), rows.len());

        Ok(rows)
    }

    /// 複数の棋譜ファイルを並列に処理する。結果はリストの順に並ぶ。
    pub fn encode_files(
        &self,
        paths: &[PathBuf],
        policy: ErrorPolicy,
    ) -> anyhow::Result<Vec<DataRow>> {
        let results: Vec<_> = paths.par_iter().map(|path| self.encode_file(path)).collect();

        let mut rows = vec![];
        let mut skipped = 0;
        for res in results {
            match res {
                Ok(kifu_rows) => rows.extend(kifu_rows),
                Err(e) => match policy {
                    ErrorPolicy::Skip => {
                        warn!("skip: {:#}", e);
                        skipped += 1;
                    }
                    ErrorPolicy::Abort => return Err(e),
                },
            }
        }

        info!(
            "{} kifus ({} skipped), {} rows",
            paths.len(),
            skipped,
            rows.len()
        );

        Ok(rows)
    }
}

/// 教師データを書き込む。
pub fn write_rows<W: Write>(wtr: W, rows: &[DataRow]) -> anyhow::Result<()> {
    let mut wtr = BufWriter::new(wtr);

    for row in rows {
        bincode::serialize_into(&mut wtr, row)?;
    }
    wtr.flush()?;

    Ok(())
}

/// `write_rows()` で書き込んだ教師データを末尾まで読み込む。
pub fn read_rows<R: Read>(rdr: R) -> anyhow::Result<Vec<DataRow>> {
    let mut rdr = BufReader::new(rdr);

    let mut rows = vec![];
    while !rdr.fill_buf()?.is_empty() {
        let row: DataRow = bincode::deserialize_from(&mut rdr)
            .with_context(|| format!("truncated row {}", rows.len()))?;
        rows.push(row);
    }

    Ok(rows)
}
