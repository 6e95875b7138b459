//! 学習に使う CSA 棋譜の選別と、訓練用/テスト用への分割。

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use log::debug;
use rand::prelude::*;
use rayon::prelude::*;

use crate::config::EncoderConfig;
use crate::csa::{CsaParser, CsaRecord, GameEnd};

/// 分割に使う乱数のシード。
pub const SPLIT_SEED: u64 = 717;

/// 訓練用に回す棋譜の割合(%)。
pub const TRAIN_PERCENT: usize = 90;

/// 棋譜の選別条件。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterConfig {
    /// 手数がこれを超える棋譜のみ採用する。
    pub min_moves: usize,
    /// 両対局者のレーティングがこれ以上の棋譜のみ採用する。
    pub min_rate: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_moves: 50,
            min_rate: 3000.0,
        }
    }
}

impl FilterConfig {
    /// 投了で終わり、十分長く、両対局者のレーティングが十分高い棋譜なら true を返す。
    pub fn accept(&self, rec: &CsaRecord) -> bool {
        rec.end == Some(GameEnd::Toryo)
            && rec.moves.len() > self.min_moves
            && rec.min_rate().map_or(false, |rate| rate >= self.min_rate)
    }

    /// 棋譜ファイルを読み込んで選別する。読めない棋譜は採用しない。
    pub fn accept_file(&self, parser: &CsaParser, path: &Path) -> bool {
        let rec = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))
            .and_then(|text| parser.parse(&text));

        match rec {
            Ok(rec) => self.accept(&rec),
            Err(e) => {
                debug!("{}: {:#}", path.display(), e);
                false
            }
        }
    }

    /// ディレクトリ直下の `.csa` ファイルを選別し、パス順に並べて返す。
    pub fn filter_dir(
        &self,
        config: &EncoderConfig,
        dir: impl AsRef<Path>,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let parser = CsaParser::new(config)?;

        let mut paths = vec![];
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("cannot read directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "csa") {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths
            .into_par_iter()
            .filter(|path| self.accept_file(&parser, path))
            .collect())
    }
}

/// パスの列を固定シードでシャッフルし、先頭 `train_percent` % を訓練用、残りをテスト用に分ける。
pub fn split_train_test(
    mut paths: Vec<PathBuf>,
    seed: u64,
    train_percent: usize,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut rng = StdRng::seed_from_u64(seed);
    paths.shuffle(&mut rng);

    let train_count = paths.len() * train_percent.min(100) / 100;
    let test = paths.split_off(train_count);

    (paths, test)
}

/// パスの列を棋譜リスト形式(1 行 1 パス)で書き込む。
pub fn write_kifu_list(path: impl AsRef<Path>, paths: &[PathBuf]) -> anyhow::Result<()> {
    let path = path.as_ref();

    let body: String = paths
        .iter()
        .map(|p| format!("{}\n", p.display()))
        .collect();

    std::fs::write(path, body).with_context(|| format!("cannot write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use crate::csa::parse_csa;

    use super::*;

    #[allow(unused_imports)]
    use pretty_assertions::{assert_eq, assert_ne};

    /// 先手が 1 筋の香を上下させ続け、後手が 9 筋の香を上下させ続ける棋譜を作る。
    fn make_csa(num_moves: usize, rates: (f64, f64), end: &str) -> String {
        let mut text = format!(
            "V2.2\n'black_rate:a:{}\n'white_rate:b:{}\nPI\n+\n",
            rates.0, rates.1
        );
        for i in 0..num_moves {
            let mv = match i % 4 {
                0 => "+1918KY",
                1 => "-9192KY",
                2 => "+1819KY",
                _ => "-9291KY",
            };
            text.push_str(mv);
            text.push('\n');
        }
        text.push_str(end);
        text.push('\n');
        text
    }

    #[test]
    fn test_accept() {
        let config = EncoderConfig::new();
        let filter = FilterConfig::default();
        let accept = |text: &str| filter.accept(&parse_csa(&config, text).unwrap());

        assert!(accept(&make_csa(51, (3000.0, 3500.0), "%TORYO")));
        assert!(!accept(&make_csa(50, (3000.0, 3500.0), "%TORYO")));
        assert!(!accept(&make_csa(51, (2999.0, 3500.0), "%TORYO")));
        assert!(!accept(&make_csa(51, (3000.0, 3500.0), "%TIME_UP")));
        assert!(!accept(&make_csa(51, (3000.0, 3500.0), "%SENNICHITE")));

        // レーティングがなければ採用しない。
        assert!(!accept("PI\n+\n+7776FU\n%TORYO\n"));
    }

    #[test]
    fn test_split_train_test() {
        let paths: Vec<_> = (0..20).map(|i| PathBuf::from(format!("{}.csa", i))).collect();

        let (train, test) = split_train_test(paths.clone(), SPLIT_SEED, 90);
        assert_eq!(train.len(), 18);
        assert_eq!(test.len(), 2);

        let mut all: Vec<_> = train.iter().chain(&test).cloned().collect();
        all.sort();
        let mut expected = paths.clone();
        expected.sort();
        assert_eq!(all, expected);

        // 同じシードなら同じ分割になる。
        assert_eq!(split_train_test(paths, SPLIT_SEED, 90), (train, test));
    }

    #[test]
    fn test_split_empty() {
        let (train, test) = split_train_test(vec![], SPLIT_SEED, 90);
        assert!(train.is_empty());
        assert!(test.is_empty());
    }
}
