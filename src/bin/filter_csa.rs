//! ディレクトリ内の CSA 棋譜を選別し、訓練用とテスト用の棋譜リストを作る。

use std::path::PathBuf;

use log::{info, LevelFilter};
use structopt::StructOpt;

use kifu_tensor::*;

#[derive(Debug, StructOpt)]
struct Opt {
    /// CSA 棋譜のあるディレクトリ。
    #[structopt(short, long, parse(from_os_str))]
    dir: PathBuf,

    /// 訓練用の棋譜リストの出力先。
    #[structopt(long, parse(from_os_str))]
    train: PathBuf,

    /// テスト用の棋譜リストの出力先。
    #[structopt(long, parse(from_os_str))]
    test: PathBuf,

    #[structopt(long, default_value = "50")]
    min_moves: usize,

    #[structopt(long, default_value = "3000")]
    min_rate: f64,

    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    mylog::init_logger(opt.log_level)?;

    let config = EncoderConfig::new();
    let filter = FilterConfig {
        min_moves: opt.min_moves,
        min_rate: opt.min_rate,
    };

    let paths = filter.filter_dir(&config, &opt.dir)?;
    info!("{} kifus accepted", paths.len());

    let (train, test) = split_train_test(paths, SPLIT_SEED, TRAIN_PERCENT);
    info!("train: {}, test: {}", train.len(), test.len());

    write_kifu_list(&opt.train, &train)?;
    write_kifu_list(&opt.test, &test)?;

    Ok(())
}
