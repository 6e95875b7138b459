//! 棋譜リストから教師データを作る。
//! 各リストについて、拡張子を ".bin" に変えたファイルへ書き込む。

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use log::{info, LevelFilter};
use structopt::StructOpt;

use kifu_tensor::*;

#[derive(Debug, StructOpt)]
struct Opt {
    /// 訓練用の棋譜リスト。
    #[structopt(long, parse(from_os_str))]
    train: PathBuf,

    /// テスト用の棋譜リスト。
    #[structopt(long, parse(from_os_str))]
    test: PathBuf,

    /// ワーカースレッド数。省略時は CPU 数。
    #[structopt(long)]
    threads: Option<usize>,

    /// 不正な棋譜の扱い ("skip" または "abort")。
    #[structopt(long, default_value = "skip")]
    error_policy: ErrorPolicy,

    /// モデルの入力チャンネル数。
    #[structopt(long, default_value = "104")]
    channels: usize,

    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    mylog::init_logger(opt.log_level)?;

    let threads = opt.threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;
    info!("threads: {}", threads);

    let config = EncoderConfig::new();
    config.ensure_num_labels(NUM_LABELS)?;
    let encoder = DatasetEncoder::new(&config, opt.channels)?;

    for list in [&opt.train, &opt.test] {
        read_and_write(&encoder, list, opt.error_policy)?;
    }

    Ok(())
}

fn read_and_write(encoder: &DatasetEncoder, list: &Path, policy: ErrorPolicy) -> anyhow::Result<()> {
    let paths = read_kifu_list(list)?;
    info!("{}: {} kifus", list.display(), paths.len());

    let rows = encoder.encode_files(&paths, policy)?;

    let out = list.with_extension("bin");
    let file = File::create(&out).with_context(|| format!("cannot create {}", out.display()))?;
    write_rows(file, &rows)?;
    info!("wrote {} rows to {}", rows.len(), out.display());

    Ok(())
}
