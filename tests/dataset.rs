use std::path::{Path, PathBuf};

#[allow(unused_imports)]
use pretty_assertions::{assert_eq, assert_ne};
use walkdir::WalkDir;

use kifu_tensor::*;

const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/asset");

fn get_paths(dir: &str) -> Vec<PathBuf> {
    let mut paths: Vec<_> = WalkDir::new(Path::new(ASSET_DIR).join(dir))
        .into_iter()
        .map(|entry| entry.expect("invalid directory entry").into_path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    paths
}

#[test]
fn test_encode_files() {
    let config = EncoderConfig::new();
    let encoder = DatasetEncoder::new(&config, INPUT_CHANNELS).unwrap();

    let paths = get_paths("csa");
    assert_eq!(paths.len(), 2);

    let rows = encoder.encode_files(&paths, ErrorPolicy::Abort).unwrap();

    // game1 が 9 手、game2 が 4 手。リストの順に並ぶ。
    assert_eq!(rows.len(), 13);
    itertools::assert_equal(
        rows.iter().map(|row| row.move_label),
        [47, 47, 1231, 388, 2066, 389, 438, 461, 1240, 47, 47, 52, 1231],
    );
    assert!(rows.iter().all(|row| row.features.len() == 104));

    // 同じ開始局面なので先頭の特徴量は一致する。
    assert_eq!(rows[0].features, rows[9].features);

    let mut buf = vec![];
    write_rows(&mut buf, &rows).unwrap();
    assert_eq!(read_rows(buf.as_slice()).unwrap(), rows);
}

#[test]
fn test_error_policy() {
    let config = EncoderConfig::new();
    let encoder = DatasetEncoder::new(&config, INPUT_CHANNELS).unwrap();

    let mut paths = get_paths("csa");
    paths.extend(get_paths("broken"));

    let rows = encoder.encode_files(&paths, ErrorPolicy::Skip).unwrap();
    assert_eq!(rows.len(), 13);

    assert!(encoder.encode_files(&paths, ErrorPolicy::Abort).is_err());
}

#[test]
fn test_channel_mismatch() {
    let config = EncoderConfig::new();
    assert!(DatasetEncoder::new(&config, 119).is_err());
}

#[test]
fn test_filter_rejects_short_games() {
    let config = EncoderConfig::new();
    let filter = FilterConfig::default();
    assert!(filter
        .filter_dir(&config, Path::new(ASSET_DIR).join("csa"))
        .unwrap()
        .is_empty());

    // 条件を緩めると game2 だけが通る(game1 はレーティング不足)。
    let filter = FilterConfig {
        min_moves: 0,
        min_rate: 3000.0,
    };
    let paths = filter
        .filter_dir(&config, Path::new(ASSET_DIR).join("csa"))
        .unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].ends_with("game2.csa"));
}
