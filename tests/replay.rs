use std::path::{Path, PathBuf};

#[allow(unused_imports)]
use pretty_assertions::{assert_eq, assert_ne};
use walkdir::WalkDir;

use kifu_tensor::*;

const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/asset");

fn asset(path: &str) -> PathBuf {
    Path::new(ASSET_DIR).join(path)
}

fn get_kifu_paths(dir: &str, ext: &str) -> Vec<PathBuf> {
    let mut paths: Vec<_> = WalkDir::new(asset(dir))
        .into_iter()
        .map(|entry| entry.expect("invalid directory entry").into_path())
        .filter(|path| path.extension().map_or(false, |e| e == ext))
        .collect();
    paths.sort();
    paths
}

fn load(config: &EncoderConfig, path: impl AsRef<Path>) -> Kifu {
    let parser = CsaParser::new(config).unwrap();
    Kifu::load(&parser, path).unwrap()
}

#[test]
fn test_replay_game1() {
    let config = EncoderConfig::new();
    let kifu = load(&config, asset("csa/game1.csa"));

    assert_eq!(kifu.winner, Side::Black);

    let examples = replay(&config, &kifu).unwrap();

    itertools::assert_equal(
        examples.iter().map(|ex| ex.label.inner()),
        [47, 47, 1231, 388, 2066, 389, 438, 461, 1240],
    );
    itertools::assert_equal(examples.iter().map(|ex| ex.win), [1, 0, 1, 0, 1, 0, 1, 0, 1]);
}

#[test]
fn test_replay_game2() {
    let config = EncoderConfig::new();
    let kifu = load(&config, asset("csa/game2.csa"));

    assert_eq!(kifu.winner, Side::White);

    let examples = replay(&config, &kifu).unwrap();

    itertools::assert_equal(
        examples.iter().map(|ex| ex.label.inner()),
        [47, 47, 52, 1231],
    );
    itertools::assert_equal(examples.iter().map(|ex| ex.win), [0, 1, 0, 1]);
}

#[test]
fn test_csa_and_sfen_agree() {
    let config = EncoderConfig::new();
    let csa = load(&config, asset("csa/game2.csa"));
    let sfen = load(&config, asset("sfen/game2.sfen"));

    assert_eq!(csa, sfen);
}

#[test]
fn test_board_conservation() {
    let config = EncoderConfig::new();

    for path in get_kifu_paths("csa", "csa") {
        let kifu = load(&config, &path);
        let mut replayer = Replayer::new(&config, &kifu);

        while let Some(res) = replayer.next() {
            res.unwrap();

            let pos = replayer.position();
            let on_board = pos.bb_occupied().count_ones();
            let in_hand: u32 = Side::iter().map(|side| pos.hand(side).count()).sum();
            assert_eq!(on_board + in_hand, 40, "{}", path.display());

            assert_eq!(
                pos.bb_occupied_side(Side::Black) | pos.bb_occupied_side(Side::White),
                pos.bb_occupied()
            );
        }
    }
}

#[test]
fn test_snapshot_is_mover_relative() {
    let config = EncoderConfig::new();

    for path in get_kifu_paths("csa", "csa") {
        let kifu = load(&config, &path);
        for ex in replay(&config, &kifu).unwrap() {
            // どの棋譜も玉が動かないので、手番側の玉は常に５九に見える。
            let king = ex.snapshot.bb_piece(Side::Black, PieceKind::King);
            assert_eq!(king, Bitboard::from(SQ_59));
            let king = ex.snapshot.bb_piece(Side::White, PieceKind::King);
            assert_eq!(king, Bitboard::from(SQ_51));
        }
    }
}

#[test]
fn test_sfen_roundtrip() {
    let config = EncoderConfig::new();

    for path in get_kifu_paths("csa", "csa") {
        let kifu = load(&config, &path);
        let sfen = sfen_encode(&kifu.start, &kifu.moves);
        let (start, moves) = sfen_decode(&config, &sfen).unwrap();

        assert_eq!(start, kifu.start);
        assert_eq!(moves, kifu.moves);
    }
}

#[test]
fn test_broken_kifus() {
    let config = EncoderConfig::new();
    let parser = CsaParser::new(&config).unwrap();

    for path in get_kifu_paths("broken", "csa") {
        assert!(Kifu::load(&parser, &path).is_err(), "{}", path.display());
    }
}
