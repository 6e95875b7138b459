mod bitboard;
mod bitop;
mod config;
mod csa;
mod dataset;
mod error;
mod features;
mod filter;
mod kifu;
mod label;
pub mod myarray;
pub mod mylog;
mod position;
mod replay;
mod rotate;
mod sfen;
mod shogi;
mod snapshot;

pub use self::bitboard::*;
pub use self::config::*;
pub use self::csa::*;
pub use self::dataset::*;
pub use self::error::*;
pub use self::features::*;
pub use self::filter::*;
pub use self::kifu::*;
pub use self::label::*;
pub use self::position::*;
pub use self::replay::*;
pub use self::rotate::*;
pub use self::sfen::*;
pub use self::shogi::*;
pub use self::snapshot::*;
