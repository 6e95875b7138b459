mod decode;
mod encode;

pub use self::decode::*;
pub use self::encode::*;

/// 生駒の sfen 文字(先手の大文字)。玉も含む。成駒は `None`。
fn sfen_raw_piece_char(pk: crate::shogi::PieceKind) -> Option<char> {
    use crate::shogi::PieceKind;

    match pk {
        PieceKind::King => Some('K'),
        PieceKind::Rook => Some('R'),
        PieceKind::Bishop => Some('B'),
        PieceKind::Gold => Some('G'),
        PieceKind::Silver => Some('S'),
        PieceKind::Knight => Some('N'),
        PieceKind::Lance => Some('L'),
        PieceKind::Pawn => Some('P'),
        _ => None,
    }
}
