use crate::bitboard::Bitboard;
use crate::config::EncoderConfig;
use crate::error::BoardError;
use crate::myarray::*;
use crate::rotate::Rotator;
use crate::shogi::*;
use crate::snapshot::Snapshot;

pub(crate) type BbOccSide = MyArray1<Bitboard, Side, 2>;
pub(crate) type BbPk = MyArray1<Bitboard, PieceKind, { PieceKind::NUM }>;

/// 局面。
///
/// 駒種ごとの bitboard、陣営ごとの occupied bitboard、両陣営の手駒、手番を持つ。
/// 指し手の履歴は持たない。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    bb_occ: Bitboard,       // 陣営を区別しない occupied bitboard
    bb_occ_side: BbOccSide, // 陣営を区別する occupied bitboard
    bb_pk: BbPk,            // 駒種ごとの bitboard (陣営の区別なし)

    board: Board,
    hands: Hands,
    side_to_move: Side,
    ply: u32, // 常に 1 から始まるものとする。
}

impl Position {
    /// 平手初期局面を返す。先手番、手駒なし。
    pub fn startpos() -> Self {
        Self::from_parts_unchecked(Side::Black, Board::startpos(), Hands::default())
    }

    /// 手番、盤面、両陣営の手駒を指定して局面を作る。
    ///
    /// 手駒の枚数が上限を超えていればエラーを返す。それ以外の合法性チェックは行わない。
    pub fn from_parts(
        config: &EncoderConfig,
        side_to_move: Side,
        board: Board,
        hands: Hands,
    ) -> Result<Self, BoardError> {
        for side in Side::iter() {
            for (pk, limit) in config.hand_limits() {
                if hands[side][pk] > limit {
                    return Err(BoardError::HandOverflow { side, pk });
                }
            }
        }

        Ok(Self::from_parts_unchecked(side_to_move, board, hands))
    }

    fn from_parts_unchecked(side_to_move: Side, board: Board, hands: Hands) -> Self {
        let mut bb_occ = Bitboard::zero();
        let mut bb_occ_side = BbOccSide::default();
        let mut bb_pk = BbPk::default();

        for sq in Square::iter() {
            if let Some(pc) = board[sq] {
                bb_occ |= Bitboard::from(sq);
                bb_occ_side[pc.side] |= Bitboard::from(sq);
                bb_pk[pc.kind] |= Bitboard::from(sq);
            }
        }

        Self {
            bb_occ,
            bb_occ_side,
            bb_pk,

            board,
            hands,
            side_to_move,
            ply: 1,
        }
    }

    /// 手数を返す。
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// 手数を設定する。局面の内容には影響しない。
    pub fn set_ply(&mut self, ply: u32) {
        self.ply = ply;
    }

    /// 手番を返す。
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// 盤面への参照を返す。
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 両陣営の手駒への参照を返す。
    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    /// 指定した陣営の手駒への参照を返す。
    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side]
    }

    /// 陣営を区別しない occupied bitboard を返す。
    pub fn bb_occupied(&self) -> Bitboard {
        self.bb_occ
    }

    /// 指定した陣営の occupied bitboard を返す。
    pub fn bb_occupied_side(&self, side: Side) -> Bitboard {
        self.bb_occ_side[side]
    }

    /// 指定した駒種の bitboard (陣営を区別しない)を返す。
    pub fn bb_piece_kind(&self, pk: PieceKind) -> Bitboard {
        self.bb_pk[pk]
    }

    /// 指定した陣営、駒種の bitboard を返す。
    pub fn bb_piece(&self, side: Side, pk: PieceKind) -> Bitboard {
        self.bb_occupied_side(side) & self.bb_piece_kind(pk)
    }

    /// 指定したマスにある駒の陣営と駒種を返す。空白なら `None`。
    pub fn piece_on(&self, sq: Square) -> Option<(Side, PieceKind)> {
        self.board[sq].map(|pc| (pc.side, pc.kind))
    }

    /// 手番側から見た局面のスナップショットを返す。
    ///
    /// 後手番の場合は盤面を 180 度回転し、両陣営の occupied bitboard と手駒を入れ替える。
    /// つまり返り値の `Side::Black` 側は常に手番側を表す。
    pub fn snapshot(&self, rotator: &Rotator) -> Snapshot {
        let snap = Snapshot::new(self.bb_pk, self.bb_occ_side, self.hands);

        match self.side_to_move {
            Side::Black => snap,
            Side::White => snap.rotate180(rotator),
        }
    }

    /// 指し手で局面を進める。
    ///
    /// 指し手が局面と矛盾する場合、または駒を取って手駒が `config` の上限枚数を超える場合は
    /// エラーを返し、局面は変更しない。王手放置などの合法性は検査しない。
    pub fn do_move(&mut self, config: &EncoderConfig, mv: Move) -> Result<(), BoardError> {
        match mv {
            Move::Walk { src, dst, promo } => self.do_move_walk(config, src, dst, promo)?,
            Move::Drop { pk, dst } => self.do_move_drop(pk, dst)?,
        }

        self.side_to_move = self.side_to_move.inv();
        self.ply += 1;

        Ok(())
    }

    /// 盤上の駒を動かす指し手で局面を進める。
    fn do_move_walk(
        &mut self,
        config: &EncoderConfig,
        src: Square,
        dst: Square,
        promo: bool,
    ) -> Result<(), BoardError> {
        let us = self.side_to_move;

        // 検査を全て済ませてから局面を書き換える。

        let pc_src = self.board[src].ok_or(BoardError::NoPieceAtSource(src))?;
        if pc_src.side != us {
            return Err(BoardError::NotOwnPiece {
                sq: src,
                owner: pc_src.side,
            });
        }

        let pc_dst = if promo {
            let kind = pc_src.kind.to_promoted().ok_or(BoardError::NotPromotable {
                sq: src,
                pk: pc_src.kind,
            })?;
            Piece::new(us, kind)
        } else {
            pc_src
        };

        let pc_captured = self.board[dst];
        if let Some(pc) = pc_captured {
            if pc.side == us {
                return Err(BoardError::OwnPieceAtDestination(dst));
            }
            if pc.kind == PieceKind::King {
                return Err(BoardError::KingCapture(dst));
            }
            let pk_raw = pc.kind.to_raw();
            if self.hands[us][pk_raw] >= config.hand_limit(pk_raw) {
                return Err(BoardError::HandOverflow { side: us, pk: pk_raw });
            }
        }

        if let Some(pc) = pc_captured {
            // 捕獲した駒を成る前の駒種で us 側の手駒に加える。
            self.hands[us][pc.kind.to_raw()] += 1;
            self.remove_piece(dst);
        }

        self.remove_piece(src);
        self.put_piece(dst, pc_dst);

        Ok(())
    }

    /// 駒打ちの指し手で局面を進める。
    fn do_move_drop(&mut self, pk: PieceKind, dst: Square) -> Result<(), BoardError> {
        let us = self.side_to_move;

        if !pk.is_hand() {
            return Err(BoardError::NotHandKind(pk));
        }
        if self.hands[us][pk] == 0 {
            return Err(BoardError::EmptyHand { side: us, pk });
        }
        if self.board[dst].is_some() {
            return Err(BoardError::DropOnOccupied(dst));
        }

        self.hands[us][pk] -= 1;
        self.put_piece(dst, Piece::new(us, pk));

        Ok(())
    }

    /// `sq` に `pc` を置き、bitboard たちも合わせて更新する。
    /// `sq` は空白でなければならない。
    fn put_piece(&mut self, sq: Square, pc: Piece) {
        debug_assert!(self.board[sq].is_none());

        self.board[sq] = Some(pc);
        self.xor_piece(sq, pc);
    }

    /// `sq` にある駒を除去し、bitboard たちも合わせて更新する。
    /// `sq` には実際の駒がなければならない。
    fn remove_piece(&mut self, sq: Square) {
        if let Some(pc) = self.board[sq].take() {
            self.xor_piece(sq, pc);
        }
    }

    /// `put_piece()`, `remove_piece()` 内での bitboard 更新処理。
    fn xor_piece(&mut self, sq: Square, pc: Piece) {
        self.bb_occ ^= Bitboard::from(sq);
        self.bb_occ_side[pc.side] ^= Bitboard::from(sq);
        self.bb_pk[pc.kind] ^= Bitboard::from(sq);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "後手 手駒: {}", self.hands[Side::White])?;
        write!(f, "{}", self.board)?;
        writeln!(f, "先手 手駒: {}", self.hands[Side::Black])?;
        writeln!(f, "手番: {}", self.side_to_move)?;
        writeln!(f, "手数: {}", self.ply)?;

        Ok(())
    }
}
