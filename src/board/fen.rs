//! FEN parsing and printing.
//!
//! The halfmove and fullmove fields are optional on input and default to 0
//! and 1, so positions pasted from diagrams load without padding. Parsing is
//! all-or-nothing: a malformed FEN leaves the board untouched.

use crate::board::{Board, Color, Piece, PieceKind, Position, square_attacked};
use crate::error::EngineError;
use crate::hash::zobrist::zobrist_keys;
use crate::square::Square;

impl Board {
    /// Parses `fen` into the root slot of the ring. With `preserve_counters`
    /// the move counters and the key history of the current game survive;
    /// otherwise both are reset from the FEN fields.
    pub fn set_from_fen(&mut self, fen: &str, preserve_counters: bool) -> Result<(), EngineError> {
        let keys = zobrist_keys();
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| EngineError::ParseError("empty FEN".into()))?;

        let mut pos = Position::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(EngineError::ParseError(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_char(c).ok_or_else(|| {
                        EngineError::ParseError(format!("bad piece glyph '{c}'"))
                    })?;
                    if file > 7 {
                        return Err(EngineError::ParseError(format!(
                            "rank {} overflows",
                            rank + 1
                        )));
                    }
                    pos.put_piece(piece, Square::from_file_rank(file, rank), keys);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(EngineError::ParseError(format!(
                    "rank {} has {} files",
                    rank + 1,
                    file
                )));
            }
        }

        pos.side_to_move = match fields.next() {
            Some("w") | None => Color::White,
            Some("b") => Color::Black,
            Some(other) => {
                return Err(EngineError::ParseError(format!("bad side '{other}'")));
            }
        };

        pos.castling = match fields.next() {
            Some("-") | None => 0,
            Some(rights_text) => {
                let mut rights = 0u8;
                for c in rights_text.chars() {
                    rights |= match c {
                        'K' => super::castling::WHITE_KINGSIDE,
                        'Q' => super::castling::WHITE_QUEENSIDE,
                        'k' => super::castling::BLACK_KINGSIDE,
                        'q' => super::castling::BLACK_QUEENSIDE,
                        _ => {
                            return Err(EngineError::ParseError(format!(
                                "bad castling flag '{c}'"
                            )));
                        }
                    };
                }
                rights
            }
        };

        pos.en_passant = match fields.next() {
            Some("-") | None => Square::NONE,
            Some(text) => {
                let sq: Square = text
                    .parse()
                    .map_err(|_| EngineError::ParseError(format!("bad EP square '{text}'")))?;
                if sq.rank() != 2 && sq.rank() != 5 {
                    return Err(EngineError::ParseError(format!(
                        "EP square '{text}' not on rank 3 or 6"
                    )));
                }
                sq
            }
        };

        // Halfmove and fullmove counters are optional extensions.
        pos.halfmove_clock = match fields.next() {
            Some(text) => text
                .parse::<u16>()
                .map_err(|_| EngineError::ParseError(format!("bad halfmove count '{text}'")))?,
            None => 0,
        };
        pos.fullmove_number = match fields.next() {
            Some(text) => text
                .parse::<u16>()
                .map_err(|_| EngineError::ParseError(format!("bad fullmove count '{text}'")))?
                .max(1),
            None => 1,
        };

        if pos.bb(Color::White, PieceKind::King).count_ones() != 1
            || pos.bb(Color::Black, PieceKind::King).count_ones() != 1
        {
            return Err(EngineError::ParseError(
                "each side needs exactly one king".into(),
            ));
        }

        pos.key ^= keys.side[pos.side_to_move as usize]
            ^ keys.castling[pos.castling as usize]
            ^ keys.en_passant[pos.en_passant.idx()];

        let stm = pos.side_to_move;
        pos.in_check = square_attacked(&pos, pos.king_square(stm), stm.opposite(), pos.occ_all);

        #[cfg(debug_assertions)]
        {
            let (key, piece_key) = pos.compute_key_full();
            debug_assert_eq!(pos.key, key);
            debug_assert_eq!(pos.piece_key, piece_key);
        }

        // Everything parsed; commit.
        if preserve_counters {
            pos.halfmove_clock = self.pos().halfmove_clock;
            pos.fullmove_number = self.pos().fullmove_number;
        } else {
            self.key_history.clear();
        }
        self.ply = 0;
        self.slots[0] = pos;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let pos = self.pos();
        let mut fen = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = pos.piece_at(Square::from_file_rank(file, rank));
                if piece.is_none() {
                    empty += 1;
                } else {
                    if empty > 0 {
                        fen.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    fen.push(piece.to_char());
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if pos.side_to_move.is_white() { 'w' } else { 'b' });
        fen.push(' ');
        if pos.castling == 0 {
            fen.push('-');
        } else {
            for (flag, c) in [
                (super::castling::WHITE_KINGSIDE, 'K'),
                (super::castling::WHITE_QUEENSIDE, 'Q'),
                (super::castling::BLACK_KINGSIDE, 'k'),
                (super::castling::BLACK_QUEENSIDE, 'q'),
            ] {
                if pos.castling & flag != 0 {
                    fen.push(c);
                }
            }
        }
        fen.push(' ');
        fen.push_str(&pos.en_passant.to_string());
        fen.push_str(&format!(" {} {}", pos.halfmove_clock, pos.fullmove_number));
        fen
    }

    /// ASCII diagram for the `d` debug command.
    pub fn pretty(&self) -> String {
        let pos = self.pos();
        let mut out = String::new();
        for rank in (0..8u8).rev() {
            out.push_str(&format!("{} ", rank + 1));
            for file in 0..8u8 {
                out.push(pos.piece_at(Square::from_file_rank(file, rank)).to_char());
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out.push_str(&format!("fen: {}\n", self.to_fen()));
        out.push_str(&format!("key: {:#018x}\n", pos.key));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trips() {
        let board = Board::new();
        assert_eq!(board.to_fen(), Board::STARTPOS);
    }

    #[test]
    fn optional_counters_default() {
        let board = Board::from_fen("8/8/8/8/3k4/8/3K4/8 w - -").unwrap();
        assert_eq!(board.pos().halfmove_clock, 0);
        assert_eq!(board.pos().fullmove_number, 1);
    }

    #[test]
    fn rejects_malformed_fens() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err()); // no kings
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - e4 0 1").is_err());
    }

    #[test]
    fn failed_parse_leaves_the_board_alone() {
        let mut board = Board::new();
        let fen_before = board.to_fen();
        assert!(board.set_from_fen("9/8/8/8/8/8/8/8 w - - 0 1", false).is_err());
        assert_eq!(board.to_fen(), fen_before);
    }

    #[test]
    fn check_flag_is_detected() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        assert!(board.pos().in_check);
        let board = Board::from_fen("4k3/8/8/8/8/8/3R4/4K3 b - - 0 1").unwrap();
        assert!(!board.pos().in_check);
    }

    #[test]
    fn en_passant_square_is_hashed() {
        let with_ep =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2")
                .unwrap();
        let without_ep =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2")
                .unwrap();
        assert_ne!(with_ep.pos().key, without_ep.pos().key);
        assert_eq!(with_ep.pos().en_passant, "e3".parse::<Square>().unwrap());
    }

    #[test]
    fn preserve_counters_keeps_game_clocks() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 42 30").unwrap();
        board
            .set_from_fen("4k3/8/8/8/8/8/8/3K4 b - -", true)
            .unwrap();
        assert_eq!(board.pos().halfmove_clock, 42);
        assert_eq!(board.pos().fullmove_number, 30);
    }
}
