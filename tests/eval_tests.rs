use tempo::board::Board;
use tempo::eval::{Eval, phase};

/// Color-flips a FEN: mirrors ranks, swaps piece case, side to move,
/// castling case, and the en-passant rank.
fn mirror_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let swapped_case = |text: &str| -> String {
        text.chars()
            .map(|c| {
                if c.is_ascii_uppercase() {
                    c.to_ascii_lowercase()
                } else if c.is_ascii_lowercase() {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    };

    let placement: Vec<String> = fields[0].split('/').rev().map(|r| swapped_case(r)).collect();
    let side = if fields[1] == "w" { "b" } else { "w" };
    let castling = if fields[2] == "-" {
        "-".to_string()
    } else {
        // Re-order so white rights still come first.
        let swapped = swapped_case(fields[2]);
        let mut out = String::new();
        for c in ['K', 'Q', 'k', 'q'] {
            if swapped.contains(c) {
                out.push(c);
            }
        }
        out
    };
    let ep = if fields[3] == "-" {
        "-".to_string()
    } else {
        let file = &fields[3][..1];
        let rank: u32 = fields[3][1..].parse().unwrap();
        format!("{file}{}", 9 - rank)
    };
    format!(
        "{} {side} {castling} {ep} {} {}",
        placement.join("/"),
        fields.get(4).unwrap_or(&"0"),
        fields.get(5).unwrap_or(&"1")
    )
}

fn assert_eval_symmetry(fen: &str) {
    let board = Board::from_fen(fen).unwrap();
    let mirrored = Board::from_fen(&mirror_fen(fen)).unwrap();
    let mut eval = Eval::new();
    let (score, drawn) = eval.evaluate(board.pos());
    let (mirror_score, mirror_drawn) = eval.evaluate(mirrored.pos());
    assert_eq!(
        score, -mirror_score,
        "eval asymmetry for {fen}: {score} vs {mirror_score}"
    );
    assert_eq!(drawn, mirror_drawn);
}

#[test]
fn evaluation_is_color_symmetric() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2",
        "6k1/5ppp/8/8/2B5/8/5PPP/6K1 w - - 0 1",
    ] {
        assert_eval_symmetry(fen);
    }
}

#[test]
fn mirror_fen_round_trips() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    assert_eq!(mirror_fen(&mirror_fen(fen)), fen);
}

#[test]
fn extra_material_wins_the_eval() {
    let mut eval = Eval::new();
    let up_a_knight =
        Board::from_fen("rnbqkb1r/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let (score, _) = eval.evaluate(up_a_knight.pos());
    assert!(score > 150, "a clean extra knight scores {score}");
}

#[test]
fn bishop_pair_is_worth_something() {
    let mut eval = Eval::new();
    let pair = Board::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").unwrap();
    let split = Board::from_fen("4k3/8/8/8/8/8/8/2B1KN2 w - - 0 1").unwrap();
    let (pair_score, _) = eval.evaluate(pair.pos());
    let (split_score, _) = eval.evaluate(split.pos());
    assert!(pair_score > split_score);
}

#[test]
fn mobility_prefers_open_pieces() {
    let mut eval = Eval::new();
    // Same material; the white bishop is either free in the center or shut
    // in behind its own pawns.
    let open = Board::from_fen("4k3/8/8/8/4B3/8/4P1P1/4K3 w - - 0 1").unwrap();
    let buried = Board::from_fen("4k3/8/8/8/8/8/4P1P1/4KB2 w - - 0 1").unwrap();
    let (open_score, _) = eval.evaluate(open.pos());
    let (buried_score, _) = eval.evaluate(buried.pos());
    assert!(open_score > buried_score);
}

#[test]
fn king_danger_counts_swarming_attackers() {
    let mut eval = Eval::new();
    // Identical material; the black queen and rook either swarm the white
    // king's rings or sit blocked on the queenside.
    let near = Board::from_fen("6k1/2p5/8/8/7r/6q1/5PPP/6K1 w - - 0 1").unwrap();
    let far = Board::from_fen("1q4k1/2p5/8/8/1r6/8/5PPP/6K1 w - - 0 1").unwrap();
    let (near_score, _) = eval.evaluate(near.pos());
    let (far_score, _) = eval.evaluate(far.pos());
    assert!(far_score > near_score);
}

#[test]
fn phase_tracks_remaining_material() {
    let board = Board::new();
    assert_eq!(phase(board.pos()), 256);
    let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
    assert_eq!(phase(board.pos()), 22);
    let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert_eq!(phase(board.pos()), 0);
}

#[test]
fn drawn_positions_report_the_flag() {
    let mut eval = Eval::new();
    let board = Board::from_fen("8/8/8/8/3k4/8/3K4/8 w - - 0 1").unwrap();
    let (score, drawn) = eval.evaluate(board.pos());
    assert_eq!(score, 0);
    assert!(drawn);
    let board = Board::from_fen("8/8/8/8/3k4/8/3KN3/8 b - - 0 1").unwrap();
    let (score, drawn) = eval.evaluate(board.pos());
    assert_eq!(score, 0);
    assert!(drawn);
}
