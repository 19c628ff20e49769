//! Integration tests: decode KIF transcripts and replay them into statistics records.

mod common;

use common::{BROKEN_GAME, DROP_GAME, RESIGN_GAME, TIMEOUT_GAME};
use kifu_core::{
    decode, flip_move, flip_sfenx, process_kif, replay, DecodeErrorKind, KifuError, Move,
    PieceKind, Position, Side, INITIAL_SFENX,
};

fn notations(moves: &[Move]) -> Vec<String> {
    moves.iter().map(|m| m.to_string()).collect()
}

/// Positions after each move, starting with the initial one.
fn snapshots(moves: &[Move]) -> Vec<Position> {
    let mut out = vec![Position::new()];
    for mv in moves {
        let next = out.last().unwrap().clone().apply(mv).unwrap();
        out.push(next);
    }
    out
}

#[test]
fn test_initial_encoding_anchor() {
    assert_eq!(
        Position::new().to_sfenx(),
        "lnsgkgsnl1b5r1ppppppppp999PPPPPPPPP1R5B1LNSGKGSNL aaaaaaaa"
    );
    assert_eq!(INITIAL_SFENX, Position::new().to_sfenx());
}

#[test]
fn test_resign_game_records() {
    let game = process_kif(RESIGN_GAME).unwrap();
    assert_eq!(
        notations(&game.moves),
        vec!["2g2f", "3c3d", "2f2e", "2b3c", "7g7f", "3a4b", "8h3c+", "4b3c", "7i8h", "resign"]
    );
    assert_eq!(game.metadata.result.as_deref(), Some("まで9手で先手の勝ち"));

    let replay = &game.replay;
    assert_eq!(replay.winner, Some(Side::Sente));
    assert_eq!(replay.records.len(), 9);
    for (ply, record) in replay.records.iter().enumerate() {
        let sente_moved = ply % 2 == 0;
        assert_eq!(record.won, sente_moved, "ply {ply}");
        assert_eq!(record.lost, !sente_moved, "ply {ply}");
    }

    // Sente records are rotated, Gote records are stored as played.
    assert_eq!(replay.records[0].mv, "8c8d");
    assert_eq!(replay.records[1].mv, "3c3d");
    assert_eq!(replay.records[6].mv, "2b7g+");
    assert_eq!(replay.records[7].mv, "4b3c");

    // Bishops were traded: each side holds one.
    let fin = &replay.final_position;
    assert_eq!(fin.hand(Side::Sente).count(PieceKind::Bishop), 1);
    assert_eq!(fin.hand(Side::Gote).count(PieceKind::Bishop), 1);
}

#[test]
fn test_records_match_replayed_positions() {
    let (_, moves) = decode(RESIGN_GAME).unwrap();
    let positions = snapshots(&moves);
    let game = replay(&moves).unwrap();

    for (ply, record) in game.records.iter().enumerate() {
        let before = positions[ply].to_sfenx();
        let expected = if ply % 2 == 0 { flip_sfenx(&before).unwrap() } else { before };
        assert_eq!(record.sfenx, expected, "ply {ply}");
    }
}

#[test]
fn test_drop_game() {
    let game = process_kif(DROP_GAME).unwrap();
    assert_eq!(
        notations(&game.moves),
        vec!["2g2f", "8c8d", "2f2e", "8d8e", "2e2d", "2c2d", "2h2d", "P*2c", "resign"]
    );
    assert!(matches!(
        game.moves[7],
        Move::Drop {
            kind: PieceKind::Pawn,
            ..
        }
    ));

    // Sente resigned on ply 9.
    assert_eq!(game.replay.winner, Some(Side::Gote));
    assert_eq!(game.replay.records.len(), 8);
    assert!(game.replay.records[7].won);
    assert!(game.replay.records[6].lost);

    // The dropped pawn left Gote's hand; Sente still holds the one it took.
    let fin = &game.replay.final_position;
    assert!(fin.hand(Side::Gote).is_empty());
    assert_eq!(fin.hand(Side::Sente).count(PieceKind::Pawn), 1);
}

#[test]
fn test_supply_is_conserved_every_ply() {
    for text in [RESIGN_GAME, DROP_GAME, TIMEOUT_GAME] {
        let (_, moves) = decode(text).unwrap();
        for pos in snapshots(&moves) {
            let supply = pos.supply();
            for (slot, kind) in PieceKind::HAND_KINDS.iter().enumerate() {
                assert_eq!(supply[slot], kind.supply(), "{kind:?}");
            }
        }
    }
}

#[test]
fn test_positions_differ_after_each_move() {
    let (_, moves) = decode(DROP_GAME).unwrap();
    let encoded: Vec<String> = snapshots(&moves[..8]).iter().map(Position::to_sfenx).collect();
    for i in 0..encoded.len() {
        for j in (i + 1)..encoded.len() {
            assert_ne!(encoded[i], encoded[j], "plies {i} and {j}");
        }
    }
}

#[test]
fn test_flip_is_an_involution_on_replayed_data() {
    for text in [RESIGN_GAME, DROP_GAME] {
        let game = process_kif(text).unwrap();
        for record in &game.replay.records {
            assert_eq!(flip_sfenx(&flip_sfenx(&record.sfenx).unwrap()).unwrap(), record.sfenx);
            assert_eq!(flip_move(&flip_move(&record.mv).unwrap()).unwrap(), record.mv);
        }
    }
}

#[test]
fn test_flipped_position_is_rotated_board() {
    let (_, moves) = decode(DROP_GAME).unwrap();
    let pos = snapshots(&moves).pop().unwrap();
    let flipped = Position::from_sfenx(&flip_sfenx(&pos.to_sfenx()).unwrap(), Side::Sente).unwrap();

    for (index, piece) in pos.grid().iter().enumerate() {
        let rotated = flipped.grid()[80 - index];
        assert_eq!(piece.map(|p| p.kind), rotated.map(|p| p.kind));
        assert_eq!(piece.map(|p| p.owner.opponent()), rotated.map(|p| p.owner));
    }
    assert_eq!(flipped.hand(Side::Gote), pos.hand(Side::Sente));
    assert_eq!(flipped.hand(Side::Sente), pos.hand(Side::Gote));
}

#[test]
fn test_timeout_game_is_unlabelled() {
    let game = process_kif(TIMEOUT_GAME).unwrap();
    assert_eq!(notations(&game.moves), vec!["7g7f", "3c3d", "timeout"]);
    assert_eq!(game.replay.winner, None);
    assert_eq!(game.replay.records.len(), 2);
    assert!(game.replay.records.iter().all(|r| !r.won && !r.lost));
}

#[test]
fn test_broken_game_reports_line() {
    let err = process_kif(BROKEN_GAME).unwrap_err();
    match err {
        KifuError::Decode(e) => {
            assert_eq!(e.line, 5);
            assert_eq!(e.text, "2 ３四歩");
            assert!(matches!(e.kind, DecodeErrorKind::MissingSource(_)));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_replay_failure_yields_no_records() {
    // Legal-looking notation, but 5e is empty at the start.
    let text = "手数----指手---------\n1 ５四歩(55)\n";
    let err = process_kif(text).unwrap_err();
    assert!(matches!(err, KifuError::Replay(_)));
}

#[test]
fn test_records_serialize_for_storage() {
    let game = process_kif(DROP_GAME).unwrap();
    let json = serde_json::to_value(&game.replay.records).unwrap();
    let first = &json[0];
    assert_eq!(first["sfenx"], INITIAL_SFENX);
    assert_eq!(first["move"], "8c8d");
    assert_eq!(first["win"], false);
    assert_eq!(first["lose"], true);
}
