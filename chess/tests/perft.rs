//! Checks perft node counts against the standard reference positions and depths.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////

mod perft {
    use chess::perft::count;
    use chess::position::Position;

    fn nodes(fen: &str, depth: u32) -> u64 {
        let pos: Position = fen.parse().unwrap();
        count(&pos, depth)
    }

    #[test]
    fn starting_position_depth_1() {
        assert_eq!(
            nodes("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 1),
            20
        );
    }

    #[test]
    fn starting_position_depth_4() {
        assert_eq!(
            nodes("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4),
            197281
        );
    }

    #[test]
    #[ignore]
    fn starting_position_depth_6() {
        assert_eq!(
            nodes("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 6),
            119060324
        );
    }

    #[test]
    #[ignore]
    fn kiwipete_depth_5() {
        assert_eq!(
            nodes("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 5),
            193690690
        );
    }

    #[test]
    #[ignore]
    fn endgame_rook_and_pawns_depth_6() {
        assert_eq!(
            nodes("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 6),
            11030083
        );
    }

    #[test]
    #[ignore]
    fn talkchess_position_6_depth_5() {
        assert_eq!(
            nodes("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 5),
            15833292
        );
    }
}
