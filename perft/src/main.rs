//! The `perft` binary: a correctness oracle and throughput benchmark for `chess`'s legal-ply
//! generator.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! Run with a FEN and a depth to count leaf nodes:
//!
//! ```sh
//! perft --depth 5 'rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1'
//! ```
//!
//! Or point it at an EPD suite of known node counts to run it as a correctness oracle:
//!
//! ```sh
//! perft --file suite.epd
//! ```
//!
//! With neither `--depth` nor `--file`, it runs depths 0 through 6 on the standard starting
//! position.
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]

use std::fs;
use std::time::Instant;
use clap::{App, Arg, crate_version};
use log::{debug, info};
use simplelog::{Config, LevelFilter, SimpleLogger};
use chess::epd;
use chess::perft;
use chess::position::Position;

const DEFAULT_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn main() {
    let _ = SimpleLogger::init(LevelFilter::Info, Config::default());

    let matches = App::new("perft")
        .version(crate_version!())
        .author("Mike Leany")
        .about("Counts and verifies the number of legal move-tree leaves below a position.")
        .arg(Arg::with_name("fen")
            .value_name("FEN_STRING")
            .default_value(DEFAULT_FEN)
            .hide_default_value(true)
            .help("Position to search, in Forsyth-Edwards Notation (FEN)"))
        .arg(Arg::with_name("depth")
            .long("depth")
            .short("d")
            .value_name("DEPTH")
            .takes_value(true)
            .conflicts_with("file")
            .help("Depth to search; with no --file, runs depths 0..=6 if omitted"))
        .arg(Arg::with_name("file")
            .long("file")
            .short("f")
            .value_name("EPD_FILE")
            .takes_value(true)
            .conflicts_with("fen")
            .help("An EPD file of positions and expected perft node counts"))
        .get_matches();

    if let Some(path) = matches.value_of("file") {
        run_suite(path);
        return;
    }

    let fen = matches.value_of("fen").expect("INFALLIBLE");
    let pos: Position = match fen.parse() {
        Ok(pos) => pos,
        Err(error) => {
            eprintln!("{}: {}", fen, error);
            std::process::exit(1);
        }
    };

    let depths: Vec<u32> = match matches.value_of("depth") {
        Some(depth) => match depth.parse() {
            Ok(depth) => vec![depth],
            Err(_) => {
                eprintln!("{}: depth must be a non-negative integer", depth);
                std::process::exit(1);
            }
        },
        None => (0..=6).collect(),
    };

    info!("running perft on {}", fen);
    println!("{}", fen);
    let start = Instant::now();
    let mut total_nodes = 0u64;
    for depth in depths {
        let nodes = perft::count(&pos, depth);
        total_nodes += nodes;
        println!("perft({}) = {}", depth, nodes);
    }
    report_throughput(total_nodes, start.elapsed());
}

fn run_suite(path: &str) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("{}: {}", path, error);
            std::process::exit(1);
        }
    };

    let suite = match epd::parse_suite(&text) {
        Ok(suite) => suite,
        Err(error) => {
            eprintln!("{}: malformed EPD suite: {}", path, error);
            std::process::exit(1);
        }
    };

    info!("running EPD suite {} ({} lines)", path, suite.len());

    let mut all_passed = true;
    let mut total_nodes = 0u64;
    let start = Instant::now();

    for (line_num, line) in suite.iter().enumerate() {
        debug!("line {}: {}", line_num + 1, line.fen);
        let results = perft::check_suite(&line.position, &line.assertions);
        total_nodes += results.iter().map(|r| r.actual).sum::<u64>();

        let line_passed = results.iter().all(|r| r.passed());
        if line_passed {
            println!("OK\t{}", line.fen);
        } else {
            all_passed = false;
            println!("FAIL\t{}", line.fen);
            for result in &results {
                let status = if result.passed() { "OK" } else { "FAIL" };
                println!("\t{}\tD{}\texpected {}\tactual {}", status, result.depth, result.expected, result.actual);
            }
        }
    }

    report_throughput(total_nodes, start.elapsed());

    if !all_passed {
        std::process::exit(1);
    }
}

fn report_throughput(nodes: u64, elapsed: std::time::Duration) {
    let secs = elapsed.as_secs_f64();
    let nps = if secs > 0.0 { nodes as f64 / secs } else { 0.0 };
    println!("{} nodes in {:.3}s ({:.0} nodes/sec)", nodes, secs, nps);
}
