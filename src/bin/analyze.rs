use abchess::board::{fen, Color, Position};
use abchess::search::{QuiescenceMode, SearchParams, Searcher};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "analyze", version, about = "Search a position and print the chosen move")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// JSON file with search parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Threads for the root split
    #[arg(long)]
    threads: Option<usize>,

    /// Depth-0 handling: 'off' or 'captures'
    #[arg(long)]
    quiescence: Option<String>,

    /// Movetime in milliseconds (switches to iterative deepening)
    #[arg(long)]
    movetime: Option<u64>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct Report {
    fen: String,
    side: Color,
    best_move: Option<String>,
    score_cp: i32,
    depth: u32,
    nodes: u64,
    elapsed_ms: u128,
}

fn load_params(args: &Args) -> anyhow::Result<SearchParams> {
    let mut p = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SearchParams::default(),
    };
    if let Some(d) = args.depth { p.depth = d; }
    if let Some(t) = args.threads { p.threads = t; }
    if let Some(ms) = args.movetime { p.movetime_ms = Some(ms); }
    if let Some(q) = &args.quiescence {
        p.quiescence = match q.to_ascii_lowercase().as_str() {
            "off" => QuiescenceMode::Off,
            "captures" => QuiescenceMode::Captures,
            other => anyhow::bail!("Invalid quiescence mode '{other}': use 'off' or 'captures'"),
        };
    }
    Ok(p)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let params = load_params(&args)?;
    let (pos, side) = if args.fen == "startpos" {
        (Position::startpos(), Color::White)
    } else {
        fen::parse(&args.fen).with_context(|| format!("invalid FEN '{}'", args.fen))?
    };

    let mut searcher = Searcher::default();
    let t0 = Instant::now();
    let res = searcher.search_with_params(&pos, side, params);
    let report = Report {
        fen: pos.to_fen(side),
        side,
        best_move: res.best_move.map(|m| m.to_string()),
        score_cp: res.score,
        depth: res.depth,
        nodes: res.nodes,
        elapsed_ms: t0.elapsed().as_millis(),
    };

    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{pos}\n");
        println!("result: {}", pos.result());
        println!(
            "bestmove {} score {} depth {} nodes {} time {}ms",
            report.best_move.as_deref().unwrap_or("0000"),
            report.score_cp,
            report.depth,
            report.nodes,
            report.elapsed_ms
        );
    }
    Ok(())
}
