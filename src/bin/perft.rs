use abchess::board::{fen, Color, Position};
use abchess::perft::perft;
use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

#[derive(clap::Parser, Debug)]
#[command(name = "perft", about = "Perft driver for abchess move generation")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Print node counts per root move
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let (base, side) = if args.fen == "startpos" {
        (Position::startpos(), Color::White)
    } else {
        fen::parse(&args.fen).with_context(|| format!("invalid FEN '{}'", args.fen))?
    };
    if args.depth == 0 {
        println!("nodes: 1");
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let root_moves = base.legal_moves(side);
    let bar = ProgressBar::new(root_moves.len() as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} root moves [{elapsed_precise}]")?);

    let t0 = Instant::now();
    let counts: Vec<(String, u64)> = pool.install(|| {
        root_moves
            .par_iter()
            .map(|&mv| -> anyhow::Result<(String, u64)> {
                let mut child = base.search_copy();
                child.make_move(mv)?;
                let n = perft(&child, !side, args.depth - 1);
                bar.inc(1);
                Ok((mv.to_string(), n))
            })
            .collect::<anyhow::Result<_>>()
    })?;
    bar.finish_and_clear();
    let dt = t0.elapsed().as_secs_f64();

    if args.divide {
        for (mv, n) in &counts {
            println!("{mv}: {n}");
        }
    }
    let nodes: u64 = counts.iter().map(|(_, n)| n).sum();
    if args.nps { println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON)); }
    else { println!("nodes: {nodes}"); }
    Ok(())
}
