use std::path::PathBuf;

use clap::Parser;
use segscore::EvaluatorBuilder;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "segscore")]
#[command(version, about = "Scores OCR layout segmentation (ALTO) against PAGE ground truth")]
struct Cli {
    /// Segmentation output (ALTO XML)
    candidate: PathBuf,

    /// Ground truth (PAGE XML)
    reference: PathBuf,

    /// IoU bound separating good matches from bad ones in reports and renders
    #[arg(long, default_value_t = 0.5)]
    iou_threshold: f64,

    /// Write an overlay image of both region sets and their intersections
    #[arg(long)]
    render: Option<PathBuf>,
}

fn main() -> Result<(), segscore::Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let evaluator = EvaluatorBuilder::new()
        .iou_threshold(cli.iou_threshold)
        .build();
    let evaluation = evaluator.evaluate(&cli.candidate, &cli.reference)?;

    println!("candidate blocks:        {}", evaluation.candidate_blocks.len());
    println!("reference lines:         {}", evaluation.reference_lines.len());
    println!("reference blocks:        {}", evaluation.reference_blocks.len());
    println!("block/line matches:      {}", evaluation.line_matches.len());
    println!("block/block matches:     {}", evaluation.block_matches.len());
    println!("dice:                    {:.4}", evaluation.score.dice);
    println!(
        "ground truth recovered:  {:.1}%",
        evaluation.score.intersection_pct()
    );

    if let Some(path) = cli.render {
        segscore::render::render_overlay(&evaluation, &path)?;
        println!("overlay written to {}", path.display());
    }

    Ok(())
}
