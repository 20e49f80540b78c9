use buildmart::error::AppError;
use buildmart::marketplace::{rank_catalog, read_catalog_path};
use buildmart::playstyle::{self, PlaystyleVector, DIMENSIONS};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Buyer playstyle, eight ratings 1-10 (e.g. 7,3,5,8,6,4,9,2)
    #[arg(long)]
    pub(crate) buyer: String,
    /// Build DNA, eight ratings 1-10
    #[arg(long)]
    pub(crate) build: String,
    /// Build shooting percentage (0-100)
    #[arg(long)]
    pub(crate) shooting: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogRankArgs {
    /// Catalog CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Buyer playstyle, eight ratings 1-10
    #[arg(long)]
    pub(crate) buyer: String,
    /// Only print the top N rows
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let buyer: PlaystyleVector = args.buyer.parse()?;
    let build: PlaystyleVector = args.build.parse()?;

    let result = playstyle::score(
        Some(buyer.to_scores().as_slice()),
        Some(build.to_scores().as_slice()),
        args.shooting,
    );

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Compatibility result unavailable: {err}"),
    }
    Ok(())
}

pub(crate) fn run_dimensions() -> Result<(), AppError> {
    println!("Playstyle onboarding (rate each 1-10)");
    for (index, dimension) in DIMENSIONS.iter().enumerate() {
        println!("{}. {}", index + 1, dimension.question);
        println!(
            "   1 = {} ... 10 = {}",
            dimension.low_label, dimension.high_label
        );
    }
    Ok(())
}

pub(crate) fn run_catalog_rank(args: CatalogRankArgs) -> Result<(), AppError> {
    let buyer: PlaystyleVector = args.buyer.parse()?;
    let entries = read_catalog_path(&args.csv)?;
    let ranked = rank_catalog(&entries, &buyer);
    let shown = args.top.unwrap_or(ranked.len());

    println!(
        "Ranked {} catalog rows from {}",
        ranked.len(),
        args.csv.display()
    );
    for entry in ranked.iter().take(shown) {
        let result = &entry.compatibility;
        println!(
            "- row {}: {} (${}.{:02}) -> {} {} | win boost {:+}",
            entry.row,
            entry.title,
            entry.price_cents / 100,
            entry.price_cents % 100,
            result.score,
            result.label,
            result.predicted_win_boost
        );
        for strength in &result.strengths {
            println!("    + {strength}");
        }
        for weakness in &result.weaknesses {
            println!("    - {weakness}");
        }
    }
    Ok(())
}
