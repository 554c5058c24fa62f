use anyhow::Result;
use amplitude::default_markets;
use clap::Args;

/// Arguments for the markets command
#[derive(Args)]
pub struct MarketsArgs {
    /// Print the registry as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: &MarketsArgs) -> Result<()> {
    let markets = default_markets();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&markets)?);
        return Ok(());
    }
    println!("{:>3}  {:<10} {:<14} components", "#", "index", "market");
    for (key, m) in &markets {
        println!(
            "{key:>3}  {:<10} {:<14} {}",
            m.idx_code,
            m.market,
            m.codes_csv.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
