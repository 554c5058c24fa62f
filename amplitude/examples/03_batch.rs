mod common;
use amplitude::{Amplitude, CacheConfig, default_markets};
use common::get_source;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Several markets share an index, so a small cache saves reparsing.
    let amp = Amplitude::builder()
        .with_source(get_source())
        .cache(CacheConfig::default())
        .build()?;

    let markets: Vec<_> = default_markets().into_values().collect();
    let batch = amp.analyze_many(&markets)?;

    for report in &batch.reports {
        println!("ok      {}", report.market.market);
    }
    for (market, err) in &batch.skipped {
        println!("skipped {market}: {err}");
    }
    for (market, err) in &batch.failed {
        println!("failed  {market}: {err}");
    }
    Ok(())
}
