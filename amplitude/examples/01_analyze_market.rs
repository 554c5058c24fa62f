mod common;
use amplitude::{Amplitude, default_markets, find_market};
use common::get_source;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build the orchestrator over the example source.
    let amp = Amplitude::builder().with_source(get_source()).build()?;

    // 2. Pick a market from the built-in registry.
    let market = find_market(&default_markets(), "Bovespa").ok_or("unknown market")?;

    // 3. Load, align and compute every indicator table.
    let report = amp.analyze(&market)?;

    // 4. Print the last row of each table.
    for (name, table) in report.tables() {
        let Some(last) = table.dates().last() else {
            continue;
        };
        println!("{name}: {} rows, {} columns, last {last}", table.len(), table.columns().len());
        for col in table.columns().iter().take(4) {
            let value = col.values.last().copied().flatten();
            println!("  {:<16} {value:?}", col.name);
        }
    }
    Ok(())
}
