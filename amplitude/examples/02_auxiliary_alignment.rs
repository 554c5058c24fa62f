mod common;
use amplitude::{Amplitude, default_markets, find_market};
use common::get_source;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let amp = Amplitude::builder().with_source(get_source()).build()?;
    let market = find_market(&default_markets(), "Bovespa").ok_or("unknown market")?;
    let data = amp.load_market(&market)?;

    // Project the dollar onto the market's trading days.
    let timeline = data.dates();
    let dollar = amp.align_auxiliary("BRL=X", &timeline)?;

    let rows: Vec<_> = data.index.iter().zip(dollar.values()).collect();
    for ((date, bar), usd) in rows.into_iter().rev().take(5) {
        let in_usd = usd.map(|fx| bar.price() / fx);
        println!("{date}  {:>10.2}  {usd:?}  {in_usd:?}", bar.price());
    }
    Ok(())
}
