mod common;
#[cfg(feature = "dataframe")]
use amplitude::{Amplitude, MarketDetails};

#[cfg(feature = "dataframe")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let amp = Amplitude::builder().with_source(common::get_source()).build()?;
    let market = MarketDetails::new("^BVSP", "Bovespa", Some("IBOV.csv"));
    let report = amp.analyze(&market)?;

    let df = report.adv_dec.to_dataframe()?;
    println!("DataFrame shape: {} rows x {} cols", df.height(), df.width());
    println!("{}", df.tail(Some(5)));
    Ok(())
}

#[cfg(not(feature = "dataframe"))]
fn main() {
    eprintln!("This example requires the 'dataframe' feature. Skipping.");
}
