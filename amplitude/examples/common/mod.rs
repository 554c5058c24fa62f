use std::sync::Arc;

use amplitude::{CsvStore, DataLayout, MarketSource};

/// CSV files under `$AMPLITUDE_DATA` when set, the in-memory fixtures otherwise.
#[must_use]
pub fn get_source() -> Arc<dyn MarketSource> {
    match std::env::var("AMPLITUDE_DATA") {
        Ok(root) => {
            let root = std::path::PathBuf::from(root);
            Arc::new(CsvStore::new(DataLayout::new(root.join("data"), root.join("codes"))))
        }
        Err(_) => {
            println!("--- (Using mock source; set AMPLITUDE_DATA for real files) ---");
            Arc::new(amplitude_mock::MockSource::new())
        }
    }
}
