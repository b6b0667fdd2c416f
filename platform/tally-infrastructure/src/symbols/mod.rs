use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use tally_domain::repositories::symbols::{SymbolCatalog, SymbolQuery};

#[derive(Debug, Deserialize)]
struct ListingRecord {
    symbol: String,
}

/// Reads `stocks_{market}.json` listings from the base directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSymbolCatalog;

impl JsonSymbolCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolCatalog for JsonSymbolCatalog {
    fn list_symbols(&self, query: &SymbolQuery) -> Result<Vec<String>, String> {
        let mut seen = HashSet::new();
        let mut symbols = Vec::new();

        for market in &query.markets {
            let path = query
                .base_dir
                .join(format!("stocks_{}.json", market.trim().to_lowercase()));
            let contents = fs::read_to_string(&path)
                .map_err(|err| format!("failed to read listings {}: {}", path.display(), err))?;
            let listings: Vec<ListingRecord> = serde_json::from_str(&contents)
                .map_err(|err| format!("failed to parse listings {}: {}", path.display(), err))?;

            for listing in listings {
                let symbol = listing.symbol.trim().to_string();
                if symbol.is_empty() {
                    return Err(format!("empty symbol in listings {}", path.display()));
                }
                if seen.insert(symbol.clone()) {
                    symbols.push(symbol);
                }
            }
        }

        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::JsonSymbolCatalog;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tally_domain::repositories::symbols::{SymbolCatalog, SymbolQuery};

    fn unique_tmp_dir(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("tally_{prefix}_{}_{}", std::process::id(), now))
    }

    #[test]
    fn merges_markets_in_order_without_duplicates() {
        let dir = unique_tmp_dir("symbols");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(
            dir.join("stocks_nz.json"),
            r#"[{"symbol": "AIR", "listing_date": "1990-01-01", "history": []}, {"symbol": "FPH"}]"#,
        )
        .expect("nz");
        fs::write(dir.join("stocks_us.json"), r#"[{"symbol": "AAPL"}, {"symbol": "AIR"}]"#)
            .expect("us");

        let symbols = JsonSymbolCatalog::new()
            .list_symbols(&SymbolQuery {
                base_dir: dir.clone(),
                markets: vec!["nz".to_string(), "US".to_string()],
            })
            .expect("symbols");
        assert_eq!(symbols, vec!["AIR", "FPH", "AAPL"]);
    }

    #[test]
    fn missing_market_file_is_an_error() {
        let dir = unique_tmp_dir("symbols_missing");
        fs::create_dir_all(&dir).expect("dir");
        let err = JsonSymbolCatalog::new()
            .list_symbols(&SymbolQuery {
                base_dir: dir,
                markets: vec!["au".to_string()],
            })
            .expect_err("missing");
        assert!(err.contains("stocks_au.json"));
    }
}
