use tally_domain::repositories::artifacts::ArtifactWriter;
use tally_domain::repositories::price_history::PriceHistoryRepository;
use tally_domain::repositories::symbols::SymbolCatalog;
use tally_domain::repositories::trades::TradeSource;
use tally_infrastructure::artifacts::FilesystemArtifactWriter;
use tally_infrastructure::market_data::history::CsvPriceHistoryRepository;
use tally_infrastructure::symbols::JsonSymbolCatalog;
use tally_infrastructure::trades::JsonTradeSource;

pub struct ProfitDeps {
    pub trades: Box<dyn TradeSource>,
    pub artifacts: Box<dyn ArtifactWriter>,
}

pub struct ChartDeps {
    pub catalog: Box<dyn SymbolCatalog>,
    pub history: Box<dyn PriceHistoryRepository>,
    pub trades: Box<dyn TradeSource>,
    pub artifacts: Box<dyn ArtifactWriter>,
}

pub struct ValidateDeps {
    pub trades: Box<dyn TradeSource>,
    pub catalog: Box<dyn SymbolCatalog>,
}

pub fn build_profit_deps() -> ProfitDeps {
    ProfitDeps {
        trades: Box::new(JsonTradeSource::new()),
        artifacts: Box::new(FilesystemArtifactWriter::new()),
    }
}

pub fn build_chart_deps() -> ChartDeps {
    ChartDeps {
        catalog: Box::new(JsonSymbolCatalog::new()),
        history: Box::new(CsvPriceHistoryRepository::new()),
        trades: Box::new(JsonTradeSource::new()),
        artifacts: Box::new(FilesystemArtifactWriter::new()),
    }
}

pub fn build_validate_deps() -> ValidateDeps {
    ValidateDeps {
        trades: Box::new(JsonTradeSource::new()),
        catalog: Box::new(JsonSymbolCatalog::new()),
    }
}
