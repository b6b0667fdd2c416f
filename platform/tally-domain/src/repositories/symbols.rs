use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SymbolQuery {
    pub base_dir: PathBuf,
    pub markets: Vec<String>,
}

pub trait SymbolCatalog {
    fn list_symbols(&self, query: &SymbolQuery) -> Result<Vec<String>, String>;
}
