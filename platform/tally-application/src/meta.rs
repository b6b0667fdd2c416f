pub fn engine_name() -> &'static str {
    "Tally"
}

pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
