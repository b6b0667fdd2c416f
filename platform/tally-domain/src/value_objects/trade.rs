use crate::error::ProfitError;
use crate::value_objects::side::Side;
use chrono::NaiveDate;
use serde::Serialize;

/// A completed buy/sell pair of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTrip {
    pub symbol: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub quantity: f64,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
}

impl RoundTrip {
    /// Builds a round trip from two positionally paired legs. The opening leg's quantity is the
    /// traded quantity; the legs' sides are not checked.
    pub fn from_legs(open: &TradeLeg, close: &TradeLeg) -> Self {
        Self {
            symbol: open.symbol.clone(),
            buy_price: open.price,
            sell_price: close.price,
            quantity: open.quantity,
            buy_date: open.date,
            sell_date: close.date,
        }
    }
}

/// One side of a trade, as exported by brokers that log fills individually.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeLeg {
    pub symbol: String,
    pub price: f64,
    pub quantity: f64,
    pub date: NaiveDate,
    pub side: Side,
}

pub trait HasSymbol {
    fn symbol(&self) -> &str;
}

impl HasSymbol for RoundTrip {
    fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl HasSymbol for TradeLeg {
    fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// A validated trade input. A batch holds a single record shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeBatch {
    RoundTrips(Vec<RoundTrip>),
    Legs(Vec<TradeLeg>),
}

impl TradeBatch {
    pub fn len(&self) -> usize {
        match self {
            TradeBatch::RoundTrips(trips) => trips.len(),
            TradeBatch::Legs(legs) => legs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> &'static str {
        match self {
            TradeBatch::RoundTrips(_) => "round_trip",
            TradeBatch::Legs(_) => "leg",
        }
    }
}

/// Trade record as delivered by an input adapter, before shape validation. Dates are already
/// normalized to calendar days; `None` means the field was absent or empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrade {
    pub symbol: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub buy_date: Option<NaiveDate>,
    pub sell_date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub date: Option<NaiveDate>,
    pub was_buying: Option<bool>,
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    RoundTrip,
    Leg,
}

impl Shape {
    fn label(self) -> &'static str {
        match self {
            Shape::RoundTrip => "round_trip",
            Shape::Leg => "leg",
        }
    }
}

impl RawTrade {
    fn shape(&self, index: usize) -> Result<Shape, ProfitError> {
        let paired = self.buy_price.is_some()
            || self.sell_price.is_some()
            || self.buy_date.is_some()
            || self.sell_date.is_some();
        let leg = self.price.is_some() || self.date.is_some() || self.was_buying.is_some();
        match (paired, leg) {
            (true, false) => Ok(Shape::RoundTrip),
            (false, true) => Ok(Shape::Leg),
            (true, true) => Err(ProfitError::malformed(
                index,
                "record mixes round-trip and leg fields",
            )),
            (false, false) => Err(ProfitError::malformed(
                index,
                "record has neither round-trip nor leg fields",
            )),
        }
    }
}

/// Validates every record and returns a batch of a single shape. Fails on the first bad record;
/// nothing is partially processed.
pub fn validate_records(records: &[RawTrade]) -> Result<TradeBatch, ProfitError> {
    let Some(first) = records.first() else {
        return Ok(TradeBatch::RoundTrips(Vec::new()));
    };
    let expected = first.shape(0)?;

    for (index, record) in records.iter().enumerate().skip(1) {
        let shape = record.shape(index)?;
        if shape != expected {
            return Err(ProfitError::malformed(
                index,
                format!(
                    "record shape {} does not match batch shape {}",
                    shape.label(),
                    expected.label()
                ),
            ));
        }
    }

    match expected {
        Shape::RoundTrip => records
            .iter()
            .enumerate()
            .map(|(index, record)| round_trip_from_raw(index, record))
            .collect::<Result<Vec<_>, _>>()
            .map(TradeBatch::RoundTrips),
        Shape::Leg => records
            .iter()
            .enumerate()
            .map(|(index, record)| leg_from_raw(index, record))
            .collect::<Result<Vec<_>, _>>()
            .map(TradeBatch::Legs),
    }
}

fn round_trip_from_raw(index: usize, record: &RawTrade) -> Result<RoundTrip, ProfitError> {
    Ok(RoundTrip {
        symbol: require_symbol(index, record)?,
        buy_price: require_positive(index, "buy_price", record.buy_price)?,
        sell_price: require_positive(index, "sell_price", record.sell_price)?,
        quantity: require_positive(index, "quantity", record.quantity)?,
        buy_date: require(index, "buy_date", record.buy_date)?,
        sell_date: require(index, "sell_date", record.sell_date)?,
    })
}

fn leg_from_raw(index: usize, record: &RawTrade) -> Result<TradeLeg, ProfitError> {
    Ok(TradeLeg {
        symbol: require_symbol(index, record)?,
        price: require_positive(index, "price", record.price)?,
        quantity: require_positive(index, "quantity", record.quantity)?,
        date: require(index, "date", record.date)?,
        side: Side::from_was_buying(require(index, "was_buying", record.was_buying)?),
    })
}

fn require<T: Copy>(index: usize, field: &str, value: Option<T>) -> Result<T, ProfitError> {
    value.ok_or_else(|| ProfitError::malformed(index, format!("missing {field}")))
}

fn require_symbol(index: usize, record: &RawTrade) -> Result<String, ProfitError> {
    match record.symbol.as_deref().map(str::trim) {
        Some(symbol) if !symbol.is_empty() => Ok(symbol.to_string()),
        _ => Err(ProfitError::malformed(index, "missing symbol")),
    }
}

fn require_positive(index: usize, field: &str, value: Option<f64>) -> Result<f64, ProfitError> {
    let value = require(index, field, value)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ProfitError::malformed(
            index,
            format!("{field} must be finite and > 0 (got {value})"),
        ));
    }
    Ok(value)
}
