use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn from_was_buying(was_buying: bool) -> Self {
        if was_buying {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}
