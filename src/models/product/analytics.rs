use serde::Serialize;

/// Market price series the positioning report is computed against.
/// Stands in for a real market feed; the report itself only depends on the
/// product's current price, so swapping the source in later is contained
/// here.
const MARKET_TREND_PRICES: [f64; 6] = [115.0, 110.0, 112.0, 120.0, 118.0, 125.0];

const OPTIMAL_PRICE_MIN: f64 = 110.0;
const OPTIMAL_PRICE_MAX: f64 = 140.0;

#[derive(Debug, PartialEq, strum_macros::Display, strum_macros::EnumString)]
pub enum MarketPosition {
    #[strum(serialize = "Below Market")]
    BelowMarket,
    #[strum(serialize = "At Market")]
    AtMarket,
    #[strum(serialize = "Above Market")]
    AboveMarket,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAnalytics {
    pub current_price: f64,
    pub optimal_price_min: f64,
    pub optimal_price_max: f64,
    pub price_trend_percentage: String,
    pub market_position: String,
    pub market_trend_prices: Vec<f64>,
}

impl PriceAnalytics {
    pub fn report(current_price: f64) -> Self {
        let latest_market = MARKET_TREND_PRICES[MARKET_TREND_PRICES.len() - 1];
        // a free product has no meaningful trend
        let trend = if current_price == 0.0 {
            0.0
        } else {
            ((latest_market - current_price) / current_price) * 100.0
        };

        let midpoint = (OPTIMAL_PRICE_MIN + OPTIMAL_PRICE_MAX) / 2.0;
        let position = if current_price < midpoint {
            MarketPosition::BelowMarket
        } else if current_price > midpoint {
            MarketPosition::AboveMarket
        } else {
            MarketPosition::AtMarket
        };

        PriceAnalytics {
            current_price,
            optimal_price_min: OPTIMAL_PRICE_MIN,
            optimal_price_max: OPTIMAL_PRICE_MAX,
            price_trend_percentage: format!("{:.2}", trend),
            market_position: position.to_string(),
            market_trend_prices: MARKET_TREND_PRICES.to_vec(),
        }
    }
}
