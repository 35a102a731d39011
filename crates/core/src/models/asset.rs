use serde::{Deserialize, Serialize};

/// A tracked exchange instrument (e.g. BTCUSDT on Binance).
///
/// **Equality and hashing** are based solely on `symbol`, NOT on the
/// display fields, so the same instrument configured with a different
/// label still maps to the same snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Exchange ticker pair, uppercased (e.g., "BTCUSDT")
    pub symbol: String,

    /// Short label used in chart legends and log headers (e.g., "BTC")
    pub label: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Line color for the raw price chart
    #[serde(default = "default_price_color")]
    pub price_color: String,

    /// Line color for the EMA trend overlay
    #[serde(default = "default_trend_color")]
    pub trend_color: String,

    /// Line color on the combined portfolio chart
    #[serde(default = "default_portfolio_color")]
    pub portfolio_color: String,
}

fn default_price_color() -> String {
    "steelblue".to_string()
}

fn default_trend_color() -> String {
    "black".to_string()
}

fn default_portfolio_color() -> String {
    "#1f77b4".to_string()
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl Asset {
    pub fn new(
        symbol: impl Into<String>,
        label: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            label: label.into(),
            name: name.into(),
            price_color: default_price_color(),
            trend_color: default_trend_color(),
            portfolio_color: default_portfolio_color(),
        }
    }

    /// Override the three chart colors.
    pub fn with_colors(
        mut self,
        price: impl Into<String>,
        trend: impl Into<String>,
        portfolio: impl Into<String>,
    ) -> Self {
        self.price_color = price.into();
        self.trend_color = trend.into();
        self.portfolio_color = portfolio.into();
        self
    }

    /// Bitcoin against Tether, asset A of the default pair.
    pub fn bitcoin() -> Self {
        Self::new("BTCUSDT", "BTC", "Bitcoin").with_colors("orange", "black", "#FF9900")
    }

    /// Ether against Tether, asset B of the default pair.
    pub fn ethereum() -> Self {
        Self::new("ETHUSDT", "ETH", "Ethereum").with_colors("purple", "green", "#6A5ACD")
    }

    /// Quote-style name used in chart titles, e.g. "BTC-USD".
    pub fn usd_pair(&self) -> String {
        format!("{}-USD", self.label)
    }
}
