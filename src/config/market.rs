pub struct MarketConfig {
    /// Base URL of the Yahoo Finance v8 chart endpoint.
    pub chart_base_url: &'static str,
    /// Suffix appended to bare numeric symbols (local exchange qualifier).
    pub default_suffix: &'static str,
    /// Bar width requested from the provider.
    pub bar_interval: &'static str,
    /// The chart endpoint rejects requests without a browser-ish user agent.
    pub user_agent: &'static str,
}

pub const MARKET: MarketConfig = MarketConfig {
    chart_base_url: "https://query1.finance.yahoo.com/v8/finance/chart",
    default_suffix: ".TW",
    bar_interval: "1d",
    user_agent: "Mozilla/5.0 (X11; Linux x86_64) stock-scope/0.1",
};
