pub mod config;
pub mod credentials;
pub mod deal_scraper;
pub mod exchange_rate;
pub mod pairing;
pub mod pipeline;
pub mod pricing;
pub mod report;

pub use config::Config;
pub use exchange_rate::ExchangeRate;
pub use pairing::GameRecord;
