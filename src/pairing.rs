use thiserror::Error;

use crate::exchange_rate::ExchangeRate;
use crate::pricing::{derive_prices, price_tokens};

/// Index of the high price among a price block's numeric tokens. Token 0 is
/// ignored.
const HIGH_TOKEN: usize = 1;
const LOW_TOKEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub name: String,
    pub high_price: u64,
    pub low_price: u64,
    pub sell_price: u64,
}

#[derive(Debug, Error, PartialEq)]
pub enum PairingError {
    #[error("Price block #{position} for {name:?} has {} numeric tokens, expected at least 3: {text:?}", .tokens.len())]
    MalformedPriceBlock {
        name: String,
        position: usize,
        text: String,
        tokens: Vec<f64>,
    },
    #[error("Price block #{position} for {name:?} converts outside the supported range: {text:?}")]
    PriceOutOfRange {
        name: String,
        position: usize,
        text: String,
    },
    #[error("Game {name:?} has no price block")]
    DanglingName { name: String },
}

#[derive(Debug)]
enum PairingState {
    ExpectingName,
    ExpectingPriceBlock { name: String },
}

/// Fold alternating name / price-block fragments into priced records.
///
/// Any block with fewer than three numeric tokens or with prices too large to
/// convert fails the whole batch, as does a trailing name without a block.
pub fn pair_fragments<I, S>(fragments: I, rate: ExchangeRate) -> Result<Vec<GameRecord>, PairingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();

    let final_state = fragments.into_iter().enumerate().try_fold(
        PairingState::ExpectingName,
        |state, (position, fragment)| -> Result<PairingState, PairingError> {
            let fragment = fragment.as_ref();
            match state {
                PairingState::ExpectingName => Ok(PairingState::ExpectingPriceBlock {
                    name: fragment.to_string(),
                }),
                PairingState::ExpectingPriceBlock { name } => {
                    records.push(price_record(name, position, fragment, rate)?);
                    Ok(PairingState::ExpectingName)
                }
            }
        },
    )?;

    match final_state {
        PairingState::ExpectingName => Ok(records),
        PairingState::ExpectingPriceBlock { name } => Err(PairingError::DanglingName { name }),
    }
}

fn price_record(
    name: String,
    position: usize,
    block: &str,
    rate: ExchangeRate,
) -> Result<GameRecord, PairingError> {
    let tokens = price_tokens(block);
    let (Some(&raw_high), Some(&raw_low)) = (tokens.get(HIGH_TOKEN), tokens.get(LOW_TOKEN)) else {
        return Err(PairingError::MalformedPriceBlock {
            name,
            position,
            text: block.to_string(),
            tokens,
        });
    };

    let Some(prices) = derive_prices(raw_high, raw_low, rate) else {
        return Err(PairingError::PriceOutOfRange {
            name,
            position,
            text: block.to_string(),
        });
    };
    tracing::debug!(
        %name,
        raw_high,
        raw_low,
        low = prices.low_price,
        markup = prices.markup_percent,
        sell = prices.sell_price,
        "Priced game"
    );

    Ok(GameRecord {
        name,
        high_price: prices.high_price,
        low_price: prices.low_price,
        sell_price: prices.sell_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(value: f64) -> ExchangeRate {
        ExchangeRate::new(value).unwrap()
    }

    #[test]
    fn test_pairs_in_order_and_skips_first_token() {
        let fragments = ["GameA", "$10 $20 $30", "GameB", "$5 $15 $25"];
        let records = pair_fragments(fragments, rate(1.0)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "GameA");
        assert_eq!(records[0].high_price, 20);
        assert_eq!(records[0].low_price, 30);
        assert_eq!(records[0].sell_price, 90);
        assert_eq!(records[1].name, "GameB");
        assert_eq!(records[1].high_price, 15);
        assert_eq!(records[1].low_price, 25);
    }

    #[test]
    fn test_end_to_end_pricing() {
        let fragments = vec!["Big Game".to_string(), "5% $3 $250".to_string()];
        let records = pair_fragments(&fragments, rate(90.0)).unwrap();

        assert_eq!(
            records,
            vec![GameRecord {
                name: "Big Game".to_string(),
                high_price: 270,
                low_price: 22_500,
                sell_price: 27_090,
            }]
        );
    }

    #[test]
    fn test_sell_price_not_below_low_price() {
        let fragments = ["A", "1 2 3", "B", "-10% $1,999.99 $1,799.99", "C", "0 0 0"];
        for record in pair_fragments(fragments, rate(97.3)).unwrap() {
            assert!(record.sell_price >= record.low_price, "{record:?}");
            assert_eq!(record.sell_price % 100, 90);
        }
    }

    #[test]
    fn test_empty_input() {
        let fragments: [&str; 0] = [];
        assert_eq!(pair_fragments(fragments, rate(1.0)), Ok(Vec::new()));
    }

    #[test]
    fn test_malformed_price_block_fails() {
        let fragments = ["GameA", "$10 $20 $30", "GameB", "-15% $9.99"];
        let err = pair_fragments(fragments, rate(1.0)).unwrap_err();

        assert_eq!(
            err,
            PairingError::MalformedPriceBlock {
                name: "GameB".to_string(),
                position: 3,
                text: "-15% $9.99".to_string(),
                tokens: vec![15.0, 9.99],
            }
        );
    }

    #[test]
    fn test_oversized_price_fails() {
        let block = "-10% $1,000,000,000,000,000,000 $999,999,999,999,999,999";
        let fragments = ["GameA", "$10 $20 $30", "Whale", block];
        let err = pair_fragments(fragments, rate(90.0)).unwrap_err();

        assert_eq!(
            err,
            PairingError::PriceOutOfRange {
                name: "Whale".to_string(),
                position: 3,
                text: block.to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_name_fails() {
        let fragments = ["GameA", "$10 $20 $30", "GameB"];
        let err = pair_fragments(fragments, rate(1.0)).unwrap_err();
        assert_eq!(err, PairingError::DanglingName { name: "GameB".to_string() });
    }
}
