use std::sync::LazyLock;

use regex::Regex;

use crate::exchange_rate::ExchangeRate;

/// Locale-formatted amounts such as `7`, `59.99` or `1,299.00`.
static PRICE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\d{1,3},)*\d{1,3}(?:\.\d+)?").expect("price token pattern is valid")
});

/// Markup bands as `(inclusive ceiling, percent)`, ascending. Prices above the
/// last ceiling use [`FALLBACK_MARKUP_PERCENT`].
const MARKUP_TIERS: [(u64, u64); 7] = [
    (300, 150),
    (800, 120),
    (1000, 80),
    (1500, 50),
    (2500, 30),
    (3000, 28),
    (3500, 25),
];

const FALLBACK_MARKUP_PERCENT: u64 = 20;

/// Every intermediate value of the resale price calculation for one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub high_price: u64,
    pub low_price: u64,
    pub markup_percent: u64,
    /// Low price plus markup, in hundredths of the local currency unit.
    pub marked_up_hundredths: u64,
    pub sell_price: u64,
}

impl PriceBreakdown {
    pub fn marked_up(&self) -> f64 {
        self.marked_up_hundredths as f64 / 100.0
    }
}

/// All numeric substrings of a price block, in order of appearance.
pub fn price_tokens(text: &str) -> Vec<f64> {
    PRICE_TOKEN
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .collect()
}

/// Largest converted price accepted. Whole numbers up to 2^53 are exact in
/// `f64`, and the markup of such a price still fits in `u64` hundredths.
pub const MAX_PRICE: u64 = 1 << 53;

/// Converts a source-currency amount, rounding half up to a whole unit.
///
/// `None` when the result is not finite, negative or above [`MAX_PRICE`].
pub fn convert(amount: f64, rate: ExchangeRate) -> Option<u64> {
    let converted = (amount * rate.value()).round();
    if !converted.is_finite() || converted < 0.0 || converted > MAX_PRICE as f64 {
        return None;
    }
    Some(converted as u64)
}

/// Markup percentage for a converted low price. First ceiling that is not
/// exceeded wins.
pub fn markup_percent(low_price: u64) -> u64 {
    MARKUP_TIERS
        .iter()
        .find(|(ceiling, _)| low_price <= *ceiling)
        .map(|(_, percent)| *percent)
        .unwrap_or(FALLBACK_MARKUP_PERCENT)
}

/// `low + low * multiplier`, kept in hundredths so the suffix rounding never
/// sees floating point noise. `None` on overflow.
pub fn apply_markup(low_price: u64) -> Option<u64> {
    low_price
        .checked_mul(100)?
        .checked_add(low_price.checked_mul(markup_percent(low_price))?)
}

/// Smallest value ending in `90` that is not below `value`, or `None` if
/// that value does not fit in `u64` hundredths.
///
/// `round_to_ninety(90) == Some(90)`, `round_to_ninety(91) == Some(190)`.
pub fn round_to_ninety(value: u64) -> Option<u64> {
    round_hundredths_to_ninety(value.checked_mul(100)?)
}

/// `ceil((v + 10) / 100) * 100 - 10` with `v` given in hundredths.
fn round_hundredths_to_ninety(hundredths: u64) -> Option<u64> {
    // div_ceil of at least 1000 is at least 1, so the subtraction cannot wrap
    Some(hundredths.checked_add(1_000)?.div_ceil(10_000).checked_mul(100)? - 10)
}

/// Resale price for a converted low price.
pub fn sell_price(low_price: u64) -> Option<u64> {
    round_hundredths_to_ninety(apply_markup(low_price)?)
}

/// `None` when either amount converts outside `0..=MAX_PRICE`.
pub fn derive_prices(raw_high: f64, raw_low: f64, rate: ExchangeRate) -> Option<PriceBreakdown> {
    let low_price = convert(raw_low, rate)?;
    let high_price = convert(raw_high, rate)?;
    let marked_up_hundredths = apply_markup(low_price)?;

    Some(PriceBreakdown {
        high_price,
        low_price,
        markup_percent: markup_percent(low_price),
        marked_up_hundredths,
        sell_price: round_hundredths_to_ninety(marked_up_hundredths)?,
    })
}
