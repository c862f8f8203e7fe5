//! # Currency Formatting
//!
//! Converts canonical prices into display strings in the guest's chosen
//! currency and locale.
//!
//! ## Conversion Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  source == display                                                      │
//! │      └── no conversion, currency's own layout                           │
//! │          USD 1200  →  "$12.00"                                          │
//! │                                                                         │
//! │  strong → weak  (USD → LBP)                                             │
//! │      └── × rate, round to whole units, suffix symbol                    │
//! │          USD 600 @ 90,000  →  "540,000 L.L."                            │
//! │                                                                         │
//! │  weak → strong  (LBP → USD)                                             │
//! │      └── ÷ rate, two decimals, prefix symbol                            │
//! │          LBP 540,000 @ 90,000  →  "$6.00"                               │
//! │                                                                         │
//! │  Locale pass (LAST): ASCII digits → locale numerals, one by one.        │
//! │      "540,000 L.L."  →  "٥٤٠,٠٠٠ L.L."                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure. The exchange rate is supplied by the caller
//! on each call; nothing is cached.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Currency
// =============================================================================

/// Which side of the exchange pair a currency sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denomination {
    /// High-value unit with a practical sub-unit (cents).
    Strong,
    /// Low-value unit with no practical sub-unit.
    Weak,
}

/// Currencies the resort prices and displays in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Currency {
    /// US dollar. Canonical pricing currency.
    #[default]
    Usd,
    /// Lebanese pound.
    Lbp,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Lbp => "LBP",
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Lbp => "L.L.",
        }
    }

    /// Digits after the decimal point in this currency's minor unit.
    pub const fn minor_digits(&self) -> u32 {
        match self {
            Currency::Usd => 2,
            Currency::Lbp => 0,
        }
    }

    pub const fn denomination(&self) -> Denomination {
        match self {
            Currency::Usd => Denomination::Strong,
            Currency::Lbp => Denomination::Weak,
        }
    }

    /// Strong currencies put the symbol before the number.
    pub const fn symbol_leads(&self) -> bool {
        matches!(self.denomination(), Denomination::Strong)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "LBP" => Ok(Currency::Lbp),
            other => Err(ValidationError::NotAllowed {
                field: format!("currency '{}'", other),
                allowed: vec!["USD".to_string(), "LBP".to_string()],
            }),
        }
    }
}

// =============================================================================
// Locale
// =============================================================================

/// Display language. Only the numeral system matters to the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Locale {
    #[default]
    En,
    Fr,
    Ar,
}

const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

impl Locale {
    /// Numeral glyphs for 0-9, or `None` for Western digits.
    pub const fn numerals(&self) -> Option<&'static [char; 10]> {
        match self {
            Locale::Ar => Some(&ARABIC_INDIC_DIGITS),
            Locale::En | Locale::Fr => None,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Ar => "ar",
        }
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            "ar" => Ok(Locale::Ar),
            other => Err(ValidationError::NotAllowed {
                field: format!("locale '{}'", other),
                allowed: vec!["en".to_string(), "fr".to_string(), "ar".to_string()],
            }),
        }
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// Whole weak-currency units per one strong-currency unit (89,500 LBP/USD).
///
/// Zero is unrepresentable, so conversion never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate(NonZeroU32);

impl ExchangeRate {
    pub const DEFAULT: ExchangeRate = match NonZeroU32::new(89_500) {
        Some(rate) => ExchangeRate(rate),
        None => panic!("default exchange rate must be non-zero"),
    };

    /// Returns `None` for a zero rate.
    pub fn new(weak_per_strong: u32) -> Option<Self> {
        NonZeroU32::new(weak_per_strong).map(ExchangeRate)
    }

    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        ExchangeRate::DEFAULT
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Divides rounding half away from zero.
fn div_round(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

/// Converts an amount between currencies.
///
/// Strong → weak rounds to whole weak units; weak → strong rounds to the
/// strong currency's minor unit. A round trip is therefore lossy, bounded
/// by less than one rate unit. Results beyond the `Money` range clamp to
/// its bounds.
///
/// ```rust
/// use resort_core::currency::{convert, Currency, ExchangeRate};
/// use resort_core::money::Money;
///
/// let rate = ExchangeRate::new(90_000).unwrap();
/// let lbp = convert(Money::from_minor(600), Currency::Usd, Currency::Lbp, rate);
/// assert_eq!(lbp.minor(), 540_000);
/// ```
pub fn convert(amount: Money, from: Currency, to: Currency, rate: ExchangeRate) -> Money {
    if from == to {
        return amount;
    }

    let rate = rate.get() as i128;
    let amount = amount.minor() as i128;

    let converted = match (from.denomination(), to.denomination()) {
        (Denomination::Strong, Denomination::Weak) => {
            // minor strong units → major strong units → weak units
            let scale = 10_i128.pow(from.minor_digits());
            div_round(amount * rate, scale)
        }
        (Denomination::Weak, Denomination::Strong) => {
            let scale = 10_i128.pow(to.minor_digits());
            div_round(amount * scale, rate)
        }
        // Two currencies on the same side would need a cross rate; the pair
        // is fixed so this only happens for identical currencies.
        _ => amount,
    };

    Money::saturating_from_wide(converted)
}

// =============================================================================
// Formatting
// =============================================================================

/// Inserts `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Renders an amount in the currency's own layout, Western digits.
fn render(amount: Money, currency: Currency) -> String {
    let minor = amount.minor();
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();

    let digits = currency.minor_digits();
    let number = if digits == 0 {
        group_thousands(&abs.to_string())
    } else {
        let scale = 10_u64.pow(digits);
        format!(
            "{}.{:0width$}",
            group_thousands(&(abs / scale).to_string()),
            abs % scale,
            width = digits as usize
        )
    };

    if currency.symbol_leads() {
        format!("{}{}{}", sign, currency.symbol(), number)
    } else {
        format!("{}{} {}", sign, number, currency.symbol())
    }
}

/// Maps every ASCII digit to the locale's numeral glyph.
///
/// Separators and symbols pass through untouched.
pub fn localize_digits(text: &str, locale: Locale) -> String {
    match locale.numerals() {
        Some(glyphs) => text
            .chars()
            .map(|c| {
                if c.is_ascii_digit() {
                    glyphs[(c as u8 - b'0') as usize]
                } else {
                    c
                }
            })
            .collect(),
        None => text.to_string(),
    }
}

/// Formats a canonical price for display.
///
/// ## Arguments
/// * `amount` - Price in minor units of `source`
/// * `display` - Currency the guest wants to see
/// * `source` - Currency `amount` is stored in
/// * `rate` - Current exchange rate
/// * `locale` - Display locale (numeral system)
///
/// ```rust
/// use resort_core::currency::{format_price, Currency, ExchangeRate, Locale};
/// use resort_core::money::Money;
///
/// let rate = ExchangeRate::new(90_000).unwrap();
/// let usd = format_price(Money::from_minor(1200), Currency::Usd, Currency::Usd, rate, Locale::En);
/// assert_eq!(usd, "$12.00");
///
/// let ar = format_price(Money::from_minor(600), Currency::Lbp, Currency::Usd, rate, Locale::Ar);
/// assert_eq!(ar, "٥٤٠,٠٠٠ L.L.");
/// ```
pub fn format_price(
    amount: Money,
    display: Currency,
    source: Currency,
    rate: ExchangeRate,
    locale: Locale,
) -> String {
    let converted = convert(amount, source, display, rate);
    localize_digits(&render(converted, display), locale)
}

// =============================================================================
// Display Settings
// =============================================================================

/// The guest's display configuration, passed explicitly to formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub currency: Currency,
    pub locale: Locale,
    pub exchange_rate: ExchangeRate,
}

impl DisplaySettings {
    /// Formats `amount` (stored in `source`) with these settings.
    pub fn format(&self, amount: Money, source: Currency) -> String {
        format_price(amount, self.currency, source, self.exchange_rate, self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(r: u32) -> ExchangeRate {
        ExchangeRate::new(r).unwrap()
    }

    #[test]
    fn test_same_currency_usd() {
        let s = format_price(
            Money::from_minor(1200),
            Currency::Usd,
            Currency::Usd,
            rate(90_000),
            Locale::En,
        );
        assert_eq!(s, "$12.00");

        let s = format_price(
            Money::from_minor(123_456_789),
            Currency::Usd,
            Currency::Usd,
            rate(90_000),
            Locale::En,
        );
        assert_eq!(s, "$1,234,567.89");
    }

    #[test]
    fn test_same_currency_lbp_has_no_decimals() {
        let s = format_price(
            Money::from_minor(250_000),
            Currency::Lbp,
            Currency::Lbp,
            rate(90_000),
            Locale::En,
        );
        assert_eq!(s, "250,000 L.L.");
    }

    #[test]
    fn test_usd_to_lbp_rounds_to_whole_units() {
        // 6.00 × 90,000 = 540,000
        let s = format_price(
            Money::from_minor(600),
            Currency::Lbp,
            Currency::Usd,
            rate(90_000),
            Locale::En,
        );
        assert_eq!(s, "540,000 L.L.");

        // 0.01 × 89,500 = 895
        let lbp = convert(Money::from_minor(1), Currency::Usd, Currency::Lbp, rate(89_500));
        assert_eq!(lbp.minor(), 895);

        // 0.01 × 33 = 0.33 → 0
        let lbp = convert(Money::from_minor(1), Currency::Usd, Currency::Lbp, rate(33));
        assert_eq!(lbp.minor(), 0);
    }

    #[test]
    fn test_lbp_to_usd_two_decimals() {
        let s = format_price(
            Money::from_minor(540_000),
            Currency::Usd,
            Currency::Lbp,
            rate(90_000),
            Locale::En,
        );
        assert_eq!(s, "$6.00");

        // 100,000 / 90,000 = 1.111 → 1.11
        let usd = convert(
            Money::from_minor(100_000),
            Currency::Lbp,
            Currency::Usd,
            rate(90_000),
        );
        assert_eq!(usd.minor(), 111);
    }

    #[test]
    fn test_negative_amounts_keep_sign_outside_symbol() {
        let s = format_price(
            Money::from_minor(-550),
            Currency::Usd,
            Currency::Usd,
            rate(90_000),
            Locale::En,
        );
        assert_eq!(s, "-$5.50");
    }

    #[test]
    fn test_arabic_digits_replace_only_digits() {
        let s = format_price(
            Money::from_minor(123_456),
            Currency::Usd,
            Currency::Usd,
            rate(90_000),
            Locale::Ar,
        );
        assert_eq!(s, "$١,٢٣٤.٥٦");
    }

    #[test]
    fn test_french_keeps_western_digits() {
        let s = format_price(
            Money::from_minor(600),
            Currency::Lbp,
            Currency::Usd,
            rate(90_000),
            Locale::Fr,
        );
        assert_eq!(s, "540,000 L.L.");
    }

    #[test]
    fn test_round_trip_error_bounded_by_rate() {
        let r = rate(89_500);
        for lbp in [1_i64, 999, 12_345, 44_750, 89_499, 1_000_001, 7_654_321] {
            let original = Money::from_minor(lbp);
            let usd = convert(original, Currency::Lbp, Currency::Usd, r);
            let back = convert(usd, Currency::Usd, Currency::Lbp, r);
            let error = (back.minor() - original.minor()).abs();
            assert!(error < r.get() as i64, "error {} for {}", error, lbp);
            // Half a cent's worth, rounded up.
            assert!(error <= (r.get() as i64 + 199) / 200);
        }
    }

    #[test]
    fn test_conversion_clamps_to_money_range() {
        let r = rate(89_500);
        let max = convert(Money::from_minor(i64::MAX), Currency::Usd, Currency::Lbp, r);
        assert_eq!(max.minor(), i64::MAX);
        let min = convert(Money::from_minor(i64::MIN), Currency::Usd, Currency::Lbp, r);
        assert_eq!(min.minor(), i64::MIN);

        // The reverse direction shrinks, so it stays exact.
        let usd = convert(Money::from_minor(i64::MAX), Currency::Lbp, Currency::Usd, r);
        assert!(usd.is_positive() && usd.minor() < i64::MAX);
    }

    #[test]
    fn test_usd_round_trip_exact_for_whole_cents() {
        let r = rate(90_000);
        for cents in [0_i64, 1, 99, 600, 1_299, 250_000] {
            let lbp = convert(Money::from_minor(cents), Currency::Usd, Currency::Lbp, r);
            let back = convert(lbp, Currency::Lbp, Currency::Usd, r);
            assert_eq!(back.minor(), cents);
        }
    }

    #[test]
    fn test_exchange_rate_rejects_zero() {
        assert!(ExchangeRate::new(0).is_none());
        assert_eq!(ExchangeRate::default().get(), 89_500);
        assert!(serde_json::from_str::<ExchangeRate>("0").is_err());
        assert_eq!(serde_json::from_str::<ExchangeRate>("90000").unwrap().get(), 90_000);
    }

    #[test]
    fn test_parse_currency_and_locale() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" LBP ".parse::<Currency>().unwrap(), Currency::Lbp);
        assert!("EUR".parse::<Currency>().is_err());
        assert_eq!("AR".parse::<Locale>().unwrap(), Locale::Ar);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_display_settings_format() {
        let settings = DisplaySettings {
            currency: Currency::Lbp,
            locale: Locale::En,
            exchange_rate: rate(90_000),
        };
        assert_eq!(settings.format(Money::from_minor(1000), Currency::Usd), "900,000 L.L.");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
