//! Amounts spelled out for printed documents.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::french::number_to_words;
use super::vocabulary::Vocabulary;
use crate::money;

const MILLION: u128 = 1_000_000;

/// Spells out an amount with its currency words.
///
/// The amount is rounded half-up to the vocabulary's decimal places, then
/// the integer part and the fraction (scaled to a whole number of fraction
/// units) are spelled by the same routine:
///
/// - `0` gives `"zéro dinar"`
/// - `1250.5` gives `"mille deux cent cinquante dinars et cinquante centimes"`
/// - `2000000` gives `"deux millions de dinars"`
/// - negative amounts are prefixed with `"moins"`
#[must_use]
pub fn to_words(amount: Decimal, vocabulary: &Vocabulary) -> String {
    let rounded = money::round(amount, vocabulary.decimal_places);
    let magnitude = rounded.abs();

    let integer_part = magnitude.trunc();
    let scale = Decimal::from(10u64.saturating_pow(vocabulary.decimal_places));
    let fraction_part = (magnitude - integer_part) * scale;

    // Integral Decimals always fit: the mantissa is 96 bits wide.
    let integer = integer_part.to_u128().unwrap_or_default();
    let fraction = fraction_part.trunc().to_u128().unwrap_or_default();

    let mut words = String::new();
    if rounded < Decimal::ZERO {
        words.push_str("moins ");
    }

    words.push_str(&number_to_words(integer));
    words.push(' ');
    if integer >= MILLION && integer % MILLION == 0 {
        words.push_str("de ");
    }
    words.push_str(if integer > 1 {
        &vocabulary.word_plural
    } else {
        &vocabulary.word_singular
    });

    if fraction > 0 {
        words.push_str(" et ");
        words.push_str(&number_to_words(fraction));
        words.push(' ');
        words.push_str(if fraction > 1 {
            &vocabulary.word_fraction_plural
        } else {
            &vocabulary.word_fraction_singular
        });
    }

    words
}
