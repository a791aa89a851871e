//! French cardinal numbers.
//!
//! Grammar:
//! - `et` joins the unit 1 (and 11 after 60): vingt et un, soixante et onze
//! - 70 and 90 are built on 60 and 80: soixante-dix, quatre-vingt-dix
//! - `quatre-vingts` and `cents` take an `s` when they end the number and
//!   are multiplied, except right before `mille`
//! - `mille` never takes an `s` and is never preceded by `un`
//! - `million`, `milliard` and the larger scales are nouns and agree in
//!   number

const UNITS: [&str; 17] = [
    "", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf", "dix", "onze",
    "douze", "treize", "quatorze", "quinze", "seize",
];

const TENS: [&str; 7] = [
    "", "dix", "vingt", "trente", "quarante", "cinquante", "soixante",
];

/// Long-scale magnitudes above a thousand, largest first.
const SCALES: [(u128, &str); 7] = [
    (1_000_000_000_000_000_000_000_000_000, "quadrilliard"),
    (1_000_000_000_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000_000_000_000, "trilliard"),
    (1_000_000_000_000_000_000, "trillion"),
    (1_000_000_000_000_000, "billiard"),
    (1_000_000_000_000, "billion"),
    (1_000_000_000, "milliard"),
];

const MILLION: u128 = 1_000_000;
const THOUSAND: u128 = 1_000;

/// Spells out a non-negative integer in French.
///
/// Used for both the integer and the fractional part of an amount.
#[must_use]
pub fn number_to_words(n: u128) -> String {
    if n == 0 {
        return "zéro".to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut rest = n;

    for (scale, noun) in SCALES.iter().copied().chain([(MILLION, "million")]) {
        let count = rest / scale;
        rest %= scale;
        if count == 0 {
            continue;
        }
        // Below a thousand for every scale; the largest stays below 80 for
        // any `Decimal`.
        parts.push(number_to_words(count));
        parts.push(if count > 1 {
            format!("{noun}s")
        } else {
            noun.to_string()
        });
    }

    let thousands = rest / THOUSAND;
    rest %= THOUSAND;
    if thousands > 1 {
        parts.push(below_thousand(thousands, true));
    }
    if thousands > 0 {
        parts.push("mille".to_string());
    }

    if rest > 0 {
        parts.push(below_thousand(rest, false));
    }

    parts.join(" ")
}

/// 1..=999. `before_mille` keeps `cent` and `quatre-vingt` invariable.
fn below_thousand(n: u128, before_mille: bool) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let mut words: Vec<String> = Vec::with_capacity(3);
    match hundreds {
        0 => {}
        1 => words.push("cent".to_string()),
        h => {
            words.push(below_hundred(h, false));
            words.push(if rest == 0 && !before_mille {
                "cents".to_string()
            } else {
                "cent".to_string()
            });
        }
    }
    if rest > 0 {
        words.push(below_hundred(rest, before_mille));
    }

    words.join(" ")
}

/// 1..=99.
fn below_hundred(n: u128, before_mille: bool) -> String {
    let idx = usize::try_from(n).unwrap_or(0);
    if idx < UNITS.len() {
        return UNITS[idx].to_string();
    }
    if idx < 20 {
        return format!("dix-{}", UNITS[idx - 10]);
    }

    let tens = idx / 10;
    let unit = idx % 10;
    match tens {
        2..=6 => match unit {
            0 => TENS[tens].to_string(),
            1 => format!("{} et un", TENS[tens]),
            _ => format!("{}-{}", TENS[tens], UNITS[unit]),
        },
        7 => match unit {
            1 => "soixante et onze".to_string(),
            _ => format!("soixante-{}", below_hundred(n - 60, false)),
        },
        8 if unit == 0 => {
            if before_mille {
                "quatre-vingt".to_string()
            } else {
                "quatre-vingts".to_string()
            }
        }
        _ => format!("quatre-vingt-{}", below_hundred(n - 80, false)),
    }
}
