use lazy_regex::regex;

/// Parse a localized decimal like "38,61 mm" or "28.28 g".
///
/// The decimal comma is normalized to a dot and everything that is not a
/// digit or a dot is stripped, so unit suffixes never need their own
/// patterns. Returns `None` when nothing numeric is left.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let mut cleaned: String = text
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // With several separators left ("1.234,56" cleans to "1.234.56") the
    // last one is the decimal point and the rest are grouping.
    if let Some(last) = cleaned.rfind('.') {
        if cleaned[..last].contains('.') {
            let decimals = cleaned.split_off(last);
            cleaned.retain(|c| c != '.');
            cleaned.push_str(&decimals);
        }
    }

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok()
}

/// Parse a mintage quantity with an optional Lithuanian scale word.
///
/// "Bendras tiražas 0,5 mln. vnt." -> 500_000
/// "3 tūkst. vnt."                 -> 3_000
/// "3 000 vnt."                    -> 3_000
///
/// Scale words are checked most-specific first: a string like
/// "0,5 mln. vnt." contains both "mln" and "vnt" and must parse as
/// millions. A result of exactly zero is treated as missing data.
pub fn parse_quantity(text: &str) -> Option<i64> {
    let lower = text.to_lowercase();

    let quantity = if let Some(c) = regex!(r"(\d[\d\s,.]*)\s*mln").captures(&lower) {
        let num = c[1].replace(' ', "").replace(',', ".");
        num.parse::<f64>().ok().map(|n| (n * 1_000_000.0) as i64)
    } else if let Some(c) = regex!(r"(\d[\d\s,.]*)\s*tūkst").captures(&lower) {
        let num = c[1].replace(' ', "").replace(',', ".");
        num.parse::<f64>().ok().map(|n| (n * 1_000.0) as i64)
    } else if let Some(c) = regex!(r"(\d[\d\s]*)\s*vnt").captures(&lower) {
        c[1].replace(' ', "").parse().ok()
    } else if let Some(c) = regex!(r"(\d[\d\s]*)").captures(&lower) {
        c[1].replace(' ', "").parse().ok()
    } else {
        None
    };

    // Zero mintage never appears as real data on the source site.
    quantity.filter(|n| *n != 0)
}

/// Extract the leading four-digit year from a date like "2025-12-22".
pub fn parse_year(text: &str) -> Option<i32> {
    regex!(r"\d{4}")
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Resolve a possibly relative url against the site origin. Idempotent.
pub fn normalize_url(url: &str, base: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    if url.starts_with('/') {
        return format!("{}{}", base, url);
    }

    url.to_string()
}
