/// Parse an annual trade-volume declaration such as `"$5M - $25M"`, `"$500K"` or `"1,200,000"`.
///
/// Ranges resolve to their midpoint. Returns `None` when nothing numeric can be read.
pub fn parse_trade_volume(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().to_ascii_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    let parts: Vec<&str> = cleaned
        .split(['-', '–'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        [single] => parse_amount(single),
        [low, high] => {
            let low = parse_amount(low)?;
            let high = parse_amount(high)?;
            Some(((low + high) / 2.0).round())
        }
        _ => None,
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw
        .trim()
        .trim_start_matches('$')
        .trim_end_matches('+')
        .trim();
    let digits_end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(digits_end);

    let value = number.replace(',', "").parse::<f64>().ok()?;
    let multiplier = match suffix.trim() {
        "" => 1.0,
        "k" | "thousand" => 1_000.0,
        "m" | "mm" | "million" => 1_000_000.0,
        "b" | "bn" | "billion" => 1_000_000_000.0,
        _ => return None,
    };

    let amount = value * multiplier;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}
