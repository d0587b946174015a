//! Price normalisation to a rouble display string.

/// Rough conversion used when the model replies in dollars anyway.
const RUB_PER_USD: f64 = 95.0;

/// Normalise a model-supplied price to a `₽`-suffixed display string.
///
/// Already-rouble strings pass through trimmed; bare numbers are treated
/// as dollars and converted; anything non-numeric keeps its text with a
/// `₽` suffix appended.
pub fn normalize(price: Option<&str>) -> Option<String> {
  let price = price?.trim();
  if price.is_empty() {
    return None;
  }

  let lower = price.to_lowercase();
  if price.contains('₽') || lower.contains("руб") {
    return Some(price.to_owned());
  }

  let numeric: String = price
    .chars()
    .filter(|c| c.is_ascii_digit() || *c == '.')
    .collect();
  match numeric.parse::<f64>() {
    Ok(n) if n.is_finite() => {
      let roubles = (n * RUB_PER_USD).round() as u64;
      Some(format!("{} ₽", group_thousands(roubles)))
    }
    _ => Some(format!("{price} ₽")),
  }
}

/// `1234567` → `"1 234 567"`.
fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(' ');
    }
    out.push(c);
  }
  out
}
