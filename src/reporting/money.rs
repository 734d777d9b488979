const GROUP_SEPARATOR: char = '\u{202F}';
const CURRENCY_SEPARATOR: char = '\u{A0}';

/// French euro amount: narrow no-break spaces between thousands, a decimal
/// comma and a no-break space before the sign, e.g. `1 234,50 €`.
pub fn format_euro(amount: f64) -> String {
    let total_cents = if amount.is_finite() { (amount.abs() * 100.0).round() as u64 } else { 0 };
    let (units, cents) = (total_cents / 100, total_cents % 100);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{cents:02}{CURRENCY_SEPARATOR}€")
}
