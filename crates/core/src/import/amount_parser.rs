use rust_decimal::Decimal;
use std::str::FromStr;

use crate::utils::money::has_money_scale;

/// Parses an imported amount written as `1,234.56` or `1.234,56`.
///
/// With both separators present the later one is the decimal point. A
/// separator that appears once is the decimal point, one that repeats is
/// grouping. The result must be positive with at most two decimals.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Missing amount".to_string());
    }
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    let last_dot = compact.rfind('.');
    let last_comma = compact.rfind(',');
    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if dot > comma { ('.', ',') } else { (',', '.') };
            compact.replace(grouping, "").replace(decimal, ".")
        }
        (Some(_), None) => single_separator(&compact, '.'),
        (None, Some(_)) => single_separator(&compact, ','),
        (None, None) => compact,
    };

    let value = Decimal::from_str(&normalized)
        .map_err(|_| format!("Invalid amount: {}", trimmed))?;
    if value <= Decimal::ZERO {
        return Err(format!("Amount must be greater than zero: {}", trimmed));
    }
    if !has_money_scale(value) {
        return Err(format!("Amount has more than two decimals: {}", trimmed));
    }
    Ok(value)
}

fn single_separator(value: &str, separator: char) -> String {
    if value.matches(separator).count() == 1 {
        value.replace(separator, ".")
    } else {
        value.replace(separator, "")
    }
}
