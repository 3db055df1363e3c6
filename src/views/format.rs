//! Display formatting for prices, volumes and timestamps

use chrono::{DateTime, NaiveDateTime};

/// Group the integer part with commas: 1234567 -> "1,234,567"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn grouped(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let int_value: u64 = int_part.parse().unwrap_or(0);
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, group_thousands(int_value), f),
        None => format!("{}{}", sign, group_thousands(int_value)),
    }
}

/// Index level: millions abbreviated, thousands grouped
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000.0 {
        format!("{:.2}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        grouped(num, 2)
    } else {
        format!("{:.2}", num)
    }
}

pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// "+1.23" / "-1.23"
pub fn format_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// "+0.45%" / "-0.45%"
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_signed(value))
}

/// "+1.23 (+0.45%)"
pub fn format_change(change: f64, change_percent: f64) -> String {
    format!("{} ({})", format_signed(change), format_percent(change_percent))
}

pub fn format_volume(volume: Option<f64>) -> String {
    match volume {
        Some(v) if v > 0.0 => {
            if v >= 1_000_000_000.0 {
                format!("{:.2}B", v / 1_000_000_000.0)
            } else if v >= 1_000_000.0 {
                format!("{:.2}M", v / 1_000_000.0)
            } else if v >= 1_000.0 {
                format!("{:.2}K", v / 1_000.0)
            } else {
                format!("{}", v.round() as u64)
            }
        }
        _ => "N/A".to_string(),
    }
}

pub fn format_market_cap(cap: Option<f64>) -> String {
    match cap {
        Some(c) if c > 0.0 => {
            if c >= 1_000_000_000_000.0 {
                format!("${:.2}T", c / 1_000_000_000_000.0)
            } else if c >= 1_000_000_000.0 {
                format!("${:.2}B", c / 1_000_000_000.0)
            } else if c >= 1_000_000.0 {
                format!("${:.2}M", c / 1_000_000.0)
            } else {
                format!("${}", grouped(c, 0))
            }
        }
        _ => "N/A".to_string(),
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Clock time of an ISO-8601 timestamp; unparseable input is returned as-is
pub fn format_time(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Date and minute of an ISO-8601 timestamp; unparseable input is returned as-is
pub fn format_datetime(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| value.to_string())
}
