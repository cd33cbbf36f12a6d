use std::time::Duration;

/// Parse the ISO-8601 durations the Data API reports, e.g. `PT1H2M3S`.
///
/// Day components are accepted; year, month and week components are not,
/// and neither are fractional values.
pub fn parse_iso8601_duration(text: &str) -> Option<Duration> {
    let rest = text.trim().strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut seconds = 0u64;
    let mut any = false;

    for (value, unit) in components(date)? {
        match unit {
            'D' => seconds += value * 86_400,
            _ => return None,
        }
        any = true;
    }

    if let Some(time) = time {
        if time.is_empty() {
            return None;
        }
        for (value, unit) in components(time)? {
            match unit {
                'H' => seconds += value * 3_600,
                'M' => seconds += value * 60,
                'S' => seconds += value,
                _ => return None,
            }
            any = true;
        }
    }

    any.then(|| Duration::from_secs(seconds))
}

fn components(text: &str) -> Option<Vec<(u64, char)>> {
    let mut parts = Vec::new();
    let mut digits = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            parts.push((digits.parse().ok()?, c));
            digits.clear();
        }
    }

    digits.is_empty().then_some(parts)
}
