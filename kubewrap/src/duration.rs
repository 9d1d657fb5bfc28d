//! kubectl's compact duration notation, e.g. `2h45m` or `3y45d`.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

// Longer spellings come first so `ms` is not read as `m` followed by `s`.
const UNIT: &str = r"ns|µs|us|ms|min|m|sec|s|hr|h|day|d|y";

static PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(\d+)({UNIT})")).expect("valid unit regex"));

static WHOLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^(?:\d+(?:{UNIT}))+$")).expect("valid unit regex"));

static LONG_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(ns|µs|ms|sec|min|hr|day|yr)$").expect("valid unit regex")
});

const DAY: u64 = 24 * 60 * 60;

fn unit_nanos(unit: &str) -> Option<u64> {
    Some(match unit {
        "ns" => 1,
        "µs" => 1_000,
        "ms" => 1_000_000,
        "sec" => 1_000_000_000,
        "min" => 60 * 1_000_000_000,
        "hr" => 60 * 60 * 1_000_000_000,
        "day" => DAY * 1_000_000_000,
        "yr" => 365 * DAY * 1_000_000_000,
        _ => return None,
    })
}

fn long_unit(unit: &str) -> &str {
    match unit {
        "us" | "µs" => "µs",
        "s" | "sec" => "sec",
        "m" | "min" => "min",
        "h" | "hr" => "hr",
        "d" | "day" => "day",
        "y" => "yr",
        other => other,
    }
}

/// Rewrite each pair with its full unit name: `2h45m` becomes `2hr 45min`.
/// `None` unless the whole string is made up of `<integer><unit>` pairs.
pub fn expand_units(s: &str) -> Option<String> {
    if !WHOLE.is_match(s) {
        return None;
    }
    let tokens: Vec<String> = PAIR
        .captures_iter(s)
        .map(|caps| {
            let (_, [count, unit]) = caps.extract();
            format!("{count}{}", long_unit(unit))
        })
        .collect();
    Some(tokens.join(" "))
}

/// Sum of space-separated full-unit tokens, as produced by [`expand_units`].
fn parse_long_form(s: &str) -> Option<Duration> {
    let mut nanos: u64 = 0;
    for token in s.split_whitespace() {
        let caps = LONG_PAIR.captures(token)?;
        let (_, [count, unit]) = caps.extract();
        let count: u64 = count.parse().ok()?;
        nanos = nanos.checked_add(count.checked_mul(unit_nanos(unit)?)?)?;
    }
    Some(Duration::from_nanos(nanos))
}

/// Parse a compact duration by expanding it to full units first. Anything
/// that is not made up entirely of `<integer><unit>` pairs, or that
/// overflows, yields `None`.
pub fn parse_compact(s: &str) -> Option<Duration> {
    parse_long_form(&expand_units(s)?)
}

/// Render a duration in full-unit notation, largest unit first.
pub fn to_long_form(d: Duration) -> String {
    let mut secs = d.as_secs();
    let mut parts = Vec::new();
    let units = [
        (365 * DAY, "yr"),
        (DAY, "day"),
        (3600, "hr"),
        (60, "min"),
        (1, "sec"),
    ];
    for (size, unit) in units {
        if secs >= size {
            parts.push(format!("{}{unit}", secs / size));
            secs %= size;
        }
    }

    let sub = d.subsec_nanos();
    if sub > 0 {
        let (ms, us, ns) = (sub / 1_000_000, sub / 1_000 % 1_000, sub % 1_000);
        for (n, unit) in [(ms, "ms"), (us, "µs"), (ns, "ns")] {
            if n > 0 {
                parts.push(format!("{n}{unit}"));
            }
        }
    }

    if parts.is_empty() {
        "0sec".to_string()
    } else {
        parts.join(" ")
    }
}
