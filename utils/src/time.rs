//! Duration formatting for TTLs and uptime.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render a number of seconds compactly, largest units first, omitting zero
/// parts: `21600` is `6h`, `5400` is `1h 30m`, `0` is `0s`.
pub fn format_duration(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let mut rest = secs;
    let mut parts = Vec::new();
    for (size, suffix) in UNITS {
        let n = rest / size;
        if n > 0 {
            parts.push(format!("{n}{suffix}"));
            rest %= size;
        }
    }
    parts.join(" ")
}
