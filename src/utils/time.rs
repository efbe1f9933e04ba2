use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Resolve an IANA timezone name. Empty and unparseable names fall back to
/// UTC; the observer profile may legitimately carry no timezone yet.
pub fn resolve_timezone(name: &str) -> Tz {
    if name.is_empty() {
        return Tz::UTC;
    }
    name.parse().unwrap_or_else(|_| {
        log::debug!("unknown timezone '{}', falling back to UTC", name);
        Tz::UTC
    })
}

/// The current instant, carried in the named timezone for date derivation
/// and display.
pub fn current_time_in(name: &str) -> DateTime<Tz> {
    Utc::now().with_timezone(&resolve_timezone(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timezone_falls_back_to_utc() {
        assert_eq!(resolve_timezone(""), Tz::UTC);
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        assert_eq!(resolve_timezone("Mars/Olympus_Mons"), Tz::UTC);
    }

    #[test]
    fn named_timezone_resolves() {
        assert_eq!(resolve_timezone("Asia/Jakarta"), Tz::Asia__Jakarta);
    }
}
