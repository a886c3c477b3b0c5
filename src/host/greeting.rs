//! Greeting service behind the built-in `hello` command.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use super::HostSettings;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Formats greetings using the `Greeting:Prefix` setting.
pub struct GreetingService {
    clock: Arc<dyn Clock>,
    prefix: String,
}

impl GreetingService {
    pub const DEFAULT_PREFIX: &'static str = "Hello";

    pub fn new(clock: Arc<dyn Clock>, settings: &HostSettings) -> Self {
        let prefix = settings
            .get("Greeting:Prefix")
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(Self::DEFAULT_PREFIX)
            .to_string();
        Self { clock, prefix }
    }

    /// `"{prefix}, {name}! (UTC: {timestamp})"`; a blank name greets `world`.
    pub fn format_greeting(&self, name: Option<&str>) -> String {
        let who = name.map(str::trim).filter(|name| !name.is_empty()).unwrap_or("world");
        let now = self.clock.now_utc().to_rfc3339_opts(SecondsFormat::Micros, true);
        format!("{}, {who}! (UTC: {now})", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
        }
    }

    #[test]
    fn test_default_prefix_and_name() {
        let service = GreetingService::new(Arc::new(FixedClock), &HostSettings::new());
        assert_eq!(
            service.format_greeting(None),
            "Hello, world! (UTC: 2024-05-01T12:30:00.000000Z)"
        );
        assert!(service.format_greeting(Some("  ")).starts_with("Hello, world!"));
    }

    #[test]
    fn test_configured_prefix() {
        let mut settings = HostSettings::new();
        settings.set("greeting:prefix", "Howdy");
        let service = GreetingService::new(Arc::new(FixedClock), &settings);
        assert!(service.format_greeting(Some(" Ada ")).starts_with("Howdy, Ada! (UTC: 2024-05-01"));
    }
}
