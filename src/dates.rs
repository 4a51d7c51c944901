//! Short, locale-aware date labels for the share image.

use chrono::NaiveDateTime;

/// Produces the date label drawn above the title.
pub trait DateFormatter {
    /// Medium-length label for `date` in `locale` (`en-US`, `ko-KR`, ...).
    fn format_short(&self, date: &NaiveDateTime, locale: &str) -> String;
}

/// Medium-length date patterns keyed by the locale's language subtag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortDateFormatter;

impl ShortDateFormatter {
    fn pattern(locale: &str) -> &'static str {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => "%b %-d, %Y",
            "ko" => "%Y. %-m. %-d.",
            "ja" | "zh" => "%Y/%-m/%-d",
            "de" => "%-d.%-m.%Y",
            "fr" | "es" | "it" => "%d/%m/%Y",
            _ => "%Y-%m-%d",
        }
    }
}

impl DateFormatter for ShortDateFormatter {
    fn format_short(&self, date: &NaiveDateTime, locale: &str) -> String {
        date.format(Self::pattern(locale)).to_string()
    }
}
