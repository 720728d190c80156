//! Date helper functions (pt-BR)

use chrono::{DateTime, Datelike, TimeZone};

const MONTHS_SHORT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

const MONTHS_LONG: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const WEEKDAYS_SHORT: [&str; 7] = ["dom", "seg", "ter", "qua", "qui", "sex", "sáb"];

const WEEKDAYS_LONG: [&str; 7] = [
    "domingo",
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
];

/// Pattern used in listings and post headers
pub const SHORT_FORMAT: &str = "DD MMM YYYY";

/// Pattern used for "edited at" notes
pub const LONG_FORMAT: &str = "DD MMM YYYY, [às] HH:mm";

/// Format a date using a Moment.js-compatible format string
///
/// Month and weekday names are Brazilian Portuguese. Text inside `[...]` is
/// copied verbatim.
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY") // -> "15 jan 2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let month = date.month0() as usize;
    let weekday = date.weekday().num_days_from_sunday() as usize;

    let mut out = String::new();
    let mut rest = format;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            match rest.find(']') {
                Some(end) => {
                    out.push_str(&rest[1..end]);
                    rest = &rest[end + 1..];
                }
                None => {
                    out.push_str(&rest[1..]);
                    rest = "";
                }
            }
            continue;
        }

        let token = TOKENS.iter().find(|t| rest.starts_with(**t));
        match token {
            Some(&token) => {
                let rendered = match token {
                    "MMMM" => MONTHS_LONG[month].to_string(),
                    "MMM" => MONTHS_SHORT[month].to_string(),
                    "dddd" => WEEKDAYS_LONG[weekday].to_string(),
                    "ddd" => WEEKDAYS_SHORT[weekday].to_string(),
                    other => date.format(chrono_spec(other)).to_string(),
                };
                out.push_str(&rendered);
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Recognized tokens, longest first so that `MMMM` wins over `MM`
const TOKENS: [&str; 15] = [
    "YYYY", "MMMM", "dddd", "DDDD", "MMM", "ddd", "SSS", "YY", "MM", "DD", "HH", "hh", "mm", "ss",
    "ZZ",
];

fn chrono_spec(token: &str) -> &'static str {
    match token {
        "YYYY" => "%Y",
        "YY" => "%y",
        "MM" => "%m",
        "DDDD" => "%j",
        "DD" => "%d",
        "HH" => "%H",
        "hh" => "%I",
        "mm" => "%M",
        "ss" => "%S",
        "SSS" => "%3f",
        "ZZ" => "%z",
        _ => "",
    }
}

/// `15 mar 2021`, in the given timezone
pub fn format_short<Tz: TimeZone>(date: &DateTime<chrono::Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format_date(&date.with_timezone(tz), SHORT_FORMAT)
}

/// `15 mar 2021, às 10:30`, in the given timezone
pub fn format_long<Tz: TimeZone>(date: &DateTime<chrono::Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format_date(&date.with_timezone(tz), LONG_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "DD/MM/YY"), "15/01/24");
        assert_eq!(format_date(&date, "HH:mm:ss"), "10:30:00");
    }

    #[test]
    fn test_localized_names() {
        let date = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        assert_eq!(format_date(&date, "DD MMM YYYY"), "25 mar 2021");
        assert_eq!(format_date(&date, "dddd, DD [de] MMMM"), "quinta-feira, 25 de março");
        assert_eq!(format_date(&date, "ddd"), "qui");
    }

    #[test]
    fn test_literal_text_is_not_tokenized() {
        let date = Utc.with_ymd_and_hms(2021, 2, 1, 8, 5, 0).unwrap();
        assert_eq!(format_date(&date, "[YYYY] YYYY"), "YYYY 2021");
        assert_eq!(format_date(&date, "[unterminated"), "unterminated");
    }

    #[test]
    fn test_short_and_long_use_timezone() {
        let tz: chrono_tz::Tz = "America/Sao_Paulo".parse().unwrap();
        // 02:00 UTC is still the previous evening in São Paulo (UTC-3)
        let date = Utc.with_ymd_and_hms(2021, 3, 19, 2, 0, 0).unwrap();
        assert_eq!(format_short(&date, &tz), "18 mar 2021");
        assert_eq!(format_long(&date, &tz), "18 mar 2021, às 23:00");
        assert_eq!(format_short(&date, &Utc), "19 mar 2021");
    }
}
