use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

pub const TIME_ZONE_COOKIE: &str = "CH-time-zone";

/// Locales with a known short date/time style. Anything else renders as en-US.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    EnUs,
    EnGb,
    DeDe,
    FrFr,
    EsEs,
    NlNl,
    PtBr,
    JaJp,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::DeDe => "de-DE",
            Locale::FrFr => "fr-FR",
            Locale::EsEs => "es-ES",
            Locale::NlNl => "nl-NL",
            Locale::PtBr => "pt-BR",
            Locale::JaJp => "ja-JP",
        }
    }

    /// Exact region match first, then the language's default region
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
        let exact = match tag.as_str() {
            "en-us" => Some(Locale::EnUs),
            "en-gb" => Some(Locale::EnGb),
            "de-de" => Some(Locale::DeDe),
            "fr-fr" => Some(Locale::FrFr),
            "es-es" => Some(Locale::EsEs),
            "nl-nl" => Some(Locale::NlNl),
            "pt-br" => Some(Locale::PtBr),
            "ja-jp" => Some(Locale::JaJp),
            _ => None,
        };
        exact.or_else(|| match tag.split('-').next().unwrap_or_default() {
            "en" => Some(Locale::EnUs),
            "de" => Some(Locale::DeDe),
            "fr" => Some(Locale::FrFr),
            "es" => Some(Locale::EsEs),
            "nl" => Some(Locale::NlNl),
            "pt" => Some(Locale::PtBr),
            "ja" => Some(Locale::JaJp),
            _ => None,
        })
    }

    /// chrono patterns for the "short" date and time styles
    fn patterns(&self) -> (&'static str, &'static str) {
        match self {
            Locale::EnUs => ("%-m/%-d/%y", "%-I:%M %p"),
            Locale::EnGb => ("%d/%m/%Y", "%H:%M"),
            Locale::DeDe => ("%d.%m.%y", "%H:%M"),
            Locale::FrFr => ("%d/%m/%Y", "%H:%M"),
            Locale::EsEs => ("%-d/%-m/%y", "%H:%M"),
            Locale::NlNl => ("%d-%m-%Y", "%H:%M"),
            Locale::PtBr => ("%d/%m/%Y", "%H:%M"),
            Locale::JaJp => ("%Y/%m/%d", "%H:%M"),
        }
    }
}

/// Highest-weighted supported language from `Accept-Language`
pub fn locale(headers: &HeaderMap) -> Locale {
    let Some(header) = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()) else {
        return Locale::EnUs;
    };

    let mut candidates: Vec<(f32, &str)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            // q=0 means "not acceptable"
            (quality > 0.0).then_some((quality, tag))
        })
        .collect();
    // Stable sort keeps header order between equal weights
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    candidates
        .into_iter()
        .find_map(|(_, tag)| Locale::from_tag(tag))
        .unwrap_or(Locale::EnUs)
}

/// IANA zone from the client-hint cookie, UTC when missing or unknown
pub fn time_zone(jar: &CookieJar) -> Tz {
    jar.get(TIME_ZONE_COOKIE)
        .and_then(|c| urlencoding::decode(c.value()).ok().map(|v| v.into_owned()))
        .and_then(|name| name.trim().parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Date and time as separate display parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDateTime {
    pub date: String,
    pub time: String,
}

/// Short date + short time formatting in the user's locale and zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateTimeFormat {
    pub locale: Locale,
    pub time_zone: Tz,
}

impl DateTimeFormat {
    pub fn new(locale: Locale, time_zone: Tz) -> Self {
        Self { locale, time_zone }
    }

    pub fn from_request(headers: &HeaderMap, jar: &CookieJar) -> Self {
        Self::new(locale(headers), time_zone(jar))
    }

    pub fn format(&self, instant: DateTime<Utc>) -> DisplayDateTime {
        let local = instant.with_timezone(&self.time_zone);
        let (date_pattern, time_pattern) = self.locale.patterns();
        DisplayDateTime {
            date: local.format(date_pattern).to_string(),
            time: local.format(time_pattern).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;
    use chrono::TimeZone;

    fn headers(accept_language: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(accept_language).unwrap());
        headers
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 15, 4, 0).unwrap()
    }

    #[test]
    fn picks_highest_quality_supported_locale() {
        assert_eq!(locale(&headers("de-DE,de;q=0.9,en;q=0.8")), Locale::DeDe);
        assert_eq!(locale(&headers("xx-YY, en-GB;q=0.5, fr;q=0.7")), Locale::FrFr);
        assert_eq!(locale(&headers("pt")), Locale::PtBr);
        assert_eq!(locale(&headers("xx-YY, fr;q=0")), Locale::EnUs);
        assert_eq!(locale(&headers("de;q=0.0, nl;q=0.2")), Locale::NlNl);
        assert_eq!(locale(&headers("*")), Locale::EnUs);
        assert_eq!(locale(&HeaderMap::new()), Locale::EnUs);
    }

    #[test]
    fn reads_time_zone_cookie() {
        let jar = CookieJar::new().add(Cookie::new(TIME_ZONE_COOKIE, "Europe%2FBerlin"));
        assert_eq!(time_zone(&jar), chrono_tz::Europe::Berlin);

        let bogus = CookieJar::new().add(Cookie::new(TIME_ZONE_COOKIE, "Mars/Olympus"));
        assert_eq!(time_zone(&bogus), Tz::UTC);
        assert_eq!(time_zone(&CookieJar::new()), Tz::UTC);
    }

    #[test]
    fn formats_us_short_style() {
        let format = DateTimeFormat::new(Locale::EnUs, Tz::UTC);
        assert_eq!(
            format.format(instant()),
            DisplayDateTime { date: "1/5/24".into(), time: "3:04 PM".into() }
        );
    }

    #[test]
    fn formats_in_the_users_zone() {
        let format = DateTimeFormat::new(Locale::DeDe, chrono_tz::Europe::Berlin);
        assert_eq!(
            format.format(instant()),
            DisplayDateTime { date: "05.01.24".into(), time: "16:04".into() }
        );
    }

    #[test]
    fn zone_can_move_the_date() {
        let format = DateTimeFormat::new(Locale::JaJp, chrono_tz::Asia::Tokyo);
        let late = Utc.with_ymd_and_hms(2024, 1, 5, 20, 30, 0).unwrap();
        assert_eq!(
            format.format(late),
            DisplayDateTime { date: "2024/01/06".into(), time: "05:30".into() }
        );
    }
}
