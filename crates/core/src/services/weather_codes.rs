//! WMO weather code table (Open-Meteo).
//!
//! Italian descriptions plus OpenWeatherMap-style icon stems. Codes without an
//! icon stem fall back to the clear-sky icon.

struct WeatherCode {
    code: i64,
    description: &'static str,
    icon: Option<&'static str>,
}

const fn entry(code: i64, description: &'static str, icon: Option<&'static str>) -> WeatherCode {
    WeatherCode {
        code,
        description,
        icon,
    }
}

/// Sorted by code.
const WEATHER_CODES: &[WeatherCode] = &[
    entry(0, "Cielo sereno", Some("01")),
    entry(1, "Prevalentemente sereno", Some("02")),
    entry(2, "Parzialmente nuvoloso", Some("03")),
    entry(3, "Nuvoloso", Some("04")),
    entry(45, "Nebbia", Some("50")),
    entry(48, "Nebbia ghiacciata", Some("50")),
    entry(51, "Pioviggine leggera", Some("09")),
    entry(53, "Pioviggine moderata", Some("09")),
    entry(55, "Pioviggine intensa", Some("09")),
    entry(56, "Pioviggine ghiacciata leggera", None),
    entry(57, "Pioviggine ghiacciata intensa", None),
    entry(61, "Pioggia leggera", Some("10")),
    entry(63, "Pioggia moderata", Some("10")),
    entry(65, "Pioggia intensa", Some("10")),
    entry(66, "Pioggia ghiacciata leggera", None),
    entry(67, "Pioggia ghiacciata intensa", None),
    entry(71, "Neve leggera", Some("13")),
    entry(73, "Neve moderata", Some("13")),
    entry(75, "Neve intensa", Some("13")),
    entry(77, "Granuli di neve", None),
    entry(80, "Rovesci leggeri", Some("09")),
    entry(81, "Rovesci moderati", Some("09")),
    entry(82, "Rovesci intensi", Some("09")),
    entry(85, "Rovesci di neve leggeri", None),
    entry(86, "Rovesci di neve intensi", None),
    entry(95, "Temporale", Some("11")),
    entry(96, "Temporale con grandine leggera", None),
    entry(99, "Temporale con grandine intensa", None),
];

const UNKNOWN_DESCRIPTION: &str = "Condizioni sconosciute";
const FALLBACK_ICON: &str = "01";

fn lookup(code: i64) -> Option<&'static WeatherCode> {
    WEATHER_CODES
        .binary_search_by_key(&code, |c| c.code)
        .ok()
        .map(|i| &WEATHER_CODES[i])
}

/// Human-readable description of a weather code.
#[must_use]
pub fn describe(code: i64) -> &'static str {
    lookup(code).map_or(UNKNOWN_DESCRIPTION, |c| c.description)
}

/// Icon id for a weather code, `d` or `n` variant.
#[must_use]
pub fn icon(code: i64, is_day: bool) -> String {
    let stem = lookup(code).and_then(|c| c.icon).unwrap_or(FALLBACK_ICON);
    let suffix = if is_day { 'd' } else { 'n' };
    format!("{stem}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(WEATHER_CODES.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(describe(0), "Cielo sereno");
        assert_eq!(icon(0, true), "01d");
        assert_eq!(icon(0, false), "01n");
        assert_eq!(describe(63), "Pioggia moderata");
        assert_eq!(icon(63, false), "10n");
        assert_eq!(icon(95, true), "11d");
    }

    #[test]
    fn test_codes_without_icon_use_fallback() {
        assert_eq!(describe(77), "Granuli di neve");
        assert_eq!(icon(77, true), "01d");
        assert_eq!(icon(99, false), "01n");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(describe(42), "Condizioni sconosciute");
        assert_eq!(icon(42, true), "01d");
        assert_eq!(icon(-1, false), "01n");
    }
}
