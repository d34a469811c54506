//! The Eurostat query this crate reports on.
//!
//! The dataset is `nama_10_gdp` (GDP and main components). The endpoint takes repeated keys
//! instead of comma-separated lists, so every value gets its own `key=value` pair.

/// Chain-linked volumes (2005), million euro, for the Netherlands and Germany, 2010 to 2012.
pub const GDP_QUERY_URL: &str = concat!(
    "http://ec.europa.eu/eurostat/wdds/rest/data/v2.1/json/en",
    "/nama_10_gdp?precision=1",
    "&unit=CLV05_MEUR",                 // Unit: CLV (2005) Million EUR
    "&geo=NL&geo=DE",                   // Country: Netherlands, Germany
    "&time=2010&time=2011&time=2012",   // Years: 2010, 2011, 2012
    "&na_item=B1GQ&na_item=D21",        // GDP (market prices) & taxes on products
);

/// The URL of the GDP query, verbatim. No escaping is applied.
pub fn gdp_query_url() -> &'static str {
    GDP_QUERY_URL
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{gdp_query_url, GDP_QUERY_URL};

    #[test]
    fn test_exact_url() {
        assert_eq!(
            gdp_query_url(),
            "http://ec.europa.eu/eurostat/wdds/rest/data/v2.1/json/en/nama_10_gdp?precision=1&unit=CLV05_MEUR&geo=NL&geo=DE&time=2010&time=2011&time=2012&na_item=B1GQ&na_item=D21"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(gdp_query_url(), gdp_query_url());
        assert_eq!(gdp_query_url(), GDP_QUERY_URL);
    }

    #[test]
    fn test_repeated_keys_are_distinct_entries() {
        let entries: Vec<&str> = GDP_QUERY_URL.split_once('?').unwrap().1.split('&').collect();

        for expected in &[
            "geo=NL",
            "geo=DE",
            "time=2010",
            "time=2011",
            "time=2012",
            "na_item=B1GQ",
            "na_item=D21",
        ] {
            assert_eq!(entries.iter().filter(|e| *e == expected).count(), 1, "{}", expected);
        }

        assert!(!entries.iter().any(|e| e.contains(',')));
    }

    #[test]
    fn test_url_parses_with_repeated_pairs() {
        let url = Url::parse(GDP_QUERY_URL).unwrap();
        assert_eq!(url.host_str(), Some("ec.europa.eu"));
        assert_eq!(url.path(), "/eurostat/wdds/rest/data/v2.1/json/en/nama_10_gdp");

        let geo: Vec<_> = url.query_pairs().filter(|(k, _)| k == "geo").map(|(_, v)| v.into_owned()).collect();
        assert_eq!(geo, ["NL", "DE"]);

        let na_item: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "na_item")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(na_item, ["B1GQ", "D21"]);
    }
}
