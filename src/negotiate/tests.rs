//! Tests for content negotiation.

#[cfg(test)]
mod tests {
    use crate::negotiate::{compare_types, negotiate_type, NegotiationList, Quality};

    fn list(entries: &[(&str, u8)]) -> NegotiationList {
        let mut list = NegotiationList::new();
        for (mime_type, tenths) in entries {
            list.insert(mime_type, Quality::new(*tenths).unwrap());
        }
        list
    }

    #[test]
    fn test_parse_browser_accept_header() {
        let list = NegotiationList::parse("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8");

        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), Some(("text/html", Quality::new(10).unwrap())));
        assert_eq!(list.get(1), Some(("application/xhtml+xml", Quality::new(9).unwrap())));
        assert_eq!(list.get(2), Some(("*/*", Quality::new(8).unwrap())));
    }

    #[test]
    fn test_parse_sorts_by_descending_weight() {
        let list = NegotiationList::parse("text/plain;q=0.2, application/json, text/html;q=0.5");

        let types: Vec<_> = list.iter().map(|entry| entry.mime_type()).collect();
        assert_eq!(types, vec!["application/json", "text/html", "text/plain"]);
    }

    #[test]
    fn test_equal_weights_keep_parse_order() {
        let list = NegotiationList::parse("a/a;q=0.5,b/b,c/c;q=0.5,d/d");

        let types: Vec<_> = list.iter().map(|entry| entry.mime_type()).collect();
        assert_eq!(types, vec!["b/b", "d/d", "a/a", "c/c"]);
    }

    #[test]
    fn test_invalid_q_values_default_to_one() {
        let list = NegotiationList::parse("a/a;q=1.5,b/b;q=abc,c/c;q=-0.1,d/d;q=0.3x");

        assert_eq!(list.len(), 4);
        assert!(list.iter().all(|entry| entry.quality() == Quality::MAX));
    }

    #[test]
    fn test_q_value_rounds_to_nearest_tenth() {
        let list = NegotiationList::parse("a/a;q=0.25,b/b;q=0.04,c/c;q=0");

        assert_eq!(list.get(0), Some(("a/a", Quality::new(3).unwrap())));
        assert_eq!(list.get(1), Some(("b/b", Quality::MIN)));
        assert_eq!(list.get(2), Some(("c/c", Quality::MIN)));
    }

    #[test]
    fn test_other_parameters_are_ignored() {
        let list = NegotiationList::parse("text/html; level=1; q=0.7 , text/plain ;charset=utf-8");

        assert_eq!(list.get(0), Some(("text/plain", Quality::MAX)));
        assert_eq!(list.get(1), Some(("text/html", Quality::new(7).unwrap())));
    }

    #[test]
    fn test_blank_tokens_are_skipped() {
        let list = NegotiationList::parse("text/html,, ,text/plain,");
        assert_eq!(list.len(), 2);
        assert!(NegotiationList::parse("").is_empty());
    }

    #[test]
    fn test_compare_types() {
        assert!(compare_types("text/html", "text/html"));
        assert!(compare_types("application/json", "*/*"));
        assert!(!compare_types("text/html", "text/*"));
        assert!(!compare_types("*/*", "text/html"));
    }

    #[test]
    fn test_choose_exact_match() {
        let server = list(&[("text/plain", 10), ("text/html", 10)]);
        let client = list(&[("text/html", 10), ("application/xhtml+xml", 9)]);

        assert_eq!(server.choose(&client), Some("text/html"));
    }

    #[test]
    fn test_choose_wildcard_client() {
        let server = list(&[("application/json", 10)]);
        let client = list(&[("*/*", 10)]);

        assert_eq!(server.choose(&client), Some("application/json"));
    }

    #[test]
    fn test_choose_prefers_highest_score() {
        let server = list(&[("text/html", 10), ("text/turtle", 8)]);
        let client = list(&[("text/turtle", 10), ("text/html", 5)]);

        // text/html scores 50, text/turtle scores 80
        assert_eq!(server.choose(&client), Some("text/turtle"));
    }

    #[test]
    fn test_choose_tie_goes_to_first_server_entry() {
        let server = list(&[("application/rdf+xml", 10), ("text/turtle", 10)]);
        let client = list(&[("text/turtle", 10), ("application/rdf+xml", 10)]);

        assert_eq!(server.choose(&client), Some("application/rdf+xml"));
    }

    #[test]
    fn test_choose_nothing_compatible() {
        let server = list(&[("text/html", 10)]);
        let client = list(&[("image/png", 10)]);

        assert_eq!(server.choose(&client), None);
        assert_eq!(server.choose(&NegotiationList::new()), None);
    }

    #[test]
    fn test_to_string_omits_default_weight() {
        let list = NegotiationList::parse("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8");
        assert_eq!(list.to_string(), "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8");

        let list = NegotiationList::parse("a/a;q=0");
        assert_eq!(list.to_string(), "a/a;q=0.0");
    }

    #[test]
    fn test_negotiate_type() {
        let offered = "text/plain,text/html,application/xhtml+xml";

        assert_eq!(negotiate_type(None, offered, "text/plain"), "text/plain");
        assert_eq!(negotiate_type(Some("  "), offered, "text/plain"), "text/plain");
        assert_eq!(negotiate_type(Some("text/html"), offered, "text/plain"), "text/html");
        assert_eq!(negotiate_type(Some("image/png"), offered, "text/plain"), "text/plain");
    }
}
