//! Property tests for evidence extraction

use proptest::prelude::*;
use riskscan_classifier::EvidenceExtractor;

fn paragraph() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ,.&;\\[\\]0-9]{0,200}".prop_map(|s| format!("<p>{}</p>", s)),
        "[a-zA-Zé ]{60,160}".prop_map(|s| format!("<p class=\"x\"><b>{}</b>[1]</p>", s)),
        "[a-z<>/ ]{0,40}",
    ]
}

proptest! {
    #[test]
    fn output_never_exceeds_budget(
        parts in prop::collection::vec(paragraph(), 0..12),
        max_chars in 0usize..1500,
    ) {
        let extractor = EvidenceExtractor::new().unwrap();
        let html = parts.concat();
        let evidence = extractor.extract(&html, max_chars);
        prop_assert!(evidence.char_len() <= max_chars);
    }

    #[test]
    fn markup_without_paragraphs_is_empty(text in "[a-zA-Z0-9 <>/=\"]{0,400}") {
        prop_assume!(!text.to_lowercase().contains("<p"));
        let extractor = EvidenceExtractor::new().unwrap();
        prop_assert!(extractor.extract(&text, 1200).is_empty());
    }

    #[test]
    fn output_has_no_runs_of_whitespace(
        parts in prop::collection::vec(paragraph(), 0..8),
    ) {
        let extractor = EvidenceExtractor::new().unwrap().with_min_segment_chars(0);
        let evidence = extractor.extract(&parts.concat(), 1200);
        prop_assert!(!evidence.as_str().contains("  "));
        prop_assert!(!evidence.as_str().ends_with(' '));
    }
}
