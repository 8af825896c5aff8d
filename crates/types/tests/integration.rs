//! Integration tests for types

#[cfg(test)]
mod tests {
    use imgsweep_types::*;
    use proptest::prelude::*;

    #[test]
    fn test_output_format_default() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt, OutputFormat::Tty);
    }

    #[test]
    fn test_color_choice_serialization() {
        let json = serde_json::to_string(&ColorChoice::Never).unwrap();
        assert_eq!(json, r#""never""#);
    }

    #[test]
    fn test_reference_set_is_unique_and_sorted() {
        let mut refs = ReferenceSet::new();
        assert!(refs.insert("images/b.png"));
        assert!(refs.insert("images/a.png"));
        assert!(!refs.insert("images/b.png"));
        assert_eq!(refs.len(), 2);
        assert_eq!(
            refs.into_sorted_vec(),
            vec!["images/a.png".to_string(), "images/b.png".to_string()]
        );
    }

    #[test]
    fn test_report_serializes_stage_names() {
        let json = serde_json::to_string(&SweepStage::ExtractReferences).unwrap();
        assert_eq!(json, r#""extract_references""#);
    }

    proptest! {
        #[test]
        fn image_extension_match_ignores_case(stem in "[a-z0-9_]{1,12}", upper in any::<bool>()) {
            let ext = if upper { "PNG" } else { "png" };
            let path = format!("notes/{stem}.{ext}");
            prop_assert!(ExtensionSet::images().matches(&path));
        }

        #[test]
        fn entry_name_is_last_segment(dir in "[a-z]{1,8}", stem in "[a-z]{1,8}") {
            let entry = TreeEntry::from_relative(format!("{dir}/{stem}.gif"));
            prop_assert_eq!(entry.parent(), dir.as_str());
            prop_assert_eq!(entry.name, format!("{stem}.gif"));
        }
    }
}
