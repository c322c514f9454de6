use alertmark::alert::AlertType;
use alertmark::escape::escape_html;
use alertmark::{to_html, Pipeline};
use proptest::prelude::*;

/// Markdown-ish input: alert markers, containers, delimiters, no raw `<`.
fn markdown() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(":::info".to_string()),
            Just(":::spoiler t".to_string()),
            Just(":::".to_string()),
            Just("> ".to_string()),
            Just("- ".to_string()),
            Just("    ".to_string()),
            Just("\n".to_string()),
            Just("\n\n".to_string()),
            "[a-z *_`\\[\\]()&;#!\\\\]{1,12}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn type_name() -> impl Strategy<Value = String> {
    (0..AlertType::ALL.len(), any::<bool>()).prop_map(|(i, upper)| {
        let name = AlertType::ALL[i].as_str();
        if upper { name.to_ascii_uppercase() } else { name.to_string() }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rendering_is_deterministic(input in markdown()) {
        let pipeline = Pipeline::default();
        let doc = pipeline.parse(&input);
        prop_assert_eq!(pipeline.render(&doc), pipeline.render(&doc));
        prop_assert_eq!(to_html(&input), to_html(&input));
    }

    #[test]
    fn alert_markup_is_balanced(input in markdown()) {
        let out = to_html(&input);
        let opens = out.matches("<div class=\"alert").count() + out.matches("<details").count();
        let closes = out.matches("</div>").count() + out.matches("</details>").count();
        prop_assert_eq!(opens, closes);
    }

    #[test]
    fn known_types_match(name in type_name()) {
        let out = to_html(&format!(":::{name}\nbody\n:::"));
        let class = format!("alert alert-{}", name.to_ascii_lowercase());
        prop_assert!(out.contains(&class), "{}", out);
        prop_assert!(out.contains("<p>body</p>"));
    }

    #[test]
    fn unknown_types_never_match(name in "[a-zA-Z]{1,12}") {
        prop_assume!(AlertType::parse(&name).is_none());
        let input = format!(":::{name}\nbody\n:::");
        prop_assert_eq!(to_html(&input), format!("<p>{input}</p>\n"));
    }

    #[test]
    fn spoiler_title_escaped_once(title in "[ -~]{0,40}") {
        let out = to_html(&format!(":::spoiler {title}\nx\n:::"));
        let words = title.split_whitespace().collect::<Vec<_>>().join(" ");
        let expected = if words.is_empty() {
            "Spoiler".to_string()
        } else {
            escape_html(&words).into_owned()
        };
        let summary = format!("<summary>{expected}</summary>\n");
        prop_assert!(out.contains(&summary), "{}", out);
    }
}
