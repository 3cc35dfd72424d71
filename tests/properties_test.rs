//! Property tests: idempotence and allow-list closure

use html_bleach::dom::{ParseMode, parse_html};
use html_bleach::filter::filter_style;
use html_bleach::{CleanOptions, LinkifyOptions, Node, Policy, clean, linkify};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Markup pieces that are concatenated into test inputs
const TOKENS: &[&str] = &[
    "text",
    " ",
    "\n",
    "<",
    ">",
    "&",
    "&amp;",
    "&lt;",
    "<em>",
    "</em>",
    "<b>",
    "</b>",
    "<strong>",
    "</strong>",
    "<p>",
    "</p>",
    "<span>",
    "</span>",
    "<em class=\"c\" id=\"i\">",
    "<script>x < y</script>",
    "<style>p { color: red }</style>",
    "<!-- c -->",
    "<a href=\"http://x.com\">l</a>",
    "<a title=\"t\" onclick=\"o()\">l</a>",
    "http://example.com/a",
    "www.test.org.",
    "<br>",
    "<table>",
    "</table>",
    "<tr>",
    "<td>",
    "<li>",
    "</li>",
    "<title>t</title>",
    "<meta charset=\"utf-8\">",
];

fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(TOKENS), 0..24).prop_map(|tokens| tokens.concat())
}

/// Fragment markup, or a document with generated head and body content
fn input_for(options: &CleanOptions, (head, body): &(String, String)) -> String {
    if options.parse_as_fragment {
        format!("{head}{body}")
    } else {
        format!("<html><head>{head}</head><body>{body}</body></html>")
    }
}

fn head_and_body() -> impl Strategy<Value = (String, String)> {
    (markup(), markup())
}

fn clean_options() -> impl Strategy<Value = CleanOptions> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(strip, strip_comments, fragment)| {
        CleanOptions {
            strip,
            strip_comments,
            parse_as_fragment: fragment,
            ..CleanOptions::default()
        }
    })
}

/// Every element in `html` must be allowed, with only allowed attributes
fn assert_allow_list_closed(html: &str, policy: &Policy) -> Result<(), TestCaseError> {
    let parsed = parse_html(html, policy.parse_mode());
    for node in parsed.root.descendants() {
        let element = match node {
            Node::Comment(_) => {
                prop_assert!(!policy.strip_comments(), "comment survived in {:?}", html);
                continue;
            }
            Node::Element(element) => element,
            Node::Document(_) | Node::Text(_) => continue,
        };
        let tag = element.tag();
        prop_assert!(policy.allows_tag(&tag), "unexpected <{}> in {:?}", tag, html);
        for attr in &element.attributes {
            prop_assert!(
                policy.allows_attribute(&tag, &attr.name),
                "unexpected {}={:?} on <{}> in {:?}",
                attr.name,
                attr.value,
                tag,
                html
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn clean_is_idempotent(parts in head_and_body(), options in clean_options()) {
        let once = clean(&input_for(&options, &parts), &options).unwrap();
        let twice = clean(&once, &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clean_output_respects_allow_list(parts in head_and_body(), options in clean_options()) {
        let policy = options.policy().unwrap();
        let out = clean(&input_for(&options, &parts), &options).unwrap();
        assert_allow_list_closed(&out, &policy)?;
    }

    #[test]
    fn fragment_output_has_no_document_skeleton(html in markup()) {
        let out = clean(&html, &CleanOptions::default()).unwrap();
        prop_assert!(!out.contains("<html>") && !out.contains("<body>"));
    }

    #[test]
    fn linkify_is_idempotent(html in markup(), nofollow in any::<bool>(), fragment in any::<bool>()) {
        let options = LinkifyOptions {
            nofollow,
            parse_as_fragment: fragment,
            ..LinkifyOptions::default()
        };
        let once = linkify(&html, &options).unwrap();
        let twice = linkify(&once, &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn style_filter_is_stable(style in "[a-c :;,0-9()-]{0,30}") {
        let policy = CleanOptions {
            styles: vec!["a".into(), "b".into()],
            ..CleanOptions::default()
        }
        .policy()
        .unwrap();
        let once = filter_style(&style, &policy);
        prop_assert_eq!(filter_style(&once, &policy), once.clone());
    }
}

#[test]
fn test_clean_then_linkify_keeps_allow_list() {
    let options = CleanOptions::default();
    let policy = options.policy().unwrap();
    let cleaned = clean(
        "<p onclick=\"x\">see http://example.com and <a href=\"/a\">this</a></p>",
        &options,
    )
    .unwrap();
    let linked = linkify(
        &cleaned,
        &LinkifyOptions {
            nofollow: false,
            ..LinkifyOptions::default()
        },
    )
    .unwrap();
    assert_eq!(
        linked,
        concat!(
            r#"&lt;p onclick="x"&gt;see <a href="http://example.com">http://example.com</a> "#,
            r#"and <a href="/a">this</a>&lt;/p&gt;"#
        )
    );
    let parsed = parse_html(&linked, ParseMode::Fragment);
    for node in parsed.root.descendants() {
        if let Some(el) = node.as_element() {
            assert!(policy.allows_tag(&el.tag()));
        }
    }
}
