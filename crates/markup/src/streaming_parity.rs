//! Chunked parsing must build the same document as a single-chunk parse, for
//! every plan the harness produces, whether chunks are `&str` or raw bytes.

use pretty_assertions::assert_eq;

use crate::test_harness::{ChunkPlan, deterministic_chunk_plans, run_chunked, run_full};
use crate::{Document, Element, Node, ParseError, RenderConfig};

const CASES: &[&str] = &[
    "<p>hello</p>",
    "<html><head><title>T</title></head><body><h1>Hi</h1><br><p>x</p></body></html>",
    "<p class=\"a b\" data-n='1' hidden>Tom &amp; Jerry &#38; &#x26; friends</p>",
    "<!DOCTYPE html><!-- lead -->a<?pi x?>b<![CDATA[c]]>d",
    "<script>if (a < b && c > d) { s = \"</p>\"; }</script><style>p > a {}</style>",
    "caf\u{e9} \u{3c0} \u{1F600} <em title=\"\u{e9}\">\u{1F468}\u{200D}\u{1F469}</em>",
    "&copy 2024 &nbsp;&#169 <img src=a.png/> < & trailing <",
    "<ul><li>one<li>two</ul></ul></div>tail",
    "<p>a</br>b</p>x</p>y<script></scr</script >x</script>y",
];

fn assert_parity(input: &str, plan: &ChunkPlan, expected: &Document) {
    let actual = run_chunked(input, plan)
        .unwrap_or_else(|err| panic!("chunked parse failed under {plan}: {err}"));
    assert_eq!(expected, &actual, "input {input:?} under {plan}");
}

#[test]
fn chunked_parse_matches_full_parse() {
    for input in CASES {
        let expected = run_full(input).expect("full parse");
        for plan in deterministic_chunk_plans(input) {
            assert_parity(input, &plan, &expected);
        }
    }
}

#[test]
fn split_inside_start_tag_and_text() {
    let input = "<p>hello</p>";
    let expected = run_full(input).expect("full parse");
    // "<p>hel" + "lo</p>"
    assert_parity(input, &ChunkPlan::boundaries(vec![6]), &expected);

    let mut p = Element::new("p", Vec::new());
    p.append_child(Node::text("hello"));
    assert_eq!(expected.children, vec![Node::from(p)]);
}

#[test]
fn split_inside_references() {
    let input = "x&amp;y&#38;z";
    let expected = run_full(input).expect("full parse");
    assert_eq!(
        expected.children,
        vec![Node::text("x"), Node::entity_ref("amp"), Node::text("y&z")]
    );
    for idx in 1..input.len() {
        assert_parity(input, &ChunkPlan::boundaries(vec![idx]), &expected);
    }
}

#[test]
fn byte_splits_inside_multibyte_characters() {
    let input = "\u{e9}\u{20AC}\u{1F600}";
    let expected = run_full(input).expect("full parse");
    for idx in 1..input.len() {
        assert_parity(input, &ChunkPlan::boundaries_unaligned(vec![idx]), &expected);
    }
    assert_parity(input, &ChunkPlan::fixed_unaligned(1), &expected);
}

#[test]
fn malformed_reference_fails_under_every_plan() {
    let input = "<p>ok &#xD800; never</p>";
    assert!(matches!(
        run_full(input),
        Err(ParseError::MalformedReference { .. })
    ));
    for plan in deterministic_chunk_plans(input) {
        assert!(
            matches!(
                run_chunked(input, &plan),
                Err(ParseError::MalformedReference { .. })
            ),
            "plan {plan}"
        );
    }
}

#[test]
fn home_page_renders_as_served() {
    let input = "<html><body>Hi &amp; bye<br></body></html>";
    for plan in deterministic_chunk_plans(input) {
        let doc = run_chunked(input, &plan).expect("parse");
        assert_eq!(
            doc.to_markup(&RenderConfig::default()),
            "<html><body>Hi &amp; bye<br /></body></html>",
            "plan {plan}"
        );
    }
}
