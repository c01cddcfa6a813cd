use super::{Token, TokenizeResult, Tokenizer, tokenize};

fn start(name: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> Token {
    Token::StartTag {
        name: name.to_string(),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect(),
        self_closing,
    }
}

fn end(name: &str) -> Token {
    Token::EndTag {
        name: name.to_string(),
    }
}

fn text(s: &str) -> Token {
    Token::Text(s.to_string())
}

/// Merge adjacent text runs so chunked and whole-input runs compare equal.
fn coalesce(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Token::Text(next) = &token
            && let Some(Token::Text(prev)) = out.last_mut()
        {
            prev.push_str(next);
            continue;
        }
        out.push(token);
    }
    out
}

fn tokenize_chunks(chunks: &[&str]) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    let mut out = Vec::new();
    for chunk in chunks {
        tokenizer.push_str(chunk);
        out.extend(tokenizer.next_batch());
    }
    assert_eq!(tokenizer.finish(), TokenizeResult::Finished);
    out.extend(tokenizer.next_batch());
    out
}

#[test]
fn tokenizes_tags_text_and_references() {
    assert_eq!(
        tokenize("<p class=intro>Hi &amp; bye&#33;</p>"),
        vec![
            start("p", &[("class", Some("intro"))], false),
            text("Hi "),
            Token::EntityRef("amp".to_string()),
            text(" bye"),
            Token::NumericRef("33".to_string()),
            end("p"),
        ]
    );
}

#[test]
fn lowercases_tag_names() {
    assert_eq!(
        tokenize("<DiV ID=x></DIV>"),
        vec![start("div", &[("id", Some("x"))], false), end("div")]
    );
}

#[test]
fn void_tags_are_not_marked_self_closing_by_the_tokenizer() {
    assert_eq!(
        tokenize("<br><br/>"),
        vec![start("br", &[], false), start("br", &[], true)]
    );
}

#[test]
fn references_end_at_semicolon_or_first_foreign_byte() {
    assert_eq!(
        tokenize("&copy 2024 &#169<b>"),
        vec![
            Token::EntityRef("copy".to_string()),
            text(" 2024 "),
            Token::NumericRef("169".to_string()),
            start("b", &[], false),
        ]
    );
}

#[test]
fn numeric_reference_payload_is_passed_through_unvalidated() {
    assert_eq!(
        tokenize("&#xZZ;&#X41;"),
        vec![
            Token::NumericRef("xZZ".to_string()),
            Token::NumericRef("X41".to_string()),
        ]
    );
}

#[test]
fn stray_ampersands_and_angle_brackets_are_text() {
    assert_eq!(
        coalesce(tokenize("a & b < c &#; d")),
        vec![text("a & b < c &#; d")]
    );
}

#[test]
fn comments_doctype_and_processing_instructions() {
    assert_eq!(
        tokenize("<!DOCTYPE html><!-- note --><?xml version=\"1.0\"?><![CDATA[x]]>"),
        vec![
            Token::Doctype("html".to_string()),
            Token::Comment(" note ".to_string()),
            Token::ProcessingInstruction("xml version=\"1.0\"?".to_string()),
            Token::Comment("[CDATA[x]]".to_string()),
        ]
    );
}

#[test]
fn nameless_end_tags_are_dropped() {
    assert_eq!(tokenize("a</>b</ x>c"), vec![text("a"), text("b"), text("c")]);
}

#[test]
fn script_body_is_raw_text() {
    assert_eq!(
        tokenize("<script>if (a < b && c) {}</ScRiPt >x"),
        vec![
            start("script", &[], false),
            text("if (a < b && c) {}"),
            end("script"),
            text("x"),
        ]
    );
}

#[test]
fn style_near_match_does_not_close_raw_text() {
    assert_eq!(
        coalesce(tokenize("<style>a</styles>b</style>")),
        vec![start("style", &[], false), text("a</styles>b"), end("style")]
    );
}

#[test]
fn self_closing_script_does_not_enter_raw_text() {
    assert_eq!(
        tokenize("<script src=a.js /><b>"),
        vec![
            start("script", &[("src", Some("a.js"))], true),
            start("b", &[], false),
        ]
    );
}

#[test]
fn incomplete_construct_waits_for_more_input() {
    let mut tokenizer = Tokenizer::new();
    assert_eq!(tokenizer.push_str("hi <di"), TokenizeResult::Progress);
    assert_eq!(tokenizer.next_batch(), vec![text("hi ")]);
    assert_eq!(tokenizer.pending_len(), 3);
    assert_eq!(tokenizer.push_str("v"), TokenizeResult::NeedMoreInput);
    assert!(tokenizer.next_batch().is_empty());
    assert_eq!(tokenizer.push_str(">"), TokenizeResult::Progress);
    assert_eq!(tokenizer.next_batch(), vec![start("div", &[], false)]);
    assert_eq!(tokenizer.pending_len(), 0);
}

#[test]
fn multi_line_constructs_resume_their_terminator_search() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.push_str("<!-- line one\n");
    tokenizer.push_str("line two -");
    assert_eq!(tokenizer.scanned, tokenizer.pending_len());
    assert!(tokenizer.next_batch().is_empty());
    tokenizer.push_str("->after");
    assert_eq!(
        tokenizer.next_batch(),
        vec![
            Token::Comment(" line one\nline two ".to_string()),
            text("after")
        ]
    );
    assert_eq!(tokenizer.scanned, 0);

    let tokens = tokenize_chunks(&["<a title=\"x >\n", "y\" href", "=/z\n", ">t</a\n", ">"]);
    assert_eq!(
        tokens,
        vec![
            start("a", &[("title", Some("x >\ny")), ("href", Some("/z"))], false),
            text("t"),
            end("a"),
        ]
    );
}

#[test]
fn finish_emits_incomplete_trailing_construct_as_text() {
    assert_eq!(tokenize("a <b"), vec![text("a "), text("<b")]);
    assert_eq!(tokenize("AT&T"), vec![text("AT"), text("&T")]);
    assert_eq!(tokenize("x&#6"), vec![text("x"), text("&#6")]);
    assert_eq!(tokenize("<!-- open"), vec![text("<!-- open")]);
}

#[test]
fn unterminated_script_keeps_body_as_text() {
    assert_eq!(
        coalesce(tokenize("<script>let a = 1; </scr")),
        vec![start("script", &[], false), text("let a = 1; </scr")]
    );
}

#[test]
fn every_two_chunk_split_matches_single_chunk() {
    let cases = [
        "<html><body>Hi &amp; bye<br></body></html>",
        "<p title=\"a > b\" data-x='1'>x&#x26;y&#38;z</p>",
        "<!DOCTYPE html><!-- c --><?pi?><a href=/x>&nbsp;</a>",
        "<script>if (a</b) {}</script><style>p{}</style >",
        "caf\u{e9} \u{1F600} <em>\u{3c0}</em>",
        "&copy 1 &#169 <br/> < & ",
    ];
    for input in cases {
        let whole = coalesce(tokenize(input));
        for (split, _) in input.char_indices().skip(1) {
            let chunked = coalesce(tokenize_chunks(&[&input[..split], &input[split..]]));
            assert_eq!(whole, chunked, "split at {split} of {input:?}");
        }
    }
}

#[test]
fn one_char_chunks_match_single_chunk() {
    let input = "<div class=\"a b\">x &lt; y<img src=\"i.png\"/>&#60;</div>";
    let chars: Vec<String> = input.chars().map(String::from).collect();
    let chunks: Vec<&str> = chars.iter().map(String::as_str).collect();
    assert_eq!(coalesce(tokenize(input)), coalesce(tokenize_chunks(&chunks)));
}

#[test]
fn buffer_only_keeps_unconsumed_suffix() {
    let mut tokenizer = Tokenizer::new();
    for _ in 0..1_000 {
        tokenizer.push_str("<p>some text</p>");
    }
    tokenizer.push_str("<p");
    assert_eq!(tokenizer.pending_len(), 2);
    assert_eq!(tokenizer.next_batch().len(), 3_000);
    assert!(tokenizer.stats().tokens_emitted >= 3_000);
}

#[test]
#[should_panic(expected = "after finish")]
fn push_after_finish_is_rejected() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.finish();
    tokenizer.push_str("<p>");
}
