//! Synthetic inputs shared by benchmarks and size-sensitive tests.

pub const BLOCK_TEMPLATE: &str =
    "<div class=box><span>hello &amp; bye&#33;</span><img src=x><br/></div>\n";

pub fn make_blocks(blocks: usize) -> String {
    let mut markup = String::with_capacity(BLOCK_TEMPLATE.len() * blocks);
    for _ in 0..blocks {
        markup.push_str(BLOCK_TEMPLATE);
    }
    markup
}

/// A script body full of near-miss close tags.
pub fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri<pt");
    }
    body.push_str("</script>");
    body
}
