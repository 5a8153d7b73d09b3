//! Plain-text views of markdown bodies
//!
//! Nothing here produces HTML; the external generator owns rendering.

use lazy_static::lazy_static;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

lazy_static! {
    static ref SUMMARY_DIVIDER: Regex = Regex::new(r"<!--\s*more\s*-->").unwrap();
}

/// Words per minute used for reading-time estimates
const WORDS_PER_MINUTE: usize = 213;

/// Extract the prose text of a markdown document
pub fn plain_text(markdown: &str) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH,
    );

    let mut text = String::new();
    for event in parser {
        match event {
            Event::Text(t) | Event::Code(t) => {
                text.push_str(&t);
            }
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::Item | Tag::CodeBlock(_))
            | Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock) => {
                text.push('\n')
            }
            _ => {}
        }
    }
    text
}

/// Count words in a markdown body.
///
/// Each CJK character counts as one word; other text is split on
/// whitespace.
pub fn word_count(markdown: &str) -> usize {
    let text = plain_text(markdown);
    let mut count = 0;
    for token in text.split_whitespace() {
        let mut in_word = false;
        for c in token.chars() {
            if is_cjk(c) {
                count += 1;
                in_word = false;
            } else if !in_word {
                count += 1;
                in_word = true;
            }
        }
    }
    count
}

/// Estimated reading time in whole minutes, never below one
pub fn reading_time(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Split the summary (before `<!--more-->`) from the rest of the body
pub fn split_summary(content: &str) -> (Option<&str>, &str) {
    match SUMMARY_DIVIDER.find(content) {
        Some(m) => (Some(content[..m.start()].trim()), content[m.end()..].trim()),
        None => (None, content),
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}'   // kana
        | '\u{3400}'..='\u{4dbf}' // CJK extension A
        | '\u{4e00}'..='\u{9fff}' // CJK unified
        | '\u{ac00}'..='\u{d7af}' // hangul
        | '\u{f900}'..='\u{faff}')
}
