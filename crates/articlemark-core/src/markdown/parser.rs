//! Markdown parsing using the grammar table
//!
//! The parser walks a cursor through the text. Everything between the cursor
//! and the next grammar match becomes a `Text` element, the match is turned
//! into its element, and compound elements recurse into their content.

use super::elements::{Element, Fence, MarkdownText};
use super::error::{GrammarError, ScanError};
use super::grammar::{grammar, line_end, Grammar, Rule, RuleMatch};

/// Nesting depth past which content is kept as literal text
pub const MAX_NESTING_DEPTH: usize = 32;

/// Length of the triple-backtick fence
const FENCE_LEN: usize = 3;

/// Parse markdown text into structured elements
pub fn parse(source: &str) -> Result<MarkdownText<'_>, GrammarError> {
    let grammar = grammar()?;
    let elements = find_elements(grammar, source, 0)?;
    Ok(MarkdownText::new(elements))
}

/// Parse optional markdown text; absent input is an empty document
pub fn parse_optional(source: Option<&str>) -> Result<MarkdownText<'_>, GrammarError> {
    match source {
        Some(source) => parse(source),
        None => Ok(MarkdownText::default()),
    }
}

fn find_elements<'a>(
    grammar: &Grammar,
    text: &'a str,
    depth: usize,
) -> Result<Vec<Element<'a>>, GrammarError> {
    let mut elements = Vec::new();
    let mut cursor = 0;

    while cursor < text.len() {
        let found = match grammar.next_match(text, cursor) {
            Ok(Some(found)) => found,
            Ok(None) => break,
            Err(ScanError::Grammar(e)) => return Err(e),
            Err(ScanError::Engine { offset, source }) => {
                // keep the failing line literal and go on with the next
                let end = line_end(text, offset);
                tracing::warn!(
                    error = %source,
                    offset,
                    "Markdown scan gave up on a line, keeping it as text"
                );
                elements.push(Element::Text {
                    text: &text[cursor..end],
                });
                cursor = end;
                continue;
            }
        };

        // everything before the match is plain text
        if cursor < found.start {
            elements.push(Element::Text {
                text: &text[cursor..found.start],
            });
        }

        build_element(grammar, found, depth, &mut elements)?;
        cursor = found.end;
    }

    if cursor < text.len() {
        elements.push(Element::Text {
            text: &text[cursor..],
        });
    }

    Ok(elements)
}

/// Parse the content of a compound element one level deeper
fn find_children<'a>(
    grammar: &Grammar,
    content: &'a str,
    depth: usize,
) -> Result<Vec<Element<'a>>, GrammarError> {
    let depth = depth + 1;
    if depth < MAX_NESTING_DEPTH {
        return find_elements(grammar, content, depth);
    }

    tracing::debug!(depth, "Markdown nesting too deep, keeping content as text");
    if content.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![Element::Text { text: content }])
    }
}

fn build_element<'a>(
    grammar: &Grammar,
    found: RuleMatch<'a>,
    depth: usize,
    elements: &mut Vec<Element<'a>>,
) -> Result<(), GrammarError> {
    let matched = found.text;

    let element = match found.rule {
        Rule::UnorderedListItem => {
            // text without "* "
            let text = &matched[2..];
            Element::UnorderedListItem {
                text,
                children: find_children(grammar, text, depth)?,
            }
        }
        Rule::Header => {
            let level = matched.bytes().take_while(|b| *b == b'#').count();
            let text = &matched[level + 1..];
            Element::Header {
                level: level as u8,
                text,
                children: find_children(grammar, text, depth)?,
            }
        }
        Rule::Quote => {
            let text = &matched[2..];
            Element::Quote {
                text,
                children: find_children(grammar, text, depth)?,
            }
        }
        Rule::Italic => {
            let text = strip(matched, 1);
            Element::Italic {
                text,
                children: find_children(grammar, text, depth)?,
            }
        }
        Rule::Bold => {
            let text = strip(matched, 2);
            Element::Bold {
                text,
                children: find_children(grammar, text, depth)?,
            }
        }
        Rule::Strike => {
            let text = strip(matched, 2);
            Element::Strike {
                text,
                children: find_children(grammar, text, depth)?,
            }
        }
        Rule::HorizontalRule => Element::Rule { text: matched },
        Rule::InlineCode => Element::InlineCode {
            text: strip(matched, 1),
        },
        Rule::Link => {
            let parts = grammar.split_link(matched)?;
            Element::Link {
                url: parts.url,
                text: parts.title,
            }
        }
        Rule::OrderedListItem => {
            let dot = matched.find('.').ok_or_else(|| GrammarError::Extraction {
                rule: Rule::OrderedListItem,
                matched: matched.to_string(),
            })?;
            let order = &matched[..=dot];
            // skip the space after the dot
            let text = &matched[dot + 2..];
            Element::OrderedListItem {
                order,
                text,
                children: find_children(grammar, text, depth)?,
            }
        }
        Rule::Image => {
            let parts = grammar.split_image(matched)?;
            Element::Image {
                url: parts.url,
                alt: parts.alt,
                title: parts.title,
            }
        }
        Rule::BlockCode => {
            push_block_code(strip(matched, FENCE_LEN), elements);
            return Ok(());
        }
    };

    elements.push(element);
    Ok(())
}

/// Remove `count` delimiter bytes from both ends
fn strip(matched: &str, count: usize) -> &str {
    &matched[count..matched.len() - count]
}

/// Split the inside of a fenced block into per-line elements.
///
/// Every line but the last keeps its `\n` so the lines concatenate back to
/// the fenced content.
fn push_block_code<'a>(content: &'a str, elements: &mut Vec<Element<'a>>) {
    if !content.contains('\n') {
        elements.push(Element::BlockCode {
            fence: Fence::Single,
            text: content,
        });
        return;
    }

    let mut line_start = 0;
    let mut fence = Fence::Start;
    for (idx, _) in content.match_indices('\n') {
        elements.push(Element::BlockCode {
            fence,
            text: &content[line_start..=idx],
        });
        line_start = idx + 1;
        fence = Fence::Middle;
    }
    elements.push(Element::BlockCode {
        fence: Fence::End,
        text: &content[line_start..],
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::clear;
    use indoc::indoc;

    fn text(text: &str) -> Element<'_> {
        Element::Text { text }
    }

    fn parse_ok(source: &str) -> Vec<Element<'_>> {
        parse(source).unwrap().elements
    }

    fn clear_ok(source: &str) -> String {
        clear(Some(source)).unwrap().unwrap_or_default()
    }

    /// Bytes of markup each element removed from its source
    fn delimiter_len(element: &Element<'_>) -> usize {
        match element {
            // the rule marker is kept as text
            Element::Text { .. } | Element::Rule { .. } => 0,
            Element::InlineCode { .. } => 2,
            Element::UnorderedListItem { .. } | Element::Quote { .. } => 2,
            Element::OrderedListItem { order, .. } => order.len() + 1,
            Element::Header { level, .. } => *level as usize + 1,
            Element::Italic { .. } => 2,
            Element::Bold { .. } | Element::Strike { .. } => 4,
            Element::Link { url, .. } => 4 + url.len(),
            // `![` `](` `)` around alt and url, ` "` `"` around the title
            Element::Image { url, alt, title } => {
                5 + alt.map_or(0, str::len) + url.len() + if title.is_some() { 3 } else { 0 }
            }
            Element::BlockCode { fence, .. } => match fence {
                Fence::Single => 6,
                Fence::Start | Fence::End => 3,
                Fence::Middle => 0,
            },
        }
    }

    /// Source bytes covered by an element
    fn source_len(element: &Element<'_>) -> usize {
        let inner = if element.is_leaf() {
            element.text().len()
        } else {
            element.children().iter().map(source_len).sum()
        };
        inner + delimiter_len(element)
    }

    /// Check that children are ordered, non-overlapping sub-slices
    fn assert_nested(parent: &str, children: &[Element<'_>]) {
        let base = parent.as_ptr() as usize;
        let mut last_end = 0;
        for child in children {
            let child_text = child.text();
            if child_text.is_empty() {
                continue;
            }
            let start = child_text.as_ptr() as usize - base;
            assert!(start >= last_end, "child {child:?} overlaps its sibling");
            assert!(start + child_text.len() <= parent.len());
            last_end = start + child_text.len();
            assert_nested(child_text, child.children());
        }
    }

    fn assert_partition(source: &str) {
        let parsed = parse(source).unwrap();
        let covered: usize = parsed.iter().map(source_len).sum();
        assert_eq!(covered, source.len(), "bytes lost or duplicated in {source:?}");
        assert_nested(source, &parsed.elements);
    }

    #[test]
    fn test_plain_text_is_single_text() {
        assert_eq!(parse_ok("just words"), vec![text("just words")]);
    }

    #[test]
    fn test_empty_and_absent_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse_optional(None).unwrap().is_empty());
        assert_eq!(parse_optional(Some("x")).unwrap().len(), 1);
    }

    #[test]
    fn test_header_levels() {
        assert_eq!(
            parse_ok("# Title"),
            vec![Element::Header {
                level: 1,
                text: "Title",
                children: vec![text("Title")],
            }]
        );
        assert!(matches!(
            parse_ok("###### Title")[0],
            Element::Header { level: 6, text: "Title", .. }
        ));
        assert_eq!(parse_ok("####### Title"), vec![text("####### Title")]);
    }

    #[test]
    fn test_list_items() {
        assert_eq!(
            parse_ok("* item one"),
            vec![Element::UnorderedListItem {
                text: "item one",
                children: vec![text("item one")],
            }]
        );
        assert_eq!(
            parse_ok("1. item"),
            vec![Element::OrderedListItem {
                order: "1.",
                text: "item",
                children: vec![text("item")],
            }]
        );
        assert!(matches!(
            parse_ok("12. twelfth")[0],
            Element::OrderedListItem { order: "12.", text: "twelfth", .. }
        ));
    }

    #[test]
    fn test_list_lines_keep_separators() {
        let elements = parse_ok("- a\n+ b");
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[1], text("\n"));
        assert!(matches!(elements[2], Element::UnorderedListItem { text: "b", .. }));
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            parse_ok("**bold *and italic* text**"),
            vec![Element::Bold {
                text: "bold *and italic* text",
                children: vec![
                    text("bold "),
                    Element::Italic {
                        text: "and italic",
                        children: vec![text("and italic")],
                    },
                    text(" text"),
                ],
            }]
        );
    }

    #[test]
    fn test_strike() {
        assert_eq!(
            parse_ok("a ~~gone~~ b"),
            vec![
                text("a "),
                Element::Strike {
                    text: "gone",
                    children: vec![text("gone")],
                },
                text(" b"),
            ]
        );
    }

    #[test]
    fn test_inline_code_is_not_reparsed() {
        assert_eq!(
            parse_ok("`**not bold**`"),
            vec![Element::InlineCode {
                text: "**not bold**"
            }]
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse_ok("[title](http://example.com)"),
            vec![Element::Link {
                url: "http://example.com",
                text: "title",
            }]
        );
        assert_eq!(
            parse_ok("go [](x) now"),
            vec![text("go "), Element::Link { url: "x", text: "" }, text(" now")]
        );
    }

    #[test]
    fn test_image_with_title() {
        assert_eq!(
            parse_ok(r#"![alt](url "title")"#),
            vec![Element::Image {
                url: "url",
                alt: Some("alt"),
                title: Some("title"),
            }]
        );
    }

    #[test]
    fn test_image_without_alt() {
        assert_eq!(
            parse_ok("![](pic.png)"),
            vec![Element::Image {
                url: "pic.png",
                alt: None,
                title: None,
            }]
        );
    }

    #[test]
    fn test_rule() {
        assert_eq!(parse_ok("---"), vec![Element::Rule { text: "---" }]);
        let elements = parse_ok("above\n___\nbelow");
        assert_eq!(elements[1], Element::Rule { text: "___" });
    }

    #[test]
    fn test_quote_with_nested_header() {
        // inner content gets the whole grammar, block rules included
        let elements = parse_ok("> # Inside");
        let Element::Quote { children, .. } = &elements[0] else {
            panic!("Expected Quote, got {:?}", elements[0]);
        };
        assert!(matches!(children[0], Element::Header { level: 1, text: "Inside", .. }));
    }

    #[test]
    fn test_unmatched_markup_stays_literal() {
        assert_eq!(parse_ok("**unterminated"), vec![text("**unterminated")]);
        assert_eq!(parse_ok("[no url]"), vec![text("[no url]")]);
    }

    #[test]
    fn test_block_code_single_line() {
        assert_eq!(
            parse_ok("```let x = 1;```"),
            vec![Element::BlockCode {
                fence: Fence::Single,
                text: "let x = 1;",
            }]
        );
    }

    #[test]
    fn test_block_code_multi_line() {
        let source = indoc! {"
            ```
            fn main() {
                println!();
            }
            ```"};
        assert_eq!(
            parse_ok(source),
            vec![
                Element::BlockCode {
                    fence: Fence::Start,
                    text: "\n",
                },
                Element::BlockCode {
                    fence: Fence::Middle,
                    text: "fn main() {\n",
                },
                Element::BlockCode {
                    fence: Fence::Middle,
                    text: "    println!();\n",
                },
                Element::BlockCode {
                    fence: Fence::Middle,
                    text: "}\n",
                },
                Element::BlockCode {
                    fence: Fence::End,
                    text: "",
                },
            ]
        );
    }

    #[test]
    fn test_block_code_content_is_literal() {
        let elements = parse_ok("```a\n# not a header\nb```");
        assert_eq!(
            elements,
            vec![
                Element::BlockCode {
                    fence: Fence::Start,
                    text: "a\n",
                },
                Element::BlockCode {
                    fence: Fence::Middle,
                    text: "# not a header\n",
                },
                Element::BlockCode {
                    fence: Fence::End,
                    text: "b",
                },
            ]
        );
    }

    #[test]
    fn test_unterminated_fence_is_not_code() {
        let elements = parse_ok("```\ncode");
        assert!(elements
            .iter()
            .all(|e| !matches!(e, Element::BlockCode { .. })));
        assert_eq!(elements, vec![text("```\ncode")]);
    }

    fn max_depth(element: &Element<'_>) -> usize {
        1 + element.children().iter().map(max_depth).max().unwrap_or(0)
    }

    #[test]
    fn test_depth_cap_keeps_literal_text() {
        let source = format!("{}x", "> ".repeat(MAX_NESTING_DEPTH + 8));
        let parsed = parse(&source).unwrap();
        assert_eq!(max_depth(&parsed.elements[0]), MAX_NESTING_DEPTH + 1);

        let mut innermost = &parsed.elements[0];
        while let Some(child) = innermost.children().first() {
            innermost = child;
        }
        assert_eq!(innermost, &text("> > > > > > > > x"));
        assert_partition(&source);
    }

    #[test]
    fn test_depth_cap_with_nested_emphasis() {
        let emphasis = "**~~_x_~~**";
        let source = format!("{}{emphasis}", "* ".repeat(MAX_NESTING_DEPTH + 8));
        let parsed = parse(&source).unwrap();
        assert_eq!(max_depth(&parsed.elements[0]), MAX_NESTING_DEPTH + 1);

        let mut innermost = &parsed.elements[0];
        while let Some(child) = innermost.children().first() {
            innermost = child;
        }
        assert_eq!(innermost, &text(&source[2 * MAX_NESTING_DEPTH..]));
        assert_partition(&source);

        // emphasis itself runs into the cap just below it
        for lists in MAX_NESTING_DEPTH - 4..MAX_NESTING_DEPTH {
            let source = format!("{}{emphasis}", "* ".repeat(lists));
            let parsed = parse(&source).unwrap();
            assert!(max_depth(&parsed.elements[0]) <= MAX_NESTING_DEPTH + 1);
            assert!(clear_ok(&source).contains('x'));
            assert_partition(&source);
        }
    }

    #[test]
    fn test_repeated_emphasis_openers() {
        // a lazy closer ends each run at the next marker, so nothing stacks
        for opener in ["~~a ", "**a ", "__a "] {
            let closer: String = opener.chars().rev().collect();
            let source = format!("{}x{}", opener.repeat(40), closer.repeat(40));
            let parsed = parse(&source).unwrap();
            assert!(parsed
                .iter()
                .all(|element| max_depth(element) <= MAX_NESTING_DEPTH + 1));
            assert_eq!(clear_ok(&source).matches('a').count(), 80);
            assert_partition(&source);
        }
    }

    #[test]
    fn test_long_plain_text_before_markup() {
        let source = format!("{}\n**bold**", "x".repeat(70_000));
        let elements = parse_ok(&source);
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[1], Element::Bold { text: "bold", .. }));

        let line = "plain words here ".repeat(12_000);
        let source = format!("{line}**bold** end");
        assert_eq!(
            parse_ok(&source),
            vec![
                text(&line),
                Element::Bold {
                    text: "bold",
                    children: vec![text("bold")],
                },
                text(" end"),
            ]
        );
    }

    #[test]
    fn test_long_article_keeps_parsing() {
        let source = format!("{}# End\n", "plain words here\n".repeat(20_000));
        let elements = parse_ok(&source);
        assert!(matches!(
            elements.last(),
            Some(Element::Text { text: "\n" })
        ));
        assert!(matches!(
            elements[elements.len() - 2],
            Element::Header { level: 1, text: "End", .. }
        ));
    }

    #[test]
    fn test_crlf_line_ends() {
        assert_eq!(
            parse_ok("a\r\n---\r\nb"),
            vec![text("a\r\n"), Element::Rule { text: "---" }, text("\r\nb")]
        );
        assert_eq!(
            parse_ok("![alt](p.png)\r\nnext"),
            vec![
                Element::Image {
                    url: "p.png",
                    alt: Some("alt"),
                    title: None,
                },
                text("\r\nnext"),
            ]
        );
        assert!(matches!(
            parse_ok("# Title\r\nbody")[0],
            Element::Header { level: 1, text: "Title", .. }
        ));
    }

    #[test]
    fn test_crlf_block_code() {
        let source = "```\r\nlet x;\r\n```\r\nafter";
        assert_eq!(
            parse_ok(source),
            vec![
                Element::BlockCode {
                    fence: Fence::Start,
                    text: "\r\n",
                },
                Element::BlockCode {
                    fence: Fence::Middle,
                    text: "let x;\r\n",
                },
                Element::BlockCode {
                    fence: Fence::End,
                    text: "",
                },
                text("\r\nafter"),
            ]
        );
        assert_partition(source);
    }

    #[test]
    fn test_parse_from_many_threads() {
        let source = "# T\n* **a** [b](c)\n> q ~~s~~\n```\ncode\n```\n1. _x_";
        let expected = parse(source).unwrap();
        let expected_plain = clear_ok(source);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| (parse(source).unwrap(), clear_ok(source))))
                .collect();
            for handle in handles {
                let (parsed, plain) = handle.join().unwrap();
                assert_eq!(parsed, expected);
                assert_eq!(plain, expected_plain);
            }
        });
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "# T\n* **a** [b](c)\n> q ~~s~~";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn test_partition_holds() {
        let samples = [
            "plain",
            "# Header with *italic*\nbody text",
            "* one\n* two **bold**\n1. first\n22. second `code`",
            "> quote with [link](http://a.b) and ~~strike~~",
            "---\n***\n___",
            r#"![alt](img.png "title")"#,
            "![alt](img.png)",
            "```\nfn x() {}\n```\nafter",
            "```one```",
            "**bold *and italic* text** __also__ _it_",
            "nested **a ~~b *c* b~~ a** end",
        ];
        for sample in samples {
            assert_partition(sample);
        }
    }
}
