//! Element tree rendering to styled text runs
//!
//! A depth-first walk keeps a stack of active attributes. Every run gets a
//! copy of the stack, so nested styles compose: a bold span inside an italic
//! span renders as a run carrying both.

use serde::Serialize;

use super::elements::{Element, Fence, MarkdownText};
use super::style::{Color, StyleConfig};

/// Text emitted in place of a horizontal rule; the host draws the line
pub const RULE_PLACEHOLDER: &str = " ";

/// A visual attribute applied to a run, resolved from [`StyleConfig`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attribute {
    Bold {
        weight: u16,
    },
    Italic {
        slant: f32,
    },
    Strike {
        thickness: f32,
    },
    Header {
        level: u8,
        scale: f32,
        margin_top: f32,
        margin_bottom: f32,
        color: Color,
    },
    Quote {
        indent: f32,
        bar_width: f32,
        bar_color: Color,
    },
    /// Content of a list item, marker included
    ListItem {
        indent: f32,
    },
    /// The bullet or numeral in front of a list item
    ListMarker {
        color: Color,
    },
    Rule {
        thickness: f32,
        color: Color,
    },
    InlineCode {
        background: Color,
        monospace: bool,
        corner_radius: f32,
    },
    BlockCode {
        fence: Fence,
        background: Color,
        monospace: bool,
    },
    Link {
        color: Color,
        underline: bool,
    },
    ImagePlaceholder {
        width: f32,
        height: f32,
    },
}

/// What activating a run leads to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Link {
        url: String,
    },
    /// Slot for an image the host loads itself
    Image {
        url: String,
        alt: Option<String>,
        title: Option<String>,
    },
}

/// A contiguous piece of text with its resolved attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRun {
    pub text: String,
    /// Outermost first, no duplicates
    pub attributes: Vec<Attribute>,
    pub target: Option<Target>,
}

impl StyledRun {
    pub fn is_plain(&self) -> bool {
        self.attributes.is_empty() && self.target.is_none()
    }

    pub fn has(&self, predicate: impl Fn(&Attribute) -> bool) -> bool {
        self.attributes.iter().any(predicate)
    }
}

/// Tracks a link's position in the rendered text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSpan {
    /// The URL this link points to
    pub url: String,
    /// Start byte offset in [`StyledText::plain`]
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// Rendered markdown with link tracking
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyledText {
    pub runs: Vec<StyledRun>,
    pub links: Vec<LinkSpan>,
}

impl StyledText {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Concatenated text of all runs
    pub fn plain(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Render a parsed document with the given style
pub fn render(markdown: &MarkdownText<'_>, config: &StyleConfig) -> StyledText {
    let mut renderer = Renderer {
        config,
        stack: Vec::new(),
        out: StyledText::default(),
        len: 0,
    };
    for element in markdown {
        renderer.visit(element);
    }
    renderer.out
}

struct Renderer<'c> {
    config: &'c StyleConfig,
    /// Active attributes, outermost first
    stack: Vec<Attribute>,
    out: StyledText,
    /// Bytes emitted so far
    len: usize,
}

impl Renderer<'_> {
    fn visit(&mut self, element: &Element<'_>) {
        let config = self.config;
        match element {
            Element::Text { text } => self.push_run(text, &[], None),
            Element::UnorderedListItem { children, .. } => {
                let marker = format!("{} ", config.bullet_glyph);
                self.list_item(&marker, children);
            }
            Element::OrderedListItem {
                order, children, ..
            } => {
                let marker = format!("{order} ");
                self.list_item(&marker, children);
            }
            Element::Header {
                level, children, ..
            } => {
                let header = Attribute::Header {
                    level: *level,
                    scale: config.header_size(*level),
                    margin_top: config.header_margin_top,
                    margin_bottom: config.header_margin_bottom,
                    color: config.color_on_surface,
                };
                self.nested(header, children);
            }
            Element::Quote { children, .. } => {
                let quote = Attribute::Quote {
                    indent: config.gap,
                    bar_width: config.quote_width,
                    bar_color: config.color_secondary,
                };
                self.nested(quote, children);
            }
            Element::Italic { children, .. } => {
                let italic = Attribute::Italic {
                    slant: config.italic_slant,
                };
                self.nested(italic, children);
            }
            Element::Bold { children, .. } => {
                let bold = Attribute::Bold {
                    weight: config.bold_weight,
                };
                self.nested(bold, children);
            }
            Element::Strike { children, .. } => {
                let strike = Attribute::Strike {
                    thickness: config.strike_width,
                };
                self.nested(strike, children);
            }
            Element::Rule { .. } => {
                let rule = Attribute::Rule {
                    thickness: config.rule_width,
                    color: config.color_divider,
                };
                self.push_run(RULE_PLACEHOLDER, &[rule], None);
            }
            Element::InlineCode { text } => {
                let code = Attribute::InlineCode {
                    background: config.color_surface,
                    monospace: config.code_monospace,
                    corner_radius: config.code_corner_radius,
                };
                self.push_run(text, &[code], None);
            }
            Element::BlockCode { fence, text } => {
                let code = Attribute::BlockCode {
                    fence: *fence,
                    background: config.color_surface,
                    monospace: config.code_monospace,
                };
                // an empty closing line still closes the block
                self.emit(text, &[code], None);
            }
            Element::Link { url, text } => self.link(url, text),
            Element::Image { url, alt, title } => {
                let placeholder = Attribute::ImagePlaceholder {
                    width: config.image_width,
                    height: config.image_height,
                };
                let target = Target::Image {
                    url: url.to_string(),
                    alt: alt.map(str::to_string),
                    title: title.map(str::to_string),
                };
                self.push_run(title.unwrap_or(""), &[placeholder], Some(target));
            }
        }
    }

    /// Render children with one more attribute on the stack
    fn nested(&mut self, attribute: Attribute, children: &[Element<'_>]) {
        let pushed = !self.stack.contains(&attribute);
        if pushed {
            self.stack.push(attribute);
        }
        for child in children {
            self.visit(child);
        }
        if pushed {
            self.stack.pop();
        }
    }

    fn list_item(&mut self, marker: &str, children: &[Element<'_>]) {
        let item = Attribute::ListItem {
            indent: self.config.list_indent,
        };
        let pushed = !self.stack.contains(&item);
        if pushed {
            self.stack.push(item);
        }

        let bullet = Attribute::ListMarker {
            color: self.config.color_secondary,
        };
        self.push_run(marker, &[bullet], None);
        for child in children {
            self.visit(child);
        }

        if pushed {
            self.stack.pop();
        }
    }

    fn link(&mut self, url: &str, title: &str) {
        let config = self.config;
        let link = Attribute::Link {
            color: config.color_primary,
            underline: config.link_underline,
        };
        let target = Target::Link {
            url: url.to_string(),
        };
        let start = self.len;

        if let Some(icon) = &config.link_icon {
            let icon = format!("{icon} ");
            self.push_run(&icon, &[link.clone()], Some(target.clone()));
        }
        // an empty title would leave nothing to activate
        let display = if title.is_empty() { url } else { title };
        self.push_run(display, &[link], Some(target));

        if self.len > start {
            self.out.links.push(LinkSpan {
                url: url.to_string(),
                start,
                end: self.len,
            });
        }
    }

    fn push_run(&mut self, text: &str, extra: &[Attribute], target: Option<Target>) {
        if text.is_empty() && target.is_none() {
            return;
        }
        self.emit(text, extra, target);
    }

    fn emit(&mut self, text: &str, extra: &[Attribute], target: Option<Target>) {
        let mut attributes = self.stack.clone();
        for attribute in extra {
            if !attributes.contains(attribute) {
                attributes.push(attribute.clone());
            }
        }

        self.len += text.len();
        self.out.runs.push(StyledRun {
            text: text.to_string(),
            attributes,
            target,
        });
    }
}
