use crate::error::ConfigError;
use crate::parsers::selector;
use crate::parsers::text::join_blocks;
use scraper::{ElementRef, Html, Selector};

/// Containers tried in order when looking for a letter's body
const BODY_STRATEGIES: [&str; 3] = ["div.entry-content", "article", "main"];

/// Subtrees whose text never belongs to the body
const STRIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Extracts the full text of a letter from its detail page
#[derive(Debug)]
pub struct BodyExtractor {
    strategies: Vec<(&'static str, Selector)>,
}

impl BodyExtractor {
    pub fn new() -> Result<Self, ConfigError> {
        let mut strategies = Vec::with_capacity(BODY_STRATEGIES.len());
        for css in BODY_STRATEGIES {
            strategies.push((css, selector(css)?));
        }
        Ok(Self { strategies })
    }

    /// Newline-separated text of the first matching container, or empty
    pub fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);

        for (name, selector) in &self.strategies {
            if let Some(container) = doc.select(selector).next() {
                ::log::debug!("Extracting letter body from {}", name);
                let mut blocks = Vec::new();
                collect_blocks(container, &mut blocks);
                return join_blocks(blocks);
            }
        }

        ::log::debug!("No body container found");
        String::new()
    }
}

fn collect_blocks<'a>(element: ElementRef<'a>, blocks: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            blocks.push(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if !STRIPPED_ELEMENTS.iter().any(|stripped| *stripped == name) {
                collect_blocks(child_el, blocks);
            }
        }
    }
}
