//! HTML content extraction
//!
//! This module pulls structured fields out of an HTML page:
//! - The text of the primary content subtree, with noise subtrees removed
//! - The class attribute of `<body>`
//! - A fixed set of `<meta name=...>` fields
//! - A classification flag set by a fingerprint in the raw HTML
//!
//! Each field is extracted independently. A field that is missing or fails to
//! extract carries an explicit marker instead of aborting the others.

use crate::config::ExtractionConfig;
use scraper::{ElementRef, Html, Selector};

/// Written when the primary content selector matches nothing
pub const CONTENT_NOT_FOUND: &str = "Content selector not found";

/// Written when a `<meta name=...>` tag is absent
pub const META_NOT_FOUND: &str = "Meta tag not found";

/// Written when a field could not be extracted at all
pub const EXTRACTION_FAILED: &str = "Error during content extraction";

/// Written to the classification column when the fingerprint is present
pub const FLAG_SET: &str = "TRUE";

/// Metadata fields read from `<meta name=FIELD content=...>`, in column order
pub const META_FIELDS: [&str; 5] = ["title", "description", "created", "modified", "assetid"];

/// Outcome of extracting a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// The structure was present; the value may still be empty
    Found(String),
    /// The expected structure is absent from the document
    NotFound,
    /// Extraction itself failed (e.g. an unusable selector)
    Failed,
}

impl Extracted {
    /// Renders the field for output, using `not_found` for a missing field
    pub fn render(&self, not_found: &str) -> String {
        match self {
            Self::Found(value) => value.clone(),
            Self::NotFound => not_found.to_string(),
            Self::Failed => EXTRACTION_FAILED.to_string(),
        }
    }
}

/// Everything extracted from one HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Whitespace-collapsed text of the primary content subtree
    pub main_content: Extracted,

    /// Class attribute of `<body>`
    pub body_classes: Extracted,

    /// One entry per [`META_FIELDS`] name, in the same order
    pub metadata: Vec<(&'static str, Extracted)>,

    /// Whether the fingerprint appears in the raw HTML
    pub classified: bool,
}

impl ExtractionResult {
    pub fn main_content_text(&self) -> String {
        self.main_content.render(CONTENT_NOT_FOUND)
    }

    pub fn body_classes_text(&self) -> String {
        self.body_classes.render("")
    }

    /// Rendered value of a metadata field, or [`META_NOT_FOUND`] if unknown
    pub fn meta(&self, field: &str) -> String {
        self.metadata
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.render(META_NOT_FOUND))
            .unwrap_or_else(|| META_NOT_FOUND.to_string())
    }

    /// Classification column value: [`FLAG_SET`] or blank
    pub fn classification_flag(&self) -> String {
        if self.classified {
            FLAG_SET.to_string()
        } else {
            String::new()
        }
    }
}

/// Applies a fixed set of selectors to HTML pages
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    content_selector: String,
    noise_selectors: Vec<String>,
    fingerprint: String,
}

impl ContentExtractor {
    /// Creates an extractor from configuration
    ///
    /// Selectors are kept as text and parsed per page so that a bad selector
    /// only degrades the field that uses it.
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            content_selector: config.content_selector.clone(),
            noise_selectors: config.noise_selectors.clone(),
            fingerprint: config.fingerprint.clone(),
        }
    }

    /// Extracts every field from an HTML body
    ///
    /// # Example
    ///
    /// ```
    /// use paged_extract::config::ExtractionConfig;
    /// use paged_extract::crawler::ContentExtractor;
    ///
    /// let extractor = ContentExtractor::new(&ExtractionConfig::default());
    /// let html = r#"<html><body class="page"><div id="main-content"><p>Hello
    ///     world</p><nav>Menu</nav></div></body></html>"#;
    /// let result = extractor.extract(html);
    /// assert_eq!(result.main_content_text(), "Hello world");
    /// assert_eq!(result.body_classes_text(), "page");
    /// ```
    pub fn extract(&self, html: &str) -> ExtractionResult {
        let mut document = Html::parse_document(html);

        let body_classes = extract_body_classes(&document);
        let metadata = META_FIELDS
            .iter()
            .map(|field| (*field, extract_meta(&document, field)))
            .collect();
        let classified = html.contains(&self.fingerprint);

        // Mutates the document, so it runs after every read-only field
        let main_content = self.extract_main_content(&mut document);

        ExtractionResult {
            main_content,
            body_classes,
            metadata,
            classified,
        }
    }

    fn extract_main_content(&self, document: &mut Html) -> Extracted {
        let Ok(content_selector) = Selector::parse(&self.content_selector) else {
            tracing::debug!("Unusable content selector: {}", self.content_selector);
            return Extracted::Failed;
        };

        let Some(content_id) = document.select(&content_selector).next().map(|e| e.id()) else {
            return Extracted::NotFound;
        };

        let mut noise_selectors = Vec::with_capacity(self.noise_selectors.len());
        for raw in &self.noise_selectors {
            match Selector::parse(raw) {
                Ok(selector) => noise_selectors.push(selector),
                Err(_) => {
                    tracing::debug!("Unusable noise selector: {}", raw);
                    return Extracted::Failed;
                }
            }
        }

        let noise_ids: Vec<_> = match document.tree.get(content_id).and_then(ElementRef::wrap) {
            Some(content) => noise_selectors
                .iter()
                .flat_map(|selector| content.select(selector).map(|e| e.id()))
                .collect(),
            None => return Extracted::Failed,
        };

        for id in noise_ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        match document.tree.get(content_id).and_then(ElementRef::wrap) {
            Some(content) => Extracted::Found(collapse_whitespace(&content.text().collect::<String>())),
            None => Extracted::Failed,
        }
    }
}

/// Collapses every whitespace run to a single space and trims both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_body_classes(document: &Html) -> Extracted {
    let Ok(selector) = Selector::parse("body") else {
        return Extracted::Failed;
    };

    document
        .select(&selector)
        .next()
        .and_then(|body| body.value().attr("class"))
        .map(|classes| Extracted::Found(classes.to_string()))
        .unwrap_or(Extracted::NotFound)
}

fn extract_meta(document: &Html, field: &str) -> Extracted {
    let Ok(selector) = Selector::parse(&format!("meta[name=\"{}\"]", field)) else {
        return Extracted::Failed;
    };

    document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| Extracted::Found(content.to_string()))
        .unwrap_or(Extracted::NotFound)
}
