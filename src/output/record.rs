//! Output records and the builder that produces them
//!
//! Every URL in a window yields exactly one [`OutputRecord`], whether the
//! fetch succeeded, returned a non-HTML or non-2xx response, or failed.

use crate::crawler::{ContentExtractor, FetchOutcome};

/// Status column value for a transport failure
pub const FETCH_ERROR_STATUS: &str = "FETCH_ERROR";

/// Column names, in output order
pub const HEADER: [&str; 16] = [
    "row",
    "batchRunId",
    "originalUrl",
    "finalUrl",
    "statusCode",
    "redirected",
    "contentType",
    "isSWE",
    "mainContentText",
    "bodyClasses",
    "meta_title",
    "meta_description",
    "meta_created",
    "meta_modified",
    "meta_assetid",
    "error",
];

/// One flattened output row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRecord {
    pub row: usize,
    pub batch_run_id: String,
    pub original_url: String,
    pub final_url: String,
    pub status_code: String,
    pub redirected: String,
    pub content_type: String,
    pub is_swe: String,
    pub main_content_text: String,
    pub body_classes: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_created: String,
    pub meta_modified: String,
    pub meta_assetid: String,
    pub error: String,
}

impl OutputRecord {
    /// Returns the field values in [`HEADER`] order
    pub fn fields(&self) -> [String; 16] {
        [
            self.row.to_string(),
            self.batch_run_id.clone(),
            self.original_url.clone(),
            self.final_url.clone(),
            self.status_code.clone(),
            self.redirected.clone(),
            self.content_type.clone(),
            self.is_swe.clone(),
            self.main_content_text.clone(),
            self.body_classes.clone(),
            self.meta_title.clone(),
            self.meta_description.clone(),
            self.meta_created.clone(),
            self.meta_modified.clone(),
            self.meta_assetid.clone(),
            self.error.clone(),
        ]
    }
}

/// Turns fetch outcomes into output records
pub struct ResultBuilder<'a> {
    extractor: &'a ContentExtractor,
}

impl<'a> ResultBuilder<'a> {
    pub fn new(extractor: &'a ContentExtractor) -> Self {
        Self { extractor }
    }

    /// Builds the record for one URL
    ///
    /// - `Failure`: status is [`FETCH_ERROR_STATUS`], response fields are
    ///   empty and `error` is `"{kind}: {message}"`. No extraction.
    /// - `Success` with a body: extraction fields are filled in.
    /// - `Success` without a body: extraction fields stay empty and `error`
    ///   stays empty; a 404 or a PDF is an observed outcome, not an error.
    pub fn build(
        &self,
        original_url: &str,
        row: usize,
        batch_id: &str,
        outcome: &FetchOutcome,
    ) -> OutputRecord {
        let mut record = OutputRecord {
            row,
            batch_run_id: batch_id.to_string(),
            original_url: original_url.to_string(),
            ..OutputRecord::default()
        };

        match outcome {
            FetchOutcome::Failure { kind, message } => {
                record.status_code = FETCH_ERROR_STATUS.to_string();
                record.error = format!("{}: {}", kind, message);
            }
            FetchOutcome::Success {
                final_url,
                status_code,
                redirected,
                content_type,
                body,
            } => {
                record.final_url = final_url.clone();
                record.status_code = status_code.to_string();
                record.redirected = redirected.to_string();
                record.content_type = content_type.clone();

                if let Some(html) = body {
                    let extracted = self.extractor.extract(html);
                    record.is_swe = extracted.classification_flag();
                    record.main_content_text = extracted.main_content_text();
                    record.body_classes = extracted.body_classes_text();
                    record.meta_title = extracted.meta("title");
                    record.meta_description = extracted.meta("description");
                    record.meta_created = extracted.meta("created");
                    record.meta_modified = extracted.meta("modified");
                    record.meta_assetid = extracted.meta("assetid");
                }
            }
        }

        record
    }
}
