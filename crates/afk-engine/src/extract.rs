//! The seam between phrase tokenization and range resolution.
//!
//! An [`Extractor`] finds the time expressions in a phrase and reports each
//! as a [`ParsedMatch`]: an absolute instant, how precisely it was
//! resolved, and where in the phrase it was found. The resolver never looks
//! at grammar, only at these records.

use std::ops::Range;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::accuracy::Accuracy;

/// One time expression found in a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedMatch {
    /// The absolute instant, in the caller's offset.
    pub instant: DateTime<FixedOffset>,
    /// Coarsest unit the extractor is confident about.
    pub accuracy: Accuracy,
    /// Byte range of the matched text within the phrase.
    pub span: Range<usize>,
    /// The matched substring.
    pub text: String,
}

impl ParsedMatch {
    pub fn new(
        instant: DateTime<FixedOffset>,
        accuracy: Accuracy,
        span: Range<usize>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            instant,
            accuracy,
            span,
            text: text.into(),
        }
    }
}

/// Finds time expressions in free text.
///
/// Implementations must return matches ordered by their position in the
/// phrase and an empty list when nothing is recognized.
pub trait Extractor {
    fn extract(&self, phrase: &str, reference: &DateTime<FixedOffset>) -> Vec<ParsedMatch>;
}

impl<F> Extractor for F
where
    F: Fn(&str, &DateTime<FixedOffset>) -> Vec<ParsedMatch>,
{
    fn extract(&self, phrase: &str, reference: &DateTime<FixedOffset>) -> Vec<ParsedMatch> {
        self(phrase, reference)
    }
}
