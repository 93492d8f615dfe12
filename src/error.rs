use ::scraper::error::SelectorErrorKind;

use crate::extract::EnrichField;

/// All errors that can escape a HYROX scraping operation.
#[derive(thiserror::Error, Debug)]
pub enum HyroxError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// No date strategy matched a date that was required.
    ///
    /// Listing rules keep date failures inside [`ExtractError::Date`]; this
    /// variant is what `?` on [`parse_date`](crate::parse_date) produces in
    /// code returning [`Result`].
    #[error(transparent)]
    DateFormat(#[from] DateFormatError),

    /// Every attempt at an optional enrichment field failed validation.
    #[error("{field} enrichment gave up after {attempts} attempts for {url}: {last}")]
    EnrichmentExhausted {
        field: EnrichField,
        url: String,
        attempts: u32,
        last: ExtractError,
    },

    /// A named lookup matched nothing.
    #[error("{kind} not found: {name}")]
    EntityNotFound { kind: &'static str, name: String },

    /// The CSV output file exists and neither appending nor overwriting was requested.
    #[error("output file already exists: {0}")]
    OutputExists(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl HyroxError {
    /// Whether this error came from fetching a page rather than from its content.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HyroxError::Http { .. } | HyroxError::UnexpectedStatus { .. } | HyroxError::ResponseBody { .. }
        )
    }
}

impl<'a> From<SelectorErrorKind<'a>> for HyroxError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        HyroxError::Selector(err.to_string())
    }
}

/// No date strategy could make sense of the text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised date format: {text:?}")]
pub struct DateFormatError {
    pub text: String,
}

/// Why a single row (or a single detail page) could not be turned into a value.
///
/// These never abort a listing: the extractor records them next to the
/// records it did manage to parse.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The element did not have the expected structure (e.g. wrong cell count).
    #[error("unexpected {context}: expected {expected}, found {found}")]
    Shape {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A required field's content did not convert.
    #[error("cannot convert {field} from {value:?}: {reason}")]
    Field {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A required sub-element is absent.
    #[error("missing {0}")]
    Missing(&'static str),

    #[error(transparent)]
    Date(#[from] DateFormatError),
}

pub type Result<T> = std::result::Result<T, HyroxError>;
