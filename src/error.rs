use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LabelError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// A delimited input table could not be read
    Csv(#[from] csv::Error),

    #[error(transparent)]
    /// A JSON configuration file could not be parsed
    Json(#[from] serde_json::Error),

    /// No row of the label table matched the requested brand and number
    #[error("could not find {brand} {number} amongst labels")]
    SpecNotFound { brand: String, number: String },

    /// A length value in the label table could not be parsed
    #[error("could not parse length {0:?}")]
    BadLength(String),

    /// A count column in the label table could not be parsed
    #[error("invalid value {0:?} in label table")]
    BadSpecValue(String),

    /// An address format string referenced a field the record does not have
    #[error("unknown address field {field:?} in format {template:?}")]
    UnknownField { field: String, template: String },

    /// An address format string has an unterminated `{...}` placeholder
    #[error("malformed format string {0:?}")]
    BadTemplate(String),

    /// A page listed in the page order was not present in the document
    #[error("page is missing from the document")]
    PageMissing,
}
