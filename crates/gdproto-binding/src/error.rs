use thiserror::Error;

/// The schema handed to us is inconsistent. Always fatal for the run.
#[derive(Debug, Error)]
pub enum SchemaIntegrityError {
    #[error("extension `{second}` reuses number {number} of `{extendee}` (taken by `{first}`)")]
    DuplicateExtension {
        extendee: String,
        number: u32,
        first: String,
        second: String,
    },

    #[error("failed to decode file descriptor: {0}")]
    FileDecode(#[source] prost::DecodeError),

    #[error("failed to link descriptors: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    #[error("failed to decode options as `{message}`: {source}")]
    OptionDecode {
        message: String,
        #[source]
        source: prost::DecodeError,
    },

    #[error("options message `{0}` is not known to the extension catalog")]
    MissingOptionsType(String),

    #[error("extension `{extension}` holds a {kind} value; only scalar options are supported")]
    UnsupportedOptionValue {
        extension: String,
        kind: &'static str,
    },
}

/// A binding string that does not follow `VERB:PATH`.
///
/// Offsets are byte offsets into the original binding string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("missing `:` between verb and path")]
    MissingVerbDelimiter,

    #[error("empty verb before `:`")]
    EmptyVerb,

    #[error("invalid verb `{0}` (expected ASCII letters)")]
    InvalidVerb(String),

    #[error("empty path after `:`")]
    EmptyPath,

    #[error("placeholder opened at offset {offset} is never closed")]
    UnterminatedPlaceholder { offset: usize },

    #[error("`{{` at offset {offset} inside a placeholder")]
    NestedPlaceholder { offset: usize },

    #[error("empty placeholder at offset {offset}")]
    EmptyPlaceholder { offset: usize },

    #[error("placeholder `{placeholder}` at offset {offset} has an empty field name")]
    EmptyPathComponent { offset: usize, placeholder: String },
}

/// Coarse classification callers use to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SchemaIntegrity,
    Grammar,
}

#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Schema(#[from] SchemaIntegrityError),

    #[error("method `{method}`: malformed binding `{binding}`: {source}")]
    Grammar {
        method: String,
        binding: String,
        #[source]
        source: GrammarError,
    },
}

impl BindingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BindingError::Schema(_) => ErrorKind::SchemaIntegrity,
            BindingError::Grammar { .. } => ErrorKind::Grammar,
        }
    }
}
