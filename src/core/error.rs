// Error model shared by the cursor, schema builder, decoder and CLI loader.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Io,
    InvalidInput,
    UnexpectedEof,
    ConstantMismatch,
    TrailingData,
    InvalidSchema,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    field: Option<String>,
    offset: Option<u64>,
    needed: Option<usize>,
    available: Option<usize>,
    expected: Option<Vec<u8>>,
    actual: Option<Vec<u8>>,
    extra: Option<usize>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            field: None,
            offset: None,
            needed: None,
            available: None,
            expected: None,
            actual: None,
            extra: None,
            source: None,
        }
    }

    /// A read of `needed` bytes found only `available` left in scope.
    pub fn unexpected_eof(offset: usize, needed: usize, available: usize) -> Self {
        Self::new(ErrorKind::UnexpectedEof)
            .with_message(format!("needed {needed} bytes, {available} available"))
            .with_offset(offset as u64)
            .with_needed(needed)
            .with_available(available)
    }

    pub fn constant_mismatch(offset: usize, expected: &[u8], actual: &[u8]) -> Self {
        Self::new(ErrorKind::ConstantMismatch)
            .with_message(format!(
                "expected {}, got {}",
                hex::encode(expected),
                hex::encode(actual)
            ))
            .with_offset(offset as u64)
            .with_expected(expected)
            .with_actual(actual)
    }

    pub fn trailing_data(offset: usize, extra: usize) -> Self {
        Self::new(ErrorKind::TrailingData)
            .with_message(format!("{extra} trailing bytes after last field"))
            .with_offset(offset as u64)
            .with_extra(extra)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Dotted path of the field that failed, e.g. `data7.signature`.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn needed(&self) -> Option<usize> {
        self.needed
    }

    pub fn available(&self) -> Option<usize> {
        self.available
    }

    pub fn expected(&self) -> Option<&[u8]> {
        self.expected.as_deref()
    }

    pub fn actual(&self) -> Option<&[u8]> {
        self.actual.as_deref()
    }

    pub fn extra(&self) -> Option<usize> {
        self.extra
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Prepends an enclosing field name to the path (`signature` -> `data7.signature`).
    pub fn within(mut self, parent: &str) -> Self {
        self.field = Some(match self.field.take() {
            Some(child) if !child.is_empty() => format!("{parent}.{child}"),
            _ => parent.to_string(),
        });
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_needed(mut self, needed: usize) -> Self {
        self.needed = Some(needed);
        self
    }

    pub fn with_available(mut self, available: usize) -> Self {
        self.available = Some(available);
        self
    }

    pub fn with_expected(mut self, expected: &[u8]) -> Self {
        self.expected = Some(expected.to_vec());
        self
    }

    pub fn with_actual(mut self, actual: &[u8]) -> Self {
        self.actual = Some(actual.to_vec());
        self
    }

    pub fn with_extra(mut self, extra: usize) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(field) = self.field.as_deref().filter(|field| !field.is_empty()) {
            write!(f, " at {field}")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " (offset: {offset})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Io => 3,
        ErrorKind::InvalidInput => 4,
        ErrorKind::UnexpectedEof => 5,
        ErrorKind::ConstantMismatch => 6,
        ErrorKind::TrailingData => 7,
        ErrorKind::InvalidSchema => 8,
    }
}
