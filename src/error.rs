use thiserror::Error;

/// Everything that can stop a program run. Each variant is fatal; the
/// interpreter never resumes after returning one.
#[derive(Debug, Error)]
pub enum GcodeError {
    #[error("line {line}: program must start with '%', found '{found}'")]
    HeaderMissing { line: usize, found: String },

    #[error("line {line}: expected an 'N<digits>' instruction line, found '{found}'")]
    MalformedInstructionLine { line: usize, found: String },

    #[error("line {line}: unknown command letter '{letter}' in '{token}'")]
    UnknownCommandLetter { line: usize, letter: char, token: String },

    #[error("line {line}: '{token}' is not a valid number")]
    InvalidNumericLiteral { line: usize, token: String },

    #[error("line {line}: unsupported code '{token}'")]
    UnsupportedCode { line: usize, token: String },

    #[error("failed to read program source: {0}")]
    Io(#[from] std::io::Error),
}

impl GcodeError {
    /// Source line the error refers to, when it came from program text.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::HeaderMissing { line, .. }
            | Self::MalformedInstructionLine { line, .. }
            | Self::UnknownCommandLetter { line, .. }
            | Self::InvalidNumericLiteral { line, .. }
            | Self::UnsupportedCode { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
