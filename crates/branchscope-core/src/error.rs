use std::fmt;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend(message.into()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Io(kind) => write!(f, "i/o error: {kind}"),
            ErrorKind::NotARepository => f.write_str("not a git repository"),
            ErrorKind::Unsupported(what) => write!(f, "unsupported: {what}"),
            ErrorKind::Backend(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug)]
pub enum ErrorKind {
    Io(std::io::ErrorKind),
    NotARepository,
    Unsupported(&'static str),
    Backend(String),
}
