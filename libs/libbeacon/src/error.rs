#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The input ran out while a decoder was mid-field. Carries the name of
    /// the field that was being read so capture diagnostics can point at the
    /// exact spot the buffer fell short.
    #[error("input truncated while reading {0}")]
    Truncated(&'static str),

    /// An element's payload no longer agrees with its declared length.
    /// Raised at encode time; a correctly constructed element can't hit this.
    #[error("element {id} declares {declared} payload bytes but carries {actual}")]
    LengthMismatch { id: u8, declared: u8, actual: usize },

    /// The frame fails the pipeline's acceptance filter: not a
    /// management/beacon frame, or not from the configured BSSID. A filter
    /// condition, not a hard failure; the capture loop just moves on.
    #[error("unsupported frame: {0}")]
    UnsupportedFrame(String),

    #[error("a parsing failure occurred: {0}")]
    Failure(String),
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for Error {
    /// Conversion from a [nom::error::Error] to our own error. We can't hold
    /// on to nom's borrowed input slice without infecting every signature
    /// with its lifetime, so the conversion keeps only the error kind.
    fn from(error: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match error {
            nom::Err::Incomplete(_) => Error::Truncated("frame body"),
            nom::Err::Failure(error) | nom::Err::Error(error) => Error::Failure(format!(
                "nom::ErrorKind is {:?} ({} bytes remained)",
                error.code,
                error.input.len()
            )),
        }
    }
}
