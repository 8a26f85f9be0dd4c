use std::fmt;

#[derive(Debug)]
pub enum Error {
    AuthFailed,
    Client(Box<dyn std::error::Error + Send + Sync>),
    UnknownDevice(String),
    InvalidOutput { value: f64, min: f64, max: f64 },
    Io(std::io::Error),
}

impl Error {
    /// Wrap a failure reported by the device-client collaborator.
    pub fn client(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Client(err.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AuthFailed => write!(f, "credentials rejected, re-authentication required"),
            Error::Client(e) => write!(f, "client error: {e}"),
            Error::UnknownDevice(id) => write!(f, "unknown device: {id}"),
            Error::InvalidOutput { value, min, max } => {
                write!(f, "output {value} out of range [{min}, {max}]")
            }
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Client(e) => Some(e.as_ref()),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
