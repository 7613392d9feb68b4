use futures::task::SpawnError;

/// [Result] alias for return types of the crate API
pub type Result<T> = std::result::Result<T, Error>;

/// Error enum type
#[derive(Debug)]
pub enum Error {
    /// Input mapping configuration could not be parsed. The String contains the reason.
    ConfigError(String),
    /// Input backend error. The String contains the reason.
    InputError(String),
    /// Parameter table error. The String contains the reason.
    ParamError(String),
    /// [Value](crate::Value) conversion error. The String contains the reason.
    ConversionError(String),
    /// The parameter uplink or a service channel is closed.
    Disconnected,
    /// Error with the async executors.
    SystemError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ConfigError(reason) => write!(f, "Input config error: {}", reason),
            Error::InputError(reason) => write!(f, "Input backend error: {}", reason),
            Error::ParamError(reason) => write!(f, "Parameter error: {}", reason),
            Error::ConversionError(reason) => write!(f, "Value conversion error: {}", reason),
            Error::Disconnected => write!(f, "Uplink disconnected"),
            Error::SystemError(reason) => write!(f, "System error: {}", reason),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::ConfigError(format!("{}", error))
    }
}

impl From<SpawnError> for Error {
    fn from(error: SpawnError) -> Self {
        Self::SystemError(format!("{}", error))
    }
}

impl From<flume::RecvError> for Error {
    fn from(_: flume::RecvError) -> Self {
        self::Error::Disconnected
    }
}

impl<T> From<flume::SendError<T>> for Error {
    fn from(_: flume::SendError<T>) -> Self {
        self::Error::Disconnected
    }
}
