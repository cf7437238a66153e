use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoostError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data store error: {message}")]
    Store { message: String },

    #[error("Listener error: {message}")]
    Listen { message: String },

    /// Bind faults outside the classified set. These never get the
    /// friendly exit-1 path; the caller re-raises them to the fatal path.
    #[error("Unrecoverable bind error: {0}")]
    UnrecoverableBind(std::io::Error),

    #[error("System error: {message}")]
    System { message: String },
}

impl RoostError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn listen<S: Into<String>>(message: S) -> Self {
        Self::Listen {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RoostError>;
