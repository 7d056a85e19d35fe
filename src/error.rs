use serenity::gateway::GatewayError;
use serenity::http::HttpError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Error type shared by commands and framework callbacks.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    Missing(&'static str),

    #[error("environment variable `{0}` is empty")]
    Blank(&'static str),

    #[error("environment variable `{key}` has an invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot prepare log directory `{}`: {source}", path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal errors raised while bringing the bot online.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("authentication error: Discord rejected the session ({0})")]
    Authentication(#[source] serenity::Error),

    #[error("connectivity error: {0}")]
    Connectivity(#[source] serenity::Error),
}

impl StartupError {
    /// Sorts a session failure into an authentication or connectivity error.
    pub fn from_session(err: serenity::Error) -> Self {
        if is_rejection(&err) {
            StartupError::Authentication(err)
        } else {
            StartupError::Connectivity(err)
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Configuration(_) => 2,
            StartupError::Authentication(_) => 3,
            StartupError::Connectivity(_) => 4,
        }
    }
}

impl From<StartupError> for ExitCode {
    fn from(err: StartupError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

fn is_rejection(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Gateway(
            GatewayError::InvalidAuthentication
            | GatewayError::NoAuthentication
            | GatewayError::DisallowedGatewayIntents
            | GatewayError::InvalidGatewayIntents,
        ) => true,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            response.status_code.as_u16() == 401
        }
        _ => false,
    }
}
