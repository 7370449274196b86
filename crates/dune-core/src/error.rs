use thiserror::Error;

/// The main error type for dune-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// API key error
  #[error("Failed to retrieve API key: {0}")]
  ApiKey(String),

  /// Serialization/Deserialization error outside of response handling
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  /// A route or absolute URL could not be parsed
  #[error("Invalid URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  /// Any failure while issuing a request or interpreting its response.
  ///
  /// Server-reported errors carry the server message; transport and decode
  /// failures carry the underlying failure description.
  #[error("Response Error: {0}")]
  Response(String),

  /// Polling gave up before the execution reached a terminal state
  #[error("Timed out: {0}")]
  Timeout(String),
}

impl Error {
  /// The bare message without the category prefix added by `Display`.
  pub fn message(&self) -> String {
    match self {
      Error::Response(msg) | Error::Config(msg) | Error::ApiKey(msg) | Error::Timeout(msg) => {
        msg.clone()
      }
      other => other.to_string(),
    }
  }

  /// True for errors produced by the request router.
  pub fn is_response(&self) -> bool {
    matches!(self, Error::Response(_))
  }
}

/// Result type alias for dune-* crates
pub type Result<T> = std::result::Result<T, Error>;
