use thiserror::Error;

/// Input problems detected before anything is sent.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("no shape drawn")]
    NoShapeDrawn,
}

impl ValidationError {
    /// Message shown to the user.
    pub fn notice(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "Please enter a name for the polygon.",
            ValidationError::NoShapeDrawn => "Please draw a polygon or circle on the map.",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not encode submission: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a submission is already in flight")]
    Busy,

    #[error("server answered with status {status}")]
    Rejected { status: u16 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// Whether sending the same submission again can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmitError::Rejected { .. } | SubmitError::Store(StoreError::Transport(_))
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no endpoint configured, use --endpoint or MAP_ANNOTATE_ENDPOINT")]
    MissingEndpoint,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Unreadable shape input, with the offending line.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
