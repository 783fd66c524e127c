use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// The routing layer could not be reached.
#[derive(Debug)]
pub enum InitError {
    /// The helper program could not be started at all.
    CommandNotFound(String),
    /// The routing layer refused to open a session.
    Other(String),
}

impl Error for InitError {}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InitError::CommandNotFound(ref program) => {
                write!(f, "could not run `{}`, is PipeWire installed?", program)
            }
            InitError::Other(ref msg) => {
                write!(f, "routing backend could not be initialized: {}", msg)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortInfoError {
    /// Listing ports or links failed.
    QueryFailed(String),
    /// The port listing contained something we could not parse.
    Malformed(String),
}

impl Error for PortInfoError {}

impl fmt::Display for PortInfoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PortInfoError::QueryFailed(ref msg) => write!(f, "could not query ports: {}", msg),
            PortInfoError::Malformed(ref line) => {
                write!(f, "unexpected line in port listing: {:?}", line)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectErrorKind {
    /// The two ports are already linked.
    AlreadyConnected,
    /// There is no link between the two ports.
    NotConnected,
    /// The pair is not (output, input).
    InvalidPort,
    Other,
}

impl fmt::Display for ConnectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            ConnectErrorKind::AlreadyConnected => "ports are already connected",
            ConnectErrorKind::NotConnected => "ports are not connected",
            ConnectErrorKind::InvalidPort => "connections go from an output port to an input port",
            ConnectErrorKind::Other => "connection failed",
        };
        msg.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectError {
    kind: ConnectErrorKind,
    detail: Option<String>,
}

impl ConnectError {
    pub fn new(kind: ConnectErrorKind) -> ConnectError {
        ConnectError { kind, detail: None }
    }

    /// Helper method to create ConnectErrorKind::Other.
    pub fn other<S: Into<String>>(detail: S) -> ConnectError {
        Self::new(ConnectErrorKind::Other).with_detail(detail)
    }

    pub fn with_detail<S: Into<String>>(mut self, detail: S) -> ConnectError {
        self.detail = Some(detail.into());
        self
    }

    pub fn kind(&self) -> ConnectErrorKind {
        self.kind
    }
}

impl Error for ConnectError {}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.detail {
            Some(ref detail) => write!(f, "{}: {}", self.kind, detail),
            None => self.kind.fmt(f),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, io::Error),
    Parse(toml::de::Error),
    /// The user configuration directory could not be determined.
    NoConfigDir,
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ConfigError::Io(_, ref err) => Some(err),
            ConfigError::Parse(ref err) => Some(err),
            ConfigError::NoConfigDir => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref path, _) => write!(f, "could not read {}", path.display()),
            ConfigError::Parse(_) => "invalid route configuration".fmt(f),
            ConfigError::NoConfigDir => "no user configuration directory".fmt(f),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> ConfigError {
        ConfigError::Parse(err)
    }
}
