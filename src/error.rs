// Library error types

/// A device request that produced no usable data.
///
/// The poller treats every variant the same way: the cycle is skipped and the
/// rendered state is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection refused, timeout, reset, ...
    #[error("request to {path} failed")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with a non-2xx status.
    #[error("{path} returned HTTP {status}")]
    Status { path: &'static str, status: u16 },

    /// The body was not the JSON document we expect.
    #[error("failed to parse {path} response")]
    Decode {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings rejected locally before anything is sent to the device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigFormError {
    #[error("baud rate must be > 0")]
    ZeroBaudRate,

    #[error("response timeout must be between 1 and 65535 ms, got {0}")]
    ResponseTimeout(u32),

    #[error("port must be between 1 and {max}, got {port}")]
    Port { port: u8, max: u8 },

    #[error("slave id must be between 1 and 247, got {0}")]
    SlaveId(u8),

    #[error("port name must be at most {max} characters, got {len}")]
    NameTooLong { len: usize, max: usize },

    #[error("port {0} listed more than once")]
    DuplicatePort(u8),
}
