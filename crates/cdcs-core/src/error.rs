use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Failed to introspect {object}: {source}")]
    Introspection {
        object: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid schema document: {0}")]
    SchemaRead(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Helper for creating configuration errors
    ///
    /// # Example
    /// ```
    /// use cdcs_core::Error;
    /// let err = Error::config_error("No databases given");
    /// ```
    pub fn config_error(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Helper for wrapping a failure that happened while reading a
    /// database object (`db` or `db.table`)
    pub fn introspection(object: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::Introspection {
            object: object.into(),
            source: source.into(),
        }
    }

    /// Helper for creating general errors with a message
    ///
    /// # Example
    /// ```
    /// use cdcs_core::Error;
    /// let err = Error::message("Something went wrong");
    /// ```
    pub fn message(msg: impl Into<String>) -> Self {
        Error::Other(anyhow::anyhow!("{}", msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introspection_display_names_object() {
        let err = Error::introspection("shop.orders", anyhow::anyhow!("table vanished"));
        assert_eq!(
            err.to_string(),
            "Failed to introspect shop.orders: table vanished"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
