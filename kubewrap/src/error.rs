use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("this runner cannot stream kubectl output; run kubectl directly for watch mode")]
    StreamingUnsupported,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_error_names_program() {
        let err = Error::Spawn {
            program: "kubectl".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to run kubectl");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn streaming_error_points_at_kubectl() {
        assert!(Error::StreamingUnsupported
            .to_string()
            .contains("run kubectl directly"));
    }
}
