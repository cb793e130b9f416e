use thiserror::Error;

/// Missing or unusable configuration. Always fatal, raised before any I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "{name} not found.\n\n\
        Set it as an environment variable or add it to ~/.config/bill-tracker/.env:\n  \
        {name}=your_key_here"
    )]
    MissingVar { name: &'static str },
}

/// A remote endpoint answered with a non-success status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an empty result")]
    Empty { service: &'static str },
}

impl ApiError {
    pub(crate) async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("unknown error"));
        ApiError::Status {
            service,
            status,
            body,
        }
    }
}
