use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed with status {status}: {body}")]
    TokenRequestFailed { status: u16, body: String },

    #[error("Token response did not contain an access_token")]
    MissingAccessToken,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
