use serde::{Deserialize, Serialize};

/// A chat message as exchanged with clients.
///
/// The wire format is a JSON object with exactly three string fields:
/// `email`, `username`, and `message`. The body is called `message` on the
/// wire for compatibility with existing clients. A payload with a missing
/// or unknown field fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    pub email: String,
    pub username: String,
    #[serde(rename = "message")]
    pub body: String,
}

impl Message {
    /// Create a new message
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            body: body.into(),
        }
    }
}
