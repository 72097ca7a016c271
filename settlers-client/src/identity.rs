//! Session and room identifiers handed over by the transport bootstrap

use crate::error::SessionError;

/// Who we are and which room we joined
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionIdentity {
    pub session: String,
    pub room: String,
}

impl SessionIdentity {
    /// Read the session cookie from a `Cookie` header and the room ID from
    /// the last non-empty segment of the navigation path.
    pub fn from_parts(
        cookie_header: &str,
        cookie_name: &str,
        path: &str,
    ) -> Result<Self, SessionError> {
        let session = cookie_value(cookie_header, cookie_name)
            .ok_or_else(|| SessionError::MissingCookie(cookie_name.to_string()))?;
        let room = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .ok_or_else(|| SessionError::MissingRoom(path.to_string()))?;

        Ok(Self {
            session: session.to_string(),
            room: room.to_string(),
        })
    }
}

/// Value of `name` in a `k=v; k2=v2` cookie string; empty values count as absent
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
