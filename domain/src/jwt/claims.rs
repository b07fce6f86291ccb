//! Claim structures for the access tokens issued by this service.

use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
///
/// `sub` holds the user's id as a UUID string and `name` the user's full name
/// so the web layer can identify the caller without a database round trip.
/// `iat`, `nbf` and `exp` are Unix timestamps in seconds.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AccessTokenClaims {
    pub(crate) sub: String,
    pub(crate) name: String,
    pub(crate) iat: i64,
    pub(crate) nbf: i64,
    pub(crate) exp: i64,
}
