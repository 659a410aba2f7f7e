//! Authorization guard.
//!
//! A single pure decision: may these claims perform this action at this
//! instant? Denial is an ordinary answer, not an error.

use chrono::{DateTime, Utc};

use crate::model::{Action, Claims};

/// Allow iff `action` is granted and `now` is strictly before expiry.
pub fn authorize(claims: &Claims, action: Action, now: DateTime<Utc>) -> bool {
    claims.permissions.grants(action) && now < claims.expires_at
}

/// [`authorize`] against the system clock.
pub fn authorize_now(claims: &Claims, action: Action) -> bool {
    authorize(claims, action, Utc::now())
}
