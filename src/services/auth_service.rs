//! Anonymous identity minting.
//!
//! The backend does not run a real identity provider; it hands out opaque
//! ids that clients echo back in the `x-user-id` header. The id only ever
//! gates creator-scoped operations and stamps `creator_id`/`owner_id` on
//! the documents a user creates.

use uuid::Uuid;

use crate::dto::auth::AnonymousSession;

/// Mint a fresh anonymous identity.
pub fn sign_in_anonymously() -> AnonymousSession {
    AnonymousSession {
        user_id: Uuid::new_v4().simple().to_string(),
    }
}
