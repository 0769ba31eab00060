//! Mock gateway identity for integration tests.
//!
//! Services receive identity headers injected by the gateway. In tests,
//! `MockAuth` builds these headers directly so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use counterate_auth_types::identity::{SESSION_VERSION_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use counterate_domain::identity::Role;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: Role,
    pub session_version: i32,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: Role, session_version: i32) -> Self {
        Self {
            user_id,
            role,
            session_version,
        }
    }

    pub fn display(user_id: Uuid) -> Self {
        Self::new(user_id, Role::Display, 0)
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, Role::Admin, 0)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static(self.role.as_str()),
        );
        map.insert(
            HeaderName::from_static(SESSION_VERSION_HEADER),
            HeaderValue::from_str(&self.session_version.to_string()).unwrap(),
        );
        map
    }
}
