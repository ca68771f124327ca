//! Pseudo-anonymous session identity.
//!
//! A session pairs a short-lived device identity (`ssid`, minutes) with a
//! long-lived guest identity (`tid`, days) so repeat visits from the same
//! browser keep their cart and profile.

use serde::Serialize;

use tadka_core::{DeviceId, GuestId, SessionId};

/// A persisted identity pair with its expiries.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// Human-readable label, e.g. `S00000001`.
    pub display_id: String,
    pub device_id: DeviceId,
    pub guest_id: GuestId,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// Guest identity expiry, epoch milliseconds.
    pub tid_expires_at: i64,
    /// Device identity expiry, epoch milliseconds.
    pub device_expires_at: i64,
}

impl Session {
    /// Whether both identities are still within their TTLs.
    #[must_use]
    pub fn is_valid(&self, now_ms: i64) -> bool {
        self.tid_expires_at > now_ms && self.device_expires_at > now_ms
    }
}

/// Wire shape returned by `POST /v1/session`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub tid: GuestId,
    pub device_id: DeviceId,
    pub display_id: String,
    pub tid_expires_at: i64,
    pub device_expires_at: i64,
}

impl From<&Session> for SessionPayload {
    fn from(session: &Session) -> Self {
        Self {
            tid: session.guest_id,
            device_id: session.device_id,
            display_id: session.display_id.clone(),
            tid_expires_at: session.tid_expires_at,
            device_expires_at: session.device_expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(tid_expires_at: i64, device_expires_at: i64) -> Session {
        Session {
            id: SessionId::generate(),
            display_id: "S00000001".to_owned(),
            device_id: DeviceId::generate(),
            guest_id: GuestId::generate(),
            latitude: None,
            longitude: None,
            tid_expires_at,
            device_expires_at,
        }
    }

    #[test]
    fn test_valid_when_both_in_future() {
        assert!(session(2_000, 2_000).is_valid(1_000));
    }

    #[test]
    fn test_invalid_when_device_expired() {
        // The device identity always expires first (10 min vs 10 days).
        assert!(!session(2_000, 500).is_valid(1_000));
    }

    #[test]
    fn test_invalid_at_exact_expiry() {
        assert!(!session(1_000, 1_000).is_valid(1_000));
    }
}
