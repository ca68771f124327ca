//! Device/guest identity extraction.
//!
//! Every authenticated-ish endpoint needs the identity pair minted by
//! `POST /v1/session`. Browser clients carry it in the `ssid`/`tid` cookies;
//! native clients send the `x-device-id`/`x-tid` headers. Headers win when
//! both are present.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use tadka_core::{DeviceId, GuestId};

use crate::error::AppError;

/// Device id header name.
pub(crate) const DEVICE_HEADER: &str = "x-device-id";
/// Guest id header name.
pub(crate) const GUEST_HEADER: &str = "x-tid";
/// Device id cookie name.
pub(crate) const DEVICE_COOKIE: &str = "ssid";
/// Guest id cookie name.
pub(crate) const GUEST_COOKIE: &str = "tid";

/// The (device, guest) identity pair attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub device_id: DeviceId,
    pub guest_id: GuestId,
}

impl Identity {
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let device_id = find_value(headers, DEVICE_HEADER, DEVICE_COOKIE)?
            .parse::<DeviceId>()
            .ok()?;
        let guest_id = find_value(headers, GUEST_HEADER, GUEST_COOKIE)?
            .parse::<GuestId>()
            .ok()?;
        Some(Self { device_id, guest_id })
    }
}

/// Header value first, cookie fallback second.
pub(crate) fn find_value(headers: &HeaderMap, header_name: &str, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers.get(header_name).and_then(|v| v.to_str().ok()) {
        return Some(value.trim().to_owned());
    }

    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_owned())
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers).ok_or(AppError::MissingIdentity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&str, String)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_identity_from_headers() {
        let device = DeviceId::generate();
        let guest = GuestId::generate();
        let map = headers(&[
            ("x-device-id", device.to_string()),
            ("x-tid", guest.to_string()),
        ]);

        let identity = Identity::from_headers(&map).unwrap();
        assert_eq!(identity.device_id, device);
        assert_eq!(identity.guest_id, guest);
    }

    #[test]
    fn test_identity_from_cookies() {
        let device = DeviceId::generate();
        let guest = GuestId::generate();
        let map = headers(&[("cookie", format!("foo=bar; ssid={device}; tid={guest}"))]);

        let identity = Identity::from_headers(&map).unwrap();
        assert_eq!(identity.device_id, device);
        assert_eq!(identity.guest_id, guest);
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let header_device = DeviceId::generate();
        let cookie_device = DeviceId::generate();
        let guest = GuestId::generate();
        let map = headers(&[
            ("x-device-id", header_device.to_string()),
            ("cookie", format!("ssid={cookie_device}; tid={guest}")),
        ]);

        let identity = Identity::from_headers(&map).unwrap();
        assert_eq!(identity.device_id, header_device);
    }

    #[test]
    fn test_missing_guest_id_is_rejected() {
        let map = headers(&[("x-device-id", DeviceId::generate().to_string())]);
        assert!(Identity::from_headers(&map).is_none());
    }

    #[test]
    fn test_malformed_uuid_is_rejected() {
        let map = headers(&[
            ("x-device-id", "not-a-uuid".to_owned()),
            ("x-tid", GuestId::generate().to_string()),
        ]);
        assert!(Identity::from_headers(&map).is_none());
    }
}
