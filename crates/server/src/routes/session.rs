//! Session minting and refresh.
//!
//! The client calls `POST /v1/session` on every page load. A still-valid
//! guest identity (`tid`) is reused so the cart and profile survive; an
//! expired one gets a brand-new identity pair. Both ids are returned in the
//! body and mirrored as cookies for browser clients.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use chrono::Utc;
use serde::Deserialize;

use tadka_core::{DeviceId, GuestId};

use crate::db::SessionRepository;
use crate::error::Result;
use crate::middleware::identity::{
    DEVICE_COOKIE, DEVICE_HEADER, GUEST_COOKIE, GUEST_HEADER, find_value,
};
use crate::models::{Session, SessionPayload};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Device identity TTL: 10 minutes, in milliseconds.
const DEVICE_TTL_MS: i64 = 10 * 60 * 1000;
/// Guest identity TTL: 10 days, in milliseconds.
const TID_TTL_MS: i64 = 10 * 24 * 60 * 60 * 1000;

/// Optional request body. Clients that cannot set headers (or whose cookies
/// were cleared) may pass their previous ids here; both are nullable.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub tid: Option<String>,
    pub ssid: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// `POST /v1/session`
///
/// Reuses the caller's session when either identity is still valid,
/// refreshing both TTLs; otherwise mints a new identity pair.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<SessionRequest>>,
) -> Result<impl IntoResponse> {
    let Json(request) = body.unwrap_or_default();
    let now_ms = Utc::now().timestamp_millis();
    let repo = SessionRepository::new(state.pool());

    let existing = find_live_session(&repo, &headers, &request, now_ms).await?;

    let (session, created) = match existing {
        Some(session) => {
            let refreshed = repo
                .touch(session.id, now_ms + TID_TTL_MS, now_ms + DEVICE_TTL_MS)
                .await?;
            (refreshed, false)
        }
        None => {
            let session = repo
                .create(
                    request.latitude,
                    request.longitude,
                    now_ms + TID_TTL_MS,
                    now_ms + DEVICE_TTL_MS,
                )
                .await?;
            tracing::info!(session = %session.display_id, "New session minted");
            (session, true)
        }
    };

    let cookies = AppendHeaders([
        (
            SET_COOKIE,
            cookie(GUEST_COOKIE, &session.guest_id.to_string(), TID_TTL_MS / 1000),
        ),
        (
            SET_COOKIE,
            cookie(DEVICE_COOKIE, &session.device_id.to_string(), DEVICE_TTL_MS / 1000),
        ),
    ]);

    let payload = SessionPayload::from(&session);
    let envelope = if created {
        ApiResponse::created(payload, "Session created")
    } else {
        ApiResponse::ok(payload, "Session refreshed")
    };

    Ok((cookies, envelope))
}

/// Find a reusable session: valid guest identity first, then valid device.
async fn find_live_session(
    repo: &SessionRepository<'_>,
    headers: &HeaderMap,
    request: &SessionRequest,
    now_ms: i64,
) -> Result<Option<Session>> {
    let guest_id = parsed::<GuestId>(headers, request.tid.as_deref(), GUEST_HEADER, GUEST_COOKIE);
    if let Some(guest_id) = guest_id
        && let Some(session) = repo.find_by_guest_id(guest_id).await?
        && session.tid_expires_at > now_ms
    {
        return Ok(Some(session));
    }

    let device_id =
        parsed::<DeviceId>(headers, request.ssid.as_deref(), DEVICE_HEADER, DEVICE_COOKIE);
    if let Some(device_id) = device_id
        && let Some(session) = repo.find_by_device_id(device_id).await?
        && session.device_expires_at > now_ms
    {
        return Ok(Some(session));
    }

    Ok(None)
}

/// Body value wins over header/cookie, since it is the most deliberate.
fn parsed<T: std::str::FromStr>(
    headers: &HeaderMap,
    body_value: Option<&str>,
    header: &str,
    cookie: &str,
) -> Option<T> {
    body_value
        .map(str::to_owned)
        .or_else(|| find_value(headers, header, cookie))?
        .parse()
        .ok()
}

fn cookie(name: &str, value: &str, max_age_secs: i64) -> String {
    format!("{name}={value}; Max-Age={max_age_secs}; Path=/; HttpOnly; SameSite=Lax")
}
