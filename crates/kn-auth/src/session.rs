//! Keep session acquisition.
//!
//! A long-lived master token is exchanged with Google's Android auth endpoint
//! for a short-lived OAuth token scoped to Keep. The exchange is a single
//! form-encoded POST; the response is a `Key=Value` line list.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::AuthError;

const AUTH_URL: &str = "https://android.clients.google.com/auth";
const USER_AGENT: &str = "GoogleAuth/1.4";
const KEEP_SCOPES: &str =
    "oauth2:https://www.googleapis.com/auth/memento https://www.googleapis.com/auth/reminders";
const KEEP_APP: &str = "com.google.android.keep";
const KEEP_CLIENT_SIG: &str = "38918a453d07199354f8b19af05ec6562ced5788";

/// Seconds before expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// What the user supplies to open a Keep session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub master_token: String,
    pub android_id: String,
}

/// A usable Keep session.
#[derive(Debug, Clone)]
pub struct KeepSession {
    credentials: Credentials,
    oauth_token: String,
    expires_at: DateTime<Utc>,
}

impl KeepSession {
    #[must_use]
    pub fn oauth_token(&self) -> &str {
        &self.oauth_token
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.credentials.email
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

/// Exchange the master token for a Keep OAuth token.
///
/// # Errors
///
/// Returns `AuthError::Http` on transport failure and `AuthError::Rejected`
/// when Google answers with an `Error=` line or without an `Auth=` line.
pub async fn authenticate(
    client: &reqwest::Client,
    credentials: &Credentials,
) -> Result<KeepSession, AuthError> {
    tracing::debug!(email = %credentials.email, "exchanging master token for Keep OAuth token");

    let response = client
        .post(AUTH_URL)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(exchange_form(credentials))
        .send()
        .await
        .map_err(|e| AuthError::Http(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AuthError::Http(e.to_string()))?;

    let (oauth_token, expires_at) = parse_auth_response(&text).map_err(|err| {
        tracing::warn!(status = status.as_u16(), %err, "token exchange rejected");
        err
    })?;

    Ok(KeepSession {
        credentials: credentials.clone(),
        oauth_token,
        expires_at,
    })
}

/// Parse the body of an auth response into the token and its expiry.
///
/// A missing `Expiry` is treated as one hour from now.
///
/// # Errors
///
/// Returns `AuthError::Rejected` if the body carries `Error=` or lacks `Auth=`.
pub fn parse_auth_response(body: &str) -> Result<(String, DateTime<Utc>), AuthError> {
    let fields: HashMap<&str, &str> = body
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect();

    if let Some(error) = fields.get("Error") {
        return Err(AuthError::Rejected((*error).to_string()));
    }

    let token = fields
        .get("Auth")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::Rejected("response did not contain an Auth token".into()))?;

    let expires_at = fields
        .get("Expiry")
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or_else(|| Utc::now() + Duration::hours(1));

    Ok(((*token).to_string(), expires_at))
}

/// Random 16-hex-digit device identifier.
///
/// # Errors
///
/// Returns `AuthError::Other` if the OS random source is unavailable.
pub fn generate_android_id() -> Result<String, AuthError> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).map_err(|e| AuthError::Other(format!("random source: {e}")))?;
    Ok(buf.iter().fold(String::with_capacity(16), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    }))
}

fn exchange_form(credentials: &Credentials) -> String {
    let fields = [
        ("accountType", "HOSTED_OR_GOOGLE"),
        ("Email", credentials.email.as_str()),
        ("has_permission", "1"),
        ("EncryptedPasswd", credentials.master_token.as_str()),
        ("service", KEEP_SCOPES),
        ("source", "android"),
        ("androidId", credentials.android_id.as_str()),
        ("app", KEEP_APP),
        ("client_sig", KEEP_CLIENT_SIG),
        ("device_country", "us"),
        ("operatorCountry", "us"),
        ("lang", "en"),
        ("sdk_version", "17"),
        ("google_play_services_version", "240913000"),
    ];
    fields
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
