//! OAuth2 browser consent flow and token lifecycle for Google APIs.
//!
//! Opens the user's browser for consent, captures the redirect on a
//! localhost `TcpListener`, exchanges the auth code for tokens, and
//! persists them to the token file. Stored tokens are refreshed in place
//! when they expire.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use mailcal_domain::{MailcalError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::InfraError;

/// Scopes requested during consent.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// OAuth2 token payload persisted to the token file.
///
/// Field names match what Python's
/// `google.oauth2.credentials.Credentials.to_json()` produces, so token
/// files written by either implementation are interchangeable. Both
/// `token` and `access_token` are accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleToken {
    /// The access token.
    #[serde(alias = "access_token")]
    pub token: String,
    /// Long-lived token used to mint new access tokens.
    pub refresh_token: Option<String>,
    /// Token endpoint URL.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// OAuth2 client ID.
    pub client_id: String,
    /// OAuth2 client secret (optional for PKCE-style clients).
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorized scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Token expiry time (RFC 3339).
    #[serde(default)]
    pub expiry: Option<String>,
    /// Authenticated account label, if known.
    #[serde(default, alias = "email")]
    pub account: Option<String>,
    #[serde(default)]
    pub universe_domain: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// OAuth2 client credentials from `credentials.json` (Desktop App type).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentials {
    pub installed: InstalledAppCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledAppCredentials {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Credential manager for a single token file.
///
/// `access_token` is the only entry point callers need: it loads the
/// stored token, refreshes it when stale, and falls back to a full
/// browser consent flow when no usable token exists.
pub struct GoogleAuth {
    http: reqwest::Client,
    token_path: PathBuf,
    credentials_path: PathBuf,
}

impl GoogleAuth {
    pub fn new(token_path: PathBuf, credentials_path: PathBuf) -> Self {
        Self { http: reqwest::Client::new(), token_path, credentials_path }
    }

    /// Produce a valid access token, running refresh or consent as needed.
    ///
    /// # Errors
    /// Returns `MailcalError::Auth` when the stored token is unusable and
    /// cannot be refreshed or re-granted.
    pub async fn access_token(&self) -> Result<String> {
        if !self.token_path.exists() {
            info!("No stored token found, starting OAuth consent flow");
            return Ok(self.consent_flow().await?.token);
        }

        let token = self.load_token()?;
        if !is_token_expired(&token) {
            return Ok(token.token);
        }

        if token.refresh_token.is_some() {
            return Ok(self.refresh(&token).await?.token);
        }

        info!("Stored token expired without a refresh token, starting OAuth consent flow");
        Ok(self.consent_flow().await?.token)
    }

    /// Read and parse the persisted token file.
    pub fn load_token(&self) -> Result<GoogleToken> {
        let contents = std::fs::read_to_string(&self.token_path).map_err(|e| {
            MailcalError::Auth(format!(
                "failed to read token file {}: {}",
                self.token_path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| MailcalError::Auth(format!("invalid token file: {}", e)))
    }

    fn save_token(&self, token: &GoogleToken) -> Result<()> {
        let contents = serde_json::to_string_pretty(token)
            .map_err(|e| MailcalError::Auth(format!("failed to encode token: {}", e)))?;
        std::fs::write(&self.token_path, contents).map_err(|e| {
            MailcalError::Auth(format!(
                "failed to write token file {}: {}",
                self.token_path.display(),
                e
            ))
        })
    }

    fn load_credentials(&self) -> Result<ClientCredentials> {
        if !self.credentials_path.exists() {
            return Err(MailcalError::Auth(format!(
                "credentials file not found: {}",
                self.credentials_path.display()
            )));
        }
        let contents = std::fs::read_to_string(&self.credentials_path).map_err(|e| {
            MailcalError::Auth(format!("failed to read credentials file: {}", e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| MailcalError::Auth(format!("invalid credentials file: {}", e)))
    }

    /// Run the full browser consent flow and persist the granted token.
    ///
    /// 1. Load `credentials.json`
    /// 2. Start a `TcpListener` on a random loopback port
    /// 3. Open the browser with the authorization URL
    /// 4. Wait for the redirect carrying the auth code
    /// 5. Exchange the code for tokens and save them
    pub async fn consent_flow(&self) -> Result<GoogleToken> {
        let credentials = self.load_credentials()?;
        let installed = credentials.installed;

        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|e| MailcalError::Auth(format!("failed to bind loopback listener: {}", e)))?;
        let port = listener
            .local_addr()
            .map_err(|e| MailcalError::Auth(format!("failed to inspect listener: {}", e)))?
            .port();
        let redirect_uri = format!("http://localhost:{port}");

        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            installed.auth_uri,
            urlencoding::encode(&installed.client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode(&SCOPES.join(" ")),
        );

        info!("Opening browser for Google OAuth consent");
        if let Err(error) = open::that(&auth_url) {
            warn!(%error, %auth_url, "Failed to open browser, visit the URL manually");
        }

        let code = wait_for_auth_code(&listener)?;

        let mut form = vec![
            ("code", code.as_str()),
            ("client_id", installed.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        if let Some(secret) = installed.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self
            .http
            .post(&installed.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(InfraError::from)?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(MailcalError::Auth(format!(
                "token exchange failed (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| MailcalError::Auth(format!("malformed token response: {}", e)))?;
        let access_token = payload["access_token"]
            .as_str()
            .ok_or_else(|| MailcalError::Auth("no access_token in token response".into()))?;
        let expires_in = payload["expires_in"].as_u64().unwrap_or(3600);
        let expiry = Utc::now() + Duration::seconds(i64::try_from(expires_in).unwrap_or(3600));

        let token = GoogleToken {
            token: access_token.to_string(),
            refresh_token: payload["refresh_token"].as_str().map(str::to_owned),
            token_uri: installed.token_uri.clone(),
            client_id: installed.client_id.clone(),
            client_secret: installed.client_secret.clone(),
            scopes: SCOPES.iter().map(|s| (*s).to_string()).collect(),
            expiry: Some(expiry.to_rfc3339()),
            account: None,
            universe_domain: Some("googleapis.com".to_string()),
        };

        self.save_token(&token)?;
        Ok(token)
    }

    /// Mint a new access token from the refresh token and persist it.
    async fn refresh(&self, token: &GoogleToken) -> Result<GoogleToken> {
        let refresh_token = token.refresh_token.as_deref().ok_or_else(|| {
            MailcalError::Auth("token expired and no refresh token is available".into())
        })?;

        debug!("Refreshing Google access token");

        let mut form = vec![
            ("client_id", token.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = token.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response =
            self.http.post(&token.token_uri).form(&form).send().await.map_err(InfraError::from)?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(MailcalError::Auth(format!(
                "token refresh failed (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| MailcalError::Auth(format!("malformed refresh response: {}", e)))?;

        let mut refreshed = token.clone();
        refreshed.token = payload["access_token"]
            .as_str()
            .ok_or_else(|| MailcalError::Auth("no access_token in refresh response".into()))?
            .to_string();
        let expires_in = payload["expires_in"].as_u64().unwrap_or(3600);
        let expiry = Utc::now() + Duration::seconds(i64::try_from(expires_in).unwrap_or(3600));
        refreshed.expiry = Some(expiry.to_rfc3339());

        self.save_token(&refreshed)?;
        Ok(refreshed)
    }
}

/// Check whether a token is expired based on its expiry field.
///
/// Tokens inside a 60 second window of their expiry count as expired.
/// Missing or unparsable expiry fields count as expired so the caller
/// attempts a refresh rather than sending a dead token.
pub fn is_token_expired(token: &GoogleToken) -> bool {
    let Some(expiry) = token.expiry.as_deref() else { return true };

    // Python writes "2026-02-08T12:00:00.000000Z" style expiries
    let parsed = DateTime::parse_from_rfc3339(&expiry.replace('Z', "+00:00"))
        .or_else(|_| DateTime::parse_from_rfc3339(expiry));

    match parsed {
        Ok(expiry) => expiry <= Utc::now() + Duration::seconds(60),
        Err(_) => true,
    }
}

/// Wait for the OAuth redirect and extract the auth code from the URL.
fn wait_for_auth_code(listener: &TcpListener) -> Result<String> {
    let (mut stream, _) = listener
        .accept()
        .map_err(|e| MailcalError::Auth(format!("failed to accept OAuth redirect: {}", e)))?;

    let mut buffer = [0u8; 4096];
    let read = stream
        .read(&mut buffer)
        .map_err(|e| MailcalError::Auth(format!("failed to read OAuth redirect: {}", e)))?;
    let request = String::from_utf8_lossy(&buffer[..read]);

    match parse_auth_code(&request) {
        Some(code) if !code.is_empty() => {
            send_browser_response(&mut stream, "Authorization successful! You can close this tab.");
            Ok(code)
        }
        _ if request.contains("error=") => {
            send_browser_response(&mut stream, "Authorization denied. You can close this tab.");
            Err(MailcalError::Auth("authorization denied by user".into()))
        }
        _ => {
            send_browser_response(
                &mut stream,
                "No authorization code received. You can close this tab.",
            );
            Err(MailcalError::Auth("no authorization code received".into()))
        }
    }
}

/// Extract the `code` parameter from the request line of the redirect,
/// e.g. `GET /?code=xxx&scope=... HTTP/1.1`.
fn parse_auth_code(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let path = line.split_whitespace().nth(1)?;
    let query = path.split('?').nth(1)?;
    let raw = query.split('&').find_map(|pair| pair.strip_prefix("code="))?;

    // The code may contain percent-escapes such as %2F
    let decoded =
        urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |value| value.into_owned());
    Some(decoded)
}

/// Send a minimal HTML page back to the browser tab.
fn send_browser_response(stream: &mut impl Write, message: &str) {
    let body = format!(
        "<html><body style=\"font-family: system-ui; text-align: center; padding: 40px;\">\
         <h2>{message}</h2></body></html>"
    );
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
