// Hand-crafted async HTTP client for the router's RCI interface.
//
// Base path: /rci/
// Auth: challenge-response session cookie (see auth.rs)

use std::sync::OnceLock;

use reqwest::StatusCode;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::auth;
use crate::transport::TransportConfig;
use crate::types::{CommandOutcome, DnsProxyRoute, FqdnObjectGroup, VersionInfo};

#[derive(Serialize)]
struct ParseRequest<'a> {
    commands: &'a [String],
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    login: &'a str,
    password: &'a str,
}

/// Async client for the router's RCI endpoints.
///
/// Sessions are cookie-based; call [`login`](Self::login) before any
/// other request. The firmware version is fetched once right after a
/// successful login and cached for the process lifetime, so version
/// gating needs no extra device round-trip.
pub struct RciClient {
    http: reqwest::Client,
    base_url: Url,
    firmware: OnceLock<String>,
}

impl RciClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from the router base URL and transport settings.
    ///
    /// Always installs a cookie jar -- the device session lives in a
    /// cookie issued by the login endpoint.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let transport = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = transport.build_client()?;
        let base_url = normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            firmware: OnceLock::new(),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages cookies).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            firmware: OnceLock::new(),
        }
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Establish a session with the device.
    ///
    /// Probes `/auth`: a 200 means a previous session cookie is still
    /// valid; a 401 carries the realm/challenge headers for the digest
    /// handshake. On success the firmware version is fetched and cached.
    pub async fn login(&self, login: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.url("auth");
        debug!("GET {url}");
        let probe = self.http.get(url.clone()).send().await?;

        match probe.status() {
            StatusCode::OK => {
                debug!("existing session still valid");
            }
            StatusCode::UNAUTHORIZED => {
                let realm = header_value(&probe, auth::REALM_HEADER)?;
                let challenge = header_value(&probe, auth::CHALLENGE_HEADER)?;
                let digest = auth::response_digest(login, password, &realm, &challenge);

                debug!("POST {url}");
                let resp = self
                    .http
                    .post(url)
                    .json(&LoginRequest {
                        login,
                        password: &digest,
                    })
                    .send()
                    .await?;

                if !resp.status().is_success() {
                    return Err(Error::Authentication {
                        message: format!("login rejected (HTTP {})", resp.status().as_u16()),
                    });
                }
                debug!("session established");
            }
            status => {
                return Err(Error::Authentication {
                    message: format!("unexpected auth probe response (HTTP {})", status.as_u16()),
                });
            }
        }

        // Cache the firmware version for the caller's version gate.
        let version = self.show_version().await?;
        let _ = self.firmware.set(version.release);
        Ok(())
    }

    /// Firmware release cached during [`login`](Self::login).
    ///
    /// `None` until a login has succeeded.
    pub fn cached_firmware(&self) -> Option<&str> {
        self.firmware.get().map(String::as_str)
    }

    // ── Device reads ─────────────────────────────────────────────────

    /// `show version` -- firmware release and hardware identity.
    pub async fn show_version(&self) -> Result<VersionInfo, Error> {
        self.get("rci/show/version").await
    }

    /// `show object-group fqdn` -- every device-resident domain group.
    pub async fn show_object_groups(&self) -> Result<Vec<FqdnObjectGroup>, Error> {
        self.get("rci/show/object-group/fqdn").await
    }

    /// `show dns-proxy route` -- every object-group → interface binding.
    pub async fn show_dns_proxy_routes(&self) -> Result<Vec<DnsProxyRoute>, Error> {
        self.get("rci/show/dns-proxy/route").await
    }

    // ── Device write ─────────────────────────────────────────────────

    /// Submit an ordered command batch through the `parse` endpoint.
    ///
    /// The device answers with one `{status, message}` per command, in
    /// submission order. Individual command failures do NOT fail the
    /// HTTP call -- callers inspect the outcomes.
    pub async fn execute(&self, commands: &[String]) -> Result<Vec<CommandOutcome>, Error> {
        let url = self.url("rci/parse");
        debug!(batch_len = commands.len(), "POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&ParseRequest { commands })
            .send()
            .await?;
        self.handle_response(resp).await
    }

    // ── Plumbing ─────────────────────────────────────────────────────

    /// Join a relative path (e.g. `"rci/show/version"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Device {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            // Truncate by characters, not bytes -- the device may answer
            // with localized (multibyte) HTML error pages.
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}

/// Ensure the base URL ends with a single trailing slash so relative
/// joins behave.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

fn header_value(resp: &reqwest::Response, name: &str) -> Result<String, Error> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| Error::Authentication {
            message: format!("device did not send {name} header"),
        })
}
