// WebAccess JSON service HTTP client
//
// Wraps `reqwest::Client` with WebAccess URL construction, the Basic-Auth
// header and envelope decoding. One instance targets one host with one
// set of credentials; it is cheap to build per poll cycle because the
// underlying `reqwest::Client` is shared.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::codec::{self, TelemetryFrame};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for a WebAccess SCADA node.
#[derive(Clone)]
pub struct WebAccessClient {
    http: reqwest::Client,
    base_url: Url,
    authorization: SecretString,
}

impl std::fmt::Debug for WebAccessClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebAccessClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl WebAccessClient {
    /// Create a client with its own `reqwest::Client` built from `transport`.
    pub fn new(
        base_url: Url,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, username, password))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: &str,
        password: &SecretString,
    ) -> Self {
        let authorization =
            SecretString::from(codec::basic_auth_value(username, password.expose_secret()));
        Self {
            http,
            base_url,
            authorization,
        }
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Read the current value of every named tag.
    ///
    /// `POST /WaWebService/Json/GetTagValue/{suffix}`
    pub async fn get_tag_values<S: AsRef<str>>(
        &self,
        suffix: &str,
        tags: &[S],
    ) -> Result<TelemetryFrame, Error> {
        let url = self.base_url.join(&codec::query_path(suffix))?;
        debug!(%url, tags = tags.len(), "POST tag query");

        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.authorization.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .body(codec::encode_query(tags))
            .send()
            .await
            .map_err(Error::Transport)?;

        let body = Self::success_body(resp).await?;
        codec::decode_frame(&body)
    }

    /// Write one tag.
    ///
    /// `GET /WaWebService/Json/SetTagValue/{group}/{tag}/{value}`
    pub async fn set_tag_value(&self, group: &str, tag: &str, value: i64) -> Result<(), Error> {
        let url = codec::encode_command(&self.base_url, group, tag, value)?;
        debug!(%url, "GET set tag value");

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.authorization.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::success_body(resp).await?;
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Read the body of a 2xx response, or turn anything else into
    /// `Error::Status` with the body kept for diagnostics.
    async fn success_body(resp: reqwest::Response) -> Result<Vec<u8>, Error> {
        let status = resp.status();
        if status.is_success() {
            let bytes = resp.bytes().await.map_err(Error::Transport)?;
            return Ok(bytes.to_vec());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }
}
