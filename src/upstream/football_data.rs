//! Sports-data REST API client.

use crate::config::FootballDataConfig;
use crate::upstream::{build_http_client, parse_url, FetchError, UpstreamReply};

/// Header carrying the server-held API token.
pub const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Clone)]
pub struct FootballDataClient {
    http: reqwest::Client,
    base_url: String,
}

impl FootballDataClient {
    pub fn new(config: &FootballDataConfig, connect_secs: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client(connect_secs, config.timeout_secs)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Upstream location for a caller-supplied sub-path (plain concatenation).
    pub fn target_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `base_url + path` with the token attached and `params` as the query.
    ///
    /// Any upstream status is returned as a reply; only transport failures are errors.
    pub async fn get(
        &self,
        token: &str,
        path: &str,
        params: &[(String, String)],
    ) -> Result<UpstreamReply, FetchError> {
        let url = parse_url(&self.target_url(path))?;
        let response = self
            .http
            .get(url)
            .header(AUTH_HEADER, token)
            .query(params)
            .send()
            .await?;
        Ok(UpstreamReply::read(response).await?)
    }
}

impl std::fmt::Debug for FootballDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FootballDataClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_is_plain_concatenation() {
        let client = FootballDataClient::new(&FootballDataConfig::default(), 5).unwrap();
        assert_eq!(
            client.target_url("/competitions/PL/matches"),
            "https://api.football-data.org/v4/competitions/PL/matches"
        );
    }
}
