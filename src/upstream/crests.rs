//! Crest image CDN client.

use crate::config::CrestConfig;
use crate::upstream::{build_http_client, parse_url, FetchError, UpstreamReply};

#[derive(Clone, Debug)]
pub struct CrestClient {
    http: reqwest::Client,
    trusted_prefix: String,
}

impl CrestClient {
    pub fn new(config: &CrestConfig, connect_secs: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client(connect_secs, config.timeout_secs)?,
            trusted_prefix: config.trusted_prefix.clone(),
        })
    }

    /// Whether `url` points into the allow-listed CDN.
    pub fn is_trusted(&self, url: &str) -> bool {
        url.starts_with(&self.trusted_prefix)
    }

    /// Binary GET of an image; any upstream status is returned as a reply.
    pub async fn fetch(&self, url: &str) -> Result<UpstreamReply, FetchError> {
        let url = parse_url(url)?;
        let response = self.http.get(url).send().await?;
        Ok(UpstreamReply::read(response).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_is_prefix_based() {
        let client = CrestClient::new(&CrestConfig::default(), 5).unwrap();
        assert!(client.is_trusted("https://crests.football-data.org/57.png"));
        assert!(!client.is_trusted("https://crests.football-data.org.evil.com/57.png"));
        assert!(!client.is_trusted("http://crests.football-data.org/57.png"));
        assert!(!client.is_trusted("https://example.com/?https://crests.football-data.org/"));
    }
}
