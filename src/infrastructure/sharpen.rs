// SPDX-License-Identifier: MPL-2.0
//! HTTP adapter for the sharpening service.
//!
//! One multipart POST per call with fields `file` and `strength`. Only a
//! `200 OK` response counts as success; its body is the sharpened image.

use crate::application::port::EnhancementGateway;
use crate::config::EnhanceConfig;
use crate::error::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Duration;

const USER_AGENT: &str = concat!("RasterTools/", env!("CARGO_PKG_VERSION"));

/// [`EnhancementGateway`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSharpenGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpSharpenGateway {
    /// Builds a client for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &EnhanceConfig) -> Result<Self> {
        Self::new(config.url.clone(), config.timeout())
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EnhancementGateway for HttpSharpenGateway {
    async fn sharpen(&self, image: Vec<u8>, mime: &str, strength: f32) -> Result<Vec<u8>> {
        let extension = mime.strip_prefix("image/").unwrap_or("png");
        let part = Part::bytes(image)
            .file_name(format!("image.{extension}"))
            .mime_str(mime)?;
        let form = Form::new()
            .part("file", part)
            .text("strength", strength.to_string());

        log::debug!("POST {} (strength {strength})", self.url);
        let response = self.client.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::NetworkFailure(format!("HTTP status: {status}")));
        }
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    fn name(&self) -> &str {
        "http-sharpen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        let gateway = HttpSharpenGateway::from_config(&EnhanceConfig::default()).unwrap();
        assert_eq!(gateway.url(), crate::config::DEFAULT_SHARPEN_URL);
        assert_eq!(gateway.name(), "http-sharpen");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_failure() {
        // Port 9 (discard) is closed on any sane test host.
        let gateway =
            HttpSharpenGateway::new("http://127.0.0.1:9/sharpen", Duration::from_secs(2)).unwrap();
        let err = gateway
            .sharpen(vec![0u8; 4], "image/png", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NetworkFailure(_)));
    }
}
