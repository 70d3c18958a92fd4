//! Validation of submitted image URLs.

use std::fmt;

use thiserror::Error;
use url::Url;

/// The submitted text was empty or not an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{input} is not a valid URL")]
pub struct InvalidUrl {
    pub input: String,
}

/// An absolute URL naming the source image, with a scheme and a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedUrl(Url);

impl SubmittedUrl {
    /// Validate raw request text. Surrounding whitespace is ignored when
    /// parsing, but a rejection reports the text exactly as received.
    pub fn parse(raw: &str) -> Result<Self, InvalidUrl> {
        let input = raw.trim();
        let invalid = || InvalidUrl {
            input: raw.to_string(),
        };

        if input.is_empty() {
            return Err(invalid());
        }

        let url = Url::parse(input).map_err(|_| invalid())?;
        if !url.has_host() || url.host_str().is_some_and(str::is_empty) {
            return Err(invalid());
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for SubmittedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
