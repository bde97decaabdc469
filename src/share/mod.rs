//! Shareable links.
//!
//! Form state is serialized to JSON, base64url-encoded (no padding), and
//! carried in an `s` query parameter so a recipient's form opens prefilled.

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ExplainLevel, Mode};

/// The slice of form state worth sharing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ExplainLevel>,
    pub prompt: String,
}

/// Encode `state` into a link on `base_url`.
pub fn encode_share_url(base_url: &str, state: &ShareState) -> Result<String> {
    let blob = URL_SAFE_NO_PAD.encode(serde_json::to_vec(state)?);
    let mut url = Url::parse(base_url).context("invalid share base URL")?;
    url.query_pairs_mut().append_pair("s", &blob);
    Ok(url.to_string())
}

/// Decode a share link (or a bare `s=` blob) back into form state.
pub fn decode_share_state(input: &str) -> Result<ShareState> {
    let blob = match Url::parse(input.trim()) {
        Ok(url) => url
            .query_pairs()
            .find(|(k, _)| k == "s")
            .map(|(_, v)| v.into_owned())
            .ok_or_else(|| anyhow!("share link has no 's' parameter"))?,
        Err(_) => input.trim().to_string(),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(blob.as_bytes())
        .context("share payload is not valid base64url")?;
    serde_json::from_slice(&bytes).context("share payload is not a valid form state")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_url() {
        let state = ShareState {
            mode: Some(Mode::Career),
            explain: Some(ExplainLevel::Simple),
            prompt: "Take the Berlin offer or stay in Madrid?".into(),
        };

        let url = encode_share_url("https://example.com/", &state).unwrap();
        assert!(url.contains("s="));
        assert_eq!(decode_share_state(&url).unwrap(), state);
    }

    #[test]
    fn decodes_a_bare_blob() {
        let state = ShareState {
            mode: None,
            explain: None,
            prompt: "rent or buy".into(),
        };
        let url = encode_share_url("https://example.com/", &state).unwrap();
        let blob = url.split("s=").nth(1).unwrap();

        assert_eq!(decode_share_state(blob).unwrap(), state);
    }

    #[test]
    fn rejects_a_link_without_state() {
        assert!(decode_share_state("https://example.com/?q=1").is_err());
        assert!(decode_share_state("!!not-base64!!").is_err());
    }
}
