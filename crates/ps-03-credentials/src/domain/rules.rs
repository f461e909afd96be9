//! Endpoint acceptance.
//!
//! An endpoint is accepted when it is an `https` URL whose host contains
//! `infura.io` and whose path contains `/v3/`.

use crate::error::{CredentialError, CredentialResult};

const REQUIRED_HOST: &str = "infura.io";
const REQUIRED_PATH: &str = "/v3/";

fn invalid(reason: &str) -> CredentialError {
    CredentialError::InvalidEndpoint {
        reason: reason.to_string(),
    }
}

pub fn validate_endpoint_url(url: &str) -> CredentialResult<()> {
    let url = url.trim();
    let (scheme, rest) = url.split_once("://").ok_or_else(|| invalid("not a URL"))?;
    if !scheme.eq_ignore_ascii_case("https") {
        return Err(invalid("must use https"));
    }

    let (authority, path) = match rest.find(&['/', '?', '#'][..]) {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    // userinfo@host:port
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    if !host.to_ascii_lowercase().contains(REQUIRED_HOST) {
        return Err(invalid("host must be an infura.io endpoint"));
    }

    let path = path.split(&['?', '#'][..]).next().unwrap_or(path);
    if !path.contains(REQUIRED_PATH) {
        return Err(invalid("path must contain /v3/"));
    }
    Ok(())
}
