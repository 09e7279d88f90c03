//! URL helpers shared by the validator, the fetcher and the CLI.

use url::Url;

/// Prefix `https://` to a URL that carries no http(s) scheme
///
/// Mirrors the request layer's hygiene step: real validation still happens in
/// [`crate::url_validator`], this only fixes bare `www.example.org/path` input.
#[must_use]
pub fn ensure_scheme(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Strip an optional `:port` suffix from a `host[:port]` authority string
///
/// Bracketed IPv6 literals keep their brackets removed as well, since
/// [`Url::host_str`] reports them that way too.
#[must_use]
pub fn host_without_port(authority: &str) -> &str {
    let authority = authority.trim();
    if let Some(rest) = authority.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    }
}

/// Lowercased host of a URL, or `None` when the URL has no host
#[must_use]
pub fn url_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    Some(host.to_ascii_lowercase())
}

/// `host[:port]` authority of a URL, used as the default caller host by the CLI
#[must_use]
pub fn url_authority(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
