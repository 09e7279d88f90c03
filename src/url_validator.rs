//! Allow-list URL validation
//!
//! Every URL handed to the fetcher passes through [`validate`] first. The
//! check fails closed: anything that does not parse, uses an unexpected
//! scheme, or points at a host outside the allow-list is rejected before a
//! single byte goes over the network.

use tracing::warn;
use url::Url;

use crate::utils::host_without_port;

/// Validate `url` against allowed schemes and hosts.
///
/// * Schemes compare case-insensitively.
/// * The URL must carry a non-empty host.
/// * The host must equal one of `allowed_hosts`, or, with `allow_subdomains`,
///   end with `.` followed by one of them.
#[must_use]
pub fn validate(
    url: &str,
    allowed_schemes: &[impl AsRef<str>],
    allowed_hosts: &[impl AsRef<str>],
    allow_subdomains: bool,
) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("URL validation failed (unparseable: {e}): {url}");
            return false;
        }
    };

    let scheme = parsed.scheme();
    if !allowed_schemes
        .iter()
        .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(scheme))
    {
        warn!("URL validation failed (scheme '{scheme}' not allowed): {url}");
        return false;
    }

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_ascii_lowercase(),
        _ => {
            warn!("URL validation failed (host missing): {url}");
            return false;
        }
    };

    if !host_allowed(&host, allowed_hosts, allow_subdomains) {
        warn!("URL validation failed (host '{host}' not in allow-list): {url}");
        return false;
    }

    true
}

pub(crate) fn host_allowed(host: &str, allowed_hosts: &[impl AsRef<str>], allow_subdomains: bool) -> bool {
    allowed_hosts.iter().any(|allowed| {
        let allowed = allowed.as_ref().trim().to_ascii_lowercase();
        if allowed.is_empty() {
            return false;
        }
        host == allowed
            || (allow_subdomains
                && host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

/// Policy applied to the two sides of a comparison
#[derive(Debug, Clone)]
pub struct UrlPolicy<'a> {
    pub archive_schemes: &'a [String],
    pub live_schemes: &'a [String],
    pub live_domain: &'a str,
    pub allow_live_subdomains: bool,
}

impl UrlPolicy<'_> {
    /// Archived side: host must exactly equal the host the comparison request
    /// arrived on (port stripped). An empty caller host allows nothing.
    #[must_use]
    pub fn archived_allowed(&self, url: &str, caller_host: &str) -> bool {
        let host = host_without_port(caller_host);
        if host.is_empty() {
            warn!("URL validation failed (no caller host to scope archive URL): {url}");
            return false;
        }
        validate(url, self.archive_schemes, &[host], false)
    }

    /// Live side: official domain, or one of its subdomains when enabled.
    #[must_use]
    pub fn live_allowed(&self, url: &str) -> bool {
        validate(
            url,
            self.live_schemes,
            &[self.live_domain],
            self.allow_live_subdomains,
        )
    }
}

/// Owned copy of the side policies, consulted again for every redirect
/// and every document navigation a fetch makes after validation
#[derive(Debug, Clone)]
pub struct NavigationScope {
    archive_schemes: Vec<String>,
    live_schemes: Vec<String>,
    live_domain: String,
    allow_live_subdomains: bool,
}

impl NavigationScope {
    #[must_use]
    pub fn new(policy: &UrlPolicy<'_>) -> Self {
        Self {
            archive_schemes: policy.archive_schemes.to_vec(),
            live_schemes: policy.live_schemes.to_vec(),
            live_domain: policy.live_domain.to_string(),
            allow_live_subdomains: policy.allow_live_subdomains,
        }
    }

    fn policy(&self) -> UrlPolicy<'_> {
        UrlPolicy {
            archive_schemes: &self.archive_schemes,
            live_schemes: &self.live_schemes,
            live_domain: &self.live_domain,
            allow_live_subdomains: self.allow_live_subdomains,
        }
    }

    /// Whether a fetch that started at `origin` may go on to `target`
    ///
    /// An origin inside the live domain must stay inside it. Any other origin
    /// was validated as an archived URL, so the target must stay on the
    /// origin's own host.
    #[must_use]
    pub fn allows(&self, origin: &str, target: &str) -> bool {
        let Some(origin_host) = crate::utils::url_host(origin) else {
            warn!("Navigation refused (origin has no host): {origin} -> {target}");
            return false;
        };
        if host_allowed(&origin_host, &[self.live_domain.as_str()], self.allow_live_subdomains) {
            self.policy().live_allowed(target)
        } else {
            validate(target, self.archive_schemes.as_slice(), &[origin_host], false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTTPS: &[&str] = &["https"];
    const WEB: &[&str] = &["http", "https"];

    #[test]
    fn rejects_disallowed_scheme() {
        assert!(!validate("ftp://cdc.gov/x", WEB, &["cdc.gov"], true));
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        assert!(validate("HTTPS://cdc.gov/x", &["https"], &["cdc.gov"], false));
        assert!(validate("https://cdc.gov/x", &["HTTPS"], &["cdc.gov"], false));
    }

    #[test]
    fn rejects_unparseable_and_hostless() {
        assert!(!validate("not a url", WEB, &["cdc.gov"], true));
        assert!(!validate("https://", WEB, &["cdc.gov"], true));
        assert!(!validate("mailto:someone@cdc.gov", &["mailto"], &["cdc.gov"], true));
    }

    #[test]
    fn subdomain_matching_requires_dot_boundary() {
        assert!(validate("https://sub.cdc.gov/page", HTTPS, &["cdc.gov"], true));
        assert!(!validate("https://sub.cdc.gov/page", HTTPS, &["cdc.gov"], false));
        assert!(!validate("https://evilcdc.gov/", HTTPS, &["cdc.gov"], true));
        assert!(!validate("https://evil.example/", HTTPS, &["cdc.gov"], true));
    }

    #[test]
    fn host_comparison_ignores_case() {
        assert!(validate("https://WWW.CDC.GOV/", HTTPS, &["cdc.gov"], true));
        assert!(validate("https://cdc.gov/", HTTPS, &["CDC.gov"], false));
    }

    #[test]
    fn userinfo_does_not_fool_host_check() {
        assert!(!validate("https://cdc.gov@evil.example/", HTTPS, &["cdc.gov"], true));
    }

    #[test]
    fn archive_policy_scopes_to_caller_host() {
        let archive = vec!["http".to_string(), "https".to_string()];
        let live = vec!["https".to_string()];
        let policy = UrlPolicy {
            archive_schemes: &archive,
            live_schemes: &live,
            live_domain: "cdc.gov",
            allow_live_subdomains: true,
        };
        assert!(policy.archived_allowed("http://127.0.0.1:9090/www.cdc.gov/x", "127.0.0.1:9090"));
        assert!(!policy.archived_allowed("https://third-party.example/x", "127.0.0.1:9090"));
        assert!(!policy.archived_allowed("http://127.0.0.1/x", ""));
        assert!(policy.live_allowed("https://www.cdc.gov/x"));
        assert!(!policy.live_allowed("http://www.cdc.gov/x"));
    }

    #[test]
    fn navigation_stays_within_the_starting_side() {
        let archive = vec!["http".to_string(), "https".to_string()];
        let live = vec!["https".to_string()];
        let scope = NavigationScope::new(&UrlPolicy {
            archive_schemes: &archive,
            live_schemes: &live,
            live_domain: "cdc.gov",
            allow_live_subdomains: true,
        });

        assert!(scope.allows("https://cdc.gov/flu", "https://www.cdc.gov/flu/index.html"));
        assert!(!scope.allows("https://www.cdc.gov/flu", "https://evil.example/"));
        assert!(!scope.allows("https://www.cdc.gov/flu", "http://www.cdc.gov/flu"));
        assert!(!scope.allows("https://www.cdc.gov/", "http://169.254.169.254/latest"));

        let snapshot = "http://archive.local:9090/www.cdc.gov/flu";
        assert!(scope.allows(snapshot, "https://archive.local/www.cdc.gov/flu/"));
        assert!(!scope.allows(snapshot, "http://localhost:9090/secret"));
        assert!(!scope.allows(snapshot, "https://www.cdc.gov/flu"));
        assert!(!scope.allows("not a url", "https://www.cdc.gov/"));
    }
}
