//! Shared User-Agent string for fetch traffic.

/// Project URL for User-Agent identification (RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/anilvpatel21/snapurl";

/// Default User-Agent for fetch requests (identifies the tool).
#[must_use]
pub(crate) fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("snapurl/{version} (+{PROJECT_UA_URL})")
}
