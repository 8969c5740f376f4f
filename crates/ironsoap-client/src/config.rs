use std::time::Duration;

/// One-time settings for [`UreqTransport`]. Deadlines live here; calls take no
/// per-request timeout.
///
/// [`UreqTransport`]: crate::UreqTransport
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct TransportConfig {
    #[builder(default = Duration::from_secs(30))]
    pub connect_timeout: Duration,
    #[builder(default = Duration::from_secs(60))]
    pub read_timeout: Duration,
    #[builder(default = Duration::from_secs(60))]
    pub write_timeout: Duration,
    /// Upper bound for a whole call, connect to last body byte.
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,
    #[builder(default = default_user_agent(), setter(into))]
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_user_agent() -> String {
    format!("ironsoap/{}", env!("CARGO_PKG_VERSION"))
}
