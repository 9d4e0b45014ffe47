use confique::Config;
use std::time::Duration;

/// Placeholder substituted with the student's roll number in resource URL templates
pub const ROLL_NO_PLACEHOLDER: &str = "{roll_no}";

/// Configuration for the upstream university service
#[derive(Debug, Config, Clone)]
pub struct UpstreamConfig {
    /// Sign-in endpoint of the university service
    #[config(env = "SIGN_URL")]
    pub sign_url: String,

    /// Credential domain sent along with every sign-in request
    #[config(env = "EXAMCELL_DOMAIN")]
    pub examcell_domain: String,

    /// Change-password endpoint of the university service
    #[config(env = "CHANGE_PASSWD_URL")]
    pub change_passwd_url: String,

    /// Basic student info URL template, must contain `{roll_no}`
    #[config(env = "BASIC_INFO_URL")]
    pub basic_info_url: String,

    /// Overall marks sheet URL template, must contain `{roll_no}`
    #[config(env = "OVERALL_MARKS_SHEET")]
    pub sem_results_url: String,

    /// Connect timeout for upstream calls in seconds (default: 3)
    #[config(env = "UPSTREAM_CONNECT_TIMEOUT", default = 3)]
    pub connect_timeout: u64,

    /// Total timeout for sign-in and change-password calls in seconds (default: 5)
    #[config(env = "UPSTREAM_AUTH_TIMEOUT", default = 5)]
    pub auth_timeout: u64,

    /// Total timeout for student resource calls in seconds (default: 10)
    #[config(env = "UPSTREAM_RESOURCE_TIMEOUT", default = 10)]
    pub resource_timeout: u64,

    /// `origin` header expected by the university service
    #[config(env = "UPSTREAM_ORIGIN", default = "https://academics.mrdu.edu.in")]
    pub origin: String,

    /// `referer` header expected by the university service
    #[config(env = "UPSTREAM_REFERER", default = "https://academics.mrdu.edu.in/")]
    pub referer: String,

    /// `user-agent` header expected by the university service
    #[config(
        env = "UPSTREAM_USER_AGENT",
        default = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36"
    )]
    pub user_agent: String,

    /// Skip TLS certificate verification for upstream calls (default: false)
    #[config(env = "UPSTREAM_ACCEPT_INVALID_CERTS", default = false)]
    pub accept_invalid_certs: bool,
}

impl UpstreamConfig {
    /// URL of the basic info resource for the given student
    pub fn basic_info_url_for(&self, roll_no: &str) -> String {
        render_template(&self.basic_info_url, roll_no)
    }

    /// URL of the semester results resource for the given student
    pub fn sem_results_url_for(&self, roll_no: &str) -> String {
        render_template(&self.sem_results_url, roll_no)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout)
    }

    pub fn resource_timeout(&self) -> Duration {
        Duration::from_secs(self.resource_timeout)
    }
}

fn render_template(template: &str, roll_no: &str) -> String {
    template.replace(ROLL_NO_PLACEHOLDER, roll_no)
}
