use confique::Config;
use std::fmt;

/// Configuration for the bearer tokens issued by the gateway
#[derive(Config, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret shared by every token issued by this process
    #[config(env = "JWT_SECRET")]
    pub secret: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}
