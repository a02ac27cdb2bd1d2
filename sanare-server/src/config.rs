//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How activation codes are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpMode {
    /// Fixed demo code, no delivery channel required
    Fixed,
    /// Random 6-digit codes, stored hashed
    Random,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port
    pub port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Standard subscription price in whole currency units
    pub base_price: i64,
    /// Activation code mode (env: OTP_MODE, `fixed` or `random`)
    pub otp_mode: OtpMode,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let otp_mode = match std::env::var("OTP_MODE").as_deref() {
            Ok("random") => OtpMode::Random,
            Ok("fixed") | Err(_) => OtpMode::Fixed,
            Ok(other) => return Err(format!("OTP_MODE must be fixed or random, got {other}").into()),
        };

        // The fixed demo code must not reach production
        if environment == "production" && otp_mode == OtpMode::Fixed {
            return Err("OTP_MODE=fixed is not allowed in production".into());
        }

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment,
            base_price: std::env::var("BASE_PRICE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(crate::seed::BASE_PRICE),
            otp_mode,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "development".into(),
            base_price: crate::seed::BASE_PRICE,
            otp_mode: OtpMode::Fixed,
        }
    }
}
