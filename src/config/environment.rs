use std::env;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub client_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let port = env::var("PORT")
            .ok()
            .map(|raw| {
                raw.parse::<u16>()
                    .map_err(|_| format!("PORT must be a valid port number, got '{}'", raw))
            })
            .transpose()?
            .unwrap_or(3000);

        let mail_api_url = env::var("MAIL_API_URL")
            .map_err(|_| "MAIL_API_URL must be set".to_string())?;

        let mail_api_key = env::var("MAIL_API_KEY")
            .map_err(|_| "MAIL_API_KEY must be set".to_string())?;

        let mail_from = env::var("MAIL_FROM")
            .unwrap_or_else(|_| "Travel Booking <support@travelbooking.com>".to_string());

        let client_url =
            env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            mail_api_url,
            mail_api_key,
            mail_from,
            client_url,
        })
    }
}
