use std::env;

/// Cloud name used by the reference deployment; not a secret, safe to ship
/// as a fallback. Key and secret must always come from the environment.
const DEFAULT_CLOUD_NAME: &str = "dwm9m3dwk";

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub port: u16,
}

pub fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let cloud_name =
        env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_else(|_| DEFAULT_CLOUD_NAME.to_string());

    let api_key = env::var("CLOUDINARY_API_KEY")
        .map_err(|_| "CLOUDINARY_API_KEY environment variable is required")?;

    let api_secret = env::var("CLOUDINARY_API_SECRET")
        .map_err(|_| "CLOUDINARY_API_SECRET environment variable is required")?;

    let port = match env::var("PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?,
        Err(_) => DEFAULT_PORT,
    };

    Ok(Config {
        cloud_name,
        api_key,
        api_secret,
        port,
    })
}
