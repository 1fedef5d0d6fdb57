#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    pub flutterwave_secret_key: String,
    pub flutterwave_environment: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").unwrap_or_else(|_| "1440".to_string());
        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());

        let flutterwave_secret_key = std::env::var("FLUTTERWAVE_SECRET_KEY")
            .unwrap_or_else(|_| "test_secret_key".to_string());
        let flutterwave_environment =
            std::env::var("FLUTTERWAVE_ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string());

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().expect("JWT_MAXAGE must be a number"),
            port: port.parse::<u16>().expect("PORT must be a number"),
            flutterwave_secret_key,
            flutterwave_environment,
        }
    }

    pub fn flutterwave_base_url(&self) -> &str {
        if self.flutterwave_environment == "production" {
            "https://api.flutterwave.com/v3"
        } else {
            "https://api.flutterwave.cloud/developersandbox"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_environment(environment: &str) -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            app_url: "http://localhost:3000".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_maxage: 60,
            port: 8000,
            flutterwave_secret_key: "test_secret_key".to_string(),
            flutterwave_environment: environment.to_string(),
        }
    }

    #[test]
    fn production_environment_targets_the_live_host() {
        let config = config_with_environment("production");
        assert_eq!(config.flutterwave_base_url(), "https://api.flutterwave.com/v3");
    }

    #[test]
    fn any_other_environment_targets_the_sandbox() {
        for environment in ["sandbox", "development", ""] {
            let config = config_with_environment(environment);
            assert!(config.flutterwave_base_url().contains("developersandbox"));
        }
    }
}
