use std::{env, net::SocketAddr, str::FromStr};

use url::Url;

/// The ordering system renders the public weekly menu on its login page, so
/// fetching it needs no account.
pub static DEFAULT_MENU_URL: &str = "https://strav.nasejidelna.cz/0341/login";

#[derive(Debug, Clone)]
pub struct Config {
    host: String,
    port: String,
    menu_url: Url,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let menu_url = match env::var("MENU_URL") {
            Ok(raw) => match Url::parse(&raw) {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("invalid MENU_URL `{raw}` ({e}), using the default");
                    default_menu_url()
                }
            },
            Err(_) => default_menu_url(),
        };
        Self {
            host,
            port,
            menu_url,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        let addr = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr).unwrap_or_else(|e| panic!("invalid listen address {addr}: {e}"))
    }

    pub const fn menu_url(&self) -> &Url {
        &self.menu_url
    }
}

fn default_menu_url() -> Url {
    Url::parse(DEFAULT_MENU_URL).expect("default menu url should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr_and_url() {
        let config = Config::from_env();
        assert_eq!(config.addr().port(), 3000);
        assert_eq!(config.menu_url().as_str(), DEFAULT_MENU_URL);
    }
}
