use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;

/// IPL match prediction server
#[derive(Parser, Debug, Clone)]
#[command(name = "ipl-predictor", version, about)]
pub struct Config {
    /// Web form listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8501")]
    pub listen_addr: String,

    /// First-innings score model artifact (JSON)
    #[arg(long, env = "SCORE_MODEL_PATH", default_value = "models/innings1.json")]
    pub score_model: String,

    /// Second-innings win-probability model artifact (JSON)
    #[arg(long, env = "WIN_MODEL_PATH", default_value = "models/innings2.json")]
    pub win_model: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("listen_addr '{}' is not a valid socket address", self.listen_addr);
        }
        if !Path::new(&self.score_model).is_file() {
            anyhow::bail!(
                "score model artifact not found at '{}'. Set SCORE_MODEL_PATH or --score-model.",
                self.score_model
            );
        }
        if !Path::new(&self.win_model).is_file() {
            anyhow::bail!(
                "win model artifact not found at '{}'. Set WIN_MODEL_PATH or --win-model.",
                self.win_model
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(addr: &str) -> Config {
        Config {
            listen_addr: addr.into(),
            score_model: concat!(env!("CARGO_MANIFEST_DIR"), "/models/innings1.json").into(),
            win_model: concat!(env!("CARGO_MANIFEST_DIR"), "/models/innings2.json").into(),
        }
    }

    #[test]
    fn test_defaults_parse() {
        let cfg = Config::parse_from(["ipl-predictor"]);
        assert_eq!(cfg.listen_addr, "0.0.0.0:8501");
        assert_eq!(cfg.score_model, "models/innings1.json");
        assert_eq!(cfg.win_model, "models/innings2.json");
    }

    #[test]
    fn test_validate_accepts_bundled_models() {
        assert!(config("127.0.0.1:8501").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_addr() {
        assert!(config("not-an-address").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_model() {
        let mut cfg = config("127.0.0.1:8501");
        cfg.win_model = "/nonexistent/innings2.json".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("win model"));
    }
}
