pub mod ace;
pub mod config;
pub mod session;
pub mod stats;
pub mod timer;
pub mod topic;

use studymon_core::error::Result;
use studymon_core::{Config, HttpStudyService};
use url::Url;

pub type CliResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Loads the config and builds a service client, honouring `--base-url`.
pub fn connect(base_url: Option<&Url>) -> Result<(Config, HttpStudyService)> {
    let config = Config::load()?;
    let service = match base_url {
        Some(url) => HttpStudyService::new(url.clone()),
        None => config.service()?,
    };
    tracing::debug!(base_url = %service.base_url(), "using study service");
    Ok((config, service))
}

/// Fixed-width bar for terminal charts. `fraction` is clamped to 0..=1.
pub fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::bar;

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(bar(0.0, 4), "....");
        assert_eq!(bar(0.5, 4), "##..");
        assert_eq!(bar(1.0, 4), "####");
        assert_eq!(bar(3.0, 4), "####");
        assert_eq!(bar(-1.0, 4), "....");
    }
}
