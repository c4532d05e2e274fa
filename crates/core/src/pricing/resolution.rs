use crate::domain::pricing::PricingConfiguration;

/// Deterministic default-configuration choice when the caller does not pin
/// one explicitly (calculator views, default quote creation).
///
/// Active configurations win, most recently updated first; with no active
/// configuration the most recently updated one overall is used. `None` means
/// nothing is configured yet — a recoverable state the caller must surface,
/// not an error.
pub fn select_configuration(configs: &[PricingConfiguration]) -> Option<&PricingConfiguration> {
    configs
        .iter()
        .filter(|config| config.is_active)
        .max_by_key(|config| config.updated_at)
        .or_else(|| configs.iter().max_by_key(|config| config.updated_at))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::domain::pricing::PricingConfiguration;

    use super::select_configuration;

    fn config(name: &str, is_active: bool, updated_secs_ago: i64) -> PricingConfiguration {
        let mut config = PricingConfiguration::with_default_rates(name);
        config.is_active = is_active;
        config.updated_at = Utc::now() - Duration::seconds(updated_secs_ago);
        config
    }

    #[test]
    fn empty_store_resolves_to_none() {
        assert!(select_configuration(&[]).is_none());
    }

    #[test]
    fn falls_back_to_most_recently_updated_when_nothing_is_active() {
        let stale = config("a", false, 600);
        let fresh = config("b", false, 60);
        let configs = [stale, fresh.clone()];
        let chosen = select_configuration(&configs).expect("fallback");
        assert_eq!(chosen.name, fresh.name);
    }

    #[test]
    fn active_configuration_wins_regardless_of_timestamps() {
        let active_but_stale = config("a", true, 600);
        let fresh_inactive = config("b", false, 60);
        let configs = [active_but_stale.clone(), fresh_inactive];
        let chosen = select_configuration(&configs).expect("active");
        assert_eq!(chosen.name, active_but_stale.name);
    }

    #[test]
    fn most_recently_updated_active_breaks_ties() {
        let older_active = config("a", true, 600);
        let newer_active = config("b", true, 60);
        let configs = [older_active, newer_active.clone()];
        let chosen = select_configuration(&configs).expect("active");
        assert_eq!(chosen.name, newer_active.name);
    }
}
