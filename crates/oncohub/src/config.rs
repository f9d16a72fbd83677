//! CLI configuration: a thin layer over `oncohub_config`.
//!
//! Picks the active profile and applies `GlobalOpts` flag overrides
//! (--api-url, --email, --timeout, --insecure) before building the hub
//! configuration and the login credentials.

use oncohub_config::{Config, Defaults, Profile};
use oncohub_core::{Credentials, HubConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use oncohub_config::{config_path, load_config_or_default, save_config, store_password};

/// The profile a command runs against, overrides applied.
#[derive(Debug, Clone)]
pub struct Target {
    pub profile_name: String,
    pub profile: Profile,
    pub defaults: Defaults,
}

impl Target {
    pub fn hub_config(&self) -> Result<HubConfig, CliError> {
        Ok(oncohub_config::profile_to_hub_config(&self.profile, &self.defaults)?)
    }

    pub fn credentials(&self) -> Result<Credentials, CliError> {
        Ok(oncohub_config::resolve_credentials(&self.profile, &self.profile_name)?)
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    oncohub_config::active_profile_name(global.profile.as_deref(), config)
}

/// Error for a profile name missing from `config`, listing the known ones.
pub fn profile_not_found(name: String, config: &Config) -> CliError {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    CliError::ProfileNotFound {
        name,
        available: if names.is_empty() {
            "(none)".into()
        } else {
            names.join(", ")
        },
    }
}

/// Select the profile and layer flag values over it.
///
/// A profile named with `--profile` must exist. When the default profile
/// is missing, the built-in defaults (a local gateway) are used.
pub fn resolve_target(global: &GlobalOpts, config: &Config) -> Result<Target, CliError> {
    let profile_name = active_profile_name(global, config);
    let mut profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => return Err(profile_not_found(profile_name, config)),
        None => Profile::default(),
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref url) = global.confirm_url {
        profile.confirm_url.clone_from(url);
    }
    if let Some(ref email) = global.email {
        profile.email = Some(email.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(Target {
        profile_name,
        profile,
        defaults: config.defaults.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["oncohub"];
        argv.extend_from_slice(args);
        argv.push("login");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_ward() -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            "ward".into(),
            Profile {
                api_url: "https://oncohub.ward.ro".into(),
                email: Some("dr@ward.ro".into()),
                timeout: Some(12),
                ..Profile::default()
            },
        );
        config
    }

    #[test]
    fn flags_override_profile_values() {
        let target = resolve_target(
            &global(&["--profile", "ward", "--api-url", "http://127.0.0.1:8080", "--timeout", "3"]),
            &config_with_ward(),
        )
        .unwrap();
        assert_eq!(target.profile.api_url, "http://127.0.0.1:8080");
        assert_eq!(target.profile.email.as_deref(), Some("dr@ward.ro"));
        assert_eq!(target.profile.timeout, Some(3));
    }

    #[test]
    fn unknown_named_profile_is_an_error() {
        let err = resolve_target(&global(&["--profile", "icu"]), &config_with_ward()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "ward"));
    }

    #[test]
    fn missing_default_profile_uses_local_gateway() {
        let target = resolve_target(&global(&[]), &Config::default()).unwrap();
        assert_eq!(target.profile_name, "default");
        assert_eq!(target.profile.api_url, "http://localhost");
        assert_eq!(target.hub_config().unwrap().api_url.as_str(), "http://localhost/");
    }
}
