use crate::{
    cli::actions::{server::Args, Action},
    ids::IdFormat,
};
use anyhow::{bail, Result};
use secrecy::SecretString;

fn token(matches: &clap::ArgMatches, name: &str) -> Option<SecretString> {
    matches
        .get_one::<String>(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::from(value.to_string()))
}

/// # Errors
/// Returns an error if no access token is configured.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .map(|dsn| dsn.trim().to_string())
        .filter(|dsn| !dsn.is_empty());
    let id_format = matches
        .get_one::<IdFormat>("id-format")
        .copied()
        .unwrap_or_default();

    let admin_token = token(matches, "admin-token");
    let editor_token = token(matches, "editor-token");
    let viewer_token = token(matches, "viewer-token");

    if admin_token.is_none() && editor_token.is_none() && viewer_token.is_none() {
        bail!("at least one of --admin-token, --editor-token or --viewer-token is required");
    }

    Ok(Action::Server(Args {
        port,
        dsn,
        id_format,
        admin_token,
        editor_token,
        viewer_token,
    }))
}
