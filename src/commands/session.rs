// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::models::Session;

/// Email/password wins over a bare token. With neither the client runs
/// unauthenticated and protected endpoints answer 401.
pub fn resolve(base_url: &str, m: &clap::ArgMatches) -> Result<Option<Session>> {
    let email = m.get_one::<String>("email");
    let password = m.get_one::<String>("password");
    if let (Some(email), Some(password)) = (email, password) {
        let session = ApiClient::login(base_url, email, password)
            .with_context(|| format!("Login as {} failed", email))?;
        return Ok(Some(session));
    }
    Ok(m
        .get_one::<String>("token")
        .filter(|t| !t.trim().is_empty())
        .map(|t| Session::from_token(t)))
}

/// `sakubumi login`: prints the token so it can be exported as
/// `SAKUBUMI_TOKEN` for later commands.
pub fn login(base_url: &str, m: &clap::ArgMatches) -> Result<()> {
    match resolve(base_url, m)? {
        Some(session) => {
            if let Some(user) = &session.user {
                eprintln!("Logged in as {}", user.name);
            }
            println!("{}", session.access_token);
            Ok(())
        }
        None => anyhow::bail!("Pass --email and --password to log in"),
    }
}

pub fn base_url(cfg_url: &str, m: &clap::ArgMatches) -> String {
    m.get_one::<String>("api-url")
        .cloned()
        .unwrap_or_else(|| cfg_url.to_string())
}
