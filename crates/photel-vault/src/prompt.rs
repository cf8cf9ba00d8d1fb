// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password acquisition via TTY prompt or the PHOTEL_PASSWORD environment variable.

use std::io::IsTerminal;

use photel_core::PhotelError;
use secrecy::SecretString;

/// The environment variable name for providing the store password.
pub const PASSWORD_ENV_VAR: &str = "PHOTEL_PASSWORD";

fn password_from_env() -> Option<SecretString> {
    match std::env::var(PASSWORD_ENV_VAR) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn prompt(label: &str) -> Result<String, PhotelError> {
    eprint!("{label}: ");
    rpassword::read_password()
        .map_err(|e| PhotelError::Config(format!("failed to read password: {e}")))
}

fn no_password() -> PhotelError {
    PhotelError::Config(format!(
        "no password provided. Set {PASSWORD_ENV_VAR} or run interactively."
    ))
}

/// Get the store password.
///
/// Priority:
/// 1. `PHOTEL_PASSWORD` environment variable (for scripts and services)
/// 2. Interactive TTY prompt via `rpassword`
pub fn read_password() -> Result<SecretString, PhotelError> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }

    if !std::io::stdin().is_terminal() {
        return Err(no_password());
    }

    let password = prompt("Password")?;
    if password.is_empty() {
        return Err(PhotelError::Config("empty password not allowed".to_string()));
    }
    Ok(SecretString::from(password))
}

/// Get a new password for `setup`, prompting twice when interactive.
pub fn read_new_password() -> Result<SecretString, PhotelError> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }

    if !std::io::stdin().is_terminal() {
        return Err(no_password());
    }

    let first = zeroize::Zeroizing::new(prompt("New password")?);
    let second = zeroize::Zeroizing::new(prompt("Confirm password")?);
    if *first != *second {
        return Err(PhotelError::Config("passwords do not match".to_string()));
    }
    if first.is_empty() {
        return Err(PhotelError::Config("empty password not allowed".to_string()));
    }
    Ok(SecretString::from(first.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn password_from_env_var() {
        // SAFETY: env mutation is serialized across tests with #[serial].
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "from-env") };
        let result = read_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "from-env");
    }

    #[test]
    #[serial]
    fn new_password_from_env_var_skips_confirmation() {
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "from-env") };
        let result = read_new_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "from-env");
    }

    #[test]
    #[serial]
    fn empty_env_var_without_tty_is_rejected() {
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "") };
        // Test runners do not attach a terminal to stdin.
        let result = if std::io::stdin().is_terminal() {
            Err(no_password())
        } else {
            read_password()
        };
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert!(matches!(result, Err(PhotelError::Config(_))));
    }
}
