use tracing::error;

/// Symbols accepted by the password policy.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

pub const MIN_PASSWORD_LEN: usize = 8;

fn min_length(plain: &str) -> bool {
    plain.chars().count() >= MIN_PASSWORD_LEN
}

fn has_lower(plain: &str) -> bool {
    plain.chars().any(|c| c.is_ascii_lowercase())
}

fn has_upper(plain: &str) -> bool {
    plain.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(plain: &str) -> bool {
    plain.chars().any(|c| c.is_ascii_digit())
}

fn has_symbol(plain: &str) -> bool {
    plain.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Checks the complexity policy, returning the first unmet requirement.
pub fn check_policy(plain: &str) -> Result<(), &'static str> {
    if !min_length(plain) {
        return Err("password must be at least 8 characters");
    }
    if !has_lower(plain) {
        return Err("password must contain a lowercase letter");
    }
    if !has_upper(plain) {
        return Err("password must contain an uppercase letter");
    }
    if !has_digit(plain) {
        return Err("password must contain a digit");
    }
    if !has_symbol(plain) {
        return Err("password must contain one of @$!%*?&");
    }
    Ok(())
}

pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e)
    })
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e)
    })
}
