use clap::Args;

use sekolah_lib::sec::Scope;

use crate::error::{self, Context};
use crate::formatting::{datetime_to_string, DateFormat};
use crate::input;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// email of the account
    ///
    /// prompted for when not given
    #[arg(short, long)]
    email: Option<String>,

    /// password of the account
    ///
    /// prompted for without echo when not given
    #[arg(long)]
    password: Option<String>,
}

pub async fn login(state: &AppState, args: LoginArgs) -> error::Result {
    let email = match args.email {
        Some(email) => email,
        None => input::read_stdin_trimmed("email: ")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => input::read_password("password: ")
            .context("failed to read password")?,
    };

    let user = state.session.login(&email, &password).await
        .context("login failed")?;

    println!("logged in as {} ({})", user.username, user.role);

    Ok(())
}

/// asks for credentials until a login succeeds. false when the user gave up
/// by entering an empty email.
pub async fn prompt_login(state: &AppState) -> error::Result<bool> {
    println!("login to {} (empty email to quit)", state.settings.api_url);

    loop {
        let email = input::read_stdin_trimmed("email: ")?;

        if email.is_empty() {
            return Ok(false);
        }

        let password = input::read_password("password: ")
            .context("failed to read password")?;

        if let Some(user) = state.session.login(&email, &password).await {
            println!("logged in as {} ({})", user.username, user.role);

            return Ok(true);
        }

        println!("login failed, try again");
    }
}

pub fn logout(state: &AppState) -> error::Result {
    state.session.logout();

    Ok(())
}

fn scope_text(scope: &Scope) -> String {
    match scope {
        Scope::All => "all levels".to_owned(),
        Scope::Tags(tags) if tags.is_empty() => "nothing".to_owned(),
        Scope::Tags(tags) => tags.iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

pub fn status(state: &AppState) -> error::Result {
    let snapshot = state.session.snapshot();

    let Some(user) = &snapshot.user else {
        println!("not logged in");

        return Ok(());
    };

    println!("user: {} <{}>", user.username, user.email);

    match user.canonical_role() {
        Some(role) => println!("role: {} ({})", role.title(), role.code()),
        None => println!("role: {} (unrecognized)", user.role),
    }

    println!("scope: {}", scope_text(&snapshot.scope()));

    if let Some(expiry) = &snapshot.expiry {
        println!("expires: {}", datetime_to_string(expiry, &DateFormat::Local));
    }

    Ok(())
}

#[derive(Debug, Args)]
pub struct ForgotArgs {
    /// email of the account to reset
    #[arg(short, long)]
    email: String,
}

pub async fn forgot_password(state: &AppState, args: ForgotArgs) -> error::Result {
    state.session.forgot_password(&args.email).await?;

    Ok(())
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// token from the reset link
    #[arg(short, long)]
    token: String,
}

pub async fn reset_password(state: &AppState, args: ResetArgs) -> error::Result {
    let password = input::read_password("new password: ")
        .context("failed to read password")?;
    let confirm = input::read_password("confirm password: ")
        .context("failed to read password")?;

    if password != confirm {
        return Err(error::Error::new().context("passwords do not match"));
    }

    state.session.reset_password(&args.token, &password).await?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn scope_descriptions() {
        assert_eq!(scope_text(&Scope::All), "all levels");
        assert_eq!(scope_text(&Scope::none()), "nothing");
        assert_eq!(
            scope_text(&Scope::Tags(BTreeSet::from(["PGTK".to_owned(), "TK".to_owned()]))),
            "PGTK, TK"
        );
    }
}
