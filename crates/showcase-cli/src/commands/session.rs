use crate::app::App;
use anyhow::{Result, bail};
use showcase_core::navigation::Route;
use showcase_core::session::SignupValidation;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    app.session.login(email, password).await?;
    println!(
        "Signed in as {}",
        app.session.user_id().as_deref().unwrap_or(email)
    );
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    app.session.logout();
    Ok(())
}

pub async fn signup(
    app: &App,
    email: &str,
    password: &str,
    repeat_password: &str,
    is_admin: bool,
) -> Result<()> {
    let validation = SignupValidation::check(email, password, repeat_password);
    if !validation.is_valid() {
        for message in validation.errors() {
            eprintln!("{message}");
        }
        bail!("Signup form is invalid");
    }

    // Same guards as the signup view: signed in and administrator
    if !app.router.try_navigate(Route::Signup) {
        bail!("Only administrators can create accounts; sign in first");
    }

    app.session.signup(email, password, is_admin).await?;
    Ok(())
}

pub fn status(app: &App) -> Result<()> {
    let session = &app.session;
    if !session.is_authenticated() {
        println!("Not signed in");
        return Ok(());
    }

    println!("User:    {}", session.user_id().as_deref().unwrap_or("<unknown>"));
    println!("Admin:   {}", if session.is_admin() { "yes" } else { "no" });
    if let Some(expires_at) = session.expires_at() {
        println!("Expires: {}", expires_at.to_rfc3339());
    }
    Ok(())
}
