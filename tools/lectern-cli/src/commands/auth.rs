//! Account commands.

use anyhow::Result;
use dialoguer::{Confirm, Input, Password};
use lectern_catalog::schema::{SignInForm, SignUpForm};

use super::{LoginArgs, SignupArgs};
use crate::context::Context;

/// Sign in and remember the user.
pub async fn login(args: LoginArgs, ctx: &mut Context) -> Result<()> {
    if wants_fake(&args) {
        return fake_login(ctx);
    }

    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;
    let form = SignInForm::new(email, password);

    let output = ctx.output.clone();
    let session = ctx.session()?;

    let pb = output.spinner("Signing in...");
    let result = session.sign_in(&form).await;
    pb.finish_and_clear();

    let notice = result?;
    output.notice(&notice);
    if let Some(user) = session.user() {
        output.kv("User", &user.display_name());
        output.kv("Role", user.role.as_str());
    }
    Ok(())
}

#[cfg(feature = "fake-auth")]
fn wants_fake(args: &LoginArgs) -> bool {
    args.fake
}

#[cfg(not(feature = "fake-auth"))]
fn wants_fake(_args: &LoginArgs) -> bool {
    false
}

#[cfg(feature = "fake-auth")]
fn fake_login(ctx: &mut Context) -> Result<()> {
    if !ctx.config.mode.is_development() {
        anyhow::bail!("Fake sign-in is only available in development mode");
    }
    let output = ctx.output.clone();
    ctx.session()?.set_fake_auth(true)?;
    output.warn("Signed in as the development user");
    Ok(())
}

#[cfg(not(feature = "fake-auth"))]
fn fake_login(_ctx: &mut Context) -> Result<()> {
    anyhow::bail!("This build does not include fake sign-in")
}

/// Create an account.
pub async fn signup(args: SignupArgs, ctx: &mut Context) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let first_name = match args.first_name {
        Some(name) => name,
        None => Input::<String>::new().with_prompt("First name").interact_text()?,
    };
    let last_name = match args.last_name {
        Some(name) => name,
        None => Input::<String>::new().with_prompt("Last name").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;
    let repeat_password = Password::new().with_prompt("Repeat password").interact()?;

    let form = SignUpForm {
        email,
        first_name,
        last_name,
        password,
        repeat_password,
    };

    let output = ctx.output.clone();
    let session = ctx.session()?;

    let pb = output.spinner("Creating account...");
    let result = session.sign_up(&form).await;
    pb.finish_and_clear();

    output.notice(&result?);

    let sign_in_now = !output.is_json()
        && Confirm::new()
            .with_prompt("Sign in now?")
            .default(true)
            .interact()?;
    if !sign_in_now {
        output.info(&format!("Run `lectern login --email {}` to continue", form.email));
        return Ok(());
    }

    let pb = output.spinner("Signing in...");
    let result = session.sign_in(&form.credentials()).await;
    pb.finish_and_clear();
    output.notice(&result?);
    Ok(())
}

/// Forget the signed-in user and token.
pub async fn logout(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let redirect = ctx.session()?.sign_out()?;
    output.debug(&format!("Landing route: {}", redirect.to));
    output.success("Signed out");
    Ok(())
}

/// Show the signed-in user.
pub async fn whoami(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let Some(user) = session.user() else {
        if output.is_json() {
            output.json(&serde_json::Value::Null);
        } else {
            output.info("Not signed in");
        }
        return Ok(());
    };

    if output.is_json() {
        output.json(user);
        return Ok(());
    }

    output.header(&user.display_name());
    if let Some(id) = user.id() {
        output.kv("Id", &id.to_string());
    }
    output.kv("Email", user.email());
    output.kv("Role", user.role.as_str());
    output.kv("Admin", &session.auth().is_admin().to_string());
    Ok(())
}
