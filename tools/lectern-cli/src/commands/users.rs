//! User administration and profile commands.

use anyhow::Result;
use dialoguer::{Confirm, Input};
use lectern_catalog::prelude::*;

use super::{ProfileArgs, ProfileCommand, UsersArgs, UsersCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the users command.
pub async fn run(args: UsersArgs, ctx: &mut Context) -> Result<()> {
    match args.command {
        UsersCommand::List => list_users(ctx).await,
        UsersCommand::Delete { id, yes } => delete_user(UserId::new(id), yes, ctx).await,
    }
}

async fn list_users(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let users = ctx.session()?.list_users().await?;

    if output.is_json() {
        output.json(&users);
        return Ok(());
    }

    output.table_row(&["ID", "NAME", "EMAIL", "ROLE"], &[6, 28, 32, 10]);
    for user in &users {
        let id = user.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        let name = match &user.last_name {
            Some(last) => format!("{} {}", user.first_name, last),
            None => user.first_name.clone(),
        };
        let role = user.role.map(|r| r.as_str()).unwrap_or("-");
        output.table_row(
            &[&id, &truncate(&name, 28), &truncate(&user.email, 32), role],
            &[6, 28, 32, 10],
        );
    }
    output.info(&format!("Total: {} user(s)", users.len()));
    Ok(())
}

async fn delete_user(id: UserId, yes: bool, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete user #{}?", id))
            .default(false)
            .interact()?;

        if !confirmed {
            output.warn("Cancelled");
            return Ok(());
        }
    }

    ctx.session()?.delete_user(id).await?;
    output.success(&format!("Deleted user #{}", id));
    Ok(())
}

/// Run the profile command.
pub async fn profile(args: ProfileArgs, ctx: &mut Context) -> Result<()> {
    match args.command {
        ProfileCommand::Edit {
            first_name,
            last_name,
            email,
        } => {
            let output = ctx.output.clone();
            let session = ctx.session()?;
            let current = session
                .user()
                .map(|u| u.profile.clone())
                .ok_or(lectern_client::ClientError::NotAuthenticated)?;

            let form = ProfileEditForm {
                first_name: field(first_name, "First name", &current.first_name)?,
                last_name: field(last_name, "Last name", &current.last_name)?,
                email: field(email, "Email", &current.email)?,
            };

            let pb = output.spinner("Saving profile...");
            let result = session.edit_profile(&form).await;
            pb.finish_and_clear();

            output.notice(&result?);
            Ok(())
        }
    }
}

/// Use the flag when given, otherwise prompt with the current value.
fn field(given: Option<String>, prompt: &str, current: &str) -> Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .default(current.to_string())
            .interact_text()?),
    }
}
