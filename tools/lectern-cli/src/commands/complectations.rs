//! Complectation management for a single book.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input};
use lectern_catalog::prelude::*;

use super::books::print_book;
use super::{ComplectationCommand, ComplectationTarget};
use crate::context::Context;

/// Run a `books complectation` subcommand.
pub async fn run(command: ComplectationCommand, ctx: &mut Context) -> Result<()> {
    match command {
        ComplectationCommand::Add {
            id,
            model,
            description,
            price,
        } => {
            let draft = ComplectationDraft {
                model,
                description,
                price: Price::from_decimal(price)?,
            };
            add(ItemId::new(id), draft, ctx).await
        }
        ComplectationCommand::Edit {
            id,
            target,
            model,
            description,
            price,
        } => edit(ItemId::new(id), &target, model, description, price, ctx).await,
        ComplectationCommand::Remove { id, target, yes } => {
            remove(ItemId::new(id), &target, yes, ctx).await
        }
    }
}

/// Resolve the target flags against the book's current list.
fn select(book: &Book, target: &ComplectationTarget) -> Result<ComplectationSelection> {
    let mut selection = ComplectationSelection::first_of(&book.complectations);
    match (target.complectation, target.index) {
        (Some(id), _) => {
            let id = ComplectationId::new(id);
            if book.complectation(id).is_none() {
                bail!("Book #{} has no complectation #{}", book.id, id);
            }
            selection.select(id);
        }
        (None, Some(index)) => {
            let found = index
                .checked_sub(1)
                .is_some_and(|i| selection.select_index(&book.complectations, i));
            if !found {
                bail!(
                    "Book #{} has {} complectation(s), no position {}",
                    book.id,
                    book.complectations.len(),
                    index
                );
            }
        }
        (None, None) => {}
    }
    if selection.id().is_none() {
        bail!("Book #{} has no complectations", book.id);
    }
    Ok(selection)
}

async fn add(id: ItemId, draft: ComplectationDraft, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let book = session.api().get_book(id).await?;
    let mut selection = ComplectationSelection::first_of(&book.complectations);
    let book = session.add_complectation(&book, &mut selection, draft).await?;

    output.success(&format!("Complectation added to book #{}", id));
    print_book(&output, &book, selection.id());
    Ok(())
}

async fn edit(
    id: ItemId,
    target: &ComplectationTarget,
    model: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    ctx: &mut Context,
) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let book = session.api().get_book(id).await?;
    let mut selection = select(&book, target)?;
    let Some(current) = selection.current(&book.complectations).cloned() else {
        bail!("Book #{} has no complectations", id);
    };

    let model = match model {
        Some(model) => model,
        None => Input::<String>::new()
            .with_prompt("Model")
            .default(current.model)
            .interact_text()?,
    };
    let description = match description {
        Some(description) => description,
        None => Input::<String>::new()
            .with_prompt("Description")
            .default(current.description)
            .interact_text()?,
    };
    let price = match price {
        Some(price) => Price::from_decimal(price)?,
        None => {
            let amount = Input::<f64>::new()
                .with_prompt("Price")
                .default(current.price.to_decimal())
                .interact_text()?;
            Price::from_decimal(amount)?
        }
    };

    let draft = ComplectationDraft {
        model,
        description,
        price,
    };
    let book = session.edit_complectation(&book, &mut selection, draft).await?;

    output.success(&format!("Complectation #{} updated", current.id));
    print_book(&output, &book, selection.id());
    Ok(())
}

async fn remove(
    id: ItemId,
    target: &ComplectationTarget,
    yes: bool,
    ctx: &mut Context,
) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let book = session.api().get_book(id).await?;
    let mut selection = select(&book, target)?;
    let target_id = selection.removal_target(&book.complectations)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove complectation #{} from book #{}? This cannot be undone.",
                target_id, id
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            output.warn("Cancelled");
            return Ok(());
        }
    }

    let book = session.remove_selected_complectation(&book, &mut selection).await?;

    output.success(&format!("Complectation #{} removed", target_id));
    print_book(&output, &book, selection.id());
    Ok(())
}
