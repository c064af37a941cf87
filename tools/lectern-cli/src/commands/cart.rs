//! Cart and checkout commands.

use anyhow::Result;
use lectern_catalog::prelude::*;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &mut Context) -> Result<()> {
    match args.command {
        CartCommand::Add { id, complectation } => {
            add(ItemId::new(id), complectation.map(ComplectationId::new), ctx).await
        }
        CartCommand::Remove { id } => remove(ItemId::new(id), ctx),
        CartCommand::List => list(ctx),
        CartCommand::Clear => clear(ctx),
    }
}

async fn add(id: ItemId, complectation: Option<ComplectationId>, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let book = session.api().get_book(id).await?;
    if session.add_to_cart(&book, complectation)? {
        output.success(&format!("Added \"{}\" to the cart", book.title));
    } else {
        output.info(&format!("\"{}\" is already in the cart", book.title));
    }
    Ok(())
}

fn remove(id: ItemId, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    if ctx.session()?.remove_from_cart(id)? {
        output.success(&format!("Removed #{} from the cart", id));
    } else {
        output.info(&format!("#{} was not in the cart", id));
    }
    Ok(())
}

fn list(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let cart = ctx.session()?.cart();

    if output.is_json() {
        output.json(cart.items());
        return Ok(());
    }

    if cart.is_empty() {
        output.info("Your cart is empty");
        return Ok(());
    }

    output.table_row(&["ID", "BOOK", "EDITION", "PRICE"], &[6, 40, 16, 10]);
    for item in cart.items() {
        let (model, price) = match &item.complectation {
            Some(c) => (c.model.clone(), c.price.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        output.table_row(
            &[
                &item.id.to_string(),
                &truncate(&item.display_line(), 40),
                &truncate(&model, 16),
                &price,
            ],
            &[6, 40, 16, 10],
        );
    }

    let total = cart.cart().map(Cart::total_price).transpose()?;
    if let Some(total) = total.filter(|t| !t.is_zero()) {
        output.kv("Total", &total.to_string());
    }
    output.info(&format!("{} item(s)", cart.len()));
    Ok(())
}

fn clear(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    ctx.session()?.clear_cart()?;
    output.success("Cart cleared");
    Ok(())
}

/// Order everything in the cart.
pub async fn checkout(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let pb = output.spinner("Placing order...");
    let result = session.checkout().await;
    pb.finish_and_clear();

    let (order_id, notice) = result?;
    if output.is_json() {
        output.json(&serde_json::json!({ "order_id": order_id }));
    } else {
        output.notice(&notice);
    }
    Ok(())
}
