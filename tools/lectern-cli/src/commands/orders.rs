//! Order commands.

use anyhow::Result;
use lectern_catalog::prelude::*;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &mut Context) -> Result<()> {
    match args.command {
        OrdersCommand::List { state } => {
            let filter = parse_states(state.as_deref())?;
            list_orders(&filter, ctx).await
        }
        OrdersCommand::Approve { id } => {
            let output = ctx.output.clone();
            ctx.session()?.approve_order(OrderId::new(id)).await?;
            output.success(&format!("Order #{} approved", id));
            Ok(())
        }
        OrdersCommand::Reject { id } => {
            let output = ctx.output.clone();
            ctx.session()?.reject_order(OrderId::new(id)).await?;
            output.success(&format!("Order #{} rejected", id));
            Ok(())
        }
    }
}

fn parse_states(state: Option<&str>) -> Result<StatusFilter> {
    let Some(state) = state else {
        return Ok(StatusFilter::all());
    };
    state
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<OrderStatus>().map_err(anyhow::Error::msg))
        .collect()
}

async fn list_orders(filter: &StatusFilter, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let pb = output.spinner("Loading orders...");
    let result = session.api().list_orders(filter).await;
    pb.finish_and_clear();
    let orders = result?;

    if output.is_json() {
        output.json(&orders);
        return Ok(());
    }

    if orders.is_empty() {
        output.info("No orders found");
        return Ok(());
    }

    output.table_row(
        &["ID", "CREATED", "STATUS", "REQUESTER", "BOOKS"],
        &[6, 17, 14, 20, 40],
    );
    for order in &orders {
        let created = order.created_at.format("%Y-%m-%d %H:%M").to_string();
        let requester = order.requester().unwrap_or_else(|| "-".to_string());
        output.table_row(
            &[
                &order.id.to_string(),
                &created,
                &status_badge(order.status),
                &truncate(&requester, 20),
                &truncate(&order.titles(), 40),
            ],
            &[6, 17, 14, 20, 40],
        );
    }
    output.info(&format!("Total: {} order(s)", orders.len()));
    Ok(())
}
