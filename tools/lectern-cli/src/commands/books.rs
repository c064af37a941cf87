//! Catalog commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use lectern_catalog::prelude::*;
use lectern_catalog::text::trim_description;

use super::{BooksArgs, BooksCommand};
use crate::context::Context;
use crate::output::{truncate, Output};

/// Words of a complectation description shown in listings.
const DESCRIPTION_WORDS: usize = 12;

/// Run the books command.
pub async fn run(args: BooksArgs, ctx: &mut Context) -> Result<()> {
    match args.command {
        BooksCommand::List {
            search,
            authors,
            min,
            max,
            available,
        } => {
            let mut selection = FilterSelection::new();
            for id in authors {
                selection = selection.with_author(AuthorId::new(id));
            }
            if let (Some(min), Some(max)) = (min, max) {
                selection = selection.with_page_range(min, max);
            }
            if let Some(available) = available {
                selection = selection.with_availability(available);
            }
            let mut query = BookQuery::new().with_selection(selection);
            if let Some(term) = search {
                query = query.with_search_term(term);
            }
            list_books(&query, ctx).await
        }
        BooksCommand::Show { id } => show_book(ItemId::new(id), ctx).await,
        BooksCommand::Filters => show_filters(ctx).await,
        BooksCommand::Authors => list_authors(ctx).await,
        BooksCommand::Mine => my_books(ctx).await,
        BooksCommand::Import { file } => import_books(&file, ctx).await,
        BooksCommand::Return { id } => return_book(ItemId::new(id), ctx).await,
        BooksCommand::Delete { id, yes } => delete_book(ItemId::new(id), yes, ctx).await,
        BooksCommand::Complectation { command } => super::complectations::run(command, ctx).await,
    }
}

async fn list_books(query: &BookQuery, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let pb = output.spinner("Searching...");
    let result = session.search(query).await;
    pb.finish_and_clear();

    let Some(books) = result? else {
        return Ok(());
    };
    print_books(&output, &books);
    Ok(())
}

async fn my_books(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let books = ctx.session()?.api().my_books().await?;
    print_books(&output, &books);
    Ok(())
}

fn print_books(output: &Output, books: &[Book]) {
    if output.is_json() {
        output.json(books);
        return;
    }

    if books.is_empty() {
        output.info("No books found");
        return;
    }

    output.table_row(&["ID", "TITLE", "AUTHORS", "PAGES"], &[6, 36, 28, 6]);
    for book in books {
        output.table_row(
            &[
                &book.id.to_string(),
                &truncate(&book.title, 36),
                &truncate(&book.author_names(), 28),
                &book.num_pages.to_string(),
            ],
            &[6, 36, 28, 6],
        );
    }
    output.info(&format!("Total: {} book(s)", books.len()));
}

async fn show_book(id: ItemId, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let book = ctx.session()?.api().get_book(id).await?;
    print_book(&output, &book, None);
    Ok(())
}

/// Print a book; `selected` marks one complectation.
pub(super) fn print_book(output: &Output, book: &Book, selected: Option<ComplectationId>) {
    if output.is_json() {
        output.json(book);
        return;
    }

    output.header(&book.title);
    output.kv("Id", &book.id.to_string());
    output.kv("ISBN", &book.isbn);
    output.kv("Pages", &book.num_pages.to_string());
    output.kv("Authors", &book.author_names());

    if !book.complectations.is_empty() {
        output.header("Complectations");
        for (i, c) in book.complectations.iter().enumerate() {
            let marker = if selected == Some(c.id) { "*" } else { " " };
            output.list_item(&format!(
                "{}{}. #{} {} ({}) {}",
                marker,
                i + 1,
                c.id,
                c.model,
                c.price,
                trim_description(&c.description, DESCRIPTION_WORDS)
            ));
        }
    }
}

async fn list_authors(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let authors = ctx.session()?.api().list_authors().await?;

    if output.is_json() {
        output.json(&authors);
        return Ok(());
    }
    if authors.is_empty() {
        output.info("No authors found");
        return Ok(());
    }
    for author in &authors {
        output.list_item(&format!("#{} {}", author.id, author.full_name()));
    }
    Ok(())
}

async fn show_filters(ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let filters = ctx.session()?.api().fetch_filters().await?;

    if output.is_json() {
        output.json(&filters);
        return Ok(());
    }

    if filters.is_empty() {
        output.info("The catalog offers no filters");
        return Ok(());
    }

    output.header("Filters");
    output.kv(
        "Pages",
        &format!("{} - {}", filters.num_pages.min, filters.num_pages.max),
    );
    output.header("Authors");
    for author in &filters.authors {
        output.list_item(&format!("#{} {}", author.id, author.full_name()));
    }
    Ok(())
}

async fn import_books(file: &std::path::Path, ctx: &mut Context) -> Result<()> {
    let path = ctx.resolve_path(file);
    let bytes = std::fs::read(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
        bail!("Not a file: {}", path.display());
    };

    let output = ctx.output.clone();
    let session = ctx.session()?;

    let pb = output.spinner(&format!("Uploading {}...", file_name));
    let result = session.import_books(&file_name, bytes).await;
    pb.finish_and_clear();

    let count = result?;
    output.success(&format!("Imported {} book(s) from {}", count, file_name));
    Ok(())
}

async fn return_book(id: ItemId, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    ctx.session()?.api().return_book(id).await?;
    output.success(&format!("Book #{} returned", id));
    Ok(())
}

async fn delete_book(id: ItemId, yes: bool, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete book #{}?", id))
            .default(false)
            .interact()?;

        if !confirmed {
            output.warn("Cancelled");
            return Ok(());
        }
    }

    ctx.session()?.api().delete_item(id).await?;
    output.success(&format!("Deleted book #{}", id));
    Ok(())
}
