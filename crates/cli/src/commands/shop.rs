//! `shop` - interactive storefront session.
//!
//! Reads one command per line from stdin. Search text filters the current
//! catalog immediately; the backend search runs once the text has been left
//! alone for the debounce window, and its results replace the catalog only if
//! no newer search has started since.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use lesson_shop_core::{Lesson, LessonId};
use lesson_shop_storefront::api::fetch_catalog;
use lesson_shop_storefront::{
    ApiError, FetchTicket, HttpLessonsApi, Result, SearchDebouncer, ShopConfig, SortDirection,
    SortKey, SortOrder, Storefront,
};

use crate::render;

type FetchResult = (FetchTicket, std::result::Result<Vec<Lesson>, ApiError>);

/// One line of shopper input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShopCommand {
    List,
    Search(String),
    Add(LessonId),
    Remove(LessonId),
    Cart,
    Sort(SortOrder),
    Checkout { phone: String, name: String },
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
fn parse_command(line: &str) -> std::result::Result<Option<ShopCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => ShopCommand::List,
        "search" => ShopCommand::Search(rest.to_string()),
        "add" => ShopCommand::Add(lesson_id(rest, "add")?),
        "remove" | "rm" => ShopCommand::Remove(lesson_id(rest, "remove")?),
        "cart" => ShopCommand::Cart,
        "sort" => ShopCommand::Sort(sort_order(rest)?),
        "checkout" => {
            let (phone, name) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: checkout PHONE NAME...".to_string())?;
            ShopCommand::Checkout {
                phone: phone.to_string(),
                name: name.trim().to_string(),
            }
        }
        "help" | "?" => ShopCommand::Help,
        "quit" | "exit" | "q" => ShopCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };

    Ok(Some(command))
}

fn lesson_id(rest: &str, command: &str) -> std::result::Result<LessonId, String> {
    match rest.split_whitespace().next() {
        Some(id) => Ok(LessonId::new(id)),
        None => Err(format!("usage: {command} ID")),
    }
}

fn sort_order(rest: &str) -> std::result::Result<SortOrder, String> {
    let mut parts = rest.split_whitespace();
    let key: SortKey = parts
        .next()
        .ok_or_else(|| "usage: sort KEY [asc|desc]".to_string())?
        .parse()?;
    let direction: SortDirection = parts
        .next()
        .map_or(Ok(SortDirection::default()), str::parse::<SortDirection>)?;

    if parts.next().is_some() {
        return Err("usage: sort KEY [asc|desc]".to_string());
    }
    Ok(SortOrder::new(key, direction))
}

/// Run the interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or stdin fails.
pub async fn run(config: &ShopConfig) -> Result<()> {
    let api = HttpLessonsApi::new(config)?;
    let mut store = Storefront::new(api.clone());

    if let Err(e) = store.load().await {
        warn!(error = %e, "Initial catalog load failed");
        render::message("Could not load lessons. Use 'search' to retry.");
    }
    render::catalog(&store.view());
    render::message("Type 'help' for commands.");

    let (mut debouncer, mut settled) = SearchDebouncer::new(config.search_debounce);
    let (fetch_tx, mut fetched) = mpsc::unbounded_channel::<FetchResult>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(api_base = %config.api_base, "Shop session started");
    render::prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Some(ShopCommand::Quit)) => break,
                    Ok(Some(command)) => handle(&mut store, &mut debouncer, command).await,
                    Ok(None) => {}
                    Err(usage) => render::message(&usage),
                }
                render::prompt();
            }
            Some(query) = settled.recv() => {
                let ticket = store.begin_fetch();
                let api = api.clone();
                let tx = fetch_tx.clone();
                debug!(%query, "Sending debounced search");
                tokio::spawn(async move {
                    let result = fetch_catalog(&api, &query).await;
                    // Receiver gone means the session ended
                    let _ = tx.send((ticket, result));
                });
            }
            Some((ticket, result)) = fetched.recv() => {
                if store.apply_fetch(ticket, result) {
                    render::message("");
                    render::catalog(&store.view());
                    render::prompt();
                }
            }
        }
    }

    info!("Shop session ended");
    Ok(())
}

async fn handle(
    store: &mut Storefront<HttpLessonsApi>,
    debouncer: &mut SearchDebouncer,
    command: ShopCommand,
) {
    match command {
        ShopCommand::List => render::catalog(&store.view()),
        ShopCommand::Search(query) => {
            store.set_search_query(query.clone());
            debouncer.schedule(query);
            render::catalog(&store.view());
        }
        ShopCommand::Add(id) => {
            if store.add_to_cart(&id) {
                render::message(&format!(
                    "Added {id}. Cart: {} item(s)",
                    store.cart().item_count()
                ));
            } else if store.lessons().iter().any(|lesson| lesson.id == id) {
                render::message(&format!("No spaces left for {id}"));
            } else {
                render::message(&format!("Unknown lesson {id}"));
            }
        }
        ShopCommand::Remove(id) => {
            if store.remove_from_cart(&id) {
                render::message(&format!(
                    "Removed {id}. Cart: {} item(s)",
                    store.cart().item_count()
                ));
            } else {
                render::message(&format!("{id} is not in the cart"));
            }
        }
        ShopCommand::Cart => {
            store.toggle_cart();
            let view = store.view();
            if view.show_cart {
                render::cart(&view);
            } else {
                render::catalog(&view);
            }
        }
        ShopCommand::Sort(order) => {
            store.set_sort(order);
            render::catalog(&store.view());
        }
        ShopCommand::Checkout { phone, name } => {
            store.set_checkout(name, phone);
            match store.submit_order().await {
                Ok(outcome) => render::order_outcome(&outcome),
                Err(e) => render::message(&format!("Cannot check out: {e}")),
            }
        }
        ShopCommand::Help => render::shop_help(),
        ShopCommand::Quit => {}
    }
}
