//! Terminal output. Everything the CLI prints goes through here.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Write;

use lesson_shop_core::Lesson;
use lesson_shop_storefront::{CartLine, OrderOutcome, ShopError, StorefrontView};

const SHOP_HELP: &str = "\
Commands:
  list                         Show the catalog
  search [TEXT]                Search lessons (empty text shows everything)
  add ID                       Reserve one space of a lesson
  remove ID                    Give back one reserved space
  cart                         Show or hide the cart
  sort KEY [asc|desc]          Sort by subject, location, price or spaces
  checkout PHONE NAME...       Submit the cart as an order
  help                         Show this help
  quit                         Leave the shop";

fn lesson_row(lesson: &Lesson) -> String {
    format!(
        "{:<26} {:<16} {:<16} {:>8} {:>6}",
        lesson.id.as_str(),
        lesson.subject,
        lesson.location,
        lesson.price.display_amount(),
        lesson.spaces
    )
}

fn cart_row(line: &CartLine) -> String {
    format!(
        "{:<26} {:<16} {:<16} {:>3} x {:>8} = {:>8}",
        line.lesson_id.as_str(),
        line.subject,
        line.location,
        line.quantity,
        line.price.display_amount(),
        line.line_total().display_amount()
    )
}

pub fn lessons(lessons: &[Lesson]) {
    if lessons.is_empty() {
        println!("No lessons found.");
        return;
    }

    println!(
        "{:<26} {:<16} {:<16} {:>8} {:>6}",
        "ID", "SUBJECT", "LOCATION", "PRICE", "SPACES"
    );
    for lesson in lessons {
        println!("{}", lesson_row(lesson));
    }
}

/// Print lessons as pretty JSON on stdout.
pub fn lessons_json(lessons: &[Lesson]) -> Result<(), ShopError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, lessons).map_err(std::io::Error::from)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn catalog(view: &StorefrontView) {
    if !view.search_query.is_empty() {
        println!("Search: {:?}", view.search_query);
    }
    println!("Sorted by {} ({})", view.sort.key, view.sort.direction);
    lessons(&view.lessons);
    println!("Cart: {} item(s)", view.cart_count);
}

pub fn cart(view: &StorefrontView) {
    if view.cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in &view.cart {
        println!("{}", cart_row(line));
    }
    println!("Total: {} ({} item(s))", view.cart_total.display_amount(), view.cart_count);
}

pub fn order_outcome(outcome: &OrderOutcome) {
    println!("{}", outcome.message);
    for gap in &outcome.reconciliation_gaps {
        eprintln!("warning: spaces not updated: {gap}");
    }
}

pub fn message(text: &str) {
    println!("{text}");
}

pub fn shop_help() {
    println!("{SHOP_HELP}");
}

pub fn prompt() {
    print!("> ");
    // A prompt that fails to flush only delays its appearance
    let _ = std::io::stdout().flush();
}

pub fn error(err: &ShopError) {
    eprintln!("error: {}", err.user_message());
}
