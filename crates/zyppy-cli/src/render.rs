//! Screen output for the REPL.
//!
//! One palette across screens: listing numbers and secondary detail dim,
//! confirmations green, warnings yellow, failures red.

use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};
use zyppy_core::cart::Cart;
use zyppy_core::catalog::{MenuItem, Restaurant};
use zyppy_core::order::{Order, OrderStatus, Review};
use zyppy_core::payment::{CheckoutPhase, PaymentOutcome, PaymentSession};

use crate::app::PollReport;

pub fn restaurant_list(restaurants: &[Restaurant]) {
    if restaurants.is_empty() {
        println!("{}", "No restaurants found.".bright_black());
        return;
    }
    println!("{}", "Restaurants".bold());
    for (position, restaurant) in restaurants.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{:>2}.", position + 1).bright_black(),
            restaurant.name.bold(),
            format!(
                "[{}] {:.1}* {} delivery ${:.2}",
                restaurant.cuisine_type,
                restaurant.rating,
                restaurant.delivery_time,
                restaurant.delivery_fee
            )
            .bright_black()
        );
    }
    println!("{}", "open <n> to view a menu".bright_black());
}

pub fn menu(restaurant: &Restaurant, items: &[MenuItem]) {
    println!(
        "{} {}",
        restaurant.name.bold(),
        format!("[{}] {:.1}*", restaurant.cuisine_type, restaurant.rating).bright_black()
    );
    if !restaurant.description.is_empty() {
        println!("{}", restaurant.description.bright_black());
    }
    if items.is_empty() {
        println!("{}", "No items in this menu.".bright_black());
        return;
    }
    for (position, item) in items.iter().enumerate() {
        menu_item_line(position, item);
    }
    println!(
        "{}",
        "add <n> [qty] to add to the cart, menu <category> to filter".bright_black()
    );
}

pub fn food_results(query: &str, items: &[MenuItem]) {
    if items.is_empty() {
        println!("{}", format!("No dishes matching '{query}'.").bright_black());
        return;
    }
    println!("{}", format!("Dishes matching '{query}'").bold());
    for (position, item) in items.iter().enumerate() {
        menu_item_line(position, item);
    }
    println!(
        "{}",
        "add <n> [qty] adds the dish; its restaurant becomes the cart's".bright_black()
    );
}

fn menu_item_line(position: usize, item: &MenuItem) {
    let veg = if item.is_vegetarian {
        " (veg)".green().to_string()
    } else {
        String::new()
    };
    println!(
        "{} {} ${:.2}{} {}",
        format!("{:>2}.", position + 1).bright_black(),
        item.name,
        item.price,
        veg,
        format!("[{}]", item.category).bright_black()
    );
}

pub fn cart_view(cart: &Cart, address: Option<&str>, phase: &CheckoutPhase) {
    if cart.is_empty() {
        println!("{}", "Your cart is empty.".bright_black());
    } else {
        println!("{}", "Your cart".bold());
        for (position, line) in cart.lines().iter().enumerate() {
            println!(
                "{} {} x{} ${:.2}",
                format!("{:>2}.", position + 1).bright_black(),
                line.name,
                line.quantity,
                line.subtotal()
            );
        }
        println!("{}", format!("Total: ${:.2}", cart.total()).bold());
    }
    match address {
        Some(address) => println!("{}", format!("Delivering to: {address}").bright_black()),
        None => println!(
            "{}",
            "No delivery address set (address <text>)".bright_black()
        ),
    }
    match phase {
        CheckoutPhase::Idle => {}
        CheckoutPhase::Submitting => println!("{}", "Checkout: submitting order...".yellow()),
        CheckoutPhase::AwaitingPaymentRedirect { url } => {
            println!("{}", format!("Checkout: awaiting payment at {url}").yellow());
        }
        CheckoutPhase::Checking => println!("{}", "Checkout: verifying payment...".yellow()),
        CheckoutPhase::Settled(outcome) => {
            println!(
                "{}",
                format!("Checkout: {}", outcome_text(*outcome)).bright_black()
            );
        }
    }
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("{}", "No orders yet.".bright_black());
        return;
    }
    println!("{}", "Your orders".bold());
    for (position, order) in orders.iter().enumerate() {
        println!(
            "{} {} {} ${:.2} {}",
            format!("{:>2}.", position + 1).bright_black(),
            format_time(&order.created_at).bright_black(),
            status_colored(order.status),
            order.total_amount,
            format!("({} items)", order.items.len()).bright_black()
        );
    }
    println!(
        "{}",
        "track <n> for details, rate <n> <1-5> [comment] after delivery".bright_black()
    );
}

pub fn order_detail(order: &Order) {
    println!("{} {}", "Order".bold(), order.id);
    println!("  Status: {}", status_colored(order.status));
    println!("  Placed: {}", format_time(&order.created_at));
    if let Some(eta) = &order.estimated_delivery {
        println!("  Estimated delivery: {}", format_time(eta));
    }
    for item in &order.items {
        println!(
            "  {} {}",
            format!("x{}", item.quantity).bright_black(),
            item.food_item_id
        );
    }
    println!("  Total: {}", format!("${:.2}", order.total_amount).bold());
    println!("  Deliver to: {}", order.delivery_address);
}

pub fn reviews_list(restaurant_name: &str, reviews: &[Review]) {
    if reviews.is_empty() {
        println!(
            "{}",
            format!("No reviews for {restaurant_name} yet.").bright_black()
        );
        return;
    }
    println!("{}", format!("Reviews for {restaurant_name}").bold());
    for review in reviews {
        println!(
            "{} {}",
            stars(review.rating).yellow(),
            format_time(&review.created_at).bright_black()
        );
        if let Some(comment) = &review.comment {
            println!("  {comment}");
        }
    }
}

pub fn payment_redirect(order: &Order, payment: &PaymentSession) {
    println!(
        "{}",
        format!("Order {} placed. Total ${:.2}.", order.id, order.total_amount).bright_green()
    );
    println!("{} {}", "Pay at:".bold(), payment.url.underline());
    println!(
        "{}",
        format!("When you are done, run: confirm {}", payment.session_id).bright_black()
    );
}

pub fn payment_report(report: &PollReport) {
    let PollReport {
        payment_session_id,
        resolution,
    } = report;
    match resolution.outcome {
        PaymentOutcome::Success => {
            let charged = resolution
                .status
                .as_ref()
                .and_then(|status| {
                    status.amount_total.map(|cents| {
                        let currency = status.currency.as_deref().unwrap_or("usd").to_uppercase();
                        format!(" Charged {:.2} {currency}.", cents / 100.0)
                    })
                })
                .unwrap_or_default();
            println!(
                "{}",
                format!(
                    "Payment confirmed for {payment_session_id}.{charged} Your order is on its way!"
                )
                .bright_green()
            );
        }
        PaymentOutcome::Failed => println!(
            "{}",
            format!("Payment session {payment_session_id} expired; the order was not paid.").red()
        ),
        PaymentOutcome::Timeout => println!(
            "{}",
            "Could not confirm the payment in time. Run 'orders' to check the latest status."
                .yellow()
        ),
        PaymentOutcome::Error => println!(
            "{}",
            "Could not reach the payment service. Run 'orders' to check later.".red()
        ),
        PaymentOutcome::Cancelled => {
            println!("{}", "Payment check cancelled.".bright_black());
        }
    }
}

pub fn help() {
    let sections: &[(&str, &[(&str, &str)])] = &[
        (
            "Account",
            &[
                ("login <email>", "log in (the account is created on first login)"),
                ("logout", "log out and forget the saved session"),
            ],
        ),
        (
            "Browse",
            &[
                ("home", "list restaurants"),
                ("search [text]", "filter restaurants by name or description"),
                ("cuisine [type]", "filter restaurants by cuisine"),
                ("open <n>", "open the n-th restaurant's menu"),
                ("menu [category]", "re-list the open menu, optionally one category"),
                ("find <text>", "search dishes across all restaurants"),
                ("reviews", "list the open restaurant's reviews"),
            ],
        ),
        (
            "Cart",
            &[
                ("add <n> [qty]", "add the n-th listed item"),
                ("remove <n>", "remove the n-th cart line"),
                ("qty <n> <q>", "set the n-th cart line's quantity (0 removes)"),
                ("cart", "show the cart"),
                ("clear", "empty the cart"),
                ("address <text>", "set the delivery address"),
            ],
        ),
        (
            "Checkout",
            &[
                ("checkout", "place the order and get the payment link"),
                ("confirm <session_id>", "verify a payment after returning"),
            ],
        ),
        (
            "Orders",
            &[
                ("orders", "list your orders"),
                ("track <n>", "refetch one order's latest status"),
                ("rate <n> <1-5> [comment]", "review a delivered order"),
            ],
        ),
        (
            "Other",
            &[
                ("go <token>", "navigate by token, e.g. go restaurant/<id>"),
                ("help", "this list"),
                ("quit", "exit"),
            ],
        ),
    ];
    for (section, commands) in sections {
        println!("{}", section.bold());
        for (usage, explanation) in *commands {
            println!(
                "  {} {}",
                format!("{usage:<26}").bright_cyan(),
                explanation.bright_black()
            );
        }
    }
}

fn status_colored(status: OrderStatus) -> ColoredString {
    match status {
        OrderStatus::Delivered => status.label().green(),
        OrderStatus::Cancelled => status.label().red(),
        _ => status.label().yellow(),
    }
}

fn outcome_text(outcome: PaymentOutcome) -> &'static str {
    match outcome {
        PaymentOutcome::Success => "payment confirmed",
        PaymentOutcome::Failed => "payment failed",
        PaymentOutcome::Timeout => "payment unconfirmed (timed out)",
        PaymentOutcome::Error => "payment check failed",
        PaymentOutcome::Cancelled => "payment check cancelled",
    }
}

/// Formats a backend timestamp for display, falling back to the raw string
/// when it is not ISO-shaped.
pub fn format_time(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|parsed| parsed.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn stars(rating: u8) -> String {
    "*".repeat(rating.min(5) as usize)
}
