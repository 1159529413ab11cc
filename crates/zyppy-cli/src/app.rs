//! REPL application state and command dispatch.
//!
//! The context owns every piece of mutable client state: the current
//! session (through the session service), the shared cart, the active
//! screen with its numbered listings, and the handle to an in-flight
//! payment poll. All mutation happens on the REPL's command turns; the one
//! background task is the poll spawned by [`AppContext::start_poll`], which
//! reports back over an mpsc channel.

use std::sync::{Arc, Mutex as StdMutex};

use colored::Colorize;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use zyppy_application::{CheckoutService, PaymentResolution, SessionService};
use zyppy_core::api::StorefrontApi;
use zyppy_core::cart::Cart;
use zyppy_core::catalog::{MenuItem, Restaurant};
use zyppy_core::error::{Result, ZyppyError};
use zyppy_core::order::{Order, OrderStatus, ReviewRequest};
use zyppy_core::payment::CheckoutPhase;
use zyppy_core::route::Screen;
use zyppy_core::session::Session;

use crate::render;

/// Outcome of a finished payment poll, sent back to the REPL for printing.
pub struct PollReport {
    pub payment_session_id: String,
    pub resolution: PaymentResolution,
}

/// One parsed REPL command.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Login { email: &'a str },
    Logout,
    Go { token: &'a str },
    Home,
    Orders,
    Open { index: usize },
    Search { text: Option<&'a str> },
    Cuisine { cuisine: Option<&'a str> },
    Find { text: &'a str },
    Menu { category: Option<&'a str> },
    Reviews,
    Add { index: usize, quantity: u32 },
    Remove { index: usize },
    Quantity { index: usize, quantity: i32 },
    Cart,
    Clear,
    Address { text: Option<&'a str> },
    Checkout,
    Confirm { session_id: &'a str },
    Track { index: usize },
    Rate { index: usize, rating: u8, comment: Option<String> },
    Help,
}

/// All state behind the prompt.
pub struct AppContext {
    session_service: Arc<SessionService>,
    checkout_service: Arc<CheckoutService>,
    api: Arc<dyn StorefrontApi>,
    /// Shared with the payment poll task, which clears it on entry
    cart: Arc<Mutex<Cart>>,
    /// Origin handed to the checkout endpoint for redirect URLs
    origin_url: String,
    screen: Screen,
    /// Checkout flow phase, shared with the report printer task
    checkout_phase: Arc<StdMutex<CheckoutPhase>>,
    /// Explicit delivery address; falls back to the session's saved one
    delivery_address: Option<String>,
    search_filter: Option<String>,
    cuisine_filter: Option<String>,
    /// Numbered listings the index commands resolve against
    restaurants: Vec<Restaurant>,
    menu_items: Vec<MenuItem>,
    orders: Vec<Order>,
    current_restaurant: Option<Restaurant>,
    /// Cancels the in-flight payment poll, if any
    poll_cancel: Option<CancellationToken>,
    report_tx: mpsc::Sender<PollReport>,
}

impl AppContext {
    pub fn new(
        session_service: Arc<SessionService>,
        checkout_service: Arc<CheckoutService>,
        api: Arc<dyn StorefrontApi>,
        origin_url: String,
        checkout_phase: Arc<StdMutex<CheckoutPhase>>,
        report_tx: mpsc::Sender<PollReport>,
    ) -> Self {
        Self {
            session_service,
            checkout_service,
            api,
            cart: Arc::new(Mutex::new(Cart::new())),
            origin_url,
            screen: Screen::parse(""),
            checkout_phase,
            delivery_address: None,
            search_filter: None,
            cuisine_filter: None,
            restaurants: Vec::new(),
            menu_items: Vec::new(),
            orders: Vec::new(),
            current_restaurant: None,
            poll_cancel: None,
            report_tx,
        }
    }

    /// Restores the persisted session, if one exists.
    pub async fn restore_session(&self) -> Option<Session> {
        self.session_service.restore().await
    }

    /// Cancels the in-flight payment poll before the process exits.
    pub fn shutdown(&mut self) {
        self.cancel_active_poll();
    }

    /// Parses and runs one command line.
    ///
    /// Every failure surfaces here as an error for the REPL to print; the
    /// session and cart are left as they were so the user can retry.
    pub async fn dispatch(&mut self, line: &str) -> Result<()> {
        match parse_command(line)? {
            Command::Login { email } => self.login(email).await,
            Command::Logout => self.logout().await,
            Command::Go { token } => self.navigate(Screen::parse(token)).await,
            Command::Home => self.navigate(Screen::Home).await,
            Command::Orders => self.navigate(Screen::MyOrders).await,
            Command::Open { index } => self.open(index).await,
            Command::Search { text } => self.search(text).await,
            Command::Cuisine { cuisine } => self.filter_cuisine(cuisine).await,
            Command::Find { text } => self.find(text).await,
            Command::Menu { category } => self.menu(category).await,
            Command::Reviews => self.reviews().await,
            Command::Add { index, quantity } => self.add(index, quantity).await,
            Command::Remove { index } => self.remove(index).await,
            Command::Quantity { index, quantity } => self.set_quantity(index, quantity).await,
            Command::Cart => self.show_cart().await,
            Command::Clear => self.clear_cart().await,
            Command::Address { text } => self.address(text).await,
            Command::Checkout => self.checkout().await,
            Command::Confirm { session_id } => {
                self.navigate(Screen::OrderSuccess {
                    session_id: Some(session_id.to_string()),
                })
                .await
            }
            Command::Track { index } => self.track(index).await,
            Command::Rate {
                index,
                rating,
                comment,
            } => self.rate(index, rating, comment).await,
            Command::Help => {
                render::help();
                Ok(())
            }
        }
    }

    /// Moves to a screen, fetching whatever it lists.
    ///
    /// Leaving a screen cancels any payment poll it started. A failed fetch
    /// keeps the previous screen current.
    async fn navigate(&mut self, screen: Screen) -> Result<()> {
        self.cancel_active_poll();
        match &screen {
            Screen::Home => {
                self.session_service.require_current().await?;
                self.search_filter = None;
                self.cuisine_filter = None;
                self.restaurants = self.api.restaurants(None, None).await?;
                render::restaurant_list(&self.restaurants);
            }
            Screen::RestaurantMenu { restaurant_id } => {
                self.session_service.require_current().await?;
                let restaurant = self.api.restaurant(restaurant_id).await?;
                self.menu_items = self.api.menu(restaurant_id, None).await?;
                render::menu(&restaurant, &self.menu_items);
                self.current_restaurant = Some(restaurant);
            }
            Screen::MyOrders => {
                let session = self.session_service.require_current().await?;
                self.orders = self.api.user_orders(&session.id).await?;
                render::orders(&self.orders);
            }
            Screen::OrderSuccess { session_id } => {
                self.session_service.require_current().await?;
                match session_id {
                    Some(id) => self.start_poll(id.clone()),
                    None => println!("{}", "Thanks for your order!".bright_green()),
                }
            }
        }
        self.screen = screen;
        Ok(())
    }

    async fn login(&mut self, email: &str) -> Result<()> {
        let session = self.session_service.login(email).await?;
        println!("{}", format!("Welcome, {}!", session.name).bright_green());
        self.navigate(Screen::Home).await
    }

    async fn logout(&mut self) -> Result<()> {
        self.cancel_active_poll();
        self.session_service.logout().await;
        println!("{}", "Logged out.".bright_green());
        Ok(())
    }

    async fn open(&mut self, index: usize) -> Result<()> {
        let restaurant_id = select(&self.restaurants, index, "restaurant")?.id.clone();
        self.navigate(Screen::RestaurantMenu { restaurant_id }).await
    }

    async fn search(&mut self, text: Option<&str>) -> Result<()> {
        self.session_service.require_current().await?;
        self.search_filter = text.map(str::to_string);
        self.refresh_restaurants().await
    }

    async fn filter_cuisine(&mut self, cuisine: Option<&str>) -> Result<()> {
        self.session_service.require_current().await?;
        self.cuisine_filter = cuisine.map(str::to_string);
        self.refresh_restaurants().await
    }

    /// Re-queries the restaurant list with the sticky search and cuisine
    /// filters and lands on the home screen.
    async fn refresh_restaurants(&mut self) -> Result<()> {
        self.cancel_active_poll();
        self.restaurants = self
            .api
            .restaurants(self.search_filter.as_deref(), self.cuisine_filter.as_deref())
            .await?;
        self.screen = Screen::Home;
        render::restaurant_list(&self.restaurants);
        Ok(())
    }

    async fn find(&mut self, query: &str) -> Result<()> {
        self.session_service.require_current().await?;
        self.menu_items = self.api.search_food(query).await?;
        render::food_results(query, &self.menu_items);
        Ok(())
    }

    async fn menu(&mut self, category: Option<&str>) -> Result<()> {
        self.session_service.require_current().await?;
        let Screen::RestaurantMenu { restaurant_id } = &self.screen else {
            return Err(ZyppyError::validation("Open a restaurant first (open <n>)"));
        };
        let restaurant_id = restaurant_id.clone();
        self.menu_items = self.api.menu(&restaurant_id, category).await?;
        if let Some(restaurant) = &self.current_restaurant {
            render::menu(restaurant, &self.menu_items);
        }
        Ok(())
    }

    async fn reviews(&mut self) -> Result<()> {
        self.session_service.require_current().await?;
        let Screen::RestaurantMenu { restaurant_id } = &self.screen else {
            return Err(ZyppyError::validation("Open a restaurant first (open <n>)"));
        };
        let reviews = self.api.restaurant_reviews(restaurant_id).await?;
        let name = self
            .current_restaurant
            .as_ref()
            .map(|restaurant| restaurant.name.as_str())
            .unwrap_or("this restaurant");
        render::reviews_list(name, &reviews);
        Ok(())
    }

    async fn add(&mut self, index: usize, quantity: u32) -> Result<()> {
        let quantity = quantity.max(1);
        let item = select(&self.menu_items, index, "menu item")?.clone();
        let mut cart = self.cart.lock().await;
        let switching = cart
            .restaurant_id()
            .is_some_and(|current| current != item.restaurant_id);
        cart.add_item(&item, quantity);
        if switching {
            println!(
                "{}",
                "Started a new cart for this restaurant; previous items removed.".yellow()
            );
        }
        println!(
            "{}",
            format!(
                "Added {} x{quantity}. Cart total: ${:.2}",
                item.name,
                cart.total()
            )
            .bright_green()
        );
        Ok(())
    }

    async fn remove(&mut self, index: usize) -> Result<()> {
        let mut cart = self.cart.lock().await;
        let line = select(cart.lines(), index, "cart line")?;
        let food_item_id = line.food_item_id.clone();
        let name = line.name.clone();
        cart.remove_item(&food_item_id);
        println!(
            "{}",
            format!("Removed {name}. Cart total: ${:.2}", cart.total()).bright_green()
        );
        Ok(())
    }

    async fn set_quantity(&mut self, index: usize, quantity: i32) -> Result<()> {
        let mut cart = self.cart.lock().await;
        let food_item_id = select(cart.lines(), index, "cart line")?
            .food_item_id
            .clone();
        cart.set_quantity(&food_item_id, quantity);
        println!(
            "{}",
            format!("Updated. Cart total: ${:.2}", cart.total()).bright_green()
        );
        Ok(())
    }

    async fn show_cart(&mut self) -> Result<()> {
        let session = self.session_service.current().await;
        let address = self.effective_address(session.as_ref());
        let cart = self.cart.lock().await;
        let phase = self.checkout_phase.lock().unwrap().clone();
        render::cart_view(&cart, address.as_deref(), &phase);
        Ok(())
    }

    async fn clear_cart(&mut self) -> Result<()> {
        self.cart.lock().await.clear();
        println!("{}", "Cart cleared.".bright_green());
        Ok(())
    }

    async fn address(&mut self, text: Option<&str>) -> Result<()> {
        match text {
            Some(text) => {
                self.delivery_address = Some(text.to_string());
                println!("{}", format!("Delivering to: {text}").bright_green());
            }
            None => {
                let session = self.session_service.current().await;
                match self.effective_address(session.as_ref()) {
                    Some(address) => {
                        println!("{}", format!("Delivering to: {address}").bright_green());
                    }
                    None => println!(
                        "{}",
                        "No delivery address set. Usage: address <text>".bright_black()
                    ),
                }
            }
        }
        Ok(())
    }

    /// Runs the submission leg: order first, then the checkout session.
    ///
    /// On success the cart is intentionally kept; it is cleared when the
    /// user returns from the payment page and verification starts.
    async fn checkout(&mut self) -> Result<()> {
        let session = self.session_service.current().await;
        let cart_snapshot = self.cart.lock().await.clone();
        let address = self.effective_address(session.as_ref()).unwrap_or_default();

        *self.checkout_phase.lock().unwrap() = CheckoutPhase::Submitting;
        let submitted = self
            .checkout_service
            .submit(session.as_ref(), &cart_snapshot, &address, &self.origin_url)
            .await;
        match submitted {
            Ok((order, payment)) => {
                *self.checkout_phase.lock().unwrap() = CheckoutPhase::AwaitingPaymentRedirect {
                    url: payment.url.clone(),
                };
                render::payment_redirect(&order, &payment);
                Ok(())
            }
            Err(err) => {
                *self.checkout_phase.lock().unwrap() = CheckoutPhase::Idle;
                Err(err)
            }
        }
    }

    async fn track(&mut self, index: usize) -> Result<()> {
        self.session_service.require_current().await?;
        let order_id = select(&self.orders, index, "order")?.id.clone();
        let order = self.api.order(&order_id).await?;
        render::order_detail(&order);
        self.orders[index - 1] = order;
        Ok(())
    }

    async fn rate(&mut self, index: usize, rating: u8, comment: Option<String>) -> Result<()> {
        let session = self.session_service.require_current().await?;
        if !(1..=5).contains(&rating) {
            return Err(ZyppyError::validation("Rating must be between 1 and 5"));
        }
        let order = select(&self.orders, index, "order")?;
        if order.status != OrderStatus::Delivered {
            return Err(ZyppyError::validation("Only delivered orders can be reviewed"));
        }
        let request = ReviewRequest {
            user_id: session.id.clone(),
            restaurant_id: order.restaurant_id.clone(),
            order_id: order.id.clone(),
            rating,
            comment,
        };
        let review = self.api.create_review(&request).await?;
        println!(
            "{}",
            format!("Thanks for the {} review!", render::stars(review.rating)).bright_green()
        );
        Ok(())
    }

    /// Spawns the payment verification task for a returning session id.
    ///
    /// Any poll already in flight is cancelled first; one poll at a time.
    fn start_poll(&mut self, payment_session_id: String) {
        self.cancel_active_poll();
        let token = CancellationToken::new();
        self.poll_cancel = Some(token.clone());
        *self.checkout_phase.lock().unwrap() = CheckoutPhase::Checking;
        println!(
            "{}",
            format!("Verifying payment session {payment_session_id}...").bright_black()
        );

        let checkout_service = Arc::clone(&self.checkout_service);
        let cart = Arc::clone(&self.cart);
        let report_tx = self.report_tx.clone();
        tokio::spawn(async move {
            let resolution = checkout_service
                .resolve_payment(&payment_session_id, cart, token)
                .await;
            let _ = report_tx
                .send(PollReport {
                    payment_session_id,
                    resolution,
                })
                .await;
        });
    }

    fn cancel_active_poll(&mut self) {
        if let Some(token) = self.poll_cancel.take() {
            token.cancel();
        }
    }

    fn effective_address(&self, session: Option<&Session>) -> Option<String> {
        self.delivery_address
            .clone()
            .or_else(|| session.and_then(|session| session.address.clone()))
    }
}

/// Picks the n-th entry of a numbered listing (1-based).
fn select<'a, T>(items: &'a [T], index: usize, what: &str) -> Result<&'a T> {
    if index == 0 || index > items.len() {
        return Err(ZyppyError::validation(format!(
            "No {what} numbered {index} on this screen"
        )));
    }
    Ok(&items[index - 1])
}

fn parse_command(line: &str) -> Result<Command<'_>> {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "login" => Command::Login {
            email: required(rest, "Usage: login <email>")?,
        },
        "logout" => Command::Logout,
        "go" => Command::Go { token: rest },
        "home" => Command::Home,
        "orders" => Command::Orders,
        "open" => Command::Open {
            index: parse_index(rest, "Usage: open <n>")?,
        },
        "search" => Command::Search {
            text: optional(rest),
        },
        "cuisine" => Command::Cuisine {
            cuisine: optional(rest),
        },
        "find" => Command::Find {
            text: required(rest, "Usage: find <text>")?,
        },
        "menu" => Command::Menu {
            category: optional(rest),
        },
        "reviews" => Command::Reviews,
        "add" => {
            let usage = "Usage: add <n> [qty]";
            let mut words = rest.split_whitespace();
            let index = parse_index(words.next().unwrap_or(""), usage)?;
            let quantity = match words.next() {
                Some(word) => word
                    .parse()
                    .map_err(|_| ZyppyError::validation(usage))?,
                None => 1,
            };
            Command::Add { index, quantity }
        }
        "remove" => Command::Remove {
            index: parse_index(rest, "Usage: remove <n>")?,
        },
        "qty" => {
            let usage = "Usage: qty <n> <quantity>";
            let mut words = rest.split_whitespace();
            let index = parse_index(words.next().unwrap_or(""), usage)?;
            let quantity = words
                .next()
                .and_then(|word| word.parse().ok())
                .ok_or_else(|| ZyppyError::validation(usage))?;
            Command::Quantity { index, quantity }
        }
        "cart" => Command::Cart,
        "clear" => Command::Clear,
        "address" => Command::Address {
            text: optional(rest),
        },
        "checkout" => Command::Checkout,
        "confirm" => Command::Confirm {
            session_id: required(rest, "Usage: confirm <session_id>")?,
        },
        "track" => Command::Track {
            index: parse_index(rest, "Usage: track <n>")?,
        },
        "rate" => {
            let usage = "Usage: rate <n> <1-5> [comment]";
            let mut words = rest.split_whitespace();
            let index = parse_index(words.next().unwrap_or(""), usage)?;
            let rating = words
                .next()
                .and_then(|word| word.parse().ok())
                .ok_or_else(|| ZyppyError::validation(usage))?;
            let remainder = words.collect::<Vec<_>>().join(" ");
            let comment = if remainder.is_empty() {
                None
            } else {
                Some(remainder)
            };
            Command::Rate {
                index,
                rating,
                comment,
            }
        }
        "help" => Command::Help,
        other => {
            return Err(ZyppyError::validation(format!(
                "Unknown command: {other}. Type 'help' for the list."
            )));
        }
    };
    Ok(command)
}

fn optional(rest: &str) -> Option<&str> {
    if rest.is_empty() { None } else { Some(rest) }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(ZyppyError::validation(usage))
    } else {
        Ok(rest)
    }
}

fn parse_index(token: &str, usage: &str) -> Result<usize> {
    token.parse().map_err(|_| ZyppyError::validation(usage))
}
