//! View routing.
//!
//! Maps opaque navigation tokens (URL-fragment shaped) onto the four
//! screens. Parsing is a pure function of the token; unrecognized input
//! falls back to [`Screen::Home`] instead of erroring, so a stale or
//! mistyped token can never strand the user.

use std::fmt;

/// The screen a navigation token selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Restaurant discovery list
    Home,
    /// A single restaurant's menu
    RestaurantMenu { restaurant_id: String },
    /// The user's order history
    MyOrders,
    /// Payment-return landing; carries the payment session to verify
    OrderSuccess { session_id: Option<String> },
}

impl Screen {
    /// Resolves a navigation token to a screen.
    ///
    /// Leading `#` and `/` are insignificant, as is surrounding whitespace.
    /// A `?key=value&...` suffix is only meaningful on `order-success`,
    /// where `session_id` is extracted. Everything unrecognized resolves to
    /// `Home`.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let token = token.strip_prefix('#').unwrap_or(token);
        let token = token.trim_start_matches('/');
        let (path, query) = match token.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (token, None),
        };

        if path.is_empty() {
            return Self::Home;
        }
        if path == "orders" {
            return Self::MyOrders;
        }
        if path == "order-success" {
            return Self::OrderSuccess {
                session_id: query.and_then(|q| query_param(q, "session_id")),
            };
        }
        if let Some(id) = path.strip_prefix("restaurant/")
            && !id.is_empty()
        {
            return Self::RestaurantMenu {
                restaurant_id: id.to_string(),
            };
        }
        Self::Home
    }
}

impl fmt::Display for Screen {
    /// The canonical token form, used for prompts and logging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::RestaurantMenu { restaurant_id } => {
                write!(f, "restaurant/{restaurant_id}")
            }
            Self::MyOrders => write!(f, "orders"),
            Self::OrderSuccess { session_id: None } => write!(f, "order-success"),
            Self::OrderSuccess {
                session_id: Some(id),
            } => write!(f, "order-success?session_id={id}"),
        }
    }
}

/// Extracts a query parameter's value from a `k=v&k2=v2` string.
///
/// Values are taken verbatim; the ids this client handles never need
/// percent-decoding. Empty values count as absent.
fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key && !v.is_empty()).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_home() {
        assert_eq!(Screen::parse(""), Screen::Home);
        assert_eq!(Screen::parse("   "), Screen::Home);
        assert_eq!(Screen::parse("#"), Screen::Home);
        assert_eq!(Screen::parse("#/"), Screen::Home);
    }

    #[test]
    fn test_prefixes_are_insignificant() {
        assert_eq!(Screen::parse("orders"), Screen::MyOrders);
        assert_eq!(Screen::parse("#orders"), Screen::MyOrders);
        assert_eq!(Screen::parse("/orders"), Screen::MyOrders);
        assert_eq!(Screen::parse("#/orders"), Screen::MyOrders);
    }

    #[test]
    fn test_restaurant_with_id() {
        assert_eq!(
            Screen::parse("restaurant/abc-123"),
            Screen::RestaurantMenu {
                restaurant_id: "abc-123".to_string()
            }
        );
    }

    #[test]
    fn test_restaurant_without_id_falls_back_to_home() {
        assert_eq!(Screen::parse("restaurant/"), Screen::Home);
        assert_eq!(Screen::parse("restaurant"), Screen::Home);
    }

    #[test]
    fn test_order_success_with_session_id() {
        assert_eq!(
            Screen::parse("order-success?session_id=cs_test_42"),
            Screen::OrderSuccess {
                session_id: Some("cs_test_42".to_string())
            }
        );
    }

    #[test]
    fn test_order_success_without_query() {
        assert_eq!(
            Screen::parse("order-success"),
            Screen::OrderSuccess { session_id: None }
        );
        assert_eq!(
            Screen::parse("order-success?session_id="),
            Screen::OrderSuccess { session_id: None }
        );
        assert_eq!(
            Screen::parse("order-success?other=1"),
            Screen::OrderSuccess { session_id: None }
        );
    }

    #[test]
    fn test_session_id_among_other_params() {
        assert_eq!(
            Screen::parse("#/order-success?foo=bar&session_id=cs_1&x=y"),
            Screen::OrderSuccess {
                session_id: Some("cs_1".to_string())
            }
        );
    }

    #[test]
    fn test_unrecognized_tokens_fall_back_to_home() {
        for token in ["checkout", "cart", "admin/panel", "orders/42", "Orders"] {
            assert_eq!(Screen::parse(token), Screen::Home, "token: {token}");
        }
    }

    #[test]
    fn test_display_is_reparseable() {
        let screens = [
            Screen::Home,
            Screen::RestaurantMenu {
                restaurant_id: "r1".to_string(),
            },
            Screen::MyOrders,
            Screen::OrderSuccess {
                session_id: Some("cs_9".to_string()),
            },
        ];
        for screen in screens {
            assert_eq!(Screen::parse(&screen.to_string()), screen);
        }
    }
}
