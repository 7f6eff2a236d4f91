//! Line-oriented terminal views over the catalog, cart and checkout.

use std::cell::Cell;
use std::fmt::Write as _;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use storefront_cart::{CartHandle, CartStore};
use storefront_catalog::Product;
use storefront_checkout::{CheckoutError, CheckoutFlow, ShippingDetails};
use storefront_core::{DomainError, Money, ProductId};

pub const HELP: &str = "\
commands:
  products                          list the catalog
  add <id>                          put one unit in the cart
  remove <id>                       take one unit out of the cart
  remove-all <id>                   drop the product from the cart
  cart [--json]                     show the cart
  clear                             empty the cart
  checkout <name>;<phone>;<address> place the order
  help                              show this text
  quit                              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Products,
    Add(ProductId),
    Remove(ProductId),
    RemoveAll(ProductId),
    Cart { json: bool },
    Clear,
    Checkout(ShippingDetails),
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs a product id")]
    MissingProductId(&'static str),

    #[error(transparent)]
    InvalidProductId(#[from] DomainError),

    #[error("usage: checkout <name>;<phone>;<address>")]
    CheckoutUsage,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let product_id = |verb: &'static str| -> Result<ProductId, ParseCommandError> {
            if rest.is_empty() {
                return Err(ParseCommandError::MissingProductId(verb));
            }
            Ok(ProductId::new(rest)?)
        };

        match verb {
            "" => Err(ParseCommandError::Empty),
            "products" | "ls" => Ok(Command::Products),
            "add" => Ok(Command::Add(product_id("add")?)),
            "remove" => Ok(Command::Remove(product_id("remove")?)),
            "remove-all" => Ok(Command::RemoveAll(product_id("remove-all")?)),
            "cart" => Ok(Command::Cart {
                json: rest == "--json",
            }),
            "clear" => Ok(Command::Clear),
            "checkout" => {
                let parts: Vec<&str> = rest.split(';').collect();
                match parts.as_slice() {
                    [name, phone, address] => {
                        Ok(Command::Checkout(ShippingDetails::new(*name, *phone, *address)))
                    }
                    _ => Err(ParseCommandError::CheckoutUsage),
                }
            }
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// What the caller should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// The storefront "views": catalog list, cart screen, checkout form, and the
/// cart badge, all sharing one injected cart handle.
pub struct Storefront {
    products: Vec<Arc<Product>>,
    cart: CartHandle,
    checkout: CheckoutFlow,
    currency_symbol: String,
    badge: Rc<Cell<u64>>,
}

impl Storefront {
    pub fn new(
        products: Vec<Arc<Product>>,
        cart: CartHandle,
        checkout: CheckoutFlow,
        currency_symbol: impl Into<String>,
    ) -> Self {
        let badge = Rc::new(Cell::new(cart.read().total_items()));
        let counter = Rc::clone(&badge);
        cart.write().subscribe(move |change, store: &CartStore| {
            counter.set(store.total_items());
            tracing::debug!(change = ?change, badge = store.total_items(), "badge updated");
        });

        Self {
            products,
            cart,
            checkout,
            currency_symbol: currency_symbol.into(),
            badge,
        }
    }

    /// Item count shown on the cart badge, kept current by a cart listener.
    pub fn badge(&self) -> u64 {
        self.badge.get()
    }

    pub fn cart(&self) -> &CartHandle {
        &self.cart
    }

    pub fn find(&self, id: &ProductId) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id_typed() == id)
    }

    pub async fn execute(&self, command: Command) -> Outcome {
        let output = match command {
            Command::Products => self.render_products(),
            Command::Add(id) => self.with_product(&id, |cart, product| {
                cart.add(product);
                format!("Added {} ({} in cart).", product.title(), cart.qty_of(product))
            }),
            Command::Remove(id) => self.with_product(&id, |cart, product| {
                if cart.remove_single(product) {
                    format!("Removed one {} ({} left).", product.title(), cart.qty_of(product))
                } else {
                    format!("{} is not in the cart.", product.title())
                }
            }),
            Command::RemoveAll(id) => self.with_product(&id, |cart, product| {
                if cart.remove_all(product) {
                    format!("Removed {} from the cart.", product.title())
                } else {
                    format!("{} is not in the cart.", product.title())
                }
            }),
            Command::Cart { json: true } => self.render_cart_json(),
            Command::Cart { json: false } => self.render_cart(),
            Command::Clear => {
                self.cart.write().clear();
                "Cart cleared.".to_string()
            }
            Command::Checkout(details) => self.place_order(details).await,
            Command::Help => HELP.to_string(),
            Command::Quit => return Outcome::Quit,
        };
        Outcome::Continue(output)
    }

    fn with_product(
        &self,
        id: &ProductId,
        action: impl FnOnce(&mut CartStore, &Arc<Product>) -> String,
    ) -> String {
        match self.find(id) {
            Some(product) => action(&mut self.cart.write(), product),
            None => format!("No product with id `{id}`."),
        }
    }

    async fn place_order(&self, details: ShippingDetails) -> String {
        if self.checkout.in_progress() {
            return "An order is already being placed.".to_string();
        }

        match self.checkout.place_order(details).await {
            Ok(confirmation) => confirmation.message(&self.currency_symbol),
            Err(CheckoutError::Invalid(DomainError::Validation(msg))) => {
                format!("Please fix the shipping details: {msg}.")
            }
            Err(err) => format!("Could not place the order: {err}."),
        }
    }

    fn money(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount.display())
    }

    fn render_products(&self) -> String {
        if self.products.is_empty() {
            return "No products available.".to_string();
        }

        let cart = self.cart.read();
        let mut out = String::new();
        for product in &self.products {
            let _ = write!(
                out,
                "{:<6} {:<24} {:>10}",
                product.id_typed(),
                product.title(),
                self.money(product.price())
            );
            let qty = cart.qty_of(product);
            if qty > 0 {
                let _ = write!(out, "  [in cart: {qty}]");
            }
            out.push('\n');
        }
        out.pop();
        out
    }

    fn render_cart(&self) -> String {
        let cart = self.cart.read();
        if cart.is_empty() {
            return "Your cart is empty.".to_string();
        }

        let mut out = String::new();
        for line in cart.lines() {
            let _ = writeln!(
                out,
                "{:>3} x {:<24} {:>10}",
                line.quantity(),
                line.product().title(),
                self.money(line.line_total())
            );
        }
        let _ = write!(
            out,
            "Total: {} ({} items)",
            self.money(cart.total_price()),
            cart.total_items()
        );
        out
    }

    fn render_cart_json(&self) -> String {
        let snapshot = self.cart.read().snapshot();
        serde_json::to_string_pretty(&snapshot)
            .unwrap_or_else(|err| format!("Could not render the cart: {err}."))
    }
}
