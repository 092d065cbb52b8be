//! # Register Commands
//!
//! The terminal front end: one line of input, one [`Command`], one reply.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  > menu vodka            list a section (numbered)                      │
//! │  > start                 open an order                                  │
//! │  > select 2              pick from the last listing                     │
//! │  > inc Sprite            count a mixer (or: inc 1)                      │
//! │  > confirm               put the drink on the ticket                    │
//! │  > complete              save the order                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use comanda_core::flow::Flow;
use comanda_core::pricing::format_price;
use comanda_core::{CookingTerm, LiquorFamily, Product};
use comanda_store::{KeyValueStore, ProductSource};
use tracing::debug;

use crate::error::{ApiError, ErrorCode, RegisterError};
use crate::session::{OrderSession, Selection};

pub const HELP: &str = "\
Commands:
  sections              list the menu sections
  menu <section>        list a menu section (pizzas, cervezas, vodka, ...)
  liquor <family>       list a liquor family (ron, tequila, whisky, ...)
  start                 start a new order
  select <n>            select product n from the last listing
  options               show the options for the selected drink
  inc <option|n>        add one of a mixer
  dec <option|n>        remove one of a mixer
  choose <option|n>     pick a single option (liters, cups)
  term <medio|tres-cuartos|bien-cocido>   cooking term for meat
  confirm               confirm the selected drink
  food [removed]        confirm a dish, optionally listing what to leave out
  garnish [text]        confirm a meat or main course, optionally changing the garnish
  back                  drop the selected product
  cart                  show the order in progress
  remove <line-id>      remove a line
  complete              save the order
  cancel                discard the order in progress
  orders                list active orders
  history               list archived orders
  delete <order-id>     move an order to the history
  clear-history         empty the history
  quit";

// =============================================================================
// Command
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Sections,
    Menu(String),
    Liquor(LiquorFamily),
    Start,
    Select(usize),
    Options,
    Increment(String),
    Decrement(String),
    Choose(String),
    Term(CookingTerm),
    Confirm,
    Food(Option<String>),
    Garnish(Option<String>),
    Back,
    Cart,
    Remove(String),
    Complete,
    CancelOrder,
    Orders,
    History,
    Delete(String),
    ClearHistory,
    Quit,
}

fn required(verb: &str, arg: &str, what: &str) -> Result<String, RegisterError> {
    if arg.is_empty() {
        Err(RegisterError::InvalidCommand(format!("{} needs {}", verb, what)))
    } else {
        Ok(arg.to_string())
    }
}

fn optional(arg: &str) -> Option<String> {
    if arg.is_empty() {
        None
    } else {
        Some(arg.to_string())
    }
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, RegisterError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "sections" => Command::Sections,
            "menu" => Command::Menu(required(verb, arg, "a section")?),
            "liquor" => {
                let tag = required(verb, arg, "a family")?;
                let family = LiquorFamily::from_tag(&tag).ok_or_else(|| {
                    RegisterError::InvalidCommand(format!("Unknown liquor family: {}", tag))
                })?;
                Command::Liquor(family)
            }
            "start" => Command::Start,
            "select" => {
                let n = required(verb, arg, "a listing number")?;
                let index = n.parse::<usize>().map_err(|_| {
                    RegisterError::InvalidCommand(format!("Not a listing number: {}", n))
                })?;
                Command::Select(index)
            }
            "options" => Command::Options,
            "inc" | "+" => Command::Increment(required(verb, arg, "an option")?),
            "dec" | "-" => Command::Decrement(required(verb, arg, "an option")?),
            "choose" => Command::Choose(required(verb, arg, "an option")?),
            "term" => {
                let key = required(verb, arg, "a cooking term")?;
                let term = CookingTerm::from_key(&key.to_lowercase()).ok_or_else(|| {
                    RegisterError::InvalidCommand(format!("Unknown cooking term: {}", key))
                })?;
                Command::Term(term)
            }
            "confirm" => Command::Confirm,
            "food" => Command::Food(optional(arg)),
            "garnish" => Command::Garnish(optional(arg)),
            "back" => Command::Back,
            "cart" => Command::Cart,
            "remove" => Command::Remove(required(verb, arg, "a line id")?),
            "complete" => Command::Complete,
            "cancel" => Command::CancelOrder,
            "orders" => Command::Orders,
            "history" => Command::History,
            "delete" => Command::Delete(required(verb, arg, "an order id")?),
            "clear-history" => Command::ClearHistory,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(RegisterError::InvalidCommand(format!(
                    "Unknown command: {} (try 'help')",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

// =============================================================================
// Register
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Lines(Vec<String>),
    Quit,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Reply::Lines(vec![text.into()])
    }
}

/// A session plus the last product listing shown to the operator.
pub struct Register<S: KeyValueStore, P: ProductSource> {
    session: OrderSession<S, P>,
    listing: Vec<Product>,
}

impl<S: KeyValueStore, P: ProductSource> Register<S, P> {
    pub fn new(session: OrderSession<S, P>) -> Self {
        Register {
            session,
            listing: Vec::new(),
        }
    }

    pub fn session(&self) -> &OrderSession<S, P> {
        &self.session
    }

    /// Option argument: a 1-based index into the offered options, or the
    /// option label itself.
    fn option_arg(&self, arg: &str) -> String {
        let offered = self.session.offered_options();
        match arg.parse::<usize>() {
            Ok(n) if (1..=offered.len()).contains(&n) => offered[n - 1].clone(),
            _ => arg.to_string(),
        }
    }

    fn show_listing(&mut self, products: Vec<Product>, title: &str) -> Reply {
        if products.is_empty() {
            self.listing.clear();
            return Reply::line(format!("No products in {}", title));
        }
        let lines = products
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let prefix = p.price_type.prefix();
                let name = if prefix.is_empty() {
                    p.name.clone()
                } else {
                    format!("{} {}", prefix, p.name)
                };
                format!("{:>3}. {:<40} {}", i + 1, name, format_price(p.price))
            })
            .collect();
        self.listing = products;
        Reply::Lines(lines)
    }

    fn show_options(&self) -> Reply {
        let Some(options) = self.session.current_options() else {
            return Reply::line("No drink selected");
        };
        let selection = self.session.selection();
        let mut lines = vec![options.message.clone()];
        for (i, option) in options.options.iter().enumerate() {
            let count = selection
                .and_then(|s| s.option_counts.get(option).copied())
                .unwrap_or(0);
            let chosen = selection.is_some_and(|s| {
                s.option_counts.is_empty() && s.selected_options.iter().any(|o| o == option)
            });
            let marker = if chosen {
                " (•)".to_string()
            } else if count > 0 {
                format!(" ×{}", count)
            } else {
                String::new()
            };
            lines.push(format!("{:>3}. {}{}", i + 1, option, marker));
        }
        Reply::Lines(lines)
    }

    fn show_cart(&self) -> Reply {
        let items = self.session.items();
        if items.is_empty() {
            return Reply::line("Cart is empty");
        }
        let mut lines: Vec<String> = items
            .iter()
            .map(|item| {
                let extra = if item.customizations.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", item.customizations.join(", "))
                };
                format!("{}  {}{}  {}", item.id, item.name, extra, format_price(item.price))
            })
            .collect();
        lines.push(format!("Total: {}", format_price(self.session.total())));
        Reply::Lines(lines)
    }

    fn add_confirmed(&mut self, item: comanda_core::NewLineItem) -> Result<Reply, ApiError> {
        let line = self.session.add_to_order(item)?;
        let extra = if line.customizations.is_empty() {
            String::new()
        } else {
            format!(" [{}]", line.customizations.join(", "))
        };
        Ok(Reply::line(format!("✓ {}{}  {}", line.name, extra, format_price(line.price))))
    }

    /// Runs one command against the session.
    pub async fn execute(&mut self, command: Command) -> Result<Reply, ApiError> {
        debug!(?command, "Executing command");

        match command {
            Command::Help => Ok(Reply::line(HELP)),
            Command::Quit => Ok(Reply::Quit),

            Command::Sections => {
                let sections = self.session.sections().await?;
                if sections.is_empty() {
                    Ok(Reply::line("No menu sections"))
                } else {
                    Ok(Reply::Lines(sections))
                }
            }
            Command::Menu(section) => {
                let products = self.session.menu(&section).await?;
                Ok(self.show_listing(products, &section))
            }
            Command::Liquor(family) => {
                let products = self.session.liquor_menu(family).await?;
                Ok(self.show_listing(products, family.as_str()))
            }

            Command::Start => {
                self.session.start_order();
                Ok(Reply::line("Order started"))
            }
            Command::Select(n) => {
                let product = n
                    .checked_sub(1)
                    .and_then(|i| self.listing.get(i))
                    .cloned()
                    .ok_or_else(|| ApiError::not_found("Listing entry", &n.to_string()))?;
                match self.session.select_product(product, "")? {
                    Selection::Added(line) => {
                        Ok(Reply::line(format!("✓ {}  {}", line.name, format_price(line.price))))
                    }
                    Selection::Customize { flow: Flow::Drinks, .. } => Ok(self.show_options()),
                    Selection::Customize { flow: Flow::Food, .. } => Ok(Reply::line(
                        "Confirm with 'food' (keep everything) or 'food <ingredients to remove>'",
                    )),
                    Selection::Customize { flow: Flow::Meat, .. } => Ok(Reply::line(
                        "Pick a cooking term with 'term', then confirm with 'garnish [changes]'",
                    )),
                    Selection::Customize { .. } => Ok(Reply::line(
                        "Confirm with 'garnish' (standard) or 'garnish <changes>'",
                    )),
                }
            }
            Command::Options => Ok(self.show_options()),
            Command::Increment(arg) => {
                let option = self.option_arg(&arg);
                match self.session.increment_option(&option) {
                    Some(count) => Ok(Reply::line(format!("{} ×{}", option, count))),
                    None => Ok(Reply::line(format!("✗ {} not added", option))),
                }
            }
            Command::Decrement(arg) => {
                let option = self.option_arg(&arg);
                match self.session.decrement_option(&option) {
                    Some(count) => Ok(Reply::line(format!("{} ×{}", option, count))),
                    None => Ok(Reply::line(format!("✗ {} is not selected", option))),
                }
            }
            Command::Choose(arg) => {
                let option = self.option_arg(&arg);
                if self.session.choose_option(&option) {
                    Ok(Reply::line(format!("(•) {}", option)))
                } else {
                    Err(ApiError::validation(format!("{} is not offered", option)))
                }
            }
            Command::Term(term) => {
                self.session.set_cooking_term(term)?;
                Ok(Reply::line(term.label()))
            }
            Command::Confirm => {
                let item = self.session.confirm_customization()?;
                self.add_confirmed(item)
            }
            Command::Food(removed) => {
                let item = self.session.confirm_food(removed.as_deref())?;
                self.add_confirmed(item)
            }
            Command::Garnish(garnish) => {
                let item = self.session.confirm_garnish(garnish.as_deref())?;
                self.add_confirmed(item)
            }
            Command::Back => {
                self.session.cancel_customization();
                Ok(Reply::line("Selection dropped"))
            }

            Command::Cart => Ok(self.show_cart()),
            Command::Remove(id) => {
                if self.session.remove_from_order(&id) {
                    Ok(Reply::line("Line removed"))
                } else {
                    Err(ApiError::not_found("Line", &id))
                }
            }
            Command::Complete => {
                let order = self.session.complete_order().await?;
                Ok(Reply::Lines(vec![
                    format!("✓ Order {} saved", order.id),
                    format!(
                        "  {} items, total {}, {}",
                        order.items.len(),
                        format_price(order.total),
                        order.completed_at.unwrap_or_default()
                    ),
                ]))
            }
            Command::CancelOrder => {
                self.session.cancel_order();
                Ok(Reply::line("Order cancelled"))
            }

            Command::Orders => {
                let orders = self.session.get_active_orders().await;
                Ok(order_lines(&orders, "No active orders"))
            }
            Command::History => {
                let orders = self.session.get_order_history().await;
                Ok(order_lines(&orders, "History is empty"))
            }
            Command::Delete(id) => {
                if self.session.delete_order(&id).await {
                    Ok(Reply::line(format!("Order {} moved to history", id)))
                } else {
                    Err(ApiError::new(
                        ErrorCode::NotFound,
                        format!("Order {} is not active or could not be moved", id),
                    ))
                }
            }
            Command::ClearHistory => {
                if self.session.clear_history().await {
                    Ok(Reply::line("History cleared"))
                } else {
                    Err(ApiError::new(ErrorCode::DatabaseError, "History could not be cleared"))
                }
            }
        }
    }
}

fn order_lines(orders: &[comanda_core::Order], empty: &str) -> Reply {
    if orders.is_empty() {
        return Reply::line(empty);
    }
    Reply::Lines(
        orders
            .iter()
            .map(|order| {
                format!(
                    "{}  {}  {} items  {}",
                    order.id,
                    order.completed_at.as_deref().unwrap_or("-"),
                    order.items.len(),
                    format_price(order.total)
                )
            })
            .collect(),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use comanda_store::{MemoryCatalog, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    async fn register() -> Register<Arc<MemoryStore>, MemoryCatalog> {
        let catalog = MemoryCatalog::new();
        catalog
            .insert(
                "ron",
                vec![json!({"nombre": "BACARDI MANGO", "precioBotella": 780})],
            )
            .await;
        catalog
            .insert("cervezas", vec![json!({"nombre": "CORONA", "precio": 55})])
            .await;
        Register::new(OrderSession::new(Arc::new(MemoryStore::new()), catalog))
    }

    async fn run(register: &mut Register<Arc<MemoryStore>, MemoryCatalog>, line: &str) -> Reply {
        let command = Command::parse(line).unwrap().unwrap();
        register.execute(command).await.unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("  ").unwrap(), None);
        assert_eq!(
            Command::parse("inc Jugo de Piña").unwrap(),
            Some(Command::Increment("Jugo de Piña".to_string()))
        );
        assert_eq!(
            Command::parse("liquor Ron").unwrap(),
            Some(Command::Liquor(LiquorFamily::Ron))
        );
        assert_eq!(
            Command::parse("term tres-cuartos").unwrap(),
            Some(Command::Term(CookingTerm::TresCuartos))
        );
        assert_eq!(Command::parse("food").unwrap(), Some(Command::Food(None)));
        assert_eq!(
            Command::parse("menu platos fuertes").unwrap(),
            Some(Command::Menu("platos fuertes".to_string()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("dance"),
            Err(RegisterError::InvalidCommand(_))
        ));
        assert!(Command::parse("select two").is_err());
        assert!(Command::parse("term crudo").is_err());
        assert!(Command::parse("menu").is_err());
    }

    #[tokio::test]
    async fn test_drink_order_through_commands() {
        let mut register = register().await;
        run(&mut register, "start").await;
        run(&mut register, "liquor ron").await;
        run(&mut register, "select 1").await;

        // Option 3 is "Jugo de Piña"
        assert_eq!(
            run(&mut register, "inc 3").await,
            Reply::line("Jugo de Piña ×1")
        );
        run(&mut register, "inc 3").await;
        assert_eq!(
            run(&mut register, "inc Sprite").await,
            Reply::line("✗ Sprite not added")
        );

        let Reply::Lines(lines) = run(&mut register, "confirm").await else {
            panic!("expected lines");
        };
        assert_eq!(lines[0], "✓ Botella BACARDI MANGO [2x Jugo de Piña]  $780.00");

        run(&mut register, "menu cervezas").await;
        run(&mut register, "select 1").await;

        let Reply::Lines(lines) = run(&mut register, "complete").await else {
            panic!("expected lines");
        };
        assert!(lines[1].contains("total $835.00"));
        assert_eq!(register.session().get_active_orders().await.len(), 1);
    }

    #[tokio::test]
    async fn test_errors_surface_as_api_errors() {
        let mut register = register().await;
        let err = register.execute(Command::Complete).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderError);

        let err = register.execute(Command::Select(9)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = register.execute(Command::Confirm).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_sections_and_selection_gate() {
        let mut register = register().await;
        assert_eq!(
            run(&mut register, "sections").await,
            Reply::Lines(vec!["cervezas".to_string(), "ron".to_string()])
        );

        run(&mut register, "menu cervezas").await;
        let err = register.execute(Command::Select(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderError);

        run(&mut register, "start").await;
        assert_eq!(
            run(&mut register, "select 1").await,
            Reply::line("✓ CORONA  $55.00")
        );
    }

    #[tokio::test]
    async fn test_quit() {
        let mut register = register().await;
        assert_eq!(run(&mut register, "exit").await, Reply::Quit);
    }
}
