//! # Order Session
//!
//! One operator's order in progress: the selected product, its
//! customization, the ledger, and the archive completed orders go to.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   idle ──start_order()──► ordering ──complete_order()──► idle           │
//! │     ▲                       │  ▲        (saved to archive)              │
//! │     └────cancel_order()─────┘  │                                        │
//! │                                │                                        │
//! │          select_product()      │                                        │
//! │               │                │                                        │
//! │               ├── Direct ──────┤  added immediately                     │
//! │               │                │                                        │
//! │               ├── Drinks ──► increment/decrement/choose ──► confirm     │
//! │               ├── Food ────► confirm_food(removed?) ─────────┤          │
//! │               ├── Meat ────► set_cooking_term ──► confirm_garnish       │
//! │               └── MainCourse ───────────────────► confirm_garnish       │
//! │                                                                         │
//! │   select_product() outside an order is rejected                         │
//! │   cancel_customization() drops the selection, never touches the ledger  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is owned by a single front end and mutated from one task, so
//! it holds no locks.

use chrono::{Local, Utc};
use tracing::{debug, info, warn};

use comanda_core::drinks::{DrinkOptionResolver, DrinkOptions};
use comanda_core::flow::{
    customization_flow, food_customizations, main_course_customizations, meat_customizations, Flow,
};
use comanda_core::formatter::{format, plain_display_name};
use comanda_core::selection::{
    SelectionAction, SelectionCounter, SelectionMode, SelectionOutcome, SelectionState,
};
use comanda_core::validation::validate_line_item;
use comanda_core::{
    CartLedger, CookingTerm, CoreError, LineItem, LiquorFamily, Money, NewLineItem, Order, Product,
};
use comanda_store::{KeyValueStore, OrderArchive, ProductSource};

use crate::config::DEFAULT_TIME_FORMAT;
use crate::error::{RegisterError, RegisterResult};

/// What selecting a product led to.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The product needed no customization and is on the ticket.
    Added(LineItem),
    /// The product waits for a customization step.
    Customize {
        flow: Flow,
        /// Offered mixers, for the drinks flow.
        options: Option<DrinkOptions>,
    },
}

/// The product being customized.
#[derive(Debug, Clone)]
struct Customization {
    product: Product,
    flow: Flow,
    counter: SelectionCounter,
    options: Option<DrinkOptions>,
}

pub struct OrderSession<S: KeyValueStore, P: ProductSource> {
    resolver: DrinkOptionResolver,
    catalog: P,
    archive: OrderArchive<S>,
    ledger: CartLedger,
    current: Option<Customization>,
    order_mode: bool,
    time_format: String,
}

impl<S: KeyValueStore, P: ProductSource> OrderSession<S, P> {
    pub fn new(store: S, catalog: P) -> Self {
        OrderSession {
            resolver: DrinkOptionResolver::default(),
            catalog,
            archive: OrderArchive::new(store),
            ledger: CartLedger::new(),
            current: None,
            order_mode: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }

    /// chrono format for the `completedAt` stamp.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Menu sections that hold products.
    pub async fn sections(&self) -> RegisterResult<Vec<String>> {
        Ok(self.catalog.categories().await?)
    }

    /// Every priced offer in a menu section.
    pub async fn menu(&self, category: &str) -> RegisterResult<Vec<Product>> {
        let entries = self.catalog.get_products_by_category(category).await?;
        Ok(entries.iter().flat_map(|entry| entry.offers()).collect())
    }

    /// Every priced offer of one liquor family.
    pub async fn liquor_menu(&self, family: LiquorFamily) -> RegisterResult<Vec<Product>> {
        let entries = self.catalog.get_liquor_subcategory(family).await?;
        Ok(entries.iter().flat_map(|entry| entry.offers()).collect())
    }

    // =========================================================================
    // Customization
    // =========================================================================

    /// Selects a product. `category` overrides the product's own when not
    /// blank. Products that need no customization go straight to the ledger.
    /// Fails with `NotInOrderMode` until an order is started.
    pub fn select_product(&mut self, mut product: Product, category: &str) -> RegisterResult<Selection> {
        if !self.order_mode {
            warn!(product = %product.name, "Selection outside of an order");
            return Err(RegisterError::NotInOrderMode);
        }
        if !category.trim().is_empty() {
            product.category = category.trim().to_string();
        }
        self.current = None;

        let flow = customization_flow(&product);
        debug!(product = %product.name, %flow, "Product selected");

        match flow {
            Flow::Direct => {
                let name = if product.price_type.is_liquor_serving() {
                    plain_display_name(&product)
                } else {
                    product.name.trim().to_string()
                };
                let line = self.add_to_order(NewLineItem {
                    name,
                    price: product.price,
                    category: product.category,
                    customizations: Vec::new(),
                })?;
                Ok(Selection::Added(line))
            }
            Flow::Drinks => {
                let options = self.resolver.resolve(&product);
                let counter = SelectionCounter::for_product(&product, &options.options);
                self.current = Some(Customization {
                    product,
                    flow,
                    counter,
                    options: Some(options.clone()),
                });
                Ok(Selection::Customize {
                    flow,
                    options: Some(options),
                })
            }
            Flow::Food | Flow::Meat | Flow::MainCourse => {
                self.current = Some(Customization {
                    product,
                    flow,
                    counter: SelectionCounter::new(SelectionMode::Single, Vec::new()),
                    options: None,
                });
                Ok(Selection::Customize {
                    flow,
                    options: None,
                })
            }
        }
    }

    /// The product being customized, if any.
    pub fn current_product(&self) -> Option<&Product> {
        self.current.as_ref().map(|c| &c.product)
    }

    pub fn current_flow(&self) -> Option<Flow> {
        self.current.as_ref().map(|c| c.flow)
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.current.as_ref().map(|c| c.counter.state())
    }

    /// Resolved mixers and guidance message for the drink being customized.
    pub fn current_options(&self) -> Option<&DrinkOptions> {
        self.current.as_ref().and_then(|c| c.options.as_ref())
    }

    /// The options offered for the product being customized.
    pub fn offered_options(&self) -> &[String] {
        self.current
            .as_ref()
            .map(|c| c.counter.offered())
            .unwrap_or_default()
    }

    /// Mixer options for `product_name`, read against the current product.
    /// Never fails: a blank name yields "Ninguno" with an error message.
    pub fn get_drink_options(&self, product_name: &str) -> DrinkOptions {
        self.resolver
            .resolve_name(product_name, self.current_product())
    }

    /// Adds one of `option`. `None` means rejected (cap reached, option not
    /// offered, or nothing selected) and nothing changed.
    pub fn increment_option(&mut self, option: &str) -> Option<u32> {
        let Some(current) = self.current.as_mut() else {
            warn!(option, "Increment with no product selected");
            return None;
        };
        match current
            .counter
            .dispatch(SelectionAction::Increment(option.to_string()))
        {
            SelectionOutcome::Count(count) => Some(count),
            _ => None,
        }
    }

    /// Removes one of `option`. `None` when its count was already zero.
    pub fn decrement_option(&mut self, option: &str) -> Option<u32> {
        let Some(current) = self.current.as_mut() else {
            warn!(option, "Decrement with no product selected");
            return None;
        };
        match current
            .counter
            .dispatch(SelectionAction::Decrement(option.to_string()))
        {
            SelectionOutcome::Count(count) => Some(count),
            _ => None,
        }
    }

    /// Makes `option` the only selection (liters, cups).
    pub fn choose_option(&mut self, option: &str) -> bool {
        match self.current.as_mut() {
            Some(current) => {
                current
                    .counter
                    .dispatch(SelectionAction::Choose(option.to_string()))
                    == SelectionOutcome::Updated
            }
            None => {
                warn!(option, "Choice with no product selected");
                false
            }
        }
    }

    /// Sets the cooking term of the meat being customized.
    pub fn set_cooking_term(&mut self, term: CookingTerm) -> RegisterResult<()> {
        let current = self.current.as_mut().ok_or(CoreError::NoProductSelected)?;
        current
            .flow
            .ensure(&current.product, &[Flow::Meat], Flow::Meat)?;
        current.counter.dispatch(SelectionAction::SetCookingTerm(term));
        Ok(())
    }

    /// Finishes a drinks customization and returns the line to add.
    pub fn confirm_customization(&mut self) -> RegisterResult<NewLineItem> {
        let current = self.current.as_ref().ok_or(CoreError::NoProductSelected)?;
        current
            .flow
            .ensure(&current.product, &[Flow::Drinks], Flow::Drinks)?;

        let formatted = format(&current.product, current.counter.state());
        debug!(
            product = %current.product.name,
            text = %formatted.customization_text,
            "Drink customization confirmed"
        );

        let item = NewLineItem {
            name: formatted.display_name(),
            price: current.product.price,
            category: current.product.category.clone(),
            customizations: formatted.customizations,
        };
        self.current = None;
        Ok(item)
    }

    /// Finishes a food customization. `None` keeps every ingredient;
    /// otherwise the text lists what to leave out.
    pub fn confirm_food(&mut self, removed: Option<&str>) -> RegisterResult<NewLineItem> {
        let current = self.current.as_ref().ok_or(CoreError::NoProductSelected)?;
        current
            .flow
            .ensure(&current.product, &[Flow::Food], Flow::Food)?;

        let item = NewLineItem {
            name: current.product.name.trim().to_string(),
            price: current.product.price,
            category: current.product.category.clone(),
            customizations: food_customizations(removed)?,
        };
        self.current = None;
        Ok(item)
    }

    /// Finishes a meat or main-course customization. Meat fails, keeping
    /// the selection, while no cooking term is set.
    pub fn confirm_garnish(&mut self, garnish: Option<&str>) -> RegisterResult<NewLineItem> {
        let current = self.current.as_ref().ok_or(CoreError::NoProductSelected)?;
        current
            .flow
            .ensure(&current.product, &[Flow::Meat, Flow::MainCourse], Flow::Meat)?;

        let customizations = if current.flow.needs_cooking_term() {
            let Some(term) = current.counter.cooking_term() else {
                warn!(product = %current.product.name, "Confirm without a cooking term");
                return Err(CoreError::MissingCookingTerm {
                    product: current.product.name.clone(),
                }
                .into());
            };
            meat_customizations(term, garnish)?
        } else {
            main_course_customizations(garnish)?
        };

        let item = NewLineItem {
            name: current.product.name.trim().to_string(),
            price: current.product.price,
            category: current.product.category.clone(),
            customizations,
        };
        self.current = None;
        Ok(item)
    }

    /// Drops the product being customized. The ledger is untouched.
    pub fn cancel_customization(&mut self) {
        if let Some(current) = self.current.take() {
            debug!(product = %current.product.name, "Customization cancelled");
        }
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    pub fn start_order(&mut self) {
        if !self.order_mode {
            info!("Order started");
        }
        self.order_mode = true;
    }

    pub fn is_ordering(&self) -> bool {
        self.order_mode
    }

    pub fn add_to_order(&mut self, item: NewLineItem) -> RegisterResult<LineItem> {
        if !self.order_mode {
            warn!(item = %item.name, "Add outside of an order");
            return Err(RegisterError::NotInOrderMode);
        }
        validate_line_item(&item)?;

        let line = self.ledger.add_item(item);
        debug!(id = %line.id, name = %line.name, price = %line.price, "Line added");
        Ok(line)
    }

    pub fn remove_from_order(&mut self, id: &str) -> bool {
        self.ledger.remove_item(id)
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.ledger.items()
    }

    pub fn total(&self) -> Money {
        self.ledger.total()
    }

    /// Saves the ledger as an order. On a failed save the ledger is kept
    /// and the order stays open.
    pub async fn complete_order(&mut self) -> RegisterResult<Order> {
        if self.ledger.is_empty() {
            return Err(RegisterError::EmptyOrder);
        }

        let completed_at = Local::now().format(&self.time_format).to_string();
        let order = Order::new(self.ledger.items(), Utc::now(), Some(completed_at));

        if !self.archive.save(&order).await {
            return Err(RegisterError::PersistenceFailed {
                order_id: order.id,
            });
        }

        info!(order_id = %order.id, items = order.items.len(), total = %order.total, "Order completed");
        self.ledger.clear();
        self.current = None;
        self.order_mode = false;
        Ok(order)
    }

    /// Discards the order in progress.
    pub fn cancel_order(&mut self) {
        info!(items = self.ledger.len(), "Order cancelled");
        self.ledger.clear();
        self.current = None;
        self.order_mode = false;
    }

    // =========================================================================
    // Archive
    // =========================================================================

    pub async fn get_active_orders(&self) -> Vec<Order> {
        self.archive.get_active().await
    }

    pub async fn get_order_history(&self) -> Vec<Order> {
        self.archive.get_history().await
    }

    /// Moves an active order to the history.
    pub async fn delete_order(&self, order_id: &str) -> bool {
        self.archive.move_to_history(order_id).await
    }

    pub async fn clear_history(&self) -> bool {
        self.archive.clear_history().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use comanda_core::PriceType;
    use comanda_store::{MemoryCatalog, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    type TestSession = OrderSession<Arc<MemoryStore>, MemoryCatalog>;

    fn session() -> (Arc<MemoryStore>, TestSession) {
        let store = Arc::new(MemoryStore::new());
        let session = OrderSession::new(store.clone(), MemoryCatalog::new());
        (store, session)
    }

    fn product(name: &str, cents: i64, price_type: PriceType, category: &str) -> Product {
        Product::new(name, Money::from_cents(cents), price_type, category)
    }

    fn item(name: &str, cents: i64) -> NewLineItem {
        NewLineItem {
            name: name.to_string(),
            price: Money::from_cents(cents),
            category: "cervezas".to_string(),
            customizations: vec![],
        }
    }

    #[test]
    fn test_direct_product_is_added_without_customizations() {
        let (_, mut session) = session();
        session.start_order();

        let selection = session
            .select_product(product("CORONA", 5500, PriceType::Simple, "cervezas"), "")
            .unwrap();

        let Selection::Added(line) = selection else {
            panic!("expected direct add, got {:?}", selection);
        };
        assert_eq!(line.name, "CORONA");
        assert!(line.customizations.is_empty());
        assert_eq!(session.items().len(), 1);
        assert!(session.current_product().is_none());
    }

    #[test]
    fn test_direct_liquor_gets_prefix() {
        let (_, mut session) = session();
        session.start_order();

        let selection = session
            .select_product(product("HIPNOTIQ 750 ML", 90000, PriceType::Bottle, "licores"), "")
            .unwrap();
        let Selection::Added(line) = selection else {
            panic!("expected direct add");
        };
        assert_eq!(line.name, "Botella HIPNOTIQ");
    }

    #[test]
    fn test_add_outside_order_mode_is_rejected() {
        let (_, mut session) = session();
        assert!(matches!(
            session.add_to_order(item("CORONA", 5500)),
            Err(RegisterError::NotInOrderMode)
        ));
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_special_drink_flow() {
        let (_, mut session) = session();
        session.start_order();

        let selection = session
            .select_product(product("BACARDI MANGO", 78000, PriceType::Bottle, "ron"), "")
            .unwrap();
        let Selection::Customize { flow, options } = selection else {
            panic!("expected customization");
        };
        assert_eq!(flow, Flow::Drinks);
        assert_eq!(
            options.unwrap().options,
            vec!["Sprite", "Mineral", "Jugo de Piña"]
        );

        assert_eq!(session.increment_option("Jugo de Piña"), Some(1));
        assert_eq!(session.increment_option("Jugo de Piña"), Some(2));
        // Two pitchers exclude any soda
        assert_eq!(session.increment_option("Sprite"), None);
        assert_eq!(session.decrement_option("Jugo de Piña"), Some(1));
        assert_eq!(session.increment_option("Sprite"), Some(1));

        let confirmed = session.confirm_customization().unwrap();
        let line = session.add_to_order(confirmed).unwrap();
        assert_eq!(line.name, "Botella BACARDI MANGO");
        assert_eq!(line.customizations, vec!["1x Jugo de Piña", "1x Sprite"]);
        assert!(session.current_product().is_none());
    }

    #[test]
    fn test_cup_chooses_single_option() {
        let (_, mut session) = session();
        session.start_order();
        session
            .select_product(product("DON JULIO 70", 18000, PriceType::Cup, "tequila"), "")
            .unwrap();

        let offered = session.offered_options().to_vec();
        assert!(!offered.is_empty());
        assert_eq!(session.increment_option(&offered[0]), None);
        assert!(session.choose_option(&offered[0]));

        let confirmed = session.confirm_customization().unwrap();
        assert_eq!(confirmed.name, "Copa DON JULIO 70");
        assert_eq!(confirmed.customizations, vec![offered[0].clone()]);
    }

    #[test]
    fn test_food_flow() {
        let (_, mut session) = session();
        session.start_order();
        session
            .select_product(product("PIZZA HAWAIANA", 18000, PriceType::Simple, "pizzas"), "")
            .unwrap();

        // Wrong confirm for the flow
        assert!(matches!(
            session.confirm_customization(),
            Err(RegisterError::Core(CoreError::FlowMismatch { .. }))
        ));

        let confirmed = session.confirm_food(Some("piña")).unwrap();
        assert_eq!(confirmed.customizations, vec!["Sin: piña"]);
    }

    #[test]
    fn test_meat_requires_cooking_term() {
        let (_, mut session) = session();
        session.start_order();
        session
            .select_product(product("RIB EYE", 42000, PriceType::Simple, "Carnes"), "")
            .unwrap();

        assert!(matches!(
            session.confirm_garnish(None),
            Err(RegisterError::Core(CoreError::MissingCookingTerm { .. }))
        ));
        // Selection survives the failed confirm
        assert!(session.current_product().is_some());

        session.set_cooking_term(CookingTerm::TresCuartos).unwrap();
        let confirmed = session.confirm_garnish(Some("puré")).unwrap();
        assert_eq!(confirmed.customizations, vec!["Término ¾", "Guarnición: puré"]);
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_main_course_needs_no_cooking_term() {
        let (_, mut session) = session();
        session.start_order();
        let selection = session
            .select_product(
                product("FILETE A LA PIMIENTA", 39000, PriceType::Simple, "platos fuertes"),
                "",
            )
            .unwrap();
        assert!(matches!(
            selection,
            Selection::Customize { flow: Flow::MainCourse, .. }
        ));

        // Cooking terms belong to meat only
        assert!(matches!(
            session.set_cooking_term(CookingTerm::Medio),
            Err(RegisterError::Core(CoreError::FlowMismatch { .. }))
        ));

        let confirmed = session.confirm_garnish(None).unwrap();
        assert_eq!(confirmed.name, "FILETE A LA PIMIENTA");
        assert_eq!(confirmed.customizations, vec!["Guarnición estándar"]);
        let line = session.add_to_order(confirmed).unwrap();
        assert_eq!(session.items(), vec![line]);
    }

    #[test]
    fn test_selection_outside_order_mode_is_rejected() {
        let (_, mut session) = session();
        assert!(matches!(
            session.select_product(product("ABSOLUT AZUL", 85000, PriceType::Bottle, "vodka"), ""),
            Err(RegisterError::NotInOrderMode)
        ));
        assert!(session.current_product().is_none());

        session.start_order();
        assert!(session
            .select_product(product("ABSOLUT AZUL", 85000, PriceType::Bottle, "vodka"), "")
            .is_ok());
    }

    #[test]
    fn test_drink_without_mixers_is_noted() {
        let (_, mut session) = session();
        session.start_order();
        session
            .select_product(product("DON JULIO 70", 165000, PriceType::Bottle, "tequila"), "")
            .unwrap();

        let confirmed = session.confirm_customization().unwrap();
        assert_eq!(confirmed.name, "Botella DON JULIO 70");
        assert_eq!(confirmed.customizations, vec!["Sin acompañamientos"]);
    }

    #[test]
    fn test_cancel_customization_keeps_ledger() {
        let (_, mut session) = session();
        session.start_order();
        session.add_to_order(item("CORONA", 5500)).unwrap();
        session
            .select_product(product("ABSOLUT AZUL", 85000, PriceType::Bottle, "vodka"), "")
            .unwrap();
        session.increment_option("Sprite");

        session.cancel_customization();

        assert!(session.current_product().is_none());
        assert_eq!(session.increment_option("Sprite"), None);
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_drink_options_without_product() {
        let (_, session) = session();
        let options = session.get_drink_options("");
        assert_eq!(options.options, vec!["Ninguno"]);
    }

    #[tokio::test]
    async fn test_complete_order_total_and_position() {
        let (_, mut session) = session();
        session.start_order();
        session.add_to_order(item("ABSOLUT", 10000)).unwrap();
        session.add_to_order(item("CORONA", 5550)).unwrap();

        let order = session.complete_order().await.unwrap();
        assert_eq!(order.total, Money::from_cents(15550));
        assert!(order.id.starts_with("order_"));
        assert!(order.completed_at.is_some());

        let active = session.get_active_orders().await;
        assert_eq!(active[0].id, order.id);
        assert_eq!(active[0].total.to_decimal(), 155.5);

        assert!(session.items().is_empty());
        assert!(!session.is_ordering());
    }

    #[tokio::test]
    async fn test_empty_order_cannot_complete() {
        let (_, mut session) = session();
        session.start_order();
        assert!(matches!(
            session.complete_order().await,
            Err(RegisterError::EmptyOrder)
        ));
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_cart() {
        let (store, mut session) = session();
        session.start_order();
        session.add_to_order(item("CORONA", 5500)).unwrap();

        store.set_fail_writes(true);
        assert!(matches!(
            session.complete_order().await,
            Err(RegisterError::PersistenceFailed { .. })
        ));
        assert_eq!(session.items().len(), 1);
        assert!(session.is_ordering());

        store.set_fail_writes(false);
        assert!(session.complete_order().await.is_ok());
        assert_eq!(session.get_active_orders().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_clear_history() {
        let (_, mut session) = session();
        session.start_order();
        session.add_to_order(item("CORONA", 5500)).unwrap();
        let order = session.complete_order().await.unwrap();

        assert!(session.delete_order(&order.id).await);
        assert!(!session.delete_order(&order.id).await);
        assert!(session.get_active_orders().await.is_empty());
        assert_eq!(session.get_order_history().await.len(), 1);

        assert!(session.clear_history().await);
        assert!(session.get_order_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let (_, mut session) = session();
        session.start_order();
        session.add_to_order(item("CORONA", 5500)).unwrap();

        session.cancel_order();

        assert!(session.items().is_empty());
        assert!(!session.is_ordering());
        assert!(session.get_active_orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_menu_flattens_offers() {
        let catalog = MemoryCatalog::new();
        catalog
            .insert(
                "vodka",
                vec![json!({"nombre": "ABSOLUT AZUL", "precioBotella": 850, "precioCopa": 95})],
            )
            .await;
        let session = OrderSession::new(Arc::new(MemoryStore::new()), catalog);

        let menu = session.menu("vodka").await.unwrap();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].price_type, PriceType::Bottle);
        assert_eq!(menu[1].price_type, PriceType::Cup);

        let family = session.liquor_menu(LiquorFamily::Vodka).await.unwrap();
        assert_eq!(family, menu);
    }
}
