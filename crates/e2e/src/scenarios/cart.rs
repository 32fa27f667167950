//! Cart and checkout

use async_trait::async_trait;
use storefront_common::UserOverrides;

use crate::error::{ensure, E2eError, E2eResult};
use crate::pages::{CartPage, HomePage, OrdersPage};
use crate::scenario::{Scenario, ScenarioCase};

pub struct AddProductToCart;

#[async_trait]
impl ScenarioCase for AddProductToCart {
    fn name(&self) -> &'static str {
        "add_product_to_cart"
    }

    fn description(&self) -> &'static str {
        "Adding a product from its modal bumps the badge and lands in the API cart"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["cart", "smoke"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        s.cart.clear(&token).await;
        let product = s.random_product(1).await?;

        let flow = Scenario::login_flow(&account)
            .then(HomePage::cart_count("initial_count"))
            .then(HomePage::open_product(&product.id))
            .then(HomePage::product_modal_visible("modal"))
            .then(HomePage::add_to_cart())
            .then(HomePage::wait_cart_count(1))
            .then(HomePage::cart_count("new_count"));
        let ui = s.run_ui(&flow).await?;

        s.cart.wait_for_items_count(1, &token).await;
        let cart = s.cart.get(&token).await?;

        let initial = ui.int("initial_count").unwrap_or(0);
        let current = ui.int("new_count").unwrap_or(0);
        ensure(ui.flag("modal"), "product modal should open")?;
        ensure(
            current > initial,
            format!("cart badge should increase, was {} now {}", initial, current),
        )?;
        ensure(cart.contains(&product.id), "product should be in the API cart")
    }
}

pub struct IncreaseCartQuantity;

#[async_trait]
impl ScenarioCase for IncreaseCartQuantity {
    fn name(&self) -> &'static str {
        "increase_cart_quantity"
    }

    fn description(&self) -> &'static str {
        "The cart's increase button adds one unit in the UI and in the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["cart"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        s.cart.clear(&token).await;

        let product = s.random_product(2).await?;
        s.cart.add(&product.id, 1, &token).await?;
        let initial = s
            .cart
            .item_quantity(&product.id, &token)
            .await?
            .ok_or_else(|| E2eError::AssertionFailed("API cart lost the product".to_string()))?;
        let expected = initial + 1;

        let flow = Scenario::login_flow(&account)
            .then_all(CartPage::open_via_ui())
            .then(CartPage::item_quantity("initial", &product.id))
            .then(CartPage::increase(&product.id))
            .then(CartPage::wait_item_quantity(&product.id, expected))
            .then(CartPage::item_quantity("after", &product.id));
        let ui = s.run_ui(&flow).await?;

        let api_quantity = s
            .cart
            .wait_for_item_quantity(&product.id, expected, &token)
            .await;

        ensure(
            ui.int("initial") == Some(i64::from(initial)),
            format!("UI should show {} unit(s) before the click", initial),
        )?;
        ensure(
            ui.int("after") == Some(i64::from(expected)),
            format!("UI quantity should be {}, got {:?}", expected, ui.text("after")),
        )?;
        ensure(
            api_quantity == expected,
            format!("API quantity should be {}, got {}", expected, api_quantity),
        )
    }
}

pub struct CheckoutCreatesOrder;

#[async_trait]
impl ScenarioCase for CheckoutCreatesOrder {
    fn name(&self) -> &'static str {
        "checkout_creates_order"
    }

    fn description(&self) -> &'static str {
        "Checking out creates an order listed both on the orders page and by the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["cart", "orders", "e2e"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        s.cart.clear(&token).await;

        let product = s.random_product(1).await?;
        s.cart.add(&product.id, 1, &token).await?;
        let before = s.orders.count(&token).await?;

        let flow = Scenario::login_flow(&account)
            .then_all(CartPage::open_via_ui())
            .then_all(CartPage::checkout())
            .then_all(OrdersPage::open_via_ui())
            .then(OrdersPage::wait_loaded())
            .then(OrdersPage::order_count("ui_orders"));
        let ui = s.run_ui(&flow).await;

        // The account is fresh, so every order it has came from this run
        let orders = s.orders.mine(&token).await?;
        for order in &orders {
            s.cleanup.register_order(order.id.as_str());
        }
        let ui = ui?;

        let ui_orders = ui.count("ui_orders");
        ensure(
            ui_orders > before,
            format!("a new order should be listed, had {} now {}", before, ui_orders),
        )?;
        ensure(
            orders.len() == ui_orders,
            format!(
                "UI and API should agree on the order count, UI {} API {}",
                ui_orders,
                orders.len()
            ),
        )
    }
}

pub struct DecreaseCartQuantity;

#[async_trait]
impl ScenarioCase for DecreaseCartQuantity {
    fn name(&self) -> &'static str {
        "decrease_cart_quantity"
    }

    fn description(&self) -> &'static str {
        "The cart's decrease button removes one unit in the UI and in the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["cart"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        s.cart.clear(&token).await;

        let product = s.random_product(2).await?;
        s.cart.add(&product.id, 2, &token).await?;

        let flow = Scenario::login_flow(&account)
            .then_all(CartPage::open_via_ui())
            .then(CartPage::item_quantity("initial", &product.id))
            .then(CartPage::decrease(&product.id))
            .then(CartPage::wait_item_quantity(&product.id, 1))
            .then(CartPage::item_quantity("after", &product.id));
        let ui = s.run_ui(&flow).await?;

        let initial = ui
            .int("initial")
            .ok_or_else(|| E2eError::AssertionFailed("UI showed no quantity".to_string()))?;
        let expected = initial - 1;
        let api_quantity = s
            .cart
            .wait_for_item_quantity(&product.id, u32::try_from(expected).unwrap_or(0), &token)
            .await;

        ensure(
            ui.int("after") == Some(expected),
            format!(
                "UI quantity should drop from {} to {}, got {:?}",
                initial,
                expected,
                ui.text("after")
            ),
        )?;
        ensure(
            i64::from(api_quantity) == expected,
            format!("API quantity should be {}, got {}", expected, api_quantity),
        )
    }
}

pub struct RemoveCartItem;

#[async_trait]
impl ScenarioCase for RemoveCartItem {
    fn name(&self) -> &'static str {
        "remove_cart_item"
    }

    fn description(&self) -> &'static str {
        "Removing the only item empties the cart in the UI and in the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["cart"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        s.cart.clear(&token).await;

        let product = s.random_product(1).await?;
        s.cart.add(&product.id, 1, &token).await?;

        let flow = Scenario::login_flow(&account)
            .then_all(CartPage::open_via_ui())
            .then(CartPage::item_visible("listed", &product.id))
            .then(CartPage::remove(&product.id))
            .then(CartPage::wait_empty("empty"));
        let ui = s.run_ui(&flow).await?;

        let remaining = s.cart.wait_for_items_count(0, &token).await;

        ensure(ui.flag("listed"), "item should be in the cart before removal")?;
        ensure(ui.flag("empty"), "cart should show as empty after removing the item")?;
        ensure(
            remaining == 0,
            format!("API cart should be empty, has {} item(s)", remaining),
        )
    }
}

pub struct ClearCart;

#[async_trait]
impl ScenarioCase for ClearCart {
    fn name(&self) -> &'static str {
        "clear_cart"
    }

    fn description(&self) -> &'static str {
        "The clear button empties a cart holding two products"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["cart"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        s.cart.clear(&token).await;

        let first = s.random_product(1).await?;
        s.cart.add(&first.id, 1, &token).await?;
        let mut second = s.random_product(1).await?;
        for _ in 0..10 {
            if second.id != first.id {
                break;
            }
            second = s.random_product(1).await?;
        }
        s.cart.add(&second.id, 1, &token).await?;
        let before = s.cart.items_count(&token).await?;

        let flow = Scenario::login_flow(&account)
            .then_all(CartPage::open_via_ui())
            .then(CartPage::item_visible("had_items", &first.id))
            .then(CartPage::clear())
            .then(CartPage::wait_empty("empty"));
        let ui = s.run_ui(&flow).await?;

        let remaining = s.cart.wait_for_items_count(0, &token).await;

        ensure(
            before == 2,
            format!("cart should hold 2 items before clearing, had {}", before),
        )?;
        ensure(ui.flag("had_items"), "cart should list items before clearing")?;
        ensure(ui.flag("empty"), "cart should show as empty after clearing")?;
        ensure(
            remaining == 0,
            format!("API cart should be empty, has {} item(s)", remaining),
        )
    }
}
