//! Customer order history

use async_trait::async_trait;
use storefront_common::UserOverrides;

use crate::error::{ensure, E2eResult};
use crate::pages::OrdersPage;
use crate::scenario::{Scenario, ScenarioCase};

pub struct ViewOrdersList;

#[async_trait]
impl ScenarioCase for ViewOrdersList {
    fn name(&self) -> &'static str {
        "view_orders_list"
    }

    fn description(&self) -> &'static str {
        "An order placed through the API is the one card on the user's orders page"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["orders"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        let order_id = s.create_order(&token, None).await?;
        let mine = s.orders.mine(&token).await?;

        let flow = Scenario::login_flow(&account)
            .then_all(OrdersPage::open_via_ui())
            .then(OrdersPage::wait_loaded())
            .then(OrdersPage::on_orders_page("on_orders"))
            .then(OrdersPage::order_visible("visible", &order_id))
            .then(OrdersPage::order_count("ui_orders"));
        let ui = s.run_ui(&flow).await?;

        let ui_orders = ui.count("ui_orders");
        ensure(
            mine.iter().any(|order| order.id == order_id),
            format!("API should list order {} for its owner", order_id),
        )?;
        ensure(ui.flag("on_orders"), "should land on the orders page")?;
        ensure(ui.flag("visible"), "the new order should be listed")?;
        ensure(
            ui_orders == 1,
            format!("a fresh account should show 1 order, shows {}", ui_orders),
        )
    }
}

pub struct ViewOrderDetails;

#[async_trait]
impl ScenarioCase for ViewOrderDetails {
    fn name(&self) -> &'static str {
        "view_order_details"
    }

    fn description(&self) -> &'static str {
        "The order card shows the status the API reports"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["orders"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let token = account.token()?.to_string();
        let order_id = s.create_order(&token, None).await?;

        let order = s.orders.get(&order_id, &token).await?;
        let api_status = if order.status.is_empty() {
            "pending".to_string()
        } else {
            order.status.to_lowercase()
        };

        let flow = Scenario::login_flow(&account)
            .then_all(OrdersPage::open_via_ui())
            .then(OrdersPage::wait_loaded())
            .then(OrdersPage::order_status("status", &order_id));
        let ui = s.run_ui(&flow).await?;

        let displayed = ui.text("status").unwrap_or_default().to_lowercase();
        ensure(
            displayed.contains(&api_status),
            format!("UI should show status {}, shows {:?}", api_status, displayed),
        )
    }
}
