//! Admin panel

use async_trait::async_trait;
use storefront_common::{DataFactory, OrderStatus, ProductOverrides, ResourceKind, UserOverrides};

use crate::error::{ensure, E2eError, E2eResult};
use crate::pages::{AdminOrdersPage, AdminProductsPage, AdminUsersPage};
use crate::scenario::{Scenario, ScenarioCase};
use crate::steps::UiStep;

pub struct AdminDeleteProduct;

#[async_trait]
impl ScenarioCase for AdminDeleteProduct {
    fn name(&self) -> &'static str {
        "admin_delete_product"
    }

    fn description(&self) -> &'static str {
        "Deleting a product in the admin panel removes it from the list and the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();
        let product = s.create_product(&token, ProductOverrides::default()).await?;

        let flow = Scenario::login_flow(&admin)
            .then(AdminProductsPage::open())
            .then(AdminProductsPage::product_visible("before", &product.id))
            .then_all(AdminProductsPage::delete(&product.id))
            .then(UiStep::sleep(500))
            .then(UiStep::Reload)
            .then(AdminProductsPage::product_visible("after", &product.id));
        let ui = s.run_ui(&flow).await?;

        let still_listed = s
            .admin
            .products(&token)
            .await?
            .iter()
            .any(|p| p.id == product.id);
        if !still_listed {
            s.cleanup.forget(ResourceKind::Product, &product.id);
        }

        ensure(ui.flag("before"), "product should be listed before deletion")?;
        ensure(!ui.flag("after"), "product should not be listed after deletion")?;
        ensure(!still_listed, "API should no longer return the product")
    }
}

pub struct AdminChangeOrderStatus;

#[async_trait]
impl ScenarioCase for AdminChangeOrderStatus {
    fn name(&self) -> &'static str {
        "admin_change_order_status"
    }

    fn description(&self) -> &'static str {
        "Advancing a pending order in the admin panel marks it processing in the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "orders"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();

        let customer = s.create_user(UserOverrides::default()).await?;
        let order_id = s.create_order(customer.token()?, None).await?;

        let flow = Scenario::login_flow(&admin)
            .then(AdminOrdersPage::open())
            .then(AdminOrdersPage::order_visible("visible", &order_id))
            .then_all(AdminOrdersPage::advance_status(&order_id))
            .then(UiStep::sleep(500))
            .then(UiStep::Reload)
            .then(AdminOrdersPage::order_status("status", &order_id));
        let ui = s.run_ui(&flow).await?;

        let order = s
            .admin
            .order(&order_id, &token)
            .await?
            .ok_or_else(|| E2eError::AssertionFailed(format!("order {} vanished", order_id)))?;
        let displayed = ui.text("status").unwrap_or_default().to_lowercase();

        ensure(ui.flag("visible"), "order should be listed in the admin panel")?;
        ensure(
            order.has_status(OrderStatus::Processing),
            format!("API status should be processing, got {}", order.status),
        )?;
        ensure(
            displayed.contains(OrderStatus::Processing.as_str()),
            format!("UI should show processing, shows {:?}", displayed),
        )
    }
}

pub struct AdminCreateProduct;

#[async_trait]
impl ScenarioCase for AdminCreateProduct {
    fn name(&self) -> &'static str {
        "admin_create_product"
    }

    fn description(&self) -> &'static str {
        "A product created through the admin form is listed and returned by the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "smoke"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();
        let product = DataFactory::product(ProductOverrides {
            name: Some(format!("AdminCreated_{}", DataFactory::unique_id())),
            description: Some("Test product created by admin UI test".to_string()),
            price: Some(49.99),
            stock: Some(50),
            category: Some("Test Category".to_string()),
            ..Default::default()
        });
        let existed = s
            .admin
            .products(&token)
            .await?
            .iter()
            .any(|p| p.name == product.name);

        let flow = Scenario::login_flow(&admin)
            .then(AdminProductsPage::open())
            .then_all(AdminProductsPage::create(&product))
            .then(AdminProductsPage::open())
            .then_all(AdminProductsPage::search(&product.name))
            .then(AdminProductsPage::product_count("ui_count"));
        let ui = s.run_ui(&flow).await;

        // Register before asserting so a half-finished run still cleans up
        let created = s
            .admin
            .products(&token)
            .await?
            .into_iter()
            .find(|p| p.name == product.name);
        if let Some(created) = &created {
            s.cleanup.register_product(created.id.as_str());
        }
        let ui = ui?;

        ensure(!existed, "product name should be unused before creation")?;
        ensure(
            ui.count("ui_count") > 0,
            "created product should appear in the admin list",
        )?;
        ensure(created.is_some(), "API should return the created product")
    }
}

pub struct AdminEditProduct;

#[async_trait]
impl ScenarioCase for AdminEditProduct {
    fn name(&self) -> &'static str {
        "admin_edit_product"
    }

    fn description(&self) -> &'static str {
        "Renaming and repricing a product in the admin form updates it in the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();
        let product = s.create_product(&token, ProductOverrides::default()).await?;

        let changes = DataFactory::product(ProductOverrides {
            name: Some(format!("Updated_{}", DataFactory::unique_id())),
            description: Some("Updated description".to_string()),
            price: Some(199.99),
            stock: Some(50),
            category: Some(product.category.clone()),
            ..Default::default()
        });

        let flow = Scenario::login_flow(&admin)
            .then(AdminProductsPage::open())
            .then_all(AdminProductsPage::update(&product.id, &changes))
            .then(AdminProductsPage::open())
            .then_all(AdminProductsPage::search(&changes.name))
            .then(AdminProductsPage::product_visible("visible", &product.id));
        let ui = s.run_ui(&flow).await?;

        let updated = s
            .admin
            .products(&token)
            .await?
            .into_iter()
            .find(|p| p.id == product.id)
            .ok_or_else(|| {
                E2eError::AssertionFailed(format!("product {} vanished", product.id))
            })?;

        ensure(
            ui.flag("visible"),
            format!("product should be found under its new name {:?}", changes.name),
        )?;
        ensure(
            updated.name == changes.name,
            format!("name should be {:?}, API has {:?}", changes.name, updated.name),
        )?;
        ensure(
            (updated.price - changes.price).abs() < 0.005,
            format!("price should be {}, API has {}", changes.price, updated.price),
        )
    }
}

pub struct AdminDeleteOrder;

#[async_trait]
impl ScenarioCase for AdminDeleteOrder {
    fn name(&self) -> &'static str {
        "admin_delete_order"
    }

    fn description(&self) -> &'static str {
        "Deleting an order in the admin panel removes it from the list and the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "orders"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();

        let customer = s.create_user(UserOverrides::default()).await?;
        let order_id = s.create_order(customer.token()?, None).await?;

        let flow = Scenario::login_flow(&admin)
            .then(AdminOrdersPage::open())
            .then(AdminOrdersPage::order_visible("before", &order_id))
            .then_all(AdminOrdersPage::delete(&order_id))
            .then(UiStep::sleep(500))
            .then(UiStep::Reload)
            .then(AdminOrdersPage::order_visible("after", &order_id));
        let ui = s.run_ui(&flow).await?;

        let still_listed = s.admin.order(&order_id, &token).await?.is_some();
        if !still_listed {
            s.cleanup.forget(ResourceKind::Order, &order_id);
        }

        ensure(ui.flag("before"), "order should be listed before deletion")?;
        ensure(!ui.flag("after"), "order should not be listed after deletion")?;
        ensure(!still_listed, "API should no longer return the order")
    }
}

pub struct AdminDeleteUser;

#[async_trait]
impl ScenarioCase for AdminDeleteUser {
    fn name(&self) -> &'static str {
        "admin_delete_user"
    }

    fn description(&self) -> &'static str {
        "Deleting a user in the admin panel removes the account from the API"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();
        let user = s.create_user(UserOverrides::default()).await?;
        let user_id = user.user_id()?.to_string();

        let flow = Scenario::login_flow(&admin)
            .then(AdminUsersPage::open())
            .then_all(AdminUsersPage::search(&user.email))
            .then(AdminUsersPage::user_visible("before", &user_id))
            .then_all(AdminUsersPage::delete(&user_id))
            .then(UiStep::sleep(500))
            .then(UiStep::Reload)
            .then_all(AdminUsersPage::search(&user.email))
            .then(AdminUsersPage::user_visible("after", &user_id));
        let ui = s.run_ui(&flow).await?;

        let still_listed = s
            .admin
            .users(&token)
            .await?
            .iter()
            .any(|u| u.id == user_id);
        if !still_listed {
            s.cleanup.forget(ResourceKind::User, &user_id);
        }

        ensure(ui.flag("before"), "user should be listed before deletion")?;
        ensure(!ui.flag("after"), "user should not be listed after deletion")?;
        ensure(!still_listed, "API should no longer return the user")
    }
}

pub struct AdminEditUser;

#[async_trait]
impl ScenarioCase for AdminEditUser {
    fn name(&self) -> &'static str {
        "admin_edit_user"
    }

    fn description(&self) -> &'static str {
        "Renaming a user in the admin panel is reflected in the user's details"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();
        let user = s.create_user(UserOverrides::default()).await?;
        let user_id = user.user_id()?.to_string();
        let new_name = format!("Updated_{}", DataFactory::unique_id());

        let flow = Scenario::login_flow(&admin)
            .then(AdminUsersPage::open())
            .then_all(AdminUsersPage::search(&user.email))
            .then_all(AdminUsersPage::rename(&user_id, &new_name));
        s.run_ui(&flow).await?;

        let details = s.admin.user_details(&user_id, &token).await?;
        ensure(
            details.name == new_name,
            format!("name should be {:?}, API has {:?}", new_name, details.name),
        )
    }
}

pub struct AdminViewUser;

#[async_trait]
impl ScenarioCase for AdminViewUser {
    fn name(&self) -> &'static str {
        "admin_view_user"
    }

    fn description(&self) -> &'static str {
        "The admin user modal shows the name, email, id and role the API holds"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let token = admin.token()?.to_string();
        let user = s.create_user(UserOverrides::default()).await?;
        let user_id = user.user_id()?.to_string();
        let api_user = s.admin.user_details(&user_id, &token).await?;

        let flow = Scenario::login_flow(&admin)
            .then(AdminUsersPage::open())
            .then_all(AdminUsersPage::search(&user.email))
            .then(AdminUsersPage::view(&user_id))
            .then(AdminUsersPage::modal_visible("modal"))
            .then(AdminUsersPage::modal_name("name"))
            .then(AdminUsersPage::modal_email("email"))
            .then(AdminUsersPage::modal_id("id"))
            .then(AdminUsersPage::modal_role("role"))
            .then(AdminUsersPage::close_modal());
        let ui = s.run_ui(&flow).await?;

        let shown = |name: &str| ui.text(name).unwrap_or_default().to_string();
        let role = if api_user.role.is_empty() {
            "user".to_string()
        } else {
            api_user.role.to_lowercase()
        };

        ensure(ui.flag("modal"), "user modal should open")?;
        ensure(
            shown("name").contains(&api_user.name),
            format!("modal should show name {:?}, shows {:?}", api_user.name, shown("name")),
        )?;
        ensure(
            shown("email") == api_user.email,
            format!("modal should show email {:?}, shows {:?}", api_user.email, shown("email")),
        )?;
        ensure(
            shown("id").contains(&user_id),
            format!("modal should show id {}, shows {:?}", user_id, shown("id")),
        )?;
        ensure(
            shown("role").to_lowercase().contains(&role),
            format!("modal should show role {}, shows {:?}", role, shown("role")),
        )
    }
}
