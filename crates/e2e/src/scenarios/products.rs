//! Storefront search

use async_trait::async_trait;
use storefront_common::{DataFactory, ProductOverrides, UserOverrides};

use crate::error::{ensure, E2eResult};
use crate::pages::HomePage;
use crate::scenario::{Scenario, ScenarioCase};
use crate::steps::UiFlow;

pub struct SearchFindsProducts;

#[async_trait]
impl ScenarioCase for SearchFindsProducts {
    fn name(&self) -> &'static str {
        "search_finds_products"
    }

    fn description(&self) -> &'static str {
        "Searching a unique product name shows exactly that product, as the API does"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["products"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let admin = s.create_admin(UserOverrides::default()).await?;
        let name = format!("UniqueSearchTest_{}", DataFactory::unique_id());
        let product = s
            .create_product(
                admin.token()?,
                ProductOverrides {
                    name: Some(name.clone()),
                    ..Default::default()
                },
            )
            .await?;

        let flow = UiFlow::new()
            .then(HomePage::open())
            .then_all(HomePage::search(&name))
            .then(HomePage::wait_product_count(1))
            .then(HomePage::wait_product_visible("visible", &product.id))
            .then(HomePage::product_count("ui_count"));
        let ui = s.run_ui(&flow).await?;

        let found = s.products.search(&name).await?;
        let ui_count = ui.count("ui_count");

        ensure(
            found.len() == 1,
            format!("API should return exactly 1 product for {:?}, got {}", name, found.len()),
        )?;
        ensure(
            found.iter().any(|p| p.id == product.id),
            format!("API search should return product {}", product.id),
        )?;
        ensure(
            ui_count == 1,
            format!("UI should show exactly 1 product, shows {}", ui_count),
        )?;
        ensure(ui.flag("visible"), "created product should be among the search results")
    }
}

pub struct SearchNoResults;

#[async_trait]
impl ScenarioCase for SearchNoResults {
    fn name(&self) -> &'static str {
        "search_no_results"
    }

    fn description(&self) -> &'static str {
        "Searching a name nothing matches leaves the product grid empty"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["products"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let term = format!("NonExistentProduct_{}", DataFactory::unique_id());
        let needle = term.to_lowercase();
        let already_matching = s
            .products
            .all()
            .await?
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .count();

        let flow = UiFlow::new()
            .then(HomePage::open())
            .then_all(HomePage::search(&term))
            .then(HomePage::wait_product_count(0))
            .then(HomePage::product_count("ui_count"));
        let ui = s.run_ui(&flow).await?;

        let found = s.products.search(&term).await?;
        let ui_count = ui.count("ui_count");

        ensure(already_matching == 0, "search term should not match any existing product")?;
        ensure(
            found.is_empty(),
            format!("API should return no products, got {}", found.len()),
        )?;
        ensure(
            ui_count == 0,
            format!("UI should show no products, shows {}", ui_count),
        )
    }
}
