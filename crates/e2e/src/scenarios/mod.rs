//! Scenario catalog
//!
//! Every scenario drives the UI and then confirms the outcome through the
//! API, so a passing run means both channels agree.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod profile;

use crate::error::{E2eError, E2eResult};
use crate::scenario::ScenarioCase;

/// All scenarios, in run order
pub fn catalog() -> Vec<Box<dyn ScenarioCase>> {
    vec![
        Box::new(auth::RegisterNewUser),
        Box::new(auth::LoginValidCredentials),
        Box::new(auth::LoginInvalidPassword),
        Box::new(auth::RegisterExistingEmail),
        Box::new(products::SearchFindsProducts),
        Box::new(products::SearchNoResults),
        Box::new(cart::AddProductToCart),
        Box::new(cart::IncreaseCartQuantity),
        Box::new(cart::DecreaseCartQuantity),
        Box::new(cart::RemoveCartItem),
        Box::new(cart::ClearCart),
        Box::new(cart::CheckoutCreatesOrder),
        Box::new(orders::ViewOrdersList),
        Box::new(orders::ViewOrderDetails),
        Box::new(profile::UpdateProfile),
        Box::new(admin::AdminCreateProduct),
        Box::new(admin::AdminEditProduct),
        Box::new(admin::AdminDeleteProduct),
        Box::new(admin::AdminChangeOrderStatus),
        Box::new(admin::AdminDeleteOrder),
        Box::new(admin::AdminDeleteUser),
        Box::new(admin::AdminEditUser),
        Box::new(admin::AdminViewUser),
    ]
}

pub fn find(name: &str) -> E2eResult<Box<dyn ScenarioCase>> {
    catalog()
        .into_iter()
        .find(|case| case.name() == name)
        .ok_or_else(|| E2eError::ScenarioNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_unique() {
        let cases = catalog();
        let names: HashSet<&str> = cases.iter().map(|case| case.name()).collect();
        assert_eq!(names.len(), cases.len());
    }

    #[test]
    fn test_every_scenario_is_tagged() {
        for case in catalog() {
            assert!(!case.tags().is_empty(), "{} has no tags", case.name());
            assert!(!case.description().is_empty(), "{} has no description", case.name());
        }
    }

    #[test]
    fn test_find_unknown_scenario() {
        assert!(find("login_valid_credentials").is_ok());
        assert!(matches!(
            find("does_not_exist"),
            Err(E2eError::ScenarioNotFound(_))
        ));
    }
}
