//! Page objects
//!
//! Each page knows its route and the `data-testid`s of its elements and
//! turns intentions ("log in", "increase quantity") into [`UiStep`]s.
//! Pages hold no state; a flow is assembled from their steps.

use storefront_common::{NewProduct, Urls};

use crate::steps::{testid, UiStep};

/// Short timeout for elements expected to already be rendered
const QUICK_MS: u64 = 3_000;

/// Timeout for elements that appear after a round trip to the API
const SLOW_MS: u64 = 10_000;

pub struct LoginPage;

impl LoginPage {
    pub const EMAIL_INPUT: &'static str = "email-input";
    pub const PASSWORD_INPUT: &'static str = "password-input";
    pub const SUBMIT_BTN: &'static str = "submit-btn";
    pub const ERROR_MESSAGE: &'static str = "error-message";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::LOGIN)
    }

    pub fn login(email: &str, password: &str) -> Vec<UiStep> {
        vec![
            UiStep::fill(Self::EMAIL_INPUT, email),
            UiStep::fill(Self::PASSWORD_INPUT, password),
            UiStep::click(Self::SUBMIT_BTN),
        ]
    }

    pub fn error_visible(name: &str) -> UiStep {
        UiStep::probe(name, Self::ERROR_MESSAGE, QUICK_MS)
    }
}

pub struct RegisterPage;

impl RegisterPage {
    pub const NAME_INPUT: &'static str = "name-input";
    pub const EMAIL_INPUT: &'static str = "email-input";
    pub const PASSWORD_INPUT: &'static str = "password-input";
    pub const CONFIRM_PASSWORD_INPUT: &'static str = "confirm-password-input";
    pub const ADMIN_CODE_INPUT: &'static str = "admin-code-input";
    pub const SUBMIT_BTN: &'static str = "submit-btn";
    pub const ERROR_MESSAGE: &'static str = "error-message";
    pub const SUCCESS_MODAL: &'static str = "success-modal";
    pub const MODAL_LOGIN_BTN: &'static str = "modal-login-btn";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::REGISTER)
    }

    pub fn register(name: &str, email: &str, password: &str) -> Vec<UiStep> {
        vec![
            UiStep::fill(Self::NAME_INPUT, name),
            UiStep::fill(Self::EMAIL_INPUT, email),
            UiStep::fill(Self::PASSWORD_INPUT, password),
            UiStep::fill(Self::CONFIRM_PASSWORD_INPUT, password),
            UiStep::click(Self::SUBMIT_BTN),
        ]
    }

    pub fn register_admin(name: &str, email: &str, password: &str, admin_code: &str) -> Vec<UiStep> {
        let mut steps = Self::register(name, email, password);
        steps.insert(4, UiStep::fill(Self::ADMIN_CODE_INPUT, admin_code));
        steps
    }

    pub fn success_modal_visible(name: &str) -> UiStep {
        UiStep::probe(name, Self::SUCCESS_MODAL, 5_000)
    }

    pub fn click_modal_login() -> UiStep {
        UiStep::click(Self::MODAL_LOGIN_BTN)
    }

    pub fn error_visible(name: &str) -> UiStep {
        UiStep::probe(name, Self::ERROR_MESSAGE, QUICK_MS)
    }
}

pub struct HomePage;

impl HomePage {
    pub const SEARCH_INPUT: &'static str = "search-input";
    pub const SEARCH_BTN: &'static str = "search-btn";
    pub const CART_LINK: &'static str = "cart-link";
    pub const CART_BADGE: &'static str = "cart-badge";
    pub const PRODUCT_MODAL: &'static str = "product-modal";
    pub const ADD_TO_CART_BTN: &'static str = "add-to-cart-btn";
    pub const PROFILE_BUTTON: &'static str = "profile-button";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::HOME)
    }

    pub fn open_user_home() -> UiStep {
        UiStep::navigate(Urls::USER_HOME)
    }

    /// The cart link only renders for signed-in users
    pub fn authenticated(name: &str) -> UiStep {
        UiStep::probe(name, Self::CART_LINK, QUICK_MS)
    }

    /// Badge text; absent (empty cart) reads as null
    pub fn cart_count(name: &str) -> UiStep {
        UiStep::ReadText {
            name: name.to_string(),
            selector: testid(Self::CART_BADGE),
            timeout_ms: Some(2_000),
        }
    }

    pub fn wait_cart_count(count: u32) -> UiStep {
        UiStep::wait_text(Self::CART_BADGE, count.to_string())
    }

    pub fn search(query: &str) -> Vec<UiStep> {
        vec![
            UiStep::fill(Self::SEARCH_INPUT, query),
            UiStep::click(Self::SEARCH_BTN),
        ]
    }

    pub fn product_count(name: &str) -> UiStep {
        UiStep::count(name, "product-card-")
    }

    /// Let the product grid settle on `count` cards after a search
    pub fn wait_product_count(count: usize) -> UiStep {
        UiStep::wait_count("product-card-", count, SLOW_MS)
    }

    pub fn product_visible(name: &str, product_id: &str) -> UiStep {
        UiStep::probe(name, &format!("product-card-{}", product_id), QUICK_MS)
    }

    pub fn wait_product_visible(name: &str, product_id: &str) -> UiStep {
        UiStep::probe(name, &format!("product-card-{}", product_id), SLOW_MS)
    }

    pub fn open_product(product_id: &str) -> UiStep {
        UiStep::click(&format!("view-product-btn-{}", product_id))
    }

    pub fn product_modal_visible(name: &str) -> UiStep {
        UiStep::probe(name, Self::PRODUCT_MODAL, 5_000)
    }

    pub fn add_to_cart() -> UiStep {
        UiStep::click(Self::ADD_TO_CART_BTN)
    }

    /// Open the account menu and follow one of its entries. Staying inside
    /// the SPA keeps the session in localStorage.
    pub fn open_dashboard_entry(entry: &str) -> Vec<UiStep> {
        vec![
            UiStep::WaitFor {
                selector: testid(Self::PROFILE_BUTTON),
                state: Default::default(),
                timeout_ms: Some(SLOW_MS),
            },
            UiStep::click(Self::PROFILE_BUTTON),
            UiStep::WaitFor {
                selector: testid(entry),
                state: Default::default(),
                timeout_ms: Some(SLOW_MS),
            },
            UiStep::click(entry),
        ]
    }
}

pub struct CartPage;

impl CartPage {
    pub const EMPTY_CART_MESSAGE: &'static str = "empty-cart-message";
    pub const CART_TOTAL: &'static str = "cart-total";
    pub const CHECKOUT_BTN: &'static str = "checkout-btn";
    pub const CLEAR_CART_BTN: &'static str = "clear-cart-btn";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::CART)
    }

    pub fn open_via_ui() -> Vec<UiStep> {
        vec![UiStep::click(HomePage::CART_LINK), UiStep::sleep(500)]
    }

    pub fn quantity_id(product_id: &str) -> String {
        format!("cart-item-quantity-{}", product_id)
    }

    pub fn item_quantity(name: &str, product_id: &str) -> UiStep {
        UiStep::read_text(name, &Self::quantity_id(product_id))
    }

    pub fn increase(product_id: &str) -> UiStep {
        UiStep::click(&format!("cart-item-increase-{}", product_id))
    }

    pub fn decrease(product_id: &str) -> UiStep {
        UiStep::click(&format!("cart-item-decrease-{}", product_id))
    }

    pub fn remove(product_id: &str) -> UiStep {
        UiStep::click(&format!("cart-item-{}-delete-btn", product_id))
    }

    pub fn wait_item_quantity(product_id: &str, quantity: u32) -> UiStep {
        UiStep::wait_text(&Self::quantity_id(product_id), quantity.to_string())
    }

    pub fn checkout() -> Vec<UiStep> {
        vec![
            UiStep::click(Self::CHECKOUT_BTN),
            UiStep::WaitFor {
                selector: testid(Self::EMPTY_CART_MESSAGE),
                state: Default::default(),
                timeout_ms: Some(SLOW_MS),
            },
        ]
    }

    pub fn empty(name: &str) -> UiStep {
        UiStep::probe(name, Self::EMPTY_CART_MESSAGE, QUICK_MS)
    }

    /// Empty-cart message once the last item is gone
    pub fn wait_empty(name: &str) -> UiStep {
        UiStep::probe(name, Self::EMPTY_CART_MESSAGE, SLOW_MS)
    }

    pub fn item_visible(name: &str, product_id: &str) -> UiStep {
        UiStep::probe(name, &Self::quantity_id(product_id), QUICK_MS)
    }

    pub fn clear() -> UiStep {
        UiStep::click(Self::CLEAR_CART_BTN)
    }
}

pub struct OrdersPage;

impl OrdersPage {
    pub const ORDERS_LIST: &'static str = "orders-list";
    pub const DASHBOARD_ENTRY: &'static str = "dashboard-my-orders";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::ORDERS)
    }

    pub fn open_via_ui() -> Vec<UiStep> {
        HomePage::open_dashboard_entry(Self::DASHBOARD_ENTRY)
    }

    pub fn wait_loaded() -> UiStep {
        UiStep::probe("orders_loaded", Self::ORDERS_LIST, SLOW_MS)
    }

    pub fn order_count(name: &str) -> UiStep {
        UiStep::count(name, "order-card-")
    }

    pub fn order_visible(name: &str, order_id: &str) -> UiStep {
        UiStep::probe(name, &format!("order-card-{}", order_id), QUICK_MS)
    }

    pub fn order_status(name: &str, order_id: &str) -> UiStep {
        UiStep::read_text(name, &format!("order-status-{}", order_id))
    }

    pub fn on_orders_page(name: &str) -> UiStep {
        UiStep::url_contains(name, Urls::ORDERS)
    }
}

pub struct ProfilePage;

impl ProfilePage {
    pub const DASHBOARD_ENTRY: &'static str = "dashboard-my-profile";
    pub const EDIT_BTN: &'static str = "profile-edit-btn";
    pub const NAME_INPUT: &'static str = "profile-name-input";
    pub const EMAIL_INPUT: &'static str = "profile-email-input";
    pub const PHONE_INPUT: &'static str = "profile-phone-input";
    pub const ADDRESS_INPUT: &'static str = "profile-address-input";
    pub const SAVE_BTN: &'static str = "profile-save-btn";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::PROFILE)
    }

    pub fn open_via_ui() -> Vec<UiStep> {
        HomePage::open_dashboard_entry(Self::DASHBOARD_ENTRY)
    }

    /// Enter edit mode, fill the given fields and save
    pub fn update(name: Option<&str>, phone: Option<&str>, address: Option<&str>) -> Vec<UiStep> {
        let mut steps = vec![
            UiStep::WaitFor {
                selector: testid(Self::EDIT_BTN),
                state: Default::default(),
                timeout_ms: Some(SLOW_MS),
            },
            UiStep::click(Self::EDIT_BTN),
        ];
        if let Some(name) = name {
            steps.push(UiStep::fill(Self::NAME_INPUT, name));
        }
        if let Some(phone) = phone {
            steps.push(UiStep::fill(Self::PHONE_INPUT, phone));
        }
        if let Some(address) = address {
            steps.push(UiStep::fill(Self::ADDRESS_INPUT, address));
        }
        steps.push(UiStep::click(Self::SAVE_BTN));
        steps
    }

    /// The edit button comes back once the save round trip is done
    pub fn saved(name: &str) -> UiStep {
        UiStep::probe(name, Self::EDIT_BTN, 5_000)
    }
}

pub struct AdminProductsPage;

impl AdminProductsPage {
    pub const SEARCH_INPUT: &'static str = "admin-search-input";
    pub const ADD_BUTTON: &'static str = "admin-add-button";
    pub const NAME_INPUT: &'static str = "product-name-input";
    pub const DESCRIPTION_INPUT: &'static str = "product-description-input";
    pub const PRICE_INPUT: &'static str = "product-price-input";
    pub const STOCK_INPUT: &'static str = "product-stock-input";
    pub const CATEGORY_INPUT: &'static str = "product-category-input";
    pub const BEST_OFFER_CHECKBOX: &'static str = "product-best-offer-checkbox";
    pub const SAVE_BTN: &'static str = "edit-product-save-btn";
    pub const CONFIRM_BTN: &'static str = "confirm-alert-btn";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::ADMIN_PRODUCTS)
    }

    pub fn row_id(product_id: &str) -> String {
        format!("admin-product-row-{}", product_id)
    }

    pub fn product_visible(name: &str, product_id: &str) -> UiStep {
        UiStep::probe(name, &Self::row_id(product_id), QUICK_MS)
    }

    /// Filter the table; rows update as the query is typed
    pub fn search(query: &str) -> Vec<UiStep> {
        vec![
            UiStep::WaitFor {
                selector: testid(Self::SEARCH_INPUT),
                state: Default::default(),
                timeout_ms: Some(SLOW_MS),
            },
            UiStep::fill(Self::SEARCH_INPUT, query),
            UiStep::sleep(500),
        ]
    }

    pub fn product_count(name: &str) -> UiStep {
        UiStep::count(name, "admin-product-row-")
    }

    /// Open the empty form, fill it and save
    pub fn create(product: &NewProduct) -> Vec<UiStep> {
        let mut steps = vec![UiStep::click(Self::ADD_BUTTON)];
        steps.extend(Self::fill_form(product));
        steps.push(UiStep::sleep(500));
        steps
    }

    /// Open the product's edit form, overwrite it with `product` and save
    pub fn update(product_id: &str, product: &NewProduct) -> Vec<UiStep> {
        let mut steps = vec![
            Self::edit(product_id),
            UiStep::wait_visible(Self::NAME_INPUT),
        ];
        steps.extend(Self::fill_form(product));
        steps.push(UiStep::sleep(500));
        steps
    }

    fn fill_form(product: &NewProduct) -> Vec<UiStep> {
        let mut steps = vec![
            UiStep::fill(Self::NAME_INPUT, product.name.as_str()),
            UiStep::fill(Self::DESCRIPTION_INPUT, product.description.as_str()),
            UiStep::fill(Self::PRICE_INPUT, product.price.to_string()),
            UiStep::fill(Self::STOCK_INPUT, product.stock.to_string()),
            UiStep::fill(Self::CATEGORY_INPUT, product.category.as_str()),
        ];
        if product.best_offer {
            steps.push(UiStep::check(Self::BEST_OFFER_CHECKBOX));
        }
        steps.push(UiStep::click(Self::SAVE_BTN));
        steps
    }

    pub fn edit(product_id: &str) -> UiStep {
        UiStep::click(&format!("admin-product-{}-edit-btn", product_id))
    }

    /// Click delete; the confirmation is a native dialog
    pub fn delete(product_id: &str) -> Vec<UiStep> {
        vec![
            UiStep::AcceptDialogs,
            UiStep::click(&format!("admin-product-{}-delete-btn", product_id)),
        ]
    }
}

pub struct AdminOrdersPage;

impl AdminOrdersPage {
    pub fn open() -> UiStep {
        UiStep::navigate(Urls::ADMIN_ORDERS)
    }

    pub fn order_visible(name: &str, order_id: &str) -> UiStep {
        UiStep::probe(name, &format!("order-card-{}", order_id), QUICK_MS)
    }

    pub fn order_status(name: &str, order_id: &str) -> UiStep {
        UiStep::read_text(name, &format!("order-status-{}", order_id))
    }

    /// Advance the order to its next status, confirming the native dialog
    pub fn advance_status(order_id: &str) -> Vec<UiStep> {
        vec![
            UiStep::AcceptDialogs,
            UiStep::click(&format!("order-{}-edit-btn", order_id)),
        ]
    }

    pub fn cancel(order_id: &str) -> Vec<UiStep> {
        vec![
            UiStep::AcceptDialogs,
            UiStep::click(&format!("order-cancel-{}", order_id)),
        ]
    }

    pub fn delete(order_id: &str) -> Vec<UiStep> {
        vec![
            UiStep::AcceptDialogs,
            UiStep::click(&format!("order-{}-delete-btn", order_id)),
        ]
    }
}

pub struct AdminUsersPage;

impl AdminUsersPage {
    pub const SEARCH_INPUT: &'static str = "admin-search-input";
    pub const NAME_INPUT: &'static str = "user-name-input";
    pub const SAVE_BTN: &'static str = "save-form-btn";
    pub const MODAL_NAME: &'static str = "user-modal-name";
    pub const MODAL_EMAIL: &'static str = "user-modal-email";
    pub const MODAL_ID: &'static str = "user-modal-detail-id";
    pub const MODAL_ROLE: &'static str = "user-modal-detail-role";
    pub const MODAL_CLOSE_BTN: &'static str = "user-modal-close-button";

    pub fn open() -> UiStep {
        UiStep::navigate(Urls::ADMIN_USERS)
    }

    pub fn search(query: &str) -> Vec<UiStep> {
        vec![
            UiStep::WaitFor {
                selector: testid(Self::SEARCH_INPUT),
                state: Default::default(),
                timeout_ms: Some(SLOW_MS),
            },
            UiStep::fill(Self::SEARCH_INPUT, query),
            UiStep::sleep(500),
        ]
    }

    pub fn user_visible(name: &str, user_id: &str) -> UiStep {
        UiStep::probe(name, &format!("admin-user-row-{}", user_id), QUICK_MS)
    }

    pub fn user_name(name: &str, user_id: &str) -> UiStep {
        UiStep::read_text(name, &format!("admin-user-name-{}", user_id))
    }

    pub fn view(user_id: &str) -> UiStep {
        UiStep::click(&format!("admin-user-{}-view-btn", user_id))
    }

    pub fn modal_visible(name: &str) -> UiStep {
        UiStep::probe(name, Self::MODAL_NAME, 5_000)
    }

    pub fn modal_name(name: &str) -> UiStep {
        UiStep::read_text(name, Self::MODAL_NAME)
    }

    pub fn modal_email(name: &str) -> UiStep {
        UiStep::read_text(name, Self::MODAL_EMAIL)
    }

    pub fn modal_id(name: &str) -> UiStep {
        UiStep::read_text(name, Self::MODAL_ID)
    }

    pub fn modal_role(name: &str) -> UiStep {
        UiStep::read_text(name, Self::MODAL_ROLE)
    }

    pub fn close_modal() -> UiStep {
        UiStep::click(Self::MODAL_CLOSE_BTN)
    }

    /// Rename a user through the row's edit form
    pub fn rename(user_id: &str, new_name: &str) -> Vec<UiStep> {
        vec![
            UiStep::click(&format!("admin-user-edit-{}", user_id)),
            UiStep::wait_visible(Self::NAME_INPUT),
            UiStep::fill(Self::NAME_INPUT, new_name),
            UiStep::click(Self::SAVE_BTN),
            UiStep::sleep(500),
        ]
    }

    pub fn delete(user_id: &str) -> Vec<UiStep> {
        vec![
            UiStep::AcceptDialogs,
            UiStep::click(&format!("admin-user-{}-delete-btn", user_id)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_registration_fills_code_before_submit() {
        let steps = RegisterPage::register_admin("A", "a@test.com", "pw", "code");
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[4], UiStep::fill(RegisterPage::ADMIN_CODE_INPUT, "code"));
        assert_eq!(steps[5], UiStep::click(RegisterPage::SUBMIT_BTN));
    }

    #[test]
    fn test_profile_update_only_fills_given_fields() {
        let steps = ProfilePage::update(None, Some("+1-555-0000000"), None);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[2], UiStep::fill(ProfilePage::PHONE_INPUT, "+1-555-0000000"));
    }

    #[test]
    fn test_product_edit_opens_row_form_before_filling() {
        let product = storefront_common::DataFactory::product(Default::default());
        let steps = AdminProductsPage::update("p1", &product);
        assert_eq!(steps[0], UiStep::click("admin-product-p1-edit-btn"));
        assert_eq!(
            steps[2],
            UiStep::fill(AdminProductsPage::NAME_INPUT, product.name.as_str())
        );
        assert!(steps.contains(&UiStep::click(AdminProductsPage::SAVE_BTN)));
        assert!(!steps.contains(&UiStep::click(AdminProductsPage::ADD_BUTTON)));
    }

    #[test]
    fn test_destructive_actions_accept_dialog_first() {
        for steps in [
            AdminProductsPage::delete("p1"),
            AdminOrdersPage::advance_status("o1"),
            AdminOrdersPage::delete("o1"),
            AdminUsersPage::delete("u1"),
        ] {
            assert_eq!(steps[0], UiStep::AcceptDialogs);
        }
    }
}
