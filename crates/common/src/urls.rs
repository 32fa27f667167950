//! UI routes and API endpoints of the storefront under test

/// UI routes, relative to the UI base URL
pub struct Urls;

impl Urls {
    pub const HOME: &'static str = "/";
    pub const LOGIN: &'static str = "/login";
    pub const REGISTER: &'static str = "/register";
    pub const USER_HOME: &'static str = "/user";
    pub const CART: &'static str = "/user/cart";
    pub const ORDERS: &'static str = "/user/orders";
    pub const PROFILE: &'static str = "/user/profile";
    pub const ADMIN: &'static str = "/admin";
    pub const ADMIN_PRODUCTS: &'static str = "/admin/products";
    pub const ADMIN_USERS: &'static str = "/admin/users";
    pub const ADMIN_ORDERS: &'static str = "/admin/orders";
}

/// API endpoints, relative to the API base URL
pub struct Endpoints;

impl Endpoints {
    // Auth
    pub const REGISTER: &'static str = "/api/users/register";
    pub const LOGIN: &'static str = "/api/users/login";
    pub const PROFILE: &'static str = "/api/users/profile";

    // Products
    pub const PRODUCTS: &'static str = "/api/products";
    pub const PRODUCT_SEARCH: &'static str = "/api/products/search";

    // Cart
    pub const CART: &'static str = "/api/cart";
    pub const CART_CLEAR: &'static str = "/api/cart/clear";

    // Orders
    pub const ORDERS: &'static str = "/api/orders";
    pub const MY_ORDERS: &'static str = "/api/orders/my-orders";

    // Admin
    pub const ADMIN_USERS: &'static str = "/api/admin/users";
    pub const ADMIN_PRODUCTS: &'static str = "/api/admin/products";
    pub const ADMIN_ORDERS: &'static str = "/api/admin/orders";
    pub const ADMIN_REGISTER: &'static str = "/api/admin/register";

    pub fn product(id: &str) -> String {
        format!("{}/{}", Self::PRODUCTS, id)
    }

    pub fn cart_update(product_id: &str) -> String {
        format!("{}/update/{}", Self::CART, product_id)
    }

    pub fn cart_item(product_id: &str) -> String {
        format!("{}/{}", Self::CART, product_id)
    }

    pub fn order(id: &str) -> String {
        format!("{}/{}", Self::ORDERS, id)
    }

    pub fn admin_user(id: &str) -> String {
        format!("{}/{}", Self::ADMIN_USERS, id)
    }

    pub fn admin_user_details(id: &str) -> String {
        format!("{}/{}/details", Self::ADMIN_USERS, id)
    }

    pub fn admin_product(id: &str) -> String {
        format!("{}/{}", Self::ADMIN_PRODUCTS, id)
    }

    pub fn admin_order(id: &str) -> String {
        format!("{}/{}", Self::ADMIN_ORDERS, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templated_endpoints() {
        assert_eq!(Endpoints::cart_update("p1"), "/api/cart/update/p1");
        assert_eq!(Endpoints::admin_user_details("u1"), "/api/admin/users/u1/details");
        assert_eq!(Endpoints::admin_order("o1"), "/api/admin/orders/o1");
    }
}
