//! Unique test data
//!
//! Every builder is a pure function: no I/O, no shared state. Natural keys
//! (emails, product names) embed [`DataFactory::unique_id`] so that
//! scenarios running side by side or one after another never collide.

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_PASSWORD: &str = "TestPass123";
pub const DEFAULT_ADMIN_PASSWORD: &str = "AdminPass123";

/// Hex characters of randomness appended to the timestamp
const RANDOM_SUFFIX_LEN: usize = 12;

/// Registration payload for a regular user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Registration payload for an administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(rename = "adminCode")]
    pub admin_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    #[serde(rename = "bestOffer")]
    pub best_offer: bool,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingDetails {
    #[serde(rename = "shippingAddress")]
    pub shipping_address: ShippingAddress,
}

/// Profile fields to change; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserOverrides {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UserOverrides {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductOverrides {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub best_offer: Option<bool>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ShippingOverrides {
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Factory for unique test data
pub struct DataFactory;

impl DataFactory {
    /// `<unix millis>_<random hex>`
    pub fn unique_id() -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let random = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}", millis, &random[..RANDOM_SUFFIX_LEN])
    }

    pub fn user(overrides: UserOverrides) -> NewUser {
        let uid = Self::unique_id();
        NewUser {
            name: overrides.name.unwrap_or_else(|| format!("Test User {}", uid)),
            email: overrides
                .email
                .unwrap_or_else(|| format!("testuser_{}@test.com", uid)),
            password: overrides
                .password
                .unwrap_or_else(|| DEFAULT_USER_PASSWORD.to_string()),
            role: overrides.role.unwrap_or_else(|| "user".to_string()),
        }
    }

    pub fn admin(overrides: UserOverrides, admin_code: &str) -> NewAdmin {
        let uid = Self::unique_id();
        NewAdmin {
            name: overrides.name.unwrap_or_else(|| format!("Test Admin {}", uid)),
            email: overrides
                .email
                .unwrap_or_else(|| format!("testadmin_{}@test.com", uid)),
            password: overrides
                .password
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            role: "admin".to_string(),
            admin_code: admin_code.to_string(),
        }
    }

    pub fn product(overrides: ProductOverrides) -> NewProduct {
        let uid = Self::unique_id();
        NewProduct {
            name: overrides
                .name
                .unwrap_or_else(|| format!("Test Product {}", uid)),
            description: overrides
                .description
                .unwrap_or_else(|| format!("Description for test product {}", uid)),
            price: overrides.price.unwrap_or(99.99),
            stock: overrides.stock.unwrap_or(100),
            category: overrides
                .category
                .unwrap_or_else(|| "Electronics".to_string()),
            best_offer: overrides.best_offer.unwrap_or(false),
            images: overrides
                .images
                .unwrap_or_else(|| vec!["https://via.placeholder.com/300".to_string()]),
        }
    }

    pub fn order(overrides: ShippingOverrides) -> ShippingDetails {
        ShippingDetails {
            shipping_address: ShippingAddress {
                address: overrides
                    .address
                    .unwrap_or_else(|| "123 Test Street".to_string()),
                city: overrides.city.unwrap_or_else(|| "Test City".to_string()),
                postal_code: overrides
                    .postal_code
                    .unwrap_or_else(|| "12345".to_string()),
                country: overrides
                    .country
                    .unwrap_or_else(|| "Test Country".to_string()),
            },
        }
    }

    /// With no overrides a fresh phone and address are generated, otherwise
    /// only the given fields are sent.
    pub fn profile_update(overrides: ProfileUpdate) -> ProfileUpdate {
        if !overrides.is_empty() {
            return overrides;
        }
        let uid = Self::unique_id();
        // the random suffix is hex, only the millisecond part is all digits
        let millis = uid.split('_').next().unwrap_or_default();
        let digits = &millis[millis.len().saturating_sub(7)..];
        ProfileUpdate {
            phone: Some(format!("+1-555-{}", digits)),
            address: Some(format!("Test Address {}", uid)),
            ..Default::default()
        }
    }
}
