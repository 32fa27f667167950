//! Storefront E2E Common Library
//!
//! Configuration, domain types, endpoint tables and unique test data shared
//! by the storefront end-to-end harness.

pub mod config;
pub mod error;
pub mod factory;
pub mod types;
pub mod urls;

// Re-export commonly used types
pub use config::{AdminCredentials, BrowserKind, HarnessConfig, Viewport};
pub use error::{Error, Result};
pub use factory::{
    DataFactory, NewAdmin, NewProduct, NewUser, ProductOverrides, ProfileUpdate,
    ShippingDetails, ShippingOverrides, UserOverrides,
};
pub use types::*;
pub use urls::{Endpoints, Urls};

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
