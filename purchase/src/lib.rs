//! VesikaArt Primary Sale Module
//!
//! Fixed-rate VSK issuance against the native currency, bounded per purchase
//! and by an admin-managed inventory.

pub mod error;
pub mod pricing;
pub mod sale;

pub use error::{Result, SaleError};
pub use pricing::{PriceCalculator, PurchaseQuote};
pub use sale::{PrimarySale, SaleInfo, SaleStatus};
