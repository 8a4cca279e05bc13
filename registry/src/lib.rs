//! VesikaArt Artist Registry
//!
//! Artist onboarding and per-artist token issuance:
//! - Artists register, admins/approvers approve or reject them
//! - Approved artists request tokens; requests are approved or rejected
//! - Approved requests deploy as whitelist-restricted ledger tokens

pub mod artist;
pub mod error;
pub mod registry;
pub mod request;

pub use artist::Artist;
pub use error::{RegistryError, Result};
pub use registry::ArtistRegistry;
pub use request::{RequestStatus, TokenRequest, TokenRequestParams};
