//! Domain primitives and services.
//!
//! Purpose: define the strongly typed core the adapters compose —
//! principals, token claims, the token codec, validation schemas, the
//! authorization policy, and the Outcome pipeline that sequences every
//! multi-step operation. Types are immutable after construction and
//! document their invariants in Rustdoc.

pub mod auth;
pub mod authorization;
pub mod claims;
pub mod error;
pub mod items;
pub mod outcome;
pub mod ports;
pub mod principal;
pub mod token;
pub mod validation;

pub use self::auth::{AuthenticatedSession, LoginSuccess, TokenAuthService};
pub use self::claims::{Claims, TokenFingerprint};
pub use self::error::{Error, ErrorCode, FieldErrors};
pub use self::items::{Item, ItemId, ValidatedItemService};
pub use self::outcome::{Outcome, Pipeline};
pub use self::principal::{Email, Principal, PrincipalId, PrincipalSummary, Role};
pub use self::token::TokenCodec;
