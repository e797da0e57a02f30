//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod notification;
pub mod phone;
pub mod price;
pub mod product;

pub use email::validate_email;
pub use id::*;
pub use notification::NotificationKind;
pub use phone::validate_phone;
pub use price::{format_currency, format_fixed_price};
pub use product::{
    CartUpdate, CartUpdateRequest, CartUpdateResponse, ProductSummary, SearchResponse,
};
