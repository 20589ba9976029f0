//! Entre combo builder core library.
//!
//! `combo-core` holds the product catalog, the cart state with its mutation
//! rules, and the pricing engine that turns a selection into an itemized
//! monthly quote and an exportable order message. The UI crates never compute
//! prices themselves; they route every mutation through [`cart::apply`] and
//! render whatever [`pricing::compute_order`] returns.

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod errors;
pub mod logging;
pub mod message;
pub mod pricing;
pub mod profile;
