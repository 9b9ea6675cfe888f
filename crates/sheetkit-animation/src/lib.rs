//! Spring math and the settle-animation driver for sheetkit.
//!
//! [`SpringSpec`] describes a duration-bounded damped spring;
//! [`SettleAnimation`] drives one settle at a time against a
//! [`sheetkit_core::FrameClock`], superseding any previous settle
//! synchronously.

mod settle;
mod spring;

pub use settle::SettleAnimation;
pub use spring::SpringSpec;
