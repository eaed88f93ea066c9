// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mtx-bus: the asynchronous single-writer publish/subscribe event bus
//! (spec §4.1) the rest of the engine runs on.

pub mod bus;
pub mod handler;
pub mod predicate;

pub use bus::{Bus, SubscriptionId};
pub use handler::{FnHandler, Handler, HandlerError};
pub use predicate::{eq, glob, prefixed, Predicate};
