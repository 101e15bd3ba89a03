//! # Function-backed consumer (`ConsumerFn`)
//!
//! [`ConsumerFn`] wraps a closure `F: Fn(Message) -> Fut`, producing a fresh
//! future per delivery. The closure receives an owned clone of the message,
//! so no shared mutable state is needed; if you want shared state, move an
//! `Arc<...>` into the closure explicitly.
//!
//! ## Example
//! ```rust
//! use ipcvisor::{ConsumerFn, ConsumerRef, Message};
//!
//! let printer: ConsumerRef = ConsumerFn::arc("printer", |message: Message| async move {
//!     println!("[{}] {:?}", message.as_label(), message.module());
//! });
//!
//! assert_eq!(printer.name(), "printer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::consumers::Consumer;
use crate::messages::Message;

/// Function-backed consumer implementation.
///
/// Wraps a closure that *creates* a new future per delivered message.
pub struct ConsumerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ConsumerFn<F> {
    /// Creates a new function-backed consumer.
    ///
    /// Prefer [`ConsumerFn::arc`] when you immediately need a [`ConsumerRef`](crate::ConsumerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the consumer and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Consumer for ConsumerFn<F>
where
    F: Fn(Message) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, message: &Message) {
        (self.f)(message.clone()).await;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
