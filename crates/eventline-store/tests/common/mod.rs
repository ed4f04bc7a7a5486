//! Shared order-domain fixtures for the store integration tests.
#![allow(dead_code)]

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use eventline_core::aggregate::AggregateRoot;
use eventline_core::event::DomainEvent;
use eventline_core::registry::EventTypeRegistry;
use eventline_store::client::{RetryPolicy, StreamClient};
use eventline_test_support::InMemoryStreamTransport;

/// Event type identifier for [`OrderCreated`].
pub const ORDER_CREATED_EVENT_TYPE: &str = "order.created";

/// Event type identifier for [`OrderItemAdded`].
pub const ORDER_ITEM_ADDED_EVENT_TYPE: &str = "order.item_added";

/// Event type identifier for [`OrderPaid`].
pub const ORDER_PAID_EVENT_TYPE: &str = "order.paid";

/// Event type identifier for [`DiscountApplied`] — deliberately left out of
/// [`order_registry`] to stand in for an event written by a newer process
/// version.
pub const DISCOUNT_APPLIED_EVENT_TYPE: &str = "order.discount_applied";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemAdded {
    pub order_id: String,
    pub sku: String,
    pub price: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaid {
    pub order_id: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountApplied {
    pub order_id: String,
    pub percent: u32,
}

impl DomainEvent for OrderCreated {
    fn aggregate_id(&self) -> &str {
        &self.order_id
    }

    fn event_type(&self) -> &'static str {
        ORDER_CREATED_EVENT_TYPE
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("OrderCreated serialization is infallible")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DomainEvent for OrderItemAdded {
    fn aggregate_id(&self) -> &str {
        &self.order_id
    }

    fn event_type(&self) -> &'static str {
        ORDER_ITEM_ADDED_EVENT_TYPE
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("OrderItemAdded serialization is infallible")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DomainEvent for OrderPaid {
    fn aggregate_id(&self) -> &str {
        &self.order_id
    }

    fn event_type(&self) -> &'static str {
        ORDER_PAID_EVENT_TYPE
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("OrderPaid serialization is infallible")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DomainEvent for DiscountApplied {
    fn aggregate_id(&self) -> &str {
        &self.order_id
    }

    fn event_type(&self) -> &'static str {
        DISCOUNT_APPLIED_EVENT_TYPE
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("DiscountApplied serialization is infallible")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Order aggregate reconstructed purely from its event stream.
#[derive(Debug, Default)]
pub struct Order {
    pub order_id: String,
    pub created: bool,
    pub skus: Vec<String>,
    pub total: u32,
    pub paid: bool,
    pending: Vec<Box<dyn DomainEvent>>,
}

impl Order {
    /// Starts a new order, recording the creation as a pending change.
    pub fn create(order_id: &str) -> Self {
        let mut order = Self::default();
        let event = OrderCreated {
            order_id: order_id.to_owned(),
        };
        order.when(&event);
        order.pending.push(Box::new(event));
        order
    }

    /// Adds an item, recording it as a pending change.
    pub fn add_item(&mut self, sku: &str, price: u32) {
        let event = OrderItemAdded {
            order_id: self.order_id.clone(),
            sku: sku.to_owned(),
            price,
        };
        self.when(&event);
        self.pending.push(Box::new(event));
    }

    /// Pays the current total, recording it as a pending change.
    pub fn pay(&mut self) {
        let event = OrderPaid {
            order_id: self.order_id.clone(),
            amount: self.total,
        };
        self.when(&event);
        self.pending.push(Box::new(event));
    }
}

impl AggregateRoot for Order {
    fn when(&mut self, event: &dyn DomainEvent) {
        if let Some(created) = event.as_any().downcast_ref::<OrderCreated>() {
            self.order_id = created.order_id.clone();
            self.created = true;
        } else if let Some(added) = event.as_any().downcast_ref::<OrderItemAdded>() {
            self.skus.push(added.sku.clone());
            self.total += added.price;
        } else if event.as_any().downcast_ref::<OrderPaid>().is_some() {
            self.paid = true;
        }
    }

    fn pending_changes(&self) -> &[Box<dyn DomainEvent>] {
        &self.pending
    }

    fn mark_committed(&mut self, count: usize) {
        self.pending.drain(..count);
    }
}

/// Registry with every order event type registered except
/// [`DiscountApplied`].
pub fn order_registry() -> EventTypeRegistry {
    let mut registry = EventTypeRegistry::new();
    registry.register::<OrderCreated>(ORDER_CREATED_EVENT_TYPE);
    registry.register::<OrderItemAdded>(ORDER_ITEM_ADDED_EVENT_TYPE);
    registry.register::<OrderPaid>(ORDER_PAID_EVENT_TYPE);
    registry
}

/// A client over `transport` with a retry policy short enough for tests.
pub fn test_client(transport: &InMemoryStreamTransport) -> StreamClient {
    StreamClient::new(Box::new(transport.clone()), order_registry()).with_retry_policy(
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        },
    )
}

/// Same as [`test_client`], wrapped for repository construction.
pub fn test_client_arc(transport: &InMemoryStreamTransport) -> Arc<StreamClient> {
    Arc::new(test_client(transport))
}
