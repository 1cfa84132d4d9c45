//! Reductions over fetched feeds: the conversation list (latest message per
//! participant pair) and the product search filter.
//!
//! Everything here is a pure function of its inputs and is re-run in full on
//! every fetch; ids are only unique within one fetch, so results are never
//! merged across fetches.

use crate::api::{Message, Product};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use std::fmt;

/// A record that belongs to a sender → receiver conversation.
pub trait Conversational {
    fn sender_id(&self) -> i64;
    fn receiver_id(&self) -> i64;
    fn updated_at(&self) -> DateTime<Utc>;
}

impl Conversational for Message {
    fn sender_id(&self) -> i64 {
        self.sender_id
    }

    fn receiver_id(&self) -> i64 {
        self.receiver_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl<T: Conversational + ?Sized> Conversational for &T {
    fn sender_id(&self) -> i64 {
        (**self).sender_id()
    }

    fn receiver_id(&self) -> i64 {
        (**self).receiver_id()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        (**self).updated_at()
    }
}

/// Directed participant pair identifying a conversation. Displays as `sender-receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConversationKey {
    pub sender_id: i64,
    pub receiver_id: i64,
}

impl ConversationKey {
    pub fn of<R: Conversational + ?Sized>(record: &R) -> Self {
        Self {
            sender_id: record.sender_id(),
            receiver_id: record.receiver_id(),
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.sender_id, self.receiver_id)
    }
}

/// Collapse a message stream to the most recent record per conversation.
///
/// Records sent by `excluded_sender` (the viewer) are dropped. For each
/// remaining key the record with the greatest `updated_at` is kept; on an
/// exact tie the one later in `records` wins. Entries come out in the order
/// their key was first seen, not by timestamp; see [`by_recency`].
pub fn latest_per_key<I, R>(records: I, excluded_sender: i64) -> IndexMap<ConversationKey, R>
where
    I: IntoIterator<Item = R>,
    R: Conversational,
{
    let mut latest: IndexMap<ConversationKey, R> = IndexMap::new();
    for record in records {
        if record.sender_id() == excluded_sender {
            continue;
        }
        match latest.entry(ConversationKey::of(&record)) {
            Entry::Occupied(mut slot) => {
                if record.updated_at() >= slot.get().updated_at() {
                    slot.insert(record);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }
    latest
}

/// Conversation list order: most recent first, ties keep first-seen order.
pub fn by_recency<R: Conversational>(latest: IndexMap<ConversationKey, R>) -> Vec<R> {
    let mut items: Vec<R> = latest.into_values().collect();
    items.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
    items
}

/// Case-insensitive search over title, description and location.
///
/// A blank query matches everything; input order is preserved.
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p
                    .locate
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(&needle))
        })
        .collect()
}
