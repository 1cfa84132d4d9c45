//! Wire records returned by the AgriBid backend.
//!
//! Everything coming off the network is decoded into these types before any
//! view logic sees it; a body that does not fit is a decode error, not a
//! half-filled record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A product listing as shown on the seller dashboard and product feed.
///
/// `title` doubles as the product's category on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
    /// Seller location, free text.
    #[serde(default)]
    pub locate: Option<String>,
}

/// A user account as listed on the admin console.
///
/// Also used for the signed-in profile and the sender embedded in messages,
/// where the backend only fills a subset of the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, rename = "Firstname")]
    pub first_name: Option<String>,
    #[serde(default, rename = "Lastname")]
    pub last_name: Option<String>,
    #[serde(default, rename = "isAdmin", deserialize_with = "deserialize_flag")]
    pub is_admin: bool,
    #[serde(default, rename = "Address")]
    pub address: Option<String>,
    #[serde(default, rename = "isActive", deserialize_with = "deserialize_flag")]
    pub is_active: bool,
    #[serde(default, rename = "Phonenumber")]
    pub phone_number: Option<String>,
}

impl User {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            is_admin: false,
            address: None,
            is_active: true,
            phone_number: None,
        }
    }

    /// "First Last", falling back to "user #id" when neither name is set.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            format!("user #{}", self.id)
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(rename = "senderId")]
    pub sender_id: i64,
    #[serde(rename = "receiverId")]
    pub receiver_id: i64,
    #[serde(default, rename = "productId")]
    pub product_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub text: String,
    #[serde(rename = "updatedAt", deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sender: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "message")]
    pub text: Option<String>,
    #[serde(default, rename = "isRead", deserialize_with = "deserialize_flag")]
    pub is_read: bool,
    #[serde(
        default,
        rename = "createdAt",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of the notifications endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFeed {
    #[serde(rename = "unreadCount")]
    pub unread_count: u64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub notifications: Vec<Notification>,
}

/// List endpoints answer either with a bare array or with `{"data": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) | ListEnvelope::Wrapped { data: items } => items,
        }
    }
}

/// Parse the timestamp formats the backend has been seen to emit.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS[.fff]`
/// without offset (read as UTC), and a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{raw}'")))
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{raw}'"))),
    }
}

/// Explicit `null` reads as the type's default, same as a missing field.
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawPrice>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawPrice::Number(n)) => Ok(Some(n)),
        Some(RawPrice::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawPrice::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("price is not a number: '{s}'"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

/// Booleans arrive as `true`/`false` or as `0`/`1` depending on the column type.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawFlag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(RawFlag::Bool(b)) => Ok(b),
        Some(RawFlag::Int(i)) => Ok(i != 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parse_rfc3339() {
        let ts = parse_timestamp("2024-01-02T10:30:00.000Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap());
    }

    #[test]
    fn parse_rfc3339_with_offset_normalises_to_utc() {
        let ts = parse_timestamp("2024-01-02T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap());
    }

    #[test]
    fn parse_sql_datetime() {
        let ts = parse_timestamp("2024-03-05 08:15:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 5, 8, 15, 0).unwrap());
    }

    #[test]
    fn parse_bare_date_is_midnight() {
        let ts = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_garbage_rejected() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn message_decodes_with_sender_profile() {
        let msg: Message = serde_json::from_value(json!({
            "id": 7,
            "senderId": 1,
            "receiverId": 2,
            "productId": 40,
            "text": "Is the maize still available?",
            "updatedAt": "2024-01-02",
            "sender": {"id": 1, "Firstname": "Amina", "Lastname": "Okoro"}
        }))
        .unwrap();
        assert_eq!(msg.sender_id, 1);
        assert_eq!(msg.product_id, Some(40));
        assert_eq!(msg.sender.unwrap().display_name(), "Amina Okoro");
    }

    #[test]
    fn message_with_bad_timestamp_rejected() {
        let result: Result<Message, _> = serde_json::from_value(json!({
            "id": 7, "senderId": 1, "receiverId": 2, "updatedAt": "soon"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn message_missing_sender_id_rejected() {
        let result: Result<Message, _> = serde_json::from_value(json!({
            "id": 7, "receiverId": 2, "updatedAt": "2024-01-01"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn product_price_accepts_number_and_string() {
        let a: Product = serde_json::from_value(json!({"title": "Corn", "price": 12.5})).unwrap();
        let b: Product = serde_json::from_value(json!({"title": "Corn", "price": "12.5"})).unwrap();
        let c: Product = serde_json::from_value(json!({"title": "Corn", "price": ""})).unwrap();
        assert_eq!(a.price, Some(12.5));
        assert_eq!(b.price, Some(12.5));
        assert_eq!(c.price, None);
    }

    #[test]
    fn product_price_rejects_non_numeric_text() {
        let result: Result<Product, _> =
            serde_json::from_value(json!({"title": "Corn", "price": "cheap"}));
        assert!(result.is_err());
    }

    #[test]
    fn product_defaults_optional_fields() {
        let p: Product = serde_json::from_value(json!({"title": "Fruits"})).unwrap();
        assert_eq!(p.description, "");
        assert!(p.image.is_none());
        assert!(p.locate.is_none());
    }

    #[test]
    fn user_flags_accept_ints() {
        let u: User = serde_json::from_value(json!({
            "id": 3, "isAdmin": 1, "isActive": 0, "Phonenumber": "0803"
        }))
        .unwrap();
        assert!(u.is_admin);
        assert!(!u.is_active);
        assert_eq!(u.phone_number.as_deref(), Some("0803"));
    }

    #[test]
    fn user_display_name_fallback() {
        assert_eq!(User::new(9).display_name(), "user #9");
        let mut u = User::new(9);
        u.first_name = Some("Kofi".into());
        u.last_name = Some("  ".into());
        assert_eq!(u.display_name(), "Kofi");
    }

    #[test]
    fn notification_feed_decodes() {
        let feed: NotificationFeed = serde_json::from_value(json!({
            "unreadCount": 2,
            "notifications": [
                {"id": 1, "message": "New bid", "isRead": false, "createdAt": "2024-05-01T09:00:00Z"},
                {"id": 2, "text": "Payment received", "isRead": 1}
            ]
        }))
        .unwrap();
        assert_eq!(feed.unread_count, 2);
        assert_eq!(feed.notifications[0].text.as_deref(), Some("New bid"));
        assert!(feed.notifications[1].is_read);
        assert!(feed.notifications[1].created_at.is_none());
    }

    #[test]
    fn notification_feed_requires_unread_count() {
        let result: Result<NotificationFeed, _> =
            serde_json::from_value(json!({"notifications": []}));
        assert!(result.is_err());
    }

    #[test]
    fn list_envelope_accepts_both_shapes() {
        let bare: ListEnvelope<Product> =
            serde_json::from_value(json!([{"title": "Corn"}])).unwrap();
        let wrapped: ListEnvelope<Product> =
            serde_json::from_value(json!({"data": [{"title": "Corn"}, {"title": "Rice"}]}))
                .unwrap();
        assert_eq!(bare.into_vec().len(), 1);
        assert_eq!(wrapped.into_vec().len(), 2);
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let products: ListEnvelope<Product> = serde_json::from_value(json!([
            {"title": "Fruits", "description": null},
            {"title": "Fruits", "description": "Mango"}
        ]))
        .unwrap();
        let products = products.into_vec();
        assert_eq!(products[0].description, "");
        assert_eq!(products[1].description, "Mango");

        let msg: Message = serde_json::from_value(json!({
            "id": 1, "senderId": 2, "receiverId": 3, "text": null,
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(msg.text.is_empty());

        let feed: NotificationFeed =
            serde_json::from_value(json!({"unreadCount": 0, "notifications": null})).unwrap();
        assert!(feed.notifications.is_empty());
    }
}
