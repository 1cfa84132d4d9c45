#![no_main]

use agribid::dashboard::histogram_by_category;
use agribid::feed::{by_recency, latest_per_key};
use agribid::fuzz_api::{decode_messages, decode_products};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    if let Some(messages) = decode_messages(body) {
        let viewer = messages.first().map_or(0, |m| m.receiver_id);
        let latest = latest_per_key(&messages, viewer);
        assert!(latest.len() <= messages.len());
        assert!(latest.values().all(|m| m.sender_id != viewer));
        let _ = by_recency(latest);
    }
    if let Some(products) = decode_products(body) {
        let hist = histogram_by_category(&products, &["Fruits", "Corn"]);
        assert_eq!(hist.len(), 2);
    }
});
