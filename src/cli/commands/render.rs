use crate::api::{Message, Product, User};
use crate::dashboard::CategoryHistogram;
use crate::session::Session;
use crate::utils::truncate_for_display;
use std::fmt::Write;

const PREVIEW_BYTES: usize = 60;

pub(super) fn products(products: &[&Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }
    let mut out = String::new();
    for p in products {
        let id = p.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let price = p.price.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
        let _ = write!(out, "#{id:<5} {:<12} {price:>10}", p.title);
        if let Some(locate) = p.locate.as_deref().filter(|l| !l.trim().is_empty()) {
            let _ = write!(out, "  [{}]", locate.trim());
        }
        if !p.description.is_empty() {
            let _ = write!(
                out,
                "  {}",
                truncate_for_display(&p.description, PREVIEW_BYTES)
            );
        }
        out.push('\n');
    }
    let _ = writeln!(out, "\n{} product(s)", products.len());
    out
}

pub(super) fn histograms(histograms: &[CategoryHistogram], unmatched: &[String]) -> String {
    let mut out = String::new();
    for h in histograms {
        let _ = writeln!(out, "{} ({})", h.category, h.total());
        if h.is_empty() {
            out.push_str("  (no listings)\n");
            continue;
        }
        for (description, count) in &h.counts {
            let label = if description.is_empty() {
                "(no description)"
            } else {
                description.as_str()
            };
            let _ = writeln!(out, "  {label:<24} {count:>4} {}", "#".repeat(*count));
        }
    }
    if !unmatched.is_empty() {
        let quoted: Vec<String> = unmatched.iter().map(|t| format!("{t:?}")).collect();
        let _ = writeln!(
            out,
            "\nNot charted (title matches no category): {}",
            quoted.join(", ")
        );
    }
    out
}

pub(super) fn users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    let mut out = String::new();
    for u in users {
        let mut flags = Vec::new();
        if u.is_admin {
            flags.push("admin");
        }
        if !u.is_active {
            flags.push("inactive");
        }
        let _ = write!(out, "#{:<5} {:<28}", u.id, u.display_name());
        if let Some(phone) = u.phone_number.as_deref() {
            let _ = write!(out, " {phone}");
        }
        if !flags.is_empty() {
            let _ = write!(out, " ({})", flags.join(", "));
        }
        out.push('\n');
    }
    out
}

/// Sender label for a conversation row.
pub(super) fn sender_label(message: &Message) -> String {
    message.sender.as_ref().map_or_else(
        || format!("user #{}", message.sender_id),
        User::display_name,
    )
}

pub(super) fn conversations(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No conversations yet.\n".to_string();
    }
    let mut out = String::new();
    for m in messages {
        let _ = writeln!(
            out,
            "{}  {:<24} {}",
            m.updated_at.format("%Y-%m-%d %H:%M"),
            sender_label(m),
            truncate_for_display(&m.text, PREVIEW_BYTES)
        );
    }
    out
}

pub(super) fn session(session: &Session) -> String {
    let role = if session.user.is_admin { "admin" } else { "user" };
    format!(
        "Signed in as {} (id {}, {role})\n",
        session.user.display_name(),
        session.user_id()
    )
}
