use super::render;
use crate::api::{ApiClient, User};
use crate::config::{Config, get_config_path, load_config, save_config};
use crate::dashboard::{histogram_by_category, unmatched_categories};
use crate::errors::{AgriBidError, AgriBidResult};
use crate::feed::{by_recency, filter_products, latest_per_key};
use crate::notifier::{UnreadPoller, probe_unread};
use crate::session::{Session, SessionStore};
use anyhow::Context as _;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Everything a networked command needs: effective config, API client and
/// session storage.
pub(super) struct Context {
    pub(super) config: Config,
    pub(super) api: ApiClient,
    pub(super) sessions: SessionStore,
}

impl Context {
    pub(super) fn load(config_path: Option<&Path>) -> AgriBidResult<Self> {
        let config = load_config(config_path)?;
        let api = ApiClient::new(&config.api);
        let sessions = SessionStore::open_default()?;
        debug!("using API at {}", api.base_url());
        Ok(Self {
            config,
            api,
            sessions,
        })
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AgriBidResult<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}

pub(super) fn config_init(config_path: Option<&Path>, force: bool) -> AgriBidResult<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    if path.exists() && !force {
        return Err(AgriBidError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_config(&Config::default(), Some(&path))?;
    println!("\u{2713} Wrote default config to {}", path.display());
    Ok(())
}

pub(super) fn config_show(config_path: Option<&Path>) -> AgriBidResult<()> {
    let config = load_config(config_path)?;
    print_json(&config)
}

pub(super) fn session_set(
    token: String,
    user_id: i64,
    first_name: Option<String>,
    last_name: Option<String>,
    admin: bool,
) -> AgriBidResult<()> {
    let mut user = User::new(user_id);
    user.first_name = first_name;
    user.last_name = last_name;
    user.is_admin = admin;

    let session = Session::new(token, user);
    SessionStore::open_default()?.save(&session)?;
    print!("\u{2713} {}", render::session(&session));
    Ok(())
}

pub(super) fn session_show() -> AgriBidResult<()> {
    match SessionStore::open_default()?.load()? {
        Some(session) => print!("{}", render::session(&session)),
        None => println!("Not signed in."),
    }
    Ok(())
}

pub(super) fn session_clear() -> AgriBidResult<()> {
    if SessionStore::open_default()?.clear()? {
        println!("\u{2713} Signed out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

pub(super) async fn products(ctx: &Context, search: Option<&str>, json: bool) -> AgriBidResult<()> {
    let session = ctx.sessions.load()?;
    let all = ctx.api.list_products(session.as_ref()).await?;
    let shown = filter_products(&all, search.unwrap_or_default());
    if json {
        return print_json(&shown);
    }
    print!("{}", render::products(&shown));
    Ok(())
}

#[derive(Serialize)]
struct DashboardView<'a> {
    categories: &'a [crate::dashboard::CategoryHistogram],
    unmatched: &'a [String],
}

pub(super) async fn dashboard(ctx: &Context, json: bool) -> AgriBidResult<()> {
    let session = ctx.sessions.load()?;
    let products = ctx.api.list_products(session.as_ref()).await?;
    let categories = &ctx.config.dashboard.categories;

    let histograms = histogram_by_category(&products, categories);
    let unmatched = unmatched_categories(&products, categories);
    if json {
        return print_json(&DashboardView {
            categories: &histograms,
            unmatched: &unmatched,
        });
    }
    print!("{}", render::histograms(&histograms, &unmatched));
    Ok(())
}

pub(super) async fn users(ctx: &Context, admins: bool, active: bool) -> AgriBidResult<()> {
    let session = ctx.sessions.require()?;
    let users: Vec<User> = ctx
        .api
        .list_users(&session)
        .await?
        .into_iter()
        .filter(|u| !admins || u.is_admin)
        .filter(|u| !active || u.is_active)
        .collect();
    print!("{}", render::users(&users));
    Ok(())
}

pub(super) async fn set_admin(ctx: &Context, user_id: i64, grant: bool) -> AgriBidResult<()> {
    let session = ctx.sessions.require()?;
    if grant {
        ctx.api.grant_admin(&session, user_id).await?;
        println!("\u{2713} User #{user_id} is now an admin.");
    } else {
        ctx.api.revoke_admin(&session, user_id).await?;
        println!("\u{2713} Admin role removed from user #{user_id}.");
    }
    Ok(())
}

pub(super) async fn messages(ctx: &Context, product_id: i64, json: bool) -> AgriBidResult<()> {
    let session = ctx.sessions.require()?;
    let fetched = ctx.api.messages_for_product(&session, product_id).await?;
    let fetched_count = fetched.len();
    let conversations = by_recency(latest_per_key(fetched, session.user_id()));
    debug!(
        "product {product_id}: {fetched_count} messages, {} conversations",
        conversations.len()
    );
    if json {
        return print_json(&conversations);
    }
    print!("{}", render::conversations(&conversations));
    Ok(())
}

pub(super) async fn unread(ctx: &Context) -> AgriBidResult<()> {
    let session = ctx.sessions.require()?;
    let status = probe_unread(&ctx.api, &session).await;
    println!("{status}");
    Ok(())
}

pub(super) async fn watch(ctx: Context) -> AgriBidResult<()> {
    if !ctx.config.notifier.enabled {
        println!("Notifier is disabled (notifier.enabled = false in config).");
        return Ok(());
    }
    let session = ctx.sessions.require()?;
    let poller = UnreadPoller::new(Arc::new(ctx.api), session, &ctx.config.notifier);
    let mut rx = poller.subscribe();
    poller.start().await;
    println!(
        "Watching for unread notifications every {}s (Ctrl+C to stop)",
        ctx.config.notifier.interval_secs.max(1)
    );

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *rx.borrow_and_update();
                println!("[{}] {status}", chrono::Local::now().format("%H:%M:%S"));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop().await;
    Ok(())
}
