//! `watch` command: a live feed driven by [`FeedPoller`].
//!
//! The feed is reprinted whenever the poller publishes a new state or the
//! theme changes. Filters and the detail view are controlled by short
//! commands typed on stdin.

use std::time::Duration;

use carfeed_client::{FallbackPolicy, FeedClient, FeedPoller, FeedState, ListingSource};
use carfeed_core::{AppConfig, Catalog, Classification, FilterState, ListingId, Theme};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::filters::{parse_listing_id, resolve_region};
use crate::render;
use crate::theme::open_theme;

const HELP: &str = "commands: rec | cheap | all | brand <name> | region <id|name> | reset \
| open <id> | close | facets | theme | refresh | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    Refresh,
    Classify(Option<Classification>),
    Brand(String),
    Region(String),
    Reset,
    Open(ListingId),
    Close,
    Facets,
    ToggleTheme,
    Help,
    Quit,
}

/// Parses one stdin line. Returns `None` for blank or unknown input.
pub fn parse_input(line: &str) -> Option<WatchInput> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (line, None),
    };
    let input = match (command.to_lowercase().as_str(), arg) {
        ("r" | "refresh", None) => WatchInput::Refresh,
        ("rec" | "recommended", None) => WatchInput::Classify(Some(Classification::Recommended)),
        ("cheap", None) => WatchInput::Classify(Some(Classification::PriceCapped)),
        ("all", None) => WatchInput::Classify(None),
        ("brand", Some(name)) => WatchInput::Brand(name.to_owned()),
        ("region", Some(key)) => WatchInput::Region(key.to_owned()),
        ("reset", None) => WatchInput::Reset,
        ("open", Some(id)) => WatchInput::Open(parse_listing_id(id)),
        ("close", None) => WatchInput::Close,
        ("facets", None) => WatchInput::Facets,
        ("theme", None) => WatchInput::ToggleTheme,
        ("help" | "?", None) => WatchInput::Help,
        ("q" | "quit" | "exit", None) => WatchInput::Quit,
        _ => return None,
    };
    Some(input)
}

/// Everything printed for one state: header, then the open detail or the
/// feed itself. While a refresh runs over existing data only a short notice
/// is printed instead of the skeleton.
pub fn render_frame(state: &FeedState, theme: Theme, now: DateTime<Utc>) -> String {
    let mut out = render::render_header(state, theme, now);
    if let Some(detail) = state.detail() {
        out.push_str(&render::render_detail(&detail));
    } else if state.is_loading() && state.applied_seq > 0 {
        out.push_str("refreshing...\n");
    } else {
        out.push_str(&render::render_view(&state.view(), now));
    }
    out
}

fn apply_input<S: ListingSource + 'static>(
    poller: &FeedPoller<S>,
    catalog: &Catalog,
    input: WatchInput,
) -> Option<String> {
    match input {
        WatchInput::Refresh => poller.refresh(),
        WatchInput::Classify(classification) => poller.set_classification(classification),
        WatchInput::Brand(name) => {
            poller.toggle_brand(catalog.find_brand(&name).unwrap_or(name.as_str()));
        }
        WatchInput::Region(key) => match resolve_region(catalog, &key) {
            Ok(region) => poller.toggle_region(&region),
            Err(e) => return Some(format!("{e}\n")),
        },
        WatchInput::Reset => poller.reset_filters(),
        WatchInput::Open(id) => {
            if poller.open_detail(&id).is_none() {
                return Some(format!("no listing with id {id}\n"));
            }
        }
        WatchInput::Close => poller.close_detail(),
        WatchInput::Facets => {
            let counts = poller.snapshot().facets(&catalog.brands);
            return Some(render::render_facets(&counts, catalog));
        }
        WatchInput::Help => return Some(format!("{HELP}\n")),
        // Handled by the caller, which owns the theme context.
        WatchInput::ToggleTheme | WatchInput::Quit => {}
    }
    None
}

/// Runs the live feed until ctrl-c or `quit`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or stdin fails.
pub async fn run_watch(
    config: &AppConfig,
    catalog: &Catalog,
    filter: FilterState,
    interval: Duration,
) -> anyhow::Result<()> {
    let client = FeedClient::from_config(config)?;
    let poller = FeedPoller::spawn(client, FallbackPolicy::from(config.fallback), interval, filter);
    let theme = open_theme(config);

    let mut state_rx = poller.subscribe();
    let mut theme_rx = theme.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("{HELP}");
    tracing::info!(
        base_url = %config.base_url,
        interval_secs = interval.as_secs(),
        "watch: started"
    );

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                print!("{}", render_frame(&state, theme.current(), Utc::now()));
            }
            changed = theme_rx.changed() => {
                if changed.is_ok() {
                    let theme_now = *theme_rx.borrow_and_update();
                    print!("{}", render_frame(&poller.snapshot(), theme_now, Utc::now()));
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                match parse_input(&line) {
                    Some(WatchInput::Quit) => break,
                    Some(WatchInput::ToggleTheme) => {
                        if let Err(e) = theme.toggle() {
                            tracing::warn!(error = %e, "watch: theme preference not saved");
                        }
                    }
                    Some(input) => {
                        if let Some(message) = apply_input(&poller, catalog, input) {
                            print!("{message}");
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("{HELP}"),
                }
            }
        }
    }

    poller.shutdown().await;
    tracing::info!("watch: stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use carfeed_client::{FeedOrigin, Phase};
    use carfeed_core::sample::sample_listings;

    use super::*;

    #[test]
    fn parses_filter_commands() {
        assert_eq!(
            parse_input("rec"),
            Some(WatchInput::Classify(Some(Classification::Recommended)))
        );
        assert_eq!(
            parse_input("  CHEAP "),
            Some(WatchInput::Classify(Some(Classification::PriceCapped)))
        );
        assert_eq!(parse_input("all"), Some(WatchInput::Classify(None)));
        assert_eq!(
            parse_input("brand Mercedes-Benz"),
            Some(WatchInput::Brand("Mercedes-Benz".to_string()))
        );
        assert_eq!(
            parse_input("region BL"),
            Some(WatchInput::Region("BL".to_string()))
        );
    }

    #[test]
    fn parses_detail_commands() {
        assert_eq!(parse_input("open 12"), Some(WatchInput::Open(ListingId::Int(12))));
        assert_eq!(
            parse_input("open demo-3"),
            Some(WatchInput::Open(ListingId::Text("demo-3".to_string())))
        );
        assert_eq!(parse_input("close"), Some(WatchInput::Close));
    }

    #[test]
    fn rejects_missing_or_extra_arguments() {
        assert_eq!(parse_input("brand"), None);
        assert_eq!(parse_input("open   "), None);
        assert_eq!(parse_input("reset now"), None);
        assert_eq!(parse_input("launch"), None);
        assert_eq!(parse_input(""), None);
    }

    fn ready_state() -> FeedState {
        FeedState {
            phase: Phase::Ready,
            listings: sample_listings(),
            origin: Some(FeedOrigin::Live),
            filter: FilterState::default(),
            selected: None,
            applied_seq: 1,
            last_updated: None,
        }
    }

    #[test]
    fn frame_shows_detail_when_selected() {
        let mut state = ready_state();
        state.selected = Some(ListingId::Int(5));
        let out = render_frame(&state, Theme::Light, Utc::now());
        assert!(out.contains("Toyota Corolla"));
        assert!(!out.contains("TITLE"));
    }

    #[test]
    fn frame_shows_notice_while_refreshing_existing_data() {
        let mut state = ready_state();
        state.phase = Phase::Loading;
        let out = render_frame(&state, Theme::Light, Utc::now());
        assert!(out.ends_with("refreshing...\n"));

        state.applied_seq = 0;
        state.listings.clear();
        let out = render_frame(&state, Theme::Light, Utc::now());
        assert!(out.contains("loading listings..."));
    }

    #[test]
    fn frame_shows_grid_when_ready() {
        let out = render_frame(&ready_state(), Theme::Dark, Utc::now());
        assert!(out.contains("TITLE"));
        assert!(out.contains("Dacia Sandero"));
    }
}
