use anyhow::Result;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::presence::{Presence, PresenceSink, PresenceUpdate};
use crate::title::{extract_project_name, extract_version_number, is_app_window};
use crate::windows_list::{WindowInfo, WindowSource};

/// What was last published to the presence service.
///
/// The cache mirrors the last *published* state rather than the last observed
/// one; it exists only to suppress duplicate publishes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MonitorState {
    /// Whether any window of the target application was seen on the previous tick.
    pub running: bool,
    pub cached_projects: HashSet<String>,
    pub last_focus: Option<String>,
}

impl MonitorState {
    /// Folds one poll of the desktop into the state and returns the update to
    /// send, if any.
    ///
    /// `windows` may contain unrelated windows; only those whose title carries
    /// `marker` are considered.
    pub fn tick(
        &mut self,
        marker: &str,
        windows: &[WindowInfo],
        focused: Option<&WindowInfo>,
    ) -> Option<PresenceUpdate> {
        let titles: Vec<&str> = windows
            .iter()
            .map(|w| w.title.as_str())
            .filter(|t| is_app_window(t, marker))
            .collect();

        if titles.is_empty() {
            if !self.running {
                return None;
            }
            self.running = false;
            self.cached_projects.clear();
            return Some(PresenceUpdate::Closed);
        }
        self.running = true;

        let projects = dedupe_preserving_order(
            titles.iter().filter_map(|t| extract_project_name(t, marker)),
        );
        let focus = focused
            .filter(|w| is_app_window(&w.title, marker))
            .and_then(|w| extract_project_name(&w.title, marker));

        // Cache is left untouched here; reopening the same projects afterwards
        // will not republish until the set or focus changes.
        if projects.is_empty() {
            return Some(PresenceUpdate::NoProjects);
        }

        let mut versions: Vec<u32> = titles
            .iter()
            .filter_map(|t| extract_version_number(t, marker))
            .collect();
        versions.sort_unstable();
        versions.dedup();

        let project_set: HashSet<String> = projects.iter().cloned().collect();
        if project_set == self.cached_projects && focus == self.last_focus {
            return None;
        }

        let presence = Presence::build(marker, &projects, focus.as_deref(), &versions);
        self.cached_projects = project_set;
        self.last_focus = focus;
        Some(PresenceUpdate::Publish(presence))
    }
}

/// Collects `items`, dropping repeats while keeping first-seen order.
fn dedupe_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Forwards `update` to `sink`, logging each state transition.
fn apply<P: PresenceSink>(sink: &mut P, marker: &str, update: &PresenceUpdate) -> Result<()> {
    match update {
        PresenceUpdate::Publish(presence) => {
            log::info!("{}", presence.state);
            sink.publish(presence)
        }
        PresenceUpdate::Closed => {
            log::info!("{marker} closed, clearing presence");
            sink.clear()
        }
        PresenceUpdate::NoProjects => {
            log::info!("No projects detected, clearing presence");
            sink.clear()
        }
    }
}

/// Polls `source` every `poll_interval` and mirrors the target application's
/// open projects into `sink` until `shutdown` flips to `true` or its sender
/// is dropped.
///
/// Any error from the window source or the sink ends the loop and is returned.
pub async fn run<S, P>(
    marker: &str,
    poll_interval: Duration,
    source: &mut S,
    sink: &mut P,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    S: WindowSource,
    P: PresenceSink,
{
    let mut state = MonitorState::default();
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let windows = source.list_windows()?;
        let focused = source.focused_window()?;
        log::trace!(
            "[monitor] {} windows, foreground {:?}",
            windows.len(),
            focused.as_ref().map(|w| w.handle)
        );
        if let Some(update) = state.tick(marker, &windows, focused.as_ref()) {
            log::debug!("[monitor] {update:?}");
            apply(sink, marker, &update)?;
        }
    }

    log::debug!("[monitor] Stopped");
    Ok(())
}

/// Requests shutdown through `stop` once `signal` resolves.
///
/// A failed signal listener is logged and leaves the loop running; only the
/// caller's remaining sender can then stop it.
pub async fn stop_on_signal<F>(signal: F, stop: watch::Sender<bool>)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            let _ = stop.send(true);
        }
        Err(e) => log::error!("[monitor] Failed to listen for Ctrl+C: {e}"),
    }
}
