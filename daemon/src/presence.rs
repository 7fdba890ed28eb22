use anyhow::Result;

/// Text shown by the presence service for the current set of open projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    /// First line, e.g. `"Projects: Intro and Outro (Tab: Intro)"`.
    pub state: String,
    /// Second line, e.g. `"Using FL Studio 20"`. Also used as the large-image tooltip.
    pub details: String,
}

impl Presence {
    /// Builds the published text from deduplicated project names, the focused
    /// project, and the sorted distinct version numbers.
    pub fn build(marker: &str, projects: &[String], focused: Option<&str>, versions: &[u32]) -> Self {
        let focus_suffix = focused
            .map(|name| format!(" (Tab: {name})"))
            .unwrap_or_default();
        Self {
            state: format!("Projects: {}{focus_suffix}", format_project_list(projects)),
            details: format!("Using {}", format_versions(marker, versions)),
        }
    }
}

/// What the monitor wants the presence service to do after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceUpdate {
    /// Show new presence text.
    Publish(Presence),
    /// The application has no windows left; presence is cleared and the cache reset.
    Closed,
    /// The application is running but no document window names a project.
    NoProjects,
}

/// Outbound side of the monitor: the service that displays presence.
///
/// Calls are fire-and-forget; any error is fatal to the caller.
pub trait PresenceSink {
    /// Opens the connection. Called once before the first tick.
    fn connect(&mut self) -> Result<()>;
    /// Replaces the displayed presence.
    fn publish(&mut self, presence: &Presence) -> Result<()>;
    /// Removes any displayed presence.
    fn clear(&mut self) -> Result<()>;
    /// Releases the connection on shutdown.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// `[]` → `"No projects open"`, `[a]` → `"a"`, `[a, b, c]` → `"a, b and c"`.
pub fn format_project_list(projects: &[String]) -> String {
    match projects {
        [] => "No projects open".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Prefixed with `marker`. With `"FL Studio"`: `[]` → `"FL Studio"`, `[20]` → `"FL Studio 20"`,
/// `[12, 20]` → `"FL Studio 12 and 20"`, `[9, 12, 20]` → `"FL Studio 9, 12, and 20"`.
pub fn format_versions(marker: &str, versions: &[u32]) -> String {
    match versions {
        [] => marker.to_string(),
        [v] => format!("{marker} {v}"),
        [a, b] => format!("{marker} {a} and {b}"),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(u32::to_string).collect();
            format!("{marker} {}, and {last}", init.join(", "))
        }
    }
}
