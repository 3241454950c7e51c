use leptos::prelude::*;
use reactive_stores::Store;

/// Most recent sections kept in [`AppState::visited`].
pub const VISIT_HISTORY: usize = 8;

/// Application-wide state shared by every section.
#[derive(Store, Default, Debug)]
pub struct AppState {
    pub drawer_open: bool,
    /// Route names, oldest first.
    pub visited: Vec<String>,
    pub trading: TradingState,
}

#[derive(Store, Default, Debug)]
pub struct TradingState {
    pub paper_mode: bool,
}

/// Appends `name` unless it is already the latest entry, dropping the
/// oldest entries past [`VISIT_HISTORY`].
pub fn record_visit(visited: &mut Vec<String>, name: &str) {
    if visited.last().is_some_and(|last| last == name) {
        return;
    }
    visited.push(name.to_string());
    if visited.len() > VISIT_HISTORY {
        let excess = visited.len() - VISIT_HISTORY;
        visited.drain(..excess);
    }
}

pub fn provide_app_state() -> Store<AppState> {
    let store = Store::new(AppState {
        trading: TradingState { paper_mode: true },
        ..AppState::default()
    });
    provide_context(store);
    store
}

pub fn use_app_state() -> Option<Store<AppState>> {
    use_context::<Store<AppState>>()
}
