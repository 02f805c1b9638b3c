use aeolus_core::{
    ForecastEntry, Mode, Preferences, PreferencesStore, WeatherError, WeatherRecord,
    WeatherService,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::icon::IconArt;

/// Blocking message box. While one is visible, only dismissal keys are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Root state of the window. Everything the renderer needs lives here,
/// including the appearance mode.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub mode: Mode,
    /// Restored or last successfully searched query; what gets persisted.
    /// A `--city` override is displayed but never lands here.
    pub location: String,
    pub record: Option<WeatherRecord>,
    pub icon: Option<IconArt>,
    /// `None` when the last forecast request failed.
    pub forecast: Option<Vec<ForecastEntry>>,
    /// Search box contents; `Some` while the box is open.
    pub search: Option<String>,
    /// City currently being fetched.
    pub loading: Option<String>,
    pub notice: Option<Notice>,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Search(String),
    Quit,
}

#[derive(Debug)]
pub struct App<S> {
    service: S,
    store: PreferencesStore,
    state: AppState,
}

impl<S: WeatherService> App<S> {
    /// Restores mode and last city from the store. Never fails.
    pub fn new(service: S, store: PreferencesStore) -> Self {
        let prefs = store.load();
        info!(mode = %prefs.mode, last_location = %prefs.last_location, "Preferences restored");

        let state = AppState {
            mode: prefs.mode,
            location: prefs.last_location,
            ..AppState::default()
        };

        Self { service, store, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Initial load for the restored city (or `city_override`). No fallback on failure.
    pub async fn start(&mut self, city_override: Option<String>) {
        let city = city_override.unwrap_or_else(|| self.state.location.clone());

        if let Err(e) = self.load(&city).await {
            warn!(%city, "Initial weather load failed: {e}");
            self.state.notice = Some(Notice {
                title: "Weather Error".into(),
                message: format!("Unable to load weather for '{city}': {e}"),
            });
        }
    }

    /// Fetch `query` and, on success, remember it as the last location.
    pub async fn search(&mut self, query: &str) -> bool {
        let query = query.trim().to_string();

        match self.load(&query).await {
            Ok(()) => {
                self.state.location = query;
                self.persist();
                true
            }
            Err(e) => {
                warn!(%query, "Search failed: {e}");
                self.state.notice = Some(Notice {
                    title: "Weather Error".into(),
                    message: format!("Could not load weather for '{query}': {e}"),
                });
                false
            }
        }
    }

    /// Flip Light/Dark and persist. Does not refetch.
    pub fn toggle_mode(&mut self) {
        self.state.mode = self.state.mode.toggled();
        info!(mode = %self.state.mode, "Appearance mode changed");
        self.persist();
    }

    pub fn open_search(&mut self) {
        self.state.search = Some(String::new());
    }

    pub fn close_search(&mut self) {
        self.state.search = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.state.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_notice();
            }
            return Action::None;
        }

        if let Some(buffer) = self.state.search.as_mut() {
            match key.code {
                KeyCode::Char(c) => buffer.push(c),
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Esc => self.close_search(),
                KeyCode::Enter => {
                    let query = buffer.trim().to_string();
                    self.close_search();
                    if !query.is_empty() {
                        self.state.loading = Some(query.clone());
                        return Action::Search(query);
                    }
                }
                _ => {}
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.open_search();
                Action::None
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.toggle_mode();
                Action::None
            }
            _ => Action::None,
        }
    }

    async fn load(&mut self, city: &str) -> Result<(), WeatherError> {
        self.state.loading = Some(city.to_string());
        let result = self.fetch_all(city).await;
        self.state.loading = None;

        let (record, icon, forecast) = result?;
        self.state.record = Some(record);
        self.state.icon = Some(icon);
        self.state.forecast = forecast;
        Ok(())
    }

    async fn fetch_all(
        &self,
        city: &str,
    ) -> Result<(WeatherRecord, IconArt, Option<Vec<ForecastEntry>>), WeatherError> {
        let record = self.service.fetch_weather(city).await?;

        let icon = match self.service.fetch_icon(&record.weather_icon).await {
            Some(bytes) => IconArt::from_png(&bytes),
            None => None,
        }
        .unwrap_or_else(|| IconArt::fallback(&record.weather_icon));

        let forecast = match self.service.fetch_forecast_at(&record.location()).await {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(%city, "Forecast unavailable: {e}");
                None
            }
        };

        Ok((record, icon, forecast))
    }

    fn persist(&self) {
        let prefs = Preferences {
            mode: self.state.mode,
            last_location: self.state.location.clone(),
        };

        if let Err(e) = self.store.save(&prefs) {
            warn!("Could not save preferences: {e:#}");
        }
    }
}
