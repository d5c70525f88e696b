use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::config::Config;
use crate::contact::Contact;
use crate::filter::ContactFilter;
use crate::remote::{ContactSource, FetchError, Scope};
use crate::route::RouteMarker;
use crate::session::{ListKind, ListSession};

use super::draw;

/// How long the event loop sleeps between input polls. Bounds how late a
/// debounce deadline or fetch result can be picked up.
const TICK: Duration = Duration::from_millis(100);

/// Detail popup: a snapshot of one contact, taken when it was selected.
/// It stays valid even if the list underneath refetches or refilters.
#[derive(Debug, Clone)]
pub struct DetailModal {
    pub contact: Contact,
}

/// Which part of the list popup receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Input,
    Results,
}

/// Result of one spawned page fetch, tagged with the session and page it
/// was requested for.
#[derive(Debug)]
pub struct FetchOutcome {
    pub session_id: u64,
    pub kind: ListKind,
    pub page: u32,
    pub result: Result<Vec<Contact>, FetchError>,
}

/// Install a panic hook that restores the terminal
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

pub struct App<S: ContactSource> {
    source: Arc<S>,
    config: Config,
    route: RouteMarker,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    next_session_id: u64,
    /// Open list popup, if any.
    pub list: Option<ListSession>,
    /// Detail popup, independent of the list underneath it.
    pub detail: Option<DetailModal>,
    /// Country query, shared by both list popups.
    pub search_input: Input,
    /// Even-ids-only flag, shared by both list popups.
    pub only_even: bool,
    pub search_focus: SearchFocus,
    /// When the debounced filter recomputation is due.
    filter_deadline: Option<Instant>,
    /// Selected entry on the home screen (0 = all, 1 = country).
    pub home_cursor: usize,
}

impl<S: ContactSource + 'static> App<S> {
    pub fn new(source: S, config: Config) -> Self {
        let route = RouteMarker::new(&config.data_dir);
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            config,
            route,
            outcome_tx,
            outcome_rx,
            next_session_id: 0,
            list: None,
            detail: None,
            search_input: Input::default(),
            only_even: false,
            search_focus: SearchFocus::Input,
            filter_deadline: None,
            home_cursor: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        // The process is the popup's lifetime; leave no marker behind
        if let Err(err) = self.route.clear() {
            warn!(error = %err, "failed to clear route marker on exit");
        }

        result
    }

    async fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
    {
        loop {
            // Apply finished fetches before drawing
            while let Ok(outcome) = self.outcome_rx.try_recv() {
                self.on_fetch_outcome(outcome);
            }
            self.poll_filter_deadline();

            draw::render(terminal, self)?;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key)? {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Key routing
    // =========================================================================

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Ctrl+C always quits (hardcoded for safety)
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Ok(true);
        }

        // The detail popup sits on top of everything and swallows keys
        if self.detail.is_some() {
            self.handle_detail_key(key);
            return Ok(false);
        }

        // Popup launchers work from the home screen and from either popup
        match key.code {
            KeyCode::F(2) => {
                self.open_list(ListKind::All);
                return Ok(false);
            }
            KeyCode::F(3) => {
                self.open_list(ListKind::Country);
                return Ok(false);
            }
            _ => {}
        }

        if self.list.is_some() {
            self.handle_list_key(key);
            return Ok(false);
        }

        self.handle_home_key(key)
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                self.home_cursor = (self.home_cursor + 1) % 2;
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                self.home_cursor = if self.home_cursor == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                let kind = if self.home_cursor == 0 {
                    ListKind::All
                } else {
                    ListKind::Country
                };
                self.open_list(kind);
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        // Only-even toggle works in both focuses
        if key.code == KeyCode::F(4) {
            self.toggle_only_even();
            return;
        }

        match self.search_focus {
            SearchFocus::Input => self.handle_list_input_key(key),
            SearchFocus::Results => self.handle_list_results_key(key),
        }
    }

    fn handle_list_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.close_list();
                return;
            }
            // Confirm applies the query without waiting out the debounce
            KeyCode::Enter => {
                self.filter_deadline = None;
                self.refresh_filter();
                self.search_focus = SearchFocus::Results;
                return;
            }
            KeyCode::Tab => {
                self.search_focus = SearchFocus::Results;
                return;
            }
            KeyCode::Down => {
                self.move_list_cursor(1);
                return;
            }
            KeyCode::Up => {
                self.move_list_cursor(-1);
                return;
            }
            KeyCode::PageDown => {
                self.move_list_cursor(5);
                return;
            }
            KeyCode::PageUp => {
                self.move_list_cursor(-5);
                return;
            }
            _ => {}
        }

        // Everything else edits the query
        if let Some(change) = self.search_input.handle_event(&Event::Key(key)) {
            if change.value {
                self.schedule_filter();
            }
        }
    }

    fn handle_list_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_list(),
            KeyCode::Char('/') => self.search_focus = SearchFocus::Input,
            KeyCode::Enter => self.open_detail(),
            KeyCode::Char('e') => self.toggle_only_even(),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.move_list_cursor(1),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.move_list_cursor(-1),
            KeyCode::PageDown => self.move_list_cursor(5),
            KeyCode::PageUp => self.move_list_cursor(-5),
            KeyCode::Home => {
                if let Some(session) = self.list.as_mut() {
                    session.select_first();
                }
            }
            KeyCode::End => {
                if let Some(session) = self.list.as_mut() {
                    session.select_last();
                }
                self.maybe_fetch_next_page();
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
            self.detail = None;
        }
    }

    // =========================================================================
    // Popup lifecycle
    // =========================================================================

    /// Open a list popup, or switch to the other one. Every open starts a
    /// fresh session: empty list, top scroll, page 1 on its way. The shared
    /// query and only-even flag are left as they are.
    pub fn open_list(&mut self, kind: ListKind) {
        if let Some(session) = &self.list {
            if session.kind == kind {
                return;
            }
        }

        self.detail = None;
        self.next_session_id += 1;
        let mut session = ListSession::new(kind, self.next_session_id);
        session.refresh_filter(&self.current_filter());
        self.list = Some(session);
        self.search_focus = SearchFocus::Input;

        if let Err(err) = self.route.set(kind) {
            warn!(error = %err, "failed to write route marker");
        }

        self.start_fetch(1);
    }

    fn close_list(&mut self) {
        self.list = None;
        self.filter_deadline = None;
        if let Err(err) = self.route.clear() {
            warn!(error = %err, "failed to clear route marker");
        }
    }

    fn open_detail(&mut self) {
        let Some(contact) = self
            .list
            .as_ref()
            .and_then(|session| session.selected_contact())
        else {
            return;
        };
        self.detail = Some(DetailModal {
            contact: contact.clone(),
        });
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Spawn a fetch for one page of the open session. The outcome comes
    /// back through the channel tagged with the session id, so results
    /// landing after a close or switch are recognized and dropped.
    fn start_fetch(&mut self, page: u32) {
        let Some(session) = self.list.as_mut() else {
            return;
        };
        if session.loading {
            return;
        }
        session.loading = true;

        let scope = match session.kind {
            ListKind::All => Scope::All,
            ListKind::Country => Scope::Country(self.config.ui.country.clone()),
        };
        let session_id = session.id;
        let kind = session.kind;
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(&scope, page).await;
            // A closed receiver just means the app is shutting down
            let _ = tx.send(FetchOutcome {
                session_id,
                kind,
                page,
                result,
            });
        });
    }

    fn on_fetch_outcome(&mut self, outcome: FetchOutcome) {
        let filter = self.current_filter();
        let page_size = self.config.api.page_size;

        let Some(session) = self.list.as_mut() else {
            debug!(
                session = outcome.session_id,
                page = outcome.page,
                "dropping fetch outcome, popup closed"
            );
            return;
        };
        if session.id != outcome.session_id {
            debug!(
                session = outcome.session_id,
                current = session.id,
                page = outcome.page,
                "dropping stale fetch outcome"
            );
            return;
        }

        match outcome.result {
            Ok(batch) => {
                session.apply_page(outcome.page, batch, page_size);
                session.refresh_filter(&filter);
            }
            Err(err) => {
                // Failures surface only in the log; the popup keeps
                // whatever it already shows
                session.fetch_failed();
                warn!(
                    error = %err,
                    page = outcome.page,
                    kind = ?outcome.kind,
                    "contact page fetch failed"
                );
            }
        }
    }

    /// Ask for the next page when the viewport sits at the end of the
    /// filtered view and the collection is not exhausted.
    fn maybe_fetch_next_page(&mut self) {
        let Some(session) = &self.list else {
            return;
        };
        if session.loading || !session.has_more || !session.at_bottom() {
            return;
        }
        let page = session.next_page();
        self.start_fetch(page);
    }

    fn move_list_cursor(&mut self, delta: isize) {
        if let Some(session) = self.list.as_mut() {
            session.move_cursor(delta);
        }
        if delta > 0 {
            self.maybe_fetch_next_page();
        }
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    fn current_filter(&self) -> ContactFilter {
        ContactFilter {
            query: self.search_input.value().to_string(),
            only_even: self.only_even,
        }
    }

    /// Arm the debounce timer; the recomputation runs once typing pauses.
    fn schedule_filter(&mut self) {
        self.filter_deadline = Some(Instant::now() + self.config.ui.debounce);
    }

    fn poll_filter_deadline(&mut self) {
        if let Some(deadline) = self.filter_deadline {
            if Instant::now() >= deadline {
                self.filter_deadline = None;
                self.refresh_filter();
            }
        }
    }

    fn refresh_filter(&mut self) {
        let filter = self.current_filter();
        if let Some(session) = self.list.as_mut() {
            session.refresh_filter(&filter);
        }
    }

    fn toggle_only_even(&mut self) {
        self.only_even = !self.only_even;
        self.refresh_filter();
    }

    // =========================================================================
    // Bits for the draw layer
    // =========================================================================

    /// Header mirror of the route marker, e.g. `modal=B`.
    pub fn route_display(&self) -> Option<String> {
        self.list
            .as_ref()
            .map(|session| format!("modal={}", session.kind.marker_letter()))
    }

    pub fn list_title(&self) -> Option<String> {
        self.list
            .as_ref()
            .map(|session| session.kind.title(&self.config.ui.country))
    }

    /// Country scope the second popup is configured for.
    pub fn country(&self) -> &str {
        &self.config.ui.country
    }

    /// Filter state the query applies against right now (typing may still
    /// be ahead of it).
    pub fn filter_pending(&self) -> bool {
        self.filter_deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{ContactPage, Country};
    use async_trait::async_trait;
    use std::path::Path;

    const TOTAL_CONTACTS: i64 = 25;
    const PAGE_SIZE: i64 = 10;

    /// Serves 25 contacts in pages of 10. Country names depend on the
    /// scope so tests can tell which request produced a batch.
    struct ScriptedSource;

    #[async_trait]
    impl ContactSource for ScriptedSource {
        async fn fetch_page(&self, scope: &Scope, page: u32) -> Result<Vec<Contact>, FetchError> {
            let country = match scope {
                Scope::All => "Peru".to_string(),
                Scope::Country(name) => name.clone(),
            };
            let start = (page as i64 - 1) * PAGE_SIZE;
            let end = (start + PAGE_SIZE).min(TOTAL_CONTACTS);
            Ok((start..end)
                .map(|id| Contact {
                    id,
                    country: Some(Country {
                        name: country.clone(),
                    }),
                    phone: format!("+{}", id),
                })
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ContactSource for FailingSource {
        async fn fetch_page(&self, _scope: &Scope, _page: u32) -> Result<Vec<Contact>, FetchError> {
            let err = serde_json::from_str::<ContactPage>("<html>").unwrap_err();
            Err(FetchError::Decode(err))
        }
    }

    fn test_config(data_dir: &Path) -> Config {
        crate::config::load(Some(&write_config(data_dir))).unwrap()
    }

    fn write_config(data_dir: &Path) -> std::path::PathBuf {
        let path = data_dir.join("config.toml");
        std::fs::write(
            &path,
            format!("data_dir = {:?}\n[ui]\ndebounce_ms = 300\n", data_dir),
        )
        .unwrap();
        path
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App<ScriptedSource>, text: &str) {
        for ch in text.chars() {
            app.handle_key(key(KeyCode::Char(ch))).unwrap();
        }
    }

    /// Wait for one spawned fetch and feed it back into the state machine.
    async fn pump_outcome<S: ContactSource + 'static>(app: &mut App<S>) {
        let outcome = app.outcome_rx.recv().await.unwrap();
        app.on_fetch_outcome(outcome);
    }

    #[tokio::test]
    async fn test_open_fetches_first_page_and_writes_marker() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        let session = app.list.as_ref().unwrap();
        assert!(session.loading);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("route")).unwrap(),
            "modal=A\n"
        );

        pump_outcome(&mut app).await;
        let session = app.list.as_ref().unwrap();
        assert!(!session.loading);
        assert_eq!(session.contacts.len(), 10);
        assert_eq!(session.page, 1);
        assert!(session.has_more);
        assert_eq!(session.filtered.len(), 10);
    }

    #[tokio::test]
    async fn test_scrolling_to_the_end_pages_onward() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;

        // Viewport covers the whole first page, so one step down at the
        // bottom requests page 2
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::End)).unwrap();
        assert!(app.list.as_ref().unwrap().loading);
        pump_outcome(&mut app).await;

        let session = app.list.as_ref().unwrap();
        assert_eq!(session.contacts.len(), 20);
        assert_eq!(session.page, 2);
        assert!(session.has_more);
    }

    #[tokio::test]
    async fn test_short_page_stops_pagination() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::End)).unwrap();
        pump_outcome(&mut app).await;
        app.handle_key(key(KeyCode::End)).unwrap();
        pump_outcome(&mut app).await;

        let session = app.list.as_ref().unwrap();
        assert_eq!(session.contacts.len(), 25);
        assert!(!session.has_more);

        // Nothing more to ask for
        app.handle_key(key(KeyCode::End)).unwrap();
        assert!(!app.list.as_ref().unwrap().loading);
    }

    #[tokio::test]
    async fn test_switching_popups_drops_the_stale_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        app.open_list(ListKind::Country);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("route")).unwrap(),
            "modal=B\n"
        );

        // Both fetches complete; only the current session's page may land
        pump_outcome(&mut app).await;
        pump_outcome(&mut app).await;

        let session = app.list.as_ref().unwrap();
        assert_eq!(session.kind, ListKind::Country);
        assert_eq!(session.contacts.len(), 10);
        assert!(session
            .contacts
            .iter()
            .all(|c| c.country_name() == Some("United States")));
    }

    #[tokio::test]
    async fn test_closing_clears_marker_and_ignores_late_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.list.is_none());
        assert!(!dir.path().join("route").exists());

        // The in-flight page arrives after the close
        pump_outcome(&mut app).await;
        assert!(app.list.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_loading_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(FailingSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;

        let session = app.list.as_ref().unwrap();
        assert!(!session.loading);
        assert!(session.contacts.is_empty());
        assert!(session.has_more);
        assert_eq!(session.page, 0);
        // The popup is still open and usable
        assert_eq!(app.list.as_ref().unwrap().kind, ListKind::All);
    }

    #[tokio::test]
    async fn test_typing_waits_for_the_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;

        type_str(&mut app, "nowhere");
        // Deadline armed, view not narrowed yet
        assert!(app.filter_pending());
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 10);

        // Confirm applies immediately
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!app.filter_pending());
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 0);
        assert_eq!(app.search_focus, SearchFocus::Results);
    }

    #[tokio::test]
    async fn test_debounce_deadline_fires_on_poll() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;

        type_str(&mut app, "peru");
        app.filter_deadline = Some(Instant::now() - Duration::from_millis(1));
        app.poll_filter_deadline();
        assert!(!app.filter_pending());
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 10);
    }

    #[tokio::test]
    async fn test_only_even_toggle_is_immediate_and_shared() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;

        app.handle_key(key(KeyCode::F(4))).unwrap();
        assert!(app.only_even);
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 5);

        // Still on after a popup switch
        app.handle_key(key(KeyCode::F(3))).unwrap();
        assert!(app.only_even);
        pump_outcome(&mut app).await;
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 5);

        app.handle_key(key(KeyCode::F(4))).unwrap();
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 10);
    }

    #[tokio::test]
    async fn test_query_growth_refilters_new_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;

        type_str(&mut app, "peru");
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 10);

        // A new page lands while the query is active; the view follows
        app.handle_key(key(KeyCode::End)).unwrap();
        pump_outcome(&mut app).await;
        assert_eq!(app.list.as_ref().unwrap().filtered.len(), 20);
    }

    #[tokio::test]
    async fn test_detail_opens_and_closes_over_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;

        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.detail.as_ref().unwrap().contact.id, 1);

        // Keys go to the detail popup, not the list
        app.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(app.list.as_ref().unwrap().cursor, 1);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.detail.is_none());
        assert!(app.list.is_some());
    }

    #[tokio::test]
    async fn test_reopen_starts_a_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::End)).unwrap();
        pump_outcome(&mut app).await;
        let first_id = app.list.as_ref().unwrap().id;
        assert_eq!(app.list.as_ref().unwrap().contacts.len(), 20);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        app.open_list(ListKind::All);

        let session = app.list.as_ref().unwrap();
        assert_ne!(session.id, first_id);
        assert!(session.contacts.is_empty());
        assert_eq!(session.cursor, 0);
        assert_eq!(session.scroll, 0);
        assert_eq!(session.page, 0);
    }

    #[tokio::test]
    async fn test_reopening_the_same_popup_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(ScriptedSource, test_config(dir.path()));

        app.open_list(ListKind::All);
        pump_outcome(&mut app).await;
        let id = app.list.as_ref().unwrap().id;

        app.handle_key(key(KeyCode::F(2))).unwrap();
        let session = app.list.as_ref().unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.contacts.len(), 10);
    }
}
