//! Interactive terminal UI for tl.
//!
//! Single event loop over crossterm events plus a watcher thread that
//! reloads the store when the task file changes on disk. Every key event
//! runs to completion (mutate, persist, mark dirty) before the next one
//! is read.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;
use crate::store::TaskStore;
use crate::task::Filter;

use super::view;

const EVENT_POLL_MS: u64 = 120;
const WATCH_DEBOUNCE_MS: u64 = 200;

enum UiMsg {
    FileChanged,
    WatchError(String),
}

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: u64,
    pub(crate) text: String,
}

pub struct AppState {
    pub(crate) store: TaskStore,
    pub(crate) input: String,
    pub(crate) input_active: bool,
    pub(crate) selected: Option<u64>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    pub(crate) show_help: bool,
    info_message: Option<String>,
    status_message: Option<String>,
    watch_error: Option<String>,
}

impl AppState {
    fn new(store: TaskStore) -> Self {
        Self {
            store,
            input: String::new(),
            input_active: false,
            selected: None,
            delete_confirm: None,
            show_help: false,
            info_message: None,
            status_message: None,
            watch_error: None,
        }
    }

    /// Ids of the rows currently rendered, in order.
    pub(crate) fn visible_ids(&self) -> Vec<u64> {
        self.store.visible().iter().map(|task| task.id).collect()
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(error) = self.watch_error.as_ref() {
            return Some((error.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.delete_confirm.is_some() {
            return "y confirm delete  esc cancel".to_string();
        }
        if self.input_active {
            return "type text  enter add  esc done".to_string();
        }
        "a add  j/k move  space toggle  d delete  c clear done  1/2/3 filter  ? help  q quit"
            .to_string()
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn clear_messages(&mut self) {
        self.info_message = None;
        self.status_message = None;
    }

    /// Keep the selection on the same task across filter changes and
    /// reloads; fall back to the first visible row.
    fn fix_selection(&mut self) {
        let visible = self.visible_ids();
        self.selected = select_after_change(&visible, self.selected);
    }

    fn move_selection(&mut self, delta: isize) {
        let visible = self.visible_ids();
        if visible.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|id| visible.iter().position(|candidate| *candidate == id))
            .unwrap_or(0);
        let max = visible.len().saturating_sub(1);
        let next = (current as isize + delta).clamp(0, max as isize) as usize;
        self.selected = Some(visible[next]);
    }

    fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.fix_selection();
    }

    fn cycle_filter(&mut self) {
        let next = match self.store.filter() {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        };
        self.set_filter(next);
    }

    fn submit_input(&mut self) {
        let text = self.input.clone();
        match self.store.add_task(&text) {
            Ok(Some(task)) => {
                self.input.clear();
                self.selected = Some(task.id);
                self.set_info(format!("added task {}", task.id));
            }
            Ok(None) => {
                // empty after trimming: keep the field, nothing stored
                self.input.clear();
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected else {
            self.set_error("no task selected".to_string());
            return;
        };
        match self.store.toggle_completion(id) {
            Ok(Some(completed)) => {
                let state = if completed { "completed" } else { "active" };
                self.set_info(format!("task {id} {state}"));
                self.fix_selection();
            }
            Ok(None) => self.set_error(format!("no task with id {id}")),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn delete_confirmed(&mut self, id: u64) {
        match self.store.delete_task(id) {
            Ok(Some(task)) => {
                self.set_info(format!("removed task {}", task.id));
                self.fix_selection();
            }
            Ok(None) => self.set_error(format!("no task with id {id}")),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn clear_completed(&mut self) {
        match self.store.clear_completed() {
            Ok(removed) => {
                self.set_info(format!("cleared {removed} completed task(s)"));
                self.fix_selection();
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn reload(&mut self) {
        self.store.reload();
        self.fix_selection();
    }
}

/// Pick the selection after the visible set changed: same id if still
/// shown, else the first row.
fn select_after_change(visible: &[u64], previous: Option<u64>) -> Option<u64> {
    if visible.is_empty() {
        return None;
    }
    if let Some(id) = previous {
        if visible.contains(&id) {
            return Some(id);
        }
    }
    Some(visible[0])
}

pub fn run(store: TaskStore) -> Result<()> {
    let tasks_file = store.storage().path().to_path_buf();
    let (ui_tx, ui_rx) = mpsc::channel();
    spawn_watch(tasks_file, ui_tx);

    let mut app = AppState::new(store);
    app.fix_selection();
    run_terminal(&mut app, ui_rx)
}

fn run_terminal(app: &mut AppState, ui_rx: Receiver<UiMsg>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app, ui_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            match msg {
                UiMsg::FileChanged => app.reload(),
                UiMsg::WatchError(err) => {
                    app.watch_error = Some(format!("watch error: {err}"));
                }
            }
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => {
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.delete_confirm.is_some() {
        let confirm = app.delete_confirm.take().unwrap();
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.delete_confirmed(confirm.task_id);
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                app.set_info("cancelled".to_string());
            }
            _ => {
                app.delete_confirm = Some(confirm);
            }
        }
        return false;
    }

    if app.show_help {
        app.show_help = false;
        return false;
    }

    if app.input_active {
        match key.code {
            KeyCode::Esc => {
                app.input.clear();
                app.input_active = false;
            }
            KeyCode::Enter => {
                app.submit_input();
            }
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return false;
                }
                if !ch.is_control() {
                    app.input.push(ch);
                }
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('a') | KeyCode::Char('i') => {
            app.clear_messages();
            app.input_active = true;
            false
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
            false
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
            false
        }
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
            app.toggle_selected();
            false
        }
        KeyCode::Char('d') => {
            let Some(task) = app.selected.and_then(|id| app.store.find(id)) else {
                app.set_error("no task selected".to_string());
                return false;
            };
            app.delete_confirm = Some(DeleteConfirmState {
                task_id: task.id,
                text: task.text.clone(),
            });
            false
        }
        KeyCode::Char('c') => {
            app.clear_completed();
            false
        }
        KeyCode::Char('1') => {
            app.set_filter(Filter::All);
            false
        }
        KeyCode::Char('2') => {
            app.set_filter(Filter::Active);
            false
        }
        KeyCode::Char('3') => {
            app.set_filter(Filter::Completed);
            false
        }
        KeyCode::Tab => {
            app.cycle_filter();
            false
        }
        KeyCode::Char('r') => {
            app.reload();
            false
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            false
        }
        _ => false,
    }
}

fn spawn_watch(tasks_file: PathBuf, ui_tx: Sender<UiMsg>) {
    // Saves replace the file by rename, so watch the parent directory.
    let Some(watch_dir) = tasks_file.parent().map(|dir| dir.to_path_buf()) else {
        return;
    };
    if !watch_dir.exists() {
        return;
    }

    thread::spawn(move || {
        let (event_tx, event_rx) = mpsc::channel();
        let watcher: notify::Result<RecommendedWatcher> = notify::recommended_watcher(move |res| {
            let _ = event_tx.send(res);
        });

        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(err) => {
                let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                return;
            }
        };

        if watcher.watch(&watch_dir, RecursiveMode::NonRecursive).is_err() {
            return;
        }

        let debounce = Duration::from_millis(WATCH_DEBOUNCE_MS);
        let mut pending: Option<Instant> = None;

        loop {
            let timeout = pending
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(Duration::from_secs(3600));
            match event_rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    let relevant = event.paths.is_empty()
                        || event.paths.iter().any(|path| path == &tasks_file);
                    if relevant {
                        pending = Some(Instant::now() + debounce);
                    }
                }
                Ok(Err(err)) => {
                    let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if pending.is_some() {
                        pending = None;
                        if ui_tx.send(UiMsg::FileChanged).is_err() {
                            break;
                        }
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Storage, TASKS_FILE};
    use tempfile::TempDir;

    fn app_in(temp: &TempDir) -> AppState {
        let store = TaskStore::open(Storage::at(temp.path().join(TASKS_FILE)));
        AppState::new(store)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn select_after_change_prefers_previous_id() {
        assert_eq!(select_after_change(&[1, 2, 3], Some(2)), Some(2));
        assert_eq!(select_after_change(&[1, 2, 3], Some(9)), Some(1));
        assert_eq!(select_after_change(&[1, 2, 3], None), Some(1));
        assert_eq!(select_after_change(&[], Some(1)), None);
    }

    #[test]
    fn typing_and_enter_adds_task_and_clears_input() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        handle_key(&mut app, key(KeyCode::Char('a')));
        assert!(app.input_active);
        for ch in "Buy milk".chars() {
            handle_key(&mut app, key(KeyCode::Char(ch)));
        }
        handle_key(&mut app, key(KeyCode::Enter));

        assert!(app.input.is_empty());
        assert!(app.input_active);
        assert_eq!(app.store.total_count(), 1);
        assert_eq!(app.store.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn enter_on_blank_input_adds_nothing() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        app.input_active = true;
        handle_key(&mut app, key(KeyCode::Char(' ')));
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.store.total_count(), 0);
        assert!(app.input.is_empty());
    }

    #[test]
    fn space_toggles_selected_task() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);
        let id = app.store.add_task("One").unwrap().unwrap().id;
        app.fix_selection();

        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert!(app.store.find(id).unwrap().completed);
        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.store.find(id).unwrap().completed);
    }

    #[test]
    fn delete_requires_confirmation() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);
        app.store.add_task("Doomed").unwrap();
        app.fix_selection();

        handle_key(&mut app, key(KeyCode::Char('d')));
        assert!(app.delete_confirm.is_some());
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.store.total_count(), 1);

        handle_key(&mut app, key(KeyCode::Char('d')));
        handle_key(&mut app, key(KeyCode::Char('y')));
        assert_eq!(app.store.total_count(), 0);
        assert_eq!(app.selected, None);
    }

    #[test]
    fn filter_keys_switch_modes_and_fix_selection() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);
        let done = app.store.add_task("Done").unwrap().unwrap().id;
        let open = app.store.add_task("Open").unwrap().unwrap().id;
        app.store.toggle_completion(done).unwrap();
        app.fix_selection();

        handle_key(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.store.filter(), Filter::Active);
        assert_eq!(app.visible_ids(), vec![open]);
        assert_eq!(app.selected, Some(open));

        handle_key(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.store.filter(), Filter::Completed);
        assert_eq!(app.visible_ids(), vec![done]);
        assert_eq!(app.selected, Some(done));

        handle_key(&mut app, key(KeyCode::Char('1')));
        assert_eq!(app.store.filter(), Filter::All);
        // still on the same task after widening the filter
        assert_eq!(app.selected, Some(done));
    }

    #[test]
    fn tab_cycles_through_filters() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        assert_eq!(app.store.filter(), Filter::All);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.store.filter(), Filter::Active);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.store.filter(), Filter::Completed);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.store.filter(), Filter::All);
    }

    #[test]
    fn q_quits_but_not_while_typing() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        assert!(handle_key(&mut app, key(KeyCode::Char('q'))));

        app.input_active = true;
        assert!(!handle_key(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.input, "q");
    }
}
