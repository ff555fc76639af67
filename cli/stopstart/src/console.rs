//! Interactive console driver.
//!
//! The driver turns operator actions into [`App`] transitions and runs the
//! resulting requests as spawned tasks. Results come back over a channel and
//! are applied in arrival order; the tickets inside [`App`] decide which of
//! them still matter.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use stopstart_api::{ConsoleApi, InstanceConfig, NavigationLevel, RequestError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::{parse_action, Action, HELP};
use crate::app::{App, NavigationRequest};
use crate::form::{ConfigForm, ConfigLoadRequest, ConfigSaveRequest, SaveOutcome};
use crate::output::success_line;
use crate::seq::Ticket;
use crate::view::{self, LOADING_CONFIG};

/// Result of a request, tagged with the ticket it was issued under.
#[derive(Debug)]
pub enum Completion {
    Navigation(Ticket, Result<NavigationLevel, RequestError>),
    ConfigLoaded(Ticket, Result<InstanceConfig, RequestError>),
    ConfigSaved(Ticket, Result<InstanceConfig, RequestError>),
}

/// What applying a completion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Superseded by a later request; state untouched.
    Stale,
    /// State changed.
    Updated,
    /// A save succeeded and the form closed.
    Saved(InstanceConfig),
}

/// What handling an action asks of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Show this message to the operator.
    Notice(String),
    Quit,
}

const NO_FORM: &str = "Nenhuma configuração aberta.";
const FORM_OPEN: &str = "Feche a configuração antes de navegar (cancel/close).";
const SAVE_IN_FLIGHT: &str = "Salvando... aguarde.";

/// Console session bound to one backend.
pub struct Console<A> {
    api: Arc<A>,
    app: App,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<A: ConsoleApi + 'static> Console<A> {
    /// Start a session at the root level. Must be called inside a tokio
    /// runtime; the root load is dispatched immediately.
    pub fn start(api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (app, request) = App::new();
        let mut console = Self {
            api,
            app,
            tx,
            rx,
            in_flight: 0,
        };
        console.dispatch_navigation(request);
        console
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Number of requests whose results have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn dispatch_navigation(&mut self, request: NavigationRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = api
                .fetch_navigation_level(request.compartment_id.as_deref())
                .await;
            let _ = tx.send(Completion::Navigation(request.ticket, result));
        });
    }

    fn dispatch_config_load(&mut self, request: ConfigLoadRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = api.fetch_instance_config(&request.instance_id).await;
            let _ = tx.send(Completion::ConfigLoaded(request.ticket, result));
        });
    }

    fn dispatch_config_save(&mut self, request: ConfigSaveRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = api
                .save_instance_config(&request.instance_id, &request.config)
                .await;
            let _ = tx.send(Completion::ConfigSaved(request.ticket, result));
        });
    }

    fn edit_form(&mut self, f: impl FnOnce(&mut ConfigForm) -> bool) -> Outcome {
        let Some(form) = self.app.config_form_mut() else {
            return Outcome::Notice(NO_FORM.to_string());
        };
        if f(form) {
            Outcome::Continue
        } else {
            Outcome::Notice(LOADING_CONFIG.to_string())
        }
    }

    fn navigate(
        &mut self,
        select: impl FnOnce(&mut App) -> Option<NavigationRequest>,
    ) -> Outcome {
        if self.app.config_modal_open() {
            return Outcome::Notice(FORM_OPEN.to_string());
        }
        match select(&mut self.app) {
            Some(request) => {
                self.dispatch_navigation(request);
                Outcome::Continue
            }
            None => Outcome::Notice("Posição fora da lista.".to_string()),
        }
    }

    /// Apply one operator action.
    pub fn handle_action(&mut self, action: Action) -> Outcome {
        debug!(?action, "Handling action");
        match action {
            Action::Root => self.navigate(|app| Some(app.select_compartment(None))),
            Action::Crumb(n) => self.navigate(|app| {
                let id = app.crumb_at(n)?.id.clone();
                Some(app.select_compartment(Some(id)))
            }),
            Action::Enter(n) => self.navigate(|app| {
                let id = app.child_at(n)?.id.clone();
                Some(app.enter_compartment(id))
            }),
            Action::Refresh => self.navigate(|app| Some(app.refresh())),
            Action::Configure(n) => {
                if self.app.config_modal_open() {
                    return Outcome::Notice(FORM_OPEN.to_string());
                }
                let Some(instance) = self.app.instance_at(n).cloned() else {
                    return Outcome::Notice("Posição fora da lista.".to_string());
                };
                let request = self.app.open_config(instance);
                self.dispatch_config_load(request);
                Outcome::Continue
            }
            Action::SetEnabled(enabled) => self.edit_form(|form| form.set_enabled(enabled)),
            Action::Timezone(tz) => self.edit_form(|form| form.set_timezone(tz)),
            Action::StartTime(time) => self.edit_form(|form| form.set_start_time(time)),
            Action::StopTime(time) => self.edit_form(|form| form.set_stop_time(time)),
            Action::ToggleDay(day) => self.edit_form(|form| form.toggle_day(day)),
            Action::Save => {
                let Some(form) = self.app.config_form() else {
                    return Outcome::Notice(NO_FORM.to_string());
                };
                if form.is_saving() {
                    return Outcome::Notice(SAVE_IN_FLIGHT.to_string());
                }
                match self.app.submit_config() {
                    Some(request) => {
                        self.dispatch_config_save(request);
                        Outcome::Continue
                    }
                    None => Outcome::Notice(LOADING_CONFIG.to_string()),
                }
            }
            Action::Cancel => {
                if !self.app.config_modal_open() {
                    return Outcome::Notice(NO_FORM.to_string());
                }
                if self.app.cancel_config() {
                    Outcome::Continue
                } else {
                    Outcome::Notice(SAVE_IN_FLIGHT.to_string())
                }
            }
            Action::Close => {
                self.app.close_config();
                Outcome::Continue
            }
            Action::Help => Outcome::Notice(HELP.to_string()),
            Action::Quit => Outcome::Quit,
        }
    }

    /// Apply one completion to the session.
    pub fn apply(&mut self, completion: Completion) -> Applied {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Navigation(ticket, result) => {
                if self.app.apply_navigation(ticket, result) {
                    Applied::Updated
                } else {
                    Applied::Stale
                }
            }
            Completion::ConfigLoaded(ticket, result) => {
                if self.app.apply_config_loaded(ticket, result) {
                    Applied::Updated
                } else {
                    Applied::Stale
                }
            }
            Completion::ConfigSaved(ticket, result) => {
                match self.app.apply_config_saved(ticket, result) {
                    Some(SaveOutcome::Saved(saved)) => Applied::Saved(saved),
                    Some(SaveOutcome::Failed) => Applied::Updated,
                    None => Applied::Stale,
                }
            }
        }
    }

    /// Wait for the next completion and apply it.
    pub async fn step(&mut self) -> Option<Applied> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.step().await.is_some() {}
    }

    /// Render the current screen.
    pub fn render(&self) -> String {
        view::render_app(&self.app)
    }

    /// Run the interactive loop until `quit` or end of input.
    pub async fn run<R, W>(mut self, input: R, mut out: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        writeln!(out, "{}", self.render())?;
        writeln!(out, "{}", "Digite 'help' para ver os comandos.".dimmed())?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_action(&line) {
                        Ok(None) => continue,
                        Ok(Some(action)) => match self.handle_action(action) {
                            Outcome::Quit => break,
                            Outcome::Notice(message) => writeln!(out, "{}", message.yellow())?,
                            Outcome::Continue => {}
                        },
                        Err(err) => {
                            writeln!(out, "{}", err.to_string().yellow())?;
                            continue;
                        }
                    }
                    writeln!(out, "{}", self.render())?;
                }
                Some(completion) = self.rx.recv() => {
                    match self.apply(completion) {
                        Applied::Stale => continue,
                        Applied::Updated => {}
                        Applied::Saved(saved) => {
                            let message =
                                format!("configuração de {} salva.", saved.instance_id);
                            writeln!(out, "{}", success_line(&message))?;
                        }
                    }
                    writeln!(out, "{}", self.render())?;
                }
            }
            out.flush()?;
        }

        Ok(())
    }
}
