//! Application state controller.
//!
//! [`App`] owns the session state of the console: which compartment is being
//! viewed, the last navigation level fetched for it, and the schedule form if
//! one is open. Transitions that need the backend return a request value; the
//! caller performs the I/O and hands the result back to the matching
//! `apply_*` method together with the request's ticket.
//!
//! # Invariants
//!
//! - Only the latest navigation request's result is applied; `loading`
//!   clears when it lands.
//! - A failed navigation keeps the previous level visible and does not roll
//!   back `current_compartment_id`.
//! - Config results are applied only to the form that issued them.

use stopstart_api::{Compartment, Instance, InstanceConfig, NavigationLevel, RequestError};
use tracing::{debug, info, warn};

use crate::form::{ConfigForm, ConfigLoadRequest, ConfigSaveRequest, SaveOutcome};
use crate::seq::{Sequencer, Ticket};

/// Request to fetch a navigation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub ticket: Ticket,
    /// `None` is the root level.
    pub compartment_id: Option<String>,
}

/// Console session state.
#[derive(Debug, Default)]
pub struct App {
    current_compartment_id: Option<String>,
    level: Option<NavigationLevel>,
    loading: bool,
    error: Option<String>,
    modal: Option<ConfigForm>,
    navigation_seq: Sequencer,
    config_seq: Sequencer,
}

impl App {
    /// Create the controller positioned at the root, returning the initial
    /// root load.
    pub fn new() -> (Self, NavigationRequest) {
        let mut app = Self::default();
        let request = app.select_compartment(None);
        (app, request)
    }

    pub fn current_compartment_id(&self) -> Option<&str> {
        self.current_compartment_id.as_deref()
    }

    /// The last successfully fetched level.
    pub fn level(&self) -> Option<&NavigationLevel> {
        self.level.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Page-level error from the last navigation fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn breadcrumb(&self) -> &[Compartment] {
        self.level
            .as_ref()
            .map(|l| l.breadcrumb.as_slice())
            .unwrap_or_default()
    }

    pub fn child_compartments(&self) -> &[Compartment] {
        self.level
            .as_ref()
            .map(|l| l.child_compartments.as_slice())
            .unwrap_or_default()
    }

    pub fn instances(&self) -> &[Instance] {
        self.level
            .as_ref()
            .map(|l| l.instances.as_slice())
            .unwrap_or_default()
    }

    /// Breadcrumb entry by 1-based position.
    pub fn crumb_at(&self, position: usize) -> Option<&Compartment> {
        position.checked_sub(1).and_then(|i| self.breadcrumb().get(i))
    }

    /// Child compartment by 1-based position.
    pub fn child_at(&self, position: usize) -> Option<&Compartment> {
        position
            .checked_sub(1)
            .and_then(|i| self.child_compartments().get(i))
    }

    /// Instance by 1-based position.
    pub fn instance_at(&self, position: usize) -> Option<&Instance> {
        position.checked_sub(1).and_then(|i| self.instances().get(i))
    }

    /// View `compartment_id`, or the root for `None`.
    ///
    /// Always issues a fetch, even if the compartment is already current.
    pub fn select_compartment(&mut self, compartment_id: Option<String>) -> NavigationRequest {
        let ticket = self.navigation_seq.issue();
        info!(
            %ticket,
            compartment_id = compartment_id.as_deref().unwrap_or("<root>"),
            "Selecting compartment"
        );

        self.current_compartment_id = compartment_id.clone();
        self.loading = true;
        self.error = None;

        NavigationRequest {
            ticket,
            compartment_id,
        }
    }

    /// Drill into a child compartment.
    pub fn enter_compartment(&mut self, compartment_id: impl Into<String>) -> NavigationRequest {
        self.select_compartment(Some(compartment_id.into()))
    }

    /// Refetch the current level.
    pub fn refresh(&mut self) -> NavigationRequest {
        self.select_compartment(self.current_compartment_id.clone())
    }

    /// Apply a navigation result. Returns false if the result was stale.
    pub fn apply_navigation(
        &mut self,
        ticket: Ticket,
        result: Result<NavigationLevel, RequestError>,
    ) -> bool {
        if !self.navigation_seq.is_latest(ticket) {
            debug!(%ticket, "Dropping stale navigation result");
            return false;
        }

        match result {
            Ok(level) => {
                self.level = Some(level);
            }
            Err(err) => {
                warn!(%ticket, error = %err, "Navigation fetch failed");
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
        true
    }

    /// The instance whose schedule is being edited.
    pub fn selected_instance(&self) -> Option<&Instance> {
        self.modal.as_ref().map(ConfigForm::instance)
    }

    pub fn config_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn config_form(&self) -> Option<&ConfigForm> {
        self.modal.as_ref()
    }

    /// Mutable access to the open form for field edits.
    pub fn config_form_mut(&mut self) -> Option<&mut ConfigForm> {
        self.modal.as_mut()
    }

    /// Open the schedule form for `instance`, replacing any open form.
    pub fn open_config(&mut self, instance: Instance) -> ConfigLoadRequest {
        let ticket = self.config_seq.issue();
        info!(%ticket, instance_id = %instance.id, "Opening config form");

        let (form, request) = ConfigForm::open(instance, ticket);
        self.modal = Some(form);
        request
    }

    /// Close the form without saving, discarding the draft.
    pub fn close_config(&mut self) {
        if let Some(form) = self.modal.take() {
            debug!(instance_id = %form.instance().id, "Closing config form");
        }
    }

    /// Cancel control. Disabled while a save is in flight.
    pub fn cancel_config(&mut self) -> bool {
        if self.modal.as_ref().is_some_and(ConfigForm::can_cancel) {
            self.close_config();
            true
        } else {
            false
        }
    }

    /// Apply the config fetch for the open form.
    pub fn apply_config_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<InstanceConfig, RequestError>,
    ) -> bool {
        match self.modal.as_mut() {
            Some(form) => form.apply_loaded(ticket, result),
            None => {
                debug!(%ticket, "Config load arrived after the form closed");
                false
            }
        }
    }

    /// Submit the open form's draft.
    pub fn submit_config(&mut self) -> Option<ConfigSaveRequest> {
        let form = self.modal.as_mut()?;
        if !form.can_submit() {
            return None;
        }
        let ticket = self.config_seq.issue();
        form.begin_submit(ticket)
    }

    /// Apply a save result. A successful save closes the form.
    pub fn apply_config_saved(
        &mut self,
        ticket: Ticket,
        result: Result<InstanceConfig, RequestError>,
    ) -> Option<SaveOutcome> {
        let Some(form) = self.modal.as_mut() else {
            debug!(%ticket, "Config save arrived after the form closed");
            return None;
        };

        let outcome = form.apply_saved(ticket, result)?;
        if let SaveOutcome::Saved(saved) = &outcome {
            info!(instance_id = %saved.instance_id, enabled = saved.enabled, "Config saved");
            self.modal = None;
        }
        Some(outcome)
    }
}
