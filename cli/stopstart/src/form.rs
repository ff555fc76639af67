//! Schedule configuration form.
//!
//! The form holds a local draft of an instance's [`InstanceConfig`]. Edits
//! only touch the draft; the backend sees it only when the whole draft is
//! submitted.

use chrono::NaiveTime;
use stopstart_api::{Instance, InstanceConfig, RequestError, Weekday};
use thiserror::Error;
use tracing::{debug, warn};

use crate::seq::Ticket;

/// Format of start/stop times on the wire and in the form.
pub const TIME_FORMAT: &str = "%H:%M";

/// Request to fetch the schedule for the instance a form was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLoadRequest {
    pub ticket: Ticket,
    pub instance_id: String,
}

/// Request to write a draft back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSaveRequest {
    pub ticket: Ticket,
    pub instance_id: String,
    pub config: InstanceConfig,
}

/// Result of applying a save response to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend accepted the draft; the form should close.
    Saved(InstanceConfig),
    /// The save failed; the form stays open with the draft and an error.
    Failed,
}

/// Error for a time value typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("horário inválido '{0}' (use HH:MM)")]
pub struct TimeInputError(pub String);

/// Parse a time field as typed by the operator.
///
/// Empty input or `-` clears the field. Anything else must be `HH:MM` and is
/// returned normalised to two-digit hour and minute.
pub fn parse_time_input(input: &str) -> Result<Option<String>, TimeInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(None);
    }

    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .map(|t| Some(t.format(TIME_FORMAT).to_string()))
        .map_err(|_| TimeInputError(trimmed.to_string()))
}

/// Edit state for one instance's schedule.
#[derive(Debug, Clone)]
pub struct ConfigForm {
    instance: Instance,
    /// `None` while the initial fetch is in flight.
    draft: Option<InstanceConfig>,
    saving: bool,
    error: Option<String>,
    /// Ticket of the fetch or save this form is waiting on.
    pending: Option<Ticket>,
}

impl ConfigForm {
    /// Open a form for `instance`, waiting on the load identified by `ticket`.
    pub(crate) fn open(instance: Instance, ticket: Ticket) -> (Self, ConfigLoadRequest) {
        let request = ConfigLoadRequest {
            ticket,
            instance_id: instance.id.clone(),
        };
        let form = Self {
            instance,
            draft: None,
            saving: false,
            error: None,
            pending: Some(ticket),
        };
        (form, request)
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn draft(&self) -> Option<&InstanceConfig> {
        self.draft.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.draft.is_none()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Inline error from the last failed save.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.draft.is_some() && !self.saving
    }

    /// Whether the cancel control is enabled.
    pub fn can_cancel(&self) -> bool {
        !self.saving
    }

    /// Returns true if `ticket` is the request this form is waiting on.
    pub(crate) fn is_pending(&self, ticket: Ticket) -> bool {
        self.pending == Some(ticket)
    }

    /// Apply the initial fetch.
    ///
    /// Any failure falls back to the default draft and is not shown to the
    /// operator. Only a 404 is expected here; other failures are logged.
    pub(crate) fn apply_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<InstanceConfig, RequestError>,
    ) -> bool {
        if !self.is_pending(ticket) || self.draft.is_some() {
            debug!(%ticket, instance_id = %self.instance.id, "Dropping stale config load");
            return false;
        }
        self.pending = None;

        let draft = match result {
            Ok(mut config) => {
                config.instance_id = self.instance.id.clone();
                config
            }
            Err(err) if err.is_not_found() => {
                debug!(instance_id = %self.instance.id, "No config yet, using default draft");
                InstanceConfig::default_for(&self.instance.id)
            }
            Err(err) => {
                warn!(
                    instance_id = %self.instance.id,
                    error = %err,
                    "Config fetch failed, using default draft"
                );
                InstanceConfig::default_for(&self.instance.id)
            }
        };

        self.draft = Some(draft);
        true
    }

    fn edit(&mut self, f: impl FnOnce(&mut InstanceConfig)) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                f(draft);
                true
            }
            None => false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.edit(|d| d.enabled = enabled)
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) -> bool {
        let timezone = timezone.into();
        self.edit(|d| d.timezone = timezone)
    }

    pub fn set_start_time(&mut self, time: Option<String>) -> bool {
        self.edit(|d| d.start_time = time)
    }

    pub fn set_stop_time(&mut self, time: Option<String>) -> bool {
        self.edit(|d| d.stop_time = time)
    }

    /// Add or remove `day` from the draft's active days.
    pub fn toggle_day(&mut self, day: Weekday) -> bool {
        self.edit(|d| d.toggle_day(day))
    }

    /// Start saving the draft under `ticket`.
    ///
    /// Returns `None` while loading or already saving. The draft is sent
    /// as-is; no cross-field checks are made.
    pub(crate) fn begin_submit(&mut self, ticket: Ticket) -> Option<ConfigSaveRequest> {
        if !self.can_submit() {
            return None;
        }
        let config = self.draft.clone()?;

        self.saving = true;
        self.error = None;
        self.pending = Some(ticket);

        Some(ConfigSaveRequest {
            ticket,
            instance_id: self.instance.id.clone(),
            config,
        })
    }

    /// Apply a save response. Returns `None` for a stale response.
    pub(crate) fn apply_saved(
        &mut self,
        ticket: Ticket,
        result: Result<InstanceConfig, RequestError>,
    ) -> Option<SaveOutcome> {
        if !self.saving || !self.is_pending(ticket) {
            debug!(%ticket, instance_id = %self.instance.id, "Dropping stale config save");
            return None;
        }
        self.pending = None;
        self.saving = false;

        match result {
            Ok(saved) => Some(SaveOutcome::Saved(saved)),
            Err(err) => {
                warn!(instance_id = %self.instance.id, error = %err, "Config save failed");
                self.error = Some(err.to_string());
                Some(SaveOutcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::Sequencer;
    use rstest::rstest;

    fn instance() -> Instance {
        Instance {
            id: "i1".to_string(),
            name: "web-01".to_string(),
            ocid: "ocid1.instance.i1".to_string(),
            region: "sa-saopaulo-1".to_string(),
            lifecycle_state: "RUNNING".to_string(),
        }
    }

    fn loaded_form(seq: &mut Sequencer) -> ConfigForm {
        let ticket = seq.issue();
        let (mut form, _) = ConfigForm::open(instance(), ticket);
        let err = RequestError::Status {
            status: 404,
            message: "Instance config not found".to_string(),
        };
        assert!(form.apply_loaded(ticket, Err(err)));
        form
    }

    #[rstest]
    #[case("08:30", Some("08:30"))]
    #[case("8:05", Some("08:05"))]
    #[case("", None)]
    #[case(" - ", None)]
    fn time_input_parses(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            parse_time_input(input).unwrap(),
            expected.map(str::to_string)
        );
    }

    #[rstest]
    #[case("25:00")]
    #[case("noon")]
    #[case("08:30:00")]
    fn time_input_rejects_garbage(#[case] input: &str) {
        assert!(parse_time_input(input).is_err());
    }

    #[test]
    fn load_failure_yields_default_draft() {
        let mut seq = Sequencer::new();
        let ticket = seq.issue();
        let (mut form, request) = ConfigForm::open(instance(), ticket);
        assert_eq!(request.instance_id, "i1");
        assert!(form.is_loading());

        let err = RequestError::Decode("connection reset".to_string());
        assert!(form.apply_loaded(ticket, Err(err)));

        assert_eq!(form.draft(), Some(&InstanceConfig::default_for("i1")));
        assert_eq!(form.error(), None);
    }

    #[test]
    fn loaded_config_is_bound_to_the_opened_instance() {
        let mut seq = Sequencer::new();
        let ticket = seq.issue();
        let (mut form, _) = ConfigForm::open(instance(), ticket);

        let mut fetched = InstanceConfig::default_for("other");
        fetched.enabled = true;
        assert!(form.apply_loaded(ticket, Ok(fetched)));

        let draft = form.draft().unwrap();
        assert_eq!(draft.instance_id, "i1");
        assert!(draft.enabled);
    }

    #[test]
    fn stored_schedule_with_null_fields_keeps_its_times() {
        let mut seq = Sequencer::new();
        let ticket = seq.issue();
        let (mut form, _) = ConfigForm::open(instance(), ticket);

        let fetched: InstanceConfig = serde_json::from_str(
            r#"{
                "instance_id": "i1",
                "enabled": null,
                "timezone": "UTC",
                "start_time": "08:00:00",
                "stop_time": "20:00:00",
                "days_of_week": null,
                "configurado": true
            }"#,
        )
        .unwrap();
        assert!(form.apply_loaded(ticket, Ok(fetched)));

        let request = form.begin_submit(seq.issue()).unwrap();
        assert!(!request.config.enabled);
        assert_eq!(request.config.timezone, "UTC");
        assert_eq!(request.config.start_time.as_deref(), Some("08:00"));
        assert_eq!(request.config.stop_time.as_deref(), Some("20:00"));
        assert!(request.config.days_of_week.is_empty());
    }

    #[test]
    fn edits_are_ignored_while_loading() {
        let mut seq = Sequencer::new();
        let (mut form, _) = ConfigForm::open(instance(), seq.issue());
        assert!(!form.set_enabled(true));
        assert!(!form.toggle_day(Weekday::Mon));
        assert!(!form.can_submit());
        assert!(form.begin_submit(seq.issue()).is_none());
    }

    #[test]
    fn toggling_a_day_twice_restores_membership() {
        let mut seq = Sequencer::new();
        let mut form = loaded_form(&mut seq);
        form.toggle_day(Weekday::Tue);
        let before: Vec<Weekday> = form.draft().unwrap().days_of_week.clone();

        form.toggle_day(Weekday::Sat);
        form.set_timezone("UTC");
        form.set_start_time(Some("07:00".to_string()));
        form.toggle_day(Weekday::Sat);

        let after = &form.draft().unwrap().days_of_week;
        assert_eq!(after.len(), before.len());
        assert!(before.iter().all(|d| after.contains(d)));
    }

    #[test]
    fn saving_disables_controls_and_failure_keeps_draft() {
        let mut seq = Sequencer::new();
        let mut form = loaded_form(&mut seq);
        form.set_enabled(true);
        form.toggle_day(Weekday::Wed);
        let draft = form.draft().cloned().unwrap();

        let ticket = seq.issue();
        let request = form.begin_submit(ticket).unwrap();
        assert_eq!(request.config, draft);
        assert!(form.is_saving());
        assert!(!form.can_submit());
        assert!(!form.can_cancel());
        assert!(form.begin_submit(seq.issue()).is_none());

        let err = RequestError::Status {
            status: 500,
            message: "db error".to_string(),
        };
        assert_eq!(form.apply_saved(ticket, Err(err)), Some(SaveOutcome::Failed));
        assert!(!form.is_saving());
        assert_eq!(form.draft(), Some(&draft));
        let error = form.error().unwrap();
        assert!(error.contains("500"));
        assert!(error.contains("db error"));
    }

    #[test]
    fn stale_save_response_is_dropped() {
        let mut seq = Sequencer::new();
        let mut form = loaded_form(&mut seq);
        let ticket = seq.issue();
        form.begin_submit(ticket).unwrap();

        let other = seq.issue();
        let saved = InstanceConfig::default_for("i1");
        assert_eq!(form.apply_saved(other, Ok(saved.clone())), None);
        assert_eq!(form.apply_saved(ticket, Ok(saved.clone())), Some(SaveOutcome::Saved(saved)));
    }
}
