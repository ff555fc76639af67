//! Wire types for the navigation and instance config endpoints.
//!
//! These are read-only projections of backend state. Nothing here is
//! validated beyond what serde needs to decode it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Timezone applied to a schedule when no config exists yet.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// A node in the compartment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compartment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ocid: String,
}

/// A compute instance belonging to one compartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ocid: String,
    #[serde(default)]
    pub region: String,
    /// Opaque backend label (e.g. RUNNING, STOPPED). Displayed, never interpreted.
    #[serde(default)]
    pub lifecycle_state: String,
}

/// One point in the compartment tree as computed by the server.
///
/// `breadcrumb` is ordered root-to-current and is empty exactly when
/// `current_compartment` is `None` (the root level).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLevel {
    #[serde(default)]
    pub current_compartment: Option<Compartment>,
    #[serde(default)]
    pub breadcrumb: Vec<Compartment>,
    #[serde(default)]
    pub child_compartments: Vec<Compartment>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl NavigationLevel {
    /// Returns true if this level is the root of the tree.
    pub fn is_root(&self) -> bool {
        self.current_compartment.is_none()
    }

    /// Returns true if breadcrumb and current compartment agree on whether
    /// this is the root level.
    pub fn is_consistent(&self) -> bool {
        self.breadcrumb.is_empty() == self.current_compartment.is_none()
    }
}

/// Day-of-week code used by the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "MON", alias = "mon")]
    Mon,
    #[serde(rename = "TUE", alias = "tue")]
    Tue,
    #[serde(rename = "WED", alias = "wed")]
    Wed,
    #[serde(rename = "THU", alias = "thu")]
    Thu,
    #[serde(rename = "FRI", alias = "fri")]
    Fri,
    #[serde(rename = "SAT", alias = "sat")]
    Sat,
    #[serde(rename = "SUN", alias = "sun")]
    Sun,
}

impl Weekday {
    /// All days in calendar order, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Wire code (`MON`..`SUN`).
    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
            Weekday::Sat => "SAT",
            Weekday::Sun => "SUN",
        }
    }

    /// Short label shown on the day toggles.
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Mon => "Seg",
            Weekday::Tue => "Ter",
            Weekday::Wed => "Qua",
            Weekday::Thu => "Qui",
            Weekday::Fri => "Sex",
            Weekday::Sat => "Sáb",
            Weekday::Sun => "Dom",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a weekday code cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid weekday code '{0}' (expected one of MON, TUE, WED, THU, FRI, SAT, SUN)")]
pub struct ParseWeekdayError(pub String);

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseWeekdayError(trimmed.to_string()))
    }
}

/// Automated start/stop schedule for one instance.
///
/// Always written back whole; the backend does not receive partial updates
/// from this client. On decode, a `null` field takes the same value as a
/// missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub instance_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default = "default_timezone", deserialize_with = "timezone_or_default")]
    pub timezone: String,
    /// `HH:MM`.
    #[serde(default, deserialize_with = "time_of_day")]
    pub start_time: Option<String>,
    /// `HH:MM`.
    #[serde(default, deserialize_with = "time_of_day")]
    pub stop_time: Option<String>,
    /// Insertion order is preserved; not normalised to calendar order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub days_of_week: Vec<Weekday>,
    /// Whether the backend holds a persisted record (`configurado`).
    /// Read-only; never sent back.
    #[serde(default, rename = "configurado", skip_serializing)]
    pub configured: Option<bool>,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn timezone_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_timezone))
}

/// Accepts `HH:MM` and `HH:MM:SS`, keeping only hour and minute.
fn time_of_day<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|mut time| {
        if time.len() > 5 && time.as_bytes()[5] == b':' {
            time.truncate(5);
        }
        time
    }))
}

impl InstanceConfig {
    /// Returns true if the backend reported that nothing is stored for this
    /// instance and the body only carries its defaults.
    pub fn is_unconfigured(&self) -> bool {
        self.configured == Some(false)
    }

    /// The draft used when an instance has no schedule yet.
    pub fn default_for(instance_id: impl Into<String>) -> Self {
        Self {
            id: None,
            instance_id: instance_id.into(),
            enabled: false,
            timezone: default_timezone(),
            start_time: None,
            stop_time: None,
            days_of_week: Vec::new(),
            configured: None,
        }
    }

    /// Add `day` if absent, remove it if present.
    pub fn toggle_day(&mut self, day: Weekday) {
        if let Some(pos) = self.days_of_week.iter().position(|d| *d == day) {
            self.days_of_week.remove(pos);
        } else {
            self.days_of_week.push(day);
        }
    }
}

/// Value produced for a `204 No Content` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Health endpoint body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn navigation_level_decodes_with_missing_lists() {
        let level: NavigationLevel =
            serde_json::from_str(r#"{"current_compartment": null}"#).unwrap();
        assert!(level.is_root());
        assert!(level.is_consistent());
        assert!(level.child_compartments.is_empty());
        assert!(level.instances.is_empty());
    }

    #[test]
    fn navigation_level_flags_inconsistent_breadcrumb() {
        let level = NavigationLevel {
            current_compartment: None,
            breadcrumb: vec![Compartment {
                id: "c1".to_string(),
                name: "Prod".to_string(),
                ocid: String::new(),
            }],
            ..Default::default()
        };
        assert!(!level.is_consistent());
    }

    #[rstest]
    #[case("MON", Weekday::Mon)]
    #[case("tue", Weekday::Tue)]
    #[case(" Sun ", Weekday::Sun)]
    fn weekday_parses_case_insensitively(#[case] input: &str, #[case] expected: Weekday) {
        assert_eq!(input.parse::<Weekday>().unwrap(), expected);
    }

    #[test]
    fn weekday_rejects_unknown_code() {
        let err = "MONDAY".parse::<Weekday>().unwrap_err();
        assert_eq!(err.0, "MONDAY");
    }

    #[test]
    fn instance_config_accepts_lowercase_days_and_configurado() {
        let cfg: InstanceConfig = serde_json::from_str(
            r#"{
                "instance_id": "i1",
                "enabled": true,
                "timezone": "UTC",
                "start_time": "08:00",
                "stop_time": "19:00",
                "days_of_week": ["mon", "FRI"],
                "configurado": true
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.days_of_week, vec![Weekday::Mon, Weekday::Fri]);
        assert_eq!(cfg.configured, Some(true));
    }

    #[test]
    fn instance_config_treats_nulls_as_missing() {
        let cfg: InstanceConfig = serde_json::from_str(
            r#"{
                "instance_id": "i1",
                "enabled": null,
                "timezone": null,
                "start_time": null,
                "stop_time": null,
                "days_of_week": null,
                "managed": false,
                "configurado": false
            }"#,
        )
        .unwrap();
        assert!(cfg.is_unconfigured());
        assert_eq!(
            InstanceConfig {
                configured: None,
                ..cfg
            },
            InstanceConfig::default_for("i1")
        );
    }

    #[test]
    fn instance_config_keeps_stored_times_next_to_null_lists() {
        let cfg: InstanceConfig = serde_json::from_str(
            r#"{
                "instance_id": "i1",
                "timezone": "UTC",
                "start_time": "08:00:00",
                "stop_time": "19:30",
                "days_of_week": null,
                "configurado": true
            }"#,
        )
        .unwrap();
        assert!(!cfg.is_unconfigured());
        assert!(!cfg.enabled);
        assert_eq!(cfg.timezone, "UTC");
        assert_eq!(cfg.start_time.as_deref(), Some("08:00"));
        assert_eq!(cfg.stop_time.as_deref(), Some("19:30"));
        assert!(cfg.days_of_week.is_empty());
    }

    #[test]
    fn instance_config_serializes_without_read_only_fields() {
        let cfg = InstanceConfig::default_for("i1");
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "instance_id": "i1",
                "enabled": false,
                "timezone": "America/Sao_Paulo",
                "start_time": null,
                "stop_time": null,
                "days_of_week": []
            })
        );
    }

    #[test]
    fn toggle_day_keeps_click_order() {
        let mut cfg = InstanceConfig::default_for("i1");
        cfg.toggle_day(Weekday::Fri);
        cfg.toggle_day(Weekday::Mon);
        assert_eq!(cfg.days_of_week, vec![Weekday::Fri, Weekday::Mon]);
        cfg.toggle_day(Weekday::Fri);
        assert_eq!(cfg.days_of_week, vec![Weekday::Mon]);
    }
}
