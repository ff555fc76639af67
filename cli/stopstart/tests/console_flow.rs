//! Console flow tests.
//!
//! Drive [`Console`] against an in-memory backend and check what the operator
//! would see and which requests reach the API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use stopstart_api::{
    Compartment, ConsoleApi, Instance, InstanceConfig, NavigationLevel, RequestError, Weekday,
};
use stopstart_cli::action::Action;
use stopstart_cli::view::{render_app, NO_INSTANCES};
use stopstart_cli::{Applied, Console, Outcome};

fn compartment(id: &str, name: &str) -> Compartment {
    Compartment {
        id: id.to_string(),
        name: name.to_string(),
        ocid: format!("ocid1.compartment.oc1..{id}"),
    }
}

fn instance(id: &str, name: &str) -> Instance {
    Instance {
        id: id.to_string(),
        name: name.to_string(),
        ocid: format!("ocid1.instance.oc1..{id}"),
        region: "sa-saopaulo-1".to_string(),
        lifecycle_state: "RUNNING".to_string(),
    }
}

/// In-memory backend recording every call.
#[derive(Default)]
struct MockApi {
    levels: HashMap<Option<String>, NavigationLevel>,
    configs: Mutex<HashMap<String, InstanceConfig>>,
    nav_delays: HashMap<Option<String>, Duration>,
    save_failure: Mutex<Option<(u16, String)>>,
    nav_calls: Mutex<Vec<Option<String>>>,
    config_fetches: Mutex<Vec<String>>,
    saves: Mutex<Vec<(String, InstanceConfig)>>,
}

impl MockApi {
    /// Root holds Prod and Dev; Prod holds web-01, Dev holds db-01.
    fn tree() -> Self {
        let mut levels = HashMap::new();
        levels.insert(
            None,
            NavigationLevel {
                current_compartment: None,
                breadcrumb: vec![],
                child_compartments: vec![compartment("c1", "Prod"), compartment("c2", "Dev")],
                instances: vec![],
            },
        );
        levels.insert(
            Some("c1".to_string()),
            NavigationLevel {
                current_compartment: Some(compartment("c1", "Prod")),
                breadcrumb: vec![compartment("c1", "Prod")],
                child_compartments: vec![],
                instances: vec![instance("i1", "web-01")],
            },
        );
        levels.insert(
            Some("c2".to_string()),
            NavigationLevel {
                current_compartment: Some(compartment("c2", "Dev")),
                breadcrumb: vec![compartment("c2", "Dev")],
                child_compartments: vec![],
                instances: vec![instance("i2", "db-01")],
            },
        );

        let mut stored = InstanceConfig::default_for("i2");
        stored.id = Some("cfg-2".to_string());
        stored.enabled = true;
        stored.timezone = "UTC".to_string();
        stored.start_time = Some("08:00".to_string());
        stored.stop_time = Some("20:00".to_string());
        stored.days_of_week = vec![Weekday::Mon, Weekday::Wed];
        stored.configured = Some(true);

        Self {
            levels,
            configs: Mutex::new(HashMap::from([("i2".to_string(), stored)])),
            ..Default::default()
        }
    }

    fn with_delay(mut self, compartment_id: &str, delay: Duration) -> Self {
        self.nav_delays
            .insert(Some(compartment_id.to_string()), delay);
        self
    }

    fn fail_saves(&self, status: u16, body: &str) {
        *self.save_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    fn clear_save_failure(&self) {
        *self.save_failure.lock().unwrap() = None;
    }

    fn nav_calls(&self) -> Vec<Option<String>> {
        self.nav_calls.lock().unwrap().clone()
    }

    fn config_fetches(&self) -> Vec<String> {
        self.config_fetches.lock().unwrap().clone()
    }

    fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }
}

fn not_found() -> RequestError {
    RequestError::Status {
        status: 404,
        message: "Not Found".to_string(),
    }
}

#[async_trait]
impl ConsoleApi for MockApi {
    async fn fetch_navigation_level(
        &self,
        compartment_id: Option<&str>,
    ) -> Result<NavigationLevel, RequestError> {
        let key = compartment_id.map(str::to_string);
        self.nav_calls.lock().unwrap().push(key.clone());

        if let Some(delay) = self.nav_delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        self.levels.get(&key).cloned().ok_or_else(not_found)
    }

    async fn fetch_instance_config(
        &self,
        instance_id: &str,
    ) -> Result<InstanceConfig, RequestError> {
        self.config_fetches
            .lock()
            .unwrap()
            .push(instance_id.to_string());
        self.configs
            .lock()
            .unwrap()
            .get(instance_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn save_instance_config(
        &self,
        instance_id: &str,
        config: &InstanceConfig,
    ) -> Result<InstanceConfig, RequestError> {
        self.saves
            .lock()
            .unwrap()
            .push((instance_id.to_string(), config.clone()));

        if let Some((status, body)) = self.save_failure.lock().unwrap().clone() {
            return Err(RequestError::Status {
                status,
                message: body,
            });
        }

        let mut saved = config.clone();
        saved.id = Some(format!("cfg-{instance_id}"));
        saved.configured = Some(true);
        self.configs
            .lock()
            .unwrap()
            .insert(instance_id.to_string(), saved.clone());
        Ok(saved)
    }
}

async fn started(api: Arc<MockApi>) -> Console<MockApi> {
    colored::control::set_override(false);
    let mut console = Console::start(api);
    console.settle().await;
    console
}

#[tokio::test]
async fn each_selection_issues_exactly_one_fetch_with_its_id() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(Arc::clone(&api)).await;
    assert_eq!(api.nav_calls(), vec![None]);

    assert_eq!(console.handle_action(Action::Enter(1)), Outcome::Continue);
    console.settle().await;
    assert_eq!(api.nav_calls(), vec![None, Some("c1".to_string())]);
    assert_eq!(console.app().current_compartment_id(), Some("c1"));

    assert_eq!(console.handle_action(Action::Crumb(1)), Outcome::Continue);
    console.settle().await;
    assert_eq!(console.handle_action(Action::Root), Outcome::Continue);
    console.settle().await;

    assert_eq!(
        api.nav_calls(),
        vec![
            None,
            Some("c1".to_string()),
            Some("c1".to_string()),
            None
        ]
    );

    let level = console.app().level().unwrap();
    assert!(level.current_compartment.is_none());
    assert!(level.breadcrumb.is_empty());
}

#[tokio::test]
async fn root_screen_lists_children_and_empty_instances() {
    let api = Arc::new(MockApi::tree());
    let console = started(api).await;

    let screen = render_app(console.app());
    assert!(screen.contains("Raiz"));
    assert!(screen.contains("Prod"));
    assert!(screen.contains("Entrar"));
    assert!(screen.contains(NO_INSTANCES));
    assert!(!screen.contains("Carregando"));
}

#[tokio::test]
async fn out_of_range_position_issues_no_fetch() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(Arc::clone(&api)).await;

    console.handle_action(Action::Enter(1));
    console.settle().await;
    assert!(console.app().child_compartments().is_empty());

    assert_eq!(
        console.handle_action(Action::Enter(1)),
        Outcome::Notice("Posição fora da lista.".to_string())
    );
    assert_eq!(console.in_flight(), 0);
    assert_eq!(api.nav_calls().len(), 2);
    assert_eq!(console.app().current_compartment_id(), Some("c1"));
}

#[tokio::test]
async fn last_requested_level_wins_over_last_response() {
    let api = Arc::new(MockApi::tree().with_delay("c1", Duration::from_millis(50)));
    let mut console = started(Arc::clone(&api)).await;

    console.handle_action(Action::Enter(1));
    console.handle_action(Action::Enter(2));
    assert_eq!(console.in_flight(), 2);

    let first = console.step().await;
    let second = console.step().await;
    assert_eq!(first, Some(Applied::Updated));
    assert_eq!(second, Some(Applied::Stale));

    let app = console.app();
    assert_eq!(app.current_compartment_id(), Some("c2"));
    assert_eq!(app.breadcrumb()[0].name, "Dev");
    assert!(!app.is_loading());
}

#[tokio::test]
async fn missing_config_opens_default_draft() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(Arc::clone(&api)).await;
    console.handle_action(Action::Enter(1));
    console.settle().await;

    assert_eq!(console.handle_action(Action::Configure(1)), Outcome::Continue);
    assert!(console.app().config_form().unwrap().is_loading());
    console.settle().await;

    assert_eq!(api.config_fetches(), vec!["i1".to_string()]);
    let form = console.app().config_form().unwrap();
    assert_eq!(form.draft(), Some(&InstanceConfig::default_for("i1")));
    assert_eq!(form.error(), None);

    let screen = render_app(console.app());
    assert!(screen.contains("Configuração – web-01"));
    assert!(screen.contains("[ ] Habilitar automação"));
    assert!(screen.contains("Timezone: America/Sao_Paulo"));
    assert!(screen.contains("Horário de Start: --:--"));
    assert!(screen.contains("Horário de Stop: --:--"));
    assert!(screen.contains("[ ] MON Seg"));
}

#[tokio::test]
async fn stored_config_is_loaded_into_draft() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(Arc::clone(&api)).await;
    console.handle_action(Action::Enter(2));
    console.settle().await;
    console.handle_action(Action::Configure(1));
    console.settle().await;

    let draft = console.app().config_form().unwrap().draft().unwrap().clone();
    assert!(draft.enabled);
    assert_eq!(draft.timezone, "UTC");
    assert_eq!(draft.days_of_week, vec![Weekday::Mon, Weekday::Wed]);

    let screen = render_app(console.app());
    assert!(screen.contains("[x] MON Seg"));
    assert!(screen.contains("[ ] TUE Ter"));
    assert!(screen.contains("[x] WED Qua"));
}

#[tokio::test]
async fn failed_save_keeps_form_then_retry_closes_it() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(Arc::clone(&api)).await;
    console.handle_action(Action::Enter(1));
    console.settle().await;
    console.handle_action(Action::Configure(1));
    console.settle().await;

    console.handle_action(Action::SetEnabled(true));
    console.handle_action(Action::StartTime(Some("07:00".to_string())));
    console.handle_action(Action::ToggleDay(Weekday::Fri));
    let draft = console.app().config_form().unwrap().draft().unwrap().clone();

    api.fail_saves(500, "db error");
    assert_eq!(console.handle_action(Action::Save), Outcome::Continue);
    let form = console.app().config_form().unwrap();
    assert!(form.is_saving());
    assert!(!form.can_submit());
    assert!(!form.can_cancel());
    assert!(matches!(
        console.handle_action(Action::Cancel),
        Outcome::Notice(_)
    ));

    assert_eq!(console.step().await, Some(Applied::Updated));
    let form = console.app().config_form().unwrap();
    assert!(console.app().config_modal_open());
    assert_eq!(form.draft(), Some(&draft));
    let error = form.error().unwrap();
    assert!(error.contains("500"));
    assert!(error.contains("db error"));
    assert!(render_app(console.app()).contains("db error"));

    api.clear_save_failure();
    console.handle_action(Action::Save);
    match console.step().await {
        Some(Applied::Saved(saved)) => {
            assert_eq!(saved.instance_id, "i1");
            assert!(saved.enabled);
            assert_eq!(saved.days_of_week, vec![Weekday::Fri]);
        }
        other => panic!("unexpected step result: {other:?}"),
    }
    assert!(!console.app().config_modal_open());
    assert!(console.app().selected_instance().is_none());
    assert_eq!(api.save_count(), 2);
}

#[tokio::test]
async fn cancel_and_close_never_save() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(Arc::clone(&api)).await;
    console.handle_action(Action::Enter(1));
    console.settle().await;

    console.handle_action(Action::Configure(1));
    console.settle().await;
    console.handle_action(Action::Timezone("Europe/Lisbon".to_string()));
    assert_eq!(console.handle_action(Action::Cancel), Outcome::Continue);
    assert!(!console.app().config_modal_open());

    console.handle_action(Action::Configure(1));
    console.settle().await;
    console.handle_action(Action::SetEnabled(true));
    assert_eq!(console.handle_action(Action::Close), Outcome::Continue);
    assert!(!console.app().config_modal_open());

    assert_eq!(api.save_count(), 0);
    assert_eq!(api.config_fetches().len(), 2);
}

#[tokio::test]
async fn open_form_blocks_navigation() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(Arc::clone(&api)).await;
    console.handle_action(Action::Enter(1));
    console.settle().await;
    console.handle_action(Action::Configure(1));
    console.settle().await;

    assert!(matches!(
        console.handle_action(Action::Root),
        Outcome::Notice(_)
    ));
    assert_eq!(api.nav_calls().len(), 2);
}

#[tokio::test]
async fn form_edits_without_open_form_are_rejected() {
    let api = Arc::new(MockApi::tree());
    let mut console = started(api).await;
    assert_eq!(
        console.handle_action(Action::SetEnabled(true)),
        Outcome::Notice("Nenhuma configuração aberta.".to_string())
    );
    assert!(matches!(
        console.handle_action(Action::Save),
        Outcome::Notice(_)
    ));
}

#[tokio::test]
async fn interactive_loop_renders_and_quits() {
    let api = Arc::new(MockApi::tree());
    colored::control::set_override(false);
    let console = Console::start(api);

    let input = tokio::io::BufReader::new(&b"help\nbogus\nquit\n"[..]);
    let mut out = Vec::new();
    console.run(input, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Stop/Start OCI - Gerenciador de Instâncias"));
    assert!(text.contains("Navegação:"));
    assert!(text.contains("comando desconhecido 'bogus'"));
}
