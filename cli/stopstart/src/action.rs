//! Console input parsing.

use stopstart_api::{ParseWeekdayError, Weekday};
use thiserror::Error;

use crate::form::{parse_time_input, TimeInputError};

pub const HELP: &str = "\
Navegação:
  root              voltar à raiz
  crumb <n>         ir para o item <n> do breadcrumb
  enter <n>         entrar no sub-compartment <n>
  config <n>        configurar a instância <n>
  refresh           recarregar o nível atual
Configuração:
  enable | disable  habilitar/desabilitar automação
  tz <zona>         timezone IANA (ex.: America/Sao_Paulo)
  start <HH:MM|->   horário de start
  stop <HH:MM|->    horário de stop
  day <MON..SUN>    alternar dia da semana
  save              salvar
  cancel            cancelar
  close             fechar sem salvar
Geral:
  help              esta ajuda
  quit              sair";

/// One operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Root,
    Crumb(usize),
    Enter(usize),
    Configure(usize),
    Refresh,
    SetEnabled(bool),
    Timezone(String),
    StartTime(Option<String>),
    StopTime(Option<String>),
    ToggleDay(Weekday),
    Save,
    Cancel,
    Close,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("comando desconhecido '{0}' (digite 'help')")]
    Unknown(String),

    #[error("'{0}' precisa de um argumento")]
    MissingArgument(&'static str),

    #[error("posição inválida '{0}'")]
    InvalidPosition(String),

    #[error(transparent)]
    InvalidDay(#[from] ParseWeekdayError),

    #[error(transparent)]
    InvalidTime(#[from] TimeInputError),
}

fn position(command: &'static str, arg: Option<&str>) -> Result<usize, ActionError> {
    let arg = arg.ok_or(ActionError::MissingArgument(command))?;
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ActionError::InvalidPosition(arg.to_string())),
    }
}

/// Parse one line of input. Blank lines yield `None`.
pub fn parse_action(line: &str) -> Result<Option<Action>, ActionError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "root" | "raiz" => Action::Root,
        "crumb" => Action::Crumb(position("crumb", rest)?),
        "enter" | "entrar" => Action::Enter(position("enter", rest)?),
        "config" | "configurar" => Action::Configure(position("config", rest)?),
        "refresh" => Action::Refresh,
        "enable" => Action::SetEnabled(true),
        "disable" => Action::SetEnabled(false),
        "tz" | "timezone" => {
            Action::Timezone(rest.ok_or(ActionError::MissingArgument("tz"))?.to_string())
        }
        "start" => Action::StartTime(parse_time_input(rest.unwrap_or(""))?),
        "stop" => Action::StopTime(parse_time_input(rest.unwrap_or(""))?),
        "day" => Action::ToggleDay(rest.ok_or(ActionError::MissingArgument("day"))?.parse()?),
        "save" | "salvar" => Action::Save,
        "cancel" | "cancelar" => Action::Cancel,
        "close" => Action::Close,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(ActionError::Unknown(other.to_string())),
    };

    Ok(Some(action))
}
