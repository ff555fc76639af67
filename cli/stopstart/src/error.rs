//! Error handling and display for the CLI.

use colored::Colorize;
use stopstart_api::RequestError;
use thiserror::Error;

/// Errors raised by the one-shot commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Map a 404 to [`CliError::NotFound`] with `what` as the message.
    pub fn not_found_as(err: RequestError, what: impl Into<String>) -> Self {
        if err.is_not_found() {
            Self::NotFound(what.into())
        } else {
            Self::Request(err)
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Erro:".red().bold(), err);

    let request_err = err
        .downcast_ref::<RequestError>()
        .or_else(|| match err.downcast_ref::<CliError>() {
            Some(CliError::Request(inner)) => Some(inner),
            _ => None,
        });

    if let Some(request_err) = request_err {
        match request_err {
            RequestError::Network(_) => {
                eprintln!(
                    "\n{}",
                    "Dica: verifique se a API está acessível (--api-url ou STOPSTART_API_URL)."
                        .yellow()
                );
            }
            RequestError::Status { status: 404, .. } => {
                eprintln!("\n{}", "Dica: confira o id do compartment ou da instância.".yellow());
            }
            RequestError::Decode(_) => {
                eprintln!(
                    "\n{}",
                    "Dica: a URL da API pode não apontar para a API de agendamento."
                        .yellow()
                );
            }
            _ => {}
        }
    }
}
