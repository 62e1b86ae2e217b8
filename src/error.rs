use crate::data::EntityKind;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;

pub type AcademiaResult<T> = Result<T, AcademiaError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AcademiaError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Invalid value {:?} for `{}`", provided, name))]
    BadConfigValue {
        name: &'static str,
        provided: String,
    },
    #[snafu(display("Error building the HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("Erro na conexão com o servidor ({})", url))]
    Request { source: reqwest::Error, url: String },
    #[snafu(display("{} (HTTP {})", message, status.as_u16()))]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        message: String,
    },
    #[snafu(display("Resposta inválida do servidor para {}", kind.plural()))]
    Decode {
        source: serde_json::Error,
        kind: EntityKind,
    },
    #[snafu(display("Resposta do servidor sem identificador para {}", kind.singular()))]
    MissingCreatedId { kind: EntityKind },
    #[snafu(display("Unable to find {} with ID: {}", kind.singular(), id))]
    MissingRecord { kind: EntityKind, id: i64 },
    #[snafu(display("Exportação de {} indisponível: {}", kind.plural(), message))]
    ExportUnavailable { kind: EntityKind, message: String },
    #[snafu(display("Error with CSVs"))]
    Csv { source: csv::Error },
    #[snafu(display("Error flushing CSV output"))]
    CsvFlush { source: std::io::Error },
}

impl IntoResponse for AcademiaError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //backend misbehaved

        let basic_error = |desc| {
            html! {
                div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                    strong class="font-bold" {"Erro: "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::BadEnvVar { .. } | Self::BadConfigValue { .. } => ISE,
            Self::BuildClient { .. } => ISE,
            Self::Request { .. } => BG,
            Self::UnexpectedStatus { status, .. } => match *status {
                reqwest::StatusCode::NOT_FOUND => NF,
                _ => BG,
            },
            Self::Decode { .. } | Self::MissingCreatedId { .. } => BG,
            Self::MissingRecord { .. } => NF,
            Self::ExportUnavailable { .. } => BG,
            Self::Csv { .. } | Self::CsvFlush { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}
