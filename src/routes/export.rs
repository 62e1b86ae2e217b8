use crate::{
    data::EntityKind,
    error::{AcademiaResult, CsvFlushSnafu, CsvSnafu, ExportUnavailableSnafu},
    routes::screen::Screen,
    state::AcademiaState,
};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::ResultExt;

///headers come from the first row's field names
pub fn write_csv<'a, T: Serialize + 'a>(
    rows: impl IntoIterator<Item = &'a T>,
) -> AcademiaResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for row in rows {
        writer.serialize(row).context(CsvSnafu)?;
    }
    writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context(CsvFlushSnafu)
}

///a failed load leaves nothing trustworthy to export
fn ensure_exportable(load_error: Option<&str>, kind: EntityKind) -> AcademiaResult<()> {
    match load_error {
        Some(message) => ExportUnavailableSnafu {
            kind,
            message: message.to_string(),
        }
        .fail(),
        None => Ok(()),
    }
}

pub async fn get_export_csv<S: Screen>(State(state): State<AcademiaState>) -> AcademiaResult<Response> {
    let mut container = S::container(&state).lock().await;
    if !container.is_loaded() || container.error().is_some() {
        container.load(state.api()).await;
    }
    ensure_exportable(container.error(), S::KIND)?;

    let bytes = write_csv(container.records())?;
    info!(kind = ?S::KIND, n = container.records().len(), "Exported collection");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", S::KIND.path()),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::testing::MockBackend,
        container::{DeleteMode, EntityContainer},
        data::instructor::Instructor,
        error::AcademiaError,
    };

    #[tokio::test]
    async fn failed_loads_are_not_exported() {
        let backend = MockBackend::new();
        backend.fail(EntityKind::Instructors);
        let mut container = EntityContainer::<Instructor>::new(DeleteMode::Hard);
        container.load(&backend).await;

        assert!(container.is_loaded());
        assert!(matches!(
            ensure_exportable(container.error(), EntityKind::Instructors),
            Err(AcademiaError::ExportUnavailable { kind: EntityKind::Instructors, .. })
        ));

        backend.recover(EntityKind::Instructors);
        container.load(&backend).await;
        assert!(ensure_exportable(container.error(), EntityKind::Instructors).is_ok());
    }

    #[test]
    fn instructors_export_with_headers() {
        let instructors = vec![
            Instructor {
                id: 1,
                nome: "Carla Souza".into(),
                especialidade: Some("Musculação".into()),
                telefone: None,
                email: "carla@example.com".into(),
            },
            Instructor {
                id: 2,
                nome: "Pedro, o Grande".into(),
                especialidade: None,
                telefone: Some("11 99999-0000".into()),
                email: "pedro@example.com".into(),
            },
        ];

        let csv = String::from_utf8(write_csv(&instructors).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,nome,especialidade,telefone,email"));
        assert_eq!(lines.next(), Some("1,Carla Souza,Musculação,,carla@example.com"));
        assert_eq!(lines.next(), Some("2,\"Pedro, o Grande\",,11 99999-0000,pedro@example.com"));
    }

    #[test]
    fn nothing_to_export_is_empty() {
        let none: Vec<Instructor> = vec![];
        let csv = write_csv(&none).unwrap();
        assert!(csv.is_empty());
    }
}
