//! Export of completed analyses as downloadable documents.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::{analyses, analysis, research_projects};
use entity::analysis_status::AnalysisStatus;
use entity_api::Id;
use log::*;
use sea_orm::DatabaseConnection;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_query(format: &str) -> Option<Self> {
        match format {
            "pdf" => Some(ExportFormat::Pdf),
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// A rendered export ready to be written to the response.
#[derive(Debug)]
pub struct ExportDocument {
    pub content_type: &'static str,
    pub file_name: String,
    pub body: Vec<u8>,
}

/// Renders a completed analysis in the requested format. Incomplete
/// analyses cannot be exported.
pub async fn export(
    db: &DatabaseConnection,
    user_id: Id,
    analysis_id: Id,
    format: ExportFormat,
) -> Result<ExportDocument, Error> {
    let (analysis_model, project) = analysis::find_with_project(db, analysis_id, user_id).await?;

    if analysis_model.status != AnalysisStatus::Completed {
        debug!("Analysis {} is not completed, refusing export", analysis_id);
        return Err(Error::new(DomainErrorKind::Internal(
            InternalErrorKind::Entity(EntityErrorKind::Invalid),
        )));
    }

    match format {
        ExportFormat::Pdf => Ok(render_report(&project, &analysis_model)),
        ExportFormat::Csv => Ok(render_csv(&analysis_model)),
        ExportFormat::Json => render_json(&project, &analysis_model),
    }
}

// Plain-text report served with a PDF content type, mirroring what the
// frontend download flow expects. Real PDF rendering is a separate concern.
fn render_report(project: &research_projects::Model, analysis: &analyses::Model) -> ExportDocument {
    let mut content = format!(
        "\nRESEARCH ANALYSIS REPORT\n\
         ========================\n\n\
         Title: {}\n\
         Description: {}\n\
         Research Type: {}\n\
         Hypothesis: {}\n\n\
         RESEARCH VARIABLES\n\
         ------------------\n\
         Independent: {:?}\n\
         Dependent: {:?}\n\n\
         ANALYSIS RESULTS\n\
         ----------------\n",
        project.title,
        project.description,
        project.research_type,
        project.hypothesis,
        project.variables.independent,
        project.variables.dependent,
    );

    for (i, result) in analysis.results.0.iter().enumerate() {
        let _ = write!(
            content,
            "\n{}. {}\n   Interpretation: {}\n   Conclusion: {}\n",
            i + 1,
            result.method,
            result.interpretation,
            result.conclusion
        );
    }

    let completed_at = analysis
        .completed_at
        .map(|at| at.to_rfc3339())
        .unwrap_or_default();
    let _ = write!(
        content,
        "\n\nSUMMARY\n-------\n{}\n\n---\nCreated at: {}\nIteration: {}\n",
        analysis.summary.as_deref().unwrap_or_default(),
        completed_at,
        analysis.iteration
    );

    ExportDocument {
        content_type: "application/pdf",
        file_name: format!("analysis_report_{}.pdf", analysis.id),
        body: content.into_bytes(),
    }
}

fn render_csv(analysis: &analyses::Model) -> ExportDocument {
    let mut rows = vec![csv_row(&["Method", "Interpretation", "Conclusion", "Effect Size"])];

    for result in &analysis.results.0 {
        rows.push(csv_row(&[
            &result.method,
            &result.interpretation,
            &result.conclusion,
            result.effect_size.as_deref().unwrap_or_default(),
        ]));
    }

    let mut body = rows.join("\n");
    body.push('\n');

    ExportDocument {
        content_type: "text/csv",
        file_name: format!("analysis_results_{}.csv", analysis.id),
        body: body.into_bytes(),
    }
}

fn render_json(
    project: &research_projects::Model,
    analysis: &analyses::Model,
) -> Result<ExportDocument, Error> {
    let export_data = serde_json::json!({
        "project": {
            "id": project.id,
            "title": project.title,
            "description": project.description,
            "research_type": project.research_type,
            "hypothesis": project.hypothesis,
            "variables": project.variables,
        },
        "analysis": {
            "id": analysis.id,
            "iteration": analysis.iteration,
            "status": analysis.status,
            "results": analysis.results,
            "summary": analysis.summary,
            "created_at": analysis.created_at,
            "completed_at": analysis.completed_at,
        },
    });

    let body = serde_json::to_vec_pretty(&export_data).map_err(|err| Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "Failed to generate JSON export".to_string(),
        )),
    })?;

    Ok(ExportDocument {
        content_type: "application/json",
        file_name: format!("analysis_export_{}.json", analysis.id),
        body,
    })
}

fn csv_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::analysis_payloads::{MethodResult, MethodResults};
    use entity::Id;

    fn project() -> research_projects::Model {
        let now = chrono::Utc::now();
        research_projects::Model {
            id: Id::new_v4(),
            user_id: Id::new_v4(),
            title: "Sleep and memory".to_string(),
            description: "Effect of sleep duration on recall".to_string(),
            research_type: "experimental".to_string(),
            hypothesis: "More sleep improves recall".to_string(),
            variables: Default::default(),
            status: Default::default(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn completed_analysis(project_id: Id) -> analyses::Model {
        let now = chrono::Utc::now();
        analyses::Model {
            id: Id::new_v4(),
            project_id,
            upload_id: None,
            iteration: 1,
            status: AnalysisStatus::Completed,
            recommendations: Default::default(),
            selected_methods: Default::default(),
            results: MethodResults(vec![MethodResult {
                method: "t-test".to_string(),
                raw_output: None,
                interpretation: "Groups differ, p < .05".to_string(),
                effect_size: Some("d = 0.8".to_string()),
                conclusion: "Reject the null hypothesis".to_string(),
            }]),
            figures: Default::default(),
            summary: Some("The experiment worked".to_string()),
            user_feedback: None,
            error_message: None,
            created_at: now.into(),
            completed_at: Some(now.into()),
            updated_at: now.into(),
        }
    }

    #[test]
    fn from_query_rejects_unknown_formats() {
        assert_eq!(ExportFormat::from_query("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_query("xlsx"), None);
    }

    #[test]
    fn report_includes_project_and_results() {
        let project = project();
        let analysis = completed_analysis(project.id);

        let document = render_report(&project, &analysis);
        let content = String::from_utf8(document.body).unwrap();

        assert!(content.contains("RESEARCH ANALYSIS REPORT"));
        assert!(content.contains("Title: Sleep and memory"));
        assert!(content.contains("1. t-test"));
        assert!(content.contains("SUMMARY"));
        assert_eq!(document.content_type, "application/pdf");
        assert_eq!(
            document.file_name,
            format!("analysis_report_{}.pdf", analysis.id)
        );
    }

    #[test]
    fn csv_lists_one_row_per_result() {
        let project = project();
        let analysis = completed_analysis(project.id);

        let document = render_csv(&analysis);
        let content = String::from_utf8(document.body).unwrap();
        let lines: Vec<&str> = content.trim_end().lines().collect();

        assert_eq!(lines[0], "Method,Interpretation,Conclusion,Effect Size");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("t-test,"));
        assert_eq!(document.content_type, "text/csv");
    }

    #[test]
    fn csv_fields_with_commas_and_quotes_are_escaped() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_export_nests_project_and_analysis() {
        let project = project();
        let analysis = completed_analysis(project.id);

        let document = render_json(&project, &analysis).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&document.body).unwrap();

        assert_eq!(value["project"]["title"], "Sleep and memory");
        assert_eq!(value["analysis"]["iteration"], 1);
        assert_eq!(value["analysis"]["status"], "completed");
        assert_eq!(document.content_type, "application/json");
    }
}
