//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::questionnaire::AnswerSummary;
use chrono::Local;
use colored::*;
use diagnosa_domain::{Case, DiagnosisResult, Disease, DiseaseDetails, SymptomSchema};
use diagnosa_store::Table;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const NO_DETAILS: &str = "No further information available.";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a diagnosis with the details of the selected disease.
    pub fn format_diagnosis(
        &self,
        result: &DiagnosisResult,
        details: Option<&DiseaseDetails>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_diagnosis_json(result, details),
            OutputFormat::Table => Ok(self.format_diagnosis_table(result, details)),
            OutputFormat::Quiet => Ok(result.disease.to_string()),
        }
    }

    fn format_diagnosis_json(
        &self,
        result: &DiagnosisResult,
        details: Option<&DiseaseDetails>,
    ) -> Result<String> {
        let ranking: Vec<serde_json::Value> = result
            .ranking
            .iter()
            .map(|r| {
                json!({
                    "code": r.code.as_str(),
                    "name": r.name,
                    "probability": r.probability,
                })
            })
            .collect();

        let mut record = json!({
            "date": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "diagnosis": result.disease_name,
            "code": result.disease.as_str(),
            "confidence": round2(result.confidence_percent()),
            "symptoms_detected": result.symptoms_detected,
            "total_symptoms": result.total_symptoms,
            "ranking": ranking,
        });

        if let Some(d) = details {
            record["details"] = details_json(d);
        }

        Ok(serde_json::to_string_pretty(&record)?)
    }

    fn format_diagnosis_table(
        &self,
        result: &DiagnosisResult,
        details: Option<&DiseaseDetails>,
    ) -> String {
        let mut out = String::new();

        if !result.is_diagnosed() {
            out.push_str(&self.warning(&format!(
                "{} (no diseases in the catalog)",
                result.disease_name
            )));
            out.push('\n');
            out.push_str(&format!(
                "Symptoms detected: {}/{}",
                result.symptoms_detected, result.total_symptoms
            ));
            return out;
        }

        out.push_str(&self.colorize(
            &format!("Diagnosis: {} ({})", result.disease_name, result.disease),
            "green",
        ));
        out.push('\n');
        out.push_str(&format!("Confidence: {:.2}%\n", result.confidence_percent()));
        out.push_str(&format!(
            "Symptoms detected: {}/{}\n",
            result.symptoms_detected, result.total_symptoms
        ));

        let mut builder = Builder::default();
        builder.push_record(["#", "Code", "Disease", "Probability"]);
        for (rank, candidate) in result.ranking.iter().enumerate() {
            builder.push_record([
                (rank + 1).to_string(),
                candidate.code.to_string(),
                candidate.name.clone(),
                format!("{:.2}%", candidate.probability * 100.0),
            ]);
        }
        out.push('\n');
        out.push_str(&styled(builder));

        out.push_str("\n\n");
        match details {
            Some(d) => out.push_str(&self.details_text(d)),
            None => out.push_str(NO_DETAILS),
        }

        out
    }

    /// Format the disease catalog.
    pub fn format_diseases(&self, diseases: &[Disease]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let records: Vec<serde_json::Value> = diseases
                    .iter()
                    .map(|d| json!({ "code": d.code.as_str(), "name": d.name }))
                    .collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
            OutputFormat::Table => {
                if diseases.is_empty() {
                    return Ok(self.colorize("No diseases found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Code", "Name"]);
                for disease in diseases {
                    builder.push_record([disease.code.to_string(), disease.name.clone()]);
                }
                Ok(styled(builder))
            }
            OutputFormat::Quiet => Ok(diseases
                .iter()
                .map(|d| d.code.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format one catalog entry with its details.
    pub fn format_disease(&self, disease: &Disease, details: Option<&DiseaseDetails>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut record = json!({ "code": disease.code.as_str(), "name": disease.name });
                if let Some(d) = details {
                    record["details"] = details_json(d);
                }
                Ok(serde_json::to_string_pretty(&record)?)
            }
            OutputFormat::Table => {
                let header = self.colorize(&format!("{} ({})", disease.name, disease.code), "cyan");
                let body = match details {
                    Some(d) => self.details_text(d),
                    None => NO_DETAILS.to_string(),
                };
                Ok(format!("{}\n\n{}", header, body))
            }
            OutputFormat::Quiet => Ok(disease.code.to_string()),
        }
    }

    fn details_text(&self, details: &DiseaseDetails) -> String {
        let sections = [
            ("Description", &details.description),
            ("Common symptoms", &details.common_symptoms),
            ("Recommendations", &details.recommendations),
            ("Immediate actions", &details.immediate_actions),
            ("Medical consultation", &details.medical_consultation),
        ];

        sections
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(title, text)| format!("{}\n{}", self.colorize(title, "blue"), text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format stored cases; symptoms are listed by the codes present.
    pub fn format_cases(&self, cases: &[Case], schema: &SymptomSchema) -> Result<String> {
        let id_of = |case: &Case| case.id.map(|id| id.to_string()).unwrap_or_default();
        let present = |case: &Case| -> Vec<String> {
            schema
                .codes()
                .zip(&case.symptoms)
                .filter(|(_, p)| **p)
                .map(|(code, _)| code.to_string())
                .collect()
        };

        match self.format {
            OutputFormat::Json => {
                let records: Vec<serde_json::Value> = cases
                    .iter()
                    .map(|c| {
                        json!({
                            "id": id_of(c),
                            "disease": c.disease.as_str(),
                            "symptoms": present(c),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
            OutputFormat::Table => {
                if cases.is_empty() {
                    return Ok(self.colorize("No cases found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Disease", "Symptoms present"]);
                for case in cases {
                    builder.push_record([id_of(case), case.disease.to_string(), present(case).join(" ")]);
                }
                Ok(styled(builder))
            }
            OutputFormat::Quiet => Ok(cases.iter().map(id_of).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Format table row counts.
    pub fn format_stats(&self, counts: &[(Table, u64)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let record: serde_json::Map<String, serde_json::Value> = counts
                    .iter()
                    .map(|(table, count)| (table.to_string(), json!(count)))
                    .collect();
                Ok(serde_json::to_string_pretty(&record)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Table", "Rows"]);
                for (table, count) in counts {
                    builder.push_record([table.to_string(), count.to_string()]);
                }
                Ok(styled(builder))
            }
            OutputFormat::Quiet => Ok(counts
                .iter()
                .map(|(table, count)| format!("{} {}", table, count))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the numbered questionnaire.
    pub fn format_questions(&self, schema: &SymptomSchema) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let records: Vec<serde_json::Value> = schema
                    .iter()
                    .map(|s| json!({ "code": s.code.to_string(), "question": s.question }))
                    .collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Code", "Question"]);
                for symptom in schema.iter() {
                    builder.push_record([symptom.code.to_string(), symptom.question.clone()]);
                }
                Ok(styled(builder))
            }
            OutputFormat::Quiet => Ok(schema
                .codes()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the questionnaire answer tallies.
    pub fn format_summary(&self, summary: &AnswerSummary) -> String {
        format!(
            "Answered {}/{}: {} yes, {} no, {} unknown",
            summary.answered, summary.total, summary.yes, summary.no, summary.unknown
        )
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "bold" => text.bold().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn details_json(details: &DiseaseDetails) -> serde_json::Value {
    json!({
        "description": details.description,
        "common_symptoms": details.common_symptoms,
        "recommendations": details.recommendations,
        "immediate_actions": details.immediate_actions,
        "medical_consultation": details.medical_consultation,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
