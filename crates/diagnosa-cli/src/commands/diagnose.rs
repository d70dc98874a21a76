//! Diagnose command implementation.

use crate::cli::DiagnoseArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::repl;
use diagnosa_domain::traits::CaseBase;
use diagnosa_domain::{diagnose, Answer, Case, CaseId, Classifier, DiagnosisResult, DiseaseDetails};
use diagnosa_store::SqliteStore;
use tracing::debug;

/// Execute the diagnose command.
///
/// Without `--answers` this runs the interactive wizard.
pub fn execute_diagnose(
    args: DiagnoseArgs,
    store: &mut SqliteStore,
    classifier: &Classifier,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let Some(input) = args.answers else {
        return repl::run_wizard(store, classifier, config, formatter);
    };

    let answers = parse_answers(&input)?;
    let (result, details) = analyze(store, classifier, &answers)?;
    println!("{}", formatter.format_diagnosis(&result, details.as_ref())?);

    if args.save {
        let id = save_case(store, &result, &answers)?;
        eprintln!("{}", formatter.success(&format!("Saved case {}", id)));
    }

    Ok(())
}

/// Classify the answers against the stored case base.
///
/// Details are looked up only for a real diagnosis.
pub fn analyze(
    store: &SqliteStore,
    classifier: &Classifier,
    answers: &[Answer],
) -> Result<(DiagnosisResult, Option<DiseaseDetails>)> {
    let result = diagnose(store, classifier, answers)?;
    debug!(
        disease = %result.disease,
        confidence = result.confidence,
        "Diagnosis computed"
    );

    let details = if result.is_diagnosed() {
        store.disease_details(&result.disease)?
    } else {
        None
    };
    Ok((result, details))
}

/// Record a diagnosis as a new case; `Unknown` answers are stored as absent.
pub fn save_case(store: &mut SqliteStore, result: &DiagnosisResult, answers: &[Answer]) -> Result<CaseId> {
    if !result.is_diagnosed() {
        return Err(CliError::InvalidInput(
            "An undiagnosed result cannot be recorded as a case".to_string(),
        ));
    }

    let case = Case::from_answers(result.disease.clone(), answers);
    Ok(store.record_case(case)?)
}

/// Parse answers given on the command line.
///
/// Accepts one character per symptom (`yn?y`) or a comma-separated list of
/// words (`yes,no,unknown`). Whitespace is ignored in the compact form.
pub fn parse_answers(input: &str) -> Result<Vec<Answer>> {
    let tokens: Vec<String> = if input.contains(',') {
        input.split(',').map(|t| t.trim().to_string()).collect()
    } else {
        input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect()
    };

    if tokens.is_empty() {
        return Err(CliError::InvalidInput("No answers provided".to_string()));
    }

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            Answer::parse(token).ok_or_else(|| {
                CliError::InvalidInput(format!("Answer {} is not yes/no/unknown: '{}'", i + 1, token))
            })
        })
        .collect()
}
