//! Interactive questionnaire wizard.

use crate::commands::diagnose::{analyze, save_case};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::questionnaire::{Questionnaire, QuestionnaireState};
use diagnosa_domain::{Answer, Classifier};
use diagnosa_store::SqliteStore;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// One line of wizard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardInput {
    /// Answer the current question
    Answer(Answer),
    /// Return to the previous question
    Back,
    /// Show the answers so far
    Summary,
    /// Compute the diagnosis
    Analyze,
    /// Leave the result and revisit the answers
    Review,
    /// Record the diagnosis as a new case
    Save,
    /// Start over
    New,
    /// Show help
    Help,
    /// Leave the wizard
    Exit,
}

/// Parse a wizard input line.
pub fn parse_wizard_input(line: &str) -> Result<WizardInput> {
    let word = line.trim().to_lowercase();

    let input = match word.as_str() {
        "b" | "back" => WizardInput::Back,
        "summary" | "sum" => WizardInput::Summary,
        "a" | "analyze" | "analyse" => WizardInput::Analyze,
        "r" | "review" => WizardInput::Review,
        "save" => WizardInput::Save,
        "new" | "reset" => WizardInput::New,
        "h" | "help" => WizardInput::Help,
        "exit" | "quit" | "q" => WizardInput::Exit,
        other => match Answer::parse(other) {
            Some(answer) => WizardInput::Answer(answer),
            None => {
                return Err(CliError::InvalidInput(format!(
                    "Unknown input: {}. Type 'help' for available commands.",
                    line.trim()
                )))
            }
        },
    };

    Ok(input)
}

/// Run the questionnaire wizard until the user exits.
pub fn run_wizard(
    store: &mut SqliteStore,
    classifier: &Classifier,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("Diagnosa - answer y/n/s (skip), 'b' to go back, 'help' for commands")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut questionnaire = Questionnaire::new(classifier.schema().clone());
    print_prompt_context(&questionnaire, formatter);

    loop {
        let prompt = match questionnaire.state() {
            QuestionnaireState::Asking(_) => "answer> ",
            QuestionnaireState::AllAnswered | QuestionnaireState::Complete => "diagnosa> ",
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_wizard_input(line) {
                    Ok(WizardInput::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(WizardInput::Help) => {
                        print_help(formatter);
                    }
                    Ok(input) => {
                        match execute_input(input, &mut questionnaire, store, classifier, formatter) {
                            Ok(()) => print_prompt_context(&questionnaire, formatter),
                            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// Apply one input to the questionnaire.
fn execute_input(
    input: WizardInput,
    questionnaire: &mut Questionnaire,
    store: &mut SqliteStore,
    classifier: &Classifier,
    formatter: &Formatter,
) -> Result<()> {
    match input {
        WizardInput::Answer(answer) => {
            questionnaire.answer(answer)?;
        }
        WizardInput::Back => {
            questionnaire.back()?;
        }
        WizardInput::Summary => {
            print_summary(questionnaire, formatter);
        }
        WizardInput::Analyze => {
            if questionnaire.state() == QuestionnaireState::Complete {
                return Err(CliError::InvalidInput(
                    "Already analyzed; use 'review' to change answers or 'new' to start over".to_string(),
                ));
            }
            let answers = questionnaire.answers()?;
            let (result, details) = analyze(store, classifier, &answers)?;
            println!();
            println!("{}", formatter.format_diagnosis(&result, details.as_ref())?);
            println!();
            questionnaire.complete(result)?;
        }
        WizardInput::Review => {
            questionnaire.review()?;
            print_summary(questionnaire, formatter);
        }
        WizardInput::Save => {
            if let Some(id) = questionnaire.saved() {
                return Err(CliError::InvalidInput(format!(
                    "Already saved as case {}; use 'review' or 'new' to record another",
                    id
                )));
            }
            let result = questionnaire.result().ok_or_else(|| {
                CliError::InvalidInput("Nothing to save; run 'analyze' first".to_string())
            })?;
            let answers = questionnaire.answers()?;
            let id = save_case(store, result, &answers)?;
            questionnaire.mark_saved(id)?;
            println!("{}", formatter.success(&format!("Saved case {}", id)));
        }
        WizardInput::New => {
            questionnaire.reset();
            println!("{}", formatter.info("Starting a new questionnaire"));
        }
        WizardInput::Help | WizardInput::Exit => {}
    }

    Ok(())
}

/// Show the next question, or what can be done once every question is answered.
fn print_prompt_context(questionnaire: &Questionnaire, formatter: &Formatter) {
    match questionnaire.state() {
        QuestionnaireState::Asking(i) => {
            if let Some(symptom) = questionnaire.current_question() {
                let total = questionnaire.schema().len();
                let percent = questionnaire.progress() * 100.0;
                let previous = questionnaire
                    .answer_at(i)
                    .map(|a| format!(" [{}]", a.as_str()))
                    .unwrap_or_default();
                println!(
                    "{} {}{}",
                    formatter.colorize(
                        &format!("({}/{}, {:.0}%) {}", i + 1, total, percent, symptom.code),
                        "cyan"
                    ),
                    symptom.question,
                    previous
                );
            }
        }
        QuestionnaireState::AllAnswered => {
            println!(
                "{}",
                formatter.info("All questions answered. Type 'analyze' for the diagnosis or 'b' to go back.")
            );
        }
        QuestionnaireState::Complete => {
            println!(
                "{}",
                formatter.info("Type 'save' to record this case, 'review' to change answers, 'new' to start over.")
            );
        }
    }
}

fn print_summary(questionnaire: &Questionnaire, formatter: &Formatter) {
    println!("{}", formatter.format_summary(&questionnaire.summary()));
    for (i, symptom) in questionnaire.schema().iter().enumerate() {
        let answer = questionnaire
            .answer_at(i)
            .map(|a| a.as_str())
            .unwrap_or("-");
        println!("  {} {:<8} {}", symptom.code, answer, symptom.question);
    }
}

fn get_history_path() -> Result<PathBuf> {
    let app_dir = Config::app_dir()?;
    std::fs::create_dir_all(&app_dir)?;
    Ok(app_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  y, yes                 - Symptom present");
    println!("  n, no                  - Symptom absent");
    println!("  s, skip, ?             - Not known (ignored by the diagnosis)");
    println!("  b, back                - Previous question");
    println!("  summary                - Show answers so far");
    println!("  analyze, a             - Diagnose once every question is answered");
    println!("  review, r              - Leave the result and revisit the answers");
    println!("  save                   - Record the diagnosis as a new case");
    println!("  new, reset             - Start over");
    println!("  help, h                - Show this help");
    println!("  exit, quit, q          - Leave the wizard");
    println!();
}
