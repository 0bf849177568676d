use clap::Parser;
use itertools::Itertools;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use stepwise::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Walks an assessment from the command line, with scripted or interactive answers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the assessment definition JSON file
    assessment_path: Option<String>,

    /// JSON object of answers keyed by question identifier
    #[arg(short, long)]
    answers: Option<String>,

    /// A persisted assessment result to resume
    #[arg(short, long)]
    resume: Option<String>,

    /// Where to write the result JSON (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Show steps flagged as full-instructions-only
    #[arg(long)]
    full_instructions: bool,

    /// Stop after this many forward moves, guarding against rule cycles
    #[arg(long, default_value_t = 1000)]
    max_steps: usize,

    /// Fallback log filter when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Run in interactive mode to be prompted for answers
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let assessment_path = cli.assessment_path.clone().unwrap_or_else(|| {
        if cli.human {
            prompt_for_input("Enter assessment path", Some("data/assessment.json"))
        } else {
            exit_with_error("Assessment path is required in non-interactive mode.")
        }
    });

    let assessment = Assessment::from_file(&assessment_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load assessment: {}", e)));

    let restored = cli.resume.as_deref().map(|path| {
        let json = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read result file '{}': {}", path, e))
        });
        AssessmentResult::from_json_str(&json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to decode result: {}", e)))
    });

    let mut builder =
        AssessmentController::builder(&assessment).show_full_instructions(cli.full_instructions);
    if let Some(result) = restored {
        builder = builder.restore(result);
    }
    let mut controller = builder.build();

    if let Err(e) = controller.initialize() {
        exit_with_error(&format!("Failed to start assessment: {}", e));
    }

    if cli.human {
        run_interactive(&mut controller);
    } else {
        let answers = cli.answers.as_deref().map(load_answers).unwrap_or_default();
        for identifier in answers.keys() {
            if assessment.find_node(identifier).is_none() {
                warn!(%identifier, "scripted answer does not match any node");
            }
        }
        run_scripted(&mut controller, &answers, cli.max_steps);
    }

    println!("\nStatus: {}", controller.status());
    if let Some(error) = controller.error() {
        println!("Error: {}", error);
    }
    write_result(&controller, cli.output.as_deref());
}

/// Moves forward until the run ends, applying any scripted answer to each question.
fn run_scripted(
    controller: &mut AssessmentController<'_>,
    answers: &Map<String, Value>,
    max_steps: usize,
) {
    let mut moves = 0;
    while controller.status().is_navigable() {
        if moves >= max_steps {
            warn!(max_steps, "step limit reached, leaving the run for later");
            break;
        }
        let Some(node) = controller.current_node() else {
            break;
        };
        print_step(controller, node);

        if let Some(answer) = answers.get(&node.identifier) {
            match controller.set_answer(answer.clone()) {
                Ok(()) => println!("    answer: {}", answer),
                Err(e) => println!("    answer rejected: {}", e),
            }
        }
        if let Err(e) = controller.go_forward() {
            println!("    navigation failed: {}", e);
            break;
        }
        moves += 1;
    }
    if controller.status().is_navigable() {
        let _ = controller.exit_assessment();
    }
}

/// Runs the assessment with prompts for every step.
fn run_interactive(controller: &mut AssessmentController<'_>) {
    println!("--- Stepwise Interactive Mode ---");
    println!("Answers are parsed as JSON, falling back to text. 'b' goes back, 'q' exits for later.");

    while controller.status().is_navigable() {
        let Some(node) = controller.current_node() else {
            break;
        };
        print_step(controller, node);

        let prompt = if node.as_question().is_some() {
            "Answer (empty to skip)"
        } else {
            "Press enter to continue"
        };
        let input = prompt_for_input(prompt, None);

        let outcome = match input.as_str() {
            "q" => {
                let _ = controller.exit_assessment();
                break;
            }
            "b" if controller.back_enabled() => controller.go_back(),
            "b" => {
                println!("    Going back is not available here.");
                continue;
            }
            "" => controller.go_forward(),
            text => {
                let value = serde_json::from_str(text)
                    .unwrap_or_else(|_| Value::String(text.to_string()));
                match controller.set_answer(value) {
                    Ok(()) => controller.go_forward(),
                    Err(e) => {
                        println!("    {}", e);
                        continue;
                    }
                }
            }
        };

        if let Err(e) = outcome {
            println!("    navigation failed: {}", e);
            break;
        }
    }
}

fn print_step(controller: &AssessmentController<'_>, node: &Node) {
    let kind = match &node.kind {
        NodeKind::Instruction(_) => "instruction",
        NodeKind::Overview(_) => "overview",
        NodeKind::Question(_) => "question",
        NodeKind::Section(_) => "section",
        NodeKind::Completion(_) => "completion",
    };
    let location = controller
        .section_path()
        .iter()
        .map(|section| section.identifier())
        .chain(std::iter::once(node.identifier()))
        .join(" / ");
    let progress = controller
        .progress()
        .map(|p| format!("{}/{}", p.current + 1, p.total))
        .unwrap_or_default();

    println!("\n[{}] {} ({})", progress, location, kind);
    if let Some(question) = node.as_question() {
        if let Some(title) = &question.title {
            println!("    {}", title);
        }
        for choice in &question.choices {
            println!(
                "    - {} {}",
                choice.value,
                choice.text.as_deref().unwrap_or_default()
            );
        }
    }
    if !controller.has_step_after() {
        println!("    (last step)");
    }
}

fn load_answers(path: &str) -> Map<String, Value> {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read answers file '{}': {}", path, e))
    });
    serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Answers must be a JSON object: {}", e)))
}

fn write_result(controller: &AssessmentController<'_>, output: Option<&str>) {
    let json = controller
        .assessment_result()
        .to_json_string()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode result: {}", e)));

    match output {
        Some(path) => {
            fs::write(path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Could not write result to '{}': {}", path, e))
            });
            info!(path, "result written");
            println!("Result written to {}", path);
        }
        None => println!("{}", json),
    }
}

fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid log filter '{}': {}", log_level, e)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    let _ = io::stdout().flush();

    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read input: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
