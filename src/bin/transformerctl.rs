// operator tools: check prompts, inspect reviews and progress, run a lab in the terminal
use clap::{Arg, Command};
use dotenv::dotenv;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

use transformer::{
    catalog,
    chat::{self, ChatBackend},
    config::Config,
    labs::{self, LabKind, LabSession, RoundView, SessionState},
    progress::{JsonFileBackend, ProgressStore},
    reviews::{self, ReviewStore},
    validator::{self, ValidationResult},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;

    let matches = Command::new("transformerctl")
        .about("Operator tools for the Трансформер course")
        .subcommand(
            Command::new("validate")
                .aliases(["v", "check"])
                .about("Check a prompt for framework elements")
                .arg(Arg::new("prompt").help("Prompt text; read from stdin when omitted")),
        )
        .subcommand(
            Command::new("catalog")
                .aliases(["c", "modules"])
                .about("Print modules and sections"),
        )
        .subcommand(
            Command::new("reviews")
                .aliases(["r"])
                .about("Print stored reviews"),
        )
        .subcommand(
            Command::new("progress")
                .aliases(["p"])
                .about("Print the local progress summary"),
        )
        .subcommand(
            Command::new("lab")
                .aliases(["l"])
                .about("Run a lab in the terminal")
                .arg(Arg::new("lab").default_value("iteration")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("validate", args)) => {
            let prompt = match args.get_one::<String>("prompt") {
                Some(p) => p.clone(),
                None => {
                    let mut input = String::new();
                    io::stdin().read_to_string(&mut input)?;
                    input
                }
            };
            print_validation(&validator::validate(&prompt));
        }
        Some(("catalog", _)) => print_catalog(),
        Some(("reviews", _)) => print_reviews(&config).await?,
        Some(("progress", _)) => print_progress(&config),
        Some(("lab", args)) => {
            let name = args
                .get_one::<String>("lab")
                .map(String::as_str)
                .unwrap_or("iteration");
            let chat = chat::backend_from_config(&config)?;
            run_lab(LabKind::parse(name)?, chat.as_ref()).await?;
        }
        _ => {
            eprintln!("Invalid command, use transformerctl help");
        }
    }
    Ok(())
}

fn print_validation(result: &ValidationResult) {
    for element in validator::elements() {
        let mark = if result.has(element.key) { "✔" } else { "✘" };
        println!("{} {} {}", mark, element.icon, element.name);
    }
    println!(
        "Score: {}/5 ({:?}){}",
        result.score,
        result.quality_level,
        if result.is_complete { ", complete" } else { "" }
    );
    for suggestion in &result.suggestions {
        println!("  → {}", suggestion);
    }
}

fn print_catalog() {
    for module in catalog::modules() {
        let summary = module.summary();
        println!("{} {} ({} min)", module.icon, module.title, summary.minutes);
        for section in module.sections {
            let mut tags = Vec::new();
            if section.quiz.is_some() {
                tags.push("quiz".to_string());
            }
            if let Some(lab) = section.lab {
                tags.push(format!("lab:{}", lab.as_str()));
            }
            println!("    {:<24} {} {}", section.id, section.title, tags.join(" "));
        }
    }
}

async fn print_reviews(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = ReviewStore::new(config.reviews_path());
    let records = store.list().await?;
    for record in &records {
        println!(
            "[{}] {} {}",
            record.timestamp,
            "★".repeat(record.rating as usize),
            record.review
        );
    }
    match reviews::average_rating(&records) {
        Some(avg) => println!("{} reviews, average {:.2}", records.len(), avg),
        None => println!("No reviews yet"),
    }
    Ok(())
}

fn print_progress(config: &Config) {
    let store = ProgressStore::open(JsonFileBackend::new(config.progress_path()));
    let snapshot = store.snapshot();
    println!(
        "Overall: {}%, {} min spent{}",
        snapshot.overall_percent,
        snapshot.total_time / 60,
        if snapshot.state.dev_mode { " (developer mode)" } else { "" }
    );
    for module in &snapshot.modules {
        println!(
            "    {:<12} {}/{} ({}%)",
            module.module_id, module.completed, module.total, module.percent
        );
    }
    if let Some(section) = &snapshot.state.current_section {
        println!("Current section: {}", section);
    }
}

fn print_view(view: &RoundView) {
    for item in &view.checklist {
        let mark = if item.present { "✔" } else { "✘" };
        println!("  {} {} {}", mark, item.icon, item.name);
    }
    println!("  {}/{} ({:?})", view.score, view.max, view.badge);
    for suggestion in &view.suggestions {
        println!("  → {}", suggestion);
    }
}

async fn run_lab(kind: LabKind, chat: &dyn ChatBackend) -> Result<(), Box<dyn std::error::Error>> {
    let spec = kind.spec();
    println!("{}\n{}\n", spec.title, spec.description);

    let mut session = LabSession::new(kind);
    session.start()?;

    while let Some(round) = session.current_round() {
        println!("{}\n{}", round.title, round.brief);

        let mut prompt = String::new();
        if get_response("Your prompt", &mut prompt)? == 0 {
            break; // stdin closed
        }
        if prompt.trim().is_empty() {
            println!("Empty prompt, try again");
            continue;
        }

        let ai_response = if chat.is_configured() {
            chat.complete(labs::chat_request(kind, prompt.trim())).await?
        } else {
            String::new()
        };

        let outcome = session.submit(prompt.trim(), ai_response)?;
        if !outcome.data.ai_response.is_empty() {
            println!("\n{}\n", outcome.data.ai_response);
        }
        print_view(&outcome.view);

        if !outcome.view.passed() {
            let mut again = String::new();
            get_response("Try this round again? [Y/n]", &mut again)?;
            if matches!(again.to_lowercase().trim(), "y" | "yes" | "") {
                continue;
            }
        }
        if session.advance()? == SessionState::Finished {
            break;
        }
    }

    println!("Scores by round: {:?}", session.score_history());
    Ok(())
}

fn get_response(question: &str, output: &mut String) -> Result<usize, Box<dyn std::error::Error>> {
    print!("{}: ", question);
    io::stdout().flush()?;

    Ok(io::stdin().read_line(output)?)
}
