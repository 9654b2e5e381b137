//! Terminal mock interview.
//!
//! Asks for a name and target role, generates questions, reads each answer
//! from stdin (finish an answer with an empty line), then prints the analysis.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tracing::debug;

use prepai_api::analysis::Pipeline;
use prepai_api::config::Config;
use prepai_api::llm_client::LlmClient;
use prepai_api::results::{self, SessionResults};
use prepai_api::session::{
    record_answer, InterviewFlow, InterviewSession, LineCapture, SessionError, Step,
};
use prepai_api::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "mock-interview",
    about = "Practice an AI-generated interview from the terminal",
    version
)]
struct Cli {
    /// Your name, shown on the report
    #[arg(long)]
    name: Option<String>,
    /// Target role; prompted for when omitted
    #[arg(long)]
    role: Option<String>,
}

type StdinCapture = LineCapture<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    telemetry::init(&config.rust_log);

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)?;
    let store = results::connect(config.redis_url.as_deref()).await?;
    let flow = InterviewFlow::new(Pipeline::new(Arc::new(llm)), store);

    let mut capture = LineCapture::new(BufReader::new(tokio::io::stdin()).lines());
    let mut session = InterviewSession::new();
    debug!(session = %session.id(), "mock interview session created");

    let name = match cli.name {
        Some(name) => Some(name),
        None => ask(&mut capture, "Your name (optional): ").await?,
    };

    let mut role = cli.role;
    loop {
        let candidate_role = match role.take() {
            Some(role) => role,
            None => ask(&mut capture, "Target role: ")
                .await?
                .unwrap_or_default(),
        };

        println!("Generating questions...");
        match flow.start(&mut session, name.as_deref(), &candidate_role).await {
            Ok(()) => break,
            Err(e) => println!("{}", e.user_message()),
        }
    }

    run_questions(&mut session, &mut capture).await?;

    println!("\nAnalyzing your interview...");
    let results = loop {
        match flow.finish(&session).await {
            Ok(results) => break results,
            Err(e) => {
                println!("{}", e.user_message());
                let again = ask(&mut capture, "Retry? [Y/n] ").await?;
                if matches!(again.as_deref(), Some(a) if a.eq_ignore_ascii_case("n")) {
                    bail!("interview analysis abandoned");
                }
            }
        }
    };

    print_report(&results);
    Ok(())
}

async fn run_questions(session: &mut InterviewSession, capture: &mut StdinCapture) -> Result<()> {
    while session.step() == Step::InProgress {
        let (position, total) = session.progress();
        if let Some(question) = session.current_question() {
            println!("\nQuestion {position} of {total}\n{question}");
        }
        println!("(type your answer, then an empty line)");

        if record_answer(session, capture).await?.is_none() {
            if capture.is_exhausted() {
                bail!("input closed before question {position} was answered");
            }
            println!("Please answer before moving on.");
            continue;
        }

        match session.advance() {
            Ok(_) => {}
            Err(SessionError::MissingAnswer { .. }) => println!("Please answer before moving on."),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Prints a prompt and reads one line. Blank input is `None`; end of input is an error.
async fn ask(capture: &mut StdinCapture, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;

    let Some(lines) = capture.lines_mut() else {
        bail!("stdin is busy capturing an answer");
    };
    let Some(line) = lines.next_line().await? else {
        bail!("input closed");
    };
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

fn print_report(results: &SessionResults) {
    let rule = "=".repeat(60);
    println!("\n{rule}");
    match &results.candidate_name {
        Some(name) => println!("Interview results for {name}, {}", results.role),
        None => println!("Interview results, {}", results.role),
    }
    println!(
        "Completed {}",
        results.completed_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("{rule}\n");

    println!("Summary\n  {}\n", results.analysis.summary);
    print_list("Strengths", &results.analysis.strengths);
    print_list("Areas to improve", &results.analysis.weaknesses);
    print_list("Suggestions", &results.analysis.improvements);
    print_list("Resources", &results.analysis.resources);
}

fn print_list(title: &str, items: &[String]) {
    println!("{title}");
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!("  - {item}");
    }
    println!();
}
