//! Rehearsal CLI
//!
//! Usage:
//!   rehearsal -o org.txt -c candidate.txt            # Interactive interview
//!   rehearsal -o org.txt -c candidate.txt --script   # Print the script only
//!   rehearsal --serve                                # HTTP API server
//!   rehearsal -o org.txt -c candidate.txt --json     # JSON summary

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use rehearsal::core::timing::should_conclude;
use rehearsal::core::{
    run_server, save_report, Clock, ConversationEngine, InterviewStore, ProfileParser,
    QuestionBankSource, ScriptBuilder, SeededRandom, SummaryAggregator, SystemClock,
};
use rehearsal::types::{Profile, Script, Summary};
use rehearsal::{InterviewConfig, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "rehearsal",
    version = VERSION,
    about = "Rehearsal - scripted mock interviews for pageant candidates",
    long_about = "Rehearsal builds a personalized interview script from an organization\n\
                  profile and a candidate profile, asks the questions one at a time\n\
                  with occasional follow-ups, scores every answer and prints a report.\n\n\
                  Modes:\n  \
                  (default)  Interactive interview on the terminal\n  \
                  --script   Print the generated script and exit\n  \
                  --serve    HTTP API server mode\n\n\
                  Profiles are plain text, one 'Key: value' per line."
)]
struct Args {
    /// Organization profile (text file)
    #[arg(short, long)]
    organization: Option<PathBuf>,

    /// Candidate profile (text file)
    #[arg(short, long)]
    candidate: Option<PathBuf>,

    /// Print the generated script and exit
    #[arg(long)]
    script: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Directory for stored interviews in server mode
    #[arg(long, default_value = "./interviews")]
    data_dir: PathBuf,

    /// Settings file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for question and follow-up draws
    #[arg(long)]
    seed: Option<u64>,

    /// Interview time limit in minutes
    #[arg(short, long)]
    time_limit: Option<u32>,

    /// Extra questions, one per line, matched against the profiles
    #[arg(long)]
    question_bank: Option<PathBuf>,

    /// Directory for finished reports (default: ./reports)
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Do not write a report file
    #[arg(long)]
    no_report: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.serve { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let result = if args.serve {
        run_serve(&args).await
    } else if args.script {
        run_script(&args)
    } else {
        run_interactive(&args)
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Config file first, then flag overrides
fn load_config(args: &Args) -> CliResult<InterviewConfig> {
    let mut config = match &args.config {
        Some(path) => InterviewConfig::load(path)?,
        None => InterviewConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.time_limit.is_some() {
        config.time_limit_minutes = args.time_limit;
    }
    if let Some(dir) = &args.reports_dir {
        config.reports_dir = Some(dir.clone());
    }
    if args.no_report {
        config.reports_dir = None;
    }
    config.validate()?;
    Ok(config)
}

fn load_question_bank(args: &Args) -> CliResult<Option<QuestionBankSource>> {
    Ok(match &args.question_bank {
        Some(path) => Some(QuestionBankSource::load(path)?),
        None => None,
    })
}

fn read_profile(path: Option<&Path>, flag: &str, parser: ProfileParser) -> CliResult<Profile> {
    let path = path.ok_or_else(|| format!("missing --{} FILE", flag))?;
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(parser.parse(&text))
}

fn load_profiles(args: &Args) -> CliResult<(Profile, Profile)> {
    let organization = read_profile(
        args.organization.as_deref(),
        "organization",
        ProfileParser::organization(),
    )?;
    let candidate = read_profile(args.candidate.as_deref(), "candidate", ProfileParser::candidate())?;
    Ok((organization, candidate))
}

fn build_script(
    organization: &Profile,
    candidate: &Profile,
    config: &InterviewConfig,
    bank: Option<&QuestionBankSource>,
    rng: &mut SeededRandom,
) -> CliResult<Script> {
    let mut builder = ScriptBuilder::new();
    if let Some(source) = bank {
        builder = builder.with_semantic_source(source, config.semantic_question_count);
    }
    Ok(builder.build(organization, candidate, rng)?)
}

/// Run server mode
async fn run_serve(args: &Args) -> CliResult<()> {
    let config = load_config(args)?;
    let bank = load_question_bank(args)?;
    let store = InterviewStore::new(&args.data_dir);
    print_header("Server Mode");
    run_server(&args.addr, store, config, bank).await
}

/// Print the script without running it
fn run_script(args: &Args) -> CliResult<()> {
    let config = load_config(args)?;
    let bank = load_question_bank(args)?;
    let (organization, candidate) = load_profiles(args)?;
    let mut rng = SeededRandom::from_option(config.seed);
    let script = build_script(&organization, &candidate, &config, bank.as_ref(), &mut rng)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&script)?);
        return Ok(());
    }

    print_header("Script");
    for (i, question) in script.iter().enumerate() {
        println!(
            "{:>2}. {} {}",
            i + 1,
            format!("[{}]", question.question_type).dimmed(),
            question.text
        );
    }
    Ok(())
}

/// Run an interview on the terminal
fn run_interactive(args: &Args) -> CliResult<()> {
    let config = load_config(args)?;
    let bank = load_question_bank(args)?;
    let (organization, candidate) = load_profiles(args)?;
    let mut rng = SeededRandom::from_option(config.seed);
    let script = build_script(&organization, &candidate, &config, bank.as_ref(), &mut rng)?;
    let budget = config.time_budget();

    let clock = SystemClock;
    let mut engine = ConversationEngine::new(&organization, &candidate, &mut rng, &clock);

    let (first, mut state) = match engine.start(script) {
        Ok(started) => started,
        Err(e) => match e.user_notice() {
            Some(notice) => {
                println!("{}", notice);
                return Ok(());
            }
            None => return Err(e.into()),
        },
    };

    if !args.json {
        print_header("Interview");
        if let Some(minutes) = config.time_limit_minutes {
            println!("Time limit: {} minutes", minutes);
        }
        println!("Answer each question and press Enter. Type 'quit' to stop.");
        println!();
        print_interviewer(&first.text);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", ">".green().bold());
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nInterview stopped after {} answers. No report written.", state.candidate_entries().count());
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }

        let time_exceeded = should_conclude(budget.as_ref(), state.interview_start_time, clock.now());
        let outcome = engine.submit_response(state, line, time_exceeded)?;
        state = outcome.state;

        if !args.json {
            print_interviewer(&outcome.next_prompt);
        }
        if outcome.complete {
            let summary = SummaryAggregator::new().summarize(&state, &organization, &candidate)?;
            print_summary(&summary, args.json)?;
            if let Some(dir) = &config.reports_dir {
                report(dir, &summary, state.interview_start_time.unwrap_or_default());
            }
            return Ok(());
        }
    }

    println!("\nInput ended after {} answers. No report written.", state.candidate_entries().count());
    Ok(())
}

fn report(dir: &Path, summary: &Summary, started: f64) {
    let id = rehearsal::core::store::new_interview_id(started);
    match save_report(dir, &id, summary) {
        Ok(path) => eprintln!("{} {}", "Report saved:".cyan(), path.display()),
        Err(e) => eprintln!("{} {}", "Report not saved:".yellow(), e),
    }
}

fn print_interviewer(text: &str) {
    println!("{} {}", "Interviewer:".bold().magenta(), text);
}

/// Print the final report
fn print_summary(summary: &Summary, json: bool) -> CliResult<()> {
    if json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    println!();
    print_header("Summary");
    println!("{} for {} ({})", summary.candidate_name.bold(), summary.organization_name, summary.interview_date);
    println!("{}", summary.to_parseable_string().dimmed());
    println!();
    println!("Overall score: {}", format!("{:.1}", summary.overall_score).bold());
    println!();
    println!("{}", "Strengths".green().bold());
    for item in &summary.strengths {
        println!("  + {}", item);
    }
    println!("{}", "Areas for improvement".yellow().bold());
    for item in &summary.areas_for_improvement {
        println!("  - {}", item);
    }
    if !summary.notable_quotes.is_empty() {
        println!("{}", "Notable quotes".cyan().bold());
        for quote in &summary.notable_quotes {
            println!("  \"{}\"", quote);
        }
    }
    Ok(())
}

/// Print header
fn print_header(mode: &str) {
    let rule = "========================================";
    println!("{}", rule.bold());
    println!("{}", format!("  Rehearsal v{} - {}", VERSION, mode).bold());
    println!("{}", rule.bold());
    println!();
}
