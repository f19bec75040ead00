//! dotq — The dotted query CLI
//!
//! Converts between query JSON and the dotted search language.
//!
//! # Usage
//!
//! ```bash
//! # Query JSON to dotted string
//! dotq build '{"condition": {"type": "has_tag", "tag": "work"}}'
//!
//! # Dotted string to a tree (or JSON)
//! dotq parse 't.work (t.home or t.office) .o.b' --format json
//!
//! # Check that a query survives parse -> build -> parse
//! dotq check '.b.work s.gt.7d ad.3'
//! ```

use std::io::Read;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use dotq::config::{CliConfig, OutputFormat};
use dotq::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dotq")]
#[command(version)]
#[command(about = "Dotted search query language CLI", long_about = None)]
#[command(after_help = "EXAMPLES:
    dotq build '{\"condition\": {\"type\": \"in_book\", \"name\": \"work\"}}'
    dotq parse 't.work (t.home or t.office) .o.b'
    dotq check '.b.work s.gt.7d ad.3'")]
struct Cli {
    /// Output format (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize query JSON to a dotted string
    Build {
        /// Query JSON; read from stdin when omitted or '-'
        json: Option<String>,
    },
    /// Parse a dotted string
    Parse {
        /// The dotted query
        query: String,
    },
    /// Parse, rebuild and reparse a dotted string
    Check {
        /// The dotted query
        query: String,
    },
    /// Show the token reference
    Tokens,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "dotq=debug" } else { "dotq=warn" };
    let filter =
        EnvFilter::try_from_env("DOTQ_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = CliConfig::load()?;
    let format = cli.format.unwrap_or(config.format);
    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Commands::Build { json } => build_query(json.as_deref()),
        Commands::Parse { query } => parse_query(query, format),
        Commands::Check { query } => check_query(query),
        Commands::Tokens => {
            show_tokens();
            Ok(())
        }
    }
}

fn build_query(json: Option<&str>) -> anyhow::Result<()> {
    let input = match json {
        Some(json) if json != "-" => json.to_string(),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read query JSON from stdin")?;
            buf
        }
    };

    let query: Query = serde_json::from_str(&input).map_err(QueryError::from)?;
    println!("{}", dotq::build(&query));
    Ok(())
}

fn parse_query(input: &str, format: OutputFormat) -> anyhow::Result<()> {
    let query = dotq::parse(input)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        OutputFormat::Pretty => print_query(&query),
    }
    Ok(())
}

fn check_query(input: &str) -> anyhow::Result<()> {
    let first = dotq::parse(input)?;
    let rebuilt = dotq::build(&first);
    let second = dotq::parse(&rebuilt)?;

    println!("{} {}", "Input:".dimmed(), input.yellow());
    println!("{} {}", "Canonical:".dimmed(), rebuilt.white());

    if first == second {
        println!("{} Round-trips", "✓".green());
        Ok(())
    } else {
        anyhow::bail!("'{}' does not round-trip", input)
    }
}

fn print_query(query: &Query) {
    match &query.condition {
        Some(cond) => {
            println!("{}", "Condition:".green().bold());
            print_condition(cond, 1);
        }
        None => println!("{}", "(no condition)".dimmed()),
    }

    if !query.sort_orders.is_empty() {
        println!("{}", "Sort:".green().bold());
        for order in &query.sort_orders {
            let dir = if order.desc { "↓" } else { "↑" };
            println!("  {:?} {}", order.field, dir.cyan());
        }
    }

    if query.options != Options::default() {
        println!("{}", "Options:".green().bold());
        println!("  {} {}", "agenda days:".dimmed(), query.options.agenda_days);
    }
}

fn print_condition(cond: &Condition, depth: usize) {
    let indent = "  ".repeat(depth);
    match cond {
        Condition::Or { operands } | Condition::And { operands } => {
            let label = if matches!(cond, Condition::Or { .. }) { "OR" } else { "AND" };
            println!("{}{}", indent, label.cyan().bold());
            for operand in operands {
                print_condition(operand, depth + 1);
            }
        }
        leaf => println!("{}{}", indent, leaf.to_dotted().white()),
    }
}

fn show_tokens() {
    println!("{}", "Dotted Query Token Reference".cyan().bold());
    println!();

    let tokens = [
        ("b.NAME", "Book", "In book NAME (quoted if it has spaces)"),
        ("i.STATE", "State", "Has state, e.g. i.todo"),
        ("it.TYPE", "State type", "done, todo or none"),
        ("p.X", "Priority", "Effective priority"),
        ("ps.X", "Set priority", "Explicitly set priority"),
        ("t.TAG", "Tag", "Tag, inherited included"),
        ("tn.TAG", "Own tag", "Tag on the note itself"),
        ("s[.REL].INT", "Scheduled", "REL defaults to le"),
        ("d[.REL].INT", "Deadline", "REL defaults to le"),
        ("c[.REL].INT", "Closed", "REL defaults to eq"),
        ("\"TEXT\"", "Text", "Free-text search"),
        ("( … or … )", "Group", "Alternation; juxtaposition is AND"),
        ("o.FIELD", "Sort", "b, s, d, c, p, state"),
        ("ad.N", "Agenda", "Show N days as agenda"),
        (".", "Not / Desc", "Leading dot negates or sorts descending"),
    ];

    println!(
        "{:14} {:14} {}",
        "Token".white().bold(),
        "Name".white().bold(),
        "Meaning".white().bold()
    );
    println!("{}", "─".repeat(64).dimmed());

    for (token, name, meaning) in tokens {
        println!("{:14} {:14} {}", token.cyan().bold(), name.yellow(), meaning.dimmed());
    }
}
