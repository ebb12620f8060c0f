//! CLI entry point for `mailglance`.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};

use mailglance::config::Config;
use mailglance::parser::extract::{extract_content_with, TracingHook};
use mailglance::parser::message::{parse_message, payload_from_json, summarize};
use mailglance::render;
use mailglance::store::mailbox::Mailbox;
use mailglance::store::unsubscribe;

#[derive(Parser)]
#[command(
    name = "mailglance",
    version,
    about = "Read unread mail from a provider-shaped JSON mailbox",
    long_about = "Lists unread messages, shows a message's best available body, \
                  marks messages as read and resolves unsubscribe links. \
                  The mailbox is a JSON file of provider messages: \
                  {\"messages\": [{\"id\": ..., \"labelIds\": [...], \"payload\": {...}}]}"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List unread messages
    List {
        mailbox: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show one message
    Show {
        mailbox: PathBuf,
        id: String,
        /// Print the body as an HTML fragment instead of terminal text
        #[arg(long)]
        html: bool,
        #[arg(long)]
        json: bool,
    },
    /// Extract text and HTML from a payload or message JSON file ("-" for stdin)
    Extract {
        input: PathBuf,
        /// Fail if any text part cannot be decoded
        #[arg(long)]
        strict: bool,
    },
    /// Mark a message as read
    Read {
        mailbox: PathBuf,
        id: String,
    },
    /// Print the unsubscribe link of a message
    Unsubscribe {
        mailbox: PathBuf,
        id: String,
    },
    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mailglance::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::List { mailbox, json } => cmd_list(&mailbox, json, &config),
        Commands::Show {
            mailbox,
            id,
            html,
            json,
        } => cmd_show(&mailbox, &id, html, json, &config),
        Commands::Extract { input, strict } => cmd_extract(&input, strict),
        Commands::Read { mailbox, id } => cmd_read(&mailbox, &id),
        Commands::Unsubscribe { mailbox, id } => cmd_unsubscribe(&mailbox, &id, &config),
        Commands::Config { save } => cmd_config(&config, save),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = mailglance::config::log_file_path(config);
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_default();
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_name = log_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "mailglance.log".into());
        let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// List unread messages.
fn cmd_list(path: &Path, json: bool, config: &Config) -> anyhow::Result<()> {
    let mailbox = Mailbox::open(path)?;
    let summaries: Vec<_> = mailbox
        .list_unread()
        .into_iter()
        .map(|m| summarize(m, config.display.prefer))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!();
    println!("  {} unread message(s)", summaries.len());
    println!();
    if summaries.is_empty() {
        return Ok(());
    }

    println!("{}", render::list_header(config));
    println!("{}", render::list_rule(config));
    for summary in &summaries {
        println!("{}", render::list_row(summary, config));
    }
    println!();
    Ok(())
}

/// Show one message.
fn cmd_show(path: &Path, id: &str, html: bool, json: bool, config: &Config) -> anyhow::Result<()> {
    let mailbox = Mailbox::open(path)?;
    let raw = mailbox.get(id)?;
    let parsed = parse_message(raw, config.display.prefer);

    if json {
        let output = serde_json::json!({
            "summary": parsed.summary,
            "textContent": parsed.content.text_content,
            "htmlContent": parsed.content.html_content,
            "skipped": parsed.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if html {
        println!("{}", render::detail_html(&parsed.summary));
    } else {
        print!("{}", render::detail_text(&parsed.summary, config));
    }

    if !parsed.skipped.is_empty() {
        eprintln!(
            "  [{} part(s) could not be decoded and were left out]",
            parsed.skipped.len()
        );
    }
    Ok(())
}

/// Extract text and HTML from a standalone payload document.
fn cmd_extract(input: &Path, strict: bool) -> anyhow::Result<()> {
    let json = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !input.exists() {
            anyhow::bail!("File not found: {}", input.display());
        }
        std::fs::read_to_string(input)?
    };

    let root = payload_from_json(&json)?;
    let extraction = extract_content_with(root.as_ref(), &mut TracingHook);

    let output = if strict {
        let content = extraction.into_strict()?;
        serde_json::to_value(content)?
    } else {
        serde_json::json!({
            "textContent": extraction.content.text_content,
            "htmlContent": extraction.content.html_content,
            "skipped": extraction.skipped,
        })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Mark a message as read and save the mailbox.
fn cmd_read(path: &Path, id: &str) -> anyhow::Result<()> {
    let mut mailbox = Mailbox::open(path)?;
    if mailbox.mark_as_read(id)? {
        mailbox.save()?;
        println!("  Marked {id} as read");
    } else {
        println!("  {id} was already read");
    }
    Ok(())
}

/// Print the link to open for unsubscribing.
fn cmd_unsubscribe(path: &Path, id: &str, config: &Config) -> anyhow::Result<()> {
    let mailbox = Mailbox::open(path)?;
    let value = mailbox.unsubscribe_link(id)?;

    let Some(link) = unsubscribe::resolve(
        value,
        &config.unsubscribe.dev_host,
        &config.unsubscribe.origin,
    ) else {
        anyhow::bail!("No usable unsubscribe link in: {value}");
    };

    println!("{link}");
    Ok(())
}

/// Print (and optionally save) the effective configuration.
fn cmd_config(config: &Config, save: bool) -> anyhow::Result<()> {
    if let Some(path) = mailglance::config::config_file_path() {
        println!("# {}", path.display());
    }
    print!("{}", toml::to_string_pretty(config)?);

    if save {
        mailglance::config::save_config(config)?;
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailglance", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
