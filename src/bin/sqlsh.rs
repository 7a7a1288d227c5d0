use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use sql_session::prelude::*;
use tracing::Level;

/// Connection settings start from the `SQLSH_*` environment variables
/// (`SQLSH_URL`, `SQLSH_HOST`, `SQLSH_PASSWORD`, ...); flags override them.
#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive single-session SQL shell")]
struct Args {
    /// Full connection URL; overrides the individual connection options
    #[arg(long)]
    url: Option<String>,
    #[arg(long, value_enum)]
    flavor: Option<Flavor>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    dbname: Option<String>,
    /// Block UPDATE/DELETE without a key-based WHERE (`MySQL` only)
    #[arg(long)]
    safe_mode: bool,
    /// Print each result as a JSON object instead of tab-separated text
    #[arg(long)]
    json: bool,
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

impl Args {
    fn apply_to(&self, mut cfg: ConnectionConfig) -> ConnectionConfig {
        if let Some(flavor) = self.flavor {
            cfg.flavor = flavor;
        }
        if self.url.is_some() {
            cfg.url.clone_from(&self.url);
        }
        if self.host.is_some() {
            cfg.host.clone_from(&self.host);
        }
        if cfg.host.is_none() {
            cfg.host = Some("localhost".to_string());
        }
        cfg.port = self.port.or(cfg.port);
        if self.user.is_some() {
            cfg.user.clone_from(&self.user);
        }
        if self.dbname.is_some() {
            cfg.dbname.clone_from(&self.dbname);
        }
        cfg.safe_mode |= self.safe_mode;
        cfg
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    let cfg = match ConnectionConfig::from_env("SQLSH") {
        Ok(cfg) => args.apply_to(cfg),
        Err(err) => {
            eprintln!("{}", error_chain(&err));
            return ExitCode::FAILURE;
        }
    };

    let mut client = match BlockingDbClient::connect(cfg) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", error_chain(&err));
            return ExitCode::FAILURE;
        }
    };

    let status = run_shell(&mut client, args.json);

    if let Err(err) = client.destroy() {
        eprintln!("{}", error_chain(&err));
        return ExitCode::FAILURE;
    }
    match status {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_shell(client: &mut BlockingDbClient, json: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut statement = String::new();

    prompt(&mut stdout, client.flavor(), statement.is_empty())?;
    for line in stdin.lock().lines() {
        let line = line?;
        statement.push_str(&line);
        statement.push('\n');

        if line.trim_end().ends_with(';') {
            let sql = statement.trim();
            match client.query(sql) {
                Ok(Some(result)) => print_result(&mut stdout, &result, json)?,
                Ok(None) => writeln!(stdout, "OK")?,
                Err(err) => writeln!(stdout, "ERROR: {}", error_chain(&err))?,
            }
            statement.clear();
        }
        prompt(&mut stdout, client.flavor(), statement.trim().is_empty())?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn prompt(out: &mut impl Write, flavor: Flavor, fresh: bool) -> io::Result<()> {
    if fresh {
        write!(out, "{flavor}> ")?;
    } else {
        write!(out, "{:>width$}> ", "..", width = flavor.as_str().len())?;
    }
    out.flush()
}

fn print_result(out: &mut impl Write, result: &QueryResult, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, result).map_err(io::Error::other)?;
        return writeln!(out);
    }

    writeln!(out, "{}", result.columns().join("\t"))?;
    for idx in 0..result.len() {
        if let Some(values) = result.row_values(idx) {
            writeln!(out, "{}", values.join("\t"))?;
        }
    }
    writeln!(out, "({} row{})", result.len(), if result.len() == 1 { "" } else { "s" })
}
