//! SPSS Connect command line
//!
//! Runs the services over a JSON snapshot of the in-memory backends. Every
//! invocation loads the snapshot, signs in when credentials are given, runs
//! one command through the page gate and the services, then saves the
//! snapshot back.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod output;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use spss_access::{require_page, Page};
use spss_core::report::{export, HtmlFileRenderer};
use spss_core::validation::validate_form;
use spss_core::{ConnectConfig, ImportInput, Session, SortDirection, SpssConnect};
use spss_model::{RecordData, RecordId};
use spss_store::{MemoryIdentityProvider, MemoryStore, Snapshot};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Snapshot file used when `--data` is not given
pub const DEFAULT_DATA: &str = "spss-data.json";

/// Command tree
#[must_use]
pub fn cli() -> Command {
    Command::new("spss-connect")
        .version(spss_core::VERSION)
        .about("SPSS Connect household census records")
        .subcommand_required(true)
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .default_value(DEFAULT_DATA)
                .value_parser(value_parser!(PathBuf))
                .help("Snapshot file holding records and accounts"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(Arg::new("email").long("email").global(true).help("Sign in as this account"))
        .arg(Arg::new("password").long("password").global(true).help("Account password"))
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("register").about("Create an account with --email and --password"))
        .subcommand(Command::new("whoami").about("Show the signed-in account and role"))
        .subcommand(
            Command::new("list")
                .about("List records as the dashboard shows them")
                .arg(Arg::new("search").long("search").default_value("").help("Search text"))
                .arg(Arg::new("sort").long("sort").help("Sort field, e.g. name or pradeshikaSabha"))
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .action(ArgAction::SetTrue)
                        .help("Sort descending"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Page number"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show one record")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("edit").long("edit").help("Edit mode: 1 (admin) or share")),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a record body from a JSON file")
                .arg(Arg::new("file").required(true).value_parser(value_parser!(PathBuf))),
        )
        .subcommand(
            Command::new("create")
                .about("Submit a record body from a JSON file")
                .arg(Arg::new("file").required(true).value_parser(value_parser!(PathBuf))),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk import records from JSON")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file with one record or an array"),
                )
                .arg(Arg::new("paste").long("paste").help("JSON text; wins over --file")),
        )
        .subcommand(
            Command::new("export")
                .about("Write report HTML for PDF rendering")
                .subcommand_required(true)
                .arg(
                    Arg::new("out")
                        .long("out")
                        .global(true)
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output directory"),
                )
                .subcommand(Command::new("full").about("Every visible record"))
                .subcommand(
                    Command::new("sabha")
                        .about("Records of one Pradeshika Sabha")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("member")
                        .about("One household")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a record")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("users")
                .about("Manage accounts (super admin)")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List accounts, newest first"))
                .subcommand(
                    Command::new("create")
                        .about("Create an account")
                        .arg(Arg::new("new-email").long("new-email").required(true))
                        .arg(Arg::new("new-password").long("new-password").required(true))
                        .arg(Arg::new("role").long("role").required(true).help("user, admin or super_admin"))
                        .arg(Arg::new("sabha").long("sabha").required(true)),
                ),
        )
}

/// Whether `--log-json` was given
#[must_use]
pub fn wants_json_logs(matches: &ArgMatches) -> bool {
    matches.get_flag("log-json")
}

/// Run one command, returning what to print
///
/// # Errors
/// Snapshot and configuration I/O failures, and any service error
pub async fn run(matches: &ArgMatches) -> Result<String> {
    let data = matches
        .get_one::<PathBuf>("data")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA));
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ConnectConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConnectConfig::default(),
    };

    let snapshot = Snapshot::load(&data)
        .await
        .with_context(|| format!("loading snapshot {}", data.display()))?;
    let (store, identity) = snapshot.restore();
    let (store, identity) = (Arc::new(store), Arc::new(identity));
    let app = SpssConnect::new(store.clone(), identity.clone(), config)?;

    let output = dispatch(&app, matches).await;
    save(&data, &store, &identity).await?;
    output
}

async fn save(path: &Path, store: &MemoryStore, identity: &MemoryIdentityProvider) -> Result<()> {
    Snapshot::capture(store, identity)
        .save(path)
        .await
        .with_context(|| format!("saving snapshot {}", path.display()))?;
    debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

async fn sign_in(app: &SpssConnect, matches: &ArgMatches, register: bool) -> Result<Session> {
    let email = matches.get_one::<String>("email");
    let password = matches.get_one::<String>("password");
    match (email, password) {
        (Some(email), Some(password)) if register => Ok(app.auth().register(email, password).await?),
        (Some(email), Some(password)) => Ok(app.auth().login(email, password).await?),
        (None, None) if !register => Ok(Session::anonymous()),
        _ => bail!("--email and --password must be given together"),
    }
}

async fn dispatch(app: &SpssConnect, matches: &ArgMatches) -> Result<String> {
    let Some((name, args)) = matches.subcommand() else {
        bail!("no command given");
    };
    let session = sign_in(app, matches, name == "register").await?;
    info!(command = name, role = %session.role(), "running command");

    match name {
        "register" | "whoami" => Ok(output::whoami(&session)),
        "list" => list(app, &session, args).await,
        "show" => {
            let id = args.get_one::<String>("id").map(String::as_str);
            let edit = args.get_one::<String>("edit").map(String::as_str);
            let view = app.open(&session, id, edit).await?;
            Ok(output::record_view(&view))
        }
        "validate" => {
            let data = read_record(args).await?;
            Ok(output::validation(&validate_form(&data)))
        }
        "create" => {
            require_page(Page::Create, &session.viewer())?;
            let mut form = app.new_form(&session);
            form.fill(read_record(args).await?);
            let outcome = form.submit(&session, app.members()).await?;
            Ok(output::submit(&outcome))
        }
        "import" => {
            require_page(Page::Import, &session.viewer())?;
            let input = ImportInput {
                paste: args.get_one::<String>("paste").cloned(),
                file: match args.get_one::<PathBuf>("file") {
                    Some(path) => Some(
                        tokio::fs::read_to_string(path)
                            .await
                            .with_context(|| format!("reading {}", path.display()))?,
                    ),
                    None => None,
                },
            };
            let report = app.imports().import(&session, &input).await?;
            Ok(output::import(&report))
        }
        "export" => export_report(app, &session, args).await,
        "delete" => {
            let id = RecordId::from(required(args, "id")?);
            app.members().delete(&session, &id).await?;
            Ok(format!("{}\n", spss_core::messages::DELETE_SUCCESS))
        }
        "users" => users(app, &session, args).await,
        other => bail!("unknown command {other}"),
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing <{name}>"))
}

async fn read_record(args: &ArgMatches) -> Result<RecordData> {
    let path = args.get_one::<PathBuf>("file").context("missing <file>")?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

async fn list(app: &SpssConnect, session: &Session, args: &ArgMatches) -> Result<String> {
    let mut dashboard = app.dashboard();
    dashboard.load(session).await?;
    if let Some(field) = args.get_one::<String>("sort") {
        let direction = if args.get_flag("desc") { SortDirection::Desc } else { SortDirection::Asc };
        dashboard.set_sort(field, direction);
    }
    let query = args.get_one::<String>("search").map_or("", String::as_str);
    dashboard.set_query(query);
    dashboard.set_page(args.get_one::<usize>("page").copied().unwrap_or(1));
    Ok(output::dashboard(&dashboard.render(query)))
}

async fn export_report(app: &SpssConnect, session: &Session, args: &ArgMatches) -> Result<String> {
    let out = args
        .get_one::<PathBuf>("out")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let renderer = HtmlFileRenderer::new(out);

    let report = match args.subcommand() {
        Some(("member", sub)) => {
            let id = required(sub, "id")?;
            let record = app
                .members()
                .get(&RecordId::from(id))
                .await?
                .ok_or_else(|| spss_core::ConnectError::RecordNotFound(id.to_string()))?;
            app.reports().member_report(&record)
        }
        Some((kind, sub)) => {
            let mut dashboard = app.dashboard();
            dashboard.load(session).await?;
            if kind == "sabha" {
                app.reports().sabha_report(dashboard.records(), required(sub, "name")?)?
            } else {
                app.reports().full_report(dashboard.records())?
            }
        }
        None => bail!("export needs full, sabha or member"),
    };

    let path = export(session, &renderer, &report).await?;
    Ok(format!("Wrote {}\n", path.display()))
}

async fn users(app: &SpssConnect, session: &Session, args: &ArgMatches) -> Result<String> {
    require_page(Page::UserManagement, &session.viewer())?;
    match args.subcommand() {
        Some(("create", sub)) => {
            let message = app
                .users()
                .create_user(
                    session,
                    required(sub, "new-email")?,
                    required(sub, "new-password")?,
                    required(sub, "role")?,
                    required(sub, "sabha")?,
                )
                .await?;
            Ok(format!("{message}\n"))
        }
        _ => Ok(output::users(&app.users().list_users(session).await?)),
    }
}
