//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use crate::config::{ClientOptions, HttpMethod, URL_COOKIE};
use crate::cookies::FileCookieStore;
use crate::error::{CopsError, Result};
use crate::exit_code::exit_code_for_error;
use crate::form::{FormData, FormEncoding};
use crate::http::{ApiClient, ReqwestTransport};
use crate::logging;
use crate::navigation::{self, LoggingNavigator};
use crate::output::{OutputConfig, OutputWriter};
use crate::rejection::{handle_rejection, StderrNotifier};
use crate::session::Session;
use crate::utils::{FileUtils, StringUtils, UrlUtils};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Main entry point for the CLI application
pub fn run() {
    logging::init();

    let matches = create_app().get_matches();

    if let Err(e) = run_with_args(&matches) {
        // Rejections were already alerted by the shared handler
        if !matches!(e, CopsError::Rejected(_)) {
            eprintln!("cops: error: {}", e);
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

/// Settings shared by every subcommand
struct CliSettings {
    options: ClientOptions,
    cookie_jar: PathBuf,
    output: OutputConfig,
}

/// Run cops with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> Result<()> {
    let settings = build_settings_from_args(matches)?;
    let writer = OutputWriter::new(settings.output.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CopsError::Config(format!("Failed to create async runtime: {}", e)))?;

    match matches.subcommand() {
        Some(("home", _)) => {
            let mut navigator = LoggingNavigator::new();
            navigation::home(&mut navigator);
            write_location(&writer, &navigator)
        }
        Some(("logout", _)) => {
            let store = FileCookieStore::open(&settings.cookie_jar)?;
            // A bad base URL must not skip the logout cleanup
            let transport = match settings
                .options
                .clone()
                .resolve_base_url(&store)
                .and_then(|options| build_transport(&options, &store))
            {
                Ok(transport) => transport,
                Err(err) => {
                    log::debug!("Logging out without session cookies: {}", err);
                    ReqwestTransport::new(&settings.options)?
                }
            };

            let mut session = Session::new(
                transport,
                settings.options,
                store,
                StderrNotifier,
                LoggingNavigator::new(),
            );
            rt.block_on(session.logout());
            write_location(&writer, session.navigator())
        }
        Some(("health", _)) => {
            let store = FileCookieStore::open(&settings.cookie_jar)?;
            let options = settings.options.resolve_base_url(&store)?;
            let transport = build_transport(&options, &store)?;
            let client = ApiClient::new(&transport, &options);

            let healthy = rt.block_on(client.health())?;
            writer.write_status(if healthy { "healthy" } else { "unhealthy" })
        }
        Some((name, sub_matches)) => {
            let method: HttpMethod = name.parse()?;
            let api = sub_matches
                .get_one::<String>("api")
                .ok_or_else(|| CopsError::Config("Missing API path".to_string()))?;
            let data = parse_form_data(sub_matches)?;

            let store = FileCookieStore::open(&settings.cookie_jar)?;
            let options = settings.options.resolve_base_url(&store)?;
            let transport = build_transport(&options, &store)?;
            let client = ApiClient::new(&transport, &options);

            match rt.block_on(client.send(method, api, Some(&data))) {
                Ok(response) => writer.write_response(&response),
                Err(CopsError::Rejected(rejection)) => {
                    handle_rejection(&StderrNotifier, &rejection);
                    Err(CopsError::Rejected(rejection))
                }
                Err(err) => Err(err),
            }
        }
        None => Err(CopsError::Config("No command given".to_string())),
    }
}

/// Transport carrying the jar's session cookies (everything but `url`)
fn build_transport(options: &ClientOptions, store: &FileCookieStore) -> Result<ReqwestTransport> {
    let transport = ReqwestTransport::new(options)?;
    if !options.with_credentials {
        return Ok(transport);
    }
    let session_cookies = store.iter().filter(|(name, _)| *name != URL_COOKIE);
    transport.with_session_cookies(&options.base_url, session_cookies)
}

fn write_location(writer: &OutputWriter, navigator: &LoggingNavigator) -> Result<()> {
    match navigator.location() {
        Some(location) => writer.write_status(&format!("Location: {}", location)),
        None => Ok(()),
    }
}

fn parse_form_data(matches: &ArgMatches) -> Result<FormData> {
    let mut form = FormData::new();
    if let Ok(Some(fields)) = matches.try_get_many::<String>("data") {
        for field in fields {
            let (key, value) = StringUtils::parse_field(field)?;
            form.insert(key, value);
        }
    }
    Ok(form)
}

fn verb_command(name: &'static str, about: &'static str, with_data: bool) -> Command {
    let command = Command::new(name).about(about).arg(
        Arg::new("api")
            .help("API path appended to the base URL, e.g. /api/course")
            .required(true)
            .index(1),
    );

    if with_data {
        command.arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("KEY=VALUE")
                .help("Form field sent in the request body")
                .action(clap::ArgAction::Append),
        )
    } else {
        command
    }
}

/// Create the CLI application structure
fn create_app() -> Command {
    Command::new("cops")
        .version(crate::VERSION)
        .about("Session-aware request helper for the COPS platform API")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(verb_command("get", "Send a GET request", false))
        .subcommand(verb_command("post", "Send a form-encoded POST request", true))
        .subcommand(verb_command("put", "Send a form-encoded PUT request", true))
        .subcommand(verb_command("delete", "Send a form-encoded DELETE request", true))
        .subcommand(Command::new("logout").about("Log out and clear the session"))
        .subcommand(Command::new("home").about("Navigate to the home page"))
        .subcommand(Command::new("health").about("Check whether the session is alive"))
        .arg(Arg::new("base-url")
            .long("base-url")
            .value_name("URL")
            .env("COPS_URL")
            .global(true)
            .help("API base URL (defaults to the `url` session cookie)"))
        .arg(Arg::new("cookie-jar")
            .short('b')
            .long("cookie-jar")
            .value_name("FILE")
            .env("COPS_COOKIE_JAR")
            .global(true)
            .help("Session cookie jar (JSON)"))
        .arg(Arg::new("percent-encode")
            .long("percent-encode")
            .global(true)
            .help("Percent-encode form fields")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("no-credentials")
            .long("no-credentials")
            .global(true)
            .help("Do not send or store session cookies")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("json")
            .long("json")
            .global(true)
            .help("Pretty-print JSON responses")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("silent")
            .short('s')
            .long("silent")
            .global(true)
            .help("Silent mode")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .global(true)
            .help("Write response body to file"))
        .arg(Arg::new("timeout")
            .long("timeout")
            .value_name("SECONDS")
            .global(true)
            .help("Maximum time for operation")
            .default_value("300"))
        .arg(Arg::new("connect-timeout")
            .long("connect-timeout")
            .value_name("SECONDS")
            .global(true)
            .help("Maximum time for connection")
            .default_value("30"))
}

/// Build settings from command line arguments
fn build_settings_from_args(matches: &ArgMatches) -> Result<CliSettings> {
    let mut options = ClientOptions::default();

    if let Some(base_url) = matches.get_one::<String>("base-url") {
        options.base_url = UrlUtils::normalize_base_url(base_url)?;
    }

    options.with_credentials = !matches.get_flag("no-credentials");

    if matches.get_flag("percent-encode") {
        options.form_encoding = FormEncoding::Percent;
    }

    if let Some(timeout_str) = matches.get_one::<String>("timeout") {
        options.timeout = StringUtils::parse_timeout(timeout_str)?;
    }

    if let Some(connect_timeout_str) = matches.get_one::<String>("connect-timeout") {
        options.connect_timeout = StringUtils::parse_timeout(connect_timeout_str)?;
    }

    let cookie_jar = match matches.get_one::<String>("cookie-jar") {
        Some(path) => FileUtils::expand_path(path)?,
        None => FileCookieStore::default_path()?,
    };

    let output = OutputConfig {
        file: match matches.get_one::<String>("output") {
            Some(path) => Some(FileUtils::expand_path(path)?),
            None => None,
        },
        silent: matches.get_flag("silent"),
        format_json: matches.get_flag("json"),
    };

    Ok(CliSettings {
        options,
        cookie_jar,
        output,
    })
}
