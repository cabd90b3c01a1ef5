#![allow(non_snake_case)]

mod cli;

use std::env;
use std::path::Path;
use std::process;

use chrono_tz::Tz;
use clap::Parser;
use inquire::{Password, Text};

use dutyCal::clients::portal_client::PortalClient;
use dutyCal::config::AppConfig;
use dutyCal::service::augment_service::{self, FailurePolicy};

use crate::cli::Cli;

const DEFAULT_LOCATION: &str = "al. Wojciecha Korfantego 2 Katowice, Polska";
const DEFAULT_TIMEZONE: &str = "Europe/Warsaw";

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let config = match config_path(&args) {
        Some(path) => AppConfig::from_file(&path).unwrap_or_default(),
        None => AppConfig::default(),
    };
    let get_prop = |key: &str| -> Option<String> { config.get(key).or_else(|| env::var(key).ok()) };

    let username = args
        .username
        .clone()
        .or_else(|| get_prop("IRENA_USERNAME"))
        .unwrap_or_else(prompt_username);
    let password = args
        .password
        .clone()
        .or_else(|| get_prop("IRENA_PASSWORD"))
        .unwrap_or_else(prompt_password);

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| format!("out_{}", args.input));
    if out_path == args.input {
        eprintln!("Error: output path is the same as the input .ics file.");
        process::exit(1);
    }

    let location = args
        .location
        .clone()
        .or_else(|| get_prop("IRENA_LOCATION"))
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let timezone = args
        .timezone
        .clone()
        .or_else(|| get_prop("IRENA_TIMEZONE"))
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
    let local_tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            eprintln!("Error: unknown timezone '{}'.", timezone);
            process::exit(1);
        }
    };

    let mut calendar = match augment_service::load_calendar(Path::new(&args.input)) {
        Ok(calendar) => calendar,
        Err(error) => {
            eprintln!("Error reading calendar {}: {}", args.input, error);
            process::exit(1);
        }
    };

    println!("Starting session.");
    let session = match PortalClient::login(&username, &password).await {
        Ok(session) => session,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };
    println!("Authenticated.");

    let policy = if args.skip_failed {
        FailurePolicy::SkipEvent
    } else {
        FailurePolicy::Abort
    };
    if let Err(error) =
        augment_service::augment_calendar(&mut calendar, &session, local_tz, &location, policy).await
    {
        eprintln!("Error: {}", error);
        process::exit(1);
    }

    if let Err(error) = augment_service::write_calendar(Path::new(&out_path), &calendar) {
        eprintln!("Error writing {}: {}", out_path, error);
        process::exit(1);
    }
    println!("Done.");
}

fn config_path(args: &Cli) -> Option<String> {
    args.config
        .clone()
        .or_else(|| env::var("CONFIG_FILE").ok())
        .or_else(|| {
            let home = env::var("HOME").ok()?;
            let path = format!("{home}/.irena.conf");
            Path::new(&path).exists().then_some(path)
        })
}

fn prompt_username() -> String {
    match Text::new("Portal username:").prompt() {
        Ok(value) if !value.trim().is_empty() => value,
        _ => credentials_required(),
    }
}

fn prompt_password() -> String {
    match Password::new("Portal password:")
        .without_confirmation()
        .prompt()
    {
        Ok(value) if !value.is_empty() => value,
        _ => credentials_required(),
    }
}

fn credentials_required() -> ! {
    eprintln!(
        "Error: username and password are required; pass them via flags, a config file or the prompt."
    );
    process::exit(2);
}
