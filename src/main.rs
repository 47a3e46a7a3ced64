/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

/*!
Inventories the systems of a Satellite 6 organization.

For every registered system it collects:
- Subscription entitlements (name, amount, account, contract, dates)
- Compliance status and virtualization role
- Hardware facts (BIOS, manufacturer, serials, CPU counts, OS)

The result is written to `{orgid}_inventory_report.csv`, followed by a
subscription usage and compliance summary on the console.
*/

use clap::{CommandFactory, Parser};
use log::LevelFilter;
use sat6_inventory::ui;
use sat6_inventory::{
    InventoryReportingService, PartialSettings, ReportConfig, ReportError, ServiceContainer,
    Settings,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sat6_inventory",
    version,
    about = "Inventory Satellite 6 systems, their subscriptions and hardware facts",
    after_help = "Example usage: sat6_inventory -l admin -s satellite.example.com -o ACME_Corporation"
)]
struct Cli {
    /// Login user
    #[arg(short, long, env = "SAT6_LOGIN")]
    login: Option<String>,

    /// Password for specified user. Will prompt if omitted
    #[arg(short, long, env = "SAT6_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// FQDN of Satellite - omit https://
    #[arg(short, long, env = "SAT6_SATELLITE")]
    satellite: Option<String>,

    /// Label of the Organization in Satellite that is to be queried
    #[arg(short, long, env = "SAT6_ORGID")]
    orgid: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Debugging output and raw payload dumps (enables verbose)
    #[arg(short, long)]
    debug: bool,

    /// Accept invalid TLS certificates from the Satellite server
    #[arg(long)]
    insecure_tls: bool,

    /// TOML settings file; command line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the report and debug dumps
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> PartialSettings {
        PartialSettings {
            login: self.login.clone(),
            password: self.password.clone(),
            satellite: self.satellite.clone(),
            orgid: self.orgid.clone(),
            insecure_tls: self.insecure_tls.then_some(true),
            timeout_secs: self.timeout,
            output_dir: self.output_dir.clone(),
        }
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if debug {
        builder.filter_level(LevelFilter::Debug);
    } else if verbose {
        builder.filter_level(LevelFilter::Info);
    }

    builder
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("rustls", LevelFilter::Warn)
        .format_timestamp(None)
        .init();
}

fn resolve_settings(cli: &Cli) -> Result<Settings, ReportError> {
    let file = match &cli.config {
        Some(path) => PartialSettings::load(path)?,
        None => PartialSettings::default(),
    };
    Settings::try_from(cli.overrides().or(file))
}

fn print_usage() {
    eprintln!("Must specify login, server, and orgid options.  See usage:");
    if let Err(e) = Cli::command().print_help() {
        log::error!("Cannot print usage: {}", e);
    }
}

fn prompt_password(login: &str) -> Result<String, ReportError> {
    dialoguer::Password::new()
        .with_prompt(format!("{}'s password", login))
        .interact()
        .map_err(|e| ReportError::InvalidConfiguration(format!("cannot read password: {}", e)))
}

async fn run(cli: Cli) -> Result<(), ReportError> {
    let settings = resolve_settings(&cli)?;
    let debug = cli.debug;

    let password = match &settings.password {
        Some(password) => password.clone(),
        None => prompt_password(&settings.login)?,
    };

    log::debug!("LOGIN -> {}", settings.login);
    log::debug!("SATELLITE -> {}", settings.satellite);
    log::debug!("ORG ID -> {}", settings.orgid);
    log::debug!("Settings: {:?}", settings);

    let container = ServiceContainer::from_settings(&settings, &password, debug);
    let service = container.create_inventory_reporting_service()?;

    let report_config = ReportConfig {
        orgid: settings.orgid.clone(),
        debug_dumps: debug,
        verbose: cli.verbose || debug,
    };
    let report_path = container.report_path(&report_config);
    let mut sink = container.create_report_sink(&report_config)?;
    log::info!("Data will be written to {}", report_path.display());

    let report = service.generate_report(&report_config, &mut sink).await?;

    print!("{}", ui::render_subscription_summary(&report.subscriptions));
    print!("{}", ui::render_incompliant(&report.incompliant));
    print!("{}", ui::render_failures(&report.failures));
    println!();
    ui::print_success(&format!(
        "Wrote {} rows for {} systems to {}",
        report.rows_written,
        report.systems_seen,
        report_path.display()
    ));

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    if let Err(e) = run(cli).await {
        match &e {
            ReportError::MissingSettings(missing) => {
                log::debug!("Missing settings: {}", missing);
                print_usage();
            }
            ReportError::Api(api) if api.is_connectivity() => {
                ui::print_error(&format!("Error: cannot connect to the API: {}", api));
                eprintln!("Check your URL & try to login using the same user/pass via the WebUI and check the error!");
            }
            _ => ui::print_error(&format!("FATAL Error - {}", e)),
        }
        std::process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "sat6_inventory",
            "-l",
            "admin",
            "-s",
            "satellite.example.com",
            "-o",
            "ACME_Corporation",
            "-d",
        ])
        .unwrap();

        assert_eq!(cli.login.as_deref(), Some("admin"));
        assert_eq!(cli.satellite.as_deref(), Some("satellite.example.com"));
        assert_eq!(cli.orgid.as_deref(), Some("ACME_Corporation"));
        assert!(cli.debug);
        assert!(!cli.insecure_tls);
    }

    #[test]
    fn test_missing_login_is_reported_not_exited() {
        let cli = Cli::try_parse_from([
            "sat6_inventory",
            "-l",
            "",
            "-s",
            "satellite.example.com",
            "-o",
            "ACME_Corporation",
        ])
        .unwrap();

        let err = resolve_settings(&cli).unwrap_err();
        assert!(matches!(&err, ReportError::MissingSettings(missing) if missing == "login"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_overrides_leave_tls_unset_without_flag() {
        let cli = Cli::try_parse_from(["sat6_inventory", "--timeout", "5"]).unwrap();
        let overrides = cli.overrides();

        assert_eq!(overrides.insecure_tls, None);
        assert_eq!(overrides.timeout_secs, Some(5));
    }
}
