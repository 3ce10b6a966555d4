//! `ledgerdesk` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from `LEDGERDESK_*` variables and flags.
//! - Run one Data Service action and print its result as JSON.
//!
//! # Invariants
//! - Exit code is 0 for `ok`, 2 for `invalid`, 1 for `failed` or errors.

mod cli;

use clap::Parser;
use cli::{Cli, Command, CustomerAction, CustomerFields, InvoiceAction, InvoiceFields, UserAction};
use ledgerdesk_core::{
    init_logging, open_db, ActionResult, ActionStatus, CoreConfig, CustomerRecord,
    CustomerService, InvoiceForm, InvoiceService, NewUser, RecordService, SqliteCustomerRepository,
    SqliteInvoiceRepository, SqliteUserRepository, StoreContext, UserService, UserUpdate,
    ViewSession,
};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;

type CliResult = Result<ExitCode, Box<dyn Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult {
    let config = resolve_config(&cli)?;
    if let Some(dir) = &config.log_dir {
        let dir = dir
            .to_str()
            .ok_or("log directory must be valid UTF-8")?;
        init_logging(&config.log_level, dir)?;
    }

    if let Command::Ping = cli.command {
        println!("ledgerdesk_core ping={}", ledgerdesk_core::ping());
        println!("ledgerdesk_core version={}", ledgerdesk_core::core_version());
        return Ok(ExitCode::SUCCESS);
    }

    let conn = open_db(&config.db_path)?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Command::Ping => Ok(ExitCode::SUCCESS),
        Command::Customers { action } => {
            let service = CustomerService::with_page_size(
                SqliteCustomerRepository::try_new(&conn)?,
                config.items_per_page,
            );
            run_customers(&config, &service, action)
        }
        Command::Users { action } => {
            let service = UserService::with_page_size(
                SqliteUserRepository::try_new(&conn)?,
                config.items_per_page,
            );
            run_users(&service, action)
        }
        Command::Invoices { action } => {
            let service = InvoiceService::with_page_size(
                SqliteInvoiceRepository::try_new(&conn)?,
                config.items_per_page,
            );
            run_invoices(&service, action)
        }
    }
}

/// Environment first, then flags.
fn resolve_config(cli: &Cli) -> Result<CoreConfig, Box<dyn Error>> {
    apply_flags(CoreConfig::from_env()?, cli)
}

fn apply_flags(mut config: CoreConfig, cli: &Cli) -> Result<CoreConfig, Box<dyn Error>> {
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(size) = cli.page_size {
        config.items_per_page = ledgerdesk_core::config::parse_page_size(&size.to_string())?;
    }
    Ok(config)
}

fn run_customers<S>(
    config: &CoreConfig,
    service: &CustomerService<S>,
    action: CustomerAction,
) -> CliResult
where
    S: ledgerdesk_core::CustomerRepository,
{
    match action {
        CustomerAction::List(args) => print_json(&service.fetch_all(&args.query, args.page)?),
        CustomerAction::Pages { query } => print_json(&service.fetch_pages(&query)?),
        CustomerAction::Show { id } => print_json(&service.get(&id)?),
        CustomerAction::Add(fields) => {
            // Adds go through a mounted view so the store and the database agree.
            let mut ctx = StoreContext::from_config(config);
            let mut session = ViewSession::from_config(config);
            session.render(&mut ctx, service, "", 1)?;
            let outcome = session.add(&mut ctx, service, customer_from(fields));
            let code = exit_code(&outcome.result);
            print_json(&serde_json::json!({
                "id": outcome.record_id,
                "settlement": outcome.settlement,
                "result": outcome.result,
            }))?;
            Ok(code)
        }
        CustomerAction::Update { id, fields } => {
            let mut record = customer_from(fields);
            record.id = id;
            report(service.update(&record))
        }
        CustomerAction::Delete { id } => report(service.remove(&id)),
    }
}

fn run_users<S>(service: &UserService<S>, action: UserAction) -> CliResult
where
    S: ledgerdesk_core::UserRepository,
{
    match action {
        UserAction::List(args) => print_json(&service.list_users(&args.query, args.page)?),
        UserAction::Show { id } => print_json(&service.get_user(&id)?),
        UserAction::Create {
            name,
            email,
            password,
            confirm_password,
        } => report(service.create_user(&NewUser {
            name,
            email,
            password,
            confirm_password,
        })),
        UserAction::Update { id, name, email } => {
            report(service.update_user(&UserUpdate { id, name, email }))
        }
        UserAction::Delete { id } => report(service.delete_user(&id)),
    }
}

fn run_invoices<S>(service: &InvoiceService<S>, action: InvoiceAction) -> CliResult
where
    S: ledgerdesk_core::InvoiceRepository,
{
    match action {
        InvoiceAction::List(args) => print_json(&service.list_invoices(&args.query, args.page)?),
        InvoiceAction::Show { id } => print_json(&service.get_invoice(&id)?),
        InvoiceAction::Create(fields) => report(service.create_invoice(&invoice_form(fields))),
        InvoiceAction::Update { id, fields } => {
            report(service.update_invoice(&id, &invoice_form(fields)))
        }
        InvoiceAction::Delete { id } => report(service.delete_invoice(&id)),
    }
}

fn customer_from(fields: CustomerFields) -> CustomerRecord {
    CustomerRecord::new(fields.name, fields.email, fields.image_url)
}

fn invoice_form(fields: InvoiceFields) -> InvoiceForm {
    InvoiceForm {
        customer_id: fields.customer_id,
        amount: fields.amount,
        status: fields.status,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}

fn report(result: ActionResult) -> CliResult {
    print_json(&result)?;
    Ok(exit_code(&result))
}

fn exit_code(result: &ActionResult) -> ExitCode {
    match result.status {
        ActionStatus::Ok => ExitCode::SUCCESS,
        ActionStatus::Invalid => ExitCode::from(2),
        ActionStatus::Failed => ExitCode::FAILURE,
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Ping => "ping",
        Command::Customers { .. } => "customers",
        Command::Users { .. } => "users",
        Command::Invoices { .. } => "invoices",
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_flags, customer_from, exit_code, invoice_form};
    use crate::cli::{Cli, CustomerFields, InvoiceFields};
    use clap::Parser;
    use ledgerdesk_core::config::{ENV_DB, ENV_PAGE_SIZE};
    use ledgerdesk_core::{ActionResult, CoreConfig, FieldErrors};
    use std::path::PathBuf;
    use std::process::ExitCode;

    fn env_config(pairs: &[(&str, &str)]) -> CoreConfig {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(move |key| {
            pairs
                .iter()
                .find(|(candidate, _)| candidate == key)
                .map(|(_, value)| value.clone())
        })
        .unwrap()
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "ledgerdesk",
            "--db",
            "/tmp/override.sqlite3",
            "--page-size",
            "9",
            "ping",
        ])
        .unwrap();
        let base = env_config(&[(ENV_DB, "/tmp/env.sqlite3"), (ENV_PAGE_SIZE, "3")]);

        let config = apply_flags(base, &cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/override.sqlite3"));
        assert_eq!(config.items_per_page, 9);
    }

    #[test]
    fn environment_applies_when_flags_are_absent() {
        let cli = Cli::try_parse_from(["ledgerdesk", "ping"]).unwrap();
        let base = env_config(&[(ENV_DB, "/tmp/env.sqlite3"), (ENV_PAGE_SIZE, "3")]);

        let config = apply_flags(base, &cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/env.sqlite3"));
        assert_eq!(config.items_per_page, 3);
    }

    #[test]
    fn out_of_range_page_size_flag_is_rejected() {
        let cli = Cli::try_parse_from(["ledgerdesk", "--page-size", "0", "ping"]).unwrap();
        let err = apply_flags(env_config(&[]), &cli).unwrap_err();
        assert!(err.to_string().contains("between 1 and 100"));
    }

    #[test]
    fn exit_codes_follow_action_status() {
        assert_eq!(exit_code(&ActionResult::ok("Deleted User.")), ExitCode::SUCCESS);
        assert_eq!(
            exit_code(&ActionResult::invalid(FieldErrors::single("name", "x"), "Missing Fields.")),
            ExitCode::from(2)
        );
        assert_eq!(exit_code(&ActionResult::failed("Database Error")), ExitCode::FAILURE);
    }

    #[test]
    fn field_conversions_keep_values() {
        let customer = customer_from(CustomerFields {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            image_url: "https://example.com/jane.png".to_string(),
        });
        assert!(customer.id.is_empty());
        assert_eq!(customer.name, "Jane Doe");

        let form = invoice_form(InvoiceFields {
            customer_id: Some("c1".to_string()),
            amount: None,
            status: Some("paid".to_string()),
        });
        assert_eq!(form.customer_id.as_deref(), Some("c1"));
        assert_eq!(form.amount, None);
    }
}
