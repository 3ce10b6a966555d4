//! Command-line surface of the `ledgerdesk` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ledgerdesk")]
#[command(about = "Customer, user, and invoice records for the LedgerDesk dashboard")]
#[command(version)]
pub struct Cli {
    /// SQLite database file (overrides LEDGERDESK_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides LEDGERDESK_LOG_LEVEL)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides LEDGERDESK_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Rows per page (overrides LEDGERDESK_PAGE_SIZE)
    #[arg(long, global = true, value_name = "N")]
    pub page_size: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the core library is linked
    Ping,
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage dashboard users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage invoices
    Invoices {
        #[command(subcommand)]
        action: InvoiceAction,
    },
}

/// Filter and page shared by list commands.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Substring matched against searchable columns
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub image_url: String,
}

#[derive(Subcommand, Debug)]
pub enum CustomerAction {
    /// List one page of customers with invoice totals
    List(ListArgs),
    /// Number of pages for a filter
    Pages {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show one customer
    Show { id: String },
    /// Add a customer through the client store
    Add(CustomerFields),
    /// Rewrite a customer's name, email, and image
    Update {
        id: String,
        #[command(flatten)]
        fields: CustomerFields,
    },
    /// Delete a customer and its invoices
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    List(ListArgs),
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
    #[arg(long)]
    pub customer_id: Option<String>,
    /// Dollar amount, e.g. 12.50
    #[arg(long)]
    pub amount: Option<String>,
    /// pending|paid
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum InvoiceAction {
    List(ListArgs),
    Show {
        id: String,
    },
    Create(InvoiceFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: InvoiceFields,
    },
    Delete {
        id: String,
    },
}
