use ledgerdesk_core::db::open_db_in_memory;
use ledgerdesk_core::{
    ActionStatus, CustomerRecord, CustomerRepository, InvoiceForm, InvoiceRepository,
    InvoiceService, InvoiceStatus, ListQuery, SqliteCustomerRepository, SqliteInvoiceRepository,
};
use rusqlite::Connection;

fn seed_customer(conn: &Connection, id: &str, name: &str) {
    let handle = name.to_ascii_lowercase().replace(' ', ".");
    SqliteCustomerRepository::try_new(conn)
        .unwrap()
        .create_customer(&CustomerRecord::with_id(
            id,
            name,
            format!("{handle}@example.com"),
            format!("https://example.com/{handle}.png"),
        ))
        .unwrap();
}

fn form(customer_id: &str, amount: &str, status: &str) -> InvoiceForm {
    InvoiceForm {
        customer_id: Some(customer_id.to_string()),
        amount: Some(amount.to_string()),
        status: Some(status.to_string()),
    }
}

#[test]
fn create_invoice_stores_cents_and_date() {
    let conn = open_db_in_memory().unwrap();
    seed_customer(&conn, "c1", "Ada Lovelace");
    let service = InvoiceService::new(SqliteInvoiceRepository::try_new(&conn).unwrap());

    let result = service.create_invoice(&form("c1", "12.5", "pending"));

    assert_eq!(result.message.as_deref(), Some("Created Invoice."));
    let invoices = service.list_invoices("", 1).unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].amount_cents, 1_250);
    assert_eq!(invoices[0].status, InvoiceStatus::Pending);
    assert_eq!(invoices[0].date.len(), "2024-01-31".len());
}

#[test]
fn create_invoice_reports_every_bad_field() {
    let conn = open_db_in_memory().unwrap();
    let service = InvoiceService::new(SqliteInvoiceRepository::try_new(&conn).unwrap());

    let result = service.create_invoice(&InvoiceForm {
        customer_id: None,
        amount: Some("-3".to_string()),
        status: Some("overdue".to_string()),
    });

    assert_eq!(result.status, ActionStatus::Invalid);
    assert_eq!(
        result.message.as_deref(),
        Some("Missing Fields. Failed to Create Invoice.")
    );
    assert_eq!(
        result.field_errors("customer_id"),
        ["Please select a customer.".to_string()]
    );
    assert_eq!(
        result.field_errors("amount"),
        ["Please enter an amount greater than $0.".to_string()]
    );
    assert_eq!(
        result.field_errors("status"),
        ["Please select an invoice status.".to_string()]
    );
}

#[test]
fn create_invoice_for_unknown_customer_is_invalid() {
    let conn = open_db_in_memory().unwrap();
    let service = InvoiceService::new(SqliteInvoiceRepository::try_new(&conn).unwrap());

    let result = service.create_invoice(&form("ghost", "10", "paid"));

    assert_eq!(result.status, ActionStatus::Invalid);
    assert_eq!(
        result.field_errors("customer_id"),
        ["Please select a customer.".to_string()]
    );
    assert!(service.list_invoices("", 1).unwrap().is_empty());
}

#[test]
fn update_invoice_keeps_date_and_rejects_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    seed_customer(&conn, "c1", "Ada Lovelace");
    seed_customer(&conn, "c2", "Alan Turing");
    let service = InvoiceService::new(SqliteInvoiceRepository::try_new(&conn).unwrap());
    service.create_invoice(&form("c1", "10", "pending"));
    let original = service.list_invoices("", 1).unwrap().remove(0);

    let result = service.update_invoice(&original.id, &form("c2", "99.99", "paid"));

    assert_eq!(result.message.as_deref(), Some("Updated Invoice."));
    let updated = service.get_invoice(&original.id).unwrap();
    assert_eq!(updated.customer_id, "c2");
    assert_eq!(updated.amount_cents, 9_999);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.date, original.date);

    let missing = service.update_invoice("ghost", &form("c1", "1", "paid"));
    assert_eq!(missing.status, ActionStatus::Failed);
    assert_eq!(
        missing.message.as_deref(),
        Some("Invoice not found. Failed to Update Invoice.")
    );
}

#[test]
fn delete_invoice_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    seed_customer(&conn, "c1", "Ada Lovelace");
    let service = InvoiceService::new(SqliteInvoiceRepository::try_new(&conn).unwrap());
    service.create_invoice(&form("c1", "10", "paid"));
    let id = service.list_invoices("", 1).unwrap()[0].id.clone();

    assert_eq!(service.delete_invoice(&id).message.as_deref(), Some("Deleted Invoice."));
    assert!(service.delete_invoice(&id).is_success());
    assert!(service.get_invoice(&id).unwrap_err().is_not_found());
}

#[test]
fn list_filters_on_customer_amount_and_status() {
    let conn = open_db_in_memory().unwrap();
    seed_customer(&conn, "c1", "Ada Lovelace");
    seed_customer(&conn, "c2", "Alan Turing");
    let repo = SqliteInvoiceRepository::try_new(&conn).unwrap();
    for (customer_id, amount, status) in [
        ("c1", "10", "pending"),
        ("c1", "25.5", "paid"),
        ("c2", "7", "pending"),
    ] {
        let invoice = form(customer_id, amount, status).parse().unwrap();
        repo.create_invoice(&invoice).unwrap();
    }
    assert_eq!(repo.count_invoices(&ListQuery::default()).unwrap(), 3);
    let service = InvoiceService::with_page_size(repo, 2);

    assert_eq!(service.invoice_pages("").unwrap(), 2);
    assert_eq!(service.list_invoices("turing", 1).unwrap().len(), 1);
    assert_eq!(service.list_invoices("2550", 1).unwrap()[0].amount_cents, 2_550);
    assert_eq!(service.invoice_pages("pending").unwrap(), 1);
    assert_eq!(service.list_invoices("pending", 1).unwrap().len(), 2);
}
