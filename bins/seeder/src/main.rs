//! Database seeder for Mizan development and testing.
//!
//! Seeds the waqf chart of accounts, the current fiscal year, and a
//! starter set of auto-journal templates for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use mizan_core::accounts::AccountType;
use mizan_core::autojournal::{AccountRef, AmountSpec, TemplateLine};
use mizan_db::repositories::{
    AccountRepository, AutoJournalRepository, CreateAccountInput, CreateTemplateInput, FiscalError,
    FiscalRepository,
};
use mizan_shared::types::AccountId;

/// Development chart of accounts: code, name, Arabic name, type,
/// header flag. Parents precede their children.
const CHART: [(&str, &str, &str, AccountType, bool); 32] = [
    ("1", "Assets", "الأصول", AccountType::Asset, true),
    ("1.1", "Current Assets", "الأصول المتداولة", AccountType::Asset, true),
    ("1.1.1", "Cash on Hand", "النقدية في الصندوق", AccountType::Asset, false),
    ("1.1.2", "Bank Accounts", "الحسابات البنكية", AccountType::Asset, false),
    ("1.1.3", "Rent Receivable", "إيجارات مستحقة القبض", AccountType::Asset, false),
    ("1.2", "Fixed Assets", "الأصول الثابتة", AccountType::Asset, true),
    ("1.2.1", "Waqf Land", "أراضي الوقف", AccountType::Asset, false),
    ("1.2.2", "Waqf Buildings", "مباني الوقف", AccountType::Asset, false),
    ("2", "Liabilities", "الالتزامات", AccountType::Liability, true),
    ("2.1", "Current Liabilities", "الالتزامات المتداولة", AccountType::Liability, true),
    ("2.1.1", "Accounts Payable", "الذمم الدائنة", AccountType::Liability, false),
    ("2.1.2", "Deposits Held", "التأمينات المستلمة", AccountType::Liability, false),
    ("2.2", "Long-term Liabilities", "الالتزامات طويلة الأجل", AccountType::Liability, true),
    ("2.2.1", "Long-term Financing", "التمويل طويل الأجل", AccountType::Liability, false),
    ("3", "Equity", "حقوق الملكية", AccountType::Equity, true),
    ("3.1", "Capital", "رأس المال", AccountType::Equity, true),
    ("3.1.1", "Waqf Corpus", "رأس مال الوقف", AccountType::Equity, false),
    ("3.2", "Reserves", "الاحتياطيات", AccountType::Equity, true),
    ("3.2.1", "Accumulated Surplus", "الفائض المتراكم", AccountType::Equity, false),
    ("4", "Revenue", "الإيرادات", AccountType::Revenue, true),
    ("4.1", "Rental Income", "إيرادات الإيجار", AccountType::Revenue, true),
    ("4.1.1", "Property Rental Income", "إيرادات تأجير العقارات", AccountType::Revenue, false),
    ("4.2", "Donations", "التبرعات", AccountType::Revenue, true),
    ("4.2.1", "Cash Waqf Donations", "تبرعات الوقف النقدي", AccountType::Revenue, false),
    ("5", "Expenses", "المصروفات", AccountType::Expense, true),
    ("5.1", "Property Expenses", "مصروفات العقارات", AccountType::Expense, true),
    ("5.1.1", "Maintenance and Repairs", "الصيانة والإصلاحات", AccountType::Expense, false),
    ("5.2", "Administrative Expenses", "المصروفات الإدارية", AccountType::Expense, true),
    ("5.2.1", "Salaries", "الرواتب", AccountType::Expense, false),
    ("5.2.2", "Utilities", "المرافق", AccountType::Expense, false),
    ("5.3", "Beneficiary Programs", "برامج المستفيدين", AccountType::Expense, true),
    ("5.3.1", "Beneficiary Distributions", "توزيعات المستفيدين", AccountType::Expense, false),
];

/// Starter templates: trigger, name, debit account code, credit
/// account code. Each maps the full trigger amount to one account
/// per side.
const TEMPLATES: [(&str, &str, &str, &str); 3] = [
    ("rental_receipt", "Rental income receipt", "1.1.2", "4.1.1"),
    ("donation_received", "Cash waqf donation", "1.1.1", "4.2.1"),
    ("maintenance_invoice", "Property maintenance invoice", "5.1.1", "2.1.1"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = mizan_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding fiscal year...");
    seed_fiscal_year(&db).await;

    println!("Seeding chart of accounts...");
    seed_chart_of_accounts(&db).await;

    println!("Seeding auto-journal templates...");
    seed_templates(&db).await;

    println!("Seeding complete!");
}

/// Opens a fiscal year for the current calendar year.
async fn seed_fiscal_year(db: &DatabaseConnection) {
    let repo = FiscalRepository::new(db.clone());
    let year = Utc::now().year();

    match repo.create_fiscal_year(year).await {
        Ok(created) => println!("  Opened fiscal year {}", created.year),
        Err(FiscalError::DuplicateYear(_)) => {
            println!("  Fiscal year {year} already exists, skipping...");
        }
        Err(e) => eprintln!("Failed to open fiscal year {year}: {e}"),
    }
}

/// Seeds the chart of accounts, skipping codes that already exist.
async fn seed_chart_of_accounts(db: &DatabaseConnection) {
    let repo = AccountRepository::new(db.clone());
    let mut created = 0;

    for (code, name, name_ar, account_type, is_header) in CHART {
        if repo.find_by_code(code).await.is_ok() {
            continue;
        }

        let parent_id = match parent_code(code) {
            Some(parent) => match repo.find_by_code(parent).await {
                Ok(account) => Some(AccountId::from_uuid(account.id)),
                Err(e) => {
                    eprintln!("Missing parent {parent} for account {code}: {e}");
                    continue;
                }
            },
            None => None,
        };

        let input = CreateAccountInput {
            code: code.to_string(),
            name: name.to_string(),
            name_ar: Some(name_ar.to_string()),
            description: None,
            account_type,
            account_nature: None,
            is_header,
            parent_id,
        };

        match repo.create_account(input).await {
            Ok(_) => created += 1,
            Err(e) => eprintln!("Failed to create account {code}: {e}"),
        }
    }

    println!("  Created {created} accounts");
}

/// Seeds one full-amount template per trigger event.
async fn seed_templates(db: &DatabaseConnection) {
    let repo = AutoJournalRepository::new(db.clone());

    for (trigger, name, debit_code, credit_code) in TEMPLATES {
        let existing = match repo.list_templates(Some(trigger)).await {
            Ok(templates) => templates,
            Err(e) => {
                eprintln!("Failed to list templates for {trigger}: {e}");
                continue;
            }
        };
        if !existing.is_empty() {
            println!("  Template for {trigger} already exists, skipping...");
            continue;
        }

        let input = CreateTemplateInput {
            trigger_event: trigger.to_string(),
            name: name.to_string(),
            debit_lines: vec![full_amount_line(debit_code)],
            credit_lines: vec![full_amount_line(credit_code)],
            priority: 10,
        };

        match repo.create_template(input).await {
            Ok(template) => println!("  Created template: {}", template.name),
            Err(e) => eprintln!("Failed to create template for {trigger}: {e}"),
        }
    }
}

/// Returns the code with its last segment removed, if any.
fn parent_code(code: &str) -> Option<&str> {
    code.rsplit_once('.').map(|(parent, _)| parent)
}

/// A mapping that posts the full trigger amount to one account.
fn full_amount_line(code: &str) -> TemplateLine {
    TemplateLine {
        account: AccountRef::ByCode {
            code: code.to_string(),
        },
        amount: AmountSpec::Percentage {
            percentage: Decimal::ONE_HUNDRED,
        },
    }
}
