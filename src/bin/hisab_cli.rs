use std::{env, error::Error, fs, process};

use chrono::{Local, NaiveDate};
use colored::Colorize;
use dialoguer::{Input, Select};

use hisab_core::{
    config::{Config, ConfigManager},
    engine,
    ledger::{CategoryKind, CategoryRef, Ledger, Transaction},
    receipt::{self, ScanOptions},
    reports,
    storage::{ledger_warnings, JsonStore, StorageBackend},
};

const DEFAULT_LEDGER: &str = "personal";

fn main() {
    hisab_core::init();
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("summary");

    let store = JsonStore::new_default()?;
    let config = ConfigManager::new()?.load()?;

    match command {
        "summary" => summary(&store),
        "categories" => categories(&store),
        "add" => add(&store),
        "scan" => scan(&config, args.get(1).map(String::as_str)),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            Err(format!("unknown command `{other}`").into())
        }
    }
}

fn print_usage() {
    println!(
        "{}\n\n  summary            derived category usage and totals\n  categories         list categories and budgets\n  add                record a transaction interactively\n  scan <text-file>   extract a draft transaction from OCR text",
        "hisab_cli: personal budget tool".bold()
    );
}

/// Loads the last-opened ledger, or seeds a fresh one with the stock
/// categories on first run.
fn open_or_seed(store: &JsonStore) -> Result<(Ledger, String), Box<dyn Error>> {
    if let Some(name) = store.last_ledger()? {
        if let Ok(ledger) = store.load(&name) {
            return Ok((ledger, name));
        }
    }
    let ledger = Ledger::with_default_categories(DEFAULT_LEDGER);
    store.save(&ledger, DEFAULT_LEDGER)?;
    Ok((ledger, DEFAULT_LEDGER.to_string()))
}

fn summary(store: &JsonStore) -> Result<(), Box<dyn Error>> {
    let (ledger, name) = open_or_seed(store)?;
    let summary = engine::summarize(&ledger.categories, &ledger.transactions);

    println!("{}", format!("Budget summary: {name}").bold());
    for cat in &summary.categories {
        let line = format!(
            "{:<16} spent {:>9.2} of {:>9.2}  ({:>5.1}% used, {:.2} left)",
            cat.name, cat.spent, cat.budget, cat.percent_used, cat.remaining
        );
        if cat.is_over_budget {
            println!("  {}  {}", line.red(), "OVER".red().bold());
        } else {
            println!("  {}", line.green());
        }
    }
    println!(
        "\n  total budget {:.2}   total spent {:.2}   remaining {:.2}",
        summary.totals.total_budget, summary.totals.total_spent, summary.totals.remaining
    );
    if summary.orphaned_transactions > 0 {
        println!(
            "  {} uncategorized expense(s)",
            summary.orphaned_transactions.to_string().yellow()
        );
    }
    let streak = reports::spending_streak(&ledger.transactions);
    if streak > 1 {
        println!("  {streak}-day entry streak");
    }
    for warning in ledger_warnings(&ledger) {
        tracing::warn!("{warning}");
    }
    Ok(())
}

fn categories(store: &JsonStore) -> Result<(), Box<dyn Error>> {
    let (ledger, _) = open_or_seed(store)?;
    for cat in &ledger.categories {
        println!("{:<16} {:>9.2}  [{}]", cat.name, cat.budget, cat.id);
    }
    Ok(())
}

fn add(store: &JsonStore) -> Result<(), Box<dyn Error>> {
    let (mut ledger, name) = open_or_seed(store)?;

    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let amount: f64 = Input::new().with_prompt("Amount").interact_text()?;
    let today = Local::now().date_naive();
    let date: NaiveDate = Input::new()
        .with_prompt("Date (YYYY-MM-DD)")
        .default(today)
        .interact_text()?;

    let kind = match Select::new()
        .with_prompt("Type")
        .items(&["expense", "income"])
        .default(0)
        .interact()?
    {
        1 => CategoryKind::Income,
        _ => CategoryKind::Expense,
    };

    let mut choices: Vec<&str> = ledger.categories.iter().map(|c| c.name.as_str()).collect();
    choices.push("(none)");
    let picked = Select::new()
        .with_prompt("Category")
        .items(&choices)
        .default(0)
        .interact()?;
    let category = ledger
        .categories
        .get(picked)
        .map(|c| CategoryRef::Id(c.id.clone()));

    ledger.add_transaction(Transaction::new(amount, kind, category, date, title));
    store.save(&ledger, &name)?;
    println!("{}", "Saved.".green());
    Ok(())
}

fn scan(config: &Config, path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let path = path.ok_or("usage: hisab_cli scan <text-file>")?;
    let text = fs::read_to_string(path)?;
    let options = ScanOptions {
        date_order: config.date_order,
    };
    let draft = receipt::scan(&text, Local::now().date_naive(), &options);

    println!("{}", "Draft transaction (edit before saving):".bold());
    println!("  title:    {}", draft.title.as_deref().unwrap_or("-"));
    println!(
        "  amount:   {}{}",
        config.currency_symbol,
        draft
            .amount
            .map(receipt::format_amount)
            .unwrap_or_else(|| "-".into())
    );
    println!("  date:     {}", draft.date);
    println!("  category: {}", draft.category.as_deref().unwrap_or("-"));
    Ok(())
}
