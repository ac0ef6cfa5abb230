use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use tally_core::{
    Budget, Category, Period, SortBy, SortOrder, Transaction, TransactionFilter,
    filter_budgets, filter_transactions, summarize,
};
use tally_store::{LEDGER_FILE, Session};
use tally_sync::ApiClient;

mod config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Personal finance tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the API credential
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Budget operations
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Transaction operations
    Txn {
        #[command(subcommand)]
        command: TxnCommand,
    },

    /// Print summary statistics for budgets, transactions, and savings
    Summary,

    /// Print the recorded savings ledger
    Savings,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Store a bearer token (prompts when not passed)
    SetToken {
        #[arg(long)]
        token: Option<String>,
    },

    /// Show whether a token is stored
    Status,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// List budgets, optionally for one period only
    List {
        /// weekly | monthly | yearly (default: all)
        #[arg(long)]
        period: Option<String>,
    },

    /// Add a budget
    Add {
        #[arg(long)]
        amount: f64,

        #[arg(long, default_value_t = 0.0)]
        spent: f64,

        /// weekly | monthly | yearly
        #[arg(long, default_value = "monthly")]
        period: String,

        #[arg(long, default_value = "other")]
        category: String,

        /// YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// YYYY-MM-DD
        #[arg(long)]
        end: String,
    },

    /// Replace a budget by id
    Update {
        id: String,

        #[arg(long)]
        amount: f64,

        #[arg(long, default_value_t = 0.0)]
        spent: f64,

        #[arg(long, default_value = "monthly")]
        period: String,

        #[arg(long, default_value = "other")]
        category: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,
    },

    /// Delete a budget by id
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum TxnCommand {
    /// List transactions through the filter/sort pipeline
    List {
        /// Case-insensitive match on description or category
        #[arg(long)]
        search: Option<String>,

        /// Inclusive lower date bound (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive upper date bound (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Inclusive lower bound on the signed amount
        #[arg(long)]
        min: Option<f64>,

        /// Inclusive upper bound on the signed amount
        #[arg(long)]
        max: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        /// date | amount
        #[arg(long, default_value = "date")]
        sort_by: String,

        /// asc | desc
        #[arg(long, default_value = "asc")]
        order: String,
    },

    /// Add a transaction (negative amount = expense)
    Add {
        #[arg(long)]
        description: String,

        #[arg(long, allow_hyphen_values = true)]
        amount: f64,

        #[arg(long, default_value = "other")]
        category: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },

    /// Replace a transaction by id
    Update {
        id: String,

        #[arg(long)]
        description: String,

        #[arg(long, allow_hyphen_values = true)]
        amount: f64,

        #[arg(long, default_value = "other")]
        category: String,

        #[arg(long)]
        date: String,
    },

    /// Delete a transaction by id
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Auth { command } => match command {
            AuthCommand::SetToken { token } => tally_sync::set_token(token)?,
            AuthCommand::Status => {
                let auth = tally_sync::load_auth()?;
                match auth.token {
                    Some(_) => println!("Signed in (token stored in ~/.tally/auth.json)"),
                    None => println!("Not signed in; run: tally auth set-token"),
                }
            }
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },

        Command::Budget { command } => match command {
            BudgetCommand::List { period } => {
                let session = build_session()?;
                session.refresh_budgets().await?;
                let period = period.as_deref().map(Period::parse);
                print_budgets(&filter_budgets(session.store().budgets(), period));
            }
            BudgetCommand::Add {
                amount,
                spent,
                period,
                category,
                start,
                end,
            } => {
                let budget = budget_from_args("", amount, spent, &period, &category, &start, &end)?;
                let session = build_session()?;
                session.add_budget(budget).await?;
                println!("Added budget ({} total now)", session.store().budgets().len());
            }
            BudgetCommand::Update {
                id,
                amount,
                spent,
                period,
                category,
                start,
                end,
            } => {
                let budget =
                    budget_from_args(&id, amount, spent, &period, &category, &start, &end)?;
                let session = build_session()?;
                session.update_budget(budget).await?;
                println!("Updated budget {id}");
            }
            BudgetCommand::Delete { id } => {
                let session = build_session()?;
                session.delete_budget(&id).await?;
                println!("Deleted budget {id}");
            }
        },

        Command::Txn { command } => match command {
            TxnCommand::List {
                search,
                from,
                to,
                min,
                max,
                category,
                sort_by,
                order,
            } => {
                let filter = TransactionFilter {
                    search,
                    from_date: from.as_deref().map(parse_date).transpose()?,
                    to_date: to.as_deref().map(parse_date).transpose()?,
                    min_amount: min,
                    max_amount: max,
                    category: category.as_deref().map(Category::parse),
                    sort_by: match sort_by.as_str() {
                        "amount" => SortBy::Amount,
                        _ => SortBy::Date,
                    },
                    sort_order: match order.as_str() {
                        "desc" => SortOrder::Desc,
                        _ => SortOrder::Asc,
                    },
                };
                let session = build_session()?;
                session.refresh_transactions().await?;
                print_transactions(&filter_transactions(session.store().transactions(), &filter));
            }
            TxnCommand::Add {
                description,
                amount,
                category,
                date,
            } => {
                let txn = Transaction {
                    id: String::new(),
                    description,
                    amount,
                    category: Category::parse(&category),
                    date: parse_date(&date)?,
                };
                let session = build_session()?;
                session.add_transaction(txn).await?;
                println!(
                    "Added transaction ({} total now)",
                    session.store().transactions().len()
                );
            }
            TxnCommand::Update {
                id,
                description,
                amount,
                category,
                date,
            } => {
                let txn = Transaction {
                    id: id.clone(),
                    description,
                    amount,
                    category: Category::parse(&category),
                    date: parse_date(&date)?,
                };
                let session = build_session()?;
                session.update_transaction(txn).await?;
                println!("Updated transaction {id}");
            }
            TxnCommand::Delete { id } => {
                let session = build_session()?;
                session.delete_transaction(&id).await?;
                println!("Deleted transaction {id}");
            }
        },

        Command::Summary => {
            let session = build_session()?;
            session.refresh_all().await?;
            let store = session.store();
            let summary = summarize(store.budgets(), store.transactions(), &session.ledger());

            println!("Total budget:     ${:.2}", summary.total_budget);
            println!("Total spent:      ${:.2}", summary.total_spent);
            println!("Remaining:        ${:.2}", summary.remaining_budget);
            println!("Percent spent:    {:.1}%", summary.percent_spent);
            println!("Accrued savings:  ${:.2}", summary.total_savings);
            if let Some(t) = &summary.largest_transaction {
                println!("Largest txn:      {} (${:.2})", t.description, t.amount);
            }
            if let Some(c) = summary.top_spending_category {
                println!("Top spending:     {}", c.as_str());
            }

            println!("\nPer category:");
            for c in summary
                .categories
                .iter()
                .filter(|c| c.total_budget > 0.0 || c.transaction_count > 0)
            {
                println!(
                    "  {:<14} budget=${:<10.2} spent=${:<10.2} remaining=${:<10.2} {:>5.1}% ({} txns, avg ${:.2})",
                    c.category.as_str(),
                    c.total_budget,
                    c.total_spent,
                    c.remaining_budget,
                    c.percent_spent,
                    c.transaction_count,
                    c.avg_spending_per_transaction,
                );
            }
        }

        Command::Savings => {
            let session = build_session()?;
            let ledger = session.ledger();
            if ledger.is_empty() {
                println!("No savings recorded yet");
            }
            for e in ledger.iter() {
                println!(
                    "{:<12} {:<10} {:<8} ended {} saved ${:.2}",
                    e.id,
                    e.category.as_str(),
                    e.period.as_str(),
                    e.end_date,
                    e.savings,
                );
            }
        }
    }

    Ok(())
}

fn build_session() -> Result<Session<ApiClient>> {
    let cfg = config::load_config()?;
    let auth = tally_sync::load_auth()?;
    let client = ApiClient::new(cfg.api.base_url, auth.token);
    let ledger_path = tally_sync::ensure_tally_home()?.join(LEDGER_FILE);
    Ok(Session::new(client, ledger_path)?)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse()
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

fn budget_from_args(
    id: &str,
    amount: f64,
    spent: f64,
    period: &str,
    category: &str,
    start: &str,
    end: &str,
) -> Result<Budget> {
    Ok(Budget {
        id: id.to_string(),
        amount,
        spent,
        period: Period::parse(period),
        category: Category::parse(category),
        start_date: parse_date(start)?,
        end_date: parse_date(end)?,
    })
}

fn print_budgets(budgets: &[Budget]) {
    if budgets.is_empty() {
        println!("No budgets");
        return;
    }
    for b in budgets {
        println!(
            "{:<12} {:<14} {:<8} ${:<10.2} spent ${:<10.2} {} -> {}",
            b.id,
            b.category.as_str(),
            b.period.as_str(),
            b.amount,
            b.spent,
            b.start_date,
            b.end_date,
        );
    }
}

fn print_transactions(txns: &[Transaction]) {
    if txns.is_empty() {
        println!("No transactions");
        return;
    }
    for t in txns {
        println!(
            "{:<12} {} {:<14} ${:>10.2}  {}",
            t.id,
            t.date,
            t.category.as_str(),
            t.amount,
            t.description,
        );
    }
}
