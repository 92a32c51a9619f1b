//! # finance-client
//!
//! Command-line front-end over the client core. Each invocation boots the
//! persisted session, runs one command through the query cache and exits.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use finance_client::core::Navigator;
use finance_client::queries::{account, budgets, coach, subscriptions, transactions};
use finance_client::services::api::FileSessionStore;
use finance_client::{debug, ApiClient, AuthContext, ClientConfig, Dashboard, QueryClient, SessionManager};
use lib_utils::{month_start, today};
use shared::utils::{format_currency, format_percentage};
use shared::{BillingCycle, BudgetRequest, CheckoutRequest};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Feature gate for the AI coach.
const COACH_FEATURE: &str = "AI_COACH";

#[derive(Parser)]
#[command(name = "finance-client", version, about = "Personal finance tracker client")]
struct Cli {
    /// Override FINANCE_API_BASE_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session token
    Login { email: String, password: String },
    /// Create an account and sign in
    Register {
        email: String,
        password: String,
        full_name: String,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Request a password reset link
    ForgotPassword { email: String },
    ResetPassword {
        token: String,
        new_password: String,
        confirmation: String,
    },
    /// Budgets and progress for a month (default: current)
    Budgets {
        #[arg(long)]
        month: Option<NaiveDate>,
    },
    /// Create or update a category budget
    SetBudget {
        category: String,
        amount: f64,
        #[arg(long)]
        month: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
        /// Percentage of the budget that triggers an alert
        #[arg(long)]
        alert_threshold: Option<f64>,
    },
    DeleteBudget { id: i64 },
    /// Copy last month's budgets into this month
    CopyBudgets,
    /// Recompute spent amounts from transactions
    RefreshBudgets {
        #[arg(long)]
        month: Option<NaiveDate>,
    },
    /// Spending overview for the last 30 days
    Dashboard,
    Transactions,
    /// Pull new transactions from linked banks
    Sync,
    Accounts,
    /// Exchange a bank-link public token
    LinkBank { public_token: String },
    Plans,
    Subscription,
    /// Start a hosted checkout in the browser
    Checkout {
        plan_id: i64,
        #[arg(long, value_enum, default_value_t = Cycle::Monthly)]
        cycle: Cycle,
    },
    /// Cancel the current subscription
    Cancel,
    /// Ask the AI coach
    Chat { message: String },
}

impl Command {
    /// Commands that work without a session.
    fn is_public(&self) -> bool {
        matches!(
            self,
            Command::Login { .. }
                | Command::Register { .. }
                | Command::ForgotPassword { .. }
                | Command::ResetPassword { .. }
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Cycle {
    Monthly,
    Yearly,
}

impl From<Cycle> for BillingCycle {
    fn from(cycle: Cycle) -> Self {
        match cycle {
            Cycle::Monthly => BillingCycle::Monthly,
            Cycle::Yearly => BillingCycle::Yearly,
        }
    }
}

/// Stands in for the login screen redirect.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect_to_login(&self) {
        eprintln!("Your session has expired. Run `finance-client login` to sign in again.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _guard = debug::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    config.validate()?;
    info!(base_url = %config.api_base_url, "Starting finance client");

    let session = Arc::new(SessionManager::new(
        Arc::new(FileSessionStore::new(&config.session_file)),
        Arc::new(ConsoleNavigator),
    ));
    let api = Arc::new(ApiClient::new(&config, session));
    let cache = QueryClient::new();
    let auth = AuthContext::new(api.clone(), cache.clone());

    if !cli.command.is_public() {
        auth.boot().await.context("Could not validate the saved session")?;
        if !auth.is_authenticated() {
            bail!("Not signed in. Run `finance-client login <email> <password>` first.");
        }
    }

    run(cli.command, &api, &cache, &auth).await
}

async fn run(command: Command, api: &Arc<ApiClient>, cache: &QueryClient, auth: &AuthContext) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = auth.login(&email, &password).await?;
            println!("Signed in as {} <{}>", user.full_name, user.email);
        }
        Command::Register {
            email,
            password,
            full_name,
        } => {
            let user = auth.register(&email, &password, &full_name).await?;
            println!("Welcome, {}!", user.full_name);
        }
        Command::Logout => {
            auth.logout()?;
            println!("Signed out");
        }
        Command::Whoami => {
            let user = cache.fetch_query(&account::current_user(api)).await?;
            println!("{} <{}> (id {})", user.full_name, user.email, user.id);
        }
        Command::ForgotPassword { email } => {
            println!("{}", auth.forgot_password(&email).await?);
        }
        Command::ResetPassword {
            token,
            new_password,
            confirmation,
        } => {
            println!("{}", auth.reset_password(&token, &new_password, &confirmation).await?);
        }
        Command::Budgets { month } => {
            let month = month.map(month_start);
            let summary = cache.fetch_query(&budgets::budgets(api, month)).await?;
            if summary.budgets.is_empty() {
                println!("No budgets set. Try `finance-client set-budget Groceries 400`.");
                return Ok(());
            }
            for budget in &summary.budgets {
                println!(
                    "#{:<4} {:<20} {:>12} of {:>12}  {}{}",
                    budget.id,
                    budget.category,
                    format_currency(budget.spent),
                    format_currency(budget.amount),
                    format_percentage(budget.percentage_spent, 0),
                    if budget.is_exceeded { "  EXCEEDED" } else { "" },
                );
            }
            println!(
                "Total: {} spent of {}",
                format_currency(summary.total_spent),
                format_currency(summary.total_budget)
            );
        }
        Command::SetBudget {
            category,
            amount,
            month,
            notes,
            alert_threshold,
        } => {
            let request = BudgetRequest {
                category,
                amount,
                month: month_start(month.unwrap_or_else(today)),
                notes,
                alert_threshold,
            };
            let budget = cache.mutate(&budgets::save(api), request).await?;
            println!("Saved {} budget: {}", budget.category, format_currency(budget.amount));
        }
        Command::DeleteBudget { id } => {
            cache.mutate(&budgets::delete(api), id).await?;
            println!("Deleted budget #{}", id);
        }
        Command::CopyBudgets => {
            let copied = cache.mutate(&budgets::copy_previous(api), ()).await?;
            println!("Copied {} budgets from last month", copied.copied_count);
        }
        Command::RefreshBudgets { month } => {
            cache.mutate(&budgets::refresh(api), month.map(month_start)).await?;
            println!("Budgets recalculated");
        }
        Command::Dashboard => {
            let mut dashboard = Dashboard::observe(cache, api);
            let snapshot = dashboard.settled().await;
            if let Some(error) = &snapshot.error {
                warn!(error = %error, kind = ?snapshot.error_kind(), "Dashboard incomplete");
                eprintln!("Some panels failed to load: {}", error);
            }
            if let Some(summary) = &snapshot.summary {
                println!(
                    "This month: {} spent, {} income, {} net ({} transactions)",
                    format_currency(summary.total_spending),
                    format_currency(summary.total_income),
                    format_currency(summary.net_cash_flow),
                    summary.transaction_count
                );
            }
            if let Some(categories) = &snapshot.categories {
                println!("Top categories since {}:", snapshot.range.start);
                for (name, amount) in shared::dto::analytics::ranked(categories).into_iter().take(5) {
                    println!("  {:<24} {:>12}", name, format_currency(amount));
                }
            }
            if let Some(merchants) = &snapshot.merchants {
                println!("Top merchants:");
                for (name, amount) in shared::dto::analytics::ranked(merchants) {
                    println!("  {:<24} {:>12}", name, format_currency(amount));
                }
            }
        }
        Command::Transactions => {
            let listed = cache.fetch_query(&transactions::list(api)).await?;
            for tx in listed.iter() {
                println!(
                    "{}  {:<32} {:>12}{}",
                    tx.date,
                    tx.display_name(),
                    format_currency(tx.amount),
                    if tx.pending { "  (pending)" } else { "" }
                );
            }
        }
        Command::Sync => {
            let result = cache.mutate(&transactions::sync(api), ()).await?;
            println!(
                "Synced: {} added, {} modified, {} removed",
                result.added, result.modified, result.removed
            );
        }
        Command::Accounts => {
            let accounts = cache.fetch_query(&account::linked_accounts(api)).await?;
            if accounts.is_empty() {
                println!("No linked accounts");
            }
            for acct in accounts.iter() {
                println!(
                    "{:<24} ****{:<6} {:>12}",
                    acct.name,
                    acct.mask.as_deref().unwrap_or("----"),
                    acct.current_balance.map(format_currency).unwrap_or_default()
                );
            }
        }
        Command::LinkBank { public_token } => {
            cache.mutate(&account::exchange_public_token(api), public_token).await?;
            println!("Bank linked. Run `finance-client sync` to import transactions.");
        }
        Command::Plans => {
            let plans = cache.fetch_query(&subscriptions::plans(api)).await?;
            for plan in plans.iter() {
                println!(
                    "#{:<3} {:<12} {:>10}/mo {:>10}/yr  {}",
                    plan.id,
                    plan.display_name,
                    format_currency(plan.price_monthly),
                    format_currency(plan.price_yearly),
                    plan.features.join(", ")
                );
            }
        }
        Command::Subscription => {
            let current = cache.fetch_query(&subscriptions::current(api)).await?;
            println!("{} ({:?})", current.plan_display_name, current.status);
        }
        Command::Checkout { plan_id, cycle } => {
            let request = CheckoutRequest {
                plan_id,
                billing_cycle: cycle.into(),
            };
            let session = cache.mutate(&subscriptions::checkout(api), request).await?;
            let Some(url) = session.url else {
                bail!("Backend did not return a checkout URL");
            };
            println!("Complete the payment in your browser: {}", url);
            if let Err(e) = open::that(&url) {
                warn!(error = %e, "Could not open browser");
            }

            let mut subscription = cache.observe(&subscriptions::current(api));
            subscription.settled().await;
            println!("Press Enter once the payment is complete.");
            BufReader::new(tokio::io::stdin()).lines().next_line().await?;
            cache.invalidate_queries(&subscriptions::checkout_completed()).await;
            if let Some(current) = subscription.data() {
                println!("Current plan: {}", current.plan_display_name);
            }
        }
        Command::Cancel => {
            cache.mutate(&subscriptions::cancel(api), ()).await?;
            let current = cache.fetch_query(&subscriptions::current(api)).await?;
            println!("Subscription cancelled. Current plan: {}", current.plan_display_name);
        }
        Command::Chat { message } => {
            let mut subscription = cache.observe(&subscriptions::current(api));
            let state = subscription.settled().await;
            if !subscriptions::has_feature(&state, COACH_FEATURE) {
                bail!("The AI coach is not included in your plan. See `finance-client plans`.");
            }
            let reply = cache.mutate(&coach::chat(api), message).await?;
            println!("{}", reply.response);
        }
    }
    Ok(())
}
