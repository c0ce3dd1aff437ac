//! Command handlers for the expense shell.

use crate::core::MAX_WINDOW_DAYS;
use crate::ledger::{Category, Transaction};
use crate::utils::build_info;

use super::context::{CommandError, CommandResult, ShellContext};
use super::output;
use super::registry::{CommandGroup, CommandRegistry};

const BAR_WIDTH: usize = 30;

pub fn register_all(registry: &mut CommandRegistry) {
    use CommandGroup::{Record, Report, Shell};

    registry.register(
        Record,
        "income",
        "Add money to the balance",
        "income <amount> [description]",
        cmd_income,
    );
    registry.register(
        Record,
        "expense",
        "Record money spent",
        "expense <amount> [description] [-c <category>]",
        cmd_expense,
    );
    registry.register(
        Record,
        "quick",
        "Record a preset expense, or list presets",
        "quick [amount] [-c <category>]",
        cmd_quick,
    );

    registry.register(Report, "balance", "Show the current balance", "balance", cmd_balance);
    registry.register(Report, "history", "List every transaction", "history", cmd_history);
    registry.register(
        Report,
        "recent",
        "List the newest transactions",
        "recent [count]",
        cmd_recent,
    );
    registry.register(Report, "spending", "Daily spending chart", "spending [days]", cmd_spending);
    registry.register(Report, "trend", "End-of-day balance trend", "trend [days]", cmd_trend);
    registry.register(Report, "stats", "Income, expense and net totals", "stats", cmd_stats);
    registry.register(
        Report,
        "categories",
        "List expense categories",
        "categories",
        cmd_categories,
    );

    registry.register(Shell, "version", "Show build metadata", "version", cmd_version);
    registry.register(Shell, "help", "Show available commands", "help [command]", cmd_help);
    registry.register(Shell, "exit", "Exit the shell", "exit", cmd_exit);
}

fn cmd_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, category) = split_category_flag(args)?;
    if category.is_some() {
        return Err(CommandError::InvalidArguments(
            "income does not take a category".into(),
        ));
    }
    let (amount, description) = amount_and_description(&positional, "income")?;
    let txn = context
        .manager
        .record_income(amount, description.as_deref())?;
    report_recorded(context, &txn);
    Ok(())
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, category) = split_category_flag(args)?;
    let (amount, description) = amount_and_description(&positional, "expense")?;
    let category = category.unwrap_or(context.manager.config().default_category);
    let txn = context
        .manager
        .record_expense(amount, description.as_deref(), category)?;
    report_recorded(context, &txn);
    Ok(())
}

fn cmd_quick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, category) = split_category_flag(args)?;
    let presets = context.manager.config().valid_quick_amounts();

    let Some(raw) = positional.first() else {
        let listed: Vec<String> = presets.iter().map(|amount| output::money(*amount)).collect();
        output::info(format!("Quick amounts: {}", listed.join("  ")));
        return Ok(());
    };
    if positional.len() > 1 {
        return Err(CommandError::InvalidArguments(
            "quick takes a single amount".into(),
        ));
    }

    let amount = parse_amount(raw)?;
    if !context.manager.config().is_quick_amount(amount) {
        return Err(CommandError::InvalidArguments(format!(
            "{} is not a quick amount; run `quick` to list them",
            output::money(amount)
        )));
    }
    let category = category.unwrap_or(context.manager.config().default_category);
    let txn = context.manager.record_quick_expense(amount, category)?;
    report_recorded(context, &txn);
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(format!(
        "Balance: {}",
        output::money(context.manager.balance())
    ));
    Ok(())
}

fn cmd_history(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Transaction history");
    print_transactions(context, context.manager.store().ledger());
    Ok(())
}

fn cmd_recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = optional_count(
        args,
        context.manager.config().recent_limit,
        usize::MAX,
        "count",
    )?;
    output::section("Recent transactions");
    print_transactions(context, context.manager.store().recent(limit));
    Ok(())
}

fn cmd_spending(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = optional_count(
        args,
        context.manager.config().effective_window_days(),
        MAX_WINDOW_DAYS,
        "days",
    )?;
    let buckets = context.manager.daily_spending_for(days);
    let max = buckets.iter().map(|bucket| bucket.total).fold(0.0, f64::max);
    let total: f64 = buckets.iter().map(|bucket| bucket.total).sum();

    output::section(format!("Daily spending, last {days} days"));
    for bucket in &buckets {
        output::info(format!(
            "{}  {:>10}  {}",
            bucket.date_key.label(),
            output::money(bucket.total),
            output::bar(bucket.total, max, BAR_WIDTH)
        ));
    }
    output::info(format!("Total spent: {}", output::money(total)));
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = optional_count(
        args,
        context.manager.config().effective_window_days(),
        MAX_WINDOW_DAYS,
        "days",
    )?;
    let series = context.manager.balance_series_for(days);
    let max = series
        .iter()
        .map(|point| point.balance.abs())
        .fold(0.0, f64::max);

    output::section(format!("Balance trend, last {days} days"));
    for point in &series {
        let marker = if point.balance < 0.0 { "-" } else { "" };
        output::info(format!(
            "{}  {:>10}  {}{}",
            point.date_key.label(),
            output::money(point.balance),
            marker,
            output::bar(point.balance.abs(), max, BAR_WIDTH)
        ));
    }
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.manager.summary();
    output::section("Totals");
    output::info(format!("  Income      : {}", output::money(totals.income)));
    output::info(format!("  Expenses    : {}", output::money(totals.expenses)));
    output::info(format!("  Net         : {}", output::money(totals.net)));
    output::info(format!("  Transactions: {}", totals.count));
    output::info(format!(
        "Balance: {}",
        output::money(context.manager.balance())
    ));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let default = context.manager.config().default_category;
    output::section("Categories");
    for category in Category::ALL {
        let marker = if category == default { " (default)" } else { "" };
        output::info(format!("  {category}{marker}"));
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Expense Core {}", meta.version));
    output::info(format!("  Build hash : {}", meta.git_hash));
    output::info(format!("  Built at   : {}", meta.timestamp));
    output::info(format!("  Profile    : {}", meta.profile));
    output::info(format!("  Rustc      : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => {
                output::section(format!("Help: {}", entry.name));
                output::info(format!("  {}", entry.summary));
                output::info(format!("  Usage: {}", entry.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    for group in CommandGroup::ALL {
        output::section(group.title());
        for entry in context.registry.group(group) {
            output::info(format!("  {:<12} {}", entry.name, entry.summary));
        }
    }
    output::info("Use `help <command>` for details.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn report_recorded(context: &ShellContext, txn: &Transaction) {
    output::success(format!(
        "Recorded {} {} ({}). Balance: {}",
        txn.kind(),
        output::money(txn.amount()),
        txn.description(),
        output::money(context.manager.balance())
    ));
}

fn print_transactions(context: &ShellContext, transactions: &[Transaction]) {
    if transactions.is_empty() {
        output::info("No transactions yet.");
        return;
    }
    let frame = context.manager.frame();
    for txn in transactions {
        output::info(format!(
            "#{:<14} {}  {:>11}  {:<13} {}",
            txn.id(),
            frame.key_of(txn.occurred_at()),
            output::signed_money(txn.signed_amount()),
            txn.category(),
            txn.description()
        ));
    }
}

/// Pulls `-c <category>` / `--category <category>` out of the argument list.
fn split_category_flag<'a>(
    args: &[&'a str],
) -> Result<(Vec<&'a str>, Option<Category>), CommandError> {
    let mut positional = Vec::with_capacity(args.len());
    let mut category = None;
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if arg == "-c" || arg == "--category" {
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("{arg} needs a category name"))
            })?;
            category = Some(parse_category(value)?);
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, category))
}

fn parse_category(value: &str) -> Result<Category, CommandError> {
    Category::try_parse(value).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|category| category.as_str()).collect();
        CommandError::InvalidArguments(format!(
            "Unknown category `{value}`. Known categories: {}",
            known.join(", ")
        ))
    })
}

fn amount_and_description(
    positional: &[&str],
    command: &str,
) -> Result<(f64, Option<String>), CommandError> {
    let Some((raw, rest)) = positional.split_first() else {
        return Err(CommandError::InvalidArguments(format!(
            "{command} needs an amount"
        )));
    };
    let amount = parse_amount(raw)?;
    let description = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };
    Ok((amount, description))
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix('$').unwrap_or(cleaned);
    cleaned.parse::<f64>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a valid amount"))
    })
}

fn optional_count(
    args: &[&str],
    default: usize,
    max: usize,
    what: &str,
) -> Result<usize, CommandError> {
    match args {
        [] => Ok(default),
        [raw] => {
            let count = raw.parse::<usize>().map_err(|_| {
                CommandError::InvalidArguments(format!("`{raw}` is not a valid number of {what}"))
            })?;
            if count > max {
                return Err(CommandError::InvalidArguments(format!(
                    "at most {max} {what} can be shown"
                )));
            }
            Ok(count)
        }
        _ => Err(CommandError::InvalidArguments(format!(
            "expected at most one {what} argument"
        ))),
    }
}
