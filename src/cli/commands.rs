use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

use crate::{
    app::ServerConfig,
    constants::OPENAPI_PATH,
    dispatch::{CommandCall, Dispatcher},
    schema::Resource,
    transport::{render_exchange, ApiRequest, Gateway, HttpGateway, Outcome},
    utils::BankingError,
};

use super::args::{
    ClientsCommand, Commands, GroupsCommand, LoanTransaction, LoansCommand, SavingsCommand,
};

impl Commands {
    /// Map the parsed leaf command onto its command-table call.
    /// `status` is not table-driven and yields `None`.
    pub fn to_call(&self) -> Option<CommandCall> {
        let call = match self {
            Commands::Clients(command) => clients_call(command),
            Commands::Groups(command) => groups_call(command),
            Commands::Loans(command) => loans_call(command),
            Commands::Savings(command) => savings_call(command),
            Commands::Ask { query } => {
                CommandCall::new(Resource::Ask, "").option("message", Some(query.join(" ")))
            }
            Commands::Route { prompt } => {
                CommandCall::new(Resource::Route, "").option("prompt", prompt.clone())
            }
            Commands::Status => return None,
        };
        Some(call)
    }
}

fn clients_call(command: &ClientsCommand) -> CommandCall {
    let new = |verb| CommandCall::new(Resource::Clients, verb);
    match command {
        ClientsCommand::Search { name } => new("search").option("name", name.clone()),
        ClientsCommand::Get(id) => new("get").arg(&id.client_id),
        ClientsCommand::Accounts(id) => new("accounts").arg(&id.client_id),
        ClientsCommand::Create {
            first,
            last,
            mobile,
            office,
            active,
        } => new("create")
            .option("first", first.clone())
            .option("last", last.clone())
            .option("mobile", mobile.clone())
            .option("office", *office)
            .option("active", *active),
        ClientsCommand::Activate(id) => new("activate").arg(&id.client_id),
        ClientsCommand::UpdateMobile { client_id, mobile } => new("update-mobile")
            .arg(client_id)
            .option("mobile", mobile.clone()),
        ClientsCommand::Close { client_id, reason } => {
            new("close").arg(client_id).option("reason", *reason)
        }
    }
}

fn groups_call(command: &GroupsCommand) -> CommandCall {
    let new = |verb| CommandCall::new(Resource::Groups, verb);
    match command {
        GroupsCommand::Create {
            name,
            office,
            members,
        } => new("create")
            .option("name", name.clone())
            .option("office", *office)
            .option("members", Some(members.clone())),
        GroupsCommand::Get { group_id } => new("get").arg(group_id),
    }
}

fn loans_call(command: &LoansCommand) -> CommandCall {
    let new = |verb| CommandCall::new(Resource::Loans, verb);
    let transaction = |verb, tx: &LoanTransaction| {
        new(verb)
            .arg(&tx.loan_id)
            .option("amount", tx.amount)
            .option("note", tx.note.clone())
    };
    match command {
        LoansCommand::Get(id) => new("get").arg(&id.loan_id),
        LoansCommand::Schedule(id) => new("schedule").arg(&id.loan_id),
        LoansCommand::Create {
            client,
            principal,
            months,
            product,
        } => new("create")
            .option("client", *client)
            .option("principal", *principal)
            .option("months", *months)
            .option("product", *product),
        LoansCommand::Approve { loan_id, amount } => {
            new("approve").arg(loan_id).option("amount", *amount)
        }
        LoansCommand::Reject { loan_id, note } => {
            new("reject").arg(loan_id).option("note", note.clone())
        }
        LoansCommand::Repay(tx) => transaction("repay", tx),
        LoansCommand::LateFee(tx) => transaction("late-fee", tx),
        LoansCommand::Waive(tx) => transaction("waive", tx),
    }
}

fn savings_call(command: &SavingsCommand) -> CommandCall {
    let new = |verb| CommandCall::new(Resource::Savings, verb);
    match command {
        SavingsCommand::Get(id) => new("get").arg(&id.account_id),
        SavingsCommand::Transactions(id) => new("transactions").arg(&id.account_id),
        SavingsCommand::Create { client, product } => new("create")
            .option("client", *client)
            .option("product", *product),
        SavingsCommand::Approve(id) => new("approve").arg(&id.account_id),
        SavingsCommand::Close(id) => new("close").arg(&id.account_id),
        SavingsCommand::Deposit(tx) => new("deposit")
            .arg(&tx.account_id)
            .option("amount", tx.amount),
        SavingsCommand::Withdraw(tx) => new("withdraw")
            .arg(&tx.account_id)
            .option("amount", tx.amount),
        SavingsCommand::Charge {
            account_id,
            amount,
            charge_id,
        } => new("charge")
            .arg(account_id)
            .option("amount", *amount)
            .option("charge-id", *charge_id),
        SavingsCommand::PostInterest(id) => new("post-interest").arg(&id.account_id),
    }
}

/// Run one command against the configured gateway.
///
/// Every outcome, including validation and connection failures, is printed
/// and reported as `Ok`; the process exits normally either way.
pub async fn execute(command: &Commands, config: ServerConfig) -> Result<()> {
    let dispatcher = Dispatcher::new(HttpGateway::new(config)?);

    let Some(call) = command.to_call() else {
        return show_status(dispatcher.gateway()).await;
    };

    if let Commands::Ask { query } = command {
        println!("🤔 Thinking about: '{}'...", query.join(" "));
    }

    match dispatcher.dispatch(&call).await {
        Ok(exchange) => {
            let stdout = io::stdout();
            let stderr = io::stderr();
            render_exchange(&exchange, &mut stdout.lock(), &mut stderr.lock())?;
        }
        Err(e) => {
            tracing::debug!("command aborted: {:?}", e);
            let e = surface_error(command, e);
            eprintln!("{} {}", "❌".red(), e.to_string().red());
        }
    }
    Ok(())
}

/// Phrase a failure in terms of what the user typed.
/// `ask` takes its message as trailing words, not as a `--message` flag.
fn surface_error(command: &Commands, error: BankingError) -> BankingError {
    match (command, error) {
        (Commands::Ask { .. }, BankingError::MissingOption { command, .. }) => {
            BankingError::MissingArgument {
                command,
                argument: "query",
            }
        }
        (_, error) => error,
    }
}

/// Report whether the gateway answers at all
async fn show_status(gateway: &HttpGateway) -> Result<()> {
    println!("Mifos Status:");
    println!();

    match gateway.send(&ApiRequest::get(OPENAPI_PATH)).await {
        Ok(exchange) if exchange.outcome() == Outcome::Success => {
            println!(
                "  [OK] Gateway: Reachable at {} (HTTP {})",
                gateway.base_url(),
                exchange.status
            );
        }
        Ok(exchange) => {
            println!(
                "  [WARNING] Gateway: Responding at {} but HTTP {}",
                gateway.base_url(),
                exchange.status
            );
        }
        Err(e) => {
            println!("  [ERROR] Gateway: {}", e.to_string().red());
        }
    }
    io::stdout().flush()?;
    Ok(())
}
