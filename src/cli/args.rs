use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mifos")]
#[command(version)]
#[command(about = "🏦 Mifos banking CLI: drive the headless banking gateway from your terminal")]
#[command(after_help = "Examples:\n  mifos clients search --name \"John\"\n  mifos loans get 42\n  mifos savings deposit 7 --amount 500")]
pub struct Cli {
    /// Base URL of the banking gateway [env: MIFOS_SERVER] [default: http://localhost:8000]
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 👥 Manage clients
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// 🏢 Manage lending groups
    #[command(subcommand)]
    Groups(GroupsCommand),
    /// 💰 Manage loans
    #[command(subcommand)]
    Loans(LoansCommand),
    /// 🏦 Manage savings accounts
    #[command(subcommand)]
    Savings(SavingsCommand),
    /// 🤖 Ask the AI agent in natural language
    Ask {
        /// Free-text question; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// 🔀 Ask the AI router which tools it would load for an intent
    Route {
        /// Natural language intent (required)
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Check whether the gateway is reachable
    Status,
}

/// A single account/entity identifier
#[derive(Args, Debug)]
pub struct ClientId {
    pub client_id: String,
}

#[derive(Args, Debug)]
pub struct LoanId {
    pub loan_id: String,
}

#[derive(Args, Debug)]
pub struct AccountId {
    pub account_id: String,
}

#[derive(Subcommand, Debug)]
pub enum ClientsCommand {
    /// Search clients by name
    Search {
        /// Name query to search for (required)
        #[arg(long)]
        name: Option<String>,
    },
    /// Get full details for a client
    Get(ClientId),
    /// List all loan and savings accounts for a client
    Accounts(ClientId),
    /// Create a new client
    Create {
        /// First name (required)
        #[arg(long)]
        first: Option<String>,
        /// Last name (required)
        #[arg(long)]
        last: Option<String>,
        /// Mobile number
        #[arg(long)]
        mobile: Option<String>,
        /// Office ID [default: 1]
        #[arg(long)]
        office: Option<i64>,
        /// Activate immediately [default: true]
        #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
        active: Option<bool>,
    },
    /// Activate a pending client profile
    Activate(ClientId),
    /// Update a client's mobile number
    UpdateMobile {
        client_id: String,
        /// New mobile number (required)
        #[arg(long)]
        mobile: Option<String>,
    },
    /// Close a client profile
    Close {
        client_id: String,
        /// Closure reason code ID [default: 17]
        #[arg(long)]
        reason: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    /// Create a new lending group
    Create {
        /// Group name (required)
        #[arg(long)]
        name: Option<String>,
        /// Office ID [default: 1]
        #[arg(long)]
        office: Option<i64>,
        /// Comma-separated client IDs to enrol
        #[arg(long, value_delimiter = ',')]
        members: Vec<i64>,
    },
    /// Get details and members of a group
    Get { group_id: String },
}

#[derive(Subcommand, Debug)]
pub enum LoansCommand {
    /// Get full details for a loan
    Get(LoanId),
    /// Get the repayment schedule for a loan
    Schedule(LoanId),
    /// Apply for a new loan
    Create {
        /// Client ID (required)
        #[arg(long)]
        client: Option<i64>,
        /// Loan principal amount (required)
        #[arg(long)]
        principal: Option<f64>,
        /// Loan term in months (required)
        #[arg(long)]
        months: Option<i64>,
        /// Loan product ID [default: 1]
        #[arg(long)]
        product: Option<i64>,
    },
    /// Approve and disburse a loan
    Approve {
        loan_id: String,
        /// Override the disbursement amount
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Reject a loan application
    Reject {
        loan_id: String,
        /// Rejection reason [default: "Rejected via AI Agent due to risk profile"]
        #[arg(long)]
        note: Option<String>,
    },
    /// Make a repayment on a loan
    Repay(LoanTransaction),
    /// Apply a late fee to a loan
    LateFee(LoanTransaction),
    /// Waive interest on a loan
    Waive(LoanTransaction),
}

/// Amount-bearing loan operation
#[derive(Args, Debug)]
pub struct LoanTransaction {
    pub loan_id: String,
    /// Amount (required)
    #[arg(long)]
    pub amount: Option<f64>,
    /// Note recorded with the transaction
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SavingsCommand {
    /// Get details of a savings account
    Get(AccountId),
    /// Get transaction history for a savings account
    Transactions(AccountId),
    /// Open a new savings account for a client
    Create {
        /// Client ID (required)
        #[arg(long)]
        client: Option<i64>,
        /// Savings product ID [default: 1]
        #[arg(long)]
        product: Option<i64>,
    },
    /// Approve and activate a pending savings account
    Approve(AccountId),
    /// Close a savings account
    Close(AccountId),
    /// Deposit money into a savings account
    Deposit(SavingsTransaction),
    /// Withdraw money from a savings account
    Withdraw(SavingsTransaction),
    /// Apply a fee/charge to a savings account
    Charge {
        account_id: String,
        /// Charge amount (required)
        #[arg(long)]
        amount: Option<f64>,
        /// Charge type ID [default: 1]
        #[arg(long = "charge-id")]
        charge_id: Option<i64>,
    },
    /// Calculate and post accrued interest
    PostInterest(AccountId),
}

/// Amount-bearing savings operation
#[derive(Args, Debug)]
pub struct SavingsTransaction {
    pub account_id: String,
    /// Amount (required)
    #[arg(long)]
    pub amount: Option<f64>,
}
