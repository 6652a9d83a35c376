use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Organizational record manager")]
pub struct Cli {
    /// Data directory (defaults to ORGDESK_DATA_DIR or ~/.orgdesk)
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// List all accounts
    List,

    /// Add a new account
    Add {
        /// First name
        #[clap(long)]
        first_name: String,

        /// Last name
        #[clap(long)]
        last_name: String,

        /// Email address (must be unique)
        #[clap(long)]
        email: String,

        /// Password
        #[clap(long)]
        password: String,

        /// Role (user, admin)
        #[clap(long, default_value = "user")]
        role: String,

        /// Mark the account as verified
        #[clap(long)]
        verified: bool,
    },

    /// Edit an existing account
    Edit {
        /// The id of the account to edit
        id: u32,

        #[clap(long)]
        first_name: Option<String>,

        #[clap(long)]
        last_name: Option<String>,

        #[clap(long)]
        email: Option<String>,

        /// New password (omit to keep the current one)
        #[clap(long)]
        password: Option<String>,

        /// Role (user, admin)
        #[clap(long)]
        role: Option<String>,

        /// Verified flag (true/false)
        #[clap(long)]
        verified: Option<bool>,
    },

    /// Delete an account
    Del {
        /// The id of the account to delete
        id: u32,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Reset an account's password
    ResetPassword {
        /// The id of the account
        id: u32,

        /// The new password (prompted when omitted)
        #[clap(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DepartmentCommand {
    /// List all departments
    List,

    /// Add a new department
    Add {
        /// Department name
        #[clap(long)]
        name: String,

        /// Department description
        #[clap(long)]
        description: String,
    },

    /// Edit an existing department
    Edit {
        /// The id of the department to edit
        id: u32,

        #[clap(long)]
        name: Option<String>,

        #[clap(long)]
        description: Option<String>,
    },

    /// Delete a department
    Del {
        /// The id of the department to delete
        id: u32,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    /// List all employees
    List,

    /// Add a new employee record
    Add {
        /// External employee code (e.g. EMP-001)
        #[clap(long)]
        employee_id: String,

        /// Account id of the employee's user
        #[clap(long)]
        user_id: u32,

        /// Department id
        #[clap(long)]
        department_id: u32,

        /// Job position
        #[clap(long)]
        position: String,

        /// Hire date (YYYY-MM-DD)
        #[clap(long)]
        hire_date: NaiveDate,
    },

    /// Edit an existing employee record
    Edit {
        /// The id of the employee record to edit
        id: u32,

        #[clap(long)]
        employee_id: Option<String>,

        #[clap(long)]
        user_id: Option<u32>,

        #[clap(long)]
        department_id: Option<u32>,

        #[clap(long)]
        position: Option<String>,

        /// Hire date (YYYY-MM-DD)
        #[clap(long)]
        hire_date: Option<NaiveDate>,
    },

    /// Delete an employee record
    Del {
        /// The id of the employee record to delete
        id: u32,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    /// List requests visible to the current session
    List,

    /// Submit a new request
    New {
        /// Request type (equipment, leave, resources)
        #[clap(long)]
        r#type: Option<String>,

        /// Item as "name:quantity" (repeatable)
        #[clap(long = "item")]
        items: Vec<String>,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// Approve a pending request
    Approve {
        /// The id of the request
        id: u32,
    },

    /// Reject a pending request
    Reject {
        /// The id of the request
        id: u32,
    },

    /// Delete a request
    Del {
        /// The id of the request to delete
        id: u32,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new account (starts the verification flow)
    Register {
        /// First name
        #[clap(long)]
        first_name: Option<String>,

        /// Last name
        #[clap(long)]
        last_name: Option<String>,

        /// Email address
        #[clap(long)]
        email: Option<String>,

        /// Password
        #[clap(long)]
        password: Option<String>,

        /// Use interactive mode (prompts)
        #[clap(long)]
        interactive: bool,
    },

    /// Complete the pending email verification
    Verify,

    /// Log in and remember the session
    Login {
        /// Email address
        #[clap(long)]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[clap(long)]
        password: Option<String>,
    },

    /// Log out and forget the remembered session
    Logout,

    /// Show the current session
    Whoami,

    /// Account management commands (admin)
    #[clap(subcommand)]
    Account(AccountCommand),

    /// Department management commands (admin)
    #[clap(subcommand)]
    Department(DepartmentCommand),

    /// Employee management commands (admin)
    #[clap(subcommand)]
    Employee(EmployeeCommand),

    /// Request commands
    #[clap(subcommand)]
    Request(RequestCommand),
}
