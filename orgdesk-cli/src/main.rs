mod cli;
mod prompts;

use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;

use orgdesk_core::{
    data_dir, FileStore, RecordStore, RequestItem, RequestStatus, RequestType, Role,
};

use crate::cli::{
    AccountCommand, Cli, Command, DepartmentCommand, EmployeeCommand, RequestCommand,
};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => data_dir()?,
    };
    let mut store = RecordStore::open(Box::new(FileStore::new(dir)));

    match &cli.command {
        Command::Register {
            first_name,
            last_name,
            email,
            password,
            interactive,
        } => {
            // Default to interactive mode if no arguments are provided
            let should_be_interactive = *interactive
                || (first_name.is_none()
                    && last_name.is_none()
                    && email.is_none()
                    && password.is_none());

            let (first_name, last_name, email, password) = if should_be_interactive {
                prompts::prompt_registration()?
            } else {
                (
                    first_name
                        .clone()
                        .ok_or_else(|| anyhow!("First name is required. Use --first-name."))?,
                    last_name
                        .clone()
                        .ok_or_else(|| anyhow!("Last name is required. Use --last-name."))?,
                    email
                        .clone()
                        .ok_or_else(|| anyhow!("Email is required. Use --email."))?,
                    password
                        .clone()
                        .ok_or_else(|| anyhow!("Password is required. Use --password."))?,
                )
            };

            store.register(&first_name, &last_name, &email, &password)?;
            println!(
                "{}",
                "Registration successful! Please verify your email.".green()
            );
            println!("Pending verification for: {}", email);
        }
        Command::Verify => {
            let email = store.verify_pending_email()?;
            println!(
                "{} ({})",
                "Email verified successfully! You can now login.".green(),
                email
            );
        }
        Command::Login { email, password } => {
            let email = match email {
                Some(email) => email.clone(),
                None => inquire::Text::new("Email:").prompt()?,
            };
            let password = match password {
                Some(password) => password.clone(),
                None => prompts::prompt_password()?,
            };

            let account = store.login(&email, &password)?;
            println!(
                "{} Welcome, {} {}.",
                "Login successful!".green(),
                account.first_name,
                account.last_name
            );
        }
        Command::Logout => {
            store.logout();
            println!("{}", "Logged out successfully".green());
        }
        Command::Whoami => match store.session() {
            Some(session) => {
                println!("{}: {}", "Email".blue(), session.email);
                println!("{}: {}", "Role".blue(), session.role);
            }
            None => println!("{}", "Not logged in".yellow()),
        },
        Command::Account(account_cmd) => {
            handle_account_command(account_cmd, &mut store)?;
        }
        Command::Department(dept_cmd) => {
            handle_department_command(dept_cmd, &mut store)?;
        }
        Command::Employee(emp_cmd) => {
            handle_employee_command(emp_cmd, &mut store)?;
        }
        Command::Request(req_cmd) => {
            handle_request_command(req_cmd, &mut store)?;
        }
    }

    Ok(())
}

fn parse_role(s: &str) -> Result<Role> {
    Role::from_str(s).ok_or_else(|| anyhow!("Invalid role: '{}'. Use user or admin.", s))
}

fn parse_request_type(s: &str) -> Result<RequestType> {
    RequestType::from_str(s).ok_or_else(|| {
        anyhow!(
            "Invalid request type: '{}'. Use equipment, leave or resources.",
            s
        )
    })
}

/// Parses an "name:quantity" item argument
fn parse_item(s: &str) -> Result<RequestItem> {
    let (name, quantity) = s
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("Invalid item '{}'. Expected name:quantity.", s))?;
    let quantity: u32 = quantity
        .parse()
        .map_err(|_| anyhow!("Invalid quantity in item '{}'", s))?;

    Ok(RequestItem {
        name: name.to_string(),
        quantity,
    })
}

fn handle_account_command(cmd: &AccountCommand, store: &mut RecordStore) -> Result<()> {
    match cmd {
        AccountCommand::List => {
            let accounts = store.accounts();
            if accounts.is_empty() {
                println!("{}", "No accounts found.".yellow());
                return Ok(());
            }

            println!(
                "{:<5} | {:<25} | {:<30} | {:<6} | {:<8}",
                "ID", "Name", "Email", "Role", "Verified"
            );
            println!("{}", "-".repeat(85));
            for account in accounts {
                let role_str = match account.role {
                    Role::Admin => "admin".red(),
                    Role::User => "user".blue(),
                };
                println!(
                    "{:<5} | {:<25} | {:<30} | {:<6} | {:<8}",
                    account.id,
                    format!("{} {}", account.first_name, account.last_name),
                    account.email,
                    role_str,
                    if account.verified { "yes" } else { "no" }
                );
            }
        }
        AccountCommand::Add {
            first_name,
            last_name,
            email,
            password,
            role,
            verified,
        } => {
            let role = parse_role(role)?;
            let account =
                store.create_account(first_name, last_name, email, password, role, *verified)?;
            println!("{} (id {})", "Account created successfully".green(), account.id);
        }
        AccountCommand::Edit {
            id,
            first_name,
            last_name,
            email,
            password,
            role,
            verified,
        } => {
            let current = store
                .accounts()
                .iter()
                .find(|a| a.id == *id)
                .ok_or_else(|| anyhow!("Account {} not found", id))?
                .clone();

            let role = match role {
                Some(role) => parse_role(role)?,
                None => current.role,
            };

            store.update_account(
                *id,
                first_name.as_deref().unwrap_or(&current.first_name),
                last_name.as_deref().unwrap_or(&current.last_name),
                email.as_deref().unwrap_or(&current.email),
                password.as_deref().unwrap_or(""),
                role,
                verified.unwrap_or(current.verified),
            )?;
            println!("{}", "Account updated successfully".green());
        }
        AccountCommand::Del { id, yes } => {
            if !prompts::confirm_delete("account", *yes)? {
                return Ok(());
            }
            store.delete_account(*id)?;
            println!("{}", "Account deleted successfully".green());
        }
        AccountCommand::ResetPassword { id, password } => {
            let password = match password {
                Some(password) => password.clone(),
                None => prompts::prompt_password()?,
            };
            store.reset_password(*id, &password)?;
            println!("{}", "Password reset successfully".green());
        }
    }

    Ok(())
}

fn handle_department_command(cmd: &DepartmentCommand, store: &mut RecordStore) -> Result<()> {
    match cmd {
        DepartmentCommand::List => {
            let departments = store.departments();
            if departments.is_empty() {
                println!("{}", "No departments found.".yellow());
                return Ok(());
            }

            println!("{:<5} | {:<20} | {:<40}", "ID", "Name", "Description");
            println!("{}", "-".repeat(70));
            for dept in departments {
                println!(
                    "{:<5} | {:<20} | {:<40}",
                    dept.id, dept.name, dept.description
                );
            }
        }
        DepartmentCommand::Add { name, description } => {
            let dept = store.create_department(name, description)?;
            println!(
                "{} (id {})",
                "Department created successfully".green(),
                dept.id
            );
        }
        DepartmentCommand::Edit {
            id,
            name,
            description,
        } => {
            let current = store
                .department(*id)
                .ok_or_else(|| anyhow!("Department {} not found", id))?
                .clone();

            store.update_department(
                *id,
                name.as_deref().unwrap_or(&current.name),
                description.as_deref().unwrap_or(&current.description),
            )?;
            println!("{}", "Department updated successfully".green());
        }
        DepartmentCommand::Del { id, yes } => {
            if !prompts::confirm_delete("department", *yes)? {
                return Ok(());
            }
            store.delete_department(*id)?;
            println!("{}", "Department deleted successfully".green());
        }
    }

    Ok(())
}

fn handle_employee_command(cmd: &EmployeeCommand, store: &mut RecordStore) -> Result<()> {
    match cmd {
        EmployeeCommand::List => {
            let employees = store.employees();
            if employees.is_empty() {
                println!("{}", "No employees found.".yellow());
                return Ok(());
            }

            println!(
                "{:<5} | {:<10} | {:<30} | {:<20} | {:<20} | {:<10}",
                "ID", "Code", "User", "Position", "Department", "Hired"
            );
            println!("{}", "-".repeat(110));
            for emp in employees {
                // Dangling references render as N/A rather than erroring
                let user = store
                    .account_for_employee(emp)
                    .map(|a| a.email.as_str())
                    .unwrap_or("N/A");
                let dept = store
                    .department_for_employee(emp)
                    .map(|d| d.name.as_str())
                    .unwrap_or("N/A");

                println!(
                    "{:<5} | {:<10} | {:<30} | {:<20} | {:<20} | {:<10}",
                    emp.id,
                    emp.employee_id,
                    user,
                    emp.position,
                    dept,
                    emp.hire_date.to_string()
                );
            }
        }
        EmployeeCommand::Add {
            employee_id,
            user_id,
            department_id,
            position,
            hire_date,
        } => {
            let emp = store.create_employee(
                employee_id,
                *user_id,
                *department_id,
                position,
                *hire_date,
            )?;
            println!("{} (id {})", "Employee created successfully".green(), emp.id);
        }
        EmployeeCommand::Edit {
            id,
            employee_id,
            user_id,
            department_id,
            position,
            hire_date,
        } => {
            let current = store
                .employees()
                .iter()
                .find(|e| e.id == *id)
                .ok_or_else(|| anyhow!("Employee {} not found", id))?
                .clone();

            store.update_employee(
                *id,
                employee_id.as_deref().unwrap_or(&current.employee_id),
                user_id.unwrap_or(current.user_id),
                department_id.unwrap_or(current.department_id),
                position.as_deref().unwrap_or(&current.position),
                hire_date.unwrap_or(current.hire_date),
            )?;
            println!("{}", "Employee updated successfully".green());
        }
        EmployeeCommand::Del { id, yes } => {
            if !prompts::confirm_delete("employee", *yes)? {
                return Ok(());
            }
            store.delete_employee(*id)?;
            println!("{}", "Employee deleted successfully".green());
        }
    }

    Ok(())
}

fn handle_request_command(cmd: &RequestCommand, store: &mut RecordStore) -> Result<()> {
    match cmd {
        RequestCommand::List => {
            let is_admin = store.is_admin();
            let requests = store.requests_visible()?;
            if requests.is_empty() {
                println!("{}", "No requests yet.".yellow());
                return Ok(());
            }

            if is_admin {
                println!(
                    "{:<5} | {:<12} | {:<30} | {:<10} | {:<35} | {:<8}",
                    "ID", "Date", "Employee", "Type", "Items", "Status"
                );
            } else {
                println!(
                    "{:<5} | {:<12} | {:<10} | {:<35} | {:<8}",
                    "ID", "Date", "Type", "Items", "Status"
                );
            }
            println!("{}", "-".repeat(if is_admin { 115 } else { 80 }));

            for req in requests {
                let status_str = match req.status {
                    RequestStatus::Pending => "Pending".yellow(),
                    RequestStatus::Approved => "Approved".green(),
                    RequestStatus::Rejected => "Rejected".red(),
                };
                let items = req
                    .items
                    .iter()
                    .map(|i| format!("{} ({})", i.name, i.quantity))
                    .collect::<Vec<_>>()
                    .join(", ");

                if is_admin {
                    println!(
                        "{:<5} | {:<12} | {:<30} | {:<10} | {:<35} | {:<8}",
                        req.id,
                        req.date.to_string(),
                        req.employee_email,
                        req.request_type.to_string(),
                        items,
                        status_str
                    );
                } else {
                    println!(
                        "{:<5} | {:<12} | {:<10} | {:<35} | {:<8}",
                        req.id,
                        req.date.to_string(),
                        req.request_type.to_string(),
                        items,
                        status_str
                    );
                }
            }
        }
        RequestCommand::New {
            r#type,
            items,
            interactive,
        } => {
            let should_be_interactive = *interactive || (r#type.is_none() && items.is_empty());

            let (request_type, items) = if should_be_interactive {
                let (request_type, items) = prompts::prompt_new_request()?;
                (Some(request_type), items)
            } else {
                let request_type = match r#type {
                    Some(s) => Some(parse_request_type(s)?),
                    None => None,
                };
                let items = items
                    .iter()
                    .map(|s| parse_item(s))
                    .collect::<Result<Vec<_>>>()?;
                (request_type, items)
            };

            let request = store.create_request(request_type, items)?;
            println!(
                "{} (id {})",
                "Request submitted successfully".green(),
                request.id
            );
        }
        RequestCommand::Approve { id } => {
            store.update_request_status(*id, RequestStatus::Approved)?;
            println!("{}", "Request approved successfully".green());
        }
        RequestCommand::Reject { id } => {
            store.update_request_status(*id, RequestStatus::Rejected)?;
            println!("{}", "Request rejected successfully".green());
        }
        RequestCommand::Del { id, yes } => {
            if !prompts::confirm_delete("request", *yes)? {
                return Ok(());
            }
            store.delete_request(*id)?;
            println!("{}", "Request deleted successfully".green());
        }
    }

    Ok(())
}
