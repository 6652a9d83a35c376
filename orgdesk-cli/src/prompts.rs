use anyhow::Result;
use inquire::{Confirm, CustomType, Password, Select, Text};

use orgdesk_core::{RequestItem, RequestType};

/// Prompts for the fields of a new registration
pub fn prompt_registration() -> Result<(String, String, String, String)> {
    let first_name = Text::new("First name:").prompt()?;
    let last_name = Text::new("Last name:").prompt()?;
    let email = Text::new("Email:").prompt()?;
    let password = Password::new("Password:").prompt()?;

    Ok((first_name, last_name, email, password))
}

/// Prompts for a login password
pub fn prompt_password() -> Result<String> {
    let password = Password::new("Password:")
        .without_confirmation()
        .prompt()?;
    Ok(password)
}

/// Prompts the user for a new request: type plus one or more item rows
pub fn prompt_new_request() -> Result<(RequestType, Vec<RequestItem>)> {
    let type_options = vec![
        RequestType::Equipment,
        RequestType::Leave,
        RequestType::Resources,
    ];
    let request_type = Select::new("Request type:", type_options).prompt()?;

    let mut items = Vec::new();
    loop {
        let name = Text::new("Item name:").prompt()?;
        let quantity = CustomType::<u32>::new("Quantity:")
            .with_error_message("Please enter a whole number")
            .prompt()?;

        items.push(RequestItem { name, quantity });

        let more = Confirm::new("Add another item?")
            .with_default(false)
            .prompt()?;
        if !more {
            break;
        }
    }

    Ok((request_type, items))
}

/// Asks for confirmation before a delete; `skip` bypasses the prompt
pub fn confirm_delete(what: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    let confirmed = Confirm::new(&format!("Are you sure you want to delete this {}?", what))
        .with_default(false)
        .prompt()?;
    Ok(confirmed)
}
