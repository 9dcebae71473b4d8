use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ElementError, Result};
use crate::registry::Registry;
use crate::store::DataStore;

pub fn login<S: DataStore, R: Registry>(
    store: &mut S,
    registry: &R,
    username: &str,
    password: &str,
) -> Result<CmdResult> {
    let token = registry.login(username, password).map_err(|e| match e {
        ElementError::Network { status, message } => ElementError::Network {
            status,
            message: format!("Problem with the login process: {}", message),
        },
        other => other,
    })?;
    store.write_token(&token)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("Logged in as {}.", username)));
    Ok(result)
}

pub fn logout<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let removed = store.delete_token()?;
    let mut result = CmdResult::default();
    if removed {
        result.add_message(CmdMessage::info("You have been logged out"));
    } else {
        result.add_message(CmdMessage::info("You were not logged in."));
    }
    Ok(result)
}
