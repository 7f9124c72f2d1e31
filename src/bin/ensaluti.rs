use anyhow::Result;
use ensaluti::cli::{actions, actions::Action, start};

#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = start()?;

    match action {
        Action::Login { .. } => actions::login::handle(action, &globals).await?,
        Action::Logout => actions::logout::handle(&globals).await?,
        Action::Status { .. } => actions::status::handle(action, &globals).await?,
        Action::ClearCache => actions::clear::handle(&globals).await?,
    }

    Ok(())
}
