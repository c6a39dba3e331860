use anyhow::Result;

use crate::args::{Cli, Command};

mod doctor;
mod plan;
mod relocate;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Plan { selection, state, out } => plan::run(&selection, &state, out.as_deref()).await,
        Command::Move(args) => relocate::run(&args).await,
        Command::Doctor => doctor::run().await,
    }
}
