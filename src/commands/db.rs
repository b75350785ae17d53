use anyhow::Result;
use colored::Colorize;

use crate::cli::DbCmd;
use crate::storage::Store;

pub async fn handle(cmd: DbCmd, store: &Store) -> Result<()> {
    match cmd {
        DbCmd::Reset { yes } => {
            if !yes {
                println!(
                    "{} this wipes your profile, workouts, records and the exercise catalog — re-run with --yes",
                    "warning:".yellow().bold()
                );
                return Ok(());
            }

            store.reset_all_data().await?;
            println!("{} all data wiped", "ok:".green().bold());
        }
    }

    Ok(())
}
