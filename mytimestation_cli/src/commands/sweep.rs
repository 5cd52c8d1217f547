use anyhow::{bail, Result};
use clap::Args;
use mytimestation_api::{Client, Sweeper};

#[derive(Args)]
pub struct SweepArgs {
    /// Name prefix of the employees and departments to delete
    #[arg(long)]
    pub prefix: String,

    /// Only report what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: &SweepArgs, client: Client) -> Result<()> {
    if args.prefix.trim().is_empty() {
        bail!("--prefix must not be empty");
    }

    let sweeper = Sweeper::new(client);
    sweeper.collect_with_prefix(&args.prefix).await?;

    let (employees, departments) = sweeper.pending().await;
    eprintln!(
        "{} employees and {} departments match '{}'",
        employees, departments, args.prefix
    );
    if args.dry_run {
        return Ok(());
    }

    sweeper.sweep().await?;
    Ok(())
}
