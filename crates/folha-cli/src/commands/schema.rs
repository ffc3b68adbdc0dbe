//! Schema command - show what is sent to the model alongside each document.

use clap::Args;

use folha_core::extraction::{response_schema, SYSTEM_INSTRUCTION, TASK_INSTRUCTION};
use folha_core::models::payroll::COLUMNS;

/// Arguments for the schema command.
#[derive(Args)]
pub struct SchemaArgs {
    /// Print the extraction policy instead of the JSON schema
    #[arg(long, conflicts_with = "columns")]
    prompt: bool,

    /// Print the column keys and labels
    #[arg(long)]
    columns: bool,
}

pub async fn run(args: SchemaArgs) -> anyhow::Result<()> {
    if args.prompt {
        println!("{}", SYSTEM_INSTRUCTION);
        println!();
        println!("{}", TASK_INSTRUCTION);
    } else if args.columns {
        for (i, column) in COLUMNS.iter().enumerate() {
            println!("{:>2}  {:<18} {}", i + 1, column.key, column.label);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&response_schema())?);
    }

    Ok(())
}
