use std::io::Write;
use std::path::Path;
use crate::cli::{Commands, DbArgs, DocumentArgs, FilterArgs};
use clap::Parser;
use dbre_tools::{load_document, parse_document, reconcile_file, Database, DatabaseDialect, PostgresClientWrapper, Result};
use serde::Serialize;
use tracing::{info, instrument};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();

    run(cli, &mut std::io::stdout().lock()).await?;

    Ok(())
}

#[instrument(skip_all)]
async fn run(cli: cli::Cli, output: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::ReverseEngineer {
            db_args,
            filter,
            document,
        } => {
            do_reverse_engineer(db_args, filter, document).await?;
        }
        Commands::Introspect {
            db_args,
            filter,
            table,
        } => {
            do_introspect(db_args, filter, table, output).await?;
        }
        Commands::Sequences { db_args, dialect } => {
            do_sequences(db_args, dialect, output).await?;
        }
        Commands::Show { file } => {
            do_show(&file, output).await?;
        }
    }

    Ok(())
}

#[instrument(skip_all)]
async fn do_reverse_engineer(db_args: DbArgs, filter: FilterArgs, document: DocumentArgs) -> Result<()> {
    let connection = PostgresClientWrapper::new(&db_args.get_connection_string()).await?;
    let database = Database::new(&connection);

    let tables = database.get_tables(&filter.to_table_filter(None)).await?;

    let outcome = reconcile_file(&tables, &document.file, &document.to_reconcile_options()).await?;

    info!(
        path = %document.file.display(),
        created = outcome.created(),
        updated = outcome.updated(),
        deleted = outcome.deleted(),
        "Updated dbre document"
    );

    Ok(())
}

#[instrument(skip_all)]
async fn do_introspect(db_args: DbArgs, filter: FilterArgs, table: Option<String>, output: &mut impl Write) -> Result<()> {
    let connection = PostgresClientWrapper::new(&db_args.get_connection_string()).await?;
    let database = Database::new(&connection);

    let tables = database.get_tables(&filter.to_table_filter(table)).await?;

    write_json(output, &tables.values().collect::<Vec<_>>())
}

#[instrument(skip_all)]
async fn do_sequences(db_args: DbArgs, dialect: DatabaseDialect, output: &mut impl Write) -> Result<()> {
    let connection = PostgresClientWrapper::new(&db_args.get_connection_string()).await?;
    let database = Database::new(&connection);

    for sequence in database.get_sequences(dialect).await? {
        writeln!(output, "{}", sequence)?;
    }

    Ok(())
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    package: Option<&'a str>,
    tables: Vec<&'a dbre_tools::Table>,
}

#[instrument(skip_all)]
async fn do_show(file: &Path, output: &mut impl Write) -> Result<()> {
    let document = load_document(file).await?;
    let model = parse_document(&document)?;

    write_json(output, &ShowOutput {
        package: model.package.as_deref(),
        tables: model.tables.values().collect(),
    })
}

fn write_json(output: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *output, value).map_err(std::io::Error::from)?;
    writeln!(output)?;

    Ok(())
}
