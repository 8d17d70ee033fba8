use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};
use dbre_tools::{DatabaseDialect, ReconcileOptions, TableFilter};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
/// Reverse engineers a database schema into an XML document, and keeps that document in sync with
/// the database on later runs.
///
/// Content of the document that doesn't describe tables, columns, keys or indexes is left alone.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Reads the database and updates the dbre document to match it, creating the document when it doesn't exist yet
    ReverseEngineer {
        #[command(flatten)]
        db_args: DbArgs,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        document: DocumentArgs,
    },
    /// Reads the database and prints the tables as json
    Introspect {
        #[command(flatten)]
        db_args: DbArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Only read tables with this name. `%` and `_` are wildcards
        #[arg(long)]
        table: Option<String>,
    },
    /// Lists the sequences in the database
    Sequences {
        #[command(flatten)]
        db_args: DbArgs,

        /// The database dialect to list sequences with. Dialects without sequences list nothing
        #[arg(long, default_value_t = DatabaseDialect::Postgres)]
        dialect: DatabaseDialect,
    },
    /// Prints the tables described by an existing dbre document as json
    Show {
        /// The dbre document to read
        #[arg(long, env = "DBRE_FILE", default_value = "dbre.xml")]
        file: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// The host of the database to read from
    #[arg(long, env = "DBRE_DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// The port of the database to read from
    #[arg(long, env = "DBRE_DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// The username to use when connecting to the database
    #[arg(long, env = "DBRE_DB_USER")]
    pub db_user: String,

    /// The password to use when connecting to the database
    #[arg(long, env = "DBRE_DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// The name of the database to read from
    #[arg(long, env = "DBRE_DB_NAME")]
    pub db_name: String,
}

impl DbArgs {
    pub(crate) fn get_connection_string(&self) -> String {
        format!("host={} port={} user={} password={} dbname={}", self.db_host, self.db_port, self.db_user, self.db_password, self.db_name)
    }

    #[cfg(test)]
    pub(crate) fn from_test_helper(helper: &dbre_tools::test_helpers::TestHelper) -> Self {
        Self {
            db_host: "localhost".to_string(),
            db_port: helper.port,
            db_user: "postgres".to_string(),
            db_password: "passw0rd".to_string(),
            db_name: helper.test_db_name.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only read tables in this schema. `%` and `_` are wildcards. If not specified, all schemas are read
    #[arg(long)]
    pub schema: Option<String>,

    /// Only read tables whose name matches one of these patterns. `*` and `?` are wildcards
    #[arg(long, value_delimiter = ',')]
    pub include_tables: Vec<String>,

    /// Skip tables whose name matches one of these patterns. `*` and `?` are wildcards
    #[arg(long, value_delimiter = ',')]
    pub exclude_tables: Vec<String>,
}

impl FilterArgs {
    pub(crate) fn to_table_filter(&self, table: Option<String>) -> TableFilter {
        TableFilter {
            catalog: None,
            schema: self.schema.clone(),
            table,
            include_tables: self.include_tables.clone(),
            exclude_tables: self.exclude_tables.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// The dbre document to update
    #[arg(long, env = "DBRE_FILE", default_value = "dbre.xml")]
    pub file: PathBuf,

    /// The package written to the document. Takes precedence over the package already in the document
    #[arg(long)]
    pub package: Option<String>,

    /// The package written to the document when neither `--package` nor the document has one
    #[arg(long, env = "DBRE_DEFAULT_PACKAGE", default_value = "")]
    pub default_package: String,

    /// The document to start from when the dbre document doesn't exist yet
    #[arg(long, env = "DBRE_TEMPLATE")]
    pub template: Option<PathBuf>,
}

impl DocumentArgs {
    pub(crate) fn to_reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            package_override: self.package.clone(),
            project_default_package: self.default_package.clone(),
            template: self.template.clone(),
        }
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}

#[test]
fn parses_reverse_engineer_arguments() {
    let cli = Cli::parse_from([
        "dbre-sync",
        "reverse-engineer",
        "--db-user", "postgres",
        "--db-password", "secret",
        "--db-name", "shop",
        "--include-tables", "order*,person",
        "--file", "model/dbre.xml",
        "--package", "com.example.shop",
    ]);

    let Commands::ReverseEngineer { db_args, filter, document } = cli.command else {
        panic!("Expected reverse-engineer, got {:?}", cli.command);
    };

    assert_eq!(db_args.get_connection_string(), "host=localhost port=5432 user=postgres password=secret dbname=shop");
    assert_eq!(filter.to_table_filter(None).include_tables, vec!["order*".to_string(), "person".to_string()]);
    assert_eq!(document.file, PathBuf::from("model/dbre.xml"));
    assert_eq!(document.to_reconcile_options().package_override.as_deref(), Some("com.example.shop"));
}
