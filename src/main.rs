use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use jobsite_kiosk::{
    Backend, BackendKind, KioskConfig,
    core::{
        auth::{self, AuthClient},
        db::{LocalDb, SeedData},
        plans::{self, GRID_COLUMNS, GridCell, PlanBrowser, ViewMode, list_rows, pack_grid},
        sites::{DirectoryStatus, SiteDirectory},
    },
    telemetry,
};

#[derive(Parser)]
#[command(name = "jobsite-kiosk")]
#[command(about = "Jobsite kiosk: sites, plans and crew tools for the field")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Override the configured backend
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendKind>,

    /// Override the local database file
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Launch the desktop app (default)
    Gui,
    /// Sign in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Print the sites visible to the signed-in user
    Sites {
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the bundled plan set grouped by folder
    Plans {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = Layout::Grid)]
        layout: Layout,
        /// Start with every folder collapsed
        #[arg(long)]
        collapsed: bool,
    },
    /// Load profiles, sites, assignments and accounts from a JSON file into
    /// the local database
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    Grid,
    List,
}

impl From<Layout> for ViewMode {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Grid => ViewMode::Grid,
            Layout::List => ViewMode::List,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    telemetry::init_tracing(args.verbose)?;

    let mut config = KioskConfig::load(args.config.as_deref())?;
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(db) = args.db {
        config.database = Some(db);
    }

    match args.command.unwrap_or(Command::Gui) {
        Command::Gui => run_gui(config),
        Command::Plans {
            search,
            layout,
            collapsed,
        } => {
            print_plans(search.as_deref(), layout.into(), collapsed);
            Ok(())
        }
        command => {
            // The GUI brings its own runtime; everything else runs here.
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start the async runtime")?;
            runtime.block_on(run_command(config, command))
        }
    }
}

#[cfg(feature = "gui")]
fn run_gui(config: KioskConfig) -> anyhow::Result<()> {
    jobsite_kiosk::gui::run(config)
}

#[cfg(not(feature = "gui"))]
fn run_gui(_config: KioskConfig) -> anyhow::Result<()> {
    anyhow::bail!("This build has no GUI. Rebuild with `--features gui`.")
}

async fn run_command(config: KioskConfig, command: Command) -> anyhow::Result<()> {
    if let Command::Import { file } = command {
        let seed = SeedData::from_file(&file)?;
        let db = LocalDb::open(config.database_path()).await?;
        let summary = db.import(&seed).await;
        db.close().await?;
        let summary = summary?;
        println!(
            "Imported {} profiles, {} sites, {} assignments, {} accounts into {}",
            summary.profiles,
            summary.sites,
            summary.assignments,
            summary.accounts,
            config.database_path().display()
        );
        return Ok(());
    }

    let backend = Backend::from_config(&config).await?;
    let result = run_with_backend(&backend, command).await;
    backend.close().await?;
    result
}

async fn run_with_backend(backend: &Backend, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let session = auth::sign_in(backend, &email, &password).await?;
            println!("Signed in as {}", session.user.email);
        }
        Command::Logout => {
            backend.sign_out().await?;
            println!("Signed out");
        }
        Command::Sites { search } => {
            let session = auth::initial_session(backend)
                .await
                .context("Not signed in. Run `jobsite-kiosk login` first.")?;
            let mut directory = SiteDirectory::new();
            directory.load(backend, &session.user).await;
            if let DirectoryStatus::Failed(reason) = directory.status() {
                anyhow::bail!("{reason}");
            }
            if let Some(query) = search {
                directory.set_query(query);
            }
            if let Some(message) = directory.empty_message() {
                println!("{message}");
            }
            for site in directory.filtered() {
                let job_number = site.job_number.as_deref().unwrap_or("-");
                let address = site.address.as_deref().unwrap_or("");
                println!("{:<10} {:<32} {}", job_number, site.name, address);
            }
        }
        Command::Gui | Command::Plans { .. } | Command::Import { .. } => {
            anyhow::bail!("This command does not use a backend")
        }
    }
    Ok(())
}

fn print_plans(search: Option<&str>, view_mode: ViewMode, collapsed: bool) {
    let mut browser = PlanBrowser::new(plans::bundled());
    if let Some(query) = search {
        browser.set_query(query);
    }
    if browser.view_mode() != view_mode {
        browser.toggle_view_mode();
    }
    browser.collapse_all(collapsed);

    let groups = browser.groups();
    if groups.is_empty() {
        println!("No plans match your search");
        return;
    }
    for group in &groups {
        let marker = if browser.is_collapsed(&group.key) { "+" } else { "-" };
        println!("{marker} {} ({})", group.label, group.count());
        if browser.is_collapsed(&group.key) {
            continue;
        }
        match browser.view_mode() {
            ViewMode::Grid => {
                for cells in pack_grid(&group.plans, GRID_COLUMNS) {
                    let line: Vec<String> = cells
                        .iter()
                        .map(|cell| match cell {
                            GridCell::Item(plan) => {
                                format!("[{:<6} {:<28}]", plan.sheet_number, plan.title)
                            }
                            GridCell::Placeholder => String::new(),
                        })
                        .collect();
                    println!("    {}", line.join(" "));
                }
            }
            ViewMode::List => {
                for row in list_rows(&group.plans) {
                    let plan = row.item;
                    println!(
                        "    {:<6} {:<28} {} {}",
                        plan.sheet_number, plan.title, plan.version, plan.version_date
                    );
                    if row.divider {
                        println!("    {}", "-".repeat(48));
                    }
                }
            }
        }
    }
}
