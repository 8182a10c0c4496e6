use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use signflow_cli::{seeder, table};
use signflow_config::DatabaseConfig;
use signflow_db::{PgMenuCatalog, PgPool, init_db_pool};
use signflow_matrix::{MatrixEditor, MatrixView};
use signflow_models::{MenuId, RoleId};

#[derive(Parser)]
#[command(name = "signflow-cli")]
#[command(about = "Signflow CLI - Administrative tools for the Signflow console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the default menu catalog (modules and their menu items)
    SeedMenus,
    /// Delete the whole menu catalog, including grants on it
    ClearMenus,
    /// Print a role's permission matrix
    ShowMatrix {
        /// Role whose grants are shown; omit for a blank matrix
        #[arg(short = 'r', long)]
        role: Option<i64>,

        /// Module to include (repeatable, in display order)
        #[arg(short = 'm', long = "module", required = true)]
        modules: Vec<i64>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match DatabaseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let pool = match init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let cli = Cli::parse();

    match cli.command {
        Commands::SeedMenus => handle_seed_menus(&pool).await,
        Commands::ClearMenus => handle_clear_menus(&pool).await,
        Commands::ShowMatrix { role, modules } => handle_show_matrix(&pool, role, modules).await,
    }
}

async fn handle_seed_menus(pool: &PgPool) {
    match seeder::seed_menus(pool).await {
        Ok(summary) => {
            println!(
                "\n✅ Menu catalog seeded: {} modules, {} items",
                summary.modules, summary.items
            );
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding menus: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_menus(pool: &PgPool) {
    match seeder::clear_menus(pool).await {
        Ok(count) => println!("✅ Removed {} menu rows", count),
        Err(e) => {
            eprintln!("❌ Error clearing menus: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_show_matrix(pool: &PgPool, role: Option<i64>, modules: Vec<i64>) {
    let catalog = PgMenuCatalog::new(pool.clone());
    let mut editor = MatrixEditor::new(role.map(RoleId::new));

    if let Err(e) = editor
        .load_catalog(&catalog, modules.into_iter().map(MenuId::new).collect())
        .await
    {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    print!("{}", table::render(&MatrixView::from_editor(&editor)));
}
