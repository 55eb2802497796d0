//! `menupress` — fetches vendor menu feeds and renders print-ready menu
//! layouts.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use menupress_core::{load_config, Category};
use menupress_feed::{ingest_feed, MenuFeedClient};
use menupress_pipeline::{
    classify_batch, layout_flower, layout_prepacks, layout_prerolls, layout_products,
    route_flower_tiers, route_prerolls,
};

mod render;
mod session;
mod store;

use session::{MenuSession, NewProduct};
use store::{SavedState, StateFile};

#[derive(Debug, Parser)]
#[command(name = "menupress")]
#[command(about = "Dispensary menu fetcher and print-layout renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the configured menu feed for a category and save it locally.
    Fetch {
        /// carts, dabs, flower, prerolls, or prepacks
        category: String,
    },
    /// Render the saved menu.
    Show {
        /// Category to render; defaults to the one last fetched.
        category: Option<String>,
        /// Restrict the menu to these farms (repeatable).
        #[arg(long = "farm")]
        farms: Vec<String>,
        /// Emit the layout as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Add a hand-entered product to the saved menu.
    Add {
        #[arg(long)]
        farm: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "Hybrid")]
        effect: String,
        #[arg(long)]
        thc: Option<f64>,
        #[arg(long)]
        cbd: Option<f64>,
    },
    /// Revert the saved menu to its pre-edit state.
    Undo,
    /// List the farms present in the saved menu.
    Farms,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch { category } => fetch(&category).await,
        Commands::Show {
            category,
            farms,
            json,
        } => show(category.as_deref(), farms, json),
        Commands::Add {
            farm,
            price,
            name,
            effect,
            thc,
            cbd,
        } => add(NewProduct {
            farm,
            price,
            name,
            effect,
            thc,
            cbd,
        }),
        Commands::Undo => undo(),
        Commands::Farms => farms(),
    }
}

fn parse_category(text: &str) -> anyhow::Result<Category> {
    text.parse::<Category>()
        .with_context(|| format!("unknown category \"{text}\""))
}

async fn fetch(category: &str) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let config = load_config()?;
    let client = MenuFeedClient::new(&config)?;

    let response = client.fetch_category(&config, category).await?;
    let raw = ingest_feed(&response, category.as_str());
    let products = classify_batch(&raw);

    let count = products.len();
    let state_file = StateFile::from_env();
    state_file.save(&SavedState {
        products,
        backup: None,
        category: Some(category),
    })?;

    println!(
        "fetched {count} products for {category} (saved to {})",
        state_file.path().display()
    );
    Ok(())
}

fn show(category: Option<&str>, farms: Vec<String>, json: bool) -> anyhow::Result<()> {
    let state = StateFile::from_env().load()?;
    let category = match category {
        Some(text) => parse_category(text)?,
        None => match state.category {
            Some(category) => category,
            None => bail!("no saved category; run `menupress fetch <category>` first"),
        },
    };

    let mut session = MenuSession::from_state(&state);
    if !farms.is_empty() {
        session.select_farms(farms);
    }
    let store = session.store();

    let output = match category {
        Category::Flower => {
            let layout = layout_flower(&route_flower_tiers(store));
            if json {
                serde_json::to_string_pretty(&layout)?
            } else {
                render::render_flower(&layout)
            }
        }
        Category::Prerolls => {
            let layout = layout_prerolls(&route_prerolls(store));
            if json {
                serde_json::to_string_pretty(&layout)?
            } else {
                render::render_pages(&layout.tree)
            }
        }
        Category::Prepacks => {
            let layout = layout_prepacks(store);
            if json {
                serde_json::to_string_pretty(&layout)?
            } else {
                render::render_prepacks(&layout)
            }
        }
        Category::Carts | Category::Dabs => {
            let layout = layout_products(store, session.selected_farms());
            if json {
                serde_json::to_string_pretty(&layout)?
            } else {
                render::render_pages(&layout.tree)
            }
        }
    };

    print!("{output}");
    Ok(())
}

fn add(entry: NewProduct) -> anyhow::Result<()> {
    let state_file = StateFile::from_env();
    let state = state_file.load()?;

    let mut session = MenuSession::from_state(&state);
    session.add_product(&entry)?;

    let (products, backup) = session.snapshot();
    state_file.save(&SavedState {
        products,
        backup,
        category: state.category,
    })?;
    println!("added \"{}\" ({})", entry.name, entry.farm);
    Ok(())
}

fn undo() -> anyhow::Result<()> {
    let state_file = StateFile::from_env();
    let state = state_file.load()?;

    let mut session = MenuSession::from_state(&state);
    session.undo()?;

    let (products, backup) = session.snapshot();
    state_file.save(&SavedState {
        products,
        backup,
        category: state.category,
    })?;
    println!("menu restored to pre-edit state");
    Ok(())
}

fn farms() -> anyhow::Result<()> {
    let state = StateFile::from_env().load()?;
    let session = MenuSession::from_state(&state);
    let names = session.store().farm_names();
    if names.is_empty() {
        println!("no products saved yet");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
