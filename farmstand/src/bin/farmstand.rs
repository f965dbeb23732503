//! Farmstand command-line front end.
//!
//! Browses a marketplace catalog from the terminal: the product grid with
//! its search, date filter and sort, a producer's month calendar, producer
//! ratings, and the offline content generator.
//!
//! # Usage
//!
//! ```bash
//! farmstand products --search tomato --from 2023-07-01 --until 2023-07-15 --sort price_asc
//! farmstand calendar u1 2023-06
//! farmstand rating u1
//! farmstand describe u1 p2
//! farmstand recipe "eggs, spinach"
//! ```
//!
//! # Environment Variables
//!
//! - `FARMSTAND_CONFIG`: configuration file (default: search for `farmstand.toml`)
//! - `FARMSTAND_SEED`: JSON catalog snapshot (default: bundled demo catalog)
//! - `FARMSTAND_POLICY`: `strict` or `permissive`
//! - `FARMSTAND_MONTH`: default calendar month, `YYYY-MM` (default: current month)
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use farmstand::config::AppConfig;
use farmstand::db::{self, CatalogSnapshot, LocalRepository};
use farmstand::forms::AvailabilityFilterForm;
use farmstand::models::{
    format_calendar_date, MissingBoundPolicy, Product, ProductId, UserId, YearMonth,
};
use farmstand::services::{CannedContent, MonthGrid, ProductQuery, RecipeSuggestion, SortOption};

const USAGE: &str = "\
Usage:
  farmstand products [--search TEXT] [--from YYYY-MM-DD [--until YYYY-MM-DD]] [--sort KEY] [--permissive]
  farmstand calendar <producer-id> [YYYY-MM]
  farmstand rating <producer-id>
  farmstand describe <producer-id> <product-id>
  farmstand recipe [INGREDIENTS]

Sort keys: price_asc, price_desc, name, date (default)";

#[derive(Debug)]
enum Command {
    Products {
        search: String,
        filter: AvailabilityFilterForm,
        sort: SortOption,
        permissive: bool,
    },
    Calendar {
        producer_id: UserId,
        month: Option<YearMonth>,
    },
    Rating {
        producer_id: UserId,
    },
    Describe {
        producer_id: UserId,
        product_id: ProductId,
    },
    /// Blank ingredients: a recipe from the catalog.
    Recipe {
        ingredients: String,
    },
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_command(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let Some(name) = args.next() else {
        bail!("missing command\n\n{}", USAGE);
    };

    match name.as_str() {
        "products" => {
            let mut search = String::new();
            let mut filter = AvailabilityFilterForm::default();
            let mut sort = SortOption::default();
            let mut permissive = false;

            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--search" => search = flag_value(&mut args, "--search")?,
                    "--from" => filter.start = flag_value(&mut args, "--from")?,
                    "--until" => filter.end = flag_value(&mut args, "--until")?,
                    "--sort" => {
                        sort = flag_value(&mut args, "--sort")?
                            .parse()
                            .map_err(|e: String| anyhow!(e))?
                    }
                    "--permissive" => permissive = true,
                    other => bail!("unknown option '{}'\n\n{}", other, USAGE),
                }
            }

            Ok(Command::Products {
                search,
                filter,
                sort,
                permissive,
            })
        }
        "calendar" => {
            let producer_id = args
                .next()
                .map(UserId::from)
                .ok_or_else(|| anyhow!("calendar requires a producer id\n\n{}", USAGE))?;
            let month = args
                .next()
                .map(|m| m.parse::<YearMonth>())
                .transpose()
                .context("invalid month")?;
            Ok(Command::Calendar { producer_id, month })
        }
        "rating" => {
            let producer_id = args
                .next()
                .map(UserId::from)
                .ok_or_else(|| anyhow!("rating requires a producer id\n\n{}", USAGE))?;
            Ok(Command::Rating { producer_id })
        }
        "describe" => {
            let (Some(producer_id), Some(product_id)) = (args.next(), args.next()) else {
                bail!("describe requires a producer id and a product id\n\n{}", USAGE);
            };
            Ok(Command::Describe {
                producer_id: UserId::from(producer_id),
                product_id: ProductId::from(product_id),
            })
        }
        "recipe" => Ok(Command::Recipe {
            ingredients: args.collect::<Vec<_>>().join(" "),
        }),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            std::process::exit(0);
        }
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn load_repository(config: &AppConfig) -> Result<LocalRepository> {
    let snapshot = match &config.catalog.seed_path {
        Some(path) => CatalogSnapshot::from_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => {
            debug!("No seed path configured, using the demo catalog");
            db::demo_snapshot()?
        }
    };
    Ok(LocalRepository::from_snapshot(snapshot))
}

fn format_product(product: &Product) -> String {
    let mut line = format!(
        "{:<22} ${:>6.2}/{:<6} {:<11} {}",
        product.name, product.price, product.unit, product.category, product.availability
    );
    if let Some(per_lb) = product.price_per_lb() {
        line.push_str(&format!("  (${:.2}/lb)", per_lb));
    }
    line
}

fn print_recipe(recipe: Option<RecipeSuggestion>) {
    match recipe {
        Some(recipe) => {
            println!("{}", recipe.title);
            println!("Ingredients: {}", recipe.ingredients.join(", "));
            println!("{}", recipe.instructions);
        }
        None => println!("No recipe could be suggested"),
    }
}

fn print_calendar(grid: &MonthGrid<Product>) {
    println!("{}", grid.month());
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");

    let mut row = "    ".repeat(grid.leading_blanks() as usize);
    let mut column = grid.leading_blanks();
    for cell in grid.cells() {
        let marker = if cell.is_empty() { ' ' } else { '*' };
        row.push_str(&format!("{:>3}{}", cell.day(), marker));
        column += 1;
        if column == 7 {
            println!("{}", row.trim_end());
            row.clear();
            column = 0;
        }
    }
    if !row.is_empty() {
        println!("{}", row.trim_end());
    }

    println!();
    for cell in grid.busy_days() {
        let names: Vec<&str> = cell.items.iter().map(|p| p.name.as_str()).collect();
        println!("{}  {}", format_calendar_date(cell.date), names.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let command = parse_command(env::args().skip(1))?;

    let config = AppConfig::load()?;
    let default_month = config.calendar.month_or(Utc::now().date_naive())?;
    info!(
        "Policy {}, default month {}",
        config.availability.policy, default_month
    );
    let repo = load_repository(&config)?;

    match command {
        Command::Products {
            search,
            filter,
            sort,
            permissive,
        } => {
            let policy = if permissive {
                MissingBoundPolicy::Permissive
            } else {
                config.availability.policy
            };
            let mut query = ProductQuery::new()
                .with_search(search)
                .with_policy(policy)
                .sorted_by(sort);
            if let Some(range) = filter.to_query()? {
                info!("Filtering on {}", range);
                query = query.available_during(range);
            }

            let products = db::list_marketplace_products(&repo, &query).await?;
            for product in &products {
                println!("{}", format_product(product));
            }
            println!("{} product(s)", products.len());
        }
        Command::Calendar { producer_id, month } => {
            let month = month.unwrap_or(default_month);
            let grid =
                db::producer_calendar(&repo, &producer_id, month, config.availability.policy)
                    .await?;
            print_calendar(&grid);
        }
        Command::Rating { producer_id } => {
            let summary = db::producer_rating(&repo, &producer_id).await?;
            if summary.has_reviews() {
                println!(
                    "{}: {:.1} / 5 from {} review(s)",
                    producer_id, summary.average, summary.count
                );
            } else {
                println!("{}: no reviews yet", producer_id);
            }
        }
        Command::Describe {
            producer_id,
            product_id,
        } => {
            let content = config.content_service(CannedContent);
            let product =
                db::enhance_description(&repo, &content, &producer_id, &product_id).await?;
            println!("{}: {}", product.name, product.description);
        }
        Command::Recipe { ingredients } => {
            let content = config.content_service(CannedContent);
            let recipe = if ingredients.trim().is_empty() {
                db::recipe_from_catalog(&repo, &content).await?
            } else {
                db::pantry_recipe(&content, &ingredients).await
            };
            print_recipe(recipe);
        }
    }

    Ok(())
}
