use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod metrics;
mod models;
mod store;
mod utils;
mod view;

use api::Portal;
use config::Config;
use models::{CustomerLoginInput, GetCustomerOrdersInput, GetOrderByIdInput};
use store::{MemoryStore, PgStore, Store};

#[derive(Parser)]
#[command(name = "order-portal", about = "Customer order portal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the portal procedures over HTTP (default)
    Serve,
    /// Log in and print your orders
    Orders {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Show a single order instead of the full list
        #[arg(long)]
        order_id: Option<i32>,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_portal=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let store = build_store(&config).await?;
    let metrics = Arc::new(metrics::Metrics::new()?);
    let portal = Portal::new(store, metrics.clone());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, portal, metrics).await,
        Command::Orders {
            email,
            password,
            order_id,
        } => show_orders(&portal, CustomerLoginInput { email, password }, order_id).await,
    }
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match &config.database {
        Some(database) => {
            let store = PgStore::connect(database).await?;
            if database.run_migrations {
                store.migrate().await?;
            }
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::with_demo_data().await?)),
    }
}

async fn serve(config: &Config, portal: Portal, metrics: Arc<metrics::Metrics>) -> anyhow::Result<()> {
    let portal = web::Data::new(portal);
    let metrics = web::Data::new(metrics);

    tracing::info!("🚀 Order portal listening on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(api::cors())
            .app_data(portal.clone())
            .app_data(metrics.clone())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("👋 Order portal stopped");
    Ok(())
}

async fn show_orders(
    portal: &Portal,
    login: CustomerLoginInput,
    order_id: Option<i32>,
) -> anyhow::Result<()> {
    let Some(customer) = portal.authenticate_customer(&login).await? else {
        anyhow::bail!(view::render_login_failure());
    };

    match order_id {
        Some(order_id) => {
            let input = GetOrderByIdInput {
                order_id,
                customer_id: customer.id,
            };
            match portal.get_order_by_id(input).await? {
                Some(order) => println!("{}", view::render_order_card(&order)),
                None => anyhow::bail!("Order #{order_id} not found"),
            }
        }
        None => {
            let input = GetCustomerOrdersInput {
                customer_id: customer.id,
            };
            let orders = portal.get_customer_orders(input).await?;
            println!("{}\n", view::render_header(&customer, orders.len()));
            println!("{}", view::render_orders(&orders));
        }
    }

    Ok(())
}
