use std::io::{BufRead, Write};

use anyhow::Context;

use storefront_app::{Command, Outcome, Storefront, StorefrontConfig, shell::HELP};
use storefront_cart::CartHandle;
use storefront_catalog::{FileCatalog, StaticCatalog, load_or_empty};
use storefront_checkout::CheckoutFlow;

fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::load().context("failed to load configuration")?;
    storefront_observability::init_with(config.log_format);

    let products = match &config.catalog_path {
        Some(path) => load_or_empty(&FileCatalog::new(path)),
        None => load_or_empty(&StaticCatalog::seed()),
    };

    // The one cart of the process; every view gets a clone of this handle.
    let cart = CartHandle::new();
    let checkout = CheckoutFlow::new(cart.clone(), config.checkout_delay());
    let storefront = Storefront::new(products, cart, checkout, config.currency_symbol.clone());

    // Single-threaded, cooperative: the checkout delay is the only suspension point.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to build runtime")?;

    runtime.block_on(run(&storefront))
}

async fn run(storefront: &Storefront) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "{HELP}")?;
    loop {
        write!(stdout, "[cart: {}] > ", storefront.badge())?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };

        match storefront.execute(command).await {
            Outcome::Continue(output) => writeln!(stdout, "{output}")?,
            Outcome::Quit => break,
        }
    }

    tracing::info!(items_left = storefront.cart().read().total_items(), "storefront closed");
    Ok(())
}
