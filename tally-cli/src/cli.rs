//! Command Line Interface
//!
//! Subcommand tree and dispatch. Each invocation builds the services it
//! needs over the injected row store, runs one operation, and prints the
//! result as pretty JSON.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use shared::models::{CustomerCreate, OrderItemRequest, ProductCreate};
use tally_store::RowStore;

use crate::services::{
    CatalogService, CustomerService, OrderService, PaymentService, ReportService, LIST_LIMIT,
};

#[derive(Debug, Parser)]
#[command(name = "tally", version, about = "Retail back-office CLI")]
pub struct Cli {
    /// Log level override (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Product catalog operations
    #[command(subcommand)]
    Product(ProductCommand),
    /// Customer directory operations
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Order lifecycle operations
    #[command(subcommand)]
    Order(OrderCommand),
    /// Payment lifecycle operations
    #[command(subcommand)]
    Payment(PaymentCommand),
    /// Reporting commands
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// Add a product to the catalog
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        sku: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0)]
        stock: i64,
        #[arg(long)]
        category: Option<String>,
    },
    /// List products, optionally by category
    List {
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// Add a customer to the directory
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        city: String,
    },
    /// List customers, optionally by city
    List {
        #[arg(long)]
        city: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Place an order for a customer
    Create {
        #[arg(long)]
        customer_id: i64,
        /// Order lines as prod_id:quantity tokens
        #[arg(long, num_args = 1.., required = true)]
        items: Vec<String>,
    },
    /// List a customer's orders
    List {
        #[arg(long)]
        customer_id: i64,
    },
    /// Show an order with its line items
    Show {
        #[arg(long)]
        order_id: i64,
    },
    /// Cancel a PLACED order, restoring stock
    Cancel {
        #[arg(long)]
        order_id: i64,
    },
    /// Complete a PLACED order
    Complete {
        #[arg(long)]
        order_id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// Create a PENDING payment for an order
    Create {
        #[arg(long)]
        order_id: i64,
        #[arg(long)]
        amount: f64,
    },
    /// Mark a payment PAID and complete its order
    Process {
        #[arg(long)]
        order_id: i64,
        #[arg(long)]
        method: String,
    },
    /// Refund a PAID payment
    Refund {
        #[arg(long)]
        order_id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Products ranked by total quantity sold
    TopProducts {
        #[arg(long, default_value_t = 5)]
        top_n: usize,
    },
    /// Revenue over the previous calendar month
    TotalRevenueLastMonth,
    /// Order counts per customer
    TotalOrdersPerCustomer,
    /// Customers with more than --min-orders orders
    FrequentCustomers {
        #[arg(long, default_value_t = 2)]
        min_orders: i64,
    },
}

// ========== Dispatch ==========

pub async fn run(command: Command, store: Arc<dyn RowStore>) -> anyhow::Result<()> {
    match command {
        Command::Product(cmd) => {
            let catalog = CatalogService::new(store);
            match cmd {
                ProductCommand::Add {
                    name,
                    sku,
                    price,
                    stock,
                    category,
                } => {
                    let product = catalog
                        .add(ProductCreate {
                            name,
                            sku,
                            price,
                            stock: Some(stock),
                            category,
                        })
                        .await?;
                    print_json(&product)
                }
                ProductCommand::List { category } => {
                    let products = catalog.list(category.as_deref(), LIST_LIMIT).await?;
                    print_json(&products)
                }
            }
        }
        Command::Customer(cmd) => {
            let directory = CustomerService::new(store);
            match cmd {
                CustomerCommand::Add {
                    name,
                    email,
                    phone,
                    city,
                } => {
                    let customer = directory
                        .add(CustomerCreate {
                            name,
                            email,
                            phone,
                            city,
                        })
                        .await?;
                    print_json(&customer)
                }
                CustomerCommand::List { city } => {
                    let customers = directory.list(city.as_deref(), LIST_LIMIT).await?;
                    print_json(&customers)
                }
            }
        }
        Command::Order(cmd) => {
            let orders = OrderService::new(store);
            match cmd {
                OrderCommand::Create { customer_id, items } => {
                    let items = parse_item_specs(&items)?;
                    let order = orders.create(customer_id, &items).await?;
                    print_json(&order)
                }
                OrderCommand::List { customer_id } => {
                    let orders = orders.list(customer_id).await?;
                    print_json(&orders)
                }
                OrderCommand::Show { order_id } => {
                    let order = orders.get_details(order_id).await?;
                    print_json(&order)
                }
                OrderCommand::Cancel { order_id } => {
                    let order = orders.cancel(order_id).await?;
                    print_json(&order)
                }
                OrderCommand::Complete { order_id } => {
                    let order = orders.complete(order_id).await?;
                    print_json(&order)
                }
            }
        }
        Command::Payment(cmd) => {
            let payments = PaymentService::new(store);
            match cmd {
                PaymentCommand::Create { order_id, amount } => {
                    let payment = payments.create(order_id, amount).await?;
                    print_json(&payment)
                }
                PaymentCommand::Process { order_id, method } => {
                    let payment = payments.process(order_id, &method).await?;
                    print_json(&payment)
                }
                PaymentCommand::Refund { order_id } => {
                    let payment = payments.refund(order_id).await?;
                    print_json(&payment)
                }
            }
        }
        Command::Report(cmd) => {
            let reports = ReportService::new(store);
            match cmd {
                ReportCommand::TopProducts { top_n } => {
                    let top = reports.top_selling_products(top_n).await?;
                    print_json(&top)
                }
                ReportCommand::TotalRevenueLastMonth => {
                    let total = reports.total_revenue_last_month().await?;
                    print_json(&json!({ "total_revenue_last_month": total }))
                }
                ReportCommand::TotalOrdersPerCustomer => {
                    let counts = reports.total_orders_per_customer().await?;
                    print_json(&counts)
                }
                ReportCommand::FrequentCustomers { min_orders } => {
                    let frequent = reports.frequent_customers(min_orders).await?;
                    print_json(&frequent)
                }
            }
        }
    }
}

/// Parse `prod_id:quantity` tokens into order line requests
fn parse_item_specs(specs: &[String]) -> anyhow::Result<Vec<OrderItemRequest>> {
    let mut items = Vec::with_capacity(specs.len());
    for spec in specs {
        let Some((prod_id, quantity)) = spec.split_once(':') else {
            bail!("invalid item '{spec}', expected prod_id:quantity");
        };
        items.push(OrderItemRequest {
            prod_id: prod_id
                .parse()
                .with_context(|| format!("invalid product id in '{spec}'"))?,
            quantity: quantity
                .parse()
                .with_context(|| format!("invalid quantity in '{spec}'"))?,
        });
    }
    Ok(items)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_an_order_create_invocation() {
        let cli = Cli::try_parse_from([
            "tally", "order", "create", "--customer-id", "3", "--items", "1:2", "4:1",
        ])
        .unwrap();

        let Command::Order(OrderCommand::Create { customer_id, items }) = cli.command else {
            panic!("parsed into the wrong subcommand");
        };
        assert_eq!(customer_id, 3);
        assert_eq!(items, vec!["1:2", "4:1"]);
    }

    #[test]
    fn item_specs_parse_into_requests() {
        let items = parse_item_specs(&["1:2".into(), "4:10".into()]).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].prod_id, 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].prod_id, 4);
        assert_eq!(items[1].quantity, 10);
    }

    #[test]
    fn malformed_item_specs_are_rejected() {
        assert!(parse_item_specs(&["12".into()]).is_err());
        assert!(parse_item_specs(&["a:2".into()]).is_err());
        assert!(parse_item_specs(&["1:b".into()]).is_err());
    }
}
