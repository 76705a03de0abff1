//! Catalog browsing commands.

use clap::Subcommand;
use orderain_core::{CategoryId, TagId};
use orderain_storefront::StorefrontError;
use orderain_storefront::api::{Product, ProductQuery, SortBy, SortDirection};
use orderain_storefront::catalog::ProductSummary;
use rust_decimal::Decimal;

use super::price;
use crate::app::{App, CliError};

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List products with optional filters
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 12)]
        per_page: u32,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Sort field (`name` or `price`)
        #[arg(long, default_value = "name")]
        sort: SortBy,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        #[arg(long)]
        min_price: Option<Decimal>,

        #[arg(long)]
        max_price: Option<Decimal>,

        /// Category ID; repeat to filter by several
        #[arg(short, long)]
        category: Vec<CategoryId>,
    },
    /// Show a product and its variants
    Show {
        /// Product slug
        slug: String,
    },
    /// List products associated with a tag
    Tag {
        /// Tag ID
        id: TagId,
    },
}

fn print_summaries<'a>(products: impl IntoIterator<Item = &'a Product>) {
    for product in products {
        let summary = ProductSummary::from(product);
        let mut line = format!(
            "{:<8} {:<40} {:>10}",
            summary.id.as_str(),
            summary.name,
            price(summary.price, "")
        );
        if let (Some(old), Some(discount)) = (summary.old_price, summary.discount) {
            line.push_str(&format!("  (was {}, -{discount}%)", price(old, "")));
        }
        if !summary.in_stock {
            line.push_str("  [out of stock]");
        }
        println!("{line}");
    }
}

fn print_product(product: &Product) {
    let summary = ProductSummary::from(product);
    println!("{} ({})", product.name, product.slug);
    println!("ID:    {}", product.id);
    println!("Price: {}", price(summary.price, ""));
    if !product.prod_categories_names.is_empty() {
        println!("In:    {}", product.prod_categories_names.join(", "));
    }
    if !product.tags.is_empty() {
        println!("Tags:  {}", product.tags.join(", "));
    }
    if product.has_variants() {
        println!("Variants:");
        for variant in &product.variants {
            println!(
                "  {:<8} {:<30} {:>10}  stock {}",
                variant.id.as_str(),
                variant.name,
                price(variant.price, ""),
                variant.quantity
            );
        }
    } else {
        println!("Stock: {}", product.quantity);
    }
}

pub async fn products(app: &App, action: ProductsAction) -> Result<(), CliError> {
    let catalog = app.catalog();

    match action {
        ProductsAction::List {
            page,
            per_page,
            search,
            sort,
            desc,
            min_price,
            max_price,
            category,
        } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let mut query = ProductQuery::new()
                .page(page)
                .per_page(per_page)
                .sort(sort, direction);
            if let Some(search) = search {
                query = query.search(search);
            }
            if let Some(min) = min_price {
                query = query.min_price(min);
            }
            if let Some(max) = max_price {
                query = query.max_price(max);
            }
            for id in category {
                query = query.category(id);
            }

            let page = catalog.products(&query).await;
            if page.data.is_empty() {
                println!("No products found");
                return Ok(());
            }
            print_summaries(&page.data);
            println!();
            println!("Page {} of {}", page.meta.current_page, page.meta.last_page);
        }
        ProductsAction::Show { slug } => {
            let product = catalog
                .product(&slug)
                .await
                .ok_or_else(|| StorefrontError::NotFound(format!("Product {slug}")))?;
            print_product(&product);
        }
        ProductsAction::Tag { id } => {
            let tag = catalog.tag_products(id).await;
            if let Some(name) = &tag.name {
                println!("{name}");
            }
            if tag.associated_items.data.is_empty() {
                println!("No products found");
            } else {
                print_summaries(&tag.associated_items.data);
            }
        }
    }
    Ok(())
}

pub async fn categories(app: &App) {
    let categories = app.catalog().categories().await;
    if categories.is_empty() {
        println!("No categories found");
    }
    for category in categories {
        println!("{:<6} {}", category.id, category.name);
    }
}
