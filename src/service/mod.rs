//! Domain services: unit structs whose associated functions run parameterized SQL on a `PgPool`.

mod admins;
mod analytics;
mod categories;
mod products;
mod regions;
mod reports;
mod reviews;
pub mod rules;
mod sellers;
mod validation;

pub use admins::AdminService;
pub use analytics::*;
pub use categories::{category_slug, CategoryService};
pub use products::{make_slug, ProductService};
pub use regions::RegionService;
pub use reports::*;
pub use reviews::ReviewService;
pub use sellers::SellerService;
pub use validation::{is_strong_password, FieldKind, Format, RequestValidator, Rules, ValidationRule};
