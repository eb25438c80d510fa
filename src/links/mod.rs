pub mod detector;
pub mod extract;
pub mod pipeline;
pub mod resolver;
pub mod types;

pub use detector::detect_urls;
pub use extract::extract_product_id;
pub use pipeline::{MessageReport, process};
pub use resolver::Resolver;
pub use types::{LinkOutcome, LinkRules, ProductId};
