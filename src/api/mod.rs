//! HTTP surface (feature `server`)
//!
//! | Route | Method |
//! |---|---|
//! | `/api/search-by-details` | POST, criteria list body |
//! | `/search_by_name?query=` | GET |
//! | `/api/unique-values` | GET |
//! | `/health` | GET |

pub mod error;
pub mod handlers;
pub mod router;

pub use error::AppError;
pub use router::build_router;
