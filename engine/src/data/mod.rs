pub mod assets;
pub mod csv_parser;
pub mod csv_writer;
pub mod dataset_cache;

pub use assets::{load_optional_asset, BrandingAsset, OptionalAsset};
pub use csv_parser::{BrazilianCsvParser, ColumnLayout, Dataset, SourceColumn};
pub use csv_writer::BrazilianCsvWriter;
pub use dataset_cache::{CacheKey, DatasetCache, FileSignature};
