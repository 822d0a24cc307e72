mod args;
mod load;
mod types;

pub use args::parse_fixed_args;
pub use load::{parse_route_line, parse_routes, parse_routes_file, RouteLine};
pub use types::{Route, ANY_METHOD, METHODS, NOT_FOUND_ACTION};
