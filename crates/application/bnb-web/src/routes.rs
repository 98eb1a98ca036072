//! Route table for the listing browser

/// All routes defined in the application
pub const ROUTES: &[(&str, &str, &str)] = &[
    // Page routes
    ("GET", "/", "Home page"),
    ("GET", "/users", "Users placeholder"),
    ("GET", "/all-data", "All properties as cards"),
    ("GET", "/data/{index}", "One property by position"),
    ("GET", "/search/id", "Search by ID form"),
    ("GET", "/search/property/result", "Search by ID result (?id=)"),
    ("GET", "/search/name", "Search by name form"),
    ("GET", "/search/name/result", "Search by name result (?name=)"),
    ("GET", "/viewData", "Table of all properties"),
    ("GET", "/viewData/clean", "Table with blank service fees filled in"),
    ("GET", "/viewData/price", "Price range form"),
    ("GET", "/viewData/price/result", "Price range result (?min=&max=)"),

    // API routes
    ("GET", "/api/health", "Health check"),
    ("GET", "/api/properties", "Current dataset as JSON"),
    ("POST", "/admin/reload", "Reload the dataset now"),
];

/// Print all routes
pub fn print_routes() {
    println!("\nListing browser routes:");
    println!("{:-<60}", "");
    for (method, path, desc) in ROUTES {
        println!("{:6} {:30} {}", method, path, desc);
    }
    println!();
}
