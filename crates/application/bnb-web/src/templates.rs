//! askama page templates
//!
//! Every page extends `layout.html`, which reads `title` and `year`.

use askama::Template;
use bnb_core::ValidationError;

use crate::views::{current_year, PropertyView};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub title: String,
    pub year: i32,
    pub total: Option<usize>,
}

/// Card grid of every listing (`/all-data`)
#[derive(Template)]
#[template(path = "all_data.html")]
pub struct AllDataPage {
    pub title: String,
    pub year: i32,
    pub properties: Vec<PropertyView>,
}

/// Single listing (`/data/{index}` and id search)
#[derive(Template)]
#[template(path = "property.html")]
pub struct PropertyPage {
    pub title: String,
    pub year: i32,
    pub property: PropertyView,
}

#[derive(Template)]
#[template(path = "search_id.html")]
pub struct SearchIdPage {
    pub title: String,
    pub year: i32,
}

#[derive(Template)]
#[template(path = "search_name.html")]
pub struct SearchNamePage {
    pub title: String,
    pub year: i32,
}

#[derive(Template)]
#[template(path = "search_name_result.html")]
pub struct SearchNameResultPage {
    pub title: String,
    pub year: i32,
    pub query: String,
    pub results: Vec<PropertyView>,
}

/// Table view; `clean` switches to the filled-in service fee column
#[derive(Template)]
#[template(path = "view_data.html")]
pub struct ViewDataPage {
    pub title: String,
    pub year: i32,
    pub clean: bool,
    pub properties: Vec<PropertyView>,
}

#[derive(Template)]
#[template(path = "price_form.html")]
pub struct PriceFormPage {
    pub title: String,
    pub year: i32,
    pub min: String,
    pub max: String,
    pub errors: Vec<ValidationError>,
}

#[derive(Template)]
#[template(path = "price_result.html")]
pub struct PriceResultPage {
    pub title: String,
    pub year: i32,
    pub min: f64,
    pub max: f64,
    pub properties: Vec<PropertyView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub title: String,
    pub year: i32,
    pub message: String,
}

impl ErrorPage {
    pub fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            year: current_year(),
            message: message.into(),
        }
    }
}

impl PriceFormPage {
    pub fn blank() -> Self {
        Self {
            title: "Search by Price Range".into(),
            year: current_year(),
            min: String::new(),
            max: String::new(),
            errors: Vec::new(),
        }
    }
}
